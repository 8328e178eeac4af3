//! Dependency-ordered recomputation of derived fields.
//!
//! Always a full pass over the complete value map: every derived field is
//! recomputed, parents before dependents, so a change to any input reaches
//! every chain that uses it.

use std::collections::BTreeMap;

use forma_core::errors::MAX_PARENTS;
use forma_core::values::to_text;
use forma_core::{Field, FieldType, FieldValues, FormSchema, SchemaError};
use forma_schema::DependencyGraph;
use serde::Serialize;
use serde_json::Value;

use crate::error::EvalError;
use crate::expr::{Bindings, Scalar, Template};

/// Category of a derived-field failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    Syntax,
    UnknownPlaceholder,
    NotNumeric,
    NonFinite,
    MissingParent,
    ParentTypeMismatch,
}

/// Why a derived field came out empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl From<EvalError> for Diagnostic {
    fn from(error: EvalError) -> Self {
        let kind = match error {
            EvalError::Syntax { .. } => DiagnosticKind::Syntax,
            EvalError::UnknownPlaceholder(_) => DiagnosticKind::UnknownPlaceholder,
            EvalError::NotNumeric(_) => DiagnosticKind::NotNumeric,
            EvalError::NonFinite => DiagnosticKind::NonFinite,
        };
        Self {
            kind,
            message: error.to_string(),
        }
    }
}

/// Output of a recompute pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recomputation {
    /// The input map with every derived field's value filled in.
    pub values: FieldValues,
    /// Derived fields that failed, keyed by field id. Their value is `""`.
    pub diagnostics: BTreeMap<String, Diagnostic>,
}

impl Recomputation {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Recompute every derived field of `schema` from `values`.
///
/// # Errors
///
/// `SchemaError::Cycle` if the dependency graph has a cycle,
/// `SchemaError::TooManyParents` if a derived field lists more than 26 parents.
pub fn recompute(schema: &FormSchema, values: &FieldValues) -> Result<Recomputation, SchemaError> {
    let order = DependencyGraph::from_fields(&schema.fields).evaluation_order()?;
    recompute_in_order(schema, &order, values)
}

/// Recompute with a precomputed evaluation order, e.g. the one cached by
/// `WorkingForm::evaluation_order`.
///
/// # Errors
///
/// `SchemaError::TooManyParents` as for [`recompute`].
pub fn recompute_in_order(
    schema: &FormSchema,
    order: &[String],
    values: &FieldValues,
) -> Result<Recomputation, SchemaError> {
    if let Some(field) = schema
        .derived_fields()
        .find(|f| f.parents().len() > MAX_PARENTS)
    {
        return Err(SchemaError::TooManyParents {
            field_id: field.id.clone(),
            count: field.parents().len(),
        });
    }

    let mut out = values.clone();
    let mut diagnostics = BTreeMap::new();

    for id in order {
        let Some(field) = schema.field(id) else {
            continue;
        };
        match evaluate_field(schema, field, &out) {
            Ok(value) => {
                out.insert(id.clone(), value);
            }
            Err(diagnostic) => {
                tracing::debug!(field_id = %id, reason = %diagnostic.message, "derived field left empty");
                out.insert(id.clone(), Value::String(String::new()));
                diagnostics.insert(id.clone(), diagnostic);
            }
        }
    }

    tracing::debug!(
        form_id = %schema.id,
        derived = order.len(),
        failed = diagnostics.len(),
        "recomputed derived fields"
    );
    Ok(Recomputation {
        values: out,
        diagnostics,
    })
}

fn evaluate_field(
    schema: &FormSchema,
    field: &Field,
    values: &FieldValues,
) -> Result<Value, Diagnostic> {
    let Some(spec) = &field.derived else {
        return Ok(values.get(&field.id).cloned().unwrap_or(Value::Null));
    };

    let mut bindings = Bindings::new();
    let mut aliases = Vec::with_capacity(spec.parents.len());

    for (index, parent_id) in spec.parents.iter().enumerate() {
        let parent = schema.field(parent_id).ok_or_else(|| Diagnostic {
            kind: DiagnosticKind::MissingParent,
            message: format!("parent field {parent_id} does not exist"),
        })?;
        if parent.field_type != field.field_type {
            return Err(Diagnostic {
                kind: DiagnosticKind::ParentTypeMismatch,
                message: format!(
                    "parent {parent_id} is {} but {} is {}",
                    parent.field_type, field.id, field.field_type
                ),
            });
        }

        let scalar = coerce(parent, values.get(parent_id));
        bindings.insert(parent_id.clone(), scalar.clone());
        aliases.push((alias(index), scalar));
    }
    // Aliases win over a parent whose id happens to be a single letter.
    bindings.extend(aliases);

    let template = Template::parse(&spec.expression)?;
    Ok(template.evaluate(&bindings)?.into_value()?)
}

/// `0 → "a"`, `1 → "b"`, … Only called with `index < 26`.
#[allow(clippy::cast_possible_truncation)]
fn alias(index: usize) -> String {
    char::from(b'a' + index as u8).to_string()
}

/// Turn a parent's current value into a literal.
///
/// Number parents parse as `f64` (unparsable → 0). Other parents pass through;
/// an absent value falls back to the parent's default, then to `""`.
fn coerce(parent: &Field, current: Option<&Value>) -> Scalar {
    let value = match current {
        Some(Value::Null) | None if !parent.is_derived() => parent.default_value.as_ref(),
        other => other,
    };

    if parent.field_type == FieldType::Number {
        return Scalar::Number(match value {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        });
    }

    match value {
        Some(Value::Bool(b)) => Scalar::Bool(*b),
        Some(Value::Number(n)) => Scalar::Number(n.as_f64().unwrap_or(0.0)),
        other => Scalar::Text(to_text(other)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn field(ty: FieldType, id: &str) -> Field {
        Field::new(ty, id).with_id(id)
    }

    fn schema(fields: Vec<Field>) -> FormSchema {
        let mut schema = FormSchema::empty();
        schema.fields = fields;
        schema
    }

    fn values(pairs: &[(&str, Value)]) -> FieldValues {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn number_parents_are_parsed() {
        let form = schema(vec![
            field(FieldType::Number, "price"),
            field(FieldType::Number, "qty"),
            field(FieldType::Number, "total")
                .with_derived(vec!["price".into(), "qty".into()], "${a} * ${b}"),
        ]);
        let out = recompute(&form, &values(&[("price", json!("10")), ("qty", json!("3"))]))
            .unwrap();
        assert_eq!(out.values["total"], json!(30));
        assert!(out.is_clean());
    }

    #[test]
    fn unparsable_numbers_coerce_to_zero() {
        let form = schema(vec![
            field(FieldType::Number, "x"),
            field(FieldType::Number, "y").with_derived(vec!["x".into()], "${a} + 1"),
        ]);
        let out = recompute(&form, &values(&[("x", json!("abc"))])).unwrap();
        assert_eq!(out.values["y"], json!(1));
    }

    #[test]
    fn text_parents_concatenate() {
        let form = schema(vec![
            field(FieldType::Text, "first"),
            field(FieldType::Text, "last"),
            field(FieldType::Text, "full")
                .with_derived(vec!["first".into(), "last".into()], "${a} + ' ' + ${b}"),
        ]);
        let out = recompute(
            &form,
            &values(&[("first", json!("Grace")), ("last", json!("Hopper"))]),
        )
        .unwrap();
        assert_eq!(out.values["full"], json!("Grace Hopper"));
    }

    #[test]
    fn parent_ids_work_as_placeholders() {
        let form = schema(vec![
            field(FieldType::Number, "price"),
            field(FieldType::Number, "net").with_derived(vec!["price".into()], "${price} / 2"),
        ]);
        let out = recompute(&form, &values(&[("price", json!(5))])).unwrap();
        assert_eq!(out.values["net"], json!(2.5));
    }

    #[test]
    fn division_by_zero_yields_empty_with_diagnostic() {
        let form = schema(vec![
            field(FieldType::Number, "x"),
            field(FieldType::Number, "y"),
            field(FieldType::Number, "ratio")
                .with_derived(vec!["x".into(), "y".into()], "${a} / ${b}"),
        ]);
        let out = recompute(&form, &values(&[("x", json!("5")), ("y", json!("0"))])).unwrap();
        assert_eq!(out.values["ratio"], json!(""));
        assert_eq!(out.diagnostics["ratio"].kind, DiagnosticKind::NonFinite);
    }

    #[test]
    fn infinite_quotient_is_not_rescued_by_concatenation() {
        let form = schema(vec![
            field(FieldType::Number, "x"),
            field(FieldType::Number, "y"),
            field(FieldType::Number, "label")
                .with_derived(vec!["x".into(), "y".into()], "${a} / ${b} + ''"),
        ]);
        let out = recompute(&form, &values(&[("x", json!(1)), ("y", json!(0))])).unwrap();
        assert_eq!(out.values["label"], json!(""));
        assert_eq!(out.diagnostics["label"].kind, DiagnosticKind::NonFinite);
    }

    #[test]
    fn runaway_nesting_is_a_syntax_diagnostic() {
        let deep = format!("{}${{a}}{}", "(".repeat(20_000), ")".repeat(20_000));
        let nested = format!("{}${{a}}{}", "(".repeat(300), ")".repeat(300));
        let chain = vec!["${a}"; 2_000].join(" + ");
        let form = schema(vec![
            field(FieldType::Number, "x"),
            field(FieldType::Number, "deep").with_derived(vec!["x".into()], deep),
            field(FieldType::Number, "nested").with_derived(vec!["x".into()], nested),
            field(FieldType::Number, "chain").with_derived(vec!["x".into()], chain),
            field(FieldType::Number, "ok").with_derived(vec!["x".into()], "${a} + 1"),
        ]);
        let out = recompute(&form, &values(&[("x", json!(1))])).unwrap();
        for id in ["deep", "nested", "chain"] {
            assert_eq!(out.values[id], json!(""), "{id}");
            assert_eq!(out.diagnostics[id].kind, DiagnosticKind::Syntax, "{id}");
        }
        assert_eq!(out.values["ok"], json!(2));
    }

    #[test]
    fn syntax_errors_are_contained() {
        let form = schema(vec![
            field(FieldType::Number, "x"),
            field(FieldType::Number, "bad").with_derived(vec!["x".into()], "${a} *"),
            field(FieldType::Number, "good").with_derived(vec!["x".into()], "${a} * 2"),
        ]);
        let out = recompute(&form, &values(&[("x", json!(4))])).unwrap();
        assert_eq!(out.values["bad"], json!(""));
        assert_eq!(out.diagnostics["bad"].kind, DiagnosticKind::Syntax);
        assert_eq!(out.values["good"], json!(8));
    }

    #[test]
    fn chains_evaluate_parents_first_whatever_the_declaration_order() {
        let form = schema(vec![
            field(FieldType::Number, "grand")
                .with_derived(vec!["total".into(), "tax".into()], "${a} + ${b}"),
            field(FieldType::Number, "tax").with_derived(vec!["total".into()], "${a} / 10"),
            field(FieldType::Number, "total")
                .with_derived(vec!["price".into(), "qty".into()], "${a} * ${b}"),
            field(FieldType::Number, "price"),
            field(FieldType::Number, "qty"),
        ]);
        let out = recompute(&form, &values(&[("price", json!(10)), ("qty", json!(5))])).unwrap();
        assert_eq!(out.values["total"], json!(50));
        assert_eq!(out.values["tax"], json!(5));
        assert_eq!(out.values["grand"], json!(55));
    }

    #[test]
    fn user_values_for_derived_fields_are_overwritten() {
        let form = schema(vec![
            field(FieldType::Number, "x"),
            field(FieldType::Number, "y")
                .with_default(json!(99))
                .with_derived(vec!["x".into()], "${a} + 1"),
        ]);
        let out = recompute(&form, &values(&[("x", json!(1)), ("y", json!(500))])).unwrap();
        assert_eq!(out.values["y"], json!(2));
    }

    #[test]
    fn absent_parent_uses_its_default() {
        let form = schema(vec![
            field(FieldType::Number, "rate").with_default(json!("1.5")),
            field(FieldType::Number, "double").with_derived(vec!["rate".into()], "${a} * 2"),
        ]);
        let out = recompute(&form, &FieldValues::new()).unwrap();
        assert_eq!(out.values["double"], json!(3));
    }

    #[test]
    fn missing_parent_is_a_diagnostic_not_a_crash() {
        let form = schema(vec![
            field(FieldType::Number, "y").with_derived(vec!["gone".into()], "${a}"),
        ]);
        let out = recompute(&form, &FieldValues::new()).unwrap();
        assert_eq!(out.values["y"], json!(""));
        assert_eq!(out.diagnostics["y"].kind, DiagnosticKind::MissingParent);
    }

    #[test]
    fn cycle_fails_the_pass() {
        let form = schema(vec![
            field(FieldType::Number, "a").with_derived(vec!["b".into()], "${a}"),
            field(FieldType::Number, "b").with_derived(vec!["a".into()], "${a}"),
        ]);
        assert!(matches!(
            recompute(&form, &FieldValues::new()),
            Err(SchemaError::Cycle { .. })
        ));
    }

    #[test]
    fn too_many_parents_fails_the_pass() {
        let mut fields: Vec<Field> = (0..27)
            .map(|i| field(FieldType::Number, &format!("p{i}")))
            .collect();
        let parents = fields.iter().map(|f| f.id.clone()).collect();
        fields.push(field(FieldType::Number, "sum").with_derived(parents, "${a}"));
        let err = recompute(&schema(fields), &FieldValues::new()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::TooManyParents {
                field_id: "sum".into(),
                count: 27
            }
        );
    }

    #[test]
    fn recompute_is_idempotent() {
        let form = schema(vec![
            field(FieldType::Number, "price"),
            field(FieldType::Number, "total").with_derived(vec!["price".into()], "${a} * 1.2"),
        ]);
        let input = values(&[("price", json!("7"))]);
        let first = recompute(&form, &input).unwrap();
        let second = recompute(&form, &input).unwrap();
        assert_eq!(first, second);

        let again = recompute(&form, &first.values).unwrap();
        assert_eq!(again.values, first.values);
    }
}
