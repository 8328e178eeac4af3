//! Structural checks for fields and whole schemas.

use std::collections::HashSet;

use forma_core::errors::MAX_PARENTS;
use forma_core::{Field, FormSchema, SchemaError};
use serde::Serialize;

use crate::graph::DependencyGraph;

/// One structural problem found in a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field_id: String,
    pub message: String,
}

impl Violation {
    fn new(field_id: &str, error: &SchemaError) -> Self {
        Self {
            field_id: field_id.to_string(),
            message: error.to_string(),
        }
    }
}

/// Checks that depend on the field alone: id, label, options.
///
/// # Errors
///
/// Returns `SchemaError::InvalidField` describing the first problem found.
pub fn check_field_shape(field: &Field) -> Result<(), SchemaError> {
    if field.id.trim().is_empty() {
        return Err(SchemaError::invalid_field("field id must not be blank"));
    }
    if field.label.trim().is_empty() {
        return Err(SchemaError::invalid_field(format!(
            "field {} needs a label",
            field.id
        )));
    }

    if field.field_type.is_choice() {
        if field.options.is_empty() {
            return Err(SchemaError::invalid_field(format!(
                "{} field {} needs at least one option",
                field.field_type, field.id
            )));
        }
    } else if !field.options.is_empty() {
        return Err(SchemaError::invalid_field(format!(
            "{} field {} cannot have options",
            field.field_type, field.id
        )));
    }

    let mut values = HashSet::new();
    let mut ids = HashSet::new();
    for option in &field.options {
        if !values.insert(option.value.as_str()) {
            return Err(SchemaError::invalid_field(format!(
                "field {} repeats option value '{}'",
                field.id, option.value
            )));
        }
        if !ids.insert(option.id.as_str()) {
            return Err(SchemaError::invalid_field(format!(
                "field {} repeats option id '{}'",
                field.id, option.id
            )));
        }
    }

    Ok(())
}

/// Checks a derived field's parent list against the schema it lives in.
///
/// Input fields always pass.
///
/// # Errors
///
/// `TooManyParents`, `Cycle` (a field listing itself), `NotFound` for an
/// unknown parent, `TypeMismatch` for a parent of another type.
pub fn check_derived(schema: &FormSchema, field: &Field) -> Result<(), SchemaError> {
    let Some(spec) = &field.derived else {
        return Ok(());
    };

    if spec.parents.len() > MAX_PARENTS {
        return Err(SchemaError::TooManyParents {
            field_id: field.id.clone(),
            count: spec.parents.len(),
        });
    }

    for parent_id in &spec.parents {
        if *parent_id == field.id {
            return Err(SchemaError::Cycle {
                id: field.id.clone(),
            });
        }
        let parent = schema
            .field(parent_id)
            .ok_or_else(|| SchemaError::not_found(parent_id.clone()))?;
        if parent.field_type != field.field_type {
            return Err(SchemaError::TypeMismatch {
                field_id: field.id.clone(),
                parent_id: parent_id.clone(),
                expected: field.field_type,
                found: parent.field_type,
            });
        }
    }

    Ok(())
}

/// Checks everything a change to `field_id` can break in `candidate`: its own
/// derived spec, the specs of fields that depend on it, and acyclicity.
///
/// # Errors
///
/// The first `SchemaError` found.
pub fn check_around(candidate: &FormSchema, field_id: &str) -> Result<(), SchemaError> {
    if let Some(field) = candidate.field(field_id) {
        check_derived(candidate, field)?;
    }
    for dependent in candidate
        .fields
        .iter()
        .filter(|f| f.parents().iter().any(|p| p == field_id))
    {
        check_derived(candidate, dependent)?;
    }
    DependencyGraph::from_fields(&candidate.fields)
        .evaluation_order()
        .map(drop)
}

/// Audit a whole schema and report every violation found.
///
/// Used on saved forms at load time, where nothing guarantees the record was
/// produced by this editor.
#[must_use]
pub fn check_invariants(schema: &FormSchema) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();

    for field in &schema.fields {
        if !seen.insert(field.id.as_str()) {
            violations.push(Violation::new(
                &field.id,
                &SchemaError::invalid_field(format!("duplicate field id {}", field.id)),
            ));
        }
        if let Err(error) = check_field_shape(field) {
            violations.push(Violation::new(&field.id, &error));
        }
        if let Err(error) = check_derived(schema, field) {
            violations.push(Violation::new(&field.id, &error));
        }
    }

    if let Err(error) = DependencyGraph::from_fields(&schema.fields).evaluation_order() {
        let field_id = match &error {
            SchemaError::Cycle { id } => id.clone(),
            _ => schema.id.clone(),
        };
        violations.push(Violation::new(&field_id, &error));
    }

    violations
}

#[cfg(test)]
mod tests {
    use forma_core::{FieldOption, FieldType};
    use rstest::rstest;

    use super::*;

    fn form(fields: Vec<Field>) -> FormSchema {
        let mut schema = FormSchema::empty();
        schema.fields = fields;
        schema
    }

    #[rstest]
    #[case::blank_label(Field::new(FieldType::Text, "  "))]
    #[case::blank_id(Field::new(FieldType::Text, "Name").with_id(""))]
    #[case::select_without_options(Field::new(FieldType::Select, "Color"))]
    #[case::text_with_options(
        Field::new(FieldType::Text, "Name").with_options(vec![FieldOption::new("A", "a")])
    )]
    #[case::duplicate_option_values(
        Field::new(FieldType::Radio, "Size")
            .with_options(vec![FieldOption::new("S", "s"), FieldOption::new("Small", "s")])
    )]
    fn malformed_fields_are_invalid(#[case] field: Field) {
        let err = check_field_shape(&field).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidField { .. }), "{err}");
    }

    #[test]
    fn well_formed_choice_field_passes() {
        let field = Field::new(FieldType::Checkbox, "Toppings").with_options(vec![
            FieldOption::new("Cheese", "cheese"),
            FieldOption::new("Olives", "olives"),
        ]);
        assert!(check_field_shape(&field).is_ok());
    }

    #[test]
    fn derived_parent_type_must_match() {
        let schema = form(vec![
            Field::new(FieldType::Text, "Name").with_id("name"),
            Field::new(FieldType::Number, "Len").with_id("len"),
        ]);
        let candidate = Field::new(FieldType::Number, "Len")
            .with_id("len")
            .with_derived(vec!["name".into()], "${a}");
        let err = check_derived(&schema, &candidate).unwrap_err();
        assert_eq!(
            err,
            SchemaError::TypeMismatch {
                field_id: "len".into(),
                parent_id: "name".into(),
                expected: FieldType::Number,
                found: FieldType::Text,
            }
        );
    }

    #[test]
    fn audit_reports_each_problem() {
        let schema = form(vec![
            Field::new(FieldType::Number, "A")
                .with_id("a")
                .with_derived(vec!["b".into()], "${a}"),
            Field::new(FieldType::Number, "B")
                .with_id("b")
                .with_derived(vec!["a".into()], "${a}"),
            Field::new(FieldType::Number, "C")
                .with_id("c")
                .with_derived(vec!["ghost".into()], "${a}"),
            Field::new(FieldType::Select, "D").with_id("d"),
        ]);
        let violations = check_invariants(&schema);
        let ids: Vec<&str> = violations.iter().map(|v| v.field_id.as_str()).collect();

        assert!(ids.contains(&"c"));
        assert!(ids.contains(&"d"));
        assert!(
            violations
                .iter()
                .any(|v| v.message.starts_with("Dependency cycle"))
        );
    }

    #[test]
    fn clean_schema_has_no_violations() {
        let schema = form(vec![
            Field::new(FieldType::Number, "Price").with_id("price"),
            Field::new(FieldType::Number, "Double")
                .with_id("double")
                .with_derived(vec!["price".into()], "${a} * 2"),
        ]);
        assert!(check_invariants(&schema).is_empty());
    }
}
