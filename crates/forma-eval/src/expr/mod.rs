//! The derived-expression language.
//!
//! A [`Template`] is parsed once and evaluated against a set of bindings from
//! placeholder name to [`Scalar`]. Placeholders are the only way values enter
//! an expression.

mod lexer;
mod parser;
mod value;

use std::collections::HashMap;

pub use parser::{BinOp, Expr, UnaryOp};
pub use value::Scalar;

use crate::error::EvalError;

/// Placeholder name → bound literal.
pub type Bindings = HashMap<String, Scalar>;

/// A parsed derived-field expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    source: String,
    expr: Expr,
}

impl Template {
    /// Parse a template such as `${a} * ${b}`.
    ///
    /// # Errors
    ///
    /// `EvalError::Syntax` if the template is not a well-formed expression.
    pub fn parse(source: &str) -> Result<Self, EvalError> {
        let tokens = lexer::tokenize(source)?;
        let expr = parser::parse(&tokens, source.len())?;
        Ok(Self {
            source: source.to_string(),
            expr,
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub const fn expr(&self) -> &Expr {
        &self.expr
    }

    /// Placeholder names in order of first appearance.
    #[must_use]
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_placeholders(&self.expr, &mut names);
        names
    }

    /// Evaluate against `bindings`.
    ///
    /// # Errors
    ///
    /// `UnknownPlaceholder` for an unbound name, `NotNumeric` for text that
    /// cannot take part in `- * /`, `NonFinite` as soon as an operation
    /// yields an infinite or NaN number.
    pub fn evaluate(&self, bindings: &Bindings) -> Result<Scalar, EvalError> {
        eval(&self.expr, bindings)
    }
}

fn collect_placeholders<'a>(expr: &'a Expr, names: &mut Vec<&'a str>) {
    match expr {
        Expr::Literal { .. } => {}
        Expr::Placeholder { name } => {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        Expr::Unary { operand, .. } => collect_placeholders(operand, names),
        Expr::BinOp { left, right, .. } => {
            collect_placeholders(left, names);
            collect_placeholders(right, names);
        }
    }
}

fn eval(expr: &Expr, bindings: &Bindings) -> Result<Scalar, EvalError> {
    match expr {
        Expr::Literal { value } => Ok(value.clone()),
        Expr::Placeholder { name } => bindings
            .get(name)
            .cloned()
            .ok_or_else(|| EvalError::UnknownPlaceholder(name.clone())),
        Expr::Unary { op, operand } => {
            let n = eval(operand, bindings)?.to_number()?;
            Ok(Scalar::Number(match op {
                UnaryOp::Plus => n,
                UnaryOp::Neg => -n,
            }))
        }
        Expr::BinOp { left, op, right } => {
            let left = eval(left, bindings)?;
            let right = eval(right, bindings)?;
            apply(*op, &left, &right)
        }
    }
}

fn apply(op: BinOp, left: &Scalar, right: &Scalar) -> Result<Scalar, EvalError> {
    if op == BinOp::Add
        && (matches!(left, Scalar::Text(_)) || matches!(right, Scalar::Text(_)))
    {
        return Ok(Scalar::Text(format!("{left}{right}")));
    }

    let l = left.to_number()?;
    let r = right.to_number()?;
    let result = match op {
        BinOp::Add => l + r,
        BinOp::Sub => l - r,
        BinOp::Mul => l * r,
        BinOp::Div => l / r,
    };
    // Non-finite numbers never reach concatenation.
    if !result.is_finite() {
        return Err(EvalError::NonFinite);
    }
    Ok(Scalar::Number(result))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn bindings(pairs: &[(&str, Scalar)]) -> Bindings {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    fn eval_str(source: &str, pairs: &[(&str, Scalar)]) -> Result<Scalar, EvalError> {
        Template::parse(source)?.evaluate(&bindings(pairs))
    }

    #[rstest]
    #[case("1 + 2 * 3", 7.0)]
    #[case("(1 + 2) * 3", 9.0)]
    #[case("10 / 4", 2.5)]
    #[case("-3 + 5", 2.0)]
    #[case("2 * -(1 + 1)", -4.0)]
    #[case("true + 1", 2.0)]
    fn arithmetic(#[case] source: &str, #[case] expected: f64) {
        assert_eq!(eval_str(source, &[]).unwrap(), Scalar::Number(expected));
    }

    #[test]
    fn placeholders_bind_literals() {
        let result = eval_str(
            "${a} * ${b}",
            &[("a", Scalar::Number(10.0)), ("b", Scalar::Number(3.0))],
        )
        .unwrap();
        assert_eq!(result, Scalar::Number(30.0));
    }

    #[test]
    fn plus_concatenates_when_a_side_is_text() {
        let result = eval_str(
            "${a} + ' ' + ${b}",
            &[("a", Scalar::Text("Ada".into())), ("b", Scalar::Text("Lovelace".into()))],
        )
        .unwrap();
        assert_eq!(result, Scalar::Text("Ada Lovelace".into()));

        let mixed = eval_str("'n=' + ${a}", &[("a", Scalar::Number(4.0))]).unwrap();
        assert_eq!(mixed, Scalar::Text("n=4".into()));
    }

    #[test]
    fn numeric_text_takes_part_in_arithmetic() {
        let result = eval_str("${a} * 2", &[("a", Scalar::Text("21".into()))]).unwrap();
        assert_eq!(result, Scalar::Number(42.0));
        assert_eq!(
            eval_str("${a} * 2", &[("a", Scalar::Text("abc".into()))]).unwrap_err(),
            EvalError::NotNumeric("abc".into())
        );
    }

    #[test]
    fn quotes_inside_values_stay_data() {
        let result = eval_str("${a} + ''", &[("a", Scalar::Text("it's `x` \"y\"".into()))])
            .unwrap();
        assert_eq!(result, Scalar::Text("it's `x` \"y\"".into()));
    }

    #[test]
    fn division_by_zero_fails_even_when_concatenated() {
        assert_eq!(eval_str("5 / 0", &[]).unwrap_err(), EvalError::NonFinite);
        assert_eq!(eval_str("0 / 0", &[]).unwrap_err(), EvalError::NonFinite);
        assert_eq!(
            eval_str(
                "${a} / ${b} + ''",
                &[("a", Scalar::Number(1.0)), ("b", Scalar::Number(0.0))]
            )
            .unwrap_err(),
            EvalError::NonFinite
        );
    }

    #[test]
    fn unbound_placeholder_is_reported() {
        assert_eq!(
            eval_str("${a} + ${c}", &[("a", Scalar::Number(1.0))]).unwrap_err(),
            EvalError::UnknownPlaceholder("c".into())
        );
    }

    #[test]
    fn placeholders_in_first_appearance_order() {
        let template = Template::parse("${b} + ${a} * ${b}").unwrap();
        assert_eq!(template.placeholders(), vec!["b", "a"]);
        assert_eq!(template.source(), "${b} + ${a} * ${b}");
    }
}
