use std::cmp::Ordering;

use thiserror::Error;

use super::ast::{BinaryOp, Builtin, Expr, Operand, UnaryOp};
use crate::utils::date_parser::parse_datetime;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("operator '{0}' cannot be applied to {1} and {2}")]
    TypeMismatch(&'static str, &'static str, &'static str),
    #[error("'{0}' expects {1}, got {2}")]
    BadArgument(&'static str, &'static str, &'static str),
    #[error("division by zero")]
    DivisionByZero,
    #[error("name is not bound in this scope")]
    Unbound,
}

pub fn evaluate(expr: &Expr, param: Option<&Operand>) -> Result<Operand, EvalError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Param => param.cloned().ok_or(EvalError::Unbound),
        Expr::Name { .. } => Err(EvalError::Unbound),
        Expr::List(items) => Ok(Operand::List(
            items
                .iter()
                .map(|item| evaluate(item, param))
                .collect::<Result<Vec<_>, _>>()?,
        )),
        Expr::Unary(op, operand) => unary(*op, evaluate(operand, param)?),
        Expr::Binary(BinaryOp::And, left, right) => {
            if !boolean("&&", &evaluate(left, param)?)? {
                return Ok(Operand::Bool(false));
            }
            Ok(Operand::Bool(boolean("&&", &evaluate(right, param)?)?))
        }
        Expr::Binary(BinaryOp::Or, left, right) => {
            if boolean("||", &evaluate(left, param)?)? {
                return Ok(Operand::Bool(true));
            }
            Ok(Operand::Bool(boolean("||", &evaluate(right, param)?)?))
        }
        Expr::Binary(op, left, right) => {
            binary(*op, evaluate(left, param)?, evaluate(right, param)?)
        }
        Expr::Call(builtin, args) => {
            let args = args
                .iter()
                .map(|arg| evaluate(arg, param))
                .collect::<Result<Vec<_>, _>>()?;
            call(*builtin, args)
        }
        Expr::Matches(subject, regex) => match evaluate(subject, param)? {
            Operand::Text(s) => Ok(Operand::Bool(regex.is_match(&s))),
            Operand::Null => Ok(Operand::Bool(false)),
            other => Err(EvalError::BadArgument(
                "matches",
                "text",
                other.type_name(),
            )),
        },
    }
}

fn boolean(op: &'static str, value: &Operand) -> Result<bool, EvalError> {
    match value {
        Operand::Bool(b) => Ok(*b),
        other => Err(EvalError::TypeMismatch(op, other.type_name(), "boolean")),
    }
}

fn unary(op: UnaryOp, value: Operand) -> Result<Operand, EvalError> {
    match (op, value) {
        (UnaryOp::Neg, Operand::Number(n)) => Ok(Operand::Number(-n)),
        (UnaryOp::Not, Operand::Bool(b)) => Ok(Operand::Bool(!b)),
        (UnaryOp::Neg, other) => Err(EvalError::BadArgument("-", "number", other.type_name())),
        (UnaryOp::Not, other) => Err(EvalError::BadArgument("!", "boolean", other.type_name())),
    }
}

// Text that reads as a number is promoted when the other side is a number.
fn coerce(left: Operand, right: Operand) -> (Operand, Operand) {
    match (left, right) {
        (Operand::Number(n), Operand::Text(s)) => match s.trim().parse::<f64>() {
            Ok(m) => (Operand::Number(n), Operand::Number(m)),
            Err(_) => (Operand::Number(n), Operand::Text(s)),
        },
        (Operand::Text(s), Operand::Number(n)) => match s.trim().parse::<f64>() {
            Ok(m) => (Operand::Number(m), Operand::Number(n)),
            Err(_) => (Operand::Text(s), Operand::Number(n)),
        },
        (Operand::Temporal(t), Operand::Text(s)) => match parse_datetime(&s) {
            Some(u) => (Operand::Temporal(t), Operand::Temporal(u)),
            None => (Operand::Temporal(t), Operand::Text(s)),
        },
        (Operand::Text(s), Operand::Temporal(t)) => match parse_datetime(&s) {
            Some(u) => (Operand::Temporal(u), Operand::Temporal(t)),
            None => (Operand::Text(s), Operand::Temporal(t)),
        },
        pair => pair,
    }
}

fn order(op: BinaryOp, left: &Operand, right: &Operand) -> Result<Ordering, EvalError> {
    let ordering = match (left, right) {
        (Operand::Number(a), Operand::Number(b)) => a.partial_cmp(b),
        (Operand::Text(a), Operand::Text(b)) => Some(a.cmp(b)),
        (Operand::Temporal(a), Operand::Temporal(b)) => Some(a.cmp(b)),
        _ => None,
    };
    ordering.ok_or(EvalError::TypeMismatch(
        op.symbol(),
        left.type_name(),
        right.type_name(),
    ))
}

fn binary(op: BinaryOp, left: Operand, right: Operand) -> Result<Operand, EvalError> {
    if op == BinaryOp::In {
        return match right {
            Operand::List(items) => Ok(Operand::Bool(
                items
                    .into_iter()
                    .any(|item| equals(left.clone(), item)),
            )),
            Operand::Text(haystack) => match left {
                Operand::Text(needle) => Ok(Operand::Bool(haystack.contains(&needle))),
                other => Err(EvalError::TypeMismatch("in", other.type_name(), "text")),
            },
            other => Err(EvalError::TypeMismatch(
                "in",
                left.type_name(),
                other.type_name(),
            )),
        };
    }

    let (left, right) = coerce(left, right);
    match op {
        BinaryOp::Eq => Ok(Operand::Bool(equals(left, right))),
        BinaryOp::Ne => Ok(Operand::Bool(!equals(left, right))),
        BinaryOp::Lt => Ok(Operand::Bool(order(op, &left, &right)?.is_lt())),
        BinaryOp::Le => Ok(Operand::Bool(order(op, &left, &right)?.is_le())),
        BinaryOp::Gt => Ok(Operand::Bool(order(op, &left, &right)?.is_gt())),
        BinaryOp::Ge => Ok(Operand::Bool(order(op, &left, &right)?.is_ge())),
        _ => arithmetic(op, left, right),
    }
}

fn equals(left: Operand, right: Operand) -> bool {
    let (left, right) = coerce(left, right);
    left == right
}

fn arithmetic(op: BinaryOp, left: Operand, right: Operand) -> Result<Operand, EvalError> {
    match (op, left, right) {
        (BinaryOp::Add, Operand::Text(a), Operand::Text(b)) => Ok(Operand::Text(a + &b)),
        (op, Operand::Number(a), Operand::Number(b)) => {
            let result = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div | BinaryOp::Rem if b == 0.0 => {
                    return Err(EvalError::DivisionByZero);
                }
                BinaryOp::Div => a / b,
                BinaryOp::Rem => a % b,
                _ => unreachable!("comparison operators are handled by the caller"),
            };
            Ok(Operand::Number(result))
        }
        (op, left, right) => Err(EvalError::TypeMismatch(
            op.symbol(),
            left.type_name(),
            right.type_name(),
        )),
    }
}

fn text_arg(name: &'static str, value: &Operand) -> Result<String, EvalError> {
    match value {
        Operand::Text(s) => Ok(s.clone()),
        other => Err(EvalError::BadArgument(name, "text", other.type_name())),
    }
}

fn call(builtin: Builtin, args: Vec<Operand>) -> Result<Operand, EvalError> {
    let first = &args[0];
    match builtin {
        Builtin::Len => match first {
            Operand::Text(s) => Ok(Operand::Number(s.chars().count() as f64)),
            Operand::List(items) => Ok(Operand::Number(items.len() as f64)),
            other => Err(EvalError::BadArgument("len", "text or list", other.type_name())),
        },
        Builtin::Abs => match coerce(Operand::Number(0.0), first.clone()).1 {
            Operand::Number(n) => Ok(Operand::Number(n.abs())),
            other => Err(EvalError::BadArgument("abs", "number", other.type_name())),
        },
        Builtin::Lower => Ok(Operand::Text(text_arg("lower", first)?.to_lowercase())),
        Builtin::Upper => Ok(Operand::Text(text_arg("upper", first)?.to_uppercase())),
        Builtin::Trim => Ok(Operand::Text(text_arg("trim", first)?.trim().to_string())),
        Builtin::StartsWith => Ok(Operand::Bool(
            text_arg("starts_with", first)?.starts_with(&text_arg("starts_with", &args[1])?),
        )),
        Builtin::EndsWith => Ok(Operand::Bool(
            text_arg("ends_with", first)?.ends_with(&text_arg("ends_with", &args[1])?),
        )),
        Builtin::Contains => Ok(Operand::Bool(
            text_arg("contains", first)?.contains(&text_arg("contains", &args[1])?),
        )),
        Builtin::IsNull => Ok(Operand::Bool(matches!(first, Operand::Null))),
        Builtin::Number => match first {
            Operand::Number(n) => Ok(Operand::Number(*n)),
            Operand::Bool(b) => Ok(Operand::Number(if *b { 1.0 } else { 0.0 })),
            Operand::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(Operand::Number)
                .map_err(|_| EvalError::BadArgument("number", "numeric text", "text")),
            other => Err(EvalError::BadArgument("number", "number", other.type_name())),
        },
        Builtin::Text => Ok(Operand::Text(match first {
            Operand::Null => String::new(),
            Operand::Bool(b) => b.to_string(),
            Operand::Number(n) => n.to_string(),
            Operand::Text(s) => s.clone(),
            Operand::Temporal(t) => t.to_string(),
            Operand::List(_) => {
                return Err(EvalError::BadArgument("text", "scalar", "list"));
            }
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::parser::parse_program;
    use crate::predicate::ast::Item;

    fn eval_str(source: &str) -> Result<Operand, EvalError> {
        let items = parse_program(source).unwrap();
        let Item::Statement(expr) = &items[0] else {
            panic!("expected a bare expression");
        };
        evaluate(expr, None)
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval_str("1 + 2 * 3").unwrap(), Operand::Number(7.0));
        assert_eq!(eval_str("(1 + 2) * 3").unwrap(), Operand::Number(9.0));
        assert_eq!(eval_str("7 % 4 - -1").unwrap(), Operand::Number(4.0));
        assert_eq!(eval_str("1 / 0").unwrap_err(), EvalError::DivisionByZero);
    }

    #[test]
    fn test_text_concatenation_and_coercion() {
        assert_eq!(
            eval_str("'ab' + 'cd'").unwrap(),
            Operand::Text("abcd".to_string())
        );
        assert_eq!(eval_str("'10' > 9").unwrap(), Operand::Bool(true));
        assert_eq!(eval_str("'10' == 10").unwrap(), Operand::Bool(true));
        assert_eq!(eval_str("'abc' == 10").unwrap(), Operand::Bool(false));
        assert!(eval_str("'abc' < 10").is_err());
    }

    #[test]
    fn test_logic_short_circuit() {
        assert_eq!(eval_str("false && 1").unwrap(), Operand::Bool(false));
        assert_eq!(eval_str("true || 1").unwrap(), Operand::Bool(true));
        assert!(eval_str("true && 1").is_err());
        assert_eq!(eval_str("not false").unwrap(), Operand::Bool(true));
    }

    #[test]
    fn test_membership() {
        assert_eq!(eval_str("2 in [1, 2, 3]").unwrap(), Operand::Bool(true));
        assert_eq!(eval_str("'b' in ['a', 'c']").unwrap(), Operand::Bool(false));
        assert_eq!(eval_str("'ell' in 'hello'").unwrap(), Operand::Bool(true));
        assert!(eval_str("1 in 2").is_err());
    }

    #[test]
    fn test_builtins() {
        assert_eq!(eval_str("len('héllo')").unwrap(), Operand::Number(5.0));
        assert_eq!(eval_str("abs(-3)").unwrap(), Operand::Number(3.0));
        assert_eq!(
            eval_str("upper(trim('  ab '))").unwrap(),
            Operand::Text("AB".to_string())
        );
        assert_eq!(
            eval_str("starts_with('invoice-1', 'inv')").unwrap(),
            Operand::Bool(true)
        );
        assert_eq!(eval_str("is_null(null)").unwrap(), Operand::Bool(true));
        assert_eq!(eval_str("number(' 4.5 ')").unwrap(), Operand::Number(4.5));
        assert_eq!(eval_str("text(3)").unwrap(), Operand::Text("3".to_string()));
        assert_eq!(
            eval_str("matches('AB-12', '^[A-Z]{2}-[0-9]+$')").unwrap(),
            Operand::Bool(true)
        );
    }

    #[test]
    fn test_temporal_comparison_with_text() {
        let date = parse_datetime("2024-05-01").unwrap();
        let expr = Expr::Binary(
            BinaryOp::Gt,
            Box::new(Expr::Param),
            Box::new(Expr::Literal(Operand::Text("2024-01-01".to_string()))),
        );
        assert_eq!(
            evaluate(&expr, Some(&Operand::Temporal(date))).unwrap(),
            Operand::Bool(true)
        );
    }

    #[test]
    fn test_unbound_parameter() {
        assert_eq!(
            evaluate(&Expr::Param, None).unwrap_err(),
            EvalError::Unbound
        );
    }
}
