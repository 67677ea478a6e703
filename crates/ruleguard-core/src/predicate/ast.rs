use chrono::NaiveDateTime;
use regex::Regex;

use crate::types::Value;

/// Runtime value of the expression language.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    Temporal(NaiveDateTime),
    List(Vec<Operand>),
}

impl Operand {
    pub fn type_name(&self) -> &'static str {
        match self {
            Operand::Null => "null",
            Operand::Bool(_) => "boolean",
            Operand::Number(_) => "number",
            Operand::Text(_) => "text",
            Operand::Temporal(_) => "temporal",
            Operand::List(_) => "list",
        }
    }
}

impl From<&Value> for Operand {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Operand::Null,
            Value::Boolean(b) => Operand::Bool(*b),
            Value::Integer(i) => Operand::Number(*i as f64),
            Value::Float(f) if f.is_nan() => Operand::Null,
            Value::Float(f) => Operand::Number(*f),
            Value::Text(s) => Operand::Text(s.clone()),
            Value::Temporal(dt) => Operand::Temporal(*dt),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    In,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::In => "in",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// Pure functions available to custom predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Len,
    Abs,
    Lower,
    Upper,
    Trim,
    StartsWith,
    EndsWith,
    Contains,
    IsNull,
    Number,
    Text,
}

impl Builtin {
    pub fn lookup(name: &str) -> Option<Self> {
        let builtin = match name {
            "len" => Builtin::Len,
            "abs" => Builtin::Abs,
            "lower" => Builtin::Lower,
            "upper" => Builtin::Upper,
            "trim" => Builtin::Trim,
            "starts_with" => Builtin::StartsWith,
            "ends_with" => Builtin::EndsWith,
            "contains" => Builtin::Contains,
            "is_null" => Builtin::IsNull,
            "number" => Builtin::Number,
            "text" => Builtin::Text,
            _ => return None,
        };
        Some(builtin)
    }

    pub fn arity(&self) -> usize {
        match self {
            Builtin::StartsWith | Builtin::EndsWith | Builtin::Contains => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Operand),
    /// Unresolved identifier, replaced during compilation.
    Name {
        name: String,
        offset: usize,
    },
    Param,
    List(Vec<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Builtin, Vec<Expr>),
    /// `matches(value, 'pattern')`, pattern compiled at load time.
    Matches(Box<Expr>, Regex),
}

#[derive(Debug, Clone)]
pub enum Item {
    Constant {
        name: String,
        value: Expr,
        offset: usize,
    },
    Function {
        name: Option<String>,
        param: String,
        body: Expr,
    },
    Statement(Expr),
}
