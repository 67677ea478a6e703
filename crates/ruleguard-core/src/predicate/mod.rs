//! Custom predicates supplied as text in a rule parameter.
//!
//! Sources are compiled into a small expression tree and evaluated without any
//! access to the host: no I/O, no loops, no callbacks. A source is a list of
//! `;`-separated items; the first single-argument function it defines is the
//! predicate.
//!
//! ```
//! use ruleguard_core::predicate::load;
//! use ruleguard_core::Value;
//!
//! let predicate = load("let max = 100; |amount| amount > 0 && amount <= max").unwrap();
//! assert!(predicate.test(&Value::Integer(42)));
//! assert!(!predicate.test(&Value::Integer(120)));
//! ```

mod ast;
mod eval;
mod lexer;
mod parser;

use std::collections::HashMap;

pub use ast::Operand;
pub use eval::EvalError;
pub use parser::MAX_DEPTH;

use ast::{Expr, Item};
use lexer::syntax_error;
use parser::parse_program;

use crate::errors::RuleError;
use crate::types::Value;

/// Longest source accepted, in bytes.
pub const MAX_SOURCE_LEN: usize = 16 * 1024;

/// A compiled single-argument predicate.
#[derive(Debug, Clone)]
pub struct Predicate {
    name: Option<String>,
    param: String,
    body: Expr,
}

impl Predicate {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    /// Evaluate against one value. The body must produce a boolean.
    pub fn evaluate(&self, value: &Value) -> Result<bool, EvalError> {
        let operand = Operand::from(value);
        match eval::evaluate(&self.body, Some(&operand))? {
            Operand::Bool(b) => Ok(b),
            other => Err(EvalError::BadArgument(
                "predicate result",
                "boolean",
                other.type_name(),
            )),
        }
    }

    /// Fail-closed evaluation: any evaluation error is `false`.
    pub fn test(&self, value: &Value) -> bool {
        self.evaluate(value).unwrap_or(false)
    }
}

/// Compile a custom function source into a [`Predicate`].
///
/// Backslashes are removed before parsing. Returns
/// [`RuleError::NoCallableFound`] when the source defines no function.
pub fn load(source: &str) -> Result<Predicate, RuleError> {
    let source = source.replace('\\', "");
    if source.len() > MAX_SOURCE_LEN {
        return Err(syntax_error(
            MAX_SOURCE_LEN,
            format!("source exceeds {} bytes", MAX_SOURCE_LEN),
        ));
    }

    let mut constants: HashMap<String, Operand> = HashMap::new();
    for item in parse_program(&source)? {
        match item {
            Item::Constant {
                name,
                value,
                offset,
            } => {
                let value = resolve(value, None, &constants)?;
                let folded = eval::evaluate(&value, None).map_err(|e| {
                    syntax_error(offset, format!("constant '{}': {}", name, e))
                })?;
                constants.insert(name, folded);
            }
            Item::Function { name, param, body } => {
                let body = resolve(body, Some(&param), &constants)?;
                return Ok(Predicate { name, param, body });
            }
            Item::Statement(expr) => {
                resolve(expr, None, &constants)?;
            }
        }
    }
    Err(RuleError::NoCallableFound)
}

// Bind names to the parameter or to previously defined constants.
fn resolve(
    expr: Expr,
    param: Option<&str>,
    constants: &HashMap<String, Operand>,
) -> Result<Expr, RuleError> {
    let resolved = match expr {
        Expr::Name { name, offset } => {
            if param == Some(name.as_str()) {
                Expr::Param
            } else if let Some(value) = constants.get(&name) {
                Expr::Literal(value.clone())
            } else {
                return Err(syntax_error(offset, format!("unknown name '{}'", name)));
            }
        }
        Expr::List(items) => Expr::List(
            items
                .into_iter()
                .map(|item| resolve(item, param, constants))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Expr::Unary(op, operand) => Expr::Unary(op, Box::new(resolve(*operand, param, constants)?)),
        Expr::Binary(op, left, right) => Expr::Binary(
            op,
            Box::new(resolve(*left, param, constants)?),
            Box::new(resolve(*right, param, constants)?),
        ),
        Expr::Call(builtin, args) => Expr::Call(
            builtin,
            args.into_iter()
                .map(|arg| resolve(arg, param, constants))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Expr::Matches(subject, regex) => {
            Expr::Matches(Box::new(resolve(*subject, param, constants)?), regex)
        }
        other @ (Expr::Literal(_) | Expr::Param) => other,
    };
    Ok(resolved)
}
