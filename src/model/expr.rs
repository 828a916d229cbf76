//! The slice of the declaration AST this engine inspects.
//!
//! The analyzer hands over full expression trees; the unsat engine only
//! recognizes a closed set of shapes (literal, variable reference, binary
//! arithmetic call) and walks away from everything else. The variants are
//! exhaustively matched throughout, so adding one is a compile error at
//! every inspection site.

use super::types::Value;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// A literal constant (`5`, `"red"`, `true`).
    Literal(Value),
    /// A bare binding or input-field reference.
    Variable(String),
    /// A function application. Only binary arithmetic calls over variable
    /// and numeric-literal arguments are recognized downstream.
    Call { name: String, args: Vec<Expr> },
}

impl Expr {
    pub fn number(value: f64) -> Self {
        Expr::Literal(Value::Number(value))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Expr::Variable(name.into())
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call { name: name.into(), args }
    }
}
