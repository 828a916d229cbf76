//! Arithmetic derivation edges extracted from schema declarations.

use crate::model::{Declaration, Expr, Term, Value};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::fmt;

/// The operation a [`Relationship`] applies to its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeriveOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    /// A pure alias: the target mirrors its single operand.
    Identity,
}

impl DeriveOp {
    /// Applies the binary operation. `None` when dividing by zero: the
    /// derivation is skipped, never an error.
    pub fn apply(self, a: f64, b: f64) -> Option<f64> {
        match self {
            DeriveOp::Add => Some(a + b),
            DeriveOp::Subtract => Some(a - b),
            DeriveOp::Multiply => Some(a * b),
            DeriveOp::Divide => (b != 0.0).then(|| a / b),
            DeriveOp::Identity => Some(a),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            DeriveOp::Add => "+",
            DeriveOp::Subtract => "-",
            DeriveOp::Multiply => "*",
            DeriveOp::Divide => "/",
            DeriveOp::Identity => "=",
        }
    }
}

impl fmt::Display for DeriveOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// States `target = op(operands)` for one declaration.
///
/// Operand order is significant for the non-commutative operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub target: String,
    pub op: DeriveOp,
    pub operands: SmallVec<[Term; 2]>,
}

/// Walks the declarations and emits one relationship per recognized
/// shape. Declarations the engine cannot reason about (nested calls,
/// unknown functions, non-numeric literals) emit nothing: the rest of the
/// schema stays analyzable.
pub(crate) fn extract_relationships(declarations: &[Declaration]) -> Vec<Relationship> {
    declarations.iter().filter_map(extract_one).collect()
}

fn extract_one(declaration: &Declaration) -> Option<Relationship> {
    match &declaration.expr {
        // A bare binding is a pure alias.
        Expr::Variable(name) => Some(Relationship {
            target: declaration.name.clone(),
            op: DeriveOp::Identity,
            operands: smallvec![Term::variable(name.clone())],
        }),
        // A numeric constant binding pins the target outright.
        Expr::Literal(Value::Number(n)) => Some(Relationship {
            target: declaration.name.clone(),
            op: DeriveOp::Identity,
            operands: smallvec![Term::number(*n)],
        }),
        Expr::Call { name, args } if args.len() == 2 => {
            let op = arithmetic_op(name)?;
            let lhs = operand_term(&args[0])?;
            let rhs = operand_term(&args[1])?;
            Some(Relationship {
                target: declaration.name.clone(),
                op,
                operands: smallvec![lhs, rhs],
            })
        }
        _ => None,
    }
}

fn arithmetic_op(name: &str) -> Option<DeriveOp> {
    match name {
        "add" => Some(DeriveOp::Add),
        "sub" | "subtract" => Some(DeriveOp::Subtract),
        "mul" | "multiply" => Some(DeriveOp::Multiply),
        "div" | "divide" => Some(DeriveOp::Divide),
        _ => None,
    }
}

/// Only variable references and numeric literals qualify as operands.
fn operand_term(expr: &Expr) -> Option<Term> {
    match expr {
        Expr::Variable(name) => Some(Term::variable(name.clone())),
        Expr::Literal(Value::Number(n)) => Some(Term::number(*n)),
        Expr::Literal(_) | Expr::Call { .. } => None,
    }
}
