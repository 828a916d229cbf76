//! The structured contradiction report produced by the engine.
use crate::model::CompareOp;
use serde::Serialize;
use thiserror::Error;

/// Why a schema can never be satisfied.
///
/// A `Contradiction` is a report, not a failure: the engine itself is a
/// total predicate and never errors. The owning analyzer pass attaches
/// source locations and turns the report into a compile-time diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
pub enum Contradiction {
    /// The interval fold left a variable with no admissible value.
    #[error("bounds for '{variable}' are empty: lower {lower} exceeds upper {upper}")]
    EmptyBounds { variable: String, lower: f64, upper: f64 },

    /// Two terms are required to be equal and strictly ordered at once,
    /// directly or through an equality chain.
    #[error("'{lhs}' and '{rhs}' are required to be both equal and strictly ordered")]
    EqualityConflict { lhs: String, rhs: String },

    /// Two terms are required to be equal and distinct at once.
    #[error("'{lhs}' and '{rhs}' are required to be both equal and distinct")]
    ExclusionConflict { lhs: String, rhs: String },

    /// An equality chain forces two different constants together.
    #[error("equality chain forces {lhs} == {rhs}")]
    ConstantConflict { lhs: String, rhs: String },

    /// The strict-order graph contains a cycle.
    #[error("strict ordering cycles back through '{through}'")]
    OrderCycle { through: String },

    /// A comparison can never hold within the variable's computed range.
    #[error("'{variable} {op} {value}' can never hold: computed range is [{lo}, {hi}]")]
    RangeViolation { variable: String, op: CompareOp, value: f64, lo: f64, hi: f64 },

    /// A variable is forced to a value outside its declared domain.
    #[error("'{variable}' is forced to {value}, outside its declared domain")]
    DomainViolation { variable: String, value: String },
}
