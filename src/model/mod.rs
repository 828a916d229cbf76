//! Defines the core data structures consumed by the unsat engine.
pub mod expr;
pub mod types;

// Re-export key types for convenient access
pub use expr::Expr;
pub use types::{
    Atom, CompareOp, Declaration, DerivedConstraint, DomainSpec, FieldSpec, Term, TermId,
    TermTable, Value,
};
