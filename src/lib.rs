//! Static constraint-satisfiability engine for the Verdict rule DSL.
//!
//! The analyzer hands this crate the ground facts it extracted from one
//! schema (comparison atoms, derived-value declarations and input-field
//! domains) and asks a single question: can these ever hold at once?
//! The engine answers with a total boolean predicate ([`UnsatChecker::unsat`]),
//! combining interval bounds, union-find equality reasoning, strict-order
//! cycle detection and fixpoint propagation through arithmetic derivation
//! chains. A `true` verdict means the schema is logically dead and the
//! compiler can reject it before runtime.
//!
//! The engine executes nothing, infers no types and proves no general
//! theorems; it only detects the specific, tractable contradiction
//! classes above, silently ignoring whatever it cannot reason about.

pub mod checks;
pub mod engine;
pub mod model;
pub mod propagate;

// Re-export the public surface for convenient access.
pub use engine::{Analysis, Contradiction, UnsatChecker};
pub use model::{
    Atom, CompareOp, Declaration, DerivedConstraint, DomainSpec, Expr, FieldSpec, Term, Value,
};
pub use propagate::{DeriveOp, Interval, RangeMap, Relationship};
