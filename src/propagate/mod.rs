//! Derivation-chain reasoning: relationship extraction plus the two
//! fixpoint propagators (equality values and numeric ranges).
pub mod constraint;
pub mod interval;
pub mod range;
pub mod relation;

pub use interval::Interval;
pub use range::RangeMap;
pub use relation::{DeriveOp, Relationship};

pub(crate) use constraint::{merged_atoms, propagate};
pub(crate) use range::{check_range_violations, propagate_ranges};
pub(crate) use relation::extract_relationships;
