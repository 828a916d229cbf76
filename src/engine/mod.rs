//! The orchestrated unsat pipeline and its diagnostics surface.
pub mod checker;
pub mod error;
pub mod trace;

pub use checker::{Analysis, UnsatChecker};
pub use error::Contradiction;
