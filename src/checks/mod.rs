//! Independent, pure contradiction checks.
//!
//! Each check takes ground facts and returns the first contradiction it
//! can prove, or `None`. The orchestrator composes them cheap-first; every
//! check is also usable (and tested) on its own.
pub mod bounds;
pub mod domain;
pub mod equality;
pub mod ordering;

pub(crate) use bounds::check_bounds;
pub(crate) use domain::check_domains;
pub(crate) use equality::check_equality;
pub(crate) use ordering::check_strict_order;
