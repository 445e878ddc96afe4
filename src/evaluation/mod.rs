//! Solution-side evaluation of routing models.
//!
//! - [`Assignment`] — values of all variables, with absent/present intervals
//! - [`ModelChecker`] — verifies an assignment against every constraint and
//!   evaluates the objective
//! - [`schedule_routes`] — times a per-vehicle client order into an assignment

mod assignment;
mod checker;
mod schedule;

pub use assignment::{Assignment, IntervalValue};
pub use checker::{ModelChecker, Violation};
pub use schedule::schedule_routes;
