//! Domain model types for the VRPTW formulation.
//!
//! Provides the raw instance record handed over by an instance reader, the
//! time window type, and the normalized, immutable problem data that every
//! model builder reads.

mod instance;
mod problem;
mod time_window;

pub use instance::RawInstance;
pub use problem::ProblemData;
pub use time_window::TimeWindow;
