//! Solver backends for routing models.
//!
//! - [`lower`] — translate a [`RoutingModel`](crate::cp::RoutingModel) into
//!   a `u-metaheur` [`CpModel`](u_metaheur::cp::CpModel)
//! - [`solve`] — run any [`CpSolver`] under a [`SolverConfig`] time limit
//! - [`routes_from_solution`] — recover per-vehicle location sequences from
//!   named solver output

mod metaheur;

pub use metaheur::{
    assignment_from_solution, lower, presence_name, routes_from_solution, solve, Lowered,
    SolveOutcome,
};
pub use u_metaheur::cp::{CpSolver, SolverConfig, SolverStatus};
