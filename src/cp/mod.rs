//! Constraint-programming model of the VRPTW.
//!
//! # Key Components
//!
//! - **Variables**: [`IntervalVar`] (visits, optional vehicle visits) and
//!   [`RouteVar`] (per-vehicle sequences over an interval arena)
//! - **Constraints**: [`Constraint`] — NoOverlap with transition times,
//!   PresenceOf, First, Last, Alternative
//! - **Model**: [`RoutingModel`] — variables, constraints and [`Objective`]
//! - **Formulation**: [`vrptw_model`] and the individual builder steps
//!
//! The model is a description only; solving it is left to a backend such as
//! [`crate::backend`].

mod formulation;
mod model;
mod variables;

pub use formulation::{
    assign_each_client_to_one_vehicle, create_route_variables, create_vehicle_visit_variables,
    create_visit_variables, minimize_total_travel_time, no_overlap_between_visits,
    routes_start_and_end_at_depot, vrptw_model, RouteVars, VehicleVisitVars, VisitVars,
};
pub use model::{Constraint, Objective, RoutingModel};
pub use variables::{
    route_name, vehicle_visit_name, visit_name, IntervalId, IntervalRole, IntervalVar, RouteId,
    RouteVar,
};
