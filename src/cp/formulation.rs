//! VRPTW formulation as an interval/sequence model.
//!
//! # Formulation
//!
//! - `T_i`: mandatory visit interval of client `i`, size = service time,
//!   start ≥ window open, end ≤ window close + service time.
//! - `T_k_i`: optional interval of vehicle `k` at location `i`, depots
//!   included; its presence means "vehicle `k` visits `i`".
//! - `R_k`: sequence of the `T_k_i` of vehicle `k`.
//!
//! ```text
//! min   Σ_k EndOf(T_k_{n+1}) − Σ_i D_i
//! s.t.  NoOverlap(R_k, edge_weights)             ∀ k
//!       PresenceOf(T_k_0) = PresenceOf(T_k_{n+1}) = 1    ∀ k
//!       First(R_k, T_k_0), Last(R_k, T_k_{n+1})  ∀ k
//!       Alternative(T_i, { T_k_i : k })          ∀ i
//! ```
//!
//! The end-depot interval ends when the vehicle is back, so its end is the
//! route's travel, waiting and service time; subtracting all service time
//! leaves travel plus waiting.
//!
//! Vehicle capacity is not constrained: `capacity` and `demand` are carried
//! in [`ProblemData`] but no load constraint is added.
//!
//! # Reference
//!
//! Laborie, P., Rogerie, J., Shaw, P., & Vilím, P. (2018). "IBM ILOG CP
//! optimizer for scheduling", *Constraints* 23(2), 210-250.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::model::{Constraint, Objective, RoutingModel};
use super::variables::{
    route_name, vehicle_visit_name, visit_name, IntervalId, IntervalRole, IntervalVar, RouteId,
    RouteVar,
};
use crate::models::ProblemData;

/// Client → visit interval.
pub type VisitVars = BTreeMap<usize, IntervalId>;

/// (vehicle, location) → optional interval.
pub type VehicleVisitVars = BTreeMap<(usize, usize), IntervalId>;

/// Vehicle → route variable.
pub type RouteVars = BTreeMap<usize, RouteId>;

/// Builds the complete VRPTW model for the given data.
///
/// # Examples
///
/// ```
/// use cp_routing::cp::vrptw_model;
/// use cp_routing::models::RawInstance;
/// use cp_routing::transform::instance_to_data;
///
/// let instance = RawInstance {
///     demand: vec![0, 10, 10],
///     edge_weight: vec![
///         vec![0.0, 1.0, 1.0],
///         vec![1.0, 0.0, 1.0],
///         vec![1.0, 1.0, 0.0],
///     ],
///     service_time: vec![0.0, 1.0, 1.0],
///     time_window: vec![[0.0, 100.0], [0.0, 100.0], [0.0, 100.0]],
///     vehicles: 2,
///     capacity: 20,
/// };
/// let data = instance_to_data(&instance).unwrap();
/// let model = vrptw_model(&data);
///
/// // 2 visits + 2 vehicles × 4 locations
/// assert_eq!(model.interval_count(), 10);
/// assert_eq!(model.routes().len(), 2);
/// assert!(model.validate().is_ok());
/// ```
pub fn vrptw_model(data: &ProblemData) -> RoutingModel {
    let mut model = RoutingModel::new("vrptw", data.edge_weights().clone());

    let visits = create_visit_variables(&mut model, data);
    let vvisits = create_vehicle_visit_variables(&mut model, data);
    let routes = create_route_variables(&mut model, data, &vvisits);

    minimize_total_travel_time(&mut model, data, &vvisits);

    no_overlap_between_visits(&mut model, data, &routes);
    routes_start_and_end_at_depot(&mut model, data, &vvisits, &routes);
    assign_each_client_to_one_vehicle(&mut model, data, &visits, &vvisits);

    info!(
        intervals = model.interval_count(),
        routes = model.routes().len(),
        constraints = model.constraint_count(),
        "built vrptw model"
    );
    model
}

/// Creates the visit interval `T_i` of every client.
///
/// The interval covers service only, not the travel to the client.
pub fn create_visit_variables(model: &mut RoutingModel, data: &ProblemData) -> VisitVars {
    let mut visits = VisitVars::new();

    for client in data.clients() {
        let service_time = data.service_time(client);
        let tw = data.time_window(client);
        let var = IntervalVar::new(visit_name(client), IntervalRole::Visit { client })
            .with_size(service_time)
            .with_start_min(tw.earliest())
            .with_end_max(tw.end_max(service_time));

        visits.insert(client, model.add_interval(var));
    }

    debug!(count = visits.len(), "created visit variables");
    visits
}

/// Creates the optional interval `T_k_i` for every vehicle and location.
pub fn create_vehicle_visit_variables(
    model: &mut RoutingModel,
    data: &ProblemData,
) -> VehicleVisitVars {
    let mut vvisits = VehicleVisitVars::new();

    for vehicle in data.vehicles() {
        for location in data.locations() {
            let var = IntervalVar::new(
                vehicle_visit_name(vehicle, location),
                IntervalRole::VehicleVisit { vehicle, location },
            )
            .as_optional();
            vvisits.insert((vehicle, location), model.add_interval(var));
        }
    }

    debug!(count = vvisits.len(), "created vehicle visit variables");
    vvisits
}

/// Creates the route variable `R_k` of every vehicle over its intervals in
/// location order.
pub fn create_route_variables(
    model: &mut RoutingModel,
    data: &ProblemData,
    vvisits: &VehicleVisitVars,
) -> RouteVars {
    let mut routes = RouteVars::new();

    for vehicle in data.vehicles() {
        let intervals = data
            .locations()
            .map(|loc| vvisits[&(vehicle, loc)])
            .collect();
        let route = RouteVar::new(route_name(vehicle), vehicle, intervals);
        routes.insert(vehicle, model.add_route(route));
    }

    debug!(count = routes.len(), "created route variables");
    routes
}

/// Minimizes total travel plus waiting time: the summed end times of the
/// end-depot intervals minus all client service time.
pub fn minimize_total_travel_time(
    model: &mut RoutingModel,
    data: &ProblemData,
    vvisits: &VehicleVisitVars,
) {
    let last = data.end_depot();
    let end_of = data.vehicles().map(|k| vvisits[&(k, last)]).collect();

    model.set_objective(Objective {
        end_of,
        offset: data.total_service_time(),
    });
}

/// Visits of a vehicle never overlap and respect travel times between
/// consecutive locations.
pub fn no_overlap_between_visits(model: &mut RoutingModel, data: &ProblemData, routes: &RouteVars) {
    for vehicle in data.vehicles() {
        model.add_constraint(Constraint::NoOverlap {
            route: routes[&vehicle],
        });
    }
}

/// Every route starts at the start depot and ends at the end depot.
pub fn routes_start_and_end_at_depot(
    model: &mut RoutingModel,
    data: &ProblemData,
    vvisits: &VehicleVisitVars,
    routes: &RouteVars,
) {
    for vehicle in data.vehicles() {
        let route = routes[&vehicle];
        let first_visit = vvisits[&(vehicle, data.start_depot())];
        let last_visit = vvisits[&(vehicle, data.end_depot())];

        model.add_constraint(Constraint::PresenceOf {
            interval: first_visit,
        });
        model.add_constraint(Constraint::PresenceOf {
            interval: last_visit,
        });
        model.add_constraint(Constraint::First {
            route,
            interval: first_visit,
        });
        model.add_constraint(Constraint::Last {
            route,
            interval: last_visit,
        });
    }
}

/// Each client is served by exactly one vehicle, at the time of its visit.
pub fn assign_each_client_to_one_vehicle(
    model: &mut RoutingModel,
    data: &ProblemData,
    visits: &VisitVars,
    vvisits: &VehicleVisitVars,
) {
    for client in data.clients() {
        let alternatives = data.vehicles().map(|k| vvisits[&(k, client)]).collect();
        model.add_constraint(Constraint::Alternative {
            main: visits[&client],
            alternatives,
        });
    }
}
