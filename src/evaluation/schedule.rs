//! Forward timing of a route plan.

use tracing::debug;

use super::{Assignment, IntervalValue};
use crate::cp::{RouteId, RoutingModel};
use crate::error::{Error, Result};

/// Times a route plan into an [`Assignment`] of the model.
///
/// `plan[k]` lists the clients of vehicle `k` in visiting order, depots
/// excluded; vehicles without an entry drive an empty route. Each vehicle
/// leaves the start depot at time 0, travels, waits for the window to open
/// if early, serves, and finally returns to the end depot.
///
/// Window closings are not enforced here: a late arrival yields an
/// assignment that [`ModelChecker`](super::ModelChecker) rejects. Clients
/// missing from the plan stay absent.
///
/// # Errors
///
/// [`Error::TooManyRoutes`] if the plan has more routes than the model has
/// vehicles, [`Error::UnknownLocation`] if it lists a location that is not a
/// client of the model.
///
/// # Examples
///
/// ```
/// use cp_routing::cp::vrptw_model;
/// use cp_routing::evaluation::schedule_routes;
/// use cp_routing::models::RawInstance;
/// use cp_routing::transform::instance_to_data;
///
/// let instance = RawInstance {
///     demand: vec![0, 10],
///     edge_weight: vec![vec![0.0, 1.0], vec![1.0, 0.0]],
///     service_time: vec![0.0, 1.0],
///     time_window: vec![[0.0, 100.0], [3.0, 50.0]],
///     vehicles: 1,
///     capacity: 10,
/// };
/// let model = vrptw_model(&instance_to_data(&instance).unwrap());
/// let assignment = schedule_routes(&model, &[vec![1]]).unwrap();
///
/// // arrives at 10, waits until 30, serves for 10
/// let visit = assignment.value(model.visit(1).unwrap());
/// assert_eq!(visit.start(), Some(30));
/// assert_eq!(visit.end(), Some(40));
/// ```
pub fn schedule_routes(model: &RoutingModel, plan: &[Vec<usize>]) -> Result<Assignment> {
    let vehicles = model.routes().len();
    if plan.len() > vehicles {
        return Err(Error::TooManyRoutes {
            routes: plan.len(),
            vehicles,
        });
    }

    let transitions = model.transitions();
    let start_depot = 0;
    let end_depot = transitions.size() - 1;
    let mut assignment = Assignment::absent(model);

    for (r, arena) in model.routes().iter().enumerate() {
        let vehicle = arena.vehicle;
        let route = RouteId(r);
        let clients = plan.get(vehicle).map(Vec::as_slice).unwrap_or(&[]);

        let depot_visit = |location| {
            model
                .vehicle_visit(vehicle, location)
                .ok_or(Error::UnknownLocation { vehicle, location })
        };

        let first = depot_visit(start_depot)?;
        assignment.set(first, IntervalValue::Present { start: 0, end: 0 });
        assignment.push_to_sequence(route, first);

        let mut time = 0;
        let mut prev = start_depot;
        for &client in clients {
            let unknown = Error::UnknownLocation {
                vehicle,
                location: client,
            };
            if client == start_depot || client == end_depot {
                return Err(unknown);
            }
            let (Some(visit), Some(vvisit)) = (model.visit(client), model.vehicle_visit(vehicle, client)) else {
                return Err(unknown);
            };

            let var = model.interval(visit);
            let arrival = time + transitions.get(prev, client);
            let start = arrival.max(var.start_min.unwrap_or(0));
            let end = start + var.size.unwrap_or(0);

            let value = IntervalValue::Present { start, end };
            assignment.set(visit, value);
            assignment.set(vvisit, value);
            assignment.push_to_sequence(route, vvisit);

            time = end;
            prev = client;
        }

        let last = depot_visit(end_depot)?;
        let arrival = time + transitions.get(prev, end_depot);
        assignment.set(
            last,
            IntervalValue::Present {
                start: arrival,
                end: arrival,
            },
        );
        assignment.push_to_sequence(route, last);

        debug!(vehicle, clients = clients.len(), return_time = arrival, "scheduled route");
    }

    Ok(assignment)
}
