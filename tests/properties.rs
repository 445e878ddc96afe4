//! Property tests of the instance transformer and the routing model.

use cp_routing::cp::{vrptw_model, Constraint};
use cp_routing::evaluation::{schedule_routes, IntervalValue, ModelChecker};
use cp_routing::models::RawInstance;
use cp_routing::transform::instance_to_data;
use proptest::prelude::*;

/// Instances with 1..=5 nodes; times have at most one decimal so they stay
/// integral once scaled.
fn raw_instance() -> impl Strategy<Value = RawInstance> {
    (1usize..=5, 1usize..=3)
        .prop_flat_map(|(n, vehicles)| {
            (
                prop::collection::vec(prop::collection::vec(0.0f64..100.0, n), n),
                prop::collection::vec(0i32..50, n),
                prop::collection::vec(0u32..200, n),
                prop::collection::vec((0u32..5000, 0u32..5000), n),
                Just(vehicles),
            )
        })
        .prop_map(|(edge_weight, demand, service, windows, vehicles)| RawInstance {
            demand,
            edge_weight,
            service_time: service.into_iter().map(|s| f64::from(s) / 10.0).collect(),
            time_window: windows
                .into_iter()
                .map(|(a, b)| [f64::from(a.min(b)) / 10.0, f64::from(a.max(b)) / 10.0])
                .collect(),
            vehicles,
            capacity: 100,
        })
}

/// An instance with a vehicle choice per node (entry 0 is unused).
fn instance_and_plan() -> impl Strategy<Value = (RawInstance, Vec<usize>)> {
    raw_instance().prop_flat_map(|instance| {
        let n = instance.num_nodes();
        let vehicles = instance.vehicles;
        (Just(instance), prop::collection::vec(0..vehicles, n))
    })
}

fn plan_from_choices(choices: &[usize], vehicles: usize) -> Vec<Vec<usize>> {
    let mut plan = vec![Vec::new(); vehicles];
    for (client, &vehicle) in choices.iter().enumerate().skip(1) {
        plan[vehicle].push(client);
    }
    plan
}

fn shifted(value: IntervalValue, delta: i64) -> IntervalValue {
    match value {
        IntervalValue::Present { start, end } => IntervalValue::Present {
            start: start + delta,
            end: end + delta,
        },
        IntervalValue::Absent => IntervalValue::Absent,
    }
}

proptest! {
    #[test]
    fn num_locations_is_nodes_plus_one(instance in raw_instance()) {
        let data = instance_to_data(&instance).unwrap();
        prop_assert_eq!(data.num_locations(), instance.demand.len() + 1);
        prop_assert_eq!(data.edge_weights().size(), data.num_locations());
    }

    #[test]
    fn end_depot_mirrors_start_depot(instance in raw_instance()) {
        let data = instance_to_data(&instance).unwrap();
        let tm = data.edge_weights();
        let last = data.end_depot();
        for i in 0..instance.num_nodes() {
            prop_assert_eq!(tm.get(last, i), tm.get(0, i));
            prop_assert_eq!(tm.get(i, last), tm.get(i, 0));
        }
    }

    #[test]
    fn edge_weights_are_scaled_and_floored(instance in raw_instance()) {
        let data = instance_to_data(&instance).unwrap();
        for (i, row) in instance.edge_weight.iter().enumerate() {
            for (j, &w) in row.iter().enumerate() {
                prop_assert_eq!(data.edge_weights().get(i, j), (w * 10.0).floor() as i64);
            }
        }
    }

    #[test]
    fn model_structure(instance in raw_instance()) {
        let data = instance_to_data(&instance).unwrap();
        let model = vrptw_model(&data);
        let clients = data.clients().len();
        let vehicles = data.num_vehicles();

        prop_assert!(model.validate().is_ok());
        prop_assert_eq!(model.interval_count(), clients + vehicles * data.num_locations());
        prop_assert_eq!(model.routes().len(), vehicles);

        for constraint in model.constraints() {
            match constraint {
                Constraint::First { route, interval } => {
                    prop_assert_eq!(model.route(*route).position_of(*interval), Some(0));
                }
                Constraint::Last { route, interval } => {
                    prop_assert_eq!(
                        model.route(*route).position_of(*interval),
                        Some(data.end_depot())
                    );
                }
                Constraint::Alternative { alternatives, .. } => {
                    prop_assert_eq!(alternatives.len(), vehicles);
                }
                _ => {}
            }
        }
    }

    #[test]
    fn scheduled_plans_assign_each_client_once((instance, choices) in instance_and_plan()) {
        let data = instance_to_data(&instance).unwrap();
        let model = vrptw_model(&data);
        let plan = plan_from_choices(&choices, data.num_vehicles());
        let assignment = schedule_routes(&model, &plan).unwrap();

        for client in data.clients() {
            let present = data
                .vehicles()
                .filter(|&k| assignment.value(model.vehicle_visit(k, client).unwrap()).is_present())
                .count();
            prop_assert_eq!(present, 1);
        }

        for vehicle in data.vehicles() {
            let route = model.route_of(vehicle).unwrap();
            let locations = assignment.route_locations(&model, route);
            prop_assert_eq!(locations.first(), Some(&data.start_depot()));
            prop_assert_eq!(locations.last(), Some(&data.end_depot()));

            for pair in assignment.sequence(route).windows(2) {
                let (i, j) = (
                    model.route(route).position_of(pair[0]).unwrap(),
                    model.route(route).position_of(pair[1]).unwrap(),
                );
                let end = assignment.value(pair[0]).end().unwrap();
                let start = assignment.value(pair[1]).start().unwrap();
                prop_assert!(start >= end + data.edge_weights().get(i, j));
            }
        }
    }

    #[test]
    fn objective_matches_definition((instance, choices) in instance_and_plan()) {
        let data = instance_to_data(&instance).unwrap();
        let model = vrptw_model(&data);
        let plan = plan_from_choices(&choices, data.num_vehicles());
        let assignment = schedule_routes(&model, &plan).unwrap();
        let checker = ModelChecker::new(&model);

        let returns: i64 = data
            .vehicles()
            .map(|k| assignment.value(model.vehicle_visit(k, data.end_depot()).unwrap()).end().unwrap())
            .sum();
        let value = checker.objective_value(&assignment).unwrap();
        prop_assert_eq!(value, returns - data.total_service_time());

        if checker.is_feasible(&assignment) {
            prop_assert!(value >= 0);
        }
    }

    #[test]
    fn shifted_schedules_never_have_negative_objective(
        (instance, choices) in instance_and_plan(),
        deltas in prop::collection::vec(-500i64..500, 3),
    ) {
        let data = instance_to_data(&instance).unwrap();
        let model = vrptw_model(&data);
        let plan = plan_from_choices(&choices, data.num_vehicles());
        let mut assignment = schedule_routes(&model, &plan).unwrap();

        // Move each whole route, visits included, by its own delta.
        for vehicle in data.vehicles() {
            let delta = deltas[vehicle];
            let route = model.route_of(vehicle).unwrap();
            for &id in &model.route(route).intervals {
                assignment.set(id, shifted(assignment.value(id), delta));
            }
            for &client in &plan[vehicle] {
                let visit = model.visit(client).unwrap();
                assignment.set(visit, shifted(assignment.value(visit), delta));
            }
        }

        let checker = ModelChecker::new(&model);
        let moved_early = data.vehicles().any(|k| deltas[k] < 0);
        if moved_early {
            prop_assert!(!checker.is_feasible(&assignment));
        }
        if checker.is_feasible(&assignment) {
            prop_assert!(checker.objective_value(&assignment).unwrap() >= 0);
        }
    }
}
