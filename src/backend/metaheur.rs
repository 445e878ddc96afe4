//! Adapter to the `u-metaheur` CP modeling layer.
//!
//! Lowers a [`RoutingModel`] into a [`CpModel`], runs any [`CpSolver`] on
//! it, and maps the named solver output back to routes.
//!
//! # Lowering
//!
//! | Routing model                 | `u-metaheur`                                    |
//! |-------------------------------|-------------------------------------------------|
//! | interval, free bounds         | interval over `[0, horizon]`, variable duration |
//! | optional interval             | `as_optional`, literal `<name>_present`         |
//! | `PresenceOf`                  | presence literal fixed to `true`                |
//! | `NoOverlap` on a route        | `NoOverlap` on the route's intervals            |
//! | `First` / `Last`              | `Precedence` with depot travel times            |
//! | `Alternative`                 | `Alternative`                                   |
//! | objective                     | `Minimize` over end-depot interval names        |
//!
//! `u-metaheur` has no sequence-dependent transition times, so travel times
//! between two clients are dropped from the lowered model and reported in
//! [`Lowered::relaxed`]. Its objectives are linear over integer variables
//! and cannot reference an interval end, so the objective terms name the
//! end-depot intervals and are reported there too. The constant objective
//! offset is kept in [`Lowered::objective_offset`].
//!
//! Solver output is therefore checked against the full routing model by
//! [`solve`] before it is reported.

use std::collections::BTreeSet;

use tracing::{debug, warn};
use u_metaheur::cp::{
    BoolVar, Constraint as CpConstraint, CpModel, CpSolution, CpSolver, IntervalVar as CpInterval,
    Objective as CpObjective, SolverConfig, SolverStatus,
};

use crate::cp::{Constraint, IntervalId, RouteId, RoutingModel};
use crate::evaluation::{Assignment, IntervalValue, ModelChecker, Violation};

/// A routing model lowered for a `u-metaheur` solver.
#[derive(Debug, Clone)]
pub struct Lowered {
    /// The lowered model.
    pub model: CpModel,
    /// Constraints of the routing model that the lowered model only
    /// approximates.
    pub relaxed: Vec<String>,
    /// Constant to subtract from the lowered objective.
    pub objective_offset: i64,
}

/// Result of solving a routing model.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    /// Solver status, passed through unchanged.
    pub status: SolverStatus,
    /// Visited locations per vehicle, depots included. Empty unless a
    /// solution was found.
    pub routes: Vec<Vec<usize>>,
    /// Constraints of the routing model the solver output violates. The
    /// routes are only a solution of the routing model when this is empty.
    pub violations: Vec<Violation>,
    /// Constraints the solver only saw approximated, from [`Lowered::relaxed`].
    pub relaxed: Vec<String>,
    /// Objective value of the solution, if one was found and it satisfies
    /// the routing model.
    pub objective_value: Option<i64>,
}

impl SolveOutcome {
    /// Returns `true` if the routes satisfy every constraint of the model.
    pub fn is_valid(&self) -> bool {
        !self.routes.is_empty() && self.violations.is_empty()
    }
}

/// Name of the presence literal of an optional interval.
pub fn presence_name(interval: &str) -> String {
    format!("{interval}_present")
}

/// Lowers a routing model into a `u-metaheur` CP model.
///
/// Client-to-client travel times and the objective over interval ends have
/// no exact counterpart and are listed in [`Lowered::relaxed`].
///
/// # Examples
///
/// ```
/// use cp_routing::backend::lower;
/// use cp_routing::cp::vrptw_model;
/// use cp_routing::models::RawInstance;
/// use cp_routing::transform::instance_to_data;
///
/// let instance = RawInstance {
///     demand: vec![0, 10],
///     edge_weight: vec![vec![0.0, 1.0], vec![1.0, 0.0]],
///     service_time: vec![0.0, 1.0],
///     time_window: vec![[0.0, 100.0], [0.0, 50.0]],
///     vehicles: 1,
///     capacity: 10,
/// };
/// let model = vrptw_model(&instance_to_data(&instance).unwrap());
/// let lowered = lower(&model);
///
/// assert_eq!(lowered.model.interval_count(), model.interval_count());
/// assert!(lowered.model.validate().is_ok());
/// assert_eq!(lowered.objective_offset, 10);
/// ```
pub fn lower(model: &RoutingModel) -> Lowered {
    let horizon = model.horizon();
    let mut cp = CpModel::new(model.name(), horizon);
    let mut relaxed = Vec::new();

    let forced: BTreeSet<IntervalId> = model
        .constraints()
        .iter()
        .filter_map(|c| match c {
            Constraint::PresenceOf { interval } => Some(*interval),
            _ => None,
        })
        .collect();

    for (i, var) in model.intervals().iter().enumerate() {
        let start_min = var.start_min.unwrap_or(0);
        let end_max = var.end_max.unwrap_or(horizon);
        let mut lowered = match var.size {
            Some(size) => CpInterval::new(&var.name, start_min, end_max - size, size, end_max),
            None => CpInterval::new(&var.name, start_min, end_max, 0, end_max)
                .with_variable_duration(0, end_max - start_min),
        };

        if var.optional {
            let literal = presence_name(&var.name);
            lowered = lowered.as_optional(&literal);
            let presence = if forced.contains(&IntervalId(i)) {
                BoolVar::fixed(&literal, true)
            } else {
                BoolVar::new(&literal)
            };
            lowered.presence = Some(presence.clone());
            cp.add_bool_var(presence);
        }
        cp.add_interval(lowered);
    }

    let transitions = model.transitions();
    let name = |id: IntervalId| model.interval(id).name.clone();

    for constraint in model.constraints() {
        match constraint {
            Constraint::NoOverlap { route } => {
                let arena = model.route(*route);
                cp.add_no_overlap(arena.intervals.iter().map(|&id| name(id)).collect());
                if arena.len() > 3 {
                    relaxed.push(format!("{}: travel times between client visits", arena.name));
                }
            }
            Constraint::PresenceOf { .. } => {}
            Constraint::First { route, interval } => {
                let arena = model.route(*route);
                let from = arena.position_of(*interval).unwrap_or(0);
                for (to, &other) in arena.intervals.iter().enumerate() {
                    if other != *interval {
                        cp.add_precedence(name(*interval), name(other), transitions.get(from, to));
                    }
                }
            }
            Constraint::Last { route, interval } => {
                let arena = model.route(*route);
                let to = arena.position_of(*interval).unwrap_or(arena.len() - 1);
                for (from, &other) in arena.intervals.iter().enumerate() {
                    if other != *interval {
                        cp.add_precedence(name(other), name(*interval), transitions.get(from, to));
                    }
                }
            }
            Constraint::Alternative { main, alternatives } => {
                cp.add_constraint(CpConstraint::Alternative {
                    main: name(*main),
                    alternatives: alternatives.iter().map(|&id| name(id)).collect(),
                });
            }
        }
    }

    let objective_offset = match model.objective() {
        Some(objective) => {
            cp.set_objective(CpObjective::Minimize {
                terms: objective.end_of.iter().map(|&id| (name(id), 1.0)).collect(),
            });
            relaxed.push("objective: terms name interval ends, not integer variables".to_string());
            objective.offset
        }
        None => 0,
    };

    if !relaxed.is_empty() {
        warn!(count = relaxed.len(), "lowered model relaxes transition times");
    }
    debug!(
        intervals = cp.interval_count(),
        constraints = cp.constraint_count(),
        horizon,
        "lowered routing model"
    );

    Lowered {
        model: cp,
        relaxed,
        objective_offset,
    }
}

/// Lowers the model, solves it within `config`'s limits and reports routes.
///
/// Infeasibility and timeouts are reported through
/// [`SolveOutcome::status`]; they are not errors. The status is passed
/// through unchanged, while the solver output is checked against the
/// routing model: violations are listed in [`SolveOutcome::violations`] and
/// suppress the objective value.
pub fn solve<S: CpSolver>(model: &RoutingModel, solver: &S, config: &SolverConfig) -> SolveOutcome {
    let Lowered { model: cp, relaxed, .. } = lower(model);
    let solution = solver.solve(&cp, config);
    debug!(status = ?solution.status, time_ms = solution.solve_time_ms, "solver finished");

    if !solution.is_solution_found() {
        return SolveOutcome {
            status: solution.status,
            routes: Vec::new(),
            violations: Vec::new(),
            relaxed,
            objective_value: None,
        };
    }

    let assignment = assignment_from_solution(model, &solution);
    let checker = ModelChecker::new(model);
    let violations = checker.check(&assignment);
    let objective_value = if violations.is_empty() {
        checker.objective_value(&assignment)
    } else {
        warn!(
            status = ?solution.status,
            violations = violations.len(),
            "solver output violates the routing model"
        );
        None
    };

    SolveOutcome {
        status: solution.status,
        routes: (0..model.routes().len())
            .map(|r| assignment.route_locations(model, RouteId(r)))
            .collect(),
        violations,
        relaxed,
        objective_value,
    }
}

/// Reads solver output back into an [`Assignment`] of the routing model.
///
/// Intervals are matched by name. Each route's sequence is its present
/// intervals ordered by start, then end, then location.
pub fn assignment_from_solution(model: &RoutingModel, solution: &CpSolution) -> Assignment {
    let mut assignment = Assignment::absent(model);

    for (i, var) in model.intervals().iter().enumerate() {
        if let Some(s) = solution.intervals.get(&var.name) {
            if s.is_present {
                assignment.set(
                    IntervalId(i),
                    IntervalValue::Present {
                        start: s.start,
                        end: s.end,
                    },
                );
            }
        }
    }

    for (r, arena) in model.routes().iter().enumerate() {
        let mut present: Vec<(i64, i64, usize, IntervalId)> = arena
            .intervals
            .iter()
            .enumerate()
            .filter_map(|(location, &id)| match assignment.value(id) {
                IntervalValue::Present { start, end } => Some((start, end, location, id)),
                IntervalValue::Absent => None,
            })
            .collect();
        present.sort();
        assignment.sequences[r] = present.into_iter().map(|(_, _, _, id)| id).collect();
    }

    assignment
}

/// Visited locations of every vehicle, in order, from solver output.
pub fn routes_from_solution(model: &RoutingModel, solution: &CpSolution) -> Vec<Vec<usize>> {
    let assignment = assignment_from_solution(model, solution);
    (0..model.routes().len())
        .map(|r| assignment.route_locations(model, RouteId(r)))
        .collect()
}
