//! Assignment checker that verifies every constraint of a routing model.

use std::collections::BTreeSet;

use super::{Assignment, IntervalValue};
use crate::cp::{Constraint, IntervalId, RouteId, RoutingModel};

/// A constraint violated by an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// The assignment does not have one value per interval and one
    /// sequence per route.
    ShapeMismatch,
    /// A mandatory interval is absent.
    MandatoryAbsent {
        /// The absent interval.
        interval: IntervalId,
    },
    /// A present interval ends before it starts.
    NegativeDuration {
        /// The offending interval.
        interval: IntervalId,
    },
    /// A present interval does not have its fixed size.
    SizeMismatch {
        /// The offending interval.
        interval: IntervalId,
        /// Fixed size.
        expected: i64,
        /// Actual duration.
        actual: i64,
    },
    /// A present interval starts before its earliest start, or before time 0
    /// if its start is unbounded.
    StartTooEarly {
        /// The offending interval.
        interval: IntervalId,
        /// Actual start.
        start: i64,
        /// Earliest start.
        start_min: i64,
    },
    /// A present interval ends after its latest end.
    EndTooLate {
        /// The offending interval.
        interval: IntervalId,
        /// Actual end.
        end: i64,
        /// Latest end.
        end_max: i64,
    },
    /// A route's sequence is not exactly its set of present intervals.
    SequenceMismatch {
        /// The offending route.
        route: RouteId,
    },
    /// Two consecutive visits of a route are closer than the travel time
    /// between their locations (or overlap).
    TransitionViolated {
        /// The offending route.
        route: RouteId,
        /// Location of the earlier visit.
        from: usize,
        /// Location of the later visit.
        to: usize,
        /// Time between end of `from` and start of `to`.
        gap: i64,
        /// Required travel time.
        required: i64,
    },
    /// An interval that must be present is absent.
    PresenceRequired {
        /// The absent interval.
        interval: IntervalId,
    },
    /// A present interval that must lead its route does not.
    NotFirst {
        /// The route.
        route: RouteId,
        /// The interval.
        interval: IntervalId,
    },
    /// A present interval that must close its route does not.
    NotLast {
        /// The route.
        route: RouteId,
        /// The interval.
        interval: IntervalId,
    },
    /// The number of present alternatives does not match the main
    /// interval's presence.
    AlternativeCount {
        /// Main interval.
        main: IntervalId,
        /// Number of present alternatives.
        present: usize,
    },
    /// The selected alternative does not coincide with the main interval.
    AlternativeMisaligned {
        /// Main interval.
        main: IntervalId,
        /// Selected alternative.
        alternative: IntervalId,
    },
}

/// Checks assignments against the constraints of a [`RoutingModel`] and
/// evaluates its objective.
///
/// # Examples
///
/// ```
/// use cp_routing::cp::vrptw_model;
/// use cp_routing::evaluation::{schedule_routes, ModelChecker};
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
/// let assignment = schedule_routes(&model, &[vec![1]]).unwrap();
///
/// let checker = ModelChecker::new(&model);
/// assert!(checker.is_feasible(&assignment));
/// // travel 10 out, 10 service, 10 back, minus service
/// assert_eq!(checker.objective_value(&assignment), Some(20));
/// ```
pub struct ModelChecker<'a> {
    model: &'a RoutingModel,
}

impl<'a> ModelChecker<'a> {
    /// Creates a checker for the given model.
    pub fn new(model: &'a RoutingModel) -> Self {
        Self { model }
    }

    /// Returns `true` if the assignment satisfies every constraint.
    pub fn is_feasible(&self, assignment: &Assignment) -> bool {
        self.check(assignment).is_empty()
    }

    /// Lists every violated constraint.
    pub fn check(&self, assignment: &Assignment) -> Vec<Violation> {
        let model = self.model;
        if assignment.intervals.len() != model.interval_count()
            || assignment.sequences.len() != model.routes().len()
        {
            return vec![Violation::ShapeMismatch];
        }

        let mut violations = Vec::new();
        self.check_intervals(assignment, &mut violations);

        let consistent: Vec<bool> = (0..model.routes().len())
            .map(|r| self.sequence_consistent(assignment, RouteId(r)))
            .collect();
        for (r, &ok) in consistent.iter().enumerate() {
            if !ok {
                violations.push(Violation::SequenceMismatch { route: RouteId(r) });
            }
        }

        for constraint in model.constraints() {
            match constraint {
                Constraint::NoOverlap { route } => {
                    if consistent[route.0] {
                        self.check_transitions(assignment, *route, &mut violations);
                    }
                }
                Constraint::PresenceOf { interval } => {
                    if !assignment.value(*interval).is_present() {
                        violations.push(Violation::PresenceRequired {
                            interval: *interval,
                        });
                    }
                }
                Constraint::First { route, interval } => {
                    if assignment.value(*interval).is_present()
                        && assignment.sequence(*route).first() != Some(interval)
                    {
                        violations.push(Violation::NotFirst {
                            route: *route,
                            interval: *interval,
                        });
                    }
                }
                Constraint::Last { route, interval } => {
                    if assignment.value(*interval).is_present()
                        && assignment.sequence(*route).last() != Some(interval)
                    {
                        violations.push(Violation::NotLast {
                            route: *route,
                            interval: *interval,
                        });
                    }
                }
                Constraint::Alternative { main, alternatives } => {
                    self.check_alternative(assignment, *main, alternatives, &mut violations);
                }
            }
        }

        violations
    }

    /// Objective value of the assignment, `None` if an interval it sums is
    /// absent or the model has no objective.
    pub fn objective_value(&self, assignment: &Assignment) -> Option<i64> {
        let objective = self.model.objective()?;
        let mut total = 0;
        for &id in &objective.end_of {
            total += assignment.value(id).end()?;
        }
        Some(total - objective.offset)
    }

    fn check_intervals(&self, assignment: &Assignment, violations: &mut Vec<Violation>) {
        for (i, var) in self.model.intervals().iter().enumerate() {
            let interval = IntervalId(i);
            let value = assignment.value(interval);
            let (start, end) = match value {
                IntervalValue::Absent => {
                    if !var.optional {
                        violations.push(Violation::MandatoryAbsent { interval });
                    }
                    continue;
                }
                IntervalValue::Present { start, end } => (start, end),
            };

            let duration = value.duration().unwrap_or(0);
            if duration < 0 {
                violations.push(Violation::NegativeDuration { interval });
            }
            if let Some(size) = var.size {
                if duration != size {
                    violations.push(Violation::SizeMismatch {
                        interval,
                        expected: size,
                        actual: duration,
                    });
                }
            }
            let start_min = var.start_min.unwrap_or(0);
            if start < start_min {
                violations.push(Violation::StartTooEarly {
                    interval,
                    start,
                    start_min,
                });
            }
            if let Some(end_max) = var.end_max {
                if end > end_max {
                    violations.push(Violation::EndTooLate {
                        interval,
                        end,
                        end_max,
                    });
                }
            }
        }
    }

    fn sequence_consistent(&self, assignment: &Assignment, route: RouteId) -> bool {
        let arena = self.model.route(route);
        let sequence = assignment.sequence(route);

        let mut seen = BTreeSet::new();
        for &id in sequence {
            if arena.position_of(id).is_none() || !seen.insert(id) {
                return false;
            }
        }
        arena
            .intervals
            .iter()
            .all(|&id| assignment.value(id).is_present() == seen.contains(&id))
    }

    fn check_transitions(&self, assignment: &Assignment, route: RouteId, violations: &mut Vec<Violation>) {
        let arena = self.model.route(route);
        let transitions = self.model.transitions();

        for pair in assignment.sequence(route).windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (Some(from), Some(to)) = (arena.position_of(a), arena.position_of(b)) else {
                continue;
            };
            let (Some(end), Some(start)) = (assignment.value(a).end(), assignment.value(b).start()) else {
                continue;
            };

            let gap = start - end;
            let required = transitions.get(from, to);
            if gap < required {
                violations.push(Violation::TransitionViolated {
                    route,
                    from,
                    to,
                    gap,
                    required,
                });
            }
        }
    }

    fn check_alternative(
        &self,
        assignment: &Assignment,
        main: IntervalId,
        alternatives: &[IntervalId],
        violations: &mut Vec<Violation>,
    ) {
        let main_value = assignment.value(main);
        let present: Vec<IntervalId> = alternatives
            .iter()
            .copied()
            .filter(|&id| assignment.value(id).is_present())
            .collect();

        let expected = usize::from(main_value.is_present());
        if present.len() != expected {
            violations.push(Violation::AlternativeCount {
                main,
                present: present.len(),
            });
            return;
        }

        if let Some(&alternative) = present.first() {
            if assignment.value(alternative) != main_value {
                violations.push(Violation::AlternativeMisaligned { main, alternative });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::vrptw_model;
    use crate::evaluation::schedule_routes;
    use crate::models::RawInstance;
    use crate::transform::instance_to_data;

    /// Line: depot at 0, client 1 at 1, client 2 at 2.
    fn model() -> RoutingModel {
        let instance = RawInstance {
            demand: vec![0, 5, 5],
            edge_weight: vec![
                vec![0.0, 1.0, 2.0],
                vec![1.0, 0.0, 1.0],
                vec![2.0, 1.0, 0.0],
            ],
            service_time: vec![0.0, 1.0, 1.0],
            time_window: vec![[0.0, 100.0], [0.0, 50.0], [0.0, 50.0]],
            vehicles: 2,
            capacity: 10,
        };
        vrptw_model(&instance_to_data(&instance).expect("valid"))
    }

    #[test]
    fn test_scheduled_plan_is_feasible() {
        let model = model();
        let a = schedule_routes(&model, &[vec![1, 2]]).expect("valid plan");
        let checker = ModelChecker::new(&model);
        assert!(checker.check(&a).is_empty());
        // back at depot at 10 + 10 + 10 + 10 + 20 = 60, second vehicle at 0
        assert_eq!(checker.objective_value(&a), Some(40));
    }

    #[test]
    fn test_shape_mismatch() {
        let model = model();
        let mut a = Assignment::absent(&model);
        a.intervals.pop();
        let checker = ModelChecker::new(&model);
        assert_eq!(checker.check(&a), vec![Violation::ShapeMismatch]);
    }

    #[test]
    fn test_all_absent() {
        let model = model();
        let a = Assignment::absent(&model);
        let violations = ModelChecker::new(&model).check(&a);

        let mandatory = violations
            .iter()
            .filter(|v| matches!(v, Violation::MandatoryAbsent { .. }))
            .count();
        let presence = violations
            .iter()
            .filter(|v| matches!(v, Violation::PresenceRequired { .. }))
            .count();
        let alternative = violations
            .iter()
            .filter(|v| matches!(v, Violation::AlternativeCount { present: 0, .. }))
            .count();
        assert_eq!(mandatory, 2);
        assert_eq!(presence, 4);
        // main absent with no alternative present is consistent
        assert_eq!(alternative, 0);
    }

    #[test]
    fn test_transition_violated() {
        let model = model();
        let mut a = schedule_routes(&model, &[vec![1, 2]]).expect("valid plan");
        // Pull client 2 (and its vehicle visit) one unit too early.
        let t2 = model.visit(2).expect("visit");
        let v2 = model.vehicle_visit(0, 2).expect("vehicle visit");
        let IntervalValue::Present { start, end } = a.value(t2) else {
            panic!("client 2 is scheduled");
        };
        let moved = IntervalValue::Present {
            start: start - 1,
            end: end - 1,
        };
        a.set(t2, moved);
        a.set(v2, moved);

        let violations = ModelChecker::new(&model).check(&a);
        assert!(violations.contains(&Violation::TransitionViolated {
            route: RouteId(0),
            from: 1,
            to: 2,
            gap: 9,
            required: 10,
        }));
    }

    #[test]
    fn test_client_served_twice() {
        let model = model();
        let mut a = schedule_routes(&model, &[vec![1, 2], vec![]]).expect("valid plan");
        let v = model.vehicle_visit(1, 2).expect("vehicle visit");
        a.set(v, a.value(model.visit(2).expect("visit")));
        let route = model.route_of(1).expect("route");
        a.sequences[route.0].insert(1, v);

        let violations = ModelChecker::new(&model).check(&a);
        assert!(violations.iter().any(|v| matches!(
            v,
            Violation::AlternativeCount { present: 2, .. }
        )));
    }

    #[test]
    fn test_depot_not_first() {
        let model = model();
        let mut a = schedule_routes(&model, &[vec![1]]).expect("valid plan");
        a.sequences[0].swap(0, 1);

        let violations = ModelChecker::new(&model).check(&a);
        assert!(violations.iter().any(|v| matches!(v, Violation::NotFirst { .. })));
    }

    #[test]
    fn test_sequence_missing_present_interval() {
        let model = model();
        let mut a = schedule_routes(&model, &[vec![1]]).expect("valid plan");
        a.sequences[0].remove(1);

        let violations = ModelChecker::new(&model).check(&a);
        assert!(violations.contains(&Violation::SequenceMismatch { route: RouteId(0) }));
    }

    #[test]
    fn test_misaligned_alternative() {
        let model = model();
        let mut a = schedule_routes(&model, &[vec![1]]).expect("valid plan");
        let t1 = model.visit(1).expect("visit");
        let start = a.value(t1).start().expect("present");
        a.set(t1, IntervalValue::Present { start: start + 5, end: start + 15 });

        let violations = ModelChecker::new(&model).check(&a);
        assert!(violations.iter().any(|v| matches!(v, Violation::AlternativeMisaligned { .. })));
    }

    #[test]
    fn test_unused_vehicle_cannot_travel_back_in_time() {
        let model = model();
        let mut a = schedule_routes(&model, &[vec![1, 2], vec![]]).expect("valid plan");
        let checker = ModelChecker::new(&model);
        assert!(checker.is_feasible(&a));

        let early = IntervalValue::Present {
            start: -1000,
            end: -1000,
        };
        let first = model.vehicle_visit(1, 0).expect("start depot");
        let last = model.vehicle_visit(1, 3).expect("end depot");
        a.set(first, early);
        a.set(last, early);

        let violations = checker.check(&a);
        for interval in [first, last] {
            assert!(violations.contains(&Violation::StartTooEarly {
                interval,
                start: -1000,
                start_min: 0,
            }));
        }
        assert_eq!(checker.objective_value(&a), Some(-960));
    }
}
