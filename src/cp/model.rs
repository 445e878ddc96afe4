//! Routing model definition.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::variables::{
    route_name, vehicle_visit_name, visit_name, IntervalId, IntervalVar, RouteId, RouteVar,
};
use crate::distance::TravelMatrix;

/// A constraint of the routing model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    /// The present intervals of a route do not overlap, and between two
    /// consecutive ones at locations `i` then `j` there is a gap of at least
    /// `transitions[i][j]`.
    NoOverlap {
        /// Route whose intervals are sequenced.
        route: RouteId,
    },

    /// An optional interval must be present.
    PresenceOf {
        /// Interval forced present.
        interval: IntervalId,
    },

    /// If present, `interval` comes first in the route's sequence.
    First {
        /// Sequenced route.
        route: RouteId,
        /// Interval that must lead.
        interval: IntervalId,
    },

    /// If present, `interval` comes last in the route's sequence.
    Last {
        /// Sequenced route.
        route: RouteId,
        /// Interval that must close.
        interval: IntervalId,
    },

    /// Exactly one of `alternatives` is present, and it starts and ends
    /// with `main`.
    Alternative {
        /// The mandatory interval.
        main: IntervalId,
        /// Optional candidates, one of which realizes `main`.
        alternatives: Vec<IntervalId>,
    },
}

/// Minimization objective `Σ end(i) for i in end_of − offset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Objective {
    /// Intervals whose end times are summed.
    pub end_of: Vec<IntervalId>,
    /// Constant subtracted from the sum.
    pub offset: i64,
}

/// A solver-agnostic description of the VRPTW as interval, sequence and
/// presence decisions.
///
/// Variables live in arenas and are referenced by [`IntervalId`] and
/// [`RouteId`]; names are kept unique so that solver output can be mapped
/// back to variables.
///
/// # Examples
///
/// ```
/// use cp_routing::cp::{Constraint, IntervalRole, IntervalVar, RouteVar, RoutingModel};
/// use cp_routing::distance::TravelMatrix;
///
/// let mut model = RoutingModel::new("example", TravelMatrix::new(2));
/// let a = model.add_interval(
///     IntervalVar::new("T_0_0", IntervalRole::VehicleVisit { vehicle: 0, location: 0 }).as_optional(),
/// );
/// let b = model.add_interval(
///     IntervalVar::new("T_0_1", IntervalRole::VehicleVisit { vehicle: 0, location: 1 }).as_optional(),
/// );
/// let route = model.add_route(RouteVar::new("R_0", 0, vec![a, b]));
/// model.add_constraint(Constraint::NoOverlap { route });
/// assert!(model.validate().is_ok());
/// assert_eq!(model.find_interval("T_0_1"), Some(b));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingModel {
    name: String,
    intervals: Vec<IntervalVar>,
    routes: Vec<RouteVar>,
    constraints: Vec<Constraint>,
    objective: Option<Objective>,
    transitions: TravelMatrix,
    index: BTreeMap<String, IntervalId>,
}

impl RoutingModel {
    /// Creates an empty model sequencing routes with the given transition
    /// times.
    pub fn new(name: impl Into<String>, transitions: TravelMatrix) -> Self {
        Self {
            name: name.into(),
            intervals: Vec::new(),
            routes: Vec::new(),
            constraints: Vec::new(),
            objective: None,
            transitions,
            index: BTreeMap::new(),
        }
    }

    /// Model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers an interval variable and returns its id.
    pub fn add_interval(&mut self, var: IntervalVar) -> IntervalId {
        let id = IntervalId(self.intervals.len());
        self.index.insert(var.name.clone(), id);
        self.intervals.push(var);
        id
    }

    /// Registers a route variable and returns its id.
    pub fn add_route(&mut self, route: RouteVar) -> RouteId {
        let id = RouteId(self.routes.len());
        self.routes.push(route);
        id
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Sets the objective.
    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    /// The interval variable with the given id.
    pub fn interval(&self, id: IntervalId) -> &IntervalVar {
        &self.intervals[id.0]
    }

    /// The route variable with the given id.
    pub fn route(&self, id: RouteId) -> &RouteVar {
        &self.routes[id.0]
    }

    /// All interval variables, indexed by [`IntervalId`].
    pub fn intervals(&self) -> &[IntervalVar] {
        &self.intervals
    }

    /// All route variables, indexed by [`RouteId`].
    pub fn routes(&self) -> &[RouteVar] {
        &self.routes
    }

    /// All constraints, in insertion order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// The objective, if set.
    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    /// Transition times used by [`Constraint::NoOverlap`].
    pub fn transitions(&self) -> &TravelMatrix {
        &self.transitions
    }

    /// Looks up an interval by name.
    pub fn find_interval(&self, name: &str) -> Option<IntervalId> {
        self.index.get(name).copied()
    }

    /// The visit interval of `client`, if the model has one.
    pub fn visit(&self, client: usize) -> Option<IntervalId> {
        self.find_interval(&visit_name(client))
    }

    /// The interval of `vehicle` at `location`, if the model has one.
    pub fn vehicle_visit(&self, vehicle: usize, location: usize) -> Option<IntervalId> {
        self.find_interval(&vehicle_visit_name(vehicle, location))
    }

    /// The route of `vehicle`, if the model has one.
    pub fn route_of(&self, vehicle: usize) -> Option<RouteId> {
        let name = route_name(vehicle);
        self.routes
            .iter()
            .position(|r| r.name == name)
            .map(RouteId)
    }

    /// Number of interval variables.
    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    /// Number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    /// Upper bound on any meaningful time in the model: the latest bounded
    /// end plus the longest transition.
    pub fn horizon(&self) -> i64 {
        let latest_end = self
            .intervals
            .iter()
            .filter_map(|iv| iv.end_max)
            .max()
            .unwrap_or(0);
        latest_end + self.transitions.max()
    }

    /// Checks that every referenced variable exists and that routes fit the
    /// transition matrix.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.intervals.len();
        let check = |id: &IntervalId| {
            if id.0 >= n {
                Err(format!("undefined interval: {}", id.0))
            } else {
                Ok(())
            }
        };
        let check_route = |id: &RouteId| {
            if id.0 >= self.routes.len() {
                Err(format!("undefined route: {}", id.0))
            } else {
                Ok(())
            }
        };

        for route in &self.routes {
            if route.len() > self.transitions.size() {
                return Err(format!(
                    "route {} has {} intervals but transitions cover {} locations",
                    route.name,
                    route.len(),
                    self.transitions.size()
                ));
            }
            route.intervals.iter().try_for_each(check)?;
        }

        for constraint in &self.constraints {
            match constraint {
                Constraint::NoOverlap { route } => check_route(route)?,
                Constraint::PresenceOf { interval } => {
                    check(interval)?;
                    if !self.intervals[interval.0].optional {
                        return Err(format!(
                            "presence constraint on mandatory interval: {}",
                            self.intervals[interval.0].name
                        ));
                    }
                }
                Constraint::First { route, interval } | Constraint::Last { route, interval } => {
                    check_route(route)?;
                    check(interval)?;
                    if self.routes[route.0].position_of(*interval).is_none() {
                        return Err(format!(
                            "interval {} is not sequenced by route {}",
                            self.intervals[interval.0].name, self.routes[route.0].name
                        ));
                    }
                }
                Constraint::Alternative { main, alternatives } => {
                    check(main)?;
                    alternatives.iter().try_for_each(check)?;
                }
            }
        }

        if let Some(objective) = &self.objective {
            objective.end_of.iter().try_for_each(check)?;
        }
        Ok(())
    }

    /// Serializes the model to JSON for an external solver.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> crate::error::Result<String> {
        serde_json::to_string(self).map_err(|e| crate::error::Error::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cp::IntervalRole;

    fn vv(vehicle: usize, location: usize) -> IntervalVar {
        IntervalVar::new(
            vehicle_visit_name(vehicle, location),
            IntervalRole::VehicleVisit { vehicle, location },
        )
        .as_optional()
    }

    #[test]
    fn test_model_creation() {
        let mut model = RoutingModel::new("test", TravelMatrix::new(3));
        let ids: Vec<_> = (0..3).map(|l| model.add_interval(vv(0, l))).collect();
        let route = model.add_route(RouteVar::new(route_name(0), 0, ids.clone()));
        model.add_constraint(Constraint::NoOverlap { route });
        model.add_constraint(Constraint::First {
            route,
            interval: ids[0],
        });
        model.set_objective(Objective {
            end_of: vec![ids[2]],
            offset: 0,
        });

        assert_eq!(model.name(), "test");
        assert_eq!(model.interval_count(), 3);
        assert_eq!(model.constraint_count(), 2);
        assert_eq!(model.route_of(0), Some(route));
        assert_eq!(model.vehicle_visit(0, 2), Some(ids[2]));
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_undefined_interval() {
        let mut model = RoutingModel::new("test", TravelMatrix::new(1));
        model.add_constraint(Constraint::Alternative {
            main: IntervalId(0),
            alternatives: vec![],
        });
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_presence_on_mandatory_interval() {
        let mut model = RoutingModel::new("test", TravelMatrix::new(2));
        let id = model.add_interval(IntervalVar::new(visit_name(1), IntervalRole::Visit { client: 1 }));
        model.add_constraint(Constraint::PresenceOf { interval: id });
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_first_outside_route() {
        let mut model = RoutingModel::new("test", TravelMatrix::new(2));
        let a = model.add_interval(vv(0, 0));
        let b = model.add_interval(vv(1, 0));
        let route = model.add_route(RouteVar::new(route_name(0), 0, vec![a]));
        model.add_constraint(Constraint::Last { route, interval: b });
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_route_larger_than_transitions() {
        let mut model = RoutingModel::new("test", TravelMatrix::new(1));
        let a = model.add_interval(vv(0, 0));
        let b = model.add_interval(vv(0, 1));
        model.add_route(RouteVar::new(route_name(0), 0, vec![a, b]));
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_horizon() {
        let tm = TravelMatrix::from_data(2, vec![0, 7, 9, 0]).expect("valid");
        let mut model = RoutingModel::new("test", tm);
        model.add_interval(
            IntervalVar::new(visit_name(1), IntervalRole::Visit { client: 1 }).with_end_max(100),
        );
        model.add_interval(vv(0, 0));
        assert_eq!(model.horizon(), 109);
    }
}
