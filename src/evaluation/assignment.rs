//! Values taken by the model's variables in a solution.

use serde::{Deserialize, Serialize};

use crate::cp::{IntervalId, RouteId, RoutingModel};

/// Value of an interval variable.
///
/// An absent interval has no timing at all; timing only exists in the
/// `Present` branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalValue {
    /// The interval is not part of the solution.
    Absent,
    /// The interval is performed over `[start, end)`.
    Present {
        /// Start time.
        start: i64,
        /// End time.
        end: i64,
    },
}

impl IntervalValue {
    /// Returns `true` for a present interval.
    pub fn is_present(&self) -> bool {
        matches!(self, IntervalValue::Present { .. })
    }

    /// Start time, if present.
    pub fn start(&self) -> Option<i64> {
        match *self {
            IntervalValue::Present { start, .. } => Some(start),
            IntervalValue::Absent => None,
        }
    }

    /// End time, if present.
    pub fn end(&self) -> Option<i64> {
        match *self {
            IntervalValue::Present { end, .. } => Some(end),
            IntervalValue::Absent => None,
        }
    }

    /// Duration, if present.
    pub fn duration(&self) -> Option<i64> {
        match *self {
            IntervalValue::Present { start, end } => Some(end - start),
            IntervalValue::Absent => None,
        }
    }
}

/// A full assignment of a [`RoutingModel`]: one value per interval and, per
/// route, the order of its present intervals.
///
/// # Examples
///
/// ```
/// use cp_routing::cp::{IntervalRole, IntervalVar, RouteVar, RoutingModel};
/// use cp_routing::distance::TravelMatrix;
/// use cp_routing::evaluation::{Assignment, IntervalValue};
///
/// let mut model = RoutingModel::new("m", TravelMatrix::new(1));
/// let id = model.add_interval(
///     IntervalVar::new("T_0_0", IntervalRole::VehicleVisit { vehicle: 0, location: 0 }).as_optional(),
/// );
/// let route = model.add_route(RouteVar::new("R_0", 0, vec![id]));
///
/// let mut assignment = Assignment::absent(&model);
/// assert_eq!(assignment.value(id), IntervalValue::Absent);
///
/// assignment.set(id, IntervalValue::Present { start: 0, end: 5 });
/// assignment.push_to_sequence(route, id);
/// assert_eq!(assignment.route_locations(&model, route), vec![0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Interval values, indexed by [`IntervalId`].
    pub intervals: Vec<IntervalValue>,
    /// Present intervals of each route in visiting order, indexed by
    /// [`RouteId`].
    pub sequences: Vec<Vec<IntervalId>>,
}

impl Assignment {
    /// An assignment of `model` where every interval is absent.
    pub fn absent(model: &RoutingModel) -> Self {
        Self {
            intervals: vec![IntervalValue::Absent; model.interval_count()],
            sequences: vec![Vec::new(); model.routes().len()],
        }
    }

    /// Value of an interval.
    pub fn value(&self, id: IntervalId) -> IntervalValue {
        self.intervals[id.0]
    }

    /// Sets the value of an interval.
    pub fn set(&mut self, id: IntervalId, value: IntervalValue) {
        self.intervals[id.0] = value;
    }

    /// Appends an interval to a route's sequence.
    pub fn push_to_sequence(&mut self, route: RouteId, id: IntervalId) {
        self.sequences[route.0].push(id);
    }

    /// The sequence of a route.
    pub fn sequence(&self, route: RouteId) -> &[IntervalId] {
        &self.sequences[route.0]
    }

    /// Locations visited by a route, in sequence order.
    ///
    /// Intervals that do not belong to the route are skipped.
    pub fn route_locations(&self, model: &RoutingModel, route: RouteId) -> Vec<usize> {
        let arena = model.route(route);
        self.sequence(route)
            .iter()
            .filter_map(|&id| arena.position_of(id))
            .collect()
    }
}
