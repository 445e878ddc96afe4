//! Interval and route variables of the routing model.

use serde::{Deserialize, Serialize};

/// Index of an interval variable in its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntervalId(pub usize);

/// Index of a route variable in its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RouteId(pub usize);

/// What an interval variable stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntervalRole {
    /// Service at a client, whoever performs it.
    Visit {
        /// Client index.
        client: usize,
    },
    /// Candidate visit of a location by one vehicle.
    VehicleVisit {
        /// Vehicle index.
        vehicle: usize,
        /// Location index (depots included).
        location: usize,
    },
}

/// Name of the visit interval of `client`.
pub fn visit_name(client: usize) -> String {
    format!("T_{client}")
}

/// Name of the interval of `vehicle` at `location`.
pub fn vehicle_visit_name(vehicle: usize, location: usize) -> String {
    format!("T_{vehicle}_{location}")
}

/// Name of the route variable of `vehicle`.
pub fn route_name(vehicle: usize) -> String {
    format!("R_{vehicle}")
}

/// An interval decision variable: a span with start, end and size.
///
/// Bounds left at `None` are free. An optional interval carries a presence
/// decision; when absent it is unconstrained.
///
/// # Examples
///
/// ```
/// use cp_routing::cp::{IntervalRole, IntervalVar};
///
/// let visit = IntervalVar::new("T_1", IntervalRole::Visit { client: 1 })
///     .with_size(90)
///     .with_start_min(100)
///     .with_end_max(590);
/// assert_eq!(visit.size, Some(90));
/// assert_eq!(visit.start_max(), Some(500));
/// assert!(!visit.optional);
///
/// let candidate = IntervalVar::new("T_0_1", IntervalRole::VehicleVisit { vehicle: 0, location: 1 })
///     .as_optional();
/// assert!(candidate.optional);
/// assert_eq!(candidate.start_max(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalVar {
    /// Unique name, used by solver output.
    pub name: String,
    /// What the interval represents.
    pub role: IntervalRole,
    /// Fixed size, if any.
    pub size: Option<i64>,
    /// Earliest start, if bounded. Time never precedes 0, so an unbounded
    /// start is still at least 0.
    pub start_min: Option<i64>,
    /// Latest end, if bounded.
    pub end_max: Option<i64>,
    /// Whether presence is itself a decision.
    pub optional: bool,
}

impl IntervalVar {
    /// Creates a mandatory interval with free size and timing.
    pub fn new(name: impl Into<String>, role: IntervalRole) -> Self {
        Self {
            name: name.into(),
            role,
            size: None,
            start_min: None,
            end_max: None,
            optional: false,
        }
    }

    /// Fixes the size.
    pub fn with_size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    /// Bounds the start from below.
    pub fn with_start_min(mut self, start_min: i64) -> Self {
        self.start_min = Some(start_min);
        self
    }

    /// Bounds the end from above.
    pub fn with_end_max(mut self, end_max: i64) -> Self {
        self.end_max = Some(end_max);
        self
    }

    /// Makes presence a decision.
    pub fn as_optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Latest start implied by the end bound and a fixed size.
    pub fn start_max(&self) -> Option<i64> {
        Some(self.end_max? - self.size.unwrap_or(0))
    }
}

/// A sequence variable: the order in which one vehicle performs the present
/// intervals of its arena.
///
/// The arena lists one interval per location, in location order, so the
/// position of an interval in `intervals` is its location index and is the
/// row/column used in the transition matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteVar {
    /// Unique name, used by solver output.
    pub name: String,
    /// Vehicle driving this route.
    pub vehicle: usize,
    /// Interval arena, indexed by location.
    pub intervals: Vec<IntervalId>,
}

impl RouteVar {
    /// Creates a route over the given interval arena.
    pub fn new(name: impl Into<String>, vehicle: usize, intervals: Vec<IntervalId>) -> Self {
        Self {
            name: name.into(),
            vehicle,
            intervals,
        }
    }

    /// Arena position (location) of an interval, if it belongs to this route.
    pub fn position_of(&self, id: IntervalId) -> Option<usize> {
        self.intervals.iter().position(|&i| i == id)
    }

    /// Number of intervals in the arena.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Returns `true` if the arena is empty.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}
