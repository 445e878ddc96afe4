//! Normalized problem data consumed by the model builders.

use std::ops::Range;

use serde::Serialize;

use super::TimeWindow;
use crate::distance::TravelMatrix;

/// Immutable VRPTW data in model time units.
///
/// The depot appears twice: as the start depot at index 0 and as a
/// synthetic end depot at index `num_locations - 1`. Both are the same
/// physical place, so the end depot mirrors the start depot in the travel
/// matrix and in every per-location vector. Clients occupy
/// `1..num_locations - 1`.
///
/// Built by [`instance_to_data`](crate::transform::instance_to_data) and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemData {
    num_vehicles: usize,
    capacity: i32,
    num_locations: usize,
    edge_weights: TravelMatrix,
    service_time: Vec<i64>,
    time_windows: Vec<TimeWindow>,
    demand: Vec<i32>,
}

impl ProblemData {
    /// Assembles problem data from already normalized parts.
    ///
    /// Callers guarantee that `edge_weights` has side `num_locations` and
    /// that every per-location vector has `num_locations` entries.
    pub(crate) fn from_parts(
        num_vehicles: usize,
        capacity: i32,
        edge_weights: TravelMatrix,
        service_time: Vec<i64>,
        time_windows: Vec<TimeWindow>,
        demand: Vec<i32>,
    ) -> Self {
        let num_locations = edge_weights.size();
        debug_assert_eq!(service_time.len(), num_locations);
        debug_assert_eq!(time_windows.len(), num_locations);
        debug_assert_eq!(demand.len(), num_locations);
        Self {
            num_vehicles,
            capacity,
            num_locations,
            edge_weights,
            service_time,
            time_windows,
            demand,
        }
    }

    /// Number of available (identical) vehicles.
    pub fn num_vehicles(&self) -> usize {
        self.num_vehicles
    }

    /// Capacity of each vehicle. Not enforced by the routing model.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Number of locations including both depot copies.
    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    /// Travel times between locations.
    pub fn edge_weights(&self) -> &TravelMatrix {
        &self.edge_weights
    }

    /// Service duration at `location`.
    pub fn service_time(&self, location: usize) -> i64 {
        self.service_time[location]
    }

    /// Service-start window at `location`.
    pub fn time_window(&self, location: usize) -> TimeWindow {
        self.time_windows[location]
    }

    /// Demand at `location`.
    pub fn demand(&self, location: usize) -> i32 {
        self.demand[location]
    }

    /// Index of the start depot.
    pub fn start_depot(&self) -> usize {
        0
    }

    /// Index of the synthetic end depot.
    pub fn end_depot(&self) -> usize {
        self.num_locations - 1
    }

    /// All vehicle indices.
    pub fn vehicles(&self) -> Range<usize> {
        0..self.num_vehicles
    }

    /// All client indices (both depots excluded).
    pub fn clients(&self) -> Range<usize> {
        1..self.num_locations - 1
    }

    /// All location indices (both depots included).
    pub fn locations(&self) -> Range<usize> {
        0..self.num_locations
    }

    /// Sum of service durations over all clients.
    pub fn total_service_time(&self) -> i64 {
        self.clients().map(|c| self.service_time[c]).sum()
    }
}
