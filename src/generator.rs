//! Random VRPTW instance generator.
//!
//! Produces [`RawInstance`] records in the shape an instance reader would
//! hand over: clients scattered on a square grid around a central depot,
//! Euclidean travel times with one decimal, constant service times, and
//! integral time windows centered on a reachable service start.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::RawInstance;

/// Parameters of the instance generator.
///
/// # Examples
///
/// ```
/// use cp_routing::generator::GeneratorConfig;
///
/// let config = GeneratorConfig::default()
///     .with_num_clients(25)
///     .with_num_vehicles(5);
/// assert_eq!(config.num_clients, 25);
/// assert_eq!(config.horizon, 1000.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Number of clients (depot excluded).
    pub num_clients: usize,
    /// Fleet size.
    pub num_vehicles: usize,
    /// Capacity of each vehicle.
    pub capacity: i32,
    /// Largest demand of a client (smallest is 1).
    pub max_demand: i32,
    /// Side length of the square grid; the depot sits at its center.
    pub grid_size: f64,
    /// Service duration at every client.
    pub service_time: f64,
    /// Depot closing time.
    pub horizon: f64,
    /// Width of client time windows.
    pub window_width: f64,
}

impl GeneratorConfig {
    /// Sets the number of clients.
    pub fn with_num_clients(mut self, n: usize) -> Self {
        self.num_clients = n;
        self
    }

    /// Sets the fleet size.
    pub fn with_num_vehicles(mut self, n: usize) -> Self {
        self.num_vehicles = n;
        self
    }

    /// Sets the vehicle capacity.
    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the depot closing time.
    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    /// Sets the time window width.
    pub fn with_window_width(mut self, width: f64) -> Self {
        self.window_width = width;
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            num_clients: 10,
            num_vehicles: 3,
            capacity: 200,
            max_demand: 35,
            grid_size: 100.0,
            service_time: 10.0,
            horizon: 1000.0,
            window_width: 120.0,
        }
    }
}

/// Generates a random instance.
///
/// Every client window can be met by a vehicle driving straight from the
/// depot, so serving each client with its own vehicle is always feasible.
///
/// Out-of-range parameters are clamped: demands are at least 1 and a grid
/// size that is negative or not finite collapses to a single point.
///
/// # Examples
///
/// ```
/// use cp_routing::generator::{generate_instance, GeneratorConfig};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let mut rng = StdRng::seed_from_u64(42);
/// let instance = generate_instance(&GeneratorConfig::default(), &mut rng);
/// assert_eq!(instance.num_nodes(), 11);
/// assert!(instance.validate().is_ok());
/// ```
pub fn generate_instance<R: Rng>(config: &GeneratorConfig, rng: &mut R) -> RawInstance {
    let n = config.num_clients + 1;
    let grid_size = if config.grid_size.is_finite() {
        config.grid_size.max(0.0)
    } else {
        0.0
    };
    let max_demand = config.max_demand.max(1);
    let center = grid_size / 2.0;

    let mut positions = Vec::with_capacity(n);
    positions.push((center, center));
    for _ in 1..n {
        positions.push((
            rng.random_range(0.0..=grid_size),
            rng.random_range(0.0..=grid_size),
        ));
    }

    let edge_weight: Vec<Vec<f64>> = positions
        .iter()
        .map(|&(x1, y1)| {
            positions
                .iter()
                .map(|&(x2, y2)| ((x1 - x2).hypot(y1 - y2) * 10.0).round() / 10.0)
                .collect()
        })
        .collect();

    let mut demand = vec![0];
    let mut service_time = vec![0.0];
    let mut time_window = vec![[0.0, config.horizon]];
    let half_width = (config.window_width / 2.0).round() as i64;

    for client in 1..n {
        let reach = edge_weight[0][client].ceil() as i64;
        let latest_feasible =
            ((config.horizon - edge_weight[client][0] - config.service_time).floor() as i64).max(reach);
        let start = rng.random_range(reach..=latest_feasible);

        demand.push(rng.random_range(1..=max_demand));
        service_time.push(config.service_time);
        time_window.push([
            (start - half_width).max(0) as f64,
            (start + half_width).min(latest_feasible) as f64,
        ]);
    }

    RawInstance {
        demand,
        edge_weight,
        service_time,
        time_window,
        vehicles: config.num_vehicles,
        capacity: config.capacity,
    }
}
