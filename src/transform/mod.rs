//! Instance transformer.
//!
//! Turns a [`RawInstance`] into [`ProblemData`]:
//!
//! 1. Adds a synthetic end depot at index `n`, so a route can have distinct
//!    first and last stops. Its travel times mirror the start depot's row and
//!    column.
//! 2. Scales all times by [`TransformConfig::time_scale`] (10 by default,
//!    the DIMACS convention keeping one decimal digit). Travel times are
//!    floored. Service times and time windows must already be integral once
//!    scaled; a fractional value is rejected instead of rounded silently.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distance::TravelMatrix;
use crate::error::{Error, Result};
use crate::models::{ProblemData, RawInstance, TimeWindow};

/// Tolerance for deciding that a scaled time is integral.
const INTEGRAL_TOLERANCE: f64 = 1e-6;

/// Configuration of the instance transformer.
///
/// # Examples
///
/// ```
/// use cp_routing::transform::TransformConfig;
///
/// let config = TransformConfig::default();
/// assert_eq!(config.time_scale, 10.0);
///
/// let config = TransformConfig::default().with_time_scale(100.0);
/// assert_eq!(config.time_scale, 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformConfig {
    /// Factor applied to every time value of the raw instance.
    pub time_scale: f64,
}

impl TransformConfig {
    /// Sets the time scale factor.
    pub fn with_time_scale(mut self, scale: f64) -> Self {
        self.time_scale = scale;
        self
    }
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self { time_scale: 10.0 }
    }
}

/// Transforms a raw instance using the default configuration.
///
/// # Examples
///
/// ```
/// use cp_routing::models::RawInstance;
/// use cp_routing::transform::instance_to_data;
///
/// let instance = RawInstance {
///     demand: vec![0, 10],
///     edge_weight: vec![vec![0.0, 1.55], vec![2.0, 0.0]],
///     service_time: vec![0.0, 9.0],
///     time_window: vec![[0.0, 100.0], [10.0, 50.0]],
///     vehicles: 1,
///     capacity: 50,
/// };
/// let data = instance_to_data(&instance).unwrap();
/// assert_eq!(data.num_locations(), 3);
/// assert_eq!(data.edge_weights().get(0, 1), 15);
/// assert_eq!(data.edge_weights().get(1, 2), 20);
/// assert_eq!(data.service_time(1), 90);
/// ```
pub fn instance_to_data(instance: &RawInstance) -> Result<ProblemData> {
    instance_to_data_with(instance, &TransformConfig::default())
}

/// Transforms a raw instance with an explicit configuration.
///
/// Fails without producing partial data if the instance is inconsistent or
/// the time scale is not a finite positive number.
pub fn instance_to_data_with(instance: &RawInstance, config: &TransformConfig) -> Result<ProblemData> {
    if !(config.time_scale.is_finite() && config.time_scale > 0.0) {
        return Err(Error::InvalidTimeScale(config.time_scale));
    }
    instance.validate()?;

    let n = instance.num_nodes();
    let num_locations = n + 1;
    let end = num_locations - 1;
    let scale = config.time_scale;

    let mut raw = vec![vec![0.0; num_locations]; num_locations];
    for (i, row) in instance.edge_weight.iter().enumerate() {
        raw[i][..n].copy_from_slice(row);
    }
    for i in 0..n {
        raw[end][i] = instance.edge_weight[0][i];
        raw[i][end] = instance.edge_weight[i][0];
    }

    let mut edge_weights = TravelMatrix::new(num_locations);
    for (i, row) in raw.iter().enumerate() {
        for (j, &w) in row.iter().enumerate() {
            edge_weights.set(i, j, (w * scale).floor() as i64);
        }
    }

    let mut service_time = Vec::with_capacity(num_locations);
    for (index, &s) in instance.service_time.iter().enumerate() {
        service_time.push(scaled_time("service_time", index, s, scale)?);
    }
    service_time.push(service_time[0]);

    let mut time_windows = Vec::with_capacity(num_locations);
    for (index, &[earliest, latest]) in instance.time_window.iter().enumerate() {
        let earliest = scaled_time("time_window", index, earliest, scale)?;
        let latest = scaled_time("time_window", index, latest, scale)?;
        let tw = TimeWindow::new(earliest, latest).ok_or(Error::InvertedTimeWindow {
            index,
            earliest: earliest as f64,
            latest: latest as f64,
        })?;
        time_windows.push(tw);
    }
    time_windows.push(time_windows[0]);

    let mut demand = instance.demand.clone();
    demand.push(demand[0]);

    debug!(
        num_locations,
        num_vehicles = instance.vehicles,
        time_scale = scale,
        "transformed instance"
    );

    Ok(ProblemData::from_parts(
        instance.vehicles,
        instance.capacity,
        edge_weights,
        service_time,
        time_windows,
        demand,
    ))
}

fn scaled_time(field: &'static str, index: usize, value: f64, scale: f64) -> Result<i64> {
    let scaled = value * scale;
    let rounded = scaled.round();
    if (scaled - rounded).abs() > INTEGRAL_TOLERANCE {
        return Err(Error::FractionalTime {
            field,
            index,
            value: scaled,
        });
    }
    Ok(rounded as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawInstance {
        RawInstance {
            demand: vec![0, 10, 20],
            edge_weight: vec![
                vec![0.0, 1.04, 2.5],
                vec![1.11, 0.0, 1.59],
                vec![2.5, 1.59, 0.0],
            ],
            service_time: vec![0.0, 9.0, 10.5],
            time_window: vec![[0.0, 230.0], [1.5, 50.0], [10.0, 60.2]],
            vehicles: 3,
            capacity: 200,
        }
    }

    #[test]
    fn test_adds_end_depot() {
        let data = instance_to_data(&sample()).expect("valid");
        assert_eq!(data.num_locations(), 4);
        assert_eq!(data.edge_weights().size(), 4);
        assert_eq!(data.clients(), 1..3);
        assert_eq!(data.end_depot(), 3);
    }

    #[test]
    fn test_end_depot_mirrors_start() {
        let data = instance_to_data(&sample()).expect("valid");
        let tm = data.edge_weights();
        for i in 0..3 {
            assert_eq!(tm.get(3, i), tm.get(0, i));
            assert_eq!(tm.get(i, 3), tm.get(i, 0));
        }
        assert_eq!(tm.get(3, 1), 10);
        assert_eq!(tm.get(1, 3), 11);
        assert_eq!(tm.get(0, 3), 0);
        assert_eq!(tm.get(3, 0), 0);
    }

    #[test]
    fn test_edge_weights_floored() {
        let data = instance_to_data(&sample()).expect("valid");
        let tm = data.edge_weights();
        assert_eq!(tm.get(0, 1), 10);
        assert_eq!(tm.get(1, 2), 15);
        assert_eq!(tm.get(0, 2), 25);
    }

    #[test]
    fn test_times_scaled() {
        let data = instance_to_data(&sample()).expect("valid");
        assert_eq!(data.service_time(1), 90);
        assert_eq!(data.service_time(2), 105);
        assert_eq!(data.time_window(1), TimeWindow::new(15, 500).expect("valid"));
        assert_eq!(data.time_window(2), TimeWindow::new(100, 602).expect("valid"));
        assert_eq!(data.time_window(3), data.time_window(0));
        assert_eq!(data.service_time(3), data.service_time(0));
    }

    #[test]
    fn test_demand_and_fleet() {
        let data = instance_to_data(&sample()).expect("valid");
        assert_eq!(data.num_vehicles(), 3);
        assert_eq!(data.capacity(), 200);
        assert_eq!(data.demand(2), 20);
        assert_eq!(data.demand(3), 0);
    }

    #[test]
    fn test_fractional_service_time_rejected() {
        let mut instance = sample();
        instance.service_time[2] = 10.25;
        assert!(matches!(
            instance_to_data(&instance),
            Err(Error::FractionalTime { field: "service_time", index: 2, .. })
        ));
    }

    #[test]
    fn test_custom_scale() {
        let config = TransformConfig::default().with_time_scale(100.0);
        let mut instance = sample();
        instance.service_time[2] = 10.25;
        let data = instance_to_data_with(&instance, &config).expect("valid");
        assert_eq!(data.service_time(2), 1025);
        assert_eq!(data.edge_weights().get(0, 1), 104);
    }

    #[test]
    fn test_invalid_time_scale_rejected() {
        for scale in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let config = TransformConfig::default().with_time_scale(scale);
            let result = instance_to_data_with(&sample(), &config);
            assert!(matches!(result, Err(Error::InvalidTimeScale(_))), "scale {scale}");
        }
    }

    #[test]
    fn test_invalid_instance_rejected() {
        let mut instance = sample();
        instance.demand.push(5);
        assert!(matches!(
            instance_to_data(&instance),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
