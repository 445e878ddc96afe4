//! Raw instance record.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An instance record as produced by an instance-file reader.
///
/// Index 0 is the depot, indices `1..n` are clients. All times are in the
/// units of the source file; the transformer scales them.
///
/// # Examples
///
/// ```
/// use cp_routing::models::RawInstance;
///
/// let instance = RawInstance {
///     demand: vec![0, 10],
///     edge_weight: vec![vec![0.0, 1.5], vec![1.5, 0.0]],
///     service_time: vec![0.0, 9.0],
///     time_window: vec![[0.0, 100.0], [10.0, 50.0]],
///     vehicles: 1,
///     capacity: 50,
/// };
/// assert_eq!(instance.num_nodes(), 2);
/// assert!(instance.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInstance {
    /// Demand per node (depot included).
    pub demand: Vec<i32>,
    /// Square travel-time matrix between nodes.
    pub edge_weight: Vec<Vec<f64>>,
    /// Service duration per node.
    pub service_time: Vec<f64>,
    /// `[earliest, latest]` service start per node.
    pub time_window: Vec<[f64; 2]>,
    /// Fleet size.
    pub vehicles: usize,
    /// Capacity of each vehicle.
    pub capacity: i32,
}

impl RawInstance {
    /// Number of nodes (depot plus clients).
    pub fn num_nodes(&self) -> usize {
        self.demand.len()
    }

    /// Parses an instance record from JSON.
    ///
    /// Missing fields are reported as [`Error::Parse`]; the parsed record is
    /// validated before it is returned.
    #[cfg(feature = "json")]
    pub fn from_json(text: &str) -> Result<Self> {
        let instance: Self = serde_json::from_str(text).map_err(|e| Error::Parse(e.to_string()))?;
        instance.validate()?;
        Ok(instance)
    }

    /// Checks dimensions and value ranges.
    ///
    /// The matrix must be square with the same size as the demand vector,
    /// the service-time and time-window vectors must match that size, and
    /// all times must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let n = self.num_nodes();
        if n == 0 || self.vehicles == 0 {
            return Err(Error::EmptyInstance);
        }

        let rows = self.edge_weight.len();
        for (row, weights) in self.edge_weight.iter().enumerate() {
            if weights.len() != rows {
                return Err(Error::NonSquareMatrix {
                    row,
                    len: weights.len(),
                    expected: rows,
                });
            }
        }
        if rows != n {
            return Err(Error::DimensionMismatch {
                field: "edge_weight",
                len: rows,
                expected: n,
            });
        }
        if self.service_time.len() != n {
            return Err(Error::DimensionMismatch {
                field: "service_time",
                len: self.service_time.len(),
                expected: n,
            });
        }
        if self.time_window.len() != n {
            return Err(Error::DimensionMismatch {
                field: "time_window",
                len: self.time_window.len(),
                expected: n,
            });
        }

        for weights in &self.edge_weight {
            for (index, &value) in weights.iter().enumerate() {
                check_time("edge_weight", index, value)?;
            }
        }
        for (index, &value) in self.service_time.iter().enumerate() {
            check_time("service_time", index, value)?;
        }
        for (index, &[earliest, latest]) in self.time_window.iter().enumerate() {
            check_time("time_window", index, earliest)?;
            check_time("time_window", index, latest)?;
            if earliest > latest {
                return Err(Error::InvertedTimeWindow {
                    index,
                    earliest,
                    latest,
                });
            }
        }

        Ok(())
    }
}

fn check_time(field: &'static str, index: usize, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::InvalidValue {
            field,
            index,
            value,
        });
    }
    Ok(())
}
