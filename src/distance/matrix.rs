//! Dense travel-time matrix.

use serde::{Deserialize, Serialize};

/// A dense n×n integer travel-time matrix stored in row-major order.
///
/// Entries are already in model time units (scaled and floored by the
/// instance transformer), so they can serve directly as transition times
/// between interval variables.
///
/// # Examples
///
/// ```
/// use cp_routing::distance::TravelMatrix;
///
/// let tm = TravelMatrix::from_data(2, vec![0, 50, 70, 0]).unwrap();
/// assert_eq!(tm.get(0, 1), 50);
/// assert_eq!(tm.get(1, 0), 70);
/// assert_eq!(tm.size(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelMatrix {
    data: Vec<i64>,
    size: usize,
}

impl TravelMatrix {
    /// Creates a travel-time matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size * size],
            size,
        }
    }

    /// Creates a matrix from an explicit n×n grid in row-major order.
    ///
    /// Returns `None` if the data length doesn't match `size * size`.
    pub fn from_data(size: usize, data: Vec<i64>) -> Option<Self> {
        if data.len() != size * size {
            return None;
        }
        Some(Self { data, size })
    }

    /// Returns the travel time from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> i64 {
        self.data[from * self.size + to]
    }

    /// Sets the travel time from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, time: i64) {
        self.data[from * self.size + to] = time;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Largest entry of the matrix (0 for an empty matrix).
    pub fn max(&self) -> i64 {
        self.data.iter().copied().max().unwrap_or(0)
    }
}
