//! Crate error type.

use std::fmt;

/// Errors raised while validating and transforming raw instances, or while
/// timing a route plan against a built model.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The distance matrix is not square.
    NonSquareMatrix {
        /// Row that has the wrong length.
        row: usize,
        /// Length of that row.
        len: usize,
        /// Expected row length (number of rows).
        expected: usize,
    },
    /// A per-location vector does not match the distance matrix size.
    DimensionMismatch {
        /// Name of the offending field.
        field: &'static str,
        /// Actual length.
        len: usize,
        /// Expected length.
        expected: usize,
    },
    /// A value is negative, NaN or infinite.
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// Location index.
        index: usize,
        /// The offending value.
        value: f64,
    },
    /// A time window opens after it closes.
    InvertedTimeWindow {
        /// Location index.
        index: usize,
        /// Window open.
        earliest: f64,
        /// Window close.
        latest: f64,
    },
    /// A scaled service time or time window bound is not integral.
    FractionalTime {
        /// Name of the offending field.
        field: &'static str,
        /// Location index.
        index: usize,
        /// Scaled value.
        value: f64,
    },
    /// The time scale factor is not a finite positive number.
    InvalidTimeScale(f64),
    /// The instance declares no vehicles or no locations.
    EmptyInstance,
    /// A route plan references a location that is not a client.
    UnknownLocation {
        /// Vehicle whose plan is invalid.
        vehicle: usize,
        /// The offending location index.
        location: usize,
    },
    /// A route plan lists more vehicles than the model has.
    TooManyRoutes {
        /// Number of routes in the plan.
        routes: usize,
        /// Number of vehicles in the model.
        vehicles: usize,
    },
    /// The instance record could not be parsed.
    Parse(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NonSquareMatrix { row, len, expected } => write!(
                f,
                "edge weight matrix is not square: row {row} has {len} entries, expected {expected}"
            ),
            Error::DimensionMismatch {
                field,
                len,
                expected,
            } => write!(f, "{field} has {len} entries, expected {expected}"),
            Error::InvalidValue {
                field,
                index,
                value,
            } => write!(f, "{field}[{index}] is invalid: {value}"),
            Error::InvertedTimeWindow {
                index,
                earliest,
                latest,
            } => write!(
                f,
                "time window of location {index} opens at {earliest} after closing at {latest}"
            ),
            Error::FractionalTime {
                field,
                index,
                value,
            } => write!(f, "scaled {field}[{index}] = {value} is not integral"),
            Error::InvalidTimeScale(scale) => {
                write!(f, "time scale must be finite and positive, got {scale}")
            }
            Error::EmptyInstance => write!(f, "instance has no vehicles or no locations"),
            Error::UnknownLocation { vehicle, location } => {
                write!(f, "route of vehicle {vehicle} visits unknown client {location}")
            }
            Error::TooManyRoutes { routes, vehicles } => {
                write!(f, "plan has {routes} routes but only {vehicles} vehicles")
            }
            Error::Parse(msg) => write!(f, "cannot parse instance: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
