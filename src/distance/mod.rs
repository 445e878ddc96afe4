//! Travel time matrices.
//!
//! Provides the dense integer matrix used as the transition-time table of
//! the routing model.

mod matrix;

pub use matrix::TravelMatrix;
