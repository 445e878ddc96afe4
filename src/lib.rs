//! # cp-routing
//!
//! Constraint-programming formulation of the Vehicle Routing Problem with
//! Time Windows (VRPTW). A raw instance is normalized into problem data,
//! from which a solver-agnostic model of interval, sequence and presence
//! decisions is built and handed to a CP backend.
//!
//! ## Modules
//!
//! - [`models`] — Raw instance record, time windows, normalized problem data
//! - [`distance`] — Integer travel-time matrix
//! - [`transform`] — Instance transformer (end depot duplication, time scaling)
//! - [`cp`] — Routing model IR and the VRPTW formulation
//! - [`evaluation`] — Assignments, constraint checking, route timing
//! - [`backend`] — Adapter to the `u-metaheur` CP layer
//! - [`generator`] — Random instance generator
//!
//! ## Example
//!
//! ```
//! use cp_routing::cp::vrptw_model;
//! use cp_routing::generator::{generate_instance, GeneratorConfig};
//! use cp_routing::transform::instance_to_data;
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//!
//! let instance = generate_instance(&GeneratorConfig::default(), &mut StdRng::seed_from_u64(1));
//! let data = instance_to_data(&instance).unwrap();
//! let model = vrptw_model(&data);
//! assert!(model.validate().is_ok());
//! ```

pub mod backend;
pub mod cp;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod generator;
pub mod models;
pub mod transform;

pub use error::{Error, Result};
