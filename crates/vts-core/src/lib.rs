//! VTS Core - Pure logic for vessel traffic risk evaluation
//!
//! This crate contains the domain models and evaluation logic
//! with NO networking dependencies.

pub mod approach;
pub mod error;
pub mod history;
pub mod models;
pub mod traffic;
pub mod vector;

pub use error::TrafficError;
pub use models::{Evaluation, Report, Sample, Ship, Status};
pub use traffic::Traffic;
pub use vector::Vec2;

/// Look-ahead window for proximity prediction, in seconds.
pub const HORIZON_SECS: i64 = 60;

/// Cap on a reporting ship's derived velocity magnitude, units per second.
pub const MAX_SPEED: f64 = 100.0;

/// Closest-approach distance below which a pair is Red.
pub const RED_THRESHOLD: f64 = 1.0;

/// Closest-approach distance below which a pair is at least Yellow.
pub const YELLOW_THRESHOLD: f64 = 2.0;

/// Tolerance for floating point comparisons.
pub const EPSILON: f64 = 1e-9;
