//! Core data models for the traffic service.

use serde::{Deserialize, Serialize};

use crate::vector::Vec2;

/// Traffic-light risk level returned with every accepted report.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// No predicted proximity concern
    #[default]
    Green,
    /// Closest approach within the caution threshold
    Yellow,
    /// Closest approach within the danger threshold
    Red,
}

impl Status {
    /// Combine two verdicts. Red absorbs everything; Yellow overrides Green.
    pub fn escalate(self, other: Status) -> Status {
        self.max(other)
    }
}

/// One recorded observation of a ship.
///
/// `velocity` is derived on insertion: the clamped finite difference against
/// the previous sample, or zero for a ship's first sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: i64,
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Sample {
    pub fn new(time: i64, position: Vec2, velocity: Vec2) -> Self {
        Self {
            time,
            position,
            velocity,
        }
    }
}

/// A position report as supplied by a caller.
#[derive(Debug, Clone)]
pub struct Report {
    pub id: String,
    pub time: i64,
    pub position: Vec2,
}

/// Outcome of an accepted report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Magnitude of the derived velocity, after clamping.
    pub speed: f64,
    pub status: Status,
}

/// Last-known summary of a tracked ship.
#[derive(Debug, Clone, Serialize)]
pub struct Ship {
    pub id: String,
    pub last_time: i64,
    pub last_status: Status,
    pub last_speed: f64,
    pub last_position: Vec2,
}
