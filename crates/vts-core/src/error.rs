//! Typed failures exposed by the core.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TrafficError {
    #[error("ship not found")]
    NotFound,
    #[error("time must be greater than last position time")]
    TimeInPast,
    #[error("time must not be in the future")]
    TimeInFuture,
}
