//! VTS CLI - simulation tooling for the vessel traffic service.
//!
//! Provides the `send_fleet` binary for driving a fleet of simulated
//! ships against a running server.

pub mod sim;
