//! VTS SDK - client library for the vessel traffic service
//!
//! Provides a simple API for tooling and tests to talk to a running server.

pub mod client;

pub use client::TrafficClient;
