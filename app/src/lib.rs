//! CompanionFit host library
//!
//! Wires the progression engine to configuration, persistence, health-data
//! ports and logging. The `companionfit` binary and the integration tests
//! both drive [`services::CompanionFitApp`].

pub mod config;
pub mod error;
pub mod health;
pub mod repositories;
pub mod services;
pub mod telemetry;
