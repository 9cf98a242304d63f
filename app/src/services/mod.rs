//! Application services
//!
//! Services coordinate the engine with the persistence and health ports.

pub mod companion_fit;

pub use companion_fit::CompanionFitApp;
