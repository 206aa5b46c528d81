//! Shared scenarios for the rampup integration tests.

pub mod scenarios;

pub use scenarios::{Format, init_tracing, load, load_with_grid};
