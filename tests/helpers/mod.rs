//! Shared test fixtures

pub mod model_fixtures;
