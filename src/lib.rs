// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use error::CalcError;
pub use models::{AssumptionSet, Metric, MetricsResult, PropertyInput};
pub use services::calculations::compute;
