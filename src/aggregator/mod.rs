//! Aggregation layer.
//!
//! Collects per-module outcomes from concurrent audit workers and shapes
//! them into a report ordered by import path:
//! - `ResultCollector` accumulates outcomes behind a single mutex
//! - `summary` classifies outcomes and resolves path collisions

pub mod collector;
pub mod summary;

pub use collector::ResultCollector;
pub use summary::{DuplicatePolicy, PathCollision, Report, Summary};
