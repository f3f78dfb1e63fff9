//! Student aggregation, grading, and statistics.
//!
//! This module groups clean score records into per-student profiles, maps
//! averages onto letter grades, and computes ranking and per-subject
//! dispersion.

pub mod aggregate;
pub mod engine;
pub mod grade;
pub mod types;
pub mod utility;
