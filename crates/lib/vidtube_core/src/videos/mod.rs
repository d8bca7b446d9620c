//! Video persistence.

pub mod queries;
