//! Premier League player statistics: loading, filtering, and aggregation
//! behind the dashboard window.

pub mod config;
pub mod data;
