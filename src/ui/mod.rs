//! egui rendering of the dashboard. Every function here reads from
//! [`crate::state::AppState`]; filtering and aggregation live in the library.

pub mod panels;
pub mod plot;
pub mod table;
