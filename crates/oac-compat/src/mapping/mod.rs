//! Lossy mapping tables and degradation policies, one module per
//! dimension. Tables are immutable and built once (see `models`).

pub mod models;
pub mod permission;
pub mod priority;
pub mod temperature;
pub mod tools;
