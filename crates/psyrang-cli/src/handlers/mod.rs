//! Command handlers.
//!
//! Each handler builds the adapters it needs, runs one operation, and
//! prints the outcome. Domain logic lives in the library crates.

pub mod cache;
pub mod serve;
