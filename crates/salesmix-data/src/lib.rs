//! Data layer for salesmix.
//!
//! Reads sales exports, aggregates francophone / other counts per calendar
//! period and runs the top-level analysis pipeline.

pub mod aggregator;
pub mod analysis;
pub mod reader;

pub use salesmix_core as core;
