//! Domain layer for salesmix.
//!
//! Country classification, calendar bucketing, the report data model, the
//! error taxonomy and command-line settings shared by the other crates.

pub mod countries;
pub mod error;
pub mod formatting;
pub mod models;
pub mod periods;
pub mod settings;

pub use error::{Result, SalesError};
