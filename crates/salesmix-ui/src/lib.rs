//! Terminal presentation layer for salesmix.
//!
//! Provides the plain-text report printed after each run, themes, and the
//! interactive dual-axis chart built on top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod report;
pub mod table_view;
pub mod themes;
pub mod view;

pub use salesmix_core as core;
