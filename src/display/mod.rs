//! Terminal display utilities for CLI output.
//!
//! Provides styled tables and the report types commands print.

pub mod report;
pub mod tables;
pub mod theme;

pub use report::{ClusterReport, SimilarityReport};
pub use tables::TableBuilder;
pub use theme::{THEME, Theme};
