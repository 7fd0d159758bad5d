//! Turns raw team-status updates into a bounded executive summary.
//!
//! Signals are normalized from CSV or free text, bucketed into tasks,
//! blockers, wins and risks (optionally ranked by a weighted priority score),
//! and composed into at most five slide bullets. Reports and acknowledgements
//! are persisted through the [`store`] traits.

pub mod analysis;
pub mod classify;
pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod models;
pub mod pipeline;
pub mod priority;
pub mod report;
pub mod rewrite;
pub mod slide;
pub mod store;

pub use error::{Error, IngestError, Result};
pub use models::{CategorizedSignals, Category, Report, ReportItem, ScoredItem, WorkSignal};
