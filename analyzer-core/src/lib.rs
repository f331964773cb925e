//! Honeypot Attack Analyzer - Core Pipeline
//!
//! Loads a CSV of honeypot attack logs, turns it into a numeric feature table
//! and runs two unsupervised models over it.
//!
//! # Pipeline
//!
//! ```text
//! ┌──────────┐   ┌─────────────┐   ┌──────────┐   ┌──────────────┐   ┌───────────┐
//! │  Ingest  │──▶│  Features   │──▶│  KMeans  │──▶│  Isolation   │──▶│  Report   │
//! │  (CSV)   │   │ hour/ip/1hot│   │ (cluster)│   │  Forest      │   │ (tables,  │
//! └──────────┘   └─────────────┘   └──────────┘   └──────────────┘   │  plots)   │
//!                                                                    └───────────┘
//! ```
//!
//! Every run is independent: nothing is cached between calls to [`analyze`].

pub mod config;
pub mod error;
pub mod features;
pub mod ingest;
pub mod model;
pub mod pipeline;
pub mod report;

pub use config::AnalyzerConfig;
pub use error::{AnalyzerError, Result};
pub use features::FeatureTable;
pub use ingest::RawTable;
pub use model::{AnomalyFlag, AnomalyAssignment, ClusterAssignment};
pub use pipeline::{analyze, Analysis};
pub use report::Dashboard;
