//! Model Module - Unsupervised analyzers
//!
//! Hai model chạy nối tiếp trên cùng một feature table:
//! KMeans gán nhãn cụm, sau đó Isolation Forest gắn cờ bất thường.

pub mod cluster;
pub mod isolation;

// Re-export common types
pub use cluster::{ClusterAnalyzer, ClusterAssignment};
pub use isolation::{AnomalyAnalyzer, AnomalyAssignment, AnomalyFlag, IsolationForest};
