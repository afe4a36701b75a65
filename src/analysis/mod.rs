//! Aggregation over the loaded documents.
//!
//! `aggregator` covers the gap analysis, `roadmap` the remediation plan.

pub mod aggregator;
pub mod roadmap;

pub use aggregator::*;
pub use roadmap::*;
