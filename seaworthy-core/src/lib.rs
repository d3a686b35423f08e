#![deny(missing_docs)]
//! Seaworthy core library.
//!
//! This crate contains the metric contract and aggregation engine
//! used to score third-party repositories: the `DataSource`
//! capability seam, the five metric evaluators, and the weighted
//! NetScore aggregator.

pub mod aggregate;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod record;
pub mod signals;
pub mod source;

pub use aggregate::{Aggregator, MetricSet, Weights, score_repository};
pub use domain::{Contributor, IssueRecord, RepoRef};
pub use error::{Result, SeaworthyError};
pub use metrics::{
    DEFAULT_THRESHOLD, FAILURE_SENTINEL, MetricOutcome, bus_factor, correctness, license, ramp_up,
    responsive_maintainer,
};
pub use record::NetScoreRecord;
pub use source::{DataSource, SourceFuture};
