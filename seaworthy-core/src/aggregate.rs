//! Weighted aggregation of metric outcomes into a NetScore.

use crate::domain::RepoRef;
use crate::metrics::{self, MetricOutcome};
use crate::record::NetScoreRecord;
use crate::source::DataSource;

/// Relative weights for the five metrics.
///
/// The default table sums to 1.00 and is the production weighting;
/// alternate weightings exist so tests never touch global state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    /// Weight of the responsive maintainer metric.
    pub responsive_maintainer: f64,
    /// Weight of the correctness metric.
    pub correctness: f64,
    /// Weight of the bus factor metric.
    pub bus_factor: f64,
    /// Weight of the ramp-up time metric.
    pub ramp_up: f64,
    /// Weight of the license compatibility metric.
    pub license: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            responsive_maintainer: 0.40,
            correctness: 0.30,
            bus_factor: 0.15,
            ramp_up: 0.10,
            license: 0.05,
        }
    }
}

/// The five metric outcomes produced for one repository.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSet {
    /// Ramp-up time outcome.
    pub ramp_up: MetricOutcome,
    /// Correctness outcome.
    pub correctness: MetricOutcome,
    /// Bus factor outcome.
    pub bus_factor: MetricOutcome,
    /// Responsive maintainer outcome.
    pub responsive_maintainer: MetricOutcome,
    /// License compatibility outcome.
    pub license: MetricOutcome,
}

/// Combines metric outcomes into a [`NetScoreRecord`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    weights: Weights,
}

impl Aggregator {
    /// Build an aggregator with an explicit weight table.
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    /// Combine five metric outcomes into one record.
    ///
    /// A failed metric contributes zero to the weighted sum while
    /// still carrying its weight, so failure degrades the score
    /// instead of aborting it. Failed metrics also contribute zero
    /// to the total latency, which therefore is never negative.
    pub fn aggregate(&self, url: &str, metrics: &MetricSet) -> NetScoreRecord {
        let net_score = self.weights.responsive_maintainer
            * clamped_score(&metrics.responsive_maintainer)
            + self.weights.correctness * clamped_score(&metrics.correctness)
            + self.weights.bus_factor * clamped_score(&metrics.bus_factor)
            + self.weights.ramp_up * clamped_score(&metrics.ramp_up)
            + self.weights.license * clamped_score(&metrics.license);

        let net_score_latency = settled_latency(&metrics.ramp_up)
            + settled_latency(&metrics.correctness)
            + settled_latency(&metrics.bus_factor)
            + settled_latency(&metrics.responsive_maintainer)
            + settled_latency(&metrics.license);

        NetScoreRecord {
            url: url.to_string(),
            net_score,
            net_score_latency,
            ramp_up: metrics.ramp_up.score_field(),
            ramp_up_latency: metrics.ramp_up.latency_field(),
            correctness: metrics.correctness.score_field(),
            correctness_latency: metrics.correctness.latency_field(),
            bus_factor: metrics.bus_factor.score_field(),
            bus_factor_latency: metrics.bus_factor.latency_field(),
            responsive_maintainer: metrics.responsive_maintainer.score_field(),
            responsive_maintainer_latency: metrics.responsive_maintainer.latency_field(),
            license: metrics.license.score_field(),
            license_latency: metrics.license.latency_field(),
        }
    }
}

/// Floor-clamp a metric's contribution to the weighted sum.
fn clamped_score(outcome: &MetricOutcome) -> f64 {
    match outcome {
        MetricOutcome::Scored { score, .. } => score.max(0.0),
        MetricOutcome::Failed => 0.0,
    }
}

/// A metric's contribution to the total latency.
fn settled_latency(outcome: &MetricOutcome) -> f64 {
    match outcome {
        MetricOutcome::Scored { latency, .. } => latency.max(0.0),
        MetricOutcome::Failed => 0.0,
    }
}

/// Run all five evaluators for one repository and aggregate them.
///
/// The evaluators are launched together and joined structurally: all
/// of them settle, in any order, before the aggregator combines them.
/// No evaluator failure short-circuits the others.
pub async fn score_repository<D: DataSource>(
    url: &str,
    repo: &RepoRef,
    source: &D,
    threshold: u64,
    aggregator: &Aggregator,
) -> NetScoreRecord {
    let (ramp_up, correctness, bus_factor, responsive_maintainer, license) = tokio::join!(
        metrics::ramp_up(repo, source, threshold),
        metrics::correctness(repo, source),
        metrics::bus_factor(repo, source, threshold),
        metrics::responsive_maintainer(repo, source),
        metrics::license(repo, source, threshold),
    );

    aggregator.aggregate(
        url,
        &MetricSet {
            ramp_up,
            correctness,
            bus_factor,
            responsive_maintainer,
            license,
        },
    )
}
