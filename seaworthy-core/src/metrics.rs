//! Metric evaluators and the shared evaluation contract.
//!
//! Every evaluator follows the same protocol: record a start instant,
//! query the [`DataSource`], compute a metric-specific raw score, map
//! it through a monotonic step function into `[0, 1]`, and report the
//! elapsed wall time. Any failure while querying or computing becomes
//! [`MetricOutcome::Failed`] at the evaluator boundary so one metric
//! never disturbs the others or the batch.

use std::future::Future;
use std::time::Instant;

use crate::domain::{Contributor, IssueRecord, RepoRef};
use crate::error::{Result, SeaworthyError};
use crate::signals;
use crate::source::DataSource;

/// Sentinel written to output fields for metrics that failed.
pub const FAILURE_SENTINEL: f64 = -1.0;

/// Default cumulative-share threshold percentage.
pub const DEFAULT_THRESHOLD: u64 = 50;

/// Outcome of a single metric evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricOutcome {
    /// The metric produced a normalized score in `[0, 1]` after the
    /// given number of wall-clock seconds.
    Scored {
        /// Normalized score in `[0, 1]`.
        score: f64,
        /// Elapsed evaluation time in seconds, never negative.
        latency: f64,
    },
    /// The metric could not be computed.
    Failed,
}

impl MetricOutcome {
    /// The value serialized into the metric's score field.
    pub fn score_field(&self) -> f64 {
        match self {
            Self::Scored { score, .. } => *score,
            Self::Failed => FAILURE_SENTINEL,
        }
    }

    /// The value serialized into the metric's latency field.
    ///
    /// A failed metric reports the sentinel here as well, never a
    /// real latency beside a failed score.
    pub fn latency_field(&self) -> f64 {
        match self {
            Self::Scored { latency, .. } => *latency,
            Self::Failed => FAILURE_SENTINEL,
        }
    }
}

/// Time a fallible scoring computation into a [`MetricOutcome`].
async fn timed<F>(work: F) -> MetricOutcome
where
    F: Future<Output = Result<f64>>,
{
    let start = Instant::now();
    match work.await {
        Ok(score) => MetricOutcome::Scored {
            score,
            latency: start.elapsed().as_secs_f64(),
        },
        Err(_) => MetricOutcome::Failed,
    }
}

/// Evaluate the bus factor metric.
///
/// The raw score is the number of top contributors holding at least
/// `threshold` percent of all commits; fewer people holding the
/// threshold share is riskier and scores lower.
pub async fn bus_factor<D: DataSource>(
    repo: &RepoRef,
    source: &D,
    threshold: u64,
) -> MetricOutcome {
    timed(async {
        let contributors = source.contributors(&repo.owner, &repo.name).await?;
        let raw = raw_bus_factor(contributors, threshold)?;
        Ok(scale_bus_factor(raw))
    })
    .await
}

/// Walk contributors by descending commit count until the cumulative
/// share reaches the threshold percentage.
fn raw_bus_factor(mut contributors: Vec<Contributor>, threshold: u64) -> Result<usize> {
    // Stable sort: ties keep the DataSource's native order.
    contributors.sort_by(|a, b| b.commit_count.cmp(&a.commit_count));

    let total: u64 = contributors
        .iter()
        .map(|contributor| contributor.commit_count)
        .sum();
    if total == 0 {
        return Err(SeaworthyError::Other(
            "no commits recorded for repository".to_string(),
        ));
    }

    let mut running = 0u64;
    for (index, contributor) in contributors.iter().enumerate() {
        running += contributor.commit_count;
        if running * 100 >= total * threshold {
            return Ok(index + 1);
        }
    }
    Ok(contributors.len())
}

fn scale_bus_factor(raw: usize) -> f64 {
    if raw <= 2 {
        0.0
    } else if raw <= 4 {
        0.25
    } else if raw <= 6 {
        0.5
    } else if raw <= 8 {
        0.75
    } else {
        1.0
    }
}

/// Evaluate the responsive maintainer metric.
///
/// The raw score is the median close time in days across issues and
/// pull requests that have been closed.
pub async fn responsive_maintainer<D: DataSource>(repo: &RepoRef, source: &D) -> MetricOutcome {
    timed(async {
        let records = source.issue_activity(&repo.owner, &repo.name).await?;
        let raw = raw_response_days(&records)?;
        Ok(scale_response_days(raw))
    })
    .await
}

fn raw_response_days(records: &[IssueRecord]) -> Result<f64> {
    let mut close_days: Vec<f64> = records
        .iter()
        .filter_map(|record| {
            let closed = record.closed_at?;
            let seconds = (closed - record.created_at).num_seconds().max(0);
            Some(seconds as f64 / 86_400.0)
        })
        .collect();

    if close_days.is_empty() {
        return Err(SeaworthyError::Other(
            "no closed issues or pull requests".to_string(),
        ));
    }

    close_days.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = close_days.len() / 2;
    if close_days.len() % 2 == 1 {
        Ok(close_days[mid])
    } else {
        Ok((close_days[mid - 1] + close_days[mid]) / 2.0)
    }
}

fn scale_response_days(raw: f64) -> f64 {
    if raw <= 1.0 {
        1.0
    } else if raw <= 3.0 {
        0.75
    } else if raw <= 7.0 {
        0.5
    } else if raw <= 14.0 {
        0.25
    } else {
        0.0
    }
}

/// Evaluate the correctness metric.
///
/// The raw score is the test-to-code file percentage from the
/// repository file listing.
pub async fn correctness<D: DataSource>(repo: &RepoRef, source: &D) -> MetricOutcome {
    timed(async {
        let paths = source.file_listing(&repo.owner, &repo.name).await?;
        let raw = raw_test_share(&paths)?;
        Ok(scale_test_share(raw))
    })
    .await
}

fn raw_test_share(paths: &[String]) -> Result<u64> {
    let counts = signals::census(paths);
    if counts.code_files == 0 {
        return Err(SeaworthyError::Other(
            "no code files in repository listing".to_string(),
        ));
    }
    Ok((counts.test_files as u64 * 100) / counts.code_files as u64)
}

fn scale_test_share(raw: u64) -> f64 {
    if raw < 5 {
        0.0
    } else if raw < 15 {
        0.25
    } else if raw < 30 {
        0.5
    } else if raw < 50 {
        0.75
    } else {
        1.0
    }
}

/// Evaluate the ramp-up time metric.
///
/// Onboarding signals carry point values summing to 100; the raw
/// score is how many of the repository's present signals, taken in
/// descending point order, are needed to reach the threshold
/// percentage. Fewer, weightier signals mean faster onboarding.
pub async fn ramp_up<D: DataSource>(repo: &RepoRef, source: &D, threshold: u64) -> MetricOutcome {
    timed(async {
        let readme = source.readme(&repo.owner, &repo.name).await?;
        let paths = source.file_listing(&repo.owner, &repo.name).await?;
        if readme.is_none() && paths.is_empty() {
            return Err(SeaworthyError::Other(
                "no onboarding data for repository".to_string(),
            ));
        }
        let present = signals::onboarding_signals(readme.as_deref(), &paths);
        Ok(scale_onboarding(raw_onboarding(&present, threshold)))
    })
    .await
}

/// Count the present signals needed to accumulate the threshold share
/// of the 100 available checklist points. `None` when the present
/// signals never reach it.
fn raw_onboarding(present: &[signals::OnboardingSignal], threshold: u64) -> Option<usize> {
    let mut running = 0u64;
    for (index, signal) in present.iter().enumerate() {
        running += signal.points;
        if running >= threshold {
            return Some(index + 1);
        }
    }
    None
}

fn scale_onboarding(raw: Option<usize>) -> f64 {
    match raw {
        Some(1) => 1.0,
        Some(2) => 0.75,
        Some(3) => 0.5,
        Some(4) => 0.25,
        _ => 0.0,
    }
}

/// Evaluate the license compatibility metric.
///
/// The raw score is a compatibility percentage: 100 for a recognized
/// LGPLv2.1-compatible license, 50 for an unrecognized but present
/// license text, 0 for none. The score is 1 when the percentage meets
/// the threshold. An absent license file is a legitimate zero, not a
/// failure.
pub async fn license<D: DataSource>(repo: &RepoRef, source: &D, threshold: u64) -> MetricOutcome {
    timed(async {
        let text = source.license_text(&repo.owner, &repo.name).await?;
        let raw = raw_license_compatibility(text.as_deref());
        Ok(if raw >= threshold { 1.0 } else { 0.0 })
    })
    .await
}

fn raw_license_compatibility(text: Option<&str>) -> u64 {
    let Some(text) = text.map(str::trim).filter(|text| !text.is_empty()) else {
        return 0;
    };
    let lowered = text.to_lowercase();

    const COMPATIBLE_MARKERS: &[&str] = &[
        "mit license",
        "apache license",
        "bsd",
        "gnu lesser general public license",
        "lgpl",
        "mozilla public license",
        "isc license",
        "zlib",
        "unlicense",
        "cc0",
        "public domain",
    ];

    if COMPATIBLE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
    {
        100
    } else {
        50
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_THRESHOLD, FAILURE_SENTINEL, MetricOutcome, bus_factor, correctness, license,
        ramp_up, raw_bus_factor, raw_license_compatibility, raw_onboarding, raw_response_days,
        responsive_maintainer, scale_bus_factor, scale_onboarding, scale_response_days,
        scale_test_share,
    };
    use crate::domain::{Contributor, IssueRecord, RepoRef};
    use crate::error::{Result, SeaworthyError};
    use crate::signals::OnboardingSignal;
    use crate::source::{DataSource, SourceFuture};
    use chrono::{Duration, TimeZone, Utc};

    /// DataSource double serving canned data; `None` fields fail.
    struct StaticSource {
        contributors: Option<Vec<Contributor>>,
        issues: Option<Vec<IssueRecord>>,
        license: Option<Option<String>>,
        readme: Option<Option<String>>,
        files: Option<Vec<String>>,
    }

    impl StaticSource {
        fn unavailable() -> Self {
            Self {
                contributors: None,
                issues: None,
                license: None,
                readme: None,
                files: None,
            }
        }
    }

    fn served<T: Clone>(field: &Option<T>) -> Result<T> {
        field
            .clone()
            .ok_or_else(|| SeaworthyError::DataSource("unavailable".to_string()))
    }

    impl DataSource for StaticSource {
        fn contributors<'a>(
            &'a self,
            _owner: &'a str,
            _name: &'a str,
        ) -> SourceFuture<'a, Vec<Contributor>> {
            Box::pin(async move { served(&self.contributors) })
        }

        fn issue_activity<'a>(
            &'a self,
            _owner: &'a str,
            _name: &'a str,
        ) -> SourceFuture<'a, Vec<IssueRecord>> {
            Box::pin(async move { served(&self.issues) })
        }

        fn license_text<'a>(
            &'a self,
            _owner: &'a str,
            _name: &'a str,
        ) -> SourceFuture<'a, Option<String>> {
            Box::pin(async move { served(&self.license) })
        }

        fn readme<'a>(&'a self, _owner: &'a str, _name: &'a str) -> SourceFuture<'a, Option<String>> {
            Box::pin(async move { served(&self.readme) })
        }

        fn file_listing<'a>(
            &'a self,
            _owner: &'a str,
            _name: &'a str,
        ) -> SourceFuture<'a, Vec<String>> {
            Box::pin(async move { served(&self.files) })
        }
    }

    fn repo() -> RepoRef {
        RepoRef {
            owner: "acme".to_string(),
            name: "widget".to_string(),
        }
    }

    fn contributors(counts: &[(&str, u64)]) -> Vec<Contributor> {
        counts
            .iter()
            .map(|(login, commit_count)| Contributor {
                login: login.to_string(),
                commit_count: *commit_count,
            })
            .collect()
    }

    #[test]
    fn bus_factor_concentrated_distribution_needs_one_contributor() {
        let raw = raw_bus_factor(
            contributors(&[("a", 60), ("b", 25), ("c", 15)]),
            DEFAULT_THRESHOLD,
        )
        .expect("raw");
        assert_eq!(raw, 1);
        assert_eq!(scale_bus_factor(raw), 0.0);
    }

    #[test]
    fn bus_factor_even_split_crosses_at_the_fifth_contributor() {
        let even = contributors(&[
            ("a", 10),
            ("b", 10),
            ("c", 10),
            ("d", 10),
            ("e", 10),
            ("f", 10),
            ("g", 10),
            ("h", 10),
            ("i", 10),
            ("j", 10),
        ]);
        let raw = raw_bus_factor(even, DEFAULT_THRESHOLD).expect("raw");
        assert_eq!(raw, 5);
        assert_eq!(scale_bus_factor(raw), 0.5);
    }

    #[test]
    fn bus_factor_concentration_lowers_the_raw_count() {
        let concentrated = raw_bus_factor(
            contributors(&[("a", 90), ("b", 5), ("c", 5)]),
            DEFAULT_THRESHOLD,
        )
        .expect("concentrated");
        let spread = raw_bus_factor(
            contributors(&[("a", 40), ("b", 35), ("c", 25)]),
            DEFAULT_THRESHOLD,
        )
        .expect("spread");
        assert!(concentrated <= spread);
    }

    #[test]
    fn bus_factor_zero_commits_is_a_failure_not_a_division() {
        let result = raw_bus_factor(contributors(&[("a", 0), ("b", 0)]), DEFAULT_THRESHOLD);
        assert!(result.is_err());
    }

    #[test]
    fn bus_factor_scaling_is_a_non_decreasing_step_function() {
        assert_eq!(scale_bus_factor(1), scale_bus_factor(2));
        assert_eq!(scale_bus_factor(3), scale_bus_factor(4));
        assert_eq!(scale_bus_factor(5), scale_bus_factor(6));
        assert_eq!(scale_bus_factor(7), scale_bus_factor(8));
        let mut previous = 0.0;
        for raw in 1..=12 {
            let scaled = scale_bus_factor(raw);
            assert!(scaled >= previous);
            previous = scaled;
        }
        assert_eq!(scale_bus_factor(12), 1.0);
    }

    #[tokio::test]
    async fn bus_factor_reports_a_real_latency_on_success() {
        let source = StaticSource {
            contributors: Some(contributors(&[("a", 6), ("b", 3), ("c", 1)])),
            ..StaticSource::unavailable()
        };

        match bus_factor(&repo(), &source, DEFAULT_THRESHOLD).await {
            MetricOutcome::Scored { score, latency } => {
                assert_eq!(score, 0.0);
                assert!(latency >= 0.0);
            }
            MetricOutcome::Failed => panic!("expected a scored outcome"),
        }
    }

    #[tokio::test]
    async fn failed_metric_pairs_both_sentinel_fields() {
        let outcome = bus_factor(&repo(), &StaticSource::unavailable(), DEFAULT_THRESHOLD).await;
        assert_eq!(outcome, MetricOutcome::Failed);
        assert_eq!(outcome.score_field(), FAILURE_SENTINEL);
        assert_eq!(outcome.latency_field(), FAILURE_SENTINEL);
    }

    fn issue(created_day: i64, closed_after_days: Option<i64>) -> IssueRecord {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
            + Duration::days(created_day);
        IssueRecord {
            created_at: created,
            closed_at: closed_after_days.map(|days| created + Duration::days(days)),
            is_pull: false,
        }
    }

    #[test]
    fn response_days_takes_the_median_of_closed_items() {
        let records = vec![
            issue(0, Some(1)),
            issue(1, Some(9)),
            issue(2, Some(2)),
            issue(3, None),
        ];
        let raw = raw_response_days(&records).expect("raw");
        assert_eq!(raw, 2.0);
        assert_eq!(scale_response_days(raw), 0.75);
    }

    #[test]
    fn response_days_fails_without_closed_items() {
        assert!(raw_response_days(&[]).is_err());
        assert!(raw_response_days(&[issue(0, None)]).is_err());
    }

    #[test]
    fn response_scaling_bands_are_non_increasing() {
        assert_eq!(scale_response_days(0.5), 1.0);
        assert_eq!(scale_response_days(2.0), 0.75);
        assert_eq!(scale_response_days(5.0), 0.5);
        assert_eq!(scale_response_days(10.0), 0.25);
        assert_eq!(scale_response_days(30.0), 0.0);
    }

    #[tokio::test]
    async fn responsive_maintainer_scores_prompt_closes_highest() {
        let source = StaticSource {
            issues: Some(vec![issue(0, Some(0)), issue(1, Some(1))]),
            ..StaticSource::unavailable()
        };

        match responsive_maintainer(&repo(), &source).await {
            MetricOutcome::Scored { score, .. } => assert_eq!(score, 1.0),
            MetricOutcome::Failed => panic!("expected a scored outcome"),
        }
    }

    #[test]
    fn test_share_bands_follow_the_step_table() {
        assert_eq!(scale_test_share(0), 0.0);
        assert_eq!(scale_test_share(4), 0.0);
        assert_eq!(scale_test_share(5), 0.25);
        assert_eq!(scale_test_share(14), 0.25);
        assert_eq!(scale_test_share(15), 0.5);
        assert_eq!(scale_test_share(29), 0.5);
        assert_eq!(scale_test_share(30), 0.75);
        assert_eq!(scale_test_share(49), 0.75);
        assert_eq!(scale_test_share(50), 1.0);
        assert_eq!(scale_test_share(100), 1.0);
    }

    #[tokio::test]
    async fn correctness_fails_without_code_files() {
        let source = StaticSource {
            files: Some(vec!["README.md".to_string(), "LICENSE".to_string()]),
            ..StaticSource::unavailable()
        };

        let outcome = correctness(&repo(), &source).await;
        assert_eq!(outcome, MetricOutcome::Failed);
    }

    #[tokio::test]
    async fn correctness_scores_test_heavy_listings_highest() {
        let source = StaticSource {
            files: Some(vec![
                "src/lib.rs".to_string(),
                "src/main.rs".to_string(),
                "tests/lib_test.rs".to_string(),
                "tests/cli_test.rs".to_string(),
            ]),
            ..StaticSource::unavailable()
        };

        match correctness(&repo(), &source).await {
            MetricOutcome::Scored { score, .. } => assert_eq!(score, 1.0),
            MetricOutcome::Failed => panic!("expected a scored outcome"),
        }
    }

    fn signal(label: &'static str, points: u64) -> OnboardingSignal {
        OnboardingSignal { label, points }
    }

    #[test]
    fn onboarding_walk_counts_signals_to_the_threshold() {
        let present = vec![
            signal("readme", 40),
            signal("quickstart", 20),
            signal("examples", 15),
        ];
        assert_eq!(raw_onboarding(&present, 50), Some(2));
        assert_eq!(raw_onboarding(&present, 40), Some(1));
        assert_eq!(raw_onboarding(&present, 75), Some(3));
        assert_eq!(raw_onboarding(&present, 90), None);
    }

    #[test]
    fn onboarding_scaling_rewards_fewer_signals() {
        assert_eq!(scale_onboarding(Some(1)), 1.0);
        assert_eq!(scale_onboarding(Some(2)), 0.75);
        assert_eq!(scale_onboarding(Some(3)), 0.5);
        assert_eq!(scale_onboarding(Some(4)), 0.25);
        assert_eq!(scale_onboarding(Some(5)), 0.0);
        assert_eq!(scale_onboarding(None), 0.0);
    }

    #[tokio::test]
    async fn ramp_up_scores_a_documented_repository() {
        let source = StaticSource {
            readme: Some(Some(
                "# Widget\n\n## Installation\n\ncargo add widget\n".to_string(),
            )),
            files: Some(vec![
                "src/lib.rs".to_string(),
                "examples/basic.rs".to_string(),
            ]),
            ..StaticSource::unavailable()
        };

        match ramp_up(&repo(), &source, DEFAULT_THRESHOLD).await {
            MetricOutcome::Scored { score, .. } => assert_eq!(score, 0.75),
            MetricOutcome::Failed => panic!("expected a scored outcome"),
        }
    }

    #[tokio::test]
    async fn ramp_up_fails_with_no_onboarding_data_at_all() {
        let source = StaticSource {
            readme: Some(None),
            files: Some(Vec::new()),
            ..StaticSource::unavailable()
        };

        let outcome = ramp_up(&repo(), &source, DEFAULT_THRESHOLD).await;
        assert_eq!(outcome, MetricOutcome::Failed);
    }

    #[test]
    fn license_compatibility_recognizes_permissive_texts() {
        assert_eq!(
            raw_license_compatibility(Some("MIT License\n\nPermission is hereby granted...")),
            100
        );
        assert_eq!(
            raw_license_compatibility(Some("GNU Lesser General Public License v2.1")),
            100
        );
        assert_eq!(
            raw_license_compatibility(Some("Proprietary. All rights reserved.")),
            50
        );
        assert_eq!(raw_license_compatibility(None), 0);
        assert_eq!(raw_license_compatibility(Some("   ")), 0);
    }

    #[tokio::test]
    async fn license_scores_zero_when_absent_but_does_not_fail() {
        let source = StaticSource {
            license: Some(None),
            ..StaticSource::unavailable()
        };

        match license(&repo(), &source, DEFAULT_THRESHOLD).await {
            MetricOutcome::Scored { score, .. } => assert_eq!(score, 0.0),
            MetricOutcome::Failed => panic!("expected a scored outcome"),
        }
    }

    #[tokio::test]
    async fn license_fails_when_the_source_errors() {
        let outcome = license(&repo(), &StaticSource::unavailable(), DEFAULT_THRESHOLD).await;
        assert_eq!(outcome, MetricOutcome::Failed);
    }
}
