//! The DataSource capability consumed by metric evaluators.

use std::future::Future;
use std::pin::Pin;

use crate::domain::{Contributor, IssueRecord};
use crate::error::Result;

/// Boxed future type returned by [`DataSource`] methods.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Abstraction over the repository metadata provider.
///
/// The core only depends on the data shapes returned here; transport,
/// caching, retries, and rate limiting belong to the implementor.
/// Every method may fail (authorization, rate limit, not found,
/// transport) and evaluators treat all failure kinds identically.
pub trait DataSource {
    /// List contributors with their total commit counts.
    fn contributors<'a>(&'a self, owner: &'a str, name: &'a str)
    -> SourceFuture<'a, Vec<Contributor>>;

    /// List issue and pull request open/close activity.
    fn issue_activity<'a>(
        &'a self,
        owner: &'a str,
        name: &'a str,
    ) -> SourceFuture<'a, Vec<IssueRecord>>;

    /// Fetch the license text, if the repository declares one.
    fn license_text<'a>(&'a self, owner: &'a str, name: &'a str)
    -> SourceFuture<'a, Option<String>>;

    /// Fetch the README contents, if present.
    fn readme<'a>(&'a self, owner: &'a str, name: &'a str) -> SourceFuture<'a, Option<String>>;

    /// List the repository file paths relative to the repository root.
    fn file_listing<'a>(&'a self, owner: &'a str, name: &'a str)
    -> SourceFuture<'a, Vec<String>>;
}
