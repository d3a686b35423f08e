#![deny(missing_docs)]
//! Seaworthy command-line interface.
//!
//! Scores batches of repositories against the GitHub API and emits
//! one NetScore record per line of newline-delimited JSON.

mod github;

use clap::{ArgGroup, Parser};
use github::GithubDataSource;
use seaworthy_core::{Aggregator, DEFAULT_THRESHOLD, DataSource, RepoRef, score_repository};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "seaworthy", version, about = "Repository NetScore evaluator")]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .args(&["file", "url"])
))]
struct Cli {
    /// File containing repository URLs (one per line).
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Single repository URL to score.
    #[arg(long)]
    url: Option<String>,
    /// Cumulative-share threshold percentage for count-based metrics.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: u64,
    /// Write records to a file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
    /// GitHub API token for authenticated requests.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[cfg(not(test))]
#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
fn main() {}

async fn run(cli: Cli) -> CliResult<()> {
    let urls = resolve_urls(&cli).await?;
    if urls.is_empty() {
        log::warn!("no repository urls provided");
        return Ok(());
    }

    let source = Arc::new(GithubDataSource::new(cli.token.clone())?);
    let aggregator = Aggregator::default();

    match &cli.output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut file = std::fs::File::create(path)?;
            run_batch(&urls, source, cli.threshold, aggregator, &mut file).await?;
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            run_batch(&urls, source, cli.threshold, aggregator, &mut lock).await?;
        }
    }

    Ok(())
}

/// Score each repository strictly in sequence, emitting its record
/// before the next repository begins.
///
/// Each repository runs inside its own spawned task so an unexpected
/// panic in an evaluator surfaces as a join error that is logged and
/// skipped without stopping the batch. Malformed URLs are likewise
/// logged and skipped. Returns the number of records emitted.
async fn run_batch<D>(
    urls: &[String],
    source: Arc<D>,
    threshold: u64,
    aggregator: Aggregator,
    writer: &mut dyn Write,
) -> CliResult<usize>
where
    D: DataSource + Send + Sync + 'static,
{
    let mut emitted = 0usize;

    for url in urls {
        let repo = match RepoRef::parse(url) {
            Ok(repo) => repo,
            Err(err) => {
                log::warn!("skipping input line: {err}");
                continue;
            }
        };

        let task_source = source.clone();
        let task_url = url.clone();
        let task = tokio::spawn(async move {
            score_repository(
                &task_url,
                &repo,
                task_source.as_ref(),
                threshold,
                &aggregator,
            )
            .await
        });

        match task.await {
            Ok(record) => {
                let line = record.to_json_line()?;
                writeln!(writer, "{line}")?;
                emitted += 1;
            }
            Err(err) => {
                log::warn!("skipping {url}: evaluation failed: {err}");
            }
        }
    }

    writer.flush()?;
    Ok(emitted)
}

async fn resolve_urls(cli: &Cli) -> CliResult<Vec<String>> {
    if let Some(file) = &cli.file {
        return load_repo_urls(file).await;
    }
    if let Some(url) = &cli.url {
        let trimmed = url.trim();
        if trimmed.is_empty() {
            return Err("url cannot be empty".into());
        }
        return Ok(vec![trimmed.to_string()]);
    }
    Err("no repository source provided".into())
}

async fn load_repo_urls(path: &Path) -> CliResult<Vec<String>> {
    let contents = tokio::fs::read_to_string(path).await?;
    let urls = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect();
    Ok(urls)
}
