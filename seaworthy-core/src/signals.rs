//! Heuristic classification of repository file listings.

use std::path::Path;

/// Counts of code and test files in a repository listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileCensus {
    /// Number of code files detected.
    pub code_files: usize,
    /// Number of test files detected.
    pub test_files: usize,
}

/// Classify a repository file listing into code and test counts.
pub fn census(paths: &[String]) -> FileCensus {
    let mut counts = FileCensus::default();
    for path in paths {
        let path = Path::new(path);
        if is_code_file(path) {
            counts.code_files += 1;
            if is_test_file(path) {
                counts.test_files += 1;
            }
        }
    }
    counts
}

/// An onboarding signal present in a repository, with its point value.
///
/// Point values sum to 100 across the full checklist, so a signal's
/// points are also its percentage share of a fully-documented
/// repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingSignal {
    /// Stable label for the signal.
    pub label: &'static str,
    /// Point value out of 100.
    pub points: u64,
}

const README_POINTS: u64 = 40;
const QUICKSTART_POINTS: u64 = 20;
const EXAMPLES_POINTS: u64 = 15;
const DOCS_POINTS: u64 = 15;
const CONTRIBUTING_POINTS: u64 = 10;

/// Detect which onboarding signals a repository carries.
///
/// Returned in descending point order, so callers can accumulate the
/// largest shares first.
pub fn onboarding_signals(readme: Option<&str>, paths: &[String]) -> Vec<OnboardingSignal> {
    let mut signals = Vec::new();

    let readme_text = readme.map(str::trim).filter(|text| !text.is_empty());
    if readme_text.is_some() {
        signals.push(OnboardingSignal {
            label: "readme",
            points: README_POINTS,
        });
    }
    if readme_text.is_some_and(has_quickstart_section) {
        signals.push(OnboardingSignal {
            label: "quickstart",
            points: QUICKSTART_POINTS,
        });
    }
    if paths
        .iter()
        .any(|path| path_components_match(Path::new(path), &["examples", "example", "demos"]))
    {
        signals.push(OnboardingSignal {
            label: "examples",
            points: EXAMPLES_POINTS,
        });
    }
    if paths.iter().any(|path| is_doc_file(Path::new(path))) {
        signals.push(OnboardingSignal {
            label: "docs",
            points: DOCS_POINTS,
        });
    }
    if paths.iter().any(|path| is_contributing_file(Path::new(path))) {
        signals.push(OnboardingSignal {
            label: "contributing",
            points: CONTRIBUTING_POINTS,
        });
    }

    signals.sort_by(|a, b| b.points.cmp(&a.points));
    signals
}

fn has_quickstart_section(readme: &str) -> bool {
    let lowered = readme.to_lowercase();
    ["install", "getting started", "quick start", "quickstart", "usage"]
        .iter()
        .any(|marker| lowered.contains(marker))
}

fn is_code_file(path: &Path) -> bool {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase());
    let Some(ext) = ext else {
        return false;
    };
    matches!(
        ext.as_str(),
        "rs" | "py"
            | "js"
            | "jsx"
            | "ts"
            | "tsx"
            | "go"
            | "java"
            | "kt"
            | "kts"
            | "c"
            | "h"
            | "cpp"
            | "hpp"
            | "cc"
            | "cxx"
            | "cs"
            | "rb"
            | "php"
            | "swift"
    )
}

fn is_test_file(path: &Path) -> bool {
    if path_components_match(path, &["test", "tests", "spec", "specs", "__tests__"]) {
        return true;
    }

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_lowercase())
        .unwrap_or_default();
    if file_name.contains(".test.") || file_name.contains(".spec.") {
        return true;
    }

    let stem = path
        .file_stem()
        .and_then(|name| name.to_str())
        .map(|name| name.to_lowercase())
        .unwrap_or_default();
    stem.starts_with("test_")
        || stem.ends_with("_test")
        || stem.starts_with("spec_")
        || stem.ends_with("_spec")
}

fn is_doc_file(path: &Path) -> bool {
    if is_readme(path) {
        // The README carries its own checklist entry.
        return false;
    }

    if path_components_match(path, &["docs", "doc", "documentation"]) {
        return true;
    }

    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    matches!(ext.as_str(), "md" | "mdx" | "rst" | "adoc")
}

fn is_readme(path: &Path) -> bool {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_lowercase())
        .unwrap_or_default();
    file_name == "readme" || file_name.starts_with("readme.")
}

fn is_contributing_file(path: &Path) -> bool {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_lowercase())
        .unwrap_or_default();
    file_name == "contributing" || file_name.starts_with("contributing.")
}

fn path_components_match(path: &Path, segments: &[&str]) -> bool {
    path.components().any(|component| {
        let segment = component.as_os_str().to_string_lossy().to_lowercase();
        segments.iter().any(|target| *target == segment)
    })
}
