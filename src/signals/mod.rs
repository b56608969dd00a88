//! Deterministic signal extraction.
//!
//! [`extract`] turns a [`RawFactsBundle`] into [`Signals`]. It performs no
//! I/O and reads no clock, so identical input always produces identical
//! output.

pub mod commits;
pub mod readme;
pub mod rules;

use crate::models::raw::{EntryKind, RawFactsBundle};
use crate::models::signals::{CommitConsistency, Signals, Visibility};

pub use rules::{CategoryRule, SignalRules};

/// Label used when the language map is empty.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Build the signals for a fetched repository.
pub fn extract(bundle: &RawFactsBundle, rules: &SignalRules) -> Signals {
    let files: Vec<&str> = entries_of(bundle, EntryKind::Blob).collect();
    let folders: Vec<&str> = entries_of(bundle, EntryKind::Tree).collect();

    let languages_used: Vec<String> = bundle.languages.keys().cloned().collect();
    let primary_language = languages_used
        .first()
        .cloned()
        .unwrap_or_else(|| UNKNOWN_LANGUAGE.to_string());

    let readme_text = bundle.readme.as_ref().map(readme::decode).unwrap_or_default();
    let stats = commits::commit_stats(&bundle.commits);

    Signals {
        repo_name: bundle.repo.name.clone(),
        visibility: if bundle.repo.private {
            Visibility::Private
        } else {
            Visibility::Public
        },

        primary_language,
        languages_used,

        file_count: files.len(),
        folder_depth: folders
            .iter()
            .map(|path| path.split('/').count())
            .max()
            .unwrap_or(0),

        has_src_folder: folders.iter().any(|path| *path == "src"),
        has_tests_folder: folders.iter().any(|path| path.contains("test")),
        has_docs_folder: folders.iter().any(|path| path.contains("docs")),

        readme_present: bundle.readme.is_some(),
        readme_word_count: readme::word_count(&readme_text),
        readme_has_setup: readme::has_any_keyword(&readme_text, &rules.setup_keywords),

        linting_configured: any_path_contains(&files, &rules.lint_markers),
        ci_pipeline_present: any_path_contains(&files, &rules.ci_markers),

        commit_count: stats.commit_count,
        avg_commits_per_week: commits::round2(stats.average),
        commit_consistency: CommitConsistency::from_average(stats.average),

        project_category: rules.categorize(&files).to_string(),

        weekly_commits: stats.weekly,
    }
}

fn entries_of(bundle: &RawFactsBundle, kind: EntryKind) -> impl Iterator<Item = &str> {
    bundle
        .tree
        .tree
        .iter()
        .filter(move |entry| entry.kind == kind)
        .map(|entry| entry.path.as_str())
}

fn any_path_contains(paths: &[&str], markers: &[String]) -> bool {
    paths
        .iter()
        .any(|path| markers.iter().any(|m| !m.is_empty() && path.contains(m.as_str())))
}
