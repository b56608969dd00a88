//! Commit-frequency bucketing.
//!
//! A bucket is `"<year>-<ceil(day_of_month / 7)>"`: a calendar-day grouping
//! that restarts every month (at most five buckets per month) and ignores
//! the month itself, so the same week-of-month in different months of one
//! year shares a bucket. Dates are taken in UTC so the result never depends
//! on the host timezone.

use chrono::{DateTime, Datelike, Utc};
use indexmap::IndexMap;

use crate::models::raw::CommitItem;

/// Aggregate commit statistics for a commit list.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitStats {
    pub commit_count: usize,
    /// Unrounded mean commits per bucket; `0.0` for no buckets.
    pub average: f64,
    /// Bucket counts in encounter order, reversed.
    pub weekly: Vec<u32>,
}

/// Bucket key for a single author date.
pub fn bucket_key(date: &DateTime<Utc>) -> String {
    format!("{:04}-{}", date.year(), date.day().div_ceil(7))
}

/// Count commits per bucket, preserving first-encounter order.
///
/// Commits without a parseable author date are skipped.
pub fn bucket_counts(commits: &[CommitItem]) -> IndexMap<String, u32> {
    let mut buckets: IndexMap<String, u32> = IndexMap::new();
    for date in commits.iter().filter_map(CommitItem::author_date) {
        *buckets.entry(bucket_key(&date)).or_insert(0) += 1;
    }
    buckets
}

/// Compute count, average and the charting series.
///
/// The series reverses encounter order because the API lists newest
/// commits first. Keys are not sorted, so this is only approximately
/// chronological.
pub fn commit_stats(commits: &[CommitItem]) -> CommitStats {
    let buckets = bucket_counts(commits);
    let total: u32 = buckets.values().sum();
    let average = f64::from(total) / buckets.len().max(1) as f64;

    let mut weekly: Vec<u32> = buckets.into_values().collect();
    weekly.reverse();

    CommitStats {
        commit_count: commits.len(),
        average,
        weekly,
    }
}

/// Round to two decimal places for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
