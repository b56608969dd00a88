//! Terminal renderer: styled sections for a single analysis.
//!
//! Overview, score, understanding, summary, roadmap, then commit activity
//! as a horizontal bar chart. No tables.

use colored::{ColoredString, Colorize};

use crate::models::record::extract_score_value;
use crate::models::{AnalysisRecord, ScoreTier, Signals, Task};
use crate::orchestrator::AnalysisReport;
use crate::output::OutputRenderer;

/// Widest bar in the commit chart, in characters.
const CHART_WIDTH: usize = 30;

/// Terminal output renderer with colored, flowing text.
pub struct TerminalRenderer;

impl OutputRenderer for TerminalRenderer {
    fn render(&self, report: &AnalysisReport) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            " {} {}\n",
            format!("{}/{}", report.repo.owner, report.repo.name).bold(),
            report.repo.url.dimmed()
        ));
        output.push_str(&rule());

        render_overview(&mut output, &report.signals);

        section(&mut output, "Score");
        match report.output(Task::Score) {
            Some(text) => match extract_score_value(text) {
                Some(value) => {
                    let tier = ScoreTier::from_score(value);
                    output.push_str(&format!(
                        "   {} {} {}\n",
                        tier_color(tier, &value.to_string()).bold(),
                        "/ 100".dimmed(),
                        format!("({tier})").dimmed()
                    ));
                }
                None => output.push_str(&format!("   {text}\n")),
            },
            None => output.push_str(&unavailable()),
        }

        section(&mut output, "Understanding");
        match (&report.understanding, report.output(Task::Understanding)) {
            (Some(u), _) => {
                output.push_str(&field("Project type", &u.project_type));
                output.push_str(&field("Maturity", &u.maturity_level));
                output.push_str(&field("Production ready", &yes_no(u.production_ready)));
                if !u.short_reason.is_empty() {
                    output.push_str(&format!("   {} {}\n", "→".cyan(), u.short_reason));
                }
            }
            (None, Some(raw)) => output.push_str(&indent(raw)),
            (None, None) => output.push_str(&unavailable()),
        }

        for (task, title) in [(Task::Summary, "Summary"), (Task::Roadmap, "Roadmap")] {
            section(&mut output, title);
            match report.output(task) {
                Some(text) if !text.is_empty() => output.push_str(&indent(text)),
                Some(_) => output.push_str(&format!("   {}\n", "(empty response)".dimmed())),
                None => output.push_str(&unavailable()),
            }
        }

        section(&mut output, "Commit activity");
        let chart = commit_chart(&report.signals.weekly_commits, CHART_WIDTH);
        if chart.is_empty() {
            output.push_str(&format!("   {}\n", "No commit history available".dimmed()));
        } else {
            for line in chart {
                output.push_str(&format!("   {line}\n"));
            }
        }

        if !report.failed_tasks.is_empty() {
            output.push('\n');
            for failed in &report.failed_tasks {
                output.push_str(&format!(
                    " {} {} failed: {}\n",
                    "✖".red().bold(),
                    failed.task.to_string().bold(),
                    failed.error
                ));
            }
        }

        output.push_str(&rule());
        output
    }

    fn render_history(&self, records: &[AnalysisRecord]) -> String {
        if records.is_empty() {
            return format!("{}", "  No saved analyses.\n".dimmed());
        }

        let mut output = String::new();
        for record in records {
            let score = match record.score_value {
                Some(v) => tier_color(ScoreTier::from_score(v), &format!("{v:>3}")).bold(),
                None => "  -".dimmed(),
            };
            output.push_str(&format!(
                " {} {} {} {}\n",
                score,
                format!("{}/{}", record.repo.owner, record.repo.name).bold(),
                record.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
                record.id.to_string().dimmed()
            ));
        }
        output
    }
}

fn render_overview(output: &mut String, s: &Signals) {
    section(output, "Overview");
    output.push_str(&field(
        "Language",
        &format!("{} ({})", s.primary_language, s.languages_used.join(", ")),
    ));
    output.push_str(&field("Category", &s.project_category));
    output.push_str(&field("Visibility", &format!("{:?}", s.visibility).to_lowercase()));
    output.push_str(&field(
        "Files",
        &format!("{} (max depth {})", s.file_count, s.folder_depth),
    ));
    output.push_str(&format!(
        "   {:<18}{} src  {} tests  {} docs\n",
        "Folders".dimmed(),
        check(s.has_src_folder),
        check(s.has_tests_folder),
        check(s.has_docs_folder)
    ));
    output.push_str(&format!(
        "   {:<18}{} present  {} words  {} setup guide\n",
        "README".dimmed(),
        check(s.readme_present),
        s.readme_word_count,
        check(s.readme_has_setup)
    ));
    output.push_str(&format!(
        "   {:<18}{} linting  {} CI\n",
        "Tooling".dimmed(),
        check(s.linting_configured),
        check(s.ci_pipeline_present)
    ));
    output.push_str(&field(
        "Commits",
        &format!(
            "{} ({:.2}/week, {})",
            s.commit_count, s.avg_commits_per_week, s.commit_consistency
        ),
    ));
}

/// Horizontal bars for per-bucket commit counts, scaled to `width`.
///
/// Every non-zero bucket gets at least one block.
pub fn commit_chart(weekly: &[u32], width: usize) -> Vec<String> {
    let Some(&max) = weekly.iter().max() else {
        return Vec::new();
    };
    let label_width = weekly.len().to_string().len() + 1;

    weekly
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let len = if max == 0 {
                0
            } else {
                ((count as usize * width) / max as usize).max(usize::from(count > 0))
            };
            format!(
                "{:>label_width$} {} {count}",
                format!("#{}", i + 1),
                "█".repeat(len)
            )
        })
        .collect()
}

fn tier_color(tier: ScoreTier, text: &str) -> ColoredString {
    match tier {
        ScoreTier::Excellent => text.green(),
        ScoreTier::Good => text.blue(),
        ScoreTier::Fair => text.yellow(),
        ScoreTier::NeedsWork => text.red(),
    }
}

fn section(output: &mut String, title: &str) {
    output.push_str(&format!("\n {}\n", title.bold().underline()));
}

fn field(label: &str, value: &str) -> String {
    format!("   {:<18}{}\n", label.dimmed(), value)
}

fn indent(text: &str) -> String {
    text.lines().map(|l| format!("   {l}\n")).collect()
}

fn check(flag: bool) -> ColoredString {
    if flag { "✔".green() } else { "✖".red() }
}

fn yes_no(flag: bool) -> String {
    if flag { "yes".to_string() } else { "no".to_string() }
}

fn unavailable() -> String {
    format!("   {}\n", "unavailable".dimmed())
}

fn rule() -> String {
    format!("{}\n", "───────────────────────────────────".dimmed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::raw::{CommitItem, RawFactsBundle, TreeEntry};
    use crate::models::{RepoIdentifier, RepoRef, Understanding};
    use crate::orchestrator::FailedTask;
    use crate::signals::{self, SignalRules};
    use chrono::{TimeZone, Utc};
    use indexmap::IndexMap;

    fn report(outputs: &[(Task, &str)]) -> AnalysisReport {
        colored::control::set_override(false);

        let mut bundle = RawFactsBundle::default();
        bundle.repo.name = "todo".into();
        bundle.tree.tree = vec![TreeEntry::tree("src"), TreeEntry::blob("src/main.rs")];
        bundle.commits = vec![
            CommitItem::authored_at(Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()),
            CommitItem::authored_at(Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap()),
        ];

        AnalysisReport {
            repo: RepoRef::from_identifier(&RepoIdentifier::new("alice", "todo"), "https://github.com/alice/todo"),
            signals: signals::extract(&bundle, &SignalRules::default()),
            outputs: outputs
                .iter()
                .map(|(t, s)| (*t, s.to_string()))
                .collect::<IndexMap<_, _>>(),
            understanding: None,
            failed_tasks: Vec::new(),
            history_save: None,
        }
    }

    #[test]
    fn render_full_report() {
        let mut r = report(&[
            (Task::Score, "Score: 92 / 100"),
            (Task::Summary, "Clean layout.\nNeeds tests."),
            (Task::Roadmap, "- Add tests\n- Add CI"),
        ]);
        r.understanding = Some(Understanding {
            project_type: "cli".into(),
            maturity_level: "beginner".into(),
            production_ready: false,
            short_reason: "no tests".into(),
        });

        let output = TerminalRenderer.render(&r);
        assert!(output.contains("alice/todo"));
        assert!(output.contains("92 / 100 (excellent)"));
        assert!(output.contains("   Needs tests.\n"));
        assert!(output.contains("- Add CI"));
        assert!(output.contains("Production ready  no"));
        assert!(output.contains("#1 ██████████████████████████████ 2"));
    }

    #[test]
    fn render_missing_outputs_and_failures() {
        let mut r = report(&[(Task::Score, "Score: unknown")]);
        r.failed_tasks.push(FailedTask {
            task: Task::Roadmap,
            error: "completion timed out after 5s".into(),
        });

        let output = TerminalRenderer.render(&r);
        assert!(output.contains("Score: unknown"));
        assert!(output.contains("unavailable"));
        assert!(output.contains("roadmap failed: completion timed out after 5s"));
    }

    #[test]
    fn chart_scales_to_width() {
        colored::control::set_override(false);
        let chart = commit_chart(&[1, 4, 0, 2], 8);
        assert_eq!(chart.len(), 4);
        assert_eq!(chart[0], "#1 ██ 1");
        assert_eq!(chart[1], "#2 ████████ 4");
        assert_eq!(chart[2], "#3  0");
        assert_eq!(chart[3], "#4 ████ 2");
    }

    #[test]
    fn chart_small_counts_get_one_block() {
        let chart = commit_chart(&[1, 100], 10);
        assert_eq!(chart[0], "#1 █ 1");
    }

    #[test]
    fn chart_empty() {
        assert!(commit_chart(&[], 10).is_empty());
    }

    #[test]
    fn render_empty_history() {
        colored::control::set_override(false);
        let output = TerminalRenderer.render_history(&[]);
        assert!(output.contains("No saved analyses"));
    }
}
