//! Prompt templates for each analysis task.
//!
//! Every prompt embeds the signals as pretty-printed JSON and instructs
//! the model to rely on them alone.

use crate::models::{Task, TaskPrompt};

const UNDERSTANDING_SYSTEM: &str = "\
You are Gitana, an AI software mentor.
Respond ONLY in valid JSON.";

const UNDERSTANDING_USER: &str = "\
Based ONLY on the repository signals below, determine:
1. Project type
2. Maturity level (beginner / intermediate / advanced)
3. Whether it is production-ready

Repository Signals:
{signals}

Return JSON:
{
  \"project_type\": \"\",
  \"maturity_level\": \"\",
  \"production_ready\": true,
  \"short_reason\": \"\"
}";

const SCORE_SYSTEM: &str = "You are an expert code reviewer.";

const SCORE_USER: &str = "\
Evaluate the repository using ONLY the signals below.

Scoring:
- Structure & organization (25)
- Documentation (15)
- Testing & maintainability (15)
- Version control practices (15)
- Real-world relevance (20)
- Tooling & automation (10)

Repository Signals:
{signals}

Return EXACTLY:
Score: XX / 100";

const SUMMARY_SYSTEM: &str = "You are a senior developer reviewing a student's project.";

const SUMMARY_USER: &str = "\
Write a short evaluation (2–3 sentences) covering:
- Key strengths
- Main weaknesses

Use ONLY these repository signals:
{signals}";

const ROADMAP_SYSTEM: &str = "You are a coding mentor.";

const ROADMAP_USER: &str = "\
Generate a personalized improvement roadmap.

Rules:
- Bullet points
- Actionable steps
- Highest-impact first
- Assume the developer is a student
- Use ONLY the given signals

Repository Signals:
{signals}";

/// Render the system and user prompts for `task`.
pub fn build(task: Task, signals: &serde_json::Value) -> TaskPrompt {
    let (system, template) = match task {
        Task::Understanding => (UNDERSTANDING_SYSTEM, UNDERSTANDING_USER),
        Task::Score => (SCORE_SYSTEM, SCORE_USER),
        Task::Summary => (SUMMARY_SYSTEM, SUMMARY_USER),
        Task::Roadmap => (ROADMAP_SYSTEM, ROADMAP_USER),
    };

    let pretty = serde_json::to_string_pretty(signals).unwrap_or_else(|_| signals.to_string());

    TaskPrompt {
        task,
        system: system.trim().to_string(),
        user: template.replace("{signals}", &pretty).trim().to_string(),
    }
}
