//! The closed set of analysis tasks.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// One of the fixed analysis modes sent to the completion service.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Task {
    /// Project type, maturity level, production readiness (JSON output).
    Understanding,
    /// `Score: NN / 100`.
    Score,
    /// Two or three sentences on strengths and weaknesses.
    Summary,
    /// Bullet-point improvement plan.
    Roadmap,
}

impl Task {
    /// All tasks in dispatch order.
    pub fn all() -> Vec<Task> {
        Task::iter().collect()
    }
}

/// A fully rendered prompt pair for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPrompt {
    pub task: Task,
    pub system: String,
    pub user: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names() {
        assert_eq!("understanding".parse::<Task>().unwrap(), Task::Understanding);
        assert_eq!("score".parse::<Task>().unwrap(), Task::Score);
        assert_eq!("summary".parse::<Task>().unwrap(), Task::Summary);
        assert_eq!("roadmap".parse::<Task>().unwrap(), Task::Roadmap);
    }

    #[test]
    fn rejects_unknown_names() {
        assert!("grade".parse::<Task>().is_err());
        assert!("".parse::<Task>().is_err());
        assert!("Score".parse::<Task>().is_err());
    }

    #[test]
    fn display_matches_wire_name() {
        for task in Task::all() {
            let wire = serde_json::to_value(task).unwrap();
            assert_eq!(wire.as_str().unwrap(), task.to_string());
        }
    }

    #[test]
    fn all_has_four_tasks() {
        assert_eq!(Task::all().len(), 4);
    }
}
