//! Executive slide composition: at most five prefixed bullets.

use serde::{Deserialize, Serialize};

use crate::models::{CategorizedSignals, Category, ReportItem};

pub const BLOCKER_PREFIX: &str = "Biggest Blocker:";
pub const RISK_PREFIX: &str = "Top Risk:";
pub const TASK_PREFIX: &str = "Task Completed:";
pub const WIN_PREFIX: &str = "Major Win:";

pub const MAX_BULLETS: usize = 5;
const MAX_TASKS: usize = 2;
const MAX_BLOCKERS: usize = 1;
const MAX_WINS: usize = 1;
const MAX_RISKS: usize = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "Top Tasks Done", default)]
    pub tasks_done: Vec<String>,
    #[serde(rename = "Top Blockers", default)]
    pub blockers: Vec<String>,
    #[serde(rename = "Top Wins", default)]
    pub wins: Vec<String>,
    #[serde(rename = "Top Risks", default)]
    pub risks: Vec<String>,
}

impl Summary {
    /// Takes the leading entries of each bucket up to the slot caps.
    pub fn from_signals(signals: &CategorizedSignals) -> Self {
        fn head(items: &[String], cap: usize) -> Vec<String> {
            items.iter().take(cap).cloned().collect()
        }

        Self {
            tasks_done: head(&signals.tasks, MAX_TASKS),
            blockers: head(&signals.blockers, MAX_BLOCKERS),
            wins: head(&signals.wins, MAX_WINS),
            risks: head(&signals.risks, MAX_RISKS),
        }
    }
}

/// Builds the slide bullets in fixed order: blocker, risk, up to two tasks,
/// one win. Slot caps are re-applied here, so oversized summaries are safe.
pub fn compose(summary: &Summary) -> Vec<String> {
    let mut bullets = Vec::new();

    if let Some(blocker) = summary.blockers.first() {
        bullets.push(format!("{BLOCKER_PREFIX} {blocker}"));
    }
    if let Some(risk) = summary.risks.first() {
        bullets.push(format!("{RISK_PREFIX} {risk}"));
    }
    for task in summary.tasks_done.iter().take(MAX_TASKS) {
        bullets.push(format!("{TASK_PREFIX} {task}"));
    }
    for win in summary.wins.iter().take(MAX_WINS) {
        bullets.push(format!("{WIN_PREFIX} {win}"));
    }

    bullets.truncate(MAX_BULLETS);
    bullets
}

impl ReportItem {
    /// Splits a bullet back into its category and content. Bullets without a
    /// known prefix are kept whole as tasks.
    pub fn from_bullet(bullet: &str) -> Self {
        let prefixes = [
            (BLOCKER_PREFIX, Category::Blocker),
            (RISK_PREFIX, Category::Risk),
            (TASK_PREFIX, Category::Task),
            (WIN_PREFIX, Category::Win),
        ];

        for (prefix, category) in prefixes {
            if let Some(rest) = bullet.strip_prefix(prefix) {
                return Self {
                    category,
                    content: rest.trim().to_string(),
                };
            }
        }

        Self {
            category: Category::Task,
            content: bullet.to_string(),
        }
    }
}
