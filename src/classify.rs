//! Keyword categorization for the summary path that skips scoring.

use crate::models::{CategorizedSignals, Category, WorkSignal};

pub const BLOCKER_KEYWORDS: [&str; 7] = [
    "blocked", "blocker", "stuck", "waiting", "delayed", "issue", "missing",
];

pub const WIN_KEYWORDS: [&str; 8] = [
    "completed",
    "launched",
    "shipped",
    "success",
    "milestone",
    "achievement",
    "increased",
    "improved",
];

pub const RISK_KEYWORDS: [&str; 8] = [
    "risk",
    "concern",
    "warning",
    "potential issue",
    "might",
    "could",
    "below target",
    "vulnerabilities",
];

pub(crate) fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}

/// First match wins: blocker, then win, then risk, else task.
pub fn categorize_text(text: &str) -> Category {
    let text = text.to_lowercase();
    if contains_any(&text, &BLOCKER_KEYWORDS) {
        Category::Blocker
    } else if contains_any(&text, &WIN_KEYWORDS) {
        Category::Win
    } else if contains_any(&text, &RISK_KEYWORDS) {
        Category::Risk
    } else {
        Category::Task
    }
}

/// Buckets every signal, keeping input order within each bucket.
pub fn categorize(signals: &[WorkSignal]) -> CategorizedSignals {
    let mut categorized = CategorizedSignals::default();
    for signal in signals {
        categorized.push(categorize_text(signal.text()), signal.text().to_string());
    }

    tracing::debug!(
        tasks = categorized.tasks.len(),
        blockers = categorized.blockers.len(),
        wins = categorized.wins.len(),
        risks = categorized.risks.len(),
        "categorized signals"
    );
    categorized
}
