//! Weighted priority scoring with recency decay.

use chrono::NaiveDate;

use crate::classify::{contains_any, BLOCKER_KEYWORDS, WIN_KEYWORDS};
use crate::config::ScoringConfig;
use crate::models::{CategorizedSignals, Category, ScoredItem, WorkSignal};

/// Risk vocabulary for the scoring pass. Matches the bare word "potential",
/// which is broader than the categorize-only list.
pub const SCORER_RISK_KEYWORDS: [&str; 8] = [
    "risk",
    "concern",
    "warning",
    "potential",
    "might",
    "could",
    "below target",
    "vulnerabilities",
];

/// Sub-scores are on a 0..=5 scale; recency and votes are unit-scaled.
const SCALE: f64 = 5.0;
const RECENCY_FLOOR: f64 = 0.5;
const DECAY_DAYS: f64 = 14.0;

pub fn urgency(changed_since_last_week: bool) -> f64 {
    if changed_since_last_week {
        5.0
    } else {
        2.0
    }
}

/// `max(0.5, 1 - days/14)`. Negative days (future reports) are not clamped.
pub fn recency_score(days_since: i64) -> f64 {
    (1.0 - days_since as f64 / DECAY_DAYS).max(RECENCY_FLOOR)
}

/// Unparseable report dates score at the floor.
pub fn recency_for(signal: &WorkSignal, today: NaiveDate) -> f64 {
    match signal.report_day() {
        Some(day) => recency_score((today - day).num_days()),
        None => RECENCY_FLOOR,
    }
}

/// Blocker, then risk, then win, else task.
pub fn score_category(text: &str) -> Category {
    let text = text.to_lowercase();
    if contains_any(&text, &BLOCKER_KEYWORDS) {
        Category::Blocker
    } else if contains_any(&text, &SCORER_RISK_KEYWORDS) {
        Category::Risk
    } else if contains_any(&text, &WIN_KEYWORDS) {
        Category::Win
    } else {
        Category::Task
    }
}

pub fn score_signal(signal: &WorkSignal, today: NaiveDate, config: &ScoringConfig) -> ScoredItem {
    let weights = &config.weights;
    let impact = f64::from(config.impact_for(signal.section()));
    let recency = recency_for(signal, today);
    let votes = if config.has_vote(signal.feedback()) {
        1.0
    } else {
        0.0
    };

    let score = weights.urgency * urgency(signal.changed_since_last_week())
        + weights.impact * impact
        + weights.recency * recency * SCALE
        + weights.votes * votes * SCALE;

    ScoredItem {
        text: signal.text().to_string(),
        score,
        category: score_category(signal.text()),
    }
}

/// Scores every signal and sorts by score, highest first. Equal scores keep
/// their input order.
pub fn score_signals(
    signals: &[WorkSignal],
    today: NaiveDate,
    config: &ScoringConfig,
) -> Vec<ScoredItem> {
    let mut scored: Vec<ScoredItem> = signals
        .iter()
        .map(|signal| score_signal(signal, today, config))
        .collect();
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored
}

pub fn prioritize(
    signals: &[WorkSignal],
    today: NaiveDate,
    config: &ScoringConfig,
) -> CategorizedSignals {
    let mut prioritized = CategorizedSignals::default();
    for item in score_signals(signals, today, config) {
        prioritized.push(item.category, item.text);
    }

    tracing::debug!(signals = signals.len(), "prioritized signals");
    prioritized
}
