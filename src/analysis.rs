use std::collections::HashMap;

use crate::models::{
    RootCauseCount, SectionEngagement, SectionQuality, SignalAnalysis, WorkSignal,
};

pub const LOW_QUALITY_PHRASES: [&str; 7] = [
    "needs clarity",
    "duplicate",
    "remove",
    "not relevant",
    "why is this",
    "who owns this",
    "update next week",
];

pub const ROOT_CAUSE_PHRASES: [&str; 6] = [
    "duplicate info",
    "needs clarity",
    "remove this",
    "update next week",
    "who owns this",
    "why is this",
];

pub fn is_low_quality(text: &str) -> bool {
    let text = text.to_lowercase();
    LOW_QUALITY_PHRASES.iter().any(|phrase| text.contains(phrase))
}

/// Per-section `(total, hits)` counts in first-seen section order.
fn tally_by_section<F>(signals: &[WorkSignal], is_hit: F) -> Vec<(String, usize, usize)>
where
    F: Fn(&WorkSignal) -> bool,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<(String, usize, usize)> = Vec::new();

    for signal in signals {
        let slot = *index.entry(signal.section()).or_insert_with(|| {
            tallies.push((signal.section().to_string(), 0, 0));
            tallies.len() - 1
        });
        let entry = &mut tallies[slot];
        entry.1 += 1;
        if is_hit(signal) {
            entry.2 += 1;
        }
    }

    tallies
}

fn rate(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

fn descending(a: f64, b: f64) -> std::cmp::Ordering {
    b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
}

pub fn engagement_by_section(signals: &[WorkSignal]) -> Vec<SectionEngagement> {
    let mut summary: Vec<SectionEngagement> =
        tally_by_section(signals, WorkSignal::changed_since_last_week)
            .into_iter()
            .map(|(section, total, updated)| SectionEngagement {
                section,
                update_rate: rate(updated, total),
            })
            .collect();
    summary.sort_by(|a, b| descending(a.update_rate, b.update_rate));
    summary
}

pub fn quality_by_section(signals: &[WorkSignal]) -> Vec<SectionQuality> {
    let mut summary: Vec<SectionQuality> =
        tally_by_section(signals, |signal| is_low_quality(signal.text()))
            .into_iter()
            .map(|(section, total, low_quality)| SectionQuality {
                section,
                low_quality_rate: rate(low_quality, total),
            })
            .collect();
    summary.sort_by(|a, b| descending(a.low_quality_rate, b.low_quality_rate));
    summary
}

/// Counts root-cause phrases across all feedback joined into one lower-cased
/// string, so a phrase may straddle two adjacent feedback entries.
pub fn root_cause_counts(signals: &[WorkSignal]) -> Vec<RootCauseCount> {
    let joined = signals
        .iter()
        .map(WorkSignal::feedback)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut counts: Vec<RootCauseCount> = ROOT_CAUSE_PHRASES
        .iter()
        .map(|phrase| RootCauseCount {
            phrase: phrase.to_string(),
            count: joined.matches(phrase).count(),
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

pub fn analyze(signals: &[WorkSignal]) -> SignalAnalysis {
    let viewed = signals.iter().filter(|s| s.leadership_viewed()).count();

    SignalAnalysis {
        engagement: engagement_by_section(signals),
        quality: quality_by_section(signals),
        root_causes: root_cause_counts(signals),
        leadership_view_rate: rate(viewed, signals.len()),
    }
}
