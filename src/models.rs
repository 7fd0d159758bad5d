use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One reported item of work status.
///
/// Built once by the normalizer and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkSignal {
    section: String,
    text: String,
    changed_since_last_week: bool,
    report_date: String,
    feedback: String,
    leadership_viewed: bool,
}

impl WorkSignal {
    pub fn new(
        section: impl Into<String>,
        text: impl Into<String>,
        changed_since_last_week: bool,
        report_date: impl Into<String>,
        feedback: impl Into<String>,
    ) -> Self {
        Self {
            section: section.into(),
            text: text.into(),
            changed_since_last_week,
            report_date: report_date.into(),
            feedback: feedback.into(),
            leadership_viewed: false,
        }
    }

    pub fn with_leadership_viewed(mut self, viewed: bool) -> Self {
        self.leadership_viewed = viewed;
        self
    }

    pub fn section(&self) -> &str {
        &self.section
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn changed_since_last_week(&self) -> bool {
        self.changed_since_last_week
    }

    /// The raw date string as it was reported.
    pub fn report_date(&self) -> &str {
        &self.report_date
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    pub fn leadership_viewed(&self) -> bool {
        self.leadership_viewed
    }

    /// Parses the report date, accepting plain `YYYY-MM-DD` dates as well as
    /// RFC 3339 timestamps. Returns `None` when neither form matches.
    pub fn report_day(&self) -> Option<NaiveDate> {
        let raw = self.report_date.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| {
                DateTime::parse_from_rfc3339(raw)
                    .ok()
                    .map(|ts| ts.with_timezone(&Utc).date_naive())
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Task,
    Blocker,
    Win,
    Risk,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Task => "task",
            Category::Blocker => "blocker",
            Category::Win => "win",
            Category::Risk => "risk",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredItem {
    pub text: String,
    pub score: f64,
    pub category: Category,
}

/// Signal texts partitioned into the four categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedSignals {
    pub tasks: Vec<String>,
    pub blockers: Vec<String>,
    pub wins: Vec<String>,
    pub risks: Vec<String>,
}

impl CategorizedSignals {
    pub fn push(&mut self, category: Category, text: String) {
        match category {
            Category::Task => self.tasks.push(text),
            Category::Blocker => self.blockers.push(text),
            Category::Win => self.wins.push(text),
            Category::Risk => self.risks.push(text),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len() + self.blockers.len() + self.wins.len() + self.risks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportItem {
    #[serde(rename = "type")]
    pub category: Category,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<ReportItem>,
    pub acknowledged: bool,
    pub acknowledged_at: Option<DateTime<Utc>>,
    pub use_auto_summarization: bool,
    pub enable_priority_scoring: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcknowledgementEntry {
    pub actor: String,
    pub report_date: NaiveDate,
    pub acknowledged: bool,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcknowledgementStats {
    pub total: usize,
    pub acknowledged: usize,
}

impl AcknowledgementStats {
    /// Whole-number share of acknowledged entries, 0 when nothing was logged.
    pub fn review_percentage(&self) -> u32 {
        if self.total == 0 {
            0
        } else {
            ((self.acknowledged as f64 / self.total as f64) * 100.0).round() as u32
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionEngagement {
    pub section: String,
    pub update_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionQuality {
    pub section: String,
    pub low_quality_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootCauseCount {
    pub phrase: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalAnalysis {
    pub engagement: Vec<SectionEngagement>,
    pub quality: Vec<SectionQuality>,
    pub root_causes: Vec<RootCauseCount>,
    pub leadership_view_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_day_accepts_dates_and_timestamps() {
        let plain = WorkSignal::new("Security", "", true, "2025-04-14", "");
        assert_eq!(plain.report_day(), NaiveDate::from_ymd_opt(2025, 4, 14));

        let stamped = WorkSignal::new("Security", "", true, "2025-04-14T12:00:00Z", "");
        assert_eq!(stamped.report_day(), NaiveDate::from_ymd_opt(2025, 4, 14));

        let garbage = WorkSignal::new("Security", "", true, "last tuesday", "");
        assert_eq!(garbage.report_day(), None);
    }

    #[test]
    fn review_percentage_handles_empty_log() {
        assert_eq!(AcknowledgementStats::default().review_percentage(), 0);
        let stats = AcknowledgementStats {
            total: 60,
            acknowledged: 10,
        };
        assert_eq!(stats.review_percentage(), 17);
    }
}
