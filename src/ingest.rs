//! Normalizes raw team-status input into [`WorkSignal`]s.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::IngestError;
use crate::models::WorkSignal;

pub const UNKNOWN_SECTION: &str = "Unknown";
pub const TEXT_INPUT_SECTION: &str = "Text Input";

const KNOWN_COLUMNS: [&str; 5] = [
    "Section",
    "Feedback",
    "Changed_Since_Last_Week",
    "Report_Date",
    "Leadership_Viewed",
];

/// Where a batch of signals comes from.
#[derive(Debug, Clone)]
pub enum SignalInput {
    Csv(Vec<u8>),
    Text(String),
    Demo,
}

impl SignalInput {
    /// An empty text body counts as no input at all. Whitespace-only text is
    /// still input; it just yields no signals.
    pub fn is_missing(&self) -> bool {
        matches!(self, SignalInput::Text(text) if text.is_empty())
    }

    pub fn load(&self, today: NaiveDate) -> Result<Vec<WorkSignal>, IngestError> {
        match self {
            SignalInput::Csv(bytes) => signals_from_csv(bytes.as_slice(), today),
            SignalInput::Text(text) => Ok(signals_from_text(text, today)),
            SignalInput::Demo => Ok(demo_signals()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Section", default)]
    section: Option<String>,
    #[serde(rename = "Feedback", default)]
    feedback: Option<String>,
    #[serde(rename = "Changed_Since_Last_Week", default)]
    changed_since_last_week: Option<String>,
    #[serde(rename = "Report_Date", default)]
    report_date: Option<String>,
    #[serde(rename = "Leadership_Viewed", default)]
    leadership_viewed: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn is_yes(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("yes"))
}

impl CsvRow {
    fn into_signal(self, today: NaiveDate) -> WorkSignal {
        let feedback = non_empty(self.feedback).unwrap_or_default();
        let changed = is_yes(self.changed_since_last_week.as_deref());
        let viewed = self.leadership_viewed.as_deref() == Some("Yes");
        let report_date = non_empty(self.report_date).unwrap_or_else(|| today.to_string());
        let section = non_empty(self.section).unwrap_or_else(|| UNKNOWN_SECTION.to_string());

        WorkSignal::new(section, feedback.clone(), changed, report_date, feedback)
            .with_leadership_viewed(viewed)
    }
}

/// Reads signals from CSV with a header row.
///
/// The `Feedback` column doubles as the signal text. Missing or empty cells
/// fall back to defaults; a header that names none of the expected columns is
/// rejected.
pub fn signals_from_csv<R: std::io::Read>(
    reader: R,
    today: NaiveDate,
) -> Result<Vec<WorkSignal>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Ok(Vec::new());
    }
    if !headers.iter().any(|h| KNOWN_COLUMNS.contains(&h)) {
        return Err(IngestError::UnrecognizedHeader(
            headers.iter().collect::<Vec<_>>().join(", "),
        ));
    }

    let mut signals = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        signals.push(result?.into_signal(today));
    }

    tracing::debug!(count = signals.len(), "parsed CSV signals");
    Ok(signals)
}

/// One signal per non-blank line of free text.
pub fn signals_from_text(text: &str, today: NaiveDate) -> Vec<WorkSignal> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| WorkSignal::new(TEXT_INPUT_SECTION, line, true, today.to_string(), ""))
        .collect()
}

pub fn demo_signals() -> Vec<WorkSignal> {
    let thumbs_up = "\u{1F44D}";
    vec![
        WorkSignal::new(
            "Security",
            "Security audit identified 3 critical vulnerabilities requiring immediate patching",
            true,
            "2025-04-14",
            thumbs_up,
        ),
        WorkSignal::new(
            "Sales Performance",
            "Q2 revenue projections 15% below target due to delayed product launch",
            true,
            "2025-04-11",
            "",
        ),
        WorkSignal::new(
            "Tech Debt",
            "API integration with payment processor blocked by missing documentation",
            true,
            "2025-04-13",
            "",
        ),
        WorkSignal::new(
            "Customer Feedback",
            "Customer retention increased 12% following new onboarding implementation",
            true,
            "2025-04-09",
            thumbs_up,
        ),
        WorkSignal::new(
            "Sprint velocity",
            "Sprint velocity improved 8% this quarter through process optimization",
            true,
            "2025-04-12",
            "",
        ),
    ]
}
