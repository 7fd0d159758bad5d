//! End-to-end report generation and acknowledgement.

use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::classify::categorize;
use crate::config::ScoringConfig;
use crate::error::{Error, Result};
use crate::ingest::SignalInput;
use crate::models::{Report, ReportItem, WorkSignal};
use crate::priority::prioritize;
use crate::rewrite::{rewrite_bullets, ToneRewriter};
use crate::slide::{compose, Summary};
use crate::store::{AcknowledgementLog, ReportStore};

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub enable_priority_scoring: bool,
    pub scoring: ScoringConfig,
}

/// The pure part of generation: signals to slide bullets.
pub fn summarize(
    signals: &[WorkSignal],
    now: DateTime<Utc>,
    options: &GenerateOptions,
) -> Vec<String> {
    let categorized = if options.enable_priority_scoring {
        prioritize(signals, now.date_naive(), &options.scoring)
    } else {
        categorize(signals)
    };
    compose(&Summary::from_signals(&categorized))
}

/// Loads signals, builds the bullets, optionally rewrites them, and saves the
/// resulting report. Returns the signals alongside the report so callers can
/// render the supporting views.
pub async fn generate_report(
    input: Option<&SignalInput>,
    options: &GenerateOptions,
    rewriter: Option<&dyn ToneRewriter>,
    store: &dyn ReportStore,
    now: DateTime<Utc>,
) -> Result<(Report, Vec<WorkSignal>)> {
    let input = input
        .filter(|input| !input.is_missing())
        .ok_or(Error::NoInput)?;
    let signals = input.load(now.date_naive())?;

    let bullets = summarize(&signals, now, options);
    let bullets = match rewriter {
        Some(rewriter) => rewrite_bullets(rewriter, &bullets).await,
        None => bullets,
    };

    let report = Report {
        id: Uuid::new_v4(),
        generated_at: now,
        items: bullets.iter().map(|b| ReportItem::from_bullet(b)).collect(),
        acknowledged: false,
        acknowledged_at: None,
        use_auto_summarization: rewriter.is_some(),
        enable_priority_scoring: options.enable_priority_scoring,
    };
    store.save(&report).await?;

    info!(
        report_id = %report.id,
        signals = signals.len(),
        items = report.items.len(),
        "report generated"
    );
    Ok((report, signals))
}

/// Marks the report acknowledged and logs who did it against the report's
/// generation date.
pub async fn acknowledge_report(
    store: &dyn ReportStore,
    log: &dyn AcknowledgementLog,
    id: Uuid,
    actor: &str,
) -> Result<Report> {
    let report = store.get_by_id(id).await?.ok_or(Error::ReportNotFound(id))?;

    store.update_acknowledgment(id, true).await?;
    log.record(actor, report.generated_at.date_naive(), true).await?;

    info!(report_id = %id, actor, "report acknowledged");
    store.get_by_id(id).await?.ok_or(Error::ReportNotFound(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 15, 9, 30, 0).unwrap()
    }

    struct Failing;

    #[async_trait]
    impl ToneRewriter for Failing {
        async fn rewrite(&self, _text: &str) -> Result<String> {
            Err(Error::Rewrite("service unavailable".into()))
        }
    }

    #[tokio::test]
    async fn missing_input_is_an_error() {
        let store = MemoryStore::new();
        let err = generate_report(None, &GenerateOptions::default(), None, &store, now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoInput));
        assert!(store.get_latest().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn empty_text_is_missing_input() {
        let store = MemoryStore::new();
        let input = SignalInput::Text(String::new());
        let err = generate_report(Some(&input), &GenerateOptions::default(), None, &store, now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoInput));
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_csv_saves_nothing() {
        let store = MemoryStore::new();
        let input = SignalInput::Csv(b"Section,Feedback\nSecurity,a,b\n".to_vec());
        let err = generate_report(Some(&input), &GenerateOptions::default(), None, &store, now())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Ingest(_)));
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn prioritized_demo_report() {
        let store = MemoryStore::new();
        let options = GenerateOptions {
            enable_priority_scoring: true,
            ..GenerateOptions::default()
        };
        let (report, signals) =
            generate_report(Some(&SignalInput::Demo), &options, None, &store, now())
                .await
                .unwrap();

        assert_eq!(signals.len(), 5);
        let categories: Vec<Category> = report.items.iter().map(|i| i.category).collect();
        assert_eq!(categories, vec![Category::Blocker, Category::Risk, Category::Win]);
        assert_eq!(
            report.items[0].content,
            "Q2 revenue projections 15% below target due to delayed product launch"
        );
        assert!(report.enable_priority_scoring);
        assert!(!report.use_auto_summarization);
        assert_eq!(store.get_latest().await.unwrap(), Some(report));
    }

    #[tokio::test]
    async fn categorize_only_keeps_input_order() {
        let store = MemoryStore::new();
        let input = SignalInput::Text(
            "Docs drafted\nAPI blocked by missing documentation\nRoadmap reviewed\nOnboarding shipped"
                .to_string(),
        );
        let (report, _) =
            generate_report(Some(&input), &GenerateOptions::default(), None, &store, now())
                .await
                .unwrap();

        let contents: Vec<&str> = report.items.iter().map(|i| i.content.as_str()).collect();
        assert_eq!(
            contents,
            vec![
                "API blocked by missing documentation",
                "Docs drafted",
                "Roadmap reviewed",
                "Onboarding shipped",
            ]
        );
    }

    #[tokio::test]
    async fn empty_text_produces_empty_report() {
        let store = MemoryStore::new();
        let input = SignalInput::Text("\n  \n".to_string());
        let (report, signals) =
            generate_report(Some(&input), &GenerateOptions::default(), None, &store, now())
                .await
                .unwrap();
        assert!(signals.is_empty());
        assert!(report.items.is_empty());
    }

    #[tokio::test]
    async fn failed_rewrites_keep_original_items() {
        let store = MemoryStore::new();
        let input = SignalInput::Text("Waiting on vendor quote".to_string());
        let (report, _) = generate_report(
            Some(&input),
            &GenerateOptions::default(),
            Some(&Failing as &dyn ToneRewriter),
            &store,
            now(),
        )
        .await
        .unwrap();

        assert!(report.use_auto_summarization);
        assert_eq!(report.items[0].category, Category::Blocker);
        assert_eq!(report.items[0].content, "Waiting on vendor quote");
    }

    #[tokio::test]
    async fn acknowledging_updates_report_and_log() {
        let store = MemoryStore::new();
        let (report, _) = generate_report(
            Some(&SignalInput::Demo),
            &GenerateOptions::default(),
            None,
            &store,
            now(),
        )
        .await
        .unwrap();

        let acknowledged = acknowledge_report(&store, &store, report.id, "Avery Lee")
            .await
            .unwrap();
        assert!(acknowledged.acknowledged);
        assert!(acknowledged.acknowledged_at.is_some());

        let entries = store.acknowledgements().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].report_date, now().date_naive());
        assert_eq!(store.stats().await.unwrap().acknowledged, 1);
    }

    #[tokio::test]
    async fn acknowledging_unknown_report_fails() {
        let store = MemoryStore::new();
        let err = acknowledge_report(&store, &store, Uuid::new_v4(), "Avery Lee")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ReportNotFound(_)));
        assert_eq!(store.stats().await.unwrap().total, 0);
    }
}
