//! Report and acknowledgement persistence behind injectable traits.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{AcknowledgementEntry, AcknowledgementStats, Report};

#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn save(&self, report: &Report) -> Result<()>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Report>>;
    async fn get_latest(&self) -> Result<Option<Report>>;
    /// Sets the flag and stamps (or clears) `acknowledged_at`. Returns whether
    /// a report with this id existed.
    async fn update_acknowledgment(&self, id: Uuid, acknowledged: bool) -> Result<bool>;
    /// Newest first.
    async fn get_all(&self) -> Result<Vec<Report>>;
}

#[async_trait]
pub trait AcknowledgementLog: Send + Sync {
    async fn record(&self, actor: &str, report_date: NaiveDate, acknowledged: bool) -> Result<()>;
    async fn stats(&self) -> Result<AcknowledgementStats>;
}

/// Process-local backend for tests and one-shot runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    reports: RwLock<Vec<Report>>,
    acknowledgements: RwLock<Vec<AcknowledgementEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acknowledgements(&self) -> Vec<AcknowledgementEntry> {
        self.acknowledgements.read().await.clone()
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn save(&self, report: &Report) -> Result<()> {
        self.reports.write().await.insert(0, report.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Report>> {
        Ok(self.reports.read().await.iter().find(|r| r.id == id).cloned())
    }

    async fn get_latest(&self) -> Result<Option<Report>> {
        Ok(self.reports.read().await.first().cloned())
    }

    async fn update_acknowledgment(&self, id: Uuid, acknowledged: bool) -> Result<bool> {
        let mut reports = self.reports.write().await;
        match reports.iter_mut().find(|r| r.id == id) {
            Some(report) => {
                report.acknowledged = acknowledged;
                report.acknowledged_at = acknowledged.then(Utc::now);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_all(&self) -> Result<Vec<Report>> {
        Ok(self.reports.read().await.clone())
    }
}

#[async_trait]
impl AcknowledgementLog for MemoryStore {
    async fn record(&self, actor: &str, report_date: NaiveDate, acknowledged: bool) -> Result<()> {
        self.acknowledgements.write().await.push(AcknowledgementEntry {
            actor: actor.to_string(),
            report_date,
            acknowledged,
            recorded_at: Utc::now(),
        });
        Ok(())
    }

    async fn stats(&self) -> Result<AcknowledgementStats> {
        let entries = self.acknowledgements.read().await;
        Ok(AcknowledgementStats {
            total: entries.len(),
            acknowledged: entries.iter().filter(|e| e.acknowledged).count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ReportItem};
    use chrono::{Duration, TimeZone};

    fn sample_report(minutes: i64) -> Report {
        Report {
            id: Uuid::new_v4(),
            generated_at: Utc.with_ymd_and_hms(2025, 4, 14, 12, 0, 0).unwrap()
                + Duration::minutes(minutes),
            items: vec![ReportItem {
                category: Category::Blocker,
                content: "API blocked".to_string(),
            }],
            acknowledged: false,
            acknowledged_at: None,
            use_auto_summarization: false,
            enable_priority_scoring: true,
        }
    }

    #[tokio::test]
    async fn latest_report_is_most_recently_saved() {
        let store = MemoryStore::new();
        assert!(store.get_latest().await.unwrap().is_none());

        let first = sample_report(0);
        let second = sample_report(5);
        store.save(&first).await.unwrap();
        store.save(&second).await.unwrap();

        assert_eq!(store.get_latest().await.unwrap(), Some(second.clone()));
        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(store.get_by_id(first.id).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn acknowledgment_sets_and_clears_timestamp() {
        let store = MemoryStore::new();
        let report = sample_report(0);
        store.save(&report).await.unwrap();

        assert!(store.update_acknowledgment(report.id, true).await.unwrap());
        let stored = store.get_by_id(report.id).await.unwrap().unwrap();
        assert!(stored.acknowledged);
        assert!(stored.acknowledged_at.is_some());

        assert!(store.update_acknowledgment(report.id, false).await.unwrap());
        let stored = store.get_by_id(report.id).await.unwrap().unwrap();
        assert!(!stored.acknowledged);
        assert!(stored.acknowledged_at.is_none());

        assert!(!store.update_acknowledgment(Uuid::new_v4(), true).await.unwrap());
    }

    #[tokio::test]
    async fn acknowledgement_stats_count_entries() {
        let store = MemoryStore::new();
        assert_eq!(store.stats().await.unwrap(), AcknowledgementStats::default());

        let day = NaiveDate::from_ymd_opt(2025, 4, 14).unwrap();
        store.record("Avery Lee", day, true).await.unwrap();
        store.record("Jules Moreno", day, false).await.unwrap();

        let stats = store.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.acknowledged, 1);
        assert_eq!(store.acknowledgements().await[0].actor, "Avery Lee");
    }
}
