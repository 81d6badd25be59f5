use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use rand::seq::SliceRandom;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::db::EntryStore;
use crate::error::AppResult;
use crate::models::entry::{Entry, ValidEntry};

/// In-memory `EntryStore` keyed the same way as the `entries` table.
#[derive(Default)]
pub struct MemoryEntryStore {
    rows: Mutex<BTreeMap<(Uuid, NaiveDate), Entry>>,
}

impl MemoryEntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn row_count(&self, user_id: Uuid) -> usize {
        self.rows
            .lock()
            .await
            .keys()
            .filter(|(uid, _)| *uid == user_id)
            .count()
    }

    async fn user_rows(&self, user_id: Uuid) -> Vec<Entry> {
        self.rows
            .lock()
            .await
            .values()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect()
    }
}

impl EntryStore for MemoryEntryStore {
    async fn upsert(&self, user_id: Uuid, entry: &ValidEntry) -> AppResult<Entry> {
        let now = Utc::now();
        let mut rows = self.rows.lock().await;
        let row = rows
            .entry((user_id, entry.date))
            .and_modify(|existing| existing.updated_at = now)
            .or_insert_with(|| Entry {
                id: Uuid::new_v4(),
                user_id,
                entry_date: entry.date,
                text: None,
                rating: None,
                skipped: false,
                created_at: now,
                updated_at: now,
            });
        row.text = entry.content.text().map(String::from);
        row.rating = entry.content.rating();
        row.skipped = entry.content.is_skipped();
        Ok(row.clone())
    }

    async fn find_by_date(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Option<Entry>> {
        Ok(self.rows.lock().await.get(&(user_id, date)).cloned())
    }

    async fn list_between(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Entry>> {
        Ok(self
            .user_rows(user_id)
            .await
            .into_iter()
            .filter(|e| e.entry_date >= start && e.entry_date <= end)
            .collect())
    }

    async fn list_all(&self, user_id: Uuid) -> AppResult<Vec<Entry>> {
        Ok(self.user_rows(user_id).await)
    }

    async fn qualifying_dates(&self, user_id: Uuid) -> AppResult<Vec<NaiveDate>> {
        Ok(self
            .user_rows(user_id)
            .await
            .iter()
            .filter(|e| e.is_qualifying())
            .map(|e| e.entry_date)
            .collect())
    }

    async fn logged_dates_since(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> AppResult<Vec<NaiveDate>> {
        Ok(self
            .user_rows(user_id)
            .await
            .iter()
            .map(|e| e.entry_date)
            .filter(|d| *d >= since)
            .collect())
    }

    async fn random_qualifying(&self, user_id: Uuid) -> AppResult<Option<Entry>> {
        let qualifying: Vec<Entry> = self
            .user_rows(user_id)
            .await
            .into_iter()
            .filter(Entry::is_qualifying)
            .collect();
        Ok(qualifying.choose(&mut rand::thread_rng()).cloned())
    }
}
