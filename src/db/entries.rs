use std::future::Future;

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::entry::{Entry, ValidEntry};

/// Persistence for journal entries, one row per (user, date).
pub trait EntryStore: Send + Sync {
    /// Insert the entry, or replace text/rating/skipped of the existing row
    /// for the same date.
    fn upsert(
        &self,
        user_id: Uuid,
        entry: &ValidEntry,
    ) -> impl Future<Output = AppResult<Entry>> + Send;

    fn find_by_date(
        &self,
        user_id: Uuid,
        date: NaiveDate,
    ) -> impl Future<Output = AppResult<Option<Entry>>> + Send;

    /// Entries with `start <= entry_date <= end`, oldest first.
    fn list_between(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = AppResult<Vec<Entry>>> + Send;

    /// Every entry including skipped ones, oldest first.
    fn list_all(&self, user_id: Uuid) -> impl Future<Output = AppResult<Vec<Entry>>> + Send;

    /// Dates of non-skipped entries with text, oldest first.
    fn qualifying_dates(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = AppResult<Vec<NaiveDate>>> + Send;

    /// Dates that have any row at all on or after `since`.
    fn logged_dates_since(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> impl Future<Output = AppResult<Vec<NaiveDate>>> + Send;

    fn random_qualifying(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = AppResult<Option<Entry>>> + Send;
}

#[derive(Clone)]
pub struct PgEntryStore {
    db: PgPool,
}

impl PgEntryStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

impl EntryStore for PgEntryStore {
    async fn upsert(&self, user_id: Uuid, entry: &ValidEntry) -> AppResult<Entry> {
        // Single statement so concurrent writers for the same day serialize
        // on the unique key and the last one wins.
        let saved = sqlx::query_as::<_, Entry>(
            r#"
            INSERT INTO entries (id, user_id, entry_date, text, rating, skipped)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, entry_date) DO UPDATE SET
                text = EXCLUDED.text,
                rating = EXCLUDED.rating,
                skipped = EXCLUDED.skipped,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(entry.date)
        .bind(entry.content.text())
        .bind(entry.content.rating())
        .bind(entry.content.is_skipped())
        .fetch_one(&self.db)
        .await?;

        Ok(saved)
    }

    async fn find_by_date(&self, user_id: Uuid, date: NaiveDate) -> AppResult<Option<Entry>> {
        let entry = sqlx::query_as::<_, Entry>(
            "SELECT * FROM entries WHERE user_id = $1 AND entry_date = $2",
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(&self.db)
        .await?;

        Ok(entry)
    }

    async fn list_between(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Vec<Entry>> {
        let entries = sqlx::query_as::<_, Entry>(
            r#"
            SELECT * FROM entries
            WHERE user_id = $1 AND entry_date BETWEEN $2 AND $3
            ORDER BY entry_date ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    async fn list_all(&self, user_id: Uuid) -> AppResult<Vec<Entry>> {
        let entries = sqlx::query_as::<_, Entry>(
            "SELECT * FROM entries WHERE user_id = $1 ORDER BY entry_date ASC",
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    async fn qualifying_dates(&self, user_id: Uuid) -> AppResult<Vec<NaiveDate>> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            r#"
            SELECT entry_date FROM entries
            WHERE user_id = $1 AND skipped = FALSE AND text IS NOT NULL AND text <> ''
            ORDER BY entry_date ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        Ok(dates)
    }

    async fn logged_dates_since(
        &self,
        user_id: Uuid,
        since: NaiveDate,
    ) -> AppResult<Vec<NaiveDate>> {
        let dates = sqlx::query_scalar::<_, NaiveDate>(
            r#"
            SELECT entry_date FROM entries
            WHERE user_id = $1 AND entry_date >= $2
            ORDER BY entry_date ASC
            "#,
        )
        .bind(user_id)
        .bind(since)
        .fetch_all(&self.db)
        .await?;

        Ok(dates)
    }

    async fn random_qualifying(&self, user_id: Uuid) -> AppResult<Option<Entry>> {
        let entry = sqlx::query_as::<_, Entry>(
            r#"
            SELECT * FROM entries
            WHERE user_id = $1 AND skipped = FALSE AND text IS NOT NULL AND text <> ''
            ORDER BY random()
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(entry)
    }
}

#[cfg(all(test, feature = "pg-tests"))]
mod tests {
    use super::*;
    use crate::models::entry::EntryContent;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn written(date: NaiveDate, text: &str, rating: Option<i32>) -> ValidEntry {
        ValidEntry {
            date,
            content: EntryContent::Written {
                text: text.into(),
                rating,
            },
        }
    }

    fn skipped(date: NaiveDate) -> ValidEntry {
        ValidEntry {
            date,
            content: EntryContent::Skipped,
        }
    }

    async fn seed_user(db: &PgPool) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, signup_date) VALUES ($1, $2, 'x', $3)",
        )
        .bind(id)
        .bind(format!("{id}@example.com"))
        .bind(d(2024, 1, 1))
        .execute(db)
        .await
        .unwrap();
        id
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_upsert_overwrites_single_row(db: PgPool) {
        let store = PgEntryStore::new(db.clone());
        let user = seed_user(&db).await;
        let day = d(2024, 1, 2);

        let first = store
            .upsert(user, &written(day, "first draft", Some(1)))
            .await
            .unwrap();
        let second = store
            .upsert(user, &written(day, "second draft", Some(3)))
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.text.as_deref(), Some("second draft"));
        assert_eq!(second.rating, Some(3));

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM entries WHERE user_id = $1")
            .bind(user)
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_skip_overwrite_clears_text_and_rating(db: PgPool) {
        let store = PgEntryStore::new(db.clone());
        let user = seed_user(&db).await;
        let day = d(2024, 1, 2);

        store
            .upsert(user, &written(day, "a sunny walk", Some(2)))
            .await
            .unwrap();
        let entry = store.upsert(user, &skipped(day)).await.unwrap();

        assert!(entry.skipped);
        assert_eq!(entry.text, None);
        assert_eq!(entry.rating, None);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_qualifying_queries_exclude_skipped(db: PgPool) {
        let store = PgEntryStore::new(db.clone());
        let user = seed_user(&db).await;

        store
            .upsert(user, &written(d(2024, 1, 3), "third", None))
            .await
            .unwrap();
        store.upsert(user, &skipped(d(2024, 1, 4))).await.unwrap();
        store
            .upsert(user, &written(d(2024, 1, 2), "second", None))
            .await
            .unwrap();

        let qualifying = store.qualifying_dates(user).await.unwrap();
        assert_eq!(qualifying, vec![d(2024, 1, 2), d(2024, 1, 3)]);

        let logged = store.logged_dates_since(user, d(2024, 1, 3)).await.unwrap();
        assert_eq!(logged, vec![d(2024, 1, 3), d(2024, 1, 4)]);

        for _ in 0..5 {
            let entry = store.random_qualifying(user).await.unwrap().unwrap();
            assert!(!entry.skipped);
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_random_qualifying_none_when_only_skipped(db: PgPool) {
        let store = PgEntryStore::new(db.clone());
        let user = seed_user(&db).await;
        store.upsert(user, &skipped(d(2024, 1, 2))).await.unwrap();

        assert!(store.random_qualifying(user).await.unwrap().is_none());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_list_between_is_inclusive_and_ordered(db: PgPool) {
        let store = PgEntryStore::new(db.clone());
        let user = seed_user(&db).await;

        for day in [5, 1, 31] {
            store
                .upsert(user, &written(d(2024, 1, day), "entry", None))
                .await
                .unwrap();
        }
        store
            .upsert(user, &written(d(2024, 2, 1), "entry", None))
            .await
            .unwrap();

        let dates: Vec<NaiveDate> = store
            .list_between(user, d(2024, 1, 1), d(2024, 1, 31))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.entry_date)
            .collect();
        assert_eq!(dates, vec![d(2024, 1, 1), d(2024, 1, 5), d(2024, 1, 31)]);
    }
}
