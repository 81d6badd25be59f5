//! Journal operations over an [`EntryStore`].
//!
//! Every function takes "today" from its caller; nothing here reads the clock.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::db::EntryStore;
use crate::dto::{Dashboard, ExportSnapshot, ExportTotals, ExportedEntry, MonthEntries, Stats};
use crate::error::{AppError, AppResult};
use crate::models::entry::{rating_label, Entry, EntrySummary, UpsertEntryRequest};
use crate::services::streak::{current_streak, longest_streak, missed_days};
use crate::services::validation::validate_entry;

pub async fn upsert_entry<S: EntryStore>(
    store: &S,
    user_id: Uuid,
    req: &UpsertEntryRequest,
    today: NaiveDate,
    min_length: usize,
) -> AppResult<Entry> {
    let valid = validate_entry(req, today, min_length)?;
    let entry = store.upsert(user_id, &valid).await?;

    tracing::info!(
        user_id = %user_id,
        date = %entry.entry_date,
        skipped = entry.skipped,
        "Entry saved"
    );
    Ok(entry)
}

pub async fn get_entry<S: EntryStore>(
    store: &S,
    user_id: Uuid,
    date: NaiveDate,
) -> AppResult<Entry> {
    store
        .find_by_date(user_id, date)
        .await?
        .ok_or_else(|| AppError::not_found(format!("No entry for {date}")))
}

pub async fn month_entries<S: EntryStore>(
    store: &S,
    user_id: Uuid,
    year: i32,
    month: u32,
) -> AppResult<MonthEntries> {
    let (start, end) = month_bounds(year, month)?;
    let entries = store.list_between(user_id, start, end).await?;

    Ok(entries
        .iter()
        .map(|e| (e.entry_date, EntrySummary::from(e)))
        .collect())
}

pub async fn dashboard<S: EntryStore>(
    store: &S,
    user_id: Uuid,
    signup_date: NaiveDate,
    today: NaiveDate,
) -> AppResult<Dashboard> {
    let qualifying = qualifying_set(store, user_id).await?;
    let missed = missed_since_signup(store, user_id, signup_date, today).await?;
    let today_entry = store.find_by_date(user_id, today).await?;

    Ok(Dashboard {
        today,
        current_streak: current_streak(&qualifying, today),
        next_date: missed.first().copied().unwrap_or(today),
        missed_days: missed,
        today_entry,
        total_entries: qualifying.len() as i64,
    })
}

/// Dashboard flow: always writes the oldest missed day first, and only
/// reaches today once the backlog is resolved.
pub async fn submit_from_dashboard<S: EntryStore>(
    store: &S,
    user_id: Uuid,
    signup_date: NaiveDate,
    req: &UpsertEntryRequest,
    today: NaiveDate,
    min_length: usize,
) -> AppResult<Entry> {
    let missed = missed_since_signup(store, user_id, signup_date, today).await?;
    let next_date = missed.first().copied().unwrap_or(today);

    if let Some(requested) = req.date {
        if requested != next_date {
            return Err(AppError::validation(format!(
                "Resolve {next_date} before logging {requested}"
            )));
        }
    }

    let targeted = UpsertEntryRequest {
        date: Some(next_date),
        ..req.clone()
    };
    upsert_entry(store, user_id, &targeted, today, min_length).await
}

pub async fn random_entry<S: EntryStore>(store: &S, user_id: Uuid) -> AppResult<Entry> {
    store
        .random_qualifying(user_id)
        .await?
        .ok_or_else(|| AppError::not_found("No entries yet"))
}

pub async fn stats<S: EntryStore>(store: &S, user_id: Uuid, today: NaiveDate) -> AppResult<Stats> {
    let qualifying = qualifying_set(store, user_id).await?;

    Ok(Stats {
        total_entries: qualifying.len() as i64,
        current_streak: current_streak(&qualifying, today),
        longest_streak: longest_streak(&qualifying),
    })
}

pub async fn export<S: EntryStore>(
    store: &S,
    user_id: Uuid,
    email: &str,
    today: NaiveDate,
    exported_at: DateTime<Utc>,
) -> AppResult<ExportSnapshot> {
    let entries = store.list_all(user_id).await?;
    let qualifying: BTreeSet<NaiveDate> = entries
        .iter()
        .filter(|e| e.is_qualifying())
        .map(|e| e.entry_date)
        .collect();

    let totals = ExportTotals {
        total_entries: qualifying.len() as i64,
        current_streak: current_streak(&qualifying, today),
    };

    let entries = entries
        .into_iter()
        .map(|e| ExportedEntry {
            date: e.entry_date,
            rating_label: rating_label(e.rating),
            rating: e.rating,
            text: e.text,
            skipped: e.skipped,
            created_at: e.created_at,
            updated_at: e.updated_at,
        })
        .collect();

    tracing::info!(user_id = %user_id, total = totals.total_entries, "Export generated");

    Ok(ExportSnapshot {
        exported_at,
        email: email.to_string(),
        entries,
        totals,
    })
}

async fn qualifying_set<S: EntryStore>(store: &S, user_id: Uuid) -> AppResult<BTreeSet<NaiveDate>> {
    Ok(store.qualifying_dates(user_id).await?.into_iter().collect())
}

async fn missed_since_signup<S: EntryStore>(
    store: &S,
    user_id: Uuid,
    signup_date: NaiveDate,
    today: NaiveDate,
) -> AppResult<Vec<NaiveDate>> {
    let logged: BTreeSet<NaiveDate> = store
        .logged_dates_since(user_id, signup_date)
        .await?
        .into_iter()
        .collect();
    Ok(missed_days(signup_date, today, &logged))
}

fn month_bounds(year: i32, month: u32) -> AppResult<(NaiveDate, NaiveDate)> {
    let invalid = || AppError::validation(format!("Invalid month {year}-{month:02}"));

    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let end = next.pred_opt().ok_or_else(invalid)?;

    Ok((start, end))
}
