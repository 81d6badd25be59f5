use axum::{
    extract::State,
    Extension, Json,
};
use chrono::NaiveDate;

use crate::auth::middleware::AuthUser;
use crate::dto::MonthEntries;
use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::models::entry::{Entry, EntrySummary, MonthPath, UpsertEntryRequest};
use crate::services::journal;
use crate::AppState;

pub async fn upsert_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<UpsertEntryRequest>,
) -> AppResult<Json<EntrySummary>> {
    let entry = journal::upsert_entry(
        &state.entries(),
        auth_user.id,
        &body,
        state.clock.today(),
        state.config.min_entry_length,
    )
    .await?;

    Ok(Json(EntrySummary::from(&entry)))
}

pub async fn get_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppPath(date): AppPath<NaiveDate>,
) -> AppResult<Json<Entry>> {
    let entry = journal::get_entry(&state.entries(), auth_user.id, date).await?;
    Ok(Json(entry))
}

pub async fn random_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Entry>> {
    let entry = journal::random_entry(&state.entries(), auth_user.id).await?;
    Ok(Json(entry))
}

pub async fn month_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppPath(MonthPath { year, month }): AppPath<MonthPath>,
) -> AppResult<Json<MonthEntries>> {
    let entries = journal::month_entries(&state.entries(), auth_user.id, year, month).await?;
    Ok(Json(entries))
}
