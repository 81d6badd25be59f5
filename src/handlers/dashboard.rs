use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;

use crate::auth::middleware::AuthUser;
use crate::db::users;
use crate::dto::{Dashboard, Stats};
use crate::error::AppResult;
use crate::extract::AppJson;
use crate::models::entry::{EntrySummary, UpsertEntryRequest};
use crate::services::journal;
use crate::AppState;

pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Dashboard>> {
    let user = users::find_by_id(&state.db, auth_user.id).await?;
    let today = state.clock.today();
    let dashboard = journal::dashboard(&state.entries(), user.id, user.signup_date, today).await?;
    Ok(Json(dashboard))
}

pub async fn submit_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<UpsertEntryRequest>,
) -> AppResult<Json<EntrySummary>> {
    let user = users::find_by_id(&state.db, auth_user.id).await?;
    let entry = journal::submit_from_dashboard(
        &state.entries(),
        user.id,
        user.signup_date,
        &body,
        state.clock.today(),
        state.config.min_entry_length,
    )
    .await?;

    Ok(Json(EntrySummary::from(&entry)))
}

pub async fn get_stats(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<Stats>> {
    let stats = journal::stats(&state.entries(), auth_user.id, state.clock.today()).await?;
    Ok(Json(stats))
}

pub async fn export(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<impl IntoResponse> {
    let today = state.clock.today();
    let snapshot = journal::export(
        &state.entries(),
        auth_user.id,
        &auth_user.email,
        today,
        Utc::now(),
    )
    .await?;

    let disposition = format!("attachment; filename=\"smile-journal-{today}.json\"");
    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(snapshot)))
}
