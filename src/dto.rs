//! # SmileJournal — Request/Response DTOs
//!
//! API contract types shared by handlers and services.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body
//! - everything else → serialized to client JSON
//! - Field-level rules on requests use `validator` derive macros

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::entry::{Entry, EntrySummary};

// ============================================================================
// Auth
// ============================================================================

/// POST /api/auth/register
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    #[validate(length(max = 254, message = "Email too long"))]
    pub email: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// POST /api/auth/login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// PUT /api/me/password
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Journal
// ============================================================================

/// GET /api/dashboard
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub current_streak: i32,
    /// Oldest first. Must be empty before the dashboard accepts today.
    pub missed_days: Vec<NaiveDate>,
    /// Date the dashboard flow will write next.
    pub next_date: NaiveDate,
    pub today_entry: Option<Entry>,
    pub total_entries: i64,
}

/// GET /api/calendar/:year/:month
pub type MonthEntries = BTreeMap<NaiveDate, EntrySummary>;

/// GET /api/stats
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Stats {
    pub total_entries: i64,
    pub current_streak: i32,
    pub longest_streak: i32,
}

/// GET /api/export
#[derive(Debug, Serialize)]
pub struct ExportSnapshot {
    pub exported_at: DateTime<Utc>,
    pub email: String,
    pub entries: Vec<ExportedEntry>,
    pub totals: ExportTotals,
}

#[derive(Debug, Serialize)]
pub struct ExportedEntry {
    pub date: NaiveDate,
    pub text: Option<String>,
    pub rating: Option<i32>,
    pub rating_label: Option<&'static str>,
    pub skipped: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ExportTotals {
    pub total_entries: i64,
    pub current_streak: i32,
}

// ============================================================================
// Health
// ============================================================================

/// GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /readyz
#[derive(Debug, Serialize)]
pub struct ReadyzResponse {
    pub status: &'static str,
    pub database: &'static str,
}
