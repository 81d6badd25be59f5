use axum::{extract::State, Extension, Json};
use validator::Validate;

use crate::auth::{
    jwt::create_access_token,
    middleware::AuthUser,
    password::{hash_password, verify_password},
};
use crate::db::users;
use crate::dto::{
    ChangePasswordRequest, LoginRequest, MessageResponse, RegisterRequest, TokenResponse,
};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::models::user::{User, UserProfile};
use crate::AppState;

fn issue_token(user: &User, state: &AppState) -> AppResult<TokenResponse> {
    Ok(TokenResponse {
        access_token: create_access_token(user.id, &user.email, &state.config)?,
        token_type: "Bearer",
        expires_in: state.config.jwt_access_ttl_secs,
    })
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Normalizes the email before the format check so padded input is accepted.
fn prepare_registration(body: RegisterRequest) -> AppResult<RegisterRequest> {
    let body = RegisterRequest {
        email: normalize_email(&body.email),
        ..body
    };
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(body)
}

pub async fn register(
    State(state): State<AppState>,
    AppJson(body): AppJson<RegisterRequest>,
) -> AppResult<Json<TokenResponse>> {
    let body = prepare_registration(body)?;

    let pwd_hash = hash_password(&body.password)?;
    let user = users::insert(&state.db, &body.email, &pwd_hash, state.clock.today()).await?;

    tracing::info!(user_id = %user.id, signup_date = %user.signup_date, "User registered");
    Ok(Json(issue_token(&user, &state)?))
}

pub async fn login(
    State(state): State<AppState>,
    AppJson(body): AppJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let body = LoginRequest {
        email: normalize_email(&body.email),
        ..body
    };
    body.validate().map_err(|_| AppError::Unauthorized)?;

    let user = users::find_by_email(&state.db, &body.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&body.password, &user.password_hash)? {
        tracing::warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(AppError::Unauthorized);
    }

    Ok(Json(issue_token(&user, &state)?))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<UserProfile>> {
    let user = users::find_by_id(&state.db, auth_user.id).await?;
    Ok(Json(user.into()))
}

pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    AppJson(body): AppJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    body.validate().map_err(|e| AppError::Validation(e.to_string()))?;

    let user = users::find_by_id(&state.db, auth_user.id).await?;
    if !verify_password(&body.current_password, &user.password_hash)? {
        return Err(AppError::Unauthorized);
    }

    let pwd_hash = hash_password(&body.new_password)?;
    users::update_password(&state.db, user.id, &pwd_hash).await?;

    tracing::info!(user_id = %user.id, "Password changed");
    Ok(Json(MessageResponse {
        message: "Password updated".into(),
    }))
}
