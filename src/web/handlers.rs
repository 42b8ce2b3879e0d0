// src/web/handlers.rs
use anyhow::Context;
use axum::{
    extract::{Json, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
};
use log::{info, warn};
use serde_json::{json, Value};
use std::sync::Arc;

use super::error::{AppError, AppJson};
use super::schema::{
    CitiesResponse, LoginRequest, LoginResponse, MessageResponse, PredictRequest,
    PredictResponse, PredictionView, RegisterRequest,
};
use super::state::SharedState;
use crate::auth::RegistrationOutcome;
use crate::utils::constants::EMPTY_RESULT_MESSAGE;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

async fn require_user(state: &SharedState, headers: &HeaderMap) -> Result<String, AppError> {
    let token = bearer_token(headers).ok_or(AppError::Unauthorized)?;
    state
        .sessions
        .resolve(token)
        .await
        .ok_or(AppError::Unauthorized)
}

pub async fn health(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "labels": state.predictor.model().label_count(),
    }))
}

pub async fn register(
    State(state): State<SharedState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let username = payload.username;
    if username.is_empty() || payload.password.is_empty() || payload.confirm_password.is_empty()
    {
        return Err(AppError::MissingFields);
    }
    if payload.password != payload.confirm_password {
        return Err(AppError::PasswordMismatch);
    }

    let store = Arc::clone(&state.credentials);
    let password = payload.password;
    let name = username.clone();
    let outcome = tokio::task::spawn_blocking(move || store.register(&name, &password))
        .await
        .context("Registration task failed")??;

    match outcome {
        RegistrationOutcome::Created => Ok((
            StatusCode::CREATED,
            Json(MessageResponse {
                success: true,
                message: "Registration successful! Please log in.".to_string(),
            }),
        )),
        RegistrationOutcome::AlreadyExists => Err(AppError::UserExists),
    }
}

pub async fn login(
    State(state): State<SharedState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let username = payload.username;
    let store = Arc::clone(&state.credentials);
    let name = username.clone();
    let password = payload.password;
    let valid = tokio::task::spawn_blocking(move || store.validate(&name, &password))
        .await
        .context("Login task failed")??;

    if !valid {
        warn!("Failed login attempt for '{}'", username);
        return Err(AppError::InvalidCredentials);
    }

    let token = state.sessions.issue(&username).await;
    Ok(Json(LoginResponse {
        success: true,
        username,
        token,
    }))
}

pub async fn logout(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AppError> {
    let token = bearer_token(&headers).ok_or(AppError::Unauthorized)?;
    if !state.sessions.revoke(token).await {
        return Err(AppError::Unauthorized);
    }
    Ok(Json(MessageResponse {
        success: true,
        message: "Logged out.".to_string(),
    }))
}

pub async fn cities(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<CitiesResponse>, AppError> {
    require_user(&state, &headers).await?;
    Ok(Json(CitiesResponse {
        success: true,
        cities: state.predictor.model().cities().to_vec(),
    }))
}

pub async fn predict(
    State(state): State<SharedState>,
    headers: HeaderMap,
    payload: Result<AppJson<PredictRequest>, AppError>,
) -> Result<Json<PredictResponse>, AppError> {
    // Authentication is checked before the body so a bad session always wins.
    let username = require_user(&state, &headers).await?;
    let AppJson(payload) = payload?;
    let query = payload.into_query(state.config.default_threshold_percent);

    let predictions = state.predictor.predict(&query)?;
    info!(
        "User '{}' received {} predictions for '{}'",
        username,
        predictions.len(),
        query.city
    );

    let message = predictions
        .is_empty()
        .then(|| EMPTY_RESULT_MESSAGE.to_string());

    Ok(Json(PredictResponse {
        success: true,
        threshold_percent: query.threshold_percent,
        predictions: predictions.into_iter().map(PredictionView::from).collect(),
        message,
    }))
}
