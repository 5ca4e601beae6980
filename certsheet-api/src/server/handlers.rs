//! Record endpoint handlers

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

use super::body::JsonOrForm;
use super::error::ApiError;
use crate::services::records::RecordService;
use crate::sheet::{CertificateInput, Record};

const READ_FAILED: &str = "Failed to fetch data from Google Sheets";
const ADD_FAILED: &str = "Failed to add intern";
const UPDATE_FAILED: &str = "Failed to update intern";
const DELETE_FAILED: &str = "Failed to delete intern";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub records: Arc<RecordService>,
}

/// Body of successful mutations
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
        })
    }
}

pub async fn list_records(State(state): State<AppState>) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state
        .records
        .list()
        .await
        .map_err(|e| ApiError::new(e, READ_FAILED))?;
    Ok(Json(records))
}

pub async fn get_record(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Record>, ApiError> {
    let record = state
        .records
        .get(&key)
        .await
        .map_err(|e| ApiError::new(e, READ_FAILED))?;
    Ok(Json(record))
}

pub async fn create_record(
    State(state): State<AppState>,
    JsonOrForm(input): JsonOrForm<CertificateInput>,
) -> Result<(StatusCode, Json<Message>), ApiError> {
    state
        .records
        .create(&input)
        .await
        .map_err(|e| ApiError::new(e, ADD_FAILED))?;
    Ok((StatusCode::CREATED, Message::new("Intern added successfully")))
}

pub async fn update_record(
    State(state): State<AppState>,
    Path(key): Path<String>,
    JsonOrForm(input): JsonOrForm<CertificateInput>,
) -> Result<Json<Message>, ApiError> {
    state
        .records
        .update(&key, &input)
        .await
        .map_err(|e| ApiError::new(e, UPDATE_FAILED))?;
    Ok(Message::new("Intern updated successfully"))
}

pub async fn delete_record(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Message>, ApiError> {
    state
        .records
        .delete(&key)
        .await
        .map_err(|e| ApiError::new(e, DELETE_FAILED))?;
    Ok(Message::new(format!(
        "Intern with CertNo {} deleted successfully",
        key
    )))
}
