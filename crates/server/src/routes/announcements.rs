use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use common::types::MessageBody;
use serde_json::Value;
use service::announcements::{Announcement, AnnouncementInput};

use crate::errors::ApiError;
use crate::state::AppState;

/// Decode a create/update body.
///
/// An empty body or a JSON value that is not an object means "no fields
/// supplied"; only text that is not JSON at all is rejected.
pub fn parse_input(body: &[u8]) -> Result<AnnouncementInput, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AnnouncementInput::default());
    }
    let value: Value = serde_json::from_slice(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
    match value {
        Value::Object(_) => serde_json::from_value(value).map_err(|e| ApiError::InvalidBody(e.to_string())),
        _ => Ok(AnnouncementInput::default()),
    }
}

/// GET /api/announcements
pub async fn list_public(State(state): State<AppState>) -> Result<Json<Vec<Announcement>>, ApiError> {
    Ok(Json(state.announcements.list_public().await?))
}

/// GET /api/admin/announcements
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Announcement>>, ApiError> {
    Ok(Json(state.announcements.list_all().await?))
}

/// GET /api/admin/announcements/:id
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Announcement>, ApiError> {
    Ok(Json(state.announcements.get(&id).await?))
}

/// POST /api/admin/announcements
pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Announcement>), ApiError> {
    let input = parse_input(&body)?;
    let created = state.announcements.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/admin/announcements/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Announcement>, ApiError> {
    let input = parse_input(&body)?;
    Ok(Json(state.announcements.update(&id, input).await?))
}

/// DELETE /api/admin/announcements/:id
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    state.announcements.delete(&id).await?;
    Ok(Json(MessageBody::new("Announcement deleted")))
}
