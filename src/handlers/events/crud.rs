use axum::{
    extract::Path,
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::api::events::{EventResponse, ResolveDepth};
use crate::error::ApiError;
use crate::services::event_service::{EventChanges, EventService, NewEvent};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub place: Option<String>,
    pub description: Option<String>,
    pub creator_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub place: Option<String>,
    pub description: Option<String>,
}

/// POST /api/events - create an event; the creator automatically attends
pub async fn create(
    Json(payload): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    let new_event = validate_creation(payload)?;

    let service = EventService::new().await?;
    let event = service.create(new_event).await?;
    let resolved = service.resolve(&event, ResolveDepth::Members).await?;

    Ok((StatusCode::CREATED, Json(resolved)))
}

/// GET /api/events - all events, soonest first, fully resolved
pub async fn list() -> Result<Json<Vec<EventResponse>>, ApiError> {
    let service = EventService::new().await?;
    let events = service.list().await?;
    let resolved = service.resolve_all(&events, ResolveDepth::Full).await?;

    Ok(Json(resolved))
}

/// GET /api/events/:id - one event, fully resolved
pub async fn get(Path(id): Path<Uuid>) -> Result<Json<EventResponse>, ApiError> {
    let service = EventService::new().await?;
    let event = service.get(id).await?;
    let resolved = service.resolve(&event, ResolveDepth::Full).await?;

    Ok(Json(resolved))
}

/// PUT /api/events/:id - update the mutable fields only
pub async fn update(
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let changes = EventChanges {
        title: payload.title,
        time: payload.time,
        place: payload.place,
        description: payload.description,
    };

    let service = EventService::new().await?;
    let event = service.update(id, changes).await?;
    let resolved = service.resolve(&event, ResolveDepth::Members).await?;

    Ok(Json(resolved))
}

/// DELETE /api/events/:id - remove the event (users are untouched)
pub async fn delete(Path(id): Path<Uuid>) -> Result<Json<Value>, ApiError> {
    let service = EventService::new().await?;
    service.delete(id).await?;

    Ok(Json(json!({ "message": "Event deleted" })))
}

fn validate_creation(payload: CreateEventRequest) -> Result<NewEvent, ApiError> {
    let mut field_errors = HashMap::new();

    let title = require_text(payload.title, "title", &mut field_errors);
    let place = require_text(payload.place, "place", &mut field_errors);
    let description = require_text(payload.description, "description", &mut field_errors);
    if payload.time.is_none() {
        field_errors.insert("time".to_string(), "This field is required".to_string());
    }
    if payload.creator_id.is_none() {
        field_errors.insert("creatorId".to_string(), "This field is required".to_string());
    }

    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "Missing required fields",
            Some(field_errors),
        ));
    }

    // Guarded by the checks above
    let (Some(time), Some(creator_id)) = (payload.time, payload.creator_id) else {
        return Err(ApiError::internal_server_error("validation invariant broken"));
    };

    Ok(NewEvent {
        title,
        time,
        place,
        description,
        creator_id,
    })
}

fn require_text(value: Option<String>, field: &str, errors: &mut HashMap<String, String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            errors.insert(field.to_string(), "This field is required".to_string());
            String::new()
        }
    }
}
