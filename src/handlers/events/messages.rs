use axum::{extract::Path, response::Json};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::api::events::{EventResponse, ResolveDepth};
use crate::error::ApiError;
use crate::services::event_service::EventService;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMessageRequest {
    pub user_id: Option<Uuid>,
    pub text: Option<String>,
}

/// POST /api/events/:id/messages - append to the event chat.
/// The timestamp is stamped server-side, so storage order is
/// chronological order.
pub async fn post(
    Path(id): Path<Uuid>,
    Json(payload): Json<PostMessageRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let mut field_errors = HashMap::new();
    if payload.user_id.is_none() {
        field_errors.insert("userId".to_string(), "This field is required".to_string());
    }
    let text = match payload.text {
        Some(t) if !t.trim().is_empty() => t,
        _ => {
            field_errors.insert("text".to_string(), "This field is required".to_string());
            String::new()
        }
    };

    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "userId and text are required",
            Some(field_errors),
        ));
    }
    // An empty error map means user_id is present
    let Some(user_id) = payload.user_id else {
        return Err(ApiError::missing_field("userId"));
    };

    let service = EventService::new().await?;
    let event = service.post_message(id, user_id, text).await?;
    let resolved = service.resolve(&event, ResolveDepth::Full).await?;

    Ok(Json(resolved))
}
