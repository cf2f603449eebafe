use axum::{
    extract::Path,
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use uuid::Uuid;

use crate::api::users::UserResponse;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::user_service::{NewUser, ProfileChanges, UserService};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub major_year: Option<String>,
    pub interests: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub major_year: Option<String>,
    pub interests: Option<String>,
    pub avatar: Option<String>,
}

/// POST /api/users - register a new user
pub async fn create(
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let new_user = validate_registration(payload)?;

    let service = UserService::new().await?;
    let user = service.create(new_user).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/users - list all users
pub async fn list(_auth: AuthUser) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let service = UserService::new().await?;
    let users = service.list().await?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}

/// GET /api/users/:id - get a single user
pub async fn get(_auth: AuthUser, Path(id): Path<Uuid>) -> Result<Json<UserResponse>, ApiError> {
    let service = UserService::new().await?;
    let user = service.get(id).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/users/:id - update profile fields
pub async fn update(
    _auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let changes = ProfileChanges {
        name: payload.name,
        major_year: payload.major_year,
        interests: payload.interests,
        avatar: payload.avatar,
    };

    let service = UserService::new().await?;
    let user = service.update(id, changes).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/users/:id - delete a user (events keep their references)
pub async fn delete(_auth: AuthUser, Path(id): Path<Uuid>) -> Result<Json<Value>, ApiError> {
    let service = UserService::new().await?;
    service.delete(id).await?;

    Ok(Json(json!({ "message": "User deleted" })))
}

fn validate_registration(payload: RegisterRequest) -> Result<NewUser, ApiError> {
    let mut field_errors = HashMap::new();

    let username = require(payload.username, "username", &mut field_errors);
    let password = require(payload.password, "password", &mut field_errors);
    let name = require(payload.name, "name", &mut field_errors);
    let major_year = require(payload.major_year, "majorYear", &mut field_errors);

    if !field_errors.is_empty() {
        return Err(ApiError::validation_error(
            "Missing required fields",
            Some(field_errors),
        ));
    }

    Ok(NewUser {
        username,
        password,
        name,
        major_year,
        interests: payload.interests,
        avatar: payload.avatar,
    })
}

fn require(value: Option<String>, field: &str, errors: &mut HashMap<String, String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => {
            errors.insert(field.to_string(), "This field is required".to_string());
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_requires_all_core_fields() {
        let payload = RegisterRequest {
            username: Some("terp42".to_string()),
            password: None,
            name: Some("Testudo".to_string()),
            major_year: Some("".to_string()),
            interests: None,
            avatar: None,
        };

        let err = validate_registration(payload).unwrap_err();
        let body = err.to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["field_errors"]["password"].is_string());
        assert!(body["field_errors"]["majorYear"].is_string());
        assert!(body["field_errors"].get("username").is_none());
    }

    #[test]
    fn registration_passes_through_optional_fields() {
        let payload = RegisterRequest {
            username: Some("terp42".to_string()),
            password: Some("hunter2".to_string()),
            name: Some("Testudo".to_string()),
            major_year: Some("Biology, 2026".to_string()),
            interests: Some("intramural soccer".to_string()),
            avatar: None,
        };

        let new_user = validate_registration(payload).unwrap();
        assert_eq!(new_user.interests.as_deref(), Some("intramural soccer"));
        assert!(new_user.avatar.is_none());
    }
}
