use axum::response::Json;
use serde::Deserialize;

use crate::api::users::{LoginResponse, UserResponse};
use crate::auth::{generate_jwt, Claims};
use crate::error::ApiError;
use crate::services::user_service::UserService;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/users/login - verify credentials and issue a session token
pub async fn login(Json(payload): Json<LoginRequest>) -> Result<Json<LoginResponse>, ApiError> {
    let username = payload
        .username
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::missing_field("username"))?;
    let password = payload
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::missing_field("password"))?;

    let service = UserService::new().await?;
    let user = service.authenticate(&username, &password).await?;

    let token = generate_jwt(Claims::new(user.username.clone(), user.id))?;

    Ok(Json(LoginResponse {
        token,
        user: UserResponse::from(&user),
    }))
}
