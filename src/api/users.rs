use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::User;

/// Public user view returned by the user endpoints. This is the only
/// user shape that crosses the wire; password material has no path out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    pub major_year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            major_year: user.major_year.clone(),
            interests: user.interests.clone(),
            avatar: user.avatar.clone(),
            created_at: user.created_at,
        }
    }
}

/// Successful login: session token plus the public user summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "terp42".to_string(),
            password_hash: "deadbeef".to_string(),
            password_salt: "salt".to_string(),
            name: "Testudo Terrapin".to_string(),
            major_year: "Computer Science, 2027".to_string(),
            interests: None,
            avatar: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn response_uses_camel_case_and_omits_empty_optionals() {
        let value = serde_json::to_value(UserResponse::from(&sample_user())).unwrap();
        assert!(value.get("majorYear").is_some());
        assert!(value.get("createdAt").is_some());
        assert!(value.get("interests").is_none());
        assert!(value.get("avatar").is_none());
    }

    #[test]
    fn response_never_carries_password_material() {
        let text = serde_json::to_string(&UserResponse::from(&sample_user())).unwrap();
        assert!(!text.contains("password"));
        assert!(!text.contains("deadbeef"));
        assert!(!text.contains("salt"));
    }
}
