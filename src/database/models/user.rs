use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A stored user document.
///
/// Deliberately not `Serialize`: password material must never reach a
/// response body, so handlers can only ever emit the projections in
/// `crate::api`.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub password_salt: String,
    pub name: String,
    pub major_year: String,
    pub interests: Option<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}
