use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// A stored event document. The attendee set and the chat log are
/// embedded in the row; user references are bare ids resolved at read
/// time.
#[derive(Debug, Clone, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub time: DateTime<Utc>,
    pub place: String,
    pub description: String,
    pub creator_id: Uuid,
    pub attendees: Vec<Uuid>,
    pub messages: Json<Vec<StoredMessage>>,
    pub created_at: DateTime<Utc>,
}

/// One chat entry in an event's embedded message log. Append-only;
/// stamped at append time, so storage order is chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub user_id: Uuid,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}
