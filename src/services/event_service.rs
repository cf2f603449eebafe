use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::api::events::{EventResponse, ResolveDepth};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{Event, StoredMessage, User};

#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Event not found: {0}")]
    NotFound(Uuid),
    #[error("User {user} already attending event {event}")]
    AlreadyAttending { event: Uuid, user: Uuid },
    #[error("Database manager error: {0}")]
    DatabaseManager(#[from] DatabaseError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Fields required to create an event
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub time: DateTime<Utc>,
    pub place: String,
    pub description: String,
    pub creator_id: Uuid,
}

/// Fields mutable through the update path. Creator, attendees and
/// messages are not reachable here.
#[derive(Debug, Clone, Default)]
pub struct EventChanges {
    pub title: Option<String>,
    pub time: Option<DateTime<Utc>>,
    pub place: Option<String>,
    pub description: Option<String>,
}

pub struct EventService {
    pool: PgPool,
}

impl EventService {
    pub async fn new() -> Result<Self, EventError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Create an event. The creator starts as its first attendee.
    pub async fn create(&self, new_event: NewEvent) -> Result<Event, EventError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (id, title, "time", place, description, creator_id, attendees)
            VALUES ($1, $2, $3, $4, $5, $6, ARRAY[$6])
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_event.title)
        .bind(new_event.time)
        .bind(&new_event.place)
        .bind(&new_event.description)
        .bind(new_event.creator_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(event)
    }

    /// All events, soonest first
    pub async fn list(&self) -> Result<Vec<Event>, EventError> {
        let events = sqlx::query_as::<_, Event>(r#"SELECT * FROM events ORDER BY "time" ASC"#)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    pub async fn get(&self, id: Uuid) -> Result<Event, EventError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(EventError::NotFound(id))
    }

    /// Apply only the provided fields; omitted fields keep their prior
    /// values.
    pub async fn update(&self, id: Uuid, changes: EventChanges) -> Result<Event, EventError> {
        sqlx::query_as::<_, Event>(
            r#"
            UPDATE events SET
                title = COALESCE($2, title),
                "time" = COALESCE($3, "time"),
                place = COALESCE($4, place),
                description = COALESCE($5, description)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(changes.time)
        .bind(&changes.place)
        .bind(&changes.description)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(EventError::NotFound(id))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), EventError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(EventError::NotFound(id));
        }
        Ok(())
    }

    /// Add a user to the attendee set.
    ///
    /// One conditional update: the append only happens if the user is
    /// not already a member, so concurrent joins cannot produce
    /// duplicate membership. The follow-up probe only classifies a
    /// miss as not-found vs already-attending.
    pub async fn attend(&self, event_id: Uuid, user_id: Uuid) -> Result<Event, EventError> {
        let updated = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET attendees = array_append(attendees, $2)
            WHERE id = $1 AND NOT (attendees @> ARRAY[$2])
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match updated {
            Some(event) => Ok(event),
            None => {
                let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM events WHERE id = $1")
                    .bind(event_id)
                    .fetch_one(&self.pool)
                    .await?;
                if exists == 0 {
                    Err(EventError::NotFound(event_id))
                } else {
                    Err(EventError::AlreadyAttending {
                        event: event_id,
                        user: user_id,
                    })
                }
            }
        }
    }

    /// Remove a user from the attendee set. Removing a non-member is
    /// not an error; the set is simply unchanged.
    pub async fn leave(&self, event_id: Uuid, user_id: Uuid) -> Result<Event, EventError> {
        sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET attendees = array_remove(attendees, $2)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(EventError::NotFound(event_id))
    }

    /// Append a chat message, stamped server-side at append time
    pub async fn post_message(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        text: String,
    ) -> Result<Event, EventError> {
        let entry = StoredMessage {
            user_id,
            text,
            timestamp: Utc::now(),
        };

        sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET messages = messages || $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(event_id)
        .bind(Json(vec![entry]))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(EventError::NotFound(event_id))
    }

    /// Denormalize one event's user references for the client
    pub async fn resolve(&self, event: &Event, depth: ResolveDepth) -> Result<EventResponse, EventError> {
        let ids = EventResponse::referenced_ids(event, depth);
        let users = self.lookup_users(&ids).await?;
        Ok(EventResponse::resolve(event, &users, depth))
    }

    /// Denormalize a batch of events with a single user lookup
    pub async fn resolve_all(
        &self,
        events: &[Event],
        depth: ResolveDepth,
    ) -> Result<Vec<EventResponse>, EventError> {
        let mut ids: Vec<Uuid> = events
            .iter()
            .flat_map(|e| EventResponse::referenced_ids(e, depth))
            .collect();
        ids.sort();
        ids.dedup();

        let users = self.lookup_users(&ids).await?;
        Ok(events
            .iter()
            .map(|e| EventResponse::resolve(e, &users, depth))
            .collect())
    }

    async fn lookup_users(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, User>, EventError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let users = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }
}
