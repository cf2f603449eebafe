use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::models::{Event, User};

/// How deeply user references are resolved into an event response.
///
/// Membership endpoints (create/update/attend/leave) resolve creator and
/// attendees only, leaving message authors as bare ids; read and
/// message-post endpoints also resolve message authors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveDepth {
    Members,
    Full,
}

/// Creator summary embedded in event responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorBrief {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub major_year: String,
}

impl CreatorBrief {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            major_year: user.major_year.clone(),
        }
    }
}

/// Attendee summary; carries interests on top of the creator fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendeeProfile {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub major_year: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<String>,
}

impl AttendeeProfile {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
            major_year: user.major_year.clone(),
            interests: user.interests.clone(),
        }
    }
}

/// Message author summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageAuthor {
    pub id: Uuid,
    pub username: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl MessageAuthor {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            name: user.name.clone(),
            avatar: user.avatar.clone(),
        }
    }
}

/// Message author field: a resolved summary at full depth, a bare id at
/// membership depth. A dangling reference serializes as null.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuthorRef {
    Resolved(MessageAuthor),
    Id(Uuid),
}

/// One chat entry as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub user_id: Option<AuthorRef>,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// An event with its user references denormalized for the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub title: String,
    pub time: DateTime<Utc>,
    pub place: String,
    pub description: String,
    /// Null when the creator's account no longer exists
    pub creator_id: Option<CreatorBrief>,
    pub attendees: Vec<AttendeeProfile>,
    pub messages: Vec<MessageView>,
    pub created_at: DateTime<Utc>,
}

impl EventResponse {
    /// Denormalize `event` against the referenced users.
    ///
    /// Dangling references are tolerated: missing attendees are dropped
    /// from the resolved list, a missing creator or message author
    /// becomes null. Stored ids are never rewritten.
    pub fn resolve(event: &Event, users: &HashMap<Uuid, User>, depth: ResolveDepth) -> Self {
        let creator = users.get(&event.creator_id).map(CreatorBrief::from_user);

        let attendees = event
            .attendees
            .iter()
            .filter_map(|id| users.get(id))
            .map(AttendeeProfile::from_user)
            .collect();

        let messages = event
            .messages
            .iter()
            .map(|m| {
                let user_id = match depth {
                    ResolveDepth::Members => Some(AuthorRef::Id(m.user_id)),
                    ResolveDepth::Full => users
                        .get(&m.user_id)
                        .map(|u| AuthorRef::Resolved(MessageAuthor::from_user(u))),
                };
                MessageView {
                    user_id,
                    text: m.text.clone(),
                    timestamp: m.timestamp,
                }
            })
            .collect();

        Self {
            id: event.id,
            title: event.title.clone(),
            time: event.time,
            place: event.place.clone(),
            description: event.description.clone(),
            creator_id: creator,
            attendees,
            messages,
            created_at: event.created_at,
        }
    }

    /// Ids this event references, for a single lookup query. Message
    /// authors are only needed at full depth.
    pub fn referenced_ids(event: &Event, depth: ResolveDepth) -> Vec<Uuid> {
        let mut ids = vec![event.creator_id];
        ids.extend(&event.attendees);
        if depth == ResolveDepth::Full {
            ids.extend(event.messages.iter().map(|m| m.user_id));
        }
        ids.sort();
        ids.dedup();
        ids
    }
}
