use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::api::events::EventResponse;
use crate::cli::client::ApiClient;
use crate::cli::config::{load_session, Session};
use crate::cli::utils::{output_json, output_success, print_event_detail, print_event_line};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum EventCommands {
    #[command(about = "List upcoming events, soonest first")]
    List,

    #[command(about = "Show one event with attendees and chat")]
    Show {
        #[arg(help = "Event id")]
        id: Uuid,
    },

    #[command(about = "Create an event (you attend automatically)")]
    Create {
        #[arg(help = "Event title")]
        title: String,
        #[arg(long, help = "Start time, RFC 3339, e.g. 2026-09-12T19:00:00Z")]
        time: String,
        #[arg(long, help = "Where it happens")]
        place: String,
        #[arg(long, help = "What it is about")]
        description: String,
    },

    #[command(about = "Update an event's details")]
    Update {
        #[arg(help = "Event id")]
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, help = "Start time, RFC 3339")]
        time: Option<String>,
        #[arg(long)]
        place: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    #[command(about = "Delete an event")]
    Delete {
        #[arg(help = "Event id")]
        id: Uuid,
    },

    #[command(about = "Join an event")]
    Attend {
        #[arg(help = "Event id")]
        id: Uuid,
    },

    #[command(about = "Leave an event")]
    Leave {
        #[arg(help = "Event id")]
        id: Uuid,
    },

    #[command(about = "Post a chat message to an event")]
    Message {
        #[arg(help = "Event id")]
        id: Uuid,
        #[arg(help = "Message text")]
        text: String,
    },
}

pub async fn handle(
    cmd: EventCommands,
    server: Option<String>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let session = load_session()?;
    let client = ApiClient::from_session(&session, server);

    match cmd {
        EventCommands::List => {
            let payload = client.get("/api/events").await?;
            match output_format {
                OutputFormat::Json => output_json(&payload)?,
                OutputFormat::Text => {
                    let events: Vec<EventResponse> = serde_json::from_value(payload)?;
                    if events.is_empty() {
                        println!("No events yet. Create one with `quad events create`.");
                    }
                    for event in &events {
                        print_event_line(event);
                    }
                }
            }
            Ok(())
        }

        EventCommands::Show { id } => {
            let payload = client.get(&format!("/api/events/{}", id)).await?;
            render_event(payload, &output_format)
        }

        EventCommands::Create {
            title,
            time,
            place,
            description,
        } => {
            let user_id = require_login(&session)?;
            let time = parse_time(&time)?;

            let payload = client
                .post(
                    "/api/events",
                    json!({
                        "title": title,
                        "time": time,
                        "place": place,
                        "description": description,
                        "creatorId": user_id,
                    }),
                )
                .await?;
            render_event(payload, &output_format)
        }

        EventCommands::Update {
            id,
            title,
            time,
            place,
            description,
        } => {
            let mut changes = Map::new();
            if let Some(title) = title {
                changes.insert("title".to_string(), Value::String(title));
            }
            if let Some(time) = time {
                changes.insert("time".to_string(), json!(parse_time(&time)?));
            }
            if let Some(place) = place {
                changes.insert("place".to_string(), Value::String(place));
            }
            if let Some(description) = description {
                changes.insert("description".to_string(), Value::String(description));
            }

            let payload = client
                .put(&format!("/api/events/{}", id), Value::Object(changes))
                .await?;
            render_event(payload, &output_format)
        }

        EventCommands::Delete { id } => {
            client.delete(&format!("/api/events/{}", id), None).await?;
            output_success(&output_format, "Event deleted")
        }

        EventCommands::Attend { id } => {
            let user_id = require_login(&session)?;
            let payload = client
                .post(&format!("/api/events/{}/attend", id), json!({ "userId": user_id }))
                .await?;
            render_event(payload, &output_format)
        }

        EventCommands::Leave { id } => {
            let user_id = require_login(&session)?;
            let payload = client
                .delete(
                    &format!("/api/events/{}/attend", id),
                    Some(json!({ "userId": user_id })),
                )
                .await?;
            render_event(payload, &output_format)
        }

        EventCommands::Message { id, text } => {
            let user_id = require_login(&session)?;
            let payload = client
                .post(
                    &format!("/api/events/{}/messages", id),
                    json!({ "userId": user_id, "text": text }),
                )
                .await?;
            render_event(payload, &output_format)
        }
    }
}

fn render_event(payload: Value, output_format: &OutputFormat) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => output_json(&payload),
        OutputFormat::Text => {
            let event: EventResponse = serde_json::from_value(payload)?;
            print_event_detail(&event);
            Ok(())
        }
    }
}

fn require_login(session: &Session) -> anyhow::Result<Uuid> {
    session
        .user_id
        .context("Not logged in; run `quad auth login` first")
}

fn parse_time(raw: &str) -> anyhow::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .with_context(|| format!("'{}' is not an RFC 3339 timestamp", raw))
}
