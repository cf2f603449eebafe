use serde_json::Value;

use crate::api::events::{AuthorRef, EventResponse};
use crate::api::users::UserResponse;
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "success": true,
                    "message": message
                }))?
            );
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print a raw API payload as pretty JSON
pub fn output_json(payload: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

/// One line per event, dashboard style
pub fn print_event_line(event: &EventResponse) {
    let creator = event
        .creator_id
        .as_ref()
        .map(|c| c.username.as_str())
        .unwrap_or("(deleted account)");

    println!(
        "{}  {}  @ {}  by {}  ({} attending)  [{}]",
        event.time.format("%Y-%m-%d %H:%M"),
        event.title,
        event.place,
        creator,
        event.attendees.len(),
        event.id
    );
}

/// Full event detail: header, attendees, chat log
pub fn print_event_detail(event: &EventResponse) {
    println!("{}", event.title);
    println!("  when:  {}", event.time.format("%Y-%m-%d %H:%M %Z"));
    println!("  where: {}", event.place);
    println!("  about: {}", event.description);
    match &event.creator_id {
        Some(creator) => println!("  host:  {} ({})", creator.name, creator.major_year),
        None => println!("  host:  (deleted account)"),
    }

    println!("  attendees ({}):", event.attendees.len());
    for attendee in &event.attendees {
        match &attendee.interests {
            Some(interests) => println!("    {} — {} — {}", attendee.username, attendee.major_year, interests),
            None => println!("    {} — {}", attendee.username, attendee.major_year),
        }
    }

    if !event.messages.is_empty() {
        println!("  chat ({}):", event.messages.len());
        for message in &event.messages {
            let author = match &message.user_id {
                Some(AuthorRef::Resolved(author)) => author.username.clone(),
                Some(AuthorRef::Id(id)) => id.to_string(),
                None => "(deleted account)".to_string(),
            };
            println!(
                "    [{}] {}: {}",
                message.timestamp.format("%m-%d %H:%M"),
                author,
                message.text
            );
        }
    }
}

pub fn print_user(user: &UserResponse) {
    println!("{} ({})", user.username, user.name);
    println!("  id:    {}", user.id);
    println!("  major: {}", user.major_year);
    if let Some(interests) = &user.interests {
        println!("  into:  {}", interests);
    }
    if let Some(avatar) = &user.avatar {
        println!("  pic:   {}", avatar);
    }
}
