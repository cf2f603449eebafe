mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn creator_is_automatically_attending() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let user = common::register_and_login(server, &client, "host").await?;
    let event =
        common::create_event(server, &client, &user, "Game Night", "2027-03-01T19:00:00Z").await?;

    assert_eq!(common::attendee_ids(&event), vec![user.id.clone()]);
    // Creator arrives resolved, not as a bare id
    assert_eq!(event["creatorId"]["username"], user.username.as_str());
    assert_eq!(event["title"], "Game Night");
    assert!(event["createdAt"].is_string());

    Ok(())
}

#[tokio::test]
async fn creation_rejects_missing_fields() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let user = common::register_and_login(server, &client, "strict").await?;
    let res = client
        .post(format!("{}/api/events", server.base_url))
        .bearer_auth(&user.token)
        .json(&json!({ "title": "No place, no time", "creatorId": user.id }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["time"].is_string());
    assert!(body["field_errors"]["place"].is_string());
    assert!(body["field_errors"]["description"].is_string());

    Ok(())
}

#[tokio::test]
async fn events_require_a_session() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/api/events", server.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn list_is_ordered_by_time_ascending() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let user = common::register_and_login(server, &client, "planner").await?;
    let later =
        common::create_event(server, &client, &user, "Later", "2027-06-02T10:00:00Z").await?;
    let earlier =
        common::create_event(server, &client, &user, "Earlier", "2027-06-01T10:00:00Z").await?;

    let res = client
        .get(format!("{}/api/events", server.base_url))
        .bearer_auth(&user.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let events = body.as_array().expect("array of events");

    let pos = |id: &Value| events.iter().position(|e| e["id"] == *id);
    let earlier_pos = pos(&earlier["id"]).expect("earlier event listed");
    let later_pos = pos(&later["id"]).expect("later event listed");
    assert!(earlier_pos < later_pos, "events not sorted by time ascending");

    // Global ordering check across whatever else is in the store
    let times: Vec<chrono::DateTime<chrono::Utc>> = events
        .iter()
        .filter_map(|e| e["time"].as_str())
        .map(|s| s.parse().expect("rfc3339 time"))
        .collect();
    assert!(times.windows(2).all(|w| w[0] <= w[1]), "list not time-ascending");

    Ok(())
}

#[tokio::test]
async fn get_unknown_event_is_not_found() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let user = common::register_and_login(server, &client, "seeker").await?;
    let res = client
        .get(format!(
            "{}/api/events/00000000-0000-4000-8000-000000000000",
            server.base_url
        ))
        .bearer_auth(&user.token)
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "NOT_FOUND");

    Ok(())
}

#[tokio::test]
async fn partial_update_keeps_omitted_fields() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let user = common::register_and_login(server, &client, "tweaker").await?;
    let event =
        common::create_event(server, &client, &user, "Draft Title", "2027-04-01T18:00:00Z").await?;

    let res = client
        .put(format!("{}/api/events/{}", server.base_url, event["id"].as_str().unwrap()))
        .bearer_auth(&user.token)
        .json(&json!({ "place": "Stamp Student Union" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["place"], "Stamp Student Union");
    assert_eq!(body["title"], "Draft Title");
    assert_eq!(body["description"], "integration test event");
    assert_eq!(body["time"], event["time"]);
    // Attendees survive the update untouched
    assert_eq!(common::attendee_ids(&body), vec![user.id.clone()]);

    Ok(())
}

#[tokio::test]
async fn delete_removes_the_event() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let user = common::register_and_login(server, &client, "remover").await?;
    let event =
        common::create_event(server, &client, &user, "Short-lived", "2027-05-01T12:00:00Z").await?;
    let id = event["id"].as_str().unwrap();

    let res = client
        .delete(format!("{}/api/events/{}", server.base_url, id))
        .bearer_auth(&user.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Event deleted");

    let res = client
        .get(format!("{}/api/events/{}", server.base_url, id))
        .bearer_auth(&user.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // Deleting again is a 404, not a silent success
    let res = client
        .delete(format!("{}/api/events/{}", server.base_url, id))
        .bearer_auth(&user.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
