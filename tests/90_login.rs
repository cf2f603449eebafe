mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn login_issues_a_working_session_token() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let user = common::register_and_login(server, &client, "session").await?;

    // The issued token opens protected routes
    let res = client
        .get(format!("{}/api/users/{}", server.base_url, user.id))
        .bearer_auth(&user.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["username"], user.username.as_str());

    Ok(())
}

#[tokio::test]
async fn login_response_excludes_password_material() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let user = common::register_and_login(server, &client, "tidy").await?;
    let res = client
        .post(format!("{}/api/users/login", server.base_url))
        .json(&json!({ "username": user.username, "password": "hunter2" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let text = res.text().await?;
    assert!(!text.contains("password"), "login leaked password material: {}", text);
    let body: Value = serde_json::from_str(&text)?;
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["username"], user.username.as_str());

    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_unauthorized() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let user = common::register_and_login(server, &client, "locked").await?;

    let res = client
        .post(format!("{}/api/users/login", server.base_url))
        .json(&json!({ "username": user.username, "password": "wrong" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = res.json().await?;

    let res = client
        .post(format!("{}/api/users/login", server.base_url))
        .json(&json!({ "username": common::unique_username("nobody"), "password": "wrong" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let unknown_user: Value = res.json().await?;

    // Unknown user and bad password are indistinguishable
    assert_eq!(wrong_password["message"], unknown_user["message"]);

    Ok(())
}

#[tokio::test]
async fn login_requires_both_fields() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/users/login", server.base_url))
        .json(&json!({ "username": "someone" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    Ok(())
}

#[tokio::test]
async fn garbage_tokens_are_rejected() -> Result<()> {
    let Some(server) = common::ensure_server().await? else { return Ok(()) };
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/events", server.base_url))
        .bearer_auth("not-a-real-token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client
        .get(format!("{}/api/events", server.base_url))
        .header("Authorization", "Basic dXNlcjpwYXNz")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
