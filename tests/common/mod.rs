#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/quadmeet-api");
        cmd.env("QUADMEET_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server sees DATABASE_URL (and .env)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Spawn (once) and return the shared test server. Returns None when no
/// DATABASE_URL is configured, so suites can skip instead of failing on
/// machines without Postgres.
pub async fn ensure_server() -> Result<Option<&'static TestServer>> {
    let _ = dotenvy::dotenv();
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("skipping: DATABASE_URL not set");
        return Ok(None);
    }

    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(Some(server))
}

/// A registered account plus its session token
pub struct TestUser {
    pub id: String,
    pub username: String,
    pub token: String,
}

/// Usernames unique across test runs and across threads
pub fn unique_username(prefix: &str) -> String {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before epoch")
        .subsec_nanos();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}-{}", prefix, std::process::id(), nanos, n)
}

/// Register a fresh user and log in, returning the session
pub async fn register_and_login(
    server: &TestServer,
    client: &reqwest::Client,
    prefix: &str,
) -> Result<TestUser> {
    let username = unique_username(prefix);

    let res = client
        .post(format!("{}/api/users", server.base_url))
        .json(&json!({
            "username": username,
            "password": "hunter2",
            "name": format!("{} name", prefix),
            "majorYear": "Computer Science, 2027",
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "registration failed: {} {}",
        res.status(),
        res.text().await.unwrap_or_default()
    );
    let user: Value = res.json().await?;
    let id = user["id"].as_str().context("registration response missing id")?.to_string();

    let res = client
        .post(format!("{}/api/users/login", server.base_url))
        .json(&json!({ "username": username, "password": "hunter2" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
    let body: Value = res.json().await?;
    let token = body["token"].as_str().context("login response missing token")?.to_string();

    Ok(TestUser { id, username, token })
}

/// Create an event owned by `user`, returning the response body
pub async fn create_event(
    server: &TestServer,
    client: &reqwest::Client,
    user: &TestUser,
    title: &str,
    time: &str,
) -> Result<Value> {
    let res = client
        .post(format!("{}/api/events", server.base_url))
        .bearer_auth(&user.token)
        .json(&json!({
            "title": title,
            "time": time,
            "place": "McKeldin Library",
            "description": "integration test event",
            "creatorId": user.id,
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "event creation failed: {} {}",
        res.status(),
        res.text().await.unwrap_or_default()
    );
    Ok(res.json().await?)
}

/// Attendee ids from an event response (attendees arrive resolved)
pub fn attendee_ids(event: &Value) -> Vec<String> {
    event["attendees"]
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|u| u["id"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
