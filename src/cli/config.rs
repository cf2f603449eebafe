use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Saved CLI session: which server to talk to and, once logged in, the
/// session token and identity it was issued for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub server: String,
    pub token: Option<String>,
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            server: "http://localhost:5000".to_string(),
            token: None,
            user_id: None,
            username: None,
            logged_in_at: None,
        }
    }
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.token.is_some() && self.user_id.is_some()
    }

    pub fn login(&mut self, token: String, user_id: Uuid, username: String) {
        self.token = Some(token);
        self.user_id = Some(user_id);
        self.username = Some(username);
        self.logged_in_at = Some(Utc::now());
    }

    pub fn logout(&mut self) {
        self.token = None;
        self.user_id = None;
        self.username = None;
        self.logged_in_at = None;
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("QUAD_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("quadmeet").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_session() -> anyhow::Result<Session> {
    let config_dir = get_config_dir()?;
    let session_file = config_dir.join("session.json");

    if !session_file.exists() {
        return Ok(Session::default());
    }

    let content = fs::read_to_string(session_file)?;
    let session: Session = serde_json::from_str(&content)?;
    Ok(session)
}

pub fn save_session(session: &Session) -> anyhow::Result<()> {
    let config_dir = get_config_dir()?;
    let session_file = config_dir.join("session.json");

    let content = serde_json::to_string_pretty(session)?;
    fs::write(session_file, content)?;
    Ok(())
}
