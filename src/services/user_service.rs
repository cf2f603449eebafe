use sha2::{Digest, Sha256};
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::User;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(Uuid),
    #[error("Username already taken: {0}")]
    UsernameTaken(String),
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Database manager error: {0}")]
    DatabaseManager(#[from] DatabaseError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Fields required to register a user. Presence validation happens at
/// the handler layer; by this point everything required is known good.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub major_year: String,
    pub interests: Option<String>,
    pub avatar: Option<String>,
}

/// Profile fields mutable through the update path. Username and
/// password are not reachable here.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub major_year: Option<String>,
    pub interests: Option<String>,
    pub avatar: Option<String>,
}

pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub async fn new() -> Result<Self, UserError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Register a user. Username uniqueness is the store's constraint;
    /// a violation surfaces as UsernameTaken.
    pub async fn create(&self, new_user: NewUser) -> Result<User, UserError> {
        let salt = generate_salt();
        let hash = hash_password(&new_user.password, &salt);

        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash, password_salt, name, major_year, interests, avatar)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new_user.username)
        .bind(&hash)
        .bind(&salt)
        .bind(&new_user.name)
        .bind(&new_user.major_year)
        .bind(&new_user.interests)
        .bind(&new_user.avatar)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(e) if is_unique_violation(&e) => Err(UserError::UsernameTaken(new_user.username)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list(&self) -> Result<Vec<User>, UserError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn get(&self, id: Uuid) -> Result<User, UserError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserError::NotFound(id))
    }

    /// Apply only the provided profile fields; omitted fields keep
    /// their prior values.
    pub async fn update(&self, id: Uuid, changes: ProfileChanges) -> Result<User, UserError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                major_year = COALESCE($3, major_year),
                interests = COALESCE($4, interests),
                avatar = COALESCE($5, avatar)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.major_year)
        .bind(&changes.interests)
        .bind(&changes.avatar)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(UserError::NotFound(id))
    }

    /// Delete a user. Events keep their references; resolution treats
    /// them as dangling from here on (no cascade).
    pub async fn delete(&self, id: Uuid) -> Result<(), UserError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    /// Verify credentials by indexed username lookup and salted-digest
    /// comparison. Unknown user and wrong password are indistinguishable
    /// to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, UserError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if verify_password(password, &user.password_salt, &user.password_hash) {
            Ok(user)
        } else {
            Err(UserError::InvalidCredentials)
        }
    }

    /// Fetch a batch of users by id for reference resolution
    pub async fn lookup(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, User>, UserError> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }
}

fn generate_salt() -> String {
    Uuid::new_v4().simple().to_string()
}

fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    constant_time_eq(hash_password(password, salt).as_bytes(), expected_hash.as_bytes())
}

/// Comparison cost independent of where the inputs diverge. Inputs are
/// fixed-width hex digests, so the length check leaks nothing useful.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}
