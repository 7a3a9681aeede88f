use serde_json::{Map, Value};
use sqlx::SqlitePool;
use tracing::info;

use super::models::{RegisterRequest, UserProfile, UserRow, UserWithFavorites};
use crate::auth::passwords::{hash_password, verify_password};
use crate::common::sql::{bind_value, partial_update};
use crate::common::ApiError;

/// External field name -> column name translation for partial updates.
/// `password` maps onto the hash column; the service re-hashes the value
/// before it is bound.
const USER_COLUMN_ALIASES: &[(&str, &str)] = &[
    ("firstName", "first_name"),
    ("lastName", "last_name"),
    ("isAdmin", "is_admin"),
    ("password", "password_hash"),
];

const PROFILE_COLUMNS: &str = "username, first_name, last_name, email, phone, is_admin";

pub struct UsersService {
    db: SqlitePool,
}

impl UsersService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Authenticate with username and password.
    ///
    /// Returns the same `Unauthorized` whether the user is unknown or the
    /// password is wrong, so callers can't probe for usernames.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserProfile, ApiError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT username, password_hash, first_name, last_name, email, phone, is_admin
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await?;

        if let Some(row) = row {
            if verify_password(password, &row.password_hash) {
                return Ok(UserProfile::from(row));
            }
        }
        Err(ApiError::Unauthorized(
            "Invalid username/password".to_string(),
        ))
    }

    /// Register a new user. Duplicate usernames are a conflict.
    pub async fn register(
        &self,
        request: RegisterRequest,
        bcrypt_cost: u32,
    ) -> Result<UserProfile, ApiError> {
        let mut tx = self.db.begin().await?;

        let duplicate: Option<(String,)> =
            sqlx::query_as("SELECT username FROM users WHERE username = ?1")
                .bind(&request.username)
                .fetch_optional(&mut *tx)
                .await?;
        if duplicate.is_some() {
            return Err(ApiError::Conflict(format!(
                "Username already taken: {}",
                request.username
            )));
        }

        let password_hash = hash_password(&request.password, bcrypt_cost)?;

        sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, first_name, last_name, email, phone, is_admin)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&request.username)
        .bind(&password_hash)
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(&request.email)
        .bind(&request.phone)
        .bind(request.is_admin)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(username = %request.username, "registered user");
        Ok(UserProfile {
            username: request.username,
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            phone: request.phone,
            is_admin: request.is_admin,
        })
    }

    pub async fn find_all(&self) -> Result<Vec<UserProfile>, ApiError> {
        let users = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {} FROM users ORDER BY username",
            PROFILE_COLUMNS
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(users)
    }

    /// Profile plus favorite item names.
    pub async fn get(&self, username: &str) -> Result<UserWithFavorites, ApiError> {
        let profile = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {} FROM users WHERE username = ?1",
            PROFILE_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("No user: {}", username)))?;

        let favorites: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT i.item_name
            FROM favorites f
            JOIN items i ON i.id = f.item_id
            WHERE f.username = ?1
            ORDER BY i.item_name
            "#,
        )
        .bind(username)
        .fetch_all(&self.db)
        .await?;

        Ok(UserWithFavorites { profile, favorites })
    }

    /// Partial update. Only the supplied fields change; a supplied password
    /// is re-hashed before binding.
    pub async fn update(
        &self,
        username: &str,
        mut updates: Map<String, Value>,
        bcrypt_cost: u32,
    ) -> Result<UserProfile, ApiError> {
        let hashed = match updates.get("password").and_then(Value::as_str) {
            Some(password) => Some(hash_password(password, bcrypt_cost)?),
            None => None,
        };
        if let Some(hashed) = hashed {
            updates.insert("password".to_string(), Value::String(hashed));
        }

        let set = partial_update(&updates, USER_COLUMN_ALIASES)?;

        let mut tx = self.db.begin().await?;

        let sql = format!(
            "UPDATE users SET {} WHERE username = ?{}",
            set.clause,
            set.next_placeholder()
        );
        let mut query = sqlx::query(&sql);
        for value in &set.values {
            query = bind_value(query, value);
        }
        let result = query.bind(username).execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("No user: {}", username)));
        }

        let user = sqlx::query_as::<_, UserProfile>(&format!(
            "SELECT {} FROM users WHERE username = ?1",
            PROFILE_COLUMNS
        ))
        .bind(username)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(user)
    }

    pub async fn remove(&self, username: &str) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM users WHERE username = ?1")
            .bind(username)
            .execute(&self.db)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("No user: {}", username)));
        }
        Ok(())
    }

    /// Mark an item as a favorite. Adding an existing favorite is a no-op.
    pub async fn add_favorite(&self, username: &str, item_name: &str) -> Result<(), ApiError> {
        let mut tx = self.db.begin().await?;

        let user: Option<(String,)> = sqlx::query_as("SELECT username FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&mut *tx)
            .await?;
        if user.is_none() {
            return Err(ApiError::NotFound(format!("No user: {}", username)));
        }

        let item_id = self.item_id(&mut tx, item_name).await?;

        sqlx::query("INSERT OR IGNORE INTO favorites (username, item_id) VALUES (?1, ?2)")
            .bind(username)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Remove a favorite; the relation must currently exist.
    pub async fn remove_favorite(&self, username: &str, item_name: &str) -> Result<(), ApiError> {
        let mut tx = self.db.begin().await?;

        let user: Option<(String,)> = sqlx::query_as("SELECT username FROM users WHERE username = ?1")
            .bind(username)
            .fetch_optional(&mut *tx)
            .await?;
        if user.is_none() {
            return Err(ApiError::NotFound(format!("No user: {}", username)));
        }

        let item_id = self.item_id(&mut tx, item_name).await?;

        let result = sqlx::query("DELETE FROM favorites WHERE username = ?1 AND item_id = ?2")
            .bind(username)
            .bind(item_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!(
                "{} is not a favorite of {}",
                item_name, username
            )));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn item_id(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
        item_name: &str,
    ) -> Result<i64, ApiError> {
        let item: Option<(i64,)> = sqlx::query_as("SELECT id FROM items WHERE item_name = ?1")
            .bind(item_name)
            .fetch_optional(&mut **tx)
            .await?;
        item.map(|(id,)| id)
            .ok_or_else(|| ApiError::NotFound(format!("No item: {}", item_name)))
    }
}
