/// User model and database operations
///
/// Users register once and then authenticate every protected request with
/// HTTP Basic credentials. There is no update or delete path.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     first_name TEXT NOT NULL,
///     last_name TEXT NOT NULL,
///     email_address CITEXT NOT NULL UNIQUE,
///     password TEXT NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Exposure
///
/// [`User`] does not implement `Serialize`. Anything leaving the process goes
/// through [`UserProfile`], which has no password or timestamps.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use validator::Validate;

use crate::auth::password;
use crate::store::{validation, StoreError, StoreResult};

/// Stored user record
#[derive(Clone, sqlx::FromRow)]
pub struct User {
    /// Generated user ID
    pub id: i64,

    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Email address (unique, case-insensitive via CITEXT)
    pub email_address: String,

    /// Argon2id password hash in PHC string format
    pub password: String,

    /// When the user registered
    pub created_at: DateTime<Utc>,

    /// When the row was last touched
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email_address", &self.email_address)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Public fields of a user, safe to return to any client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email_address: user.email_address.clone(),
        }
    }
}

/// Registration payload as received from a client
///
/// Every field is optional at the type level so that a missing field becomes
/// a validation message instead of a deserialization failure.
#[derive(Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[validate(
        required(message = "A first name is required"),
        length(min = 1, message = "Please provide a first name")
    )]
    pub first_name: Option<String>,

    #[validate(
        required(message = "A last name is required"),
        length(min = 1, message = "Please provide a last name")
    )]
    pub last_name: Option<String>,

    #[validate(
        required(message = "An email address is required"),
        email(message = "Please provide a valid email address")
    )]
    pub email_address: Option<String>,

    #[validate(
        required(message = "A password is required"),
        length(min = 1, message = "Please provide a password")
    )]
    pub password: Option<String>,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("email_address", &self.email_address)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Declaration order used to sort validation messages
const NEW_USER_FIELDS: &[(&str, &str)] = &[
    ("first_name", "firstName"),
    ("last_name", "lastName"),
    ("email_address", "emailAddress"),
    ("password", "password"),
];

impl NewUser {
    /// Validates the payload and hashes the password
    ///
    /// # Errors
    ///
    /// - `StoreError::Validation` listing every violated constraint
    /// - `StoreError::Backend` if hashing fails
    pub fn into_create_user(self) -> StoreResult<CreateUser> {
        validation::check(&self, NEW_USER_FIELDS)?;

        // validate() guarantees presence of every field
        let (Some(first_name), Some(last_name), Some(email_address), Some(plaintext)) =
            (self.first_name, self.last_name, self.email_address, self.password)
        else {
            return Err(StoreError::Backend("validated user is incomplete".to_string()));
        };

        let password_hash = password::hash_password(&plaintext)
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(CreateUser {
            first_name,
            last_name,
            email_address,
            password_hash,
        })
    }
}

/// Validated insert data for a new user
///
/// Only ever built by [`NewUser::into_create_user`], so `password_hash` is
/// always a hash.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub password_hash: String,
}

impl User {
    /// Inserts a new user
    ///
    /// # Errors
    ///
    /// Returns an error if the email address already exists (unique constraint
    /// `users_email_address_key`) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email_address, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, email_address::TEXT AS email_address,
                      password, created_at, updated_at
            "#,
        )
        .bind(data.first_name)
        .bind(data.last_name)
        .bind(data.email_address)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email_address::TEXT AS email_address,
                   password, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// Lookup is case-insensitive (CITEXT column).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email_address::TEXT AS email_address,
                   password, created_at, updated_at
            FROM users
            WHERE email_address = $1::CITEXT
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}
