/// Course model and database operations
///
/// A course belongs to the user who created it (`user_id`). Ownership is fixed
/// at creation: neither [`NewCourse`] nor [`CourseChanges`] carries an owner,
/// so a client-supplied `userId` is dropped during deserialization.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE courses (
///     id BIGSERIAL PRIMARY KEY,
///     title TEXT NOT NULL,
///     description TEXT NOT NULL,
///     estimated_time TEXT,
///     materials_needed TEXT,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::PgPool;
use validator::Validate;

use super::user::UserProfile;
use crate::store::{validation, StoreError, StoreResult};

/// Stored course record
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,

    /// Owning user; the only user allowed to change or delete the course
    pub user_id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Course as returned to clients, joined with its owner's public fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    pub user_id: i64,

    #[serde(rename = "userInfo")]
    pub owner: UserProfile,
}

impl CourseDetail {
    pub fn new(course: Course, owner: UserProfile) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            estimated_time: course.estimated_time,
            materials_needed: course.materials_needed,
            user_id: course.user_id,
            owner,
        }
    }
}

/// Course payload for creation
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    #[validate(
        required(message = "A title is required"),
        length(min = 1, message = "Please provide a title")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "A description is required"),
        length(min = 1, message = "Please provide a description")
    )]
    pub description: Option<String>,

    pub estimated_time: Option<String>,

    pub materials_needed: Option<String>,
}

const NEW_COURSE_FIELDS: &[(&str, &str)] = &[
    ("title", "title"),
    ("description", "description"),
];

impl NewCourse {
    /// Validates the payload into column values
    ///
    /// # Errors
    ///
    /// `StoreError::Validation` listing every violated constraint
    pub fn into_fields(self) -> StoreResult<CourseFields> {
        validation::check(&self, NEW_COURSE_FIELDS)?;

        let (Some(title), Some(description)) = (self.title, self.description) else {
            return Err(StoreError::Backend("validated course is incomplete".to_string()));
        };

        Ok(CourseFields {
            title,
            description,
            estimated_time: self.estimated_time,
            materials_needed: self.materials_needed,
        })
    }
}

/// Partial update payload
///
/// Each field distinguishes "absent" (`None`, keep the stored value) from an
/// explicit `null` (`Some(None)`, clear it). Clearing a required field fails
/// validation once merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseChanges {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub estimated_time: Option<Option<String>>,

    #[serde(default, deserialize_with = "present")]
    pub materials_needed: Option<Option<String>>,
}

/// Marks a field as present, keeping `null` as `Some(None)`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Validated column values for insert and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseFields {
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
}

impl Course {
    /// Applies `changes` on top of the stored values
    ///
    /// The result still has to pass [`NewCourse::into_fields`].
    pub fn merge(&self, changes: CourseChanges) -> NewCourse {
        NewCourse {
            title: changes.title.unwrap_or_else(|| Some(self.title.clone())),
            description: changes
                .description
                .unwrap_or_else(|| Some(self.description.clone())),
            estimated_time: changes
                .estimated_time
                .unwrap_or_else(|| self.estimated_time.clone()),
            materials_needed: changes
                .materials_needed
                .unwrap_or_else(|| self.materials_needed.clone()),
        }
    }

    /// Inserts a course owned by `owner_id`
    pub async fn create(
        pool: &PgPool,
        owner_id: i64,
        data: CourseFields,
    ) -> Result<Self, sqlx::Error> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (title, description, estimated_time, materials_needed, user_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, estimated_time, materials_needed, user_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.estimated_time)
        .bind(data.materials_needed)
        .bind(owner_id)
        .fetch_one(pool)
        .await?;

        Ok(course)
    }

    /// Finds a course by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, title, description, estimated_time, materials_needed, user_id,
                   created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(course)
    }

    /// Overwrites the editable columns of a course
    ///
    /// Returns `None` if the course no longer exists. `user_id` is never
    /// touched.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        data: CourseFields,
    ) -> Result<Option<Self>, sqlx::Error> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
            SET title = $2, description = $3, estimated_time = $4, materials_needed = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, estimated_time, materials_needed, user_id,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.estimated_time)
        .bind(data.materials_needed)
        .fetch_optional(pool)
        .await?;

        Ok(course)
    }

    /// Deletes a course by ID
    ///
    /// Returns true if a row was removed.
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Flat row for the course/owner join
#[derive(Debug, sqlx::FromRow)]
struct CourseDetailRow {
    id: i64,
    title: String,
    description: String,
    estimated_time: Option<String>,
    materials_needed: Option<String>,
    user_id: i64,
    owner_first_name: String,
    owner_last_name: String,
    owner_email_address: String,
}

impl From<CourseDetailRow> for CourseDetail {
    fn from(row: CourseDetailRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            estimated_time: row.estimated_time,
            materials_needed: row.materials_needed,
            user_id: row.user_id,
            owner: UserProfile {
                id: row.user_id,
                first_name: row.owner_first_name,
                last_name: row.owner_last_name,
                email_address: row.owner_email_address,
            },
        }
    }
}

const COURSE_DETAIL_SELECT: &str = r#"
    SELECT c.id, c.title, c.description, c.estimated_time, c.materials_needed, c.user_id,
           u.first_name AS owner_first_name,
           u.last_name AS owner_last_name,
           u.email_address::TEXT AS owner_email_address
    FROM courses c
    JOIN users u ON u.id = c.user_id
"#;

impl CourseDetail {
    /// Lists every course with its owner, ordered by id
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let query = format!("{} ORDER BY c.id", COURSE_DETAIL_SELECT);
        let rows = sqlx::query_as::<_, CourseDetailRow>(&query)
            .fetch_all(pool)
            .await?;

        Ok(rows.into_iter().map(CourseDetail::from).collect())
    }

    /// Finds one course with its owner
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let query = format!("{} WHERE c.id = $1", COURSE_DETAIL_SELECT);
        let row = sqlx::query_as::<_, CourseDetailRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(CourseDetail::from))
    }
}
