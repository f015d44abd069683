/// PostgreSQL-backed store
///
/// Thin adapter over the model functions in [`crate::models`]. Input is
/// validated before any SQL runs; the database then enforces uniqueness of
/// `users.email_address` (CITEXT, so case-insensitive) and the course owner
/// foreign key.
///
/// # Example
///
/// ```no_run
/// use coursehub_shared::db::pool::{create_pool, DatabaseConfig};
/// use coursehub_shared::store::{postgres::PgStore, CourseStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// let store = PgStore::new(pool);
/// let courses = store.list_courses().await?;
/// println!("{} courses", courses.len());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, error};

use super::{
    CourseStore, FieldViolation, Store, StoreError, StoreResult, UserStore,
    DUPLICATE_EMAIL_MESSAGE,
};
use crate::db::pool;
use crate::models::course::{Course, CourseChanges, CourseDetail, NewCourse};
use crate::models::user::{NewUser, User};

/// Store backed by a sqlx connection pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for migrations and shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps driver errors onto the closed [`StoreError`] set
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let on_email = db_err
            .constraint()
            .map(|c| c.contains("email"))
            .unwrap_or(false);

        if db_err.is_unique_violation() && on_email {
            return StoreError::UniqueViolation(vec![FieldViolation::new(
                "emailAddress",
                DUPLICATE_EMAIL_MESSAGE,
            )]);
        }
    }

    error!(error = %err, "Database operation failed");
    StoreError::Backend(err.to_string())
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let data = user.into_create_user()?;
        let user = User::create(&self.pool, data)
            .await
            .map_err(map_sqlx_error)?;

        debug!(user_id = user.id, "User created");
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        User::find_by_id(&self.pool, id).await.map_err(map_sqlx_error)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        User::find_by_email(&self.pool, email)
            .await
            .map_err(map_sqlx_error)
    }
}

#[async_trait]
impl CourseStore for PgStore {
    async fn list_courses(&self) -> StoreResult<Vec<CourseDetail>> {
        CourseDetail::list(&self.pool).await.map_err(map_sqlx_error)
    }

    async fn find_course(&self, id: i64) -> StoreResult<Option<Course>> {
        Course::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_course_detail(&self, id: i64) -> StoreResult<Option<CourseDetail>> {
        CourseDetail::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn create_course(&self, owner_id: i64, course: NewCourse) -> StoreResult<Course> {
        let fields = course.into_fields()?;
        let course = Course::create(&self.pool, owner_id, fields)
            .await
            .map_err(map_sqlx_error)?;

        debug!(course_id = course.id, owner_id, "Course created");
        Ok(course)
    }

    async fn update_course(
        &self,
        course: &Course,
        changes: CourseChanges,
    ) -> StoreResult<Option<Course>> {
        let fields = course.merge(changes).into_fields()?;

        Course::update(&self.pool, course.id, fields)
            .await
            .map_err(map_sqlx_error)
    }

    async fn delete_course(&self, id: i64) -> StoreResult<bool> {
        Course::delete(&self.pool, id).await.map_err(map_sqlx_error)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        pool::health_check(&self.pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}
