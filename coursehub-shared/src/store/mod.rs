/// Data store for users and courses
///
/// Handlers never talk to a database directly. They receive an
/// `Arc<dyn Store>` and call the operations defined by [`UserStore`] and
/// [`CourseStore`]. Every write validates its input first, so a caller gets
/// either the stored record or a [`StoreError`] describing exactly which
/// constraints were violated.
///
/// # Implementations
///
/// - [`postgres::PgStore`]: PostgreSQL via sqlx (production)
/// - [`memory::MemoryStore`]: in-process maps (tests, local runs)
///
/// # Example
///
/// ```
/// use coursehub_shared::models::user::NewUser;
/// use coursehub_shared::store::{memory::MemoryStore, StoreError, UserStore};
///
/// # async fn example() -> Result<(), StoreError> {
/// let store = MemoryStore::new();
///
/// let result = store.create_user(NewUser::default()).await;
/// match result {
///     Err(StoreError::Validation(violations)) => assert_eq!(violations.len(), 4),
///     other => panic!("unexpected: {:?}", other),
/// }
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;
pub mod validation;

use async_trait::async_trait;
use serde::Serialize;

use crate::models::course::{Course, CourseChanges, CourseDetail, NewCourse};
use crate::models::user::{NewUser, User};

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// A single violated constraint on a single field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Field name as it appears in request bodies (camelCase)
    pub field: String,

    /// Human-readable message
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors produced by store operations
///
/// The set is closed: callers match on the variant to decide the HTTP status,
/// never on error text.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Input failed one or more field constraints
    #[error("Validation failed: {} violation(s)", .0.len())]
    Validation(Vec<FieldViolation>),

    /// Input collides with a unique constraint (e.g. email address)
    #[error("Unique constraint violated: {} violation(s)", .0.len())]
    UniqueViolation(Vec<FieldViolation>),

    /// Anything else: connectivity, driver errors, hashing failures
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns the violated constraints for validation-type errors
    pub fn violations(&self) -> Option<&[FieldViolation]> {
        match self {
            StoreError::Validation(v) | StoreError::UniqueViolation(v) => Some(v),
            StoreError::Backend(_) => None,
        }
    }
}

/// Message returned when a registration reuses an existing email address
pub const DUPLICATE_EMAIL_MESSAGE: &str = "The email address you entered already exists";

/// User persistence operations
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Validates, hashes the password, and inserts a new user
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    /// Finds a user by id
    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>>;

    /// Finds a user by email address (case-insensitive)
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// Course persistence operations
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// All courses with their owners, ordered by id
    async fn list_courses(&self) -> StoreResult<Vec<CourseDetail>>;

    /// A single course without its owner
    async fn find_course(&self, id: i64) -> StoreResult<Option<Course>>;

    /// A single course joined with its owner
    async fn find_course_detail(&self, id: i64) -> StoreResult<Option<CourseDetail>>;

    /// Validates and inserts a course owned by `owner_id`
    async fn create_course(&self, owner_id: i64, course: NewCourse) -> StoreResult<Course>;

    /// Merges `changes` into `course`, validates the result, and stores it
    ///
    /// Returns `None` if the course disappeared in the meantime.
    async fn update_course(
        &self,
        course: &Course,
        changes: CourseChanges,
    ) -> StoreResult<Option<Course>>;

    /// Deletes a course, returning whether a row was removed
    async fn delete_course(&self, id: i64) -> StoreResult<bool>;
}

/// Complete data store used by the API
#[async_trait]
pub trait Store: UserStore + CourseStore {
    /// Verifies the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}
