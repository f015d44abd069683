/// In-process store backed by ordered maps
///
/// Enforces the same rules as the PostgreSQL store: field validation,
/// case-insensitive email uniqueness, and the course → user foreign key.
/// Ids are assigned sequentially from 1, like `BIGSERIAL`.
///
/// All tables sit behind one `RwLock` so joined reads see a consistent
/// snapshot.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    CourseStore, FieldViolation, Store, StoreError, StoreResult, UserStore,
    DUPLICATE_EMAIL_MESSAGE,
};
use crate::models::course::{Course, CourseChanges, CourseDetail, NewCourse};
use crate::models::user::{NewUser, User, UserProfile};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    courses: BTreeMap<i64, Course>,
    last_user_id: i64,
    last_course_id: i64,
}

impl Tables {
    /// Case folding covers non-ASCII letters, as CITEXT does
    fn user_by_email(&self, email: &str) -> Option<&User> {
        let folded = email.to_lowercase();
        self.users
            .values()
            .find(|u| u.email_address.to_lowercase() == folded)
    }

    fn detail(&self, course: &Course) -> Option<CourseDetail> {
        let owner = self.users.get(&course.user_id)?;
        Some(CourseDetail::new(course.clone(), UserProfile::from(owner)))
    }
}

/// Store that keeps everything in memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let data = user.into_create_user()?;

        let mut tables = self.tables.write().await;
        if tables.user_by_email(&data.email_address).is_some() {
            return Err(StoreError::UniqueViolation(vec![FieldViolation::new(
                "emailAddress",
                DUPLICATE_EMAIL_MESSAGE,
            )]));
        }

        tables.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: tables.last_user_id,
            first_name: data.first_name,
            last_name: data.last_name,
            email_address: data.email_address,
            password: data.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());

        debug!(user_id = user.id, "User created");
        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.user_by_email(email).cloned())
    }
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn list_courses(&self) -> StoreResult<Vec<CourseDetail>> {
        let tables = self.tables.read().await;
        Ok(tables
            .courses
            .values()
            .filter_map(|course| tables.detail(course))
            .collect())
    }

    async fn find_course(&self, id: i64) -> StoreResult<Option<Course>> {
        Ok(self.tables.read().await.courses.get(&id).cloned())
    }

    async fn find_course_detail(&self, id: i64) -> StoreResult<Option<CourseDetail>> {
        let tables = self.tables.read().await;
        Ok(tables.courses.get(&id).and_then(|course| tables.detail(course)))
    }

    async fn create_course(&self, owner_id: i64, course: NewCourse) -> StoreResult<Course> {
        let fields = course.into_fields()?;

        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&owner_id) {
            return Err(StoreError::Backend(format!(
                "course owner {} does not exist",
                owner_id
            )));
        }

        tables.last_course_id += 1;
        let now = Utc::now();
        let course = Course {
            id: tables.last_course_id,
            title: fields.title,
            description: fields.description,
            estimated_time: fields.estimated_time,
            materials_needed: fields.materials_needed,
            user_id: owner_id,
            created_at: now,
            updated_at: now,
        };
        tables.courses.insert(course.id, course.clone());

        debug!(course_id = course.id, owner_id, "Course created");
        Ok(course)
    }

    async fn update_course(
        &self,
        course: &Course,
        changes: CourseChanges,
    ) -> StoreResult<Option<Course>> {
        let fields = course.merge(changes).into_fields()?;

        let mut tables = self.tables.write().await;
        let Some(stored) = tables.courses.get_mut(&course.id) else {
            return Ok(None);
        };

        stored.title = fields.title;
        stored.description = fields.description;
        stored.estimated_time = fields.estimated_time;
        stored.materials_needed = fields.materials_needed;
        stored.updated_at = Utc::now();

        Ok(Some(stored.clone()))
    }

    async fn delete_course(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.courses.remove(&id).is_some())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
