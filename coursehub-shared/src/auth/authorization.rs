/// Ownership checks for courses
///
/// The only authorization rule in CourseHub: a course can be changed or
/// deleted by the user whose id is stored in `course.user_id`, and nobody
/// else.
///
/// # Example
///
/// ```no_run
/// use coursehub_shared::auth::authorization::require_owner;
/// use coursehub_shared::auth::middleware::AuthContext;
/// use coursehub_shared::models::course::Course;
///
/// fn check(auth: &AuthContext, course: &Course) -> Result<(), Box<dyn std::error::Error>> {
///     require_owner(auth, course)?;
///     Ok(())
/// }
/// ```

use super::middleware::AuthContext;
use crate::models::course::Course;

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Acting user does not own the course
    #[error("User {user_id} does not own course {course_id}")]
    NotOwner { user_id: i64, course_id: i64 },
}

/// Returns true if `user_id` owns `course`
pub fn is_owner(user_id: i64, course: &Course) -> bool {
    course.user_id == user_id
}

/// Fails with `AuthzError::NotOwner` unless the authenticated user owns `course`
pub fn require_owner(auth: &AuthContext, course: &Course) -> Result<(), AuthzError> {
    if is_owner(auth.user_id(), course) {
        return Ok(());
    }

    Err(AuthzError::NotOwner {
        user_id: auth.user_id(),
        course_id: course.id,
    })
}
