/// Database models for CourseHub
///
/// # Models
///
/// - `user`: registered users and their public profile
/// - `course`: courses, each owned by the user who created it
///
/// Each model keeps its SQL next to its type (`User::create`,
/// `Course::find_by_id`, ...). Handlers do not call these directly; they go
/// through the [`crate::store`] traits, which add validation and error
/// classification on top.

pub mod course;
pub mod user;
