/// API route handlers
///
/// - `health`: Health check endpoint
/// - `courses`: Course listing, lookup and owner-only mutation
/// - `users`: Registration and the current user's profile

pub mod courses;
pub mod health;
pub mod users;
