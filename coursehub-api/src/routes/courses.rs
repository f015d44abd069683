/// Course endpoints
///
/// ```text
/// GET    /api/courses        list with owners
/// GET    /api/courses/:id    one course with owner
/// POST   /api/courses        create (Basic auth), 201 + Location
/// PUT    /api/courses/:id    merge update (Basic auth, owner only), 204
/// DELETE /api/courses/:id    delete (Basic auth, owner only), 204
/// ```
///
/// Ids that are not integers are treated like ids that do not exist.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use coursehub_shared::{
    auth::{authorization::require_owner, middleware::AuthContext},
    models::course::{Course, CourseChanges, CourseDetail, NewCourse},
};
use std::fmt::Display;
use tracing::info;

fn course_not_found(id: impl Display) -> ApiError {
    ApiError::NotFound(format!("Course {} does not exist", id))
}

fn parse_course_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>().map_err(|_| course_not_found(raw))
}

/// Loads the course behind `raw_id` and checks the caller owns it
async fn owned_course(state: &AppState, auth: &AuthContext, raw_id: &str) -> ApiResult<Course> {
    let id = parse_course_id(raw_id)?;
    let course = state
        .store
        .find_course(id)
        .await?
        .ok_or_else(|| course_not_found(id))?;

    require_owner(auth, &course)?;
    Ok(course)
}

pub async fn list_courses(State(state): State<AppState>) -> ApiResult<Json<Vec<CourseDetail>>> {
    let courses = state.store.list_courses().await?;
    Ok(Json(courses))
}

pub async fn get_course(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<CourseDetail>> {
    let id = parse_course_id(&raw_id)?;

    let course = state
        .store
        .find_course_detail(id)
        .await?
        .ok_or_else(|| course_not_found(id))?;

    Ok(Json(course))
}

/// Creates a course owned by the authenticated user
///
/// A `userId` in the body is ignored.
pub async fn create_course(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<NewCourse>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(new_course) = payload?;

    let course = state
        .store
        .create_course(auth.user_id(), new_course)
        .await?;

    info!(course_id = course.id, owner_id = auth.user_id(), "Course created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/courses/{}", course.id))],
    ))
}

/// Applies a partial update; fields absent from the body keep their values
pub async fn update_course(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(raw_id): Path<String>,
    payload: Result<Json<CourseChanges>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let course = owned_course(&state, &auth, &raw_id).await?;
    let Json(changes) = payload?;

    state
        .store
        .update_course(&course, changes)
        .await?
        .ok_or_else(|| course_not_found(course.id))?;

    info!(course_id = course.id, owner_id = auth.user_id(), "Course updated");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_course(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    let course = owned_course(&state, &auth, &raw_id).await?;

    if !state.store.delete_course(course.id).await? {
        return Err(course_not_found(course.id));
    }

    info!(course_id = course.id, owner_id = auth.user_id(), "Course deleted");
    Ok(StatusCode::NO_CONTENT)
}
