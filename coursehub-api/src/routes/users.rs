/// User endpoints
///
/// ```text
/// GET  /api/users    the authenticated user's profile (Basic auth)
/// POST /api/users    register, 201 + Location: /
/// ```

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use coursehub_shared::{
    auth::middleware::AuthContext,
    models::user::{NewUser, UserProfile},
};
use tracing::info;

/// Returns the user resolved by the Basic auth layer
pub async fn get_current_user(Extension(auth): Extension<AuthContext>) -> Json<UserProfile> {
    Json(auth.user)
}

/// Registers a new user
///
/// The store validates the body, rejects duplicate email addresses and
/// hashes the password before anything is written.
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(new_user) = payload?;

    let user = state.store.create_user(new_user).await?;
    info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, [(header::LOCATION, "/")]))
}
