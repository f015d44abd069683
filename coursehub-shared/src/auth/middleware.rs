/// Basic authentication for protected routes
///
/// [`authenticate`] resolves the `Authorization` header of a request to a
/// stored user. The API wires it into an axum middleware that inserts the
/// resulting [`AuthContext`] into request extensions, where handlers pick it
/// up with `Extension<AuthContext>`.
///
/// # Failure policy
///
/// Every failure short-circuits the request before the handler runs. Unknown
/// email and wrong password produce the same [`AuthError::InvalidCredentials`]
/// so that responses do not reveal whether an account exists.
///
/// # Example
///
/// ```no_run
/// use axum::http::HeaderMap;
/// use coursehub_shared::auth::middleware::authenticate;
/// use coursehub_shared::store::memory::MemoryStore;
///
/// # async fn example(headers: HeaderMap) -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let auth = authenticate(&store, &headers).await?;
/// println!("Authenticated user {}", auth.user_id());
/// # Ok(())
/// # }
/// ```

use axum::http::{header, HeaderMap};
use tracing::{debug, warn};

use super::basic::parse_basic_credentials;
use super::password;
use crate::models::user::UserProfile;
use crate::store::UserStore;

/// Authenticated user attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Public fields of the authenticated user
    pub user: UserProfile,
}

impl AuthContext {
    pub fn new(user: UserProfile) -> Self {
        Self { user }
    }

    /// Id of the authenticated user
    pub fn user_id(&self) -> i64 {
        self.user.id
    }
}

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No Authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Header present but not usable Basic credentials
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Store or hash failure while checking credentials
    #[error("Authentication backend error: {0}")]
    Internal(String),
}

/// Resolves the request's Basic credentials to a stored user
///
/// # Errors
///
/// - `MissingCredentials` when there is no `Authorization` header
/// - `InvalidFormat` when the header is not `Basic <base64(email:password)>`
/// - `InvalidCredentials` for an unknown email or a wrong password
/// - `Internal` when the store lookup or hash verification fails
pub async fn authenticate<S>(store: &S, headers: &HeaderMap) -> Result<AuthContext, AuthError>
where
    S: UserStore + ?Sized,
{
    let result = resolve(store, headers).await;

    match &result {
        Ok(auth) => debug!(user_id = auth.user_id(), "Request authenticated"),
        Err(AuthError::Internal(msg)) => warn!(error = %msg, "Authentication backend failure"),
        Err(e) => warn!(reason = %e, "Authentication rejected"),
    }

    result
}

async fn resolve<S>(store: &S, headers: &HeaderMap) -> Result<AuthContext, AuthError>
where
    S: UserStore + ?Sized,
{
    let raw = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat("header is not visible ASCII".to_string()))?;

    let credentials =
        parse_basic_credentials(raw).map_err(|e| AuthError::InvalidFormat(e.to_string()))?;

    let user = store
        .find_user_by_email(&credentials.email)
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .ok_or(AuthError::InvalidCredentials)?;

    let valid = password::verify_password(&credentials.password, &user.password)
        .map_err(|e| AuthError::Internal(e.to_string()))?;
    if !valid {
        return Err(AuthError::InvalidCredentials);
    }

    Ok(AuthContext::new(UserProfile::from(&user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::basic::encode_basic_credentials;
    use crate::models::user::NewUser;
    use crate::store::memory::MemoryStore;
    use axum::http::HeaderValue;

    async fn store_with_joe() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create_user(NewUser {
                first_name: Some("Joe".to_string()),
                last_name: Some("Smith".to_string()),
                email_address: Some("joe@smith.com".to_string()),
                password: Some("joepassword".to_string()),
            })
            .await
            .unwrap();
        store
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[tokio::test]
    async fn test_valid_credentials() {
        let store = store_with_joe().await;
        let headers = headers_with(&encode_basic_credentials("joe@smith.com", "joepassword"));

        let auth = authenticate(&store, &headers).await.unwrap();
        assert_eq!(auth.user.email_address, "joe@smith.com");
        assert_eq!(auth.user_id(), auth.user.id);
    }

    #[tokio::test]
    async fn test_email_match_is_case_insensitive() {
        let store = store_with_joe().await;
        let headers = headers_with(&encode_basic_credentials("Joe@Smith.COM", "joepassword"));

        assert!(authenticate(&store, &headers).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_header() {
        let store = store_with_joe().await;

        let err = authenticate(&store, &HeaderMap::new()).await.unwrap_err();
        assert!(matches!(err, AuthError::MissingCredentials));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let store = store_with_joe().await;

        let wrong_password = headers_with(&encode_basic_credentials("joe@smith.com", "nope"));
        let unknown_email = headers_with(&encode_basic_credentials("who@where.com", "nope"));

        let a = authenticate(&store, &wrong_password).await.unwrap_err();
        let b = authenticate(&store, &unknown_email).await.unwrap_err();
        assert!(matches!(a, AuthError::InvalidCredentials));
        assert!(matches!(b, AuthError::InvalidCredentials));
        assert_eq!(a.to_string(), b.to_string());
    }

    #[tokio::test]
    async fn test_bearer_token_is_invalid_format() {
        let store = store_with_joe().await;

        let err = authenticate(&store, &headers_with("Bearer abc"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidFormat(_)));
    }
}
