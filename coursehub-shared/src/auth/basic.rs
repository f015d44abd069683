/// HTTP Basic credential parsing
///
/// Parses `Authorization: Basic <base64(email:password)>` (RFC 7617). The
/// scheme name is matched case-insensitively and the decoded value is split at
/// the first `:`, so passwords may themselves contain colons.
///
/// # Example
///
/// ```
/// use coursehub_shared::auth::basic::parse_basic_credentials;
///
/// // "joe@smith.com:joepassword"
/// let creds = parse_basic_credentials("Basic am9lQHNtaXRoLmNvbTpqb2VwYXNzd29yZA==").unwrap();
/// assert_eq!(creds.email, "joe@smith.com");
/// assert_eq!(creds.password, "joepassword");
/// ```

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Credentials carried by a Basic authorization header
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    /// User name part; CourseHub uses the email address
    pub email: String,

    /// Plaintext password as supplied by the client
    pub password: String,
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Reasons a header value is not usable Basic credentials
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BasicParseError {
    #[error("Expected Basic authorization scheme")]
    WrongScheme,

    #[error("Credentials are not valid base64")]
    InvalidEncoding,

    #[error("Credentials are not valid UTF-8")]
    InvalidUtf8,

    #[error("Credentials must be in user:password form")]
    MissingSeparator,
}

/// Parses a raw `Authorization` header value
///
/// # Errors
///
/// See [`BasicParseError`] for the failure cases.
pub fn parse_basic_credentials(header: &str) -> Result<BasicCredentials, BasicParseError> {
    let (scheme, encoded) = header
        .trim()
        .split_once(' ')
        .ok_or(BasicParseError::WrongScheme)?;

    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(BasicParseError::WrongScheme);
    }

    let decoded = STANDARD
        .decode(encoded.trim())
        .map_err(|_| BasicParseError::InvalidEncoding)?;
    let decoded = String::from_utf8(decoded).map_err(|_| BasicParseError::InvalidUtf8)?;

    let (email, password) = decoded
        .split_once(':')
        .ok_or(BasicParseError::MissingSeparator)?;

    Ok(BasicCredentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Builds a Basic header value; the inverse of [`parse_basic_credentials`]
pub fn encode_basic_credentials(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", email, password)))
}
