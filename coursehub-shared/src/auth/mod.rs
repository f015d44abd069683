/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`basic`]: HTTP Basic `Authorization` header parsing
/// - [`middleware`]: resolving Basic credentials to a stored user
/// - [`authorization`]: course ownership checks
///
/// # Example
///
/// ```
/// use coursehub_shared::auth::basic::{encode_basic_credentials, parse_basic_credentials};
/// use coursehub_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let stored_hash = hash_password("joepassword")?;
///
/// let header = encode_basic_credentials("joe@smith.com", "joepassword");
/// let creds = parse_basic_credentials(&header)?;
/// assert!(verify_password(&creds.password, &stored_hash)?);
/// # Ok(())
/// # }
/// ```

pub mod authorization;
pub mod basic;
pub mod middleware;
pub mod password;
