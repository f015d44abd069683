/// Middleware modules for the API server
///
/// - `security`: response headers for a JSON-only API

pub mod security;
