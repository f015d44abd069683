//! # CourseHub Shared Library
//!
//! Domain types and persistence for the CourseHub API.
//!
//! ## Module Organization
//!
//! - `models`: users and courses, with their SQL
//! - `store`: the `Store` trait and its PostgreSQL / in-memory backends
//! - `auth`: password hashing, Basic credentials, ownership checks
//! - `db`: connection pool and migrations

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the CourseHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
