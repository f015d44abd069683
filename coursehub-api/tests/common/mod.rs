//! Common test utilities for integration tests
//!
//! Every test gets a fresh router over its own `MemoryStore`, seeded with:
//! - Joe Smith (id 1), owner of one course
//! - Sally Jones (id 2), who owns nothing
//!
//! Requests are driven in-process with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use coursehub_api::app::{build_router, AppState};
use coursehub_api::config::Config;
use coursehub_shared::models::course::{Course, NewCourse};
use coursehub_shared::models::user::{NewUser, User};
use coursehub_shared::store::{memory::MemoryStore, CourseStore, UserStore};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const JOE_EMAIL: &str = "joe@smith.com";
pub const JOE_PASSWORD: &str = "joepassword";
pub const SALLY_EMAIL: &str = "sally@jones.com";
pub const SALLY_PASSWORD: &str = "sallypassword";

/// Test context containing the router and its seeded store
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub joe: User,
    pub sally: User,
    pub joe_course: Course,
}

/// Status, headers and parsed JSON body (`Null` when empty)
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

fn new_user(first: &str, last: &str, email: &str, password: &str) -> NewUser {
    NewUser {
        first_name: Some(first.to_string()),
        last_name: Some(last.to_string()),
        email_address: Some(email.to_string()),
        password: Some(password.to_string()),
    }
}

impl TestContext {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());

        let joe = store
            .create_user(new_user("Joe", "Smith", JOE_EMAIL, JOE_PASSWORD))
            .await
            .expect("Failed to seed Joe");
        let sally = store
            .create_user(new_user("Sally", "Jones", SALLY_EMAIL, SALLY_PASSWORD))
            .await
            .expect("Failed to seed Sally");

        let joe_course = store
            .create_course(
                joe.id,
                NewCourse {
                    title: Some("Build a Basic Bookcase".to_string()),
                    description: Some("High-end furniture projects are great".to_string()),
                    estimated_time: Some("12 hours".to_string()),
                    materials_needed: Some("* 1/2 x 3/4 inch parting strip".to_string()),
                },
            )
            .await
            .expect("Failed to seed course");

        let app = build_router(AppState::new(store.clone(), Config::in_memory()));

        TestContext {
            app,
            store,
            joe,
            sally,
            joe_course,
        }
    }

    /// Sends a request through a clone of the router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub fn joe_auth(&self) -> String {
        basic_auth(JOE_EMAIL, JOE_PASSWORD)
    }

    pub fn sally_auth(&self) -> String {
        basic_auth(SALLY_EMAIL, SALLY_PASSWORD)
    }
}

/// Builds an `Authorization` header value
pub fn basic_auth(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", email, password)))
}

/// Request without a body
pub fn request(method: Method, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::empty()).expect("Valid request")
}

/// Request with a JSON body
pub fn json_request(method: Method, uri: &str, auth: Option<&str>, body: &Value) -> Request<Body> {
    raw_json_request(method, uri, auth, body.to_string())
}

/// Request with an arbitrary body sent as JSON
pub fn raw_json_request(
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: impl Into<String>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    builder.body(Body::from(body.into())).expect("Valid request")
}

/// Asserts no object in `value` exposes private fields
pub fn assert_no_private_fields(value: &Value) {
    match value {
        Value::Object(map) => {
            for key in ["password", "createdAt", "updatedAt"] {
                assert!(!map.contains_key(key), "Response leaked {}: {}", key, value);
            }
            map.values().for_each(assert_no_private_fields);
        }
        Value::Array(items) => items.iter().for_each(assert_no_private_fields),
        _ => {}
    }
}
