/// Integration tests for the user endpoints and authentication

mod common;

use axum::http::{header, Method, StatusCode};
use common::{
    assert_no_private_fields, basic_auth, json_request, request, TestContext, JOE_EMAIL,
    JOE_PASSWORD,
};
use coursehub_shared::store::UserStore;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;

    let res = ctx.send(request(Method::GET, "/health", None)).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "healthy");
    assert_eq!(res.body["database"], "connected");
}

#[tokio::test]
async fn test_current_user() {
    let ctx = TestContext::new().await;
    let auth = ctx.joe_auth();

    let res = ctx.send(request(Method::GET, "/api/users", Some(&auth))).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.body,
        json!({
            "id": ctx.joe.id,
            "firstName": "Joe",
            "lastName": "Smith",
            "emailAddress": JOE_EMAIL
        })
    );
    assert_no_private_fields(&res.body);
}

#[tokio::test]
async fn test_current_user_requires_auth() {
    let ctx = TestContext::new().await;

    let res = ctx.send(request(Method::GET, "/api/users", None)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(res.headers.contains_key(header::WWW_AUTHENTICATE));

    let res = ctx
        .send(request(Method::GET, "/api/users", Some("Bearer some.jwt.token")))
        .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_look_the_same() {
    let ctx = TestContext::new().await;
    let wrong_password = basic_auth(JOE_EMAIL, "guess");
    let unknown_email = basic_auth("nobody@example.com", JOE_PASSWORD);

    let a = ctx
        .send(request(Method::GET, "/api/users", Some(&wrong_password)))
        .await;
    let b = ctx
        .send(request(Method::GET, "/api/users", Some(&unknown_email)))
        .await;

    assert_eq!(a.status, StatusCode::UNAUTHORIZED);
    assert_eq!(b.status, StatusCode::UNAUTHORIZED);
    assert_eq!(a.body, b.body);
}

#[tokio::test]
async fn test_register_then_authenticate() {
    let ctx = TestContext::new().await;
    let body = json!({
        "firstName": "Ann",
        "lastName": "Lee",
        "emailAddress": "ann@lee.com",
        "password": "annpassword"
    });

    let res = ctx
        .send(json_request(Method::POST, "/api/users", None, &body))
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.location(), Some("/"));
    assert!(res.body.is_null());

    let stored = ctx
        .store
        .find_user_by_email("ann@lee.com")
        .await
        .unwrap()
        .expect("User should be stored");
    assert_ne!(stored.password, "annpassword", "Password must be hashed");

    let auth = basic_auth("ann@lee.com", "annpassword");
    let res = ctx.send(request(Method::GET, "/api/users", Some(&auth))).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["id"], stored.id);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let ctx = TestContext::new().await;
    let body = json!({
        "firstName": "Impostor",
        "lastName": "Smith",
        "emailAddress": "JOE@smith.com",
        "password": "other"
    });

    let res = ctx
        .send(json_request(Method::POST, "/api/users", None, &body))
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body,
        json!({"errors": ["The email address you entered already exists"]})
    );

    let stored = ctx.store.find_user_by_email(JOE_EMAIL).await.unwrap().unwrap();
    assert_eq!(stored.id, ctx.joe.id);
    assert_eq!(stored.first_name, "Joe");
    assert_eq!(stored.password, ctx.joe.password);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let ctx = TestContext::new().await;

    let res = ctx
        .send(json_request(Method::POST, "/api/users", None, &json!({})))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body,
        json!({"errors": [
            "A first name is required",
            "A last name is required",
            "An email address is required",
            "A password is required"
        ]})
    );

    let res = ctx
        .send(json_request(
            Method::POST,
            "/api/users",
            None,
            &json!({
                "firstName": "",
                "lastName": "Lee",
                "emailAddress": "not-an-email",
                "password": "pw"
            }),
        ))
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body,
        json!({"errors": ["Please provide a first name", "Please provide a valid email address"]})
    );
}
