/// Integration tests for the course endpoints

mod common;

use axum::http::{header, Method, StatusCode};
use common::{
    assert_no_private_fields, basic_auth, json_request, raw_json_request, request, TestContext,
    JOE_EMAIL,
};
use coursehub_shared::store::CourseStore;
use serde_json::json;

#[tokio::test]
async fn test_list_courses_includes_owner() {
    let ctx = TestContext::new().await;

    let res = ctx.send(request(Method::GET, "/api/courses", None)).await;

    assert_eq!(res.status, StatusCode::OK);
    let courses = res.body.as_array().expect("Expected an array");
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0]["title"], "Build a Basic Bookcase");
    assert_eq!(courses[0]["userId"], ctx.joe.id);
    assert_eq!(courses[0]["userInfo"]["emailAddress"], JOE_EMAIL);
    assert_no_private_fields(&res.body);
}

#[tokio::test]
async fn test_get_course() {
    let ctx = TestContext::new().await;
    let uri = format!("/api/courses/{}", ctx.joe_course.id);

    let res = ctx.send(request(Method::GET, &uri, None)).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["id"], ctx.joe_course.id);
    assert_eq!(res.body["estimatedTime"], "12 hours");
    assert_eq!(res.body["userInfo"]["firstName"], "Joe");
    assert_no_private_fields(&res.body);
}

#[tokio::test]
async fn test_get_missing_course_is_not_found() {
    let ctx = TestContext::new().await;

    let res = ctx.send(request(Method::GET, "/api/courses/999", None)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(
        res.body,
        json!({"error": "not_found", "message": "Course 999 does not exist"})
    );

    let res = ctx.send(request(Method::GET, "/api/courses/abc", None)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_requires_auth() {
    let ctx = TestContext::new().await;
    let body = json!({"title": "A", "description": "B"});

    let res = ctx
        .send(json_request(Method::POST, "/api/courses", None, &body))
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body, json!({"error": "unauthorized", "message": "Access denied"}));
    assert_eq!(
        res.headers.get(header::WWW_AUTHENTICATE).unwrap(),
        r#"Basic realm="coursehub""#
    );
    assert_eq!(ctx.store.list_courses().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_then_fetch_location() {
    let ctx = TestContext::new().await;
    let auth = ctx.sally_auth();
    let body = json!({"title": "A", "description": "B", "userId": ctx.joe.id});

    let res = ctx
        .send(json_request(Method::POST, "/api/courses", Some(&auth), &body))
        .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert!(res.body.is_null(), "Create should return an empty body");
    let location = res.location().expect("Missing Location header").to_string();
    assert!(location.starts_with("/api/courses/"));

    let res = ctx.send(request(Method::GET, &location, None)).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["title"], "A");
    assert_eq!(res.body["userId"], ctx.sally.id, "Owner must be the creator");
    assert_eq!(res.body["userInfo"]["id"], ctx.sally.id);
}

#[tokio::test]
async fn test_create_validation_errors() {
    let ctx = TestContext::new().await;
    let auth = ctx.joe_auth();

    let res = ctx
        .send(json_request(
            Method::POST,
            "/api/courses",
            Some(&auth),
            &json!({"description": ""}),
        ))
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body,
        json!({"errors": ["A title is required", "Please provide a description"]})
    );
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new().await;
    let auth = ctx.joe_auth();

    let res = ctx
        .send(raw_json_request(Method::POST, "/api/courses", Some(&auth), "{\"title\":"))
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    let errors = res.body["errors"].as_array().expect("Expected errors array");
    assert_eq!(errors.len(), 1);
}

#[tokio::test]
async fn test_owner_can_update() {
    let ctx = TestContext::new().await;
    let uri = format!("/api/courses/{}", ctx.joe_course.id);
    let auth = ctx.joe_auth();

    let res = ctx
        .send(json_request(
            Method::PUT,
            &uri,
            Some(&auth),
            &json!({"title": "Build a Better Bookcase", "estimatedTime": null, "userId": ctx.sally.id}),
        ))
        .await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);
    assert!(res.body.is_null());

    let res = ctx.send(request(Method::GET, &uri, None)).await;
    assert_eq!(res.body["title"], "Build a Better Bookcase");
    assert_eq!(res.body["description"], "High-end furniture projects are great");
    assert!(res.body["estimatedTime"].is_null());
    assert_eq!(res.body["materialsNeeded"], "* 1/2 x 3/4 inch parting strip");
    assert_eq!(res.body["userId"], ctx.joe.id, "Owner cannot be reassigned");
}

#[tokio::test]
async fn test_non_owner_update_is_forbidden() {
    let ctx = TestContext::new().await;
    let uri = format!("/api/courses/{}", ctx.joe_course.id);
    let auth = ctx.sally_auth();

    let res = ctx
        .send(json_request(Method::PUT, &uri, Some(&auth), &json!({"title": "Hijacked"})))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.body["error"], "forbidden");

    let stored = ctx.store.find_course(ctx.joe_course.id).await.unwrap().unwrap();
    assert_eq!(stored, ctx.joe_course);
}

#[tokio::test]
async fn test_update_to_invalid_state_is_rejected() {
    let ctx = TestContext::new().await;
    let uri = format!("/api/courses/{}", ctx.joe_course.id);
    let auth = ctx.joe_auth();

    let res = ctx
        .send(json_request(
            Method::PUT,
            &uri,
            Some(&auth),
            &json!({"title": null, "description": ""}),
        ))
        .await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.body,
        json!({"errors": ["A title is required", "Please provide a description"]})
    );
    let stored = ctx.store.find_course(ctx.joe_course.id).await.unwrap().unwrap();
    assert_eq!(stored, ctx.joe_course);
}

#[tokio::test]
async fn test_update_missing_course_is_not_found() {
    let ctx = TestContext::new().await;
    let auth = ctx.joe_auth();

    let res = ctx
        .send(json_request(Method::PUT, "/api/courses/42", Some(&auth), &json!({"title": "X"})))
        .await;

    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["message"], "Course 42 does not exist");
}

#[tokio::test]
async fn test_delete_requires_owner() {
    let ctx = TestContext::new().await;
    let uri = format!("/api/courses/{}", ctx.joe_course.id);

    let res = ctx.send(request(Method::DELETE, &uri, None)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let sally = ctx.sally_auth();
    let res = ctx.send(request(Method::DELETE, &uri, Some(&sally))).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert!(ctx.store.find_course(ctx.joe_course.id).await.unwrap().is_some());

    let joe = ctx.joe_auth();
    let res = ctx.send(request(Method::DELETE, &uri, Some(&joe))).await;
    assert_eq!(res.status, StatusCode::NO_CONTENT);

    let res = ctx.send(request(Method::GET, &uri, None)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = ctx.send(request(Method::DELETE, &uri, Some(&joe))).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_wrong_password_cannot_mutate() {
    let ctx = TestContext::new().await;
    let uri = format!("/api/courses/{}", ctx.joe_course.id);
    let auth = basic_auth(JOE_EMAIL, "not-joes-password");

    let res = ctx.send(request(Method::DELETE, &uri, Some(&auth))).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(ctx.store.find_course(ctx.joe_course.id).await.unwrap().is_some());
}
