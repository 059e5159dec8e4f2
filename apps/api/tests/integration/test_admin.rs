use super::helpers::{
    PUBLIC_BASE, admin_request, expect_status, get, read_json, read_text, send, spawn_app,
};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{Duration, Utc};
use serde_json::Value;

#[tokio::test]
async fn page_navigation_gets_basic_challenge() {
    let app = spawn_app();
    let req = Request::builder()
        .uri("/admin")
        .header(header::ACCEPT, "text/html,application/xhtml+xml")
        .body(Body::empty())
        .unwrap();

    let res = send(&app.app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        res.headers().get(header::WWW_AUTHENTICATE).unwrap(),
        r#"Basic realm="Budstagram Admin""#
    );
    assert_eq!(read_text(res).await, "Unauthorized");
}

#[tokio::test]
async fn scripted_requests_get_json_without_challenge() {
    let app = spawn_app();
    let req = Request::builder()
        .method("DELETE")
        .uri(format!("/api/posts/{}", uuid::Uuid::now_v7()))
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap();

    let res = send(&app.app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get(header::WWW_AUTHENTICATE).is_none());
    let body: Value = read_json(res).await;
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = spawn_app();
    let req = Request::builder()
        .uri("/admin")
        .header(
            header::AUTHORIZATION,
            format!("Basic {}", STANDARD.encode("chisp:guess")),
        )
        .body(Body::empty())
        .unwrap();

    let res = send(&app.app, req).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_page_lists_drafts_too() {
    let app = spawn_app();
    app.seed("public bud", Utc::now() - Duration::minutes(1), true);
    app.seed("draft bud", Utc::now(), false);

    let res = send(&app.app, admin_request("GET", "/admin", Body::empty())).await;
    let html = read_text(expect_status(res, StatusCode::OK).await).await;
    assert!(html.contains("public bud"));
    assert!(html.contains("draft bud"));
    assert!(html.contains("/assets/admin.js"));
}

#[tokio::test]
async fn delete_removes_post_object_and_feed_entry() {
    let app = spawn_app();
    let post = app.seed("short lived", Utc::now(), true);
    let key = post
        .image_url
        .strip_prefix(&format!("{}/", PUBLIC_BASE))
        .unwrap()
        .to_string();

    let feed: Value = read_json(send(&app.app, get("/api/posts")).await).await;
    assert_eq!(feed["items"].as_array().unwrap().len(), 1);

    let uri = format!("/api/posts/{}", post.id);
    let res = send(&app.app, admin_request("DELETE", &uri, Body::empty())).await;
    let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(body["success"], true);

    assert!(app.store.post(post.id).is_none());
    assert_eq!(*app.storage.deleted.lock().unwrap(), vec![key]);

    let feed: Value = read_json(send(&app.app, get("/api/posts")).await).await;
    assert!(feed["items"].as_array().unwrap().is_empty());

    let res = send(&app.app, admin_request("DELETE", &uri, Body::empty())).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn legacy_query_delete() {
    let app = spawn_app();
    let post = app.seed("legacy", Utc::now(), true);

    let res = send(&app.app, admin_request("DELETE", "/api/posts", Body::empty())).await;
    let body: Value = read_json(expect_status(res, StatusCode::BAD_REQUEST).await).await;
    assert_eq!(body["error"], "Missing id");

    let uri = format!("/api/posts?id={}", post.id);
    let res = send(&app.app, admin_request("DELETE", &uri, Body::empty())).await;
    expect_status(res, StatusCode::OK).await;
    assert!(app.store.post(post.id).is_none());
}

#[tokio::test]
async fn create_from_url_validates_fields() {
    let app = spawn_app();

    let res = send(
        &app.app,
        admin_request("POST", "/api/posts", Body::from(r#"{"caption":"no image"}"#)),
    )
    .await;
    let body: Value = read_json(expect_status(res, StatusCode::BAD_REQUEST).await).await;
    assert_eq!(body["error"], "Missing fields");

    let res = send(&app.app, admin_request("POST", "/api/posts", Body::from("not json"))).await;
    let body: Value = read_json(expect_status(res, StatusCode::BAD_REQUEST).await).await;
    assert_eq!(body["error"], "Missing fields");

    let res = send(
        &app.app,
        admin_request(
            "POST",
            "/api/posts",
            Body::from(r#"{"caption":"x","imageUrl":"ftp://host/a.jpg"}"#),
        ),
    )
    .await;
    expect_status(res, StatusCode::BAD_REQUEST).await;

    let res = send(
        &app.app,
        admin_request(
            "POST",
            "/api/posts",
            Body::from(r#"{"caption":"Hosted bud","imageUrl":"https://img.example.org/bud.jpg"}"#),
        ),
    )
    .await;
    let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["post"]["imageUrl"], "https://img.example.org/bud.jpg");
    assert_eq!(body["post"]["author"], "The Chisp");
}

#[tokio::test]
async fn revalidate_path_creates_hosted_posts() {
    let app = spawn_app();

    let res = send(
        &app.app,
        admin_request(
            "POST",
            "/api/revalidate",
            Body::from(r#"{"caption":"Legacy client","imageUrl":"https://img.example.org/l.jpg"}"#),
        ),
    )
    .await;
    let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["post"]["caption"], "Legacy client");

    let feed: Value = read_json(send(&app.app, get("/api/posts")).await).await;
    assert_eq!(feed["items"].as_array().unwrap().len(), 1);

    let req = Request::builder()
        .method("POST")
        .uri("/api/revalidate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"caption":"x","imageUrl":"https://img.example.org/x.jpg"}"#))
        .unwrap();
    assert_eq!(send(&app.app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deleting_a_foreign_hosted_post_leaves_storage_alone() {
    let app = spawn_app();
    let res = send(
        &app.app,
        admin_request(
            "POST",
            "/api/posts",
            Body::from(r#"{"caption":"Hosted","imageUrl":"https://img.example.org/bud.jpg"}"#),
        ),
    )
    .await;
    let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    let id = body["post"]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/posts/{}", id);
    expect_status(
        send(&app.app, admin_request("DELETE", &uri, Body::empty())).await,
        StatusCode::OK,
    )
    .await;
    assert!(app.storage.deleted.lock().unwrap().is_empty());
}
