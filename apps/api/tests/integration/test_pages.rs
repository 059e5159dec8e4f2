use super::helpers::{expect_status, get, read_json, read_text, send, spawn_app};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::Utc;
use serde_json::Value;

#[tokio::test]
async fn health_reports_database_up() {
    let app = spawn_app();
    let res = send(&app.app, get("/health")).await;
    let body: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn responses_echo_a_request_id() {
    let app = spawn_app();
    let req = Request::builder()
        .uri("/health")
        .header("x-request-id", "trace-me-123")
        .body(Body::empty())
        .unwrap();
    let res = send(&app.app, req).await;
    assert_eq!(res.headers().get("x-request-id").unwrap(), "trace-me-123");

    let res = send(&app.app, get("/health")).await;
    assert!(res.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn feed_page_renders_published_posts() {
    let app = spawn_app();
    app.seed("Porch <nap> & sun", Utc::now(), true);
    app.seed("secret draft", Utc::now(), false);

    let res = send(&app.app, get("/")).await;
    let res = expect_status(res, StatusCode::OK).await;
    assert!(
        res.headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let html = read_text(res).await;
    assert!(html.contains("Porch &lt;nap&gt; &amp; sun"));
    assert!(!html.contains("secret draft"));
    assert!(html.contains("/assets/feed.js"));
}

#[tokio::test]
async fn post_page_carries_link_preview_tags() {
    let app = spawn_app();
    let caption = format!("Bud on the windowsill {}", "zz ".repeat(100));
    let post = app.seed(&caption, Utc::now(), true);

    let req = Request::builder()
        .uri(format!("/p/{}", post.id))
        .header(header::HOST, "bud.example.com")
        .body(Body::empty())
        .unwrap();
    let res = send(&app.app, req).await;
    let html = read_text(expect_status(res, StatusCode::OK).await).await;

    assert!(html.contains(&format!(
        r#"<meta property="og:image" content="{}">"#,
        post.image_url
    )));
    assert!(html.contains(r#"<meta name="twitter:card" content="summary_large_image">"#));
    let truncated: String = caption.chars().take(180).collect();
    assert!(html.contains(&format!(
        r#"<meta name="description" content="{}">"#,
        truncated
    )));
    assert!(html.contains(&format!("https://bud.example.com/p/{}", post.id)));
}

#[tokio::test]
async fn unknown_post_page_is_a_404_page() {
    let app = spawn_app();
    let res = send(&app.app, get("/p/no-such-bud")).await;
    let res = expect_status(res, StatusCode::NOT_FOUND).await;
    let html = read_text(res).await;
    assert!(html.contains("<html"));
}

#[tokio::test]
async fn manifest_and_assets_are_served() {
    let app = spawn_app();

    let res = send(&app.app, get("/manifest.webmanifest")).await;
    let res = expect_status(res, StatusCode::OK).await;
    assert_eq!(
        res.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/manifest+json"
    );
    let manifest: Value = read_json(res).await;
    assert_eq!(manifest["name"], "Budstagram");
    assert_eq!(manifest["start_url"], "/");

    for (name, content_type) in [
        ("feed.js", "text/javascript"),
        ("admin.js", "text/javascript"),
        ("app.css", "text/css"),
        ("icon.svg", "image/svg+xml"),
    ] {
        let res = send(&app.app, get(&format!("/assets/{}", name))).await;
        let res = expect_status(res, StatusCode::OK).await;
        assert!(
            res.headers()
                .get(header::CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with(content_type)
        );
    }

    let res = send(&app.app, get("/assets/secrets.env")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
