use super::helpers::{admin_request, expect_status, get, read_json, send, spawn_app};
use axum::{
    body::Body,
    http::{StatusCode, header},
};
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;
use std::collections::HashSet;

fn page_uri(cursor: Option<&str>, all: bool) -> String {
    let mut uri = "/api/posts?".to_string();
    if let Some(cursor) = cursor {
        uri.push_str(&format!("cursor={}&", cursor.replace('|', "%7C")));
    }
    if all {
        uri.push_str("all=1");
    }
    uri
}

#[tokio::test]
async fn walking_the_feed_yields_every_post_once_newest_first() {
    let app = spawn_app();
    let base = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();

    // Several posts share a timestamp so pages split inside a tie.
    let mut expected = HashSet::new();
    for i in 0..23 {
        let created_at = base + Duration::minutes(i / 4);
        let post = app.seed(&format!("bud #{i}"), created_at, true);
        expected.insert(post.id.to_string());
    }
    app.seed("draft", base + Duration::hours(2), false);

    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0;
    loop {
        let res = send(&app.app, get(&page_uri(cursor.as_deref(), false))).await;
        let page: Value = read_json(expect_status(res, StatusCode::OK).await).await;
        let items = page["items"].as_array().expect("items array");
        assert!(items.len() <= 10);
        for item in items {
            seen.push((
                item["createdAt"].as_str().unwrap().to_string(),
                item["id"].as_str().unwrap().to_string(),
            ));
        }
        pages += 1;
        match page["nextCursor"].as_str() {
            Some(next) => cursor = Some(next.to_string()),
            None => break,
        }
    }

    assert_eq!(pages, 3);
    assert_eq!(seen.len(), 23);
    let ids: HashSet<String> = seen.iter().map(|(_, id)| id.clone()).collect();
    assert_eq!(ids, expected);

    let times: Vec<_> = seen
        .iter()
        .map(|(ts, _)| chrono::DateTime::parse_from_rfc3339(ts).unwrap())
        .collect();
    assert!(times.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn exactly_full_final_page_ends_with_an_empty_page() {
    let app = spawn_app();
    let base = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
    for i in 0..10 {
        app.seed("bud", base + Duration::seconds(i), true);
    }

    let first: Value = read_json(send(&app.app, get("/api/posts")).await).await;
    assert_eq!(first["items"].as_array().unwrap().len(), 10);
    let cursor = first["nextCursor"].as_str().expect("full page carries a cursor");

    let res = send(&app.app, get(&page_uri(Some(cursor), false))).await;
    let second: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert!(second["items"].as_array().unwrap().is_empty());
    assert!(second["nextCursor"].is_null());
}

#[tokio::test]
async fn bare_timestamp_cursor_is_still_accepted() {
    let app = spawn_app();
    let base = Utc.with_ymd_and_hms(2025, 5, 1, 9, 0, 0).unwrap();
    app.seed("older", base, true);
    app.seed("newer", base + Duration::hours(1), true);

    let uri = page_uri(Some("2025-05-01T09:30:00.000Z"), false);
    let page: Value = read_json(send(&app.app, get(&uri)).await).await;
    let items = page["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["caption"], "older");
}

#[tokio::test]
async fn malformed_cursor_is_a_bad_request() {
    let app = spawn_app();
    let res = send(&app.app, get("/api/posts?cursor=yesterday")).await;
    let res = expect_status(res, StatusCode::BAD_REQUEST).await;
    let body: Value = read_json(res).await;
    assert!(body["error"].as_str().unwrap().contains("Invalid cursor"));
}

#[tokio::test]
async fn feed_items_carry_display_defaults() {
    let app = spawn_app();
    app.seed("porch nap", Utc::now(), true);

    let page: Value = read_json(send(&app.app, get("/api/posts")).await).await;
    let item = &page["items"][0];
    assert_eq!(item["author"], "The Chisp");
    assert_eq!(item["verified"], true);
    assert_eq!(item["likes"], 0);
}

#[tokio::test]
async fn unpublished_listing_requires_admin_without_challenge() {
    let app = spawn_app();
    app.seed("live", Utc::now() - Duration::minutes(1), true);
    app.seed("hidden", Utc::now(), false);

    let res = send(&app.app, get("/api/posts?all=1")).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get(header::WWW_AUTHENTICATE).is_none());

    let res = send(&app.app, admin_request("GET", "/api/posts?all=1", Body::empty())).await;
    let page: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    let captions: Vec<_> = page["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["caption"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(captions, vec!["hidden", "live"]);

    let public: Value = read_json(send(&app.app, get("/api/posts")).await).await;
    assert_eq!(public["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn first_page_is_served_from_cache_until_invalidated() {
    let app = spawn_app();
    let base = Utc::now() - Duration::hours(1);
    app.seed("first", base, true);

    let page: Value = read_json(send(&app.app, get("/api/posts")).await).await;
    assert_eq!(page["items"].as_array().unwrap().len(), 1);

    // Written behind the API's back, so only a cache miss would reveal it.
    app.seed("sneaky", base + Duration::minutes(1), true);
    let cached: Value = read_json(send(&app.app, get("/api/posts")).await).await;
    assert_eq!(cached["items"].as_array().unwrap().len(), 1);

    let created = admin_request(
        "POST",
        "/api/posts",
        Body::from(r#"{"caption":"hosted","imageUrl":"https://img.example.org/a.jpg"}"#),
    );
    expect_status(send(&app.app, created).await, StatusCode::OK).await;
    assert_eq!(app.cache.generation_now(), 1);

    let fresh: Value = read_json(send(&app.app, get("/api/posts")).await).await;
    assert_eq!(fresh["items"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn single_post_lookup() {
    let app = spawn_app();
    let post = app.seed("just one", Utc::now(), true);

    let res = send(&app.app, get(&format!("/api/posts/{}", post.id))).await;
    let item: Value = read_json(expect_status(res, StatusCode::OK).await).await;
    assert_eq!(item["caption"], "just one");

    let res = send(&app.app, get(&format!("/api/posts/{}", uuid::Uuid::now_v7()))).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = send(&app.app, get("/api/posts/not-a-uuid")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
