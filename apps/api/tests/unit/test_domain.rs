use budstagram::{
    application::{
        create_post::use_case::object_key,
        get_feed::{dto::FeedItem, use_case::cache_key},
    },
    domain::{
        like::entity::DeviceId,
        post::{
            entity::{NewPost, Post},
            value_objects::{Caption, SafeFileName, slug_for},
        },
        shared::pagination::{FEED_PAGE_SIZE, FeedCursor, PageRequest},
    },
    infrastructure::imaging::optimizer::{OptimizerSettings, target_dimensions},
};
use chrono::{TimeZone, Utc};
use uuid::Uuid;

#[test]
fn caption_accepts_up_to_limit() {
    assert!(Caption::new(&"a".repeat(2200)).is_ok());
    assert!(Caption::new(&"a".repeat(2201)).is_err());
    assert_eq!(Caption::new("  hi  ").unwrap().value, "hi");
    assert_eq!(Caption::new("").unwrap().value, "");
}

#[test]
fn page_request_defaults_are_safe_and_stable() {
    let p = PageRequest::default();
    assert_eq!(p.limit, FEED_PAGE_SIZE);
    assert_eq!(p.limit, 10);
    assert!(p.cursor.is_none());
    assert!(!p.include_unpublished);
}

#[test]
fn cursor_orders_ties_by_id() {
    let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let ids: Vec<Uuid> = (1..=4).map(Uuid::from_u128).collect();
    let cursor = FeedCursor::after(ts, ids[2]);

    assert!(cursor.precedes(ts, ids[0]));
    assert!(cursor.precedes(ts, ids[1]));
    assert!(!cursor.precedes(ts, ids[2]));
    assert!(!cursor.precedes(ts, ids[3]));
    assert!(cursor.precedes(ts - chrono::Duration::microseconds(1), ids[3]));
}

#[test]
fn cursor_text_form_is_timestamp_and_id() {
    let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let id = Uuid::from_u128(7);
    let text = FeedCursor::after(ts, id).to_string();
    assert_eq!(
        text,
        "2025-01-01T00:00:00.000000Z|00000000-0000-0000-0000-000000000007"
    );
}

#[test]
fn cache_keys_are_generation_stamped() {
    let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let cursor = FeedCursor::after(ts, Uuid::from_u128(7));
    assert_eq!(cache_key(3, None), "feed:v3:first");
    assert_eq!(
        cache_key(4, Some(&cursor)),
        format!("feed:v4:{}", cursor)
    );
}

#[test]
fn object_keys_live_under_the_bud_prefix() {
    let nonce = Uuid::from_u128(1);
    let key = object_key(1_700_000_000_000, nonce, &SafeFileName::new("porch nap.png"));
    assert_eq!(
        key,
        "bud/1700000000000-00000000-0000-0000-0000-000000000001-porch_nap.png"
    );
}

#[test]
fn slugs_differ_for_identical_captions() {
    let a = slug_for("Same caption", Uuid::new_v4());
    let b = slug_for("Same caption", Uuid::new_v4());
    assert!(a.starts_with("same-caption-"));
    assert_ne!(a, b);
}

#[test]
fn device_ids_are_opaque_tokens() {
    let minted = DeviceId::mint();
    assert!(Uuid::parse_str(minted.as_str()).is_ok());
    assert!(DeviceId::parse("x; Path=/").is_none());
}

#[test]
fn feed_item_prefers_slug_in_permalink() {
    let mut post = Post::create(
        NewPost {
            image_url: "https://cdn.example.com/bud/1.jpg".into(),
            caption: "hello".into(),
            published: true,
            author: Some("Bud".into()),
        },
        Some("hello-abcd1234".into()),
    );
    let item = FeedItem::from_post(post.clone(), "The Chisp");
    assert_eq!(item.permalink(), "/p/hello-abcd1234");
    assert_eq!(item.author, "Bud");

    post.slug = None;
    let item = FeedItem::from_post(post.clone(), "The Chisp");
    assert_eq!(item.permalink(), format!("/p/{}", post.id));
}

#[test]
fn downscaling_keeps_aspect_and_never_upscales() {
    assert_eq!(target_dimensions(4000, 3000, 1920), (1920, 1440));
    assert_eq!(target_dimensions(3000, 4000, 1920), (1440, 1920));
    assert_eq!(target_dimensions(800, 600, 1920), (800, 600));
    assert_eq!(target_dimensions(10_000, 1, 1920), (1920, 1));
}

#[test]
fn optimizer_defaults() {
    let settings = OptimizerSettings::default();
    assert_eq!(settings.max_dimension, 1920);
    assert_eq!(settings.jpeg_quality, 86);
}
