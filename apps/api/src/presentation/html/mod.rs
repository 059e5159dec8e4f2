//! Server-rendered pages. Markup is assembled with `format!`; every value that
//! comes from a post goes through [`escape_html`].

use crate::application::get_feed::dto::{FeedItem, FeedPage};
use serde_json::{Value, json};

pub const FEED_JS: &str = include_str!("assets/feed.js");
pub const ADMIN_JS: &str = include_str!("assets/admin.js");
pub const APP_CSS: &str = include_str!("assets/app.css");
pub const ICON_SVG: &str = include_str!("assets/icon.svg");

const THEME_COLOR: &str = "#111111";
const SITE_DESCRIPTION: &str = "A tiny Instagram-style feed for Bud.";

/// Link previews show at most this much of the caption.
const PREVIEW_DESCRIPTION_CHARS: usize = 180;
const ALT_TEXT_CHARS: usize = 100;

const VERIFIED_BADGE: &str = r##"<svg viewBox="0 0 24 24" class="badge" aria-label="Verified" role="img"><path d="M12 2l2.09 4.24L18.9 7.1l-3.1 3.02.73 4.38L12 12.77 7.47 14.5l.73-4.38L5.1 7.1l4.81-.86L12 2z" fill="#1DA1F2"/><path d="M10.5 12.3l-1.7-1.7-1.1 1.1 2.8 2.8 5.2-5.2-1.1-1.1z" fill="white"/></svg>"##;

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Head tags that make a shared link unfurl with the photo.
#[derive(Debug, Clone, Default)]
pub struct LinkPreview {
    pub title: String,
    pub description: String,
    pub url: String,
    pub image: String,
}

impl LinkPreview {
    pub fn for_post(site_name: &str, origin: &str, item: &FeedItem) -> Self {
        Self {
            title: site_name.to_string(),
            description: item.caption.chars().take(PREVIEW_DESCRIPTION_CHARS).collect(),
            url: format!("{}{}", origin, item.permalink()),
            image: item.image_url.clone(),
        }
    }

    fn render(&self) -> String {
        let title = escape_html(&self.title);
        let description = escape_html(&self.description);
        let url = escape_html(&self.url);
        let image = escape_html(&self.image);
        format!(
            r#"<meta property="og:type" content="article">
<meta property="og:title" content="{title}">
<meta property="og:description" content="{description}">
<meta property="og:url" content="{url}">
<meta property="og:image" content="{image}">
<meta name="twitter:card" content="summary_large_image">
<meta name="twitter:title" content="{title}">
<meta name="twitter:description" content="{description}">
<meta name="twitter:image" content="{image}">
<meta name="description" content="{description}">"#
        )
    }
}

fn layout(site_name: &str, head: &str, main: &str, script: Option<&str>) -> String {
    let site = escape_html(site_name);
    let script = script
        .map(|src| format!(r#"<script src="{}" defer></script>"#, src))
        .unwrap_or_default();
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{site}</title>
<meta name="theme-color" content="{THEME_COLOR}">
<link rel="manifest" href="/manifest.webmanifest">
<link rel="icon" href="/assets/icon.svg" type="image/svg+xml">
<link rel="stylesheet" href="/assets/app.css">
{head}
</head>
<body>
<header class="site-header"><nav><a class="brand" href="/">{site}</a><span><a href="/">Feed</a><a href="/admin">Admin</a></span></nav></header>
<main>
{main}
</main>
<footer class="site-footer">{site} · Built for Bud 🐾</footer>
{script}
</body>
</html>"#
    )
}

fn likes_label(likes: i32) -> String {
    if likes == 1 {
        "1 like".to_string()
    } else {
        format!("{} likes", likes)
    }
}

pub fn post_card(item: &FeedItem) -> String {
    let initial = item
        .author
        .chars()
        .next()
        .map(|c| c.to_uppercase().to_string())
        .unwrap_or_default();
    let alt = if item.caption.trim().is_empty() {
        "Budstagram post".to_string()
    } else {
        item.caption.chars().take(ALT_TEXT_CHARS).collect()
    };
    let badge = if item.verified { VERIFIED_BADGE } else { "" };

    format!(
        r#"<article class="card" data-post-id="{id}" data-likes="{likes}">
<div class="card-head"><div class="avatar">{initial}</div><span class="author">{author}</span>{badge}</div>
<a class="card-media" href="{permalink}"><img src="{image}" alt="{alt}" loading="lazy"></a>
<div class="card-body">
<div class="card-meta"><time datetime="{iso}">{date}</time><span class="likes">{likes_label}</span></div>
<p class="caption">{caption}</p>
<div class="actions"><button type="button" class="like-btn" aria-pressed="false">♡ Like</button><button type="button" class="share-btn" data-url="{permalink}">Share</button></div>
</div>
</article>"#,
        id = item.id,
        likes = item.likes,
        initial = escape_html(&initial),
        author = escape_html(&item.author),
        permalink = escape_html(&item.permalink()),
        image = escape_html(&item.image_url),
        alt = escape_html(&alt),
        iso = item.created_at.to_rfc3339(),
        date = item.created_at.format("%b %-d, %Y"),
        likes_label = likes_label(item.likes),
        caption = escape_html(&item.caption),
    )
}

fn load_more_button(next_cursor: Option<&str>, all: bool) -> String {
    match next_cursor {
        Some(cursor) => format!(
            r#"<button type="button" id="load-more" class="load-more" data-cursor="{}" data-all="{}">Load more</button><p id="load-error" class="error" hidden></p>"#,
            escape_html(cursor),
            if all { "1" } else { "0" }
        ),
        None => String::new(),
    }
}

pub fn feed_page(site_name: &str, page: &FeedPage) -> String {
    let cards: String = page.items.iter().map(post_card).collect();
    let empty = if page.items.is_empty() {
        r#"<p class="empty">No posts yet.</p>"#
    } else {
        ""
    };
    let main = format!(
        r#"<section id="feed" class="feed">{cards}</section>{empty}{more}"#,
        more = load_more_button(page.next_cursor.as_deref(), false)
    );
    let head = format!(
        r#"<meta name="description" content="{}">"#,
        escape_html(SITE_DESCRIPTION)
    );
    layout(site_name, &head, &main, Some("/assets/feed.js"))
}

pub fn post_page(site_name: &str, origin: &str, item: &FeedItem) -> String {
    let preview = LinkPreview::for_post(site_name, origin, item);
    let main = format!(r#"<section id="feed" class="feed single">{}</section>"#, post_card(item));
    layout(site_name, &preview.render(), &main, Some("/assets/feed.js"))
}

pub fn not_found_page(site_name: &str) -> String {
    layout(
        site_name,
        "",
        r#"<p class="empty">Not found</p><p class="empty"><a href="/">Back to the feed</a></p>"#,
        None,
    )
}

fn admin_row(item: &FeedItem) -> String {
    let draft = if item.published {
        ""
    } else {
        r#"<span class="draft">unpublished</span>"#
    };
    format!(
        r#"<li class="admin-post" data-post-id="{id}">
<img src="{image}" alt="{alt}" loading="lazy">
<p class="caption">{caption}</p>
<div class="card-meta"><time datetime="{iso}">{date}</time>{draft}<span>{likes}</span></div>
<button type="button" class="delete-btn" data-id="{id}">Delete</button>
</li>"#,
        id = item.id,
        image = escape_html(&item.image_url),
        alt = escape_html(&item.caption),
        caption = escape_html(&item.caption),
        iso = item.created_at.to_rfc3339(),
        date = item.created_at.format("%b %-d, %Y %H:%M"),
        likes = likes_label(item.likes),
    )
}

pub fn admin_page(site_name: &str, page: &FeedPage) -> String {
    let rows: String = page.items.iter().map(admin_row).collect();
    let main = format!(
        r#"<section class="admin">
<h1>Add New Post</h1>
<input id="gallery-input" type="file" accept="image/*" hidden>
<input id="camera-input" type="file" accept="image/*" capture="environment" hidden>
<div class="pickers">
<button type="button" id="pick-gallery">Choose from gallery</button>
<button type="button" id="pick-camera" class="primary">Take photo (camera)</button>
</div>
<img id="preview" class="preview" alt="preview" hidden>
<p id="selected" class="hint">No file selected</p>
<form id="upload-form">
<textarea id="caption" name="caption" placeholder="Write a caption..." maxlength="2200"></textarea>
<button type="submit" id="submit-post" class="primary" disabled>Post</button>
</form>
<p id="status" class="hint" role="status"></p>
</section>
<section class="admin">
<h2>All Posts</h2>
<ul id="admin-posts">{rows}</ul>
{more}
</section>"#,
        more = load_more_button(page.next_cursor.as_deref(), true)
    );
    layout(site_name, "", &main, Some("/assets/admin.js"))
}

pub fn manifest(site_name: &str) -> Value {
    json!({
        "name": site_name,
        "short_name": site_name,
        "start_url": "/",
        "display": "standalone",
        "background_color": THEME_COLOR,
        "theme_color": THEME_COLOR,
        "description": SITE_DESCRIPTION,
        "icons": [
            {
                "src": "/assets/icon.svg",
                "sizes": "any",
                "type": "image/svg+xml",
                "purpose": "any maskable"
            }
        ]
    })
}
