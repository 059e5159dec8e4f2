use super::{
    handlers::{health, likes, pages, posts, upload},
    middleware::admin::require_admin,
    middleware::request_id::request_id_middleware,
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
};

pub fn create_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/admin", get(pages::admin_page))
        .route(
            "/api/posts",
            post(posts::create_post).delete(posts::delete_post_by_query),
        )
        .route("/api/posts/{id}", delete(posts::delete_post))
        // Older admin clients create hosted posts here.
        .route("/api/revalidate", post(posts::create_post))
        .route(
            "/api/upload",
            post(upload::upload_post)
                .layer(DefaultBodyLimit::max(state.config.max_upload_bytes)),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Feed API
        .route("/api/posts", get(posts::list_posts))
        .route("/api/posts/{id}", get(posts::get_post))
        .route("/api/posts/{id}/like", post(likes::like_post))
        .route("/api/posts/{id}/liked", get(likes::liked_status))
        // Pages
        .route("/", get(pages::feed_page))
        .route("/p/{id}", get(pages::post_page))
        .route("/manifest.webmanifest", get(pages::manifest))
        .route("/assets/{name}", get(pages::asset))
        // Admin (Basic auth)
        .merge(admin_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
