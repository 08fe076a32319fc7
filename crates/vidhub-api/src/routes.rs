use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::{channels, comments, videos};

/// Builds the full API. Public and protected routes may share a path; the
/// auth gate only wraps the protected methods, so an unrouted method on a
/// shared path still answers 405.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/channel/{id}", get(channels::get_channel))
        .route("/api/channel/{id}/videos", get(channels::get_channel_videos))
        .route("/api/videos", get(videos::list_videos))
        .route("/api/videos/search/title", get(videos::search_videos))
        .route("/api/videos/channel/{id}", get(videos::videos_by_channel))
        .route("/api/videos/{id}", get(videos::get_video))
        .route("/api/comments/{id}", get(comments::get_comments))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/api/channel", post(channels::create_channel))
        .route(
            "/api/channel/{id}",
            put(channels::update_channel).delete(channels::delete_channel),
        )
        .route("/api/videos", post(videos::upload_video))
        .route(
            "/api/videos/{id}",
            put(videos::update_video).delete(videos::delete_video),
        )
        .route(
            "/api/videos/{id}/like",
            post(videos::like_video).put(videos::like_video),
        )
        .route(
            "/api/videos/{id}/dislike",
            post(videos::dislike_video).put(videos::dislike_video),
        )
        .route("/api/comments", post(comments::add_comment))
        .route(
            "/api/comments/{id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}

async fn health() -> &'static str {
    "VidHub backend running"
}
