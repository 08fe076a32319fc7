use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use vidhub_db::models::NewComment;
use vidhub_types::api::{CommentResponse, CreateCommentRequest, MessageResponse, UpdateCommentRequest};
use vidhub_types::models::Comment;

use crate::auth::AppState;
use crate::convert;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ValidJson, required};
use crate::middleware::AuthUser;

const COMMENT_NOT_FOUND: &str = "Comment not found";

pub async fn add_comment(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidJson(req): ValidJson<CreateCommentRequest>,
) -> ApiResult<impl IntoResponse> {
    const MISSING: &str = "Video id and comment text are required";
    let video_id = required(&req.video_id, MISSING)?;
    let text = required(&req.text, MISSING)?;

    if state.db.get_video(video_id)?.is_none() {
        return Err(ApiError::not_found("Video not found"));
    }

    let comment_id = Uuid::new_v4().to_string();
    let row = state.db.create_comment(&NewComment {
        id: &comment_id,
        video_id,
        user_id: &user.id.to_string(),
        username: &user.username,
        user_avatar: &user.avatar,
        text,
    })?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            message: "Comment added successfully".into(),
            comment: convert::comment(row),
        }),
    ))
}

/// All comments on a video, newest first. Unknown videos have no comments.
pub async fn get_comments(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.comments_for_video(&video_id)).await??;

    let comments: Vec<Comment> = rows.into_iter().map(convert::comment).collect();
    Ok(Json(comments))
}

pub async fn update_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Extension(user): Extension<AuthUser>,
    ValidJson(req): ValidJson<UpdateCommentRequest>,
) -> ApiResult<impl IntoResponse> {
    let text = required(&req.text, "Comment text is required")?;

    let existing = state
        .db
        .get_comment(&comment_id)?
        .ok_or_else(|| ApiError::not_found(COMMENT_NOT_FOUND))?;
    user.ensure_owns(&existing.user_id, "Not authorized to update this comment")?;

    let row = state
        .db
        .update_comment_text(&comment_id, text)?
        .ok_or_else(|| ApiError::not_found(COMMENT_NOT_FOUND))?;

    Ok(Json(CommentResponse {
        message: "Comment updated successfully".into(),
        comment: convert::comment(row),
    }))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let existing = state
        .db
        .get_comment(&comment_id)?
        .ok_or_else(|| ApiError::not_found(COMMENT_NOT_FOUND))?;
    user.ensure_owns(&existing.user_id, "Not authorized to delete this comment")?;

    if !state.db.delete_comment(&comment_id)? {
        return Err(ApiError::not_found(COMMENT_NOT_FOUND));
    }

    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}
