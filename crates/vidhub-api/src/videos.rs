use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use vidhub_db::models::{NewVideo, VideoChanges, VideoCounter, VideoFilter};
use vidhub_types::api::{
    ChannelWithVideosResponse, DislikeResponse, LikeResponse, MessageResponse, TitleSearchQuery,
    UpdateVideoRequest, UploadVideoRequest, VideoDetailResponse, VideoListQuery, VideoResponse,
};
use vidhub_types::models::VideoListing;

use crate::auth::AppState;
use crate::convert;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ValidJson, ValidQuery, non_blank, required};
use crate::middleware::AuthUser;

/// Upper bound on `limit` for the video listing.
const MAX_PAGE_SIZE: u32 = 100;

const VIDEO_NOT_FOUND: &str = "Video not found";
const CHANNEL_NOT_FOUND: &str = "Channel not found";

pub async fn upload_video(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidJson(req): ValidJson<UploadVideoRequest>,
) -> ApiResult<impl IntoResponse> {
    const MISSING: &str = "Missing required fields";
    let title = required(&req.title, MISSING)?;
    let video_url = required(&req.video_url, MISSING)?;
    let category = required(&req.category, MISSING)?;
    let channel_id = required(&req.channel_id, MISSING)?;

    // Channel must exist and belong to the caller
    let channel = state
        .db
        .get_channel(channel_id)?
        .ok_or_else(|| ApiError::not_found(CHANNEL_NOT_FOUND))?;
    user.ensure_owns(&channel.owner_id, "Not authorized to upload to this channel")?;

    let video_id = Uuid::new_v4().to_string();
    let uploader_id = user.id.to_string();
    let row = state.db.create_video(&NewVideo {
        id: &video_id,
        title,
        video_url,
        thumbnail_url: req.thumbnail_url.as_deref().map(str::trim).unwrap_or_default(),
        description: req.description.as_deref().unwrap_or_default(),
        category,
        channel_id,
        uploader_id: &uploader_id,
    })?;

    info!("User {} uploaded video {} to channel {}", uploader_id, video_id, channel_id);

    Ok((
        StatusCode::CREATED,
        Json(VideoResponse {
            message: "Video uploaded successfully".into(),
            video: convert::video(row, &[]),
        }),
    ))
}

/// GET /api/videos?category=&skip=&limit=. Newest first, joined with the
/// owning channel. A `limit` of 0 means no limit.
pub async fn list_videos(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<VideoListQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = VideoFilter {
        category: non_blank(query.category.as_deref()),
        skip: query.skip.unwrap_or(0),
        limit: query
            .limit
            .filter(|&limit| limit > 0)
            .map(|limit| limit.min(MAX_PAGE_SIZE)),
        ..Default::default()
    };

    Ok(Json(load_listings(&state, filter).await?))
}

/// GET /api/videos/channel/{id}: the channel plus all of its videos.
pub async fn videos_by_channel(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let channel = state
        .db
        .get_channel(&channel_id)?
        .ok_or_else(|| ApiError::not_found(CHANNEL_NOT_FOUND))?;
    let video_ids = state.db.video_ids_for_channel(&channel_id)?;

    let videos = load_listings(
        &state,
        VideoFilter {
            channel_id: Some(channel_id),
            ..Default::default()
        },
    )
    .await?;

    Ok(Json(ChannelWithVideosResponse {
        channel: convert::channel(channel, &video_ids),
        videos,
    }))
}

/// GET /api/videos/search/title?title=, case-insensitive substring match.
pub async fn search_videos(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<TitleSearchQuery>,
) -> ApiResult<impl IntoResponse> {
    let title = non_blank(query.title.as_deref())
        .ok_or_else(|| ApiError::bad_request("Search query is required"))?;

    let videos = load_listings(
        &state,
        VideoFilter {
            title_contains: Some(title),
            ..Default::default()
        },
    )
    .await?;

    Ok(Json(videos))
}

/// Every call counts as a view, whoever the caller is.
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let row = state
        .db
        .increment_counter(&id, VideoCounter::Views)?
        .ok_or_else(|| ApiError::not_found(VIDEO_NOT_FOUND))?;

    let channel = state
        .db
        .get_channel(&row.channel_id)?
        .ok_or_else(|| ApiError::not_found(CHANNEL_NOT_FOUND))?;
    let video_ids = state.db.video_ids_for_channel(&channel.id)?;
    let comment_ids = state.db.comment_ids_for_video(&id)?;

    Ok(Json(VideoDetailResponse {
        video: convert::video(row, &comment_ids),
        channel: convert::channel(channel, &video_ids),
    }))
}

pub async fn update_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
    ValidJson(req): ValidJson<UpdateVideoRequest>,
) -> ApiResult<impl IntoResponse> {
    let existing = state
        .db
        .get_video(&id)?
        .ok_or_else(|| ApiError::not_found(VIDEO_NOT_FOUND))?;
    user.ensure_owns(&existing.uploader_id, "Not authorized to update this video")?;

    let title = required_if_present(req.title.as_deref(), "Title cannot be empty")?;
    let video_url = required_if_present(req.video_url.as_deref(), "Video URL cannot be empty")?;
    let category = required_if_present(req.category.as_deref(), "Category cannot be empty")?;

    let changes = VideoChanges {
        title,
        video_url,
        category,
        thumbnail_url: req.thumbnail_url.map(|t| t.trim().to_string()),
        description: req.description,
    };

    let row = state
        .db
        .update_video(&id, &changes)?
        .ok_or_else(|| ApiError::not_found(VIDEO_NOT_FOUND))?;
    let comment_ids = state.db.comment_ids_for_video(&id)?;

    Ok(Json(VideoResponse {
        message: "Video updated successfully".into(),
        video: convert::video(row, &comment_ids),
    }))
}

/// Deleting a video also deletes its comments.
pub async fn delete_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let existing = state
        .db
        .get_video(&id)?
        .ok_or_else(|| ApiError::not_found(VIDEO_NOT_FOUND))?;
    user.ensure_owns(&existing.uploader_id, "Not authorized to delete this video")?;

    if !state.db.delete_video(&id)? {
        return Err(ApiError::not_found(VIDEO_NOT_FOUND));
    }

    info!("User {} deleted video {}", user.id, id);

    Ok(Json(MessageResponse::new("Video deleted successfully")))
}

/// No per-user tracking: every call adds one.
pub async fn like_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(_user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let row = state
        .db
        .increment_counter(&id, VideoCounter::Likes)?
        .ok_or_else(|| ApiError::not_found(VIDEO_NOT_FOUND))?;

    Ok(Json(LikeResponse {
        message: "Video liked".into(),
        likes: row.likes,
    }))
}

pub async fn dislike_video(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(_user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let row = state
        .db
        .increment_counter(&id, VideoCounter::Dislikes)?
        .ok_or_else(|| ApiError::not_found(VIDEO_NOT_FOUND))?;

    Ok(Json(DislikeResponse {
        message: "Video disliked".into(),
        dislikes: row.dislikes,
    }))
}

/// Runs the joined listing plus the comment-id lookup off the async runtime.
async fn load_listings(state: &AppState, filter: VideoFilter) -> ApiResult<Vec<VideoListing>> {
    let db = state.clone();

    let (rows, mut comment_ids) = tokio::task::spawn_blocking(move || {
        let rows = db.db.list_videos(&filter)?;
        let video_ids: Vec<String> = rows.iter().map(|r| r.video.id.clone()).collect();
        let comment_ids = db.db.comment_ids_for_videos(&video_ids)?;
        Ok::<_, anyhow::Error>((rows, comment_ids))
    })
    .await??;

    let listings = rows
        .into_iter()
        .map(|row| {
            let comments = comment_ids.remove(&row.video.id).unwrap_or_default();
            VideoListing {
                video: convert::video(row.video, &comments),
                channel: convert::channel_summary(row.channel),
            }
        })
        .collect();

    Ok(listings)
}

/// `None` stays `None`; a present value must not be blank.
fn required_if_present(value: Option<&str>, message: &str) -> ApiResult<Option<String>> {
    value
        .map(|v| required(v, message).map(str::to_string))
        .transpose()
}
