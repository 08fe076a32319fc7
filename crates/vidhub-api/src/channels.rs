use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use uuid::Uuid;

use vidhub_db::models::{ChannelChanges, NewChannel};
use vidhub_types::api::{
    ChannelCreatedResponse, ChannelResponse, ChannelVideoIdsResponse, CreateChannelRequest,
    MessageResponse, UpdateChannelRequest,
};

use crate::auth::AppState;
use crate::convert;
use crate::error::{ApiError, ApiResult};
use crate::extract::{ValidJson, non_blank, required};
use crate::middleware::AuthUser;

const CHANNEL_NOT_FOUND: &str = "Channel not found";

pub async fn create_channel(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidJson(req): ValidJson<CreateChannelRequest>,
) -> ApiResult<impl IntoResponse> {
    let name = required(&req.channel_name, "Channel name is required")?;
    let channel_id = Uuid::new_v4().to_string();
    let owner_id = user.id.to_string();

    let row = state.db.create_channel(&NewChannel {
        id: &channel_id,
        name,
        description: req.description.as_deref().unwrap_or_default(),
        banner: req.channel_banner.as_deref().unwrap_or_default(),
        logo: req.channel_logo.as_deref().unwrap_or_default(),
        owner_id: &owner_id,
    })?;

    info!("User {} created channel {}", owner_id, channel_id);

    let owned = state.db.channel_ids_for_user(&owner_id)?;

    Ok((
        StatusCode::CREATED,
        Json(ChannelCreatedResponse {
            message: "Channel created successfully".into(),
            channel: convert::channel(row, &[]),
            user: convert::caller_profile(user, &owned),
        }),
    ))
}

pub async fn get_channel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let row = state
        .db
        .get_channel(&id)?
        .ok_or_else(|| ApiError::not_found(CHANNEL_NOT_FOUND))?;
    let video_ids = state.db.video_ids_for_channel(&id)?;

    Ok(Json(convert::channel(row, &video_ids)))
}

/// Ids of the channel's videos in upload order.
pub async fn get_channel_videos(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    if state.db.get_channel(&id)?.is_none() {
        return Err(ApiError::not_found(CHANNEL_NOT_FOUND));
    }
    let video_ids = state.db.video_ids_for_channel(&id)?;

    Ok(Json(ChannelVideoIdsResponse {
        videos: convert::parse_ids(&video_ids, "video id"),
    }))
}

pub async fn update_channel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
    ValidJson(req): ValidJson<UpdateChannelRequest>,
) -> ApiResult<impl IntoResponse> {
    let existing = state
        .db
        .get_channel(&id)?
        .ok_or_else(|| ApiError::not_found(CHANNEL_NOT_FOUND))?;
    user.ensure_owns(&existing.owner_id, "Not authorized to update")?;

    let changes = ChannelChanges {
        // blank names are ignored
        name: non_blank(req.channel_name.as_deref()),
        description: req.description,
        banner: req.channel_banner,
        logo: req.channel_logo,
    };

    let row = state
        .db
        .update_channel(&id, &changes)?
        .ok_or_else(|| ApiError::not_found(CHANNEL_NOT_FOUND))?;
    let video_ids = state.db.video_ids_for_channel(&id)?;

    Ok(Json(ChannelResponse {
        message: "Channel updated successfully".into(),
        channel: convert::channel(row, &video_ids),
    }))
}

/// Deleting a channel also deletes its videos and their comments.
pub async fn delete_channel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<impl IntoResponse> {
    let existing = state
        .db
        .get_channel(&id)?
        .ok_or_else(|| ApiError::not_found(CHANNEL_NOT_FOUND))?;
    user.ensure_owns(&existing.owner_id, "Not authorized to delete")?;

    if !state.db.delete_channel(&id)? {
        return Err(ApiError::not_found(CHANNEL_NOT_FOUND));
    }

    info!("User {} deleted channel {}", user.id, id);

    Ok(Json(MessageResponse::new("Channel deleted successfully")))
}
