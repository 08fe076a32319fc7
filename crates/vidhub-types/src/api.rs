use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};
use uuid::Uuid;

use crate::models::{Channel, Comment, UserProfile, Video, VideoListing};

// -- JWT Claims --

/// Bearer token payload. `sub` is the user id; the auth gate re-resolves it
/// against the store on every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: usize,
}

// -- Generic --

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Query-string number where an empty value (`?skip=`) counts as absent.
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}

// -- Auth --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserProfile,
}

// -- Channels --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateChannelRequest {
    #[serde(default)]
    pub channel_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub channel_banner: Option<String>,
    #[serde(default)]
    pub channel_logo: Option<String>,
}

/// Omitted fields are left untouched. An empty `channelName` is ignored.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct UpdateChannelRequest {
    #[serde(default)]
    pub channel_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub channel_banner: Option<String>,
    #[serde(default)]
    pub channel_logo: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChannelCreatedResponse {
    pub message: String,
    pub channel: Channel,
    pub user: UserProfile,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChannelResponse {
    pub message: String,
    pub channel: Channel,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChannelVideoIdsResponse {
    pub videos: Vec<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChannelWithVideosResponse {
    pub channel: Channel,
    pub videos: Vec<VideoListing>,
}

// -- Videos --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct UploadVideoRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Counters, uploader and channel are not client-writable.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct UpdateVideoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct VideoListQuery {
    pub category: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub skip: Option<u32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TitleSearchQuery {
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoResponse {
    pub message: String,
    pub video: Video,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VideoDetailResponse {
    pub video: Video,
    pub channel: Channel,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LikeResponse {
    pub message: String,
    pub likes: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DislikeResponse {
    pub message: String,
    pub dislikes: i64,
}

// -- Comments --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateCommentRequest {
    #[serde(default)]
    pub video_id: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCommentRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub message: String,
    pub comment: Comment,
}
