use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of a user. The password hash never leaves the store layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar: String,
    pub channels: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    pub channel_id: Uuid,
    pub channel_name: String,
    pub description: String,
    pub channel_banner: String,
    pub channel_logo: String,
    pub owner: Uuid,
    pub subscribers: i64,
    pub videos: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Channel fields joined onto every video in a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub channel_id: Uuid,
    pub channel_name: String,
    pub channel_banner: String,
    pub channel_logo: String,
    pub owner: Uuid,
    pub subscribers: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub video_id: Uuid,
    pub title: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub description: String,
    pub category: String,
    pub channel_id: Uuid,
    pub uploader: Uuid,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub comments: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A video with its owning channel, as returned by the listing endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoListing {
    #[serde(flatten)]
    pub video: Video,
    pub channel: ChannelSummary,
}

/// Comments carry a copy of the author's display name and avatar taken
/// at creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment_id: Uuid,
    pub video_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub user_avatar: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
