//! Row -> API model conversion. The store keeps ids and timestamps as text;
//! a value that fails to parse is logged and replaced with a default rather
//! than failing the whole response.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use vidhub_db::models::{ChannelRow, CommentRow, UserRow, VideoRow};
use vidhub_types::models::{Channel, ChannelSummary, Comment, UserProfile, Video};

use crate::middleware::AuthUser;

fn parse_id(raw: &str, field: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}': {}", field, raw, e);
        Uuid::default()
    })
}

pub(crate) fn parse_ids(raw: &[String], field: &str) -> Vec<Uuid> {
    raw.iter().map(|id| parse_id(id, field)).collect()
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .unwrap_or_else(|e| {
            warn!("Corrupt timestamp '{}': {}", raw, e);
            DateTime::default()
        })
}

pub(crate) fn user_profile(row: &UserRow, channel_ids: &[String]) -> UserProfile {
    UserProfile {
        user_id: parse_id(&row.id, "user id"),
        username: row.username.clone(),
        email: row.email.clone(),
        avatar: row.avatar.clone(),
        channels: parse_ids(channel_ids, "channel id"),
    }
}

/// Profile of the authenticated caller, without a second user lookup.
pub(crate) fn caller_profile(user: AuthUser, channel_ids: &[String]) -> UserProfile {
    UserProfile {
        user_id: user.id,
        username: user.username,
        email: user.email,
        avatar: user.avatar,
        channels: parse_ids(channel_ids, "channel id"),
    }
}

pub(crate) fn channel(row: ChannelRow, video_ids: &[String]) -> Channel {
    Channel {
        channel_id: parse_id(&row.id, "channel id"),
        owner: parse_id(&row.owner_id, "owner id"),
        videos: parse_ids(video_ids, "video id"),
        created_at: parse_timestamp(&row.created_at),
        updated_at: parse_timestamp(&row.updated_at),
        channel_name: row.name,
        description: row.description,
        channel_banner: row.banner,
        channel_logo: row.logo,
        subscribers: row.subscribers,
    }
}

pub(crate) fn channel_summary(row: ChannelRow) -> ChannelSummary {
    ChannelSummary {
        channel_id: parse_id(&row.id, "channel id"),
        owner: parse_id(&row.owner_id, "owner id"),
        channel_name: row.name,
        channel_banner: row.banner,
        channel_logo: row.logo,
        subscribers: row.subscribers,
    }
}

pub(crate) fn video(row: VideoRow, comment_ids: &[String]) -> Video {
    Video {
        video_id: parse_id(&row.id, "video id"),
        channel_id: parse_id(&row.channel_id, "channel id"),
        uploader: parse_id(&row.uploader_id, "uploader id"),
        comments: parse_ids(comment_ids, "comment id"),
        created_at: parse_timestamp(&row.created_at),
        updated_at: parse_timestamp(&row.updated_at),
        title: row.title,
        video_url: row.video_url,
        thumbnail_url: row.thumbnail_url,
        description: row.description,
        category: row.category,
        views: row.views,
        likes: row.likes,
        dislikes: row.dislikes,
    }
}

pub(crate) fn comment(row: CommentRow) -> Comment {
    Comment {
        comment_id: parse_id(&row.id, "comment id"),
        video_id: parse_id(&row.video_id, "video id"),
        user_id: parse_id(&row.user_id, "user id"),
        created_at: parse_timestamp(&row.created_at),
        updated_at: parse_timestamp(&row.updated_at),
        username: row.username,
        user_avatar: row.user_avatar,
        text: row.text,
    }
}
