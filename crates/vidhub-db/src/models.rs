//! Row types as read from SQLite, plus the borrowed inputs and filters the
//! queries take. Ids and timestamps stay as stored text here.

#[derive(Debug)]
pub struct UserRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub avatar: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug)]
pub struct ChannelRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub banner: String,
    pub logo: String,
    pub owner_id: String,
    pub subscribers: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug)]
pub struct VideoRow {
    pub id: String,
    pub title: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub description: String,
    pub category: String,
    pub channel_id: String,
    pub uploader_id: String,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// A video joined with its owning channel.
#[derive(Debug)]
pub struct VideoListingRow {
    pub video: VideoRow,
    pub channel: ChannelRow,
}

#[derive(Debug)]
pub struct CommentRow {
    pub id: String,
    pub video_id: String,
    pub user_id: String,
    pub username: String,
    pub user_avatar: String,
    pub text: String,
    pub created_at: String,
    pub updated_at: String,
}

// -- Inserts and updates --

pub struct NewUser<'a> {
    pub id: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub avatar: &'a str,
}

pub struct NewChannel<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub banner: &'a str,
    pub logo: &'a str,
    pub owner_id: &'a str,
}

#[derive(Default)]
pub struct ChannelChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub banner: Option<String>,
    pub logo: Option<String>,
}

pub struct NewVideo<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub video_url: &'a str,
    pub thumbnail_url: &'a str,
    pub description: &'a str,
    pub category: &'a str,
    pub channel_id: &'a str,
    pub uploader_id: &'a str,
}

#[derive(Default)]
pub struct VideoChanges {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

/// Filters for the joined video listing. All filters combine with AND.
#[derive(Default)]
pub struct VideoFilter {
    pub category: Option<String>,
    pub channel_id: Option<String>,
    pub title_contains: Option<String>,
    pub skip: u32,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy)]
pub enum VideoCounter {
    Views,
    Likes,
    Dislikes,
}

impl VideoCounter {
    pub(crate) fn column(self) -> &'static str {
        match self {
            Self::Views => "views",
            Self::Likes => "likes",
            Self::Dislikes => "dislikes",
        }
    }
}

pub struct NewComment<'a> {
    pub id: &'a str,
    pub video_id: &'a str,
    pub user_id: &'a str,
    pub username: &'a str,
    pub user_avatar: &'a str,
    pub text: &'a str,
}
