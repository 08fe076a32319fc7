use std::collections::HashMap;

use crate::models::{
    ChannelChanges, ChannelRow, CommentRow, NewChannel, NewComment, NewUser, NewVideo, UserRow,
    VideoChanges, VideoCounter, VideoFilter, VideoListingRow, VideoRow,
};
use crate::{Database, now_timestamp};
use anyhow::Result;
use rusqlite::types::Value;
use rusqlite::{Connection, Row, params, params_from_iter};

const USER_COLUMNS: &str =
    "id, first_name, last_name, username, email, password, avatar, created_at, updated_at";

const CHANNEL_COLUMNS: &str =
    "id, name, description, banner, logo, owner_id, subscribers, created_at, updated_at";

const VIDEO_COLUMNS: &str = "id, title, video_url, thumbnail_url, description, category, \
     channel_id, uploader_id, views, likes, dislikes, created_at, updated_at";

const COMMENT_COLUMNS: &str =
    "id, video_id, user_id, username, user_avatar, text, created_at, updated_at";

/// Video columns followed by channel columns, for `videos v JOIN channels c`.
const LISTING_COLUMNS: &str = "v.id, v.title, v.video_url, v.thumbnail_url, v.description, \
     v.category, v.channel_id, v.uploader_id, v.views, v.likes, v.dislikes, v.created_at, \
     v.updated_at, c.id, c.name, c.description, c.banner, c.logo, c.owner_id, c.subscribers, \
     c.created_at, c.updated_at";

const VIDEO_COLUMN_COUNT: usize = 13;

impl Database {
    // -- Users --

    pub fn create_user(&self, user: &NewUser<'_>) -> Result<UserRow> {
        let username = format!("{} {}", user.first_name, user.last_name);
        let now = now_timestamp();
        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO users (id, first_name, last_name, username, email, password, avatar, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
                     RETURNING {USER_COLUMNS}"
                ),
                params![
                    user.id,
                    user.first_name,
                    user.last_name,
                    username,
                    user.email,
                    user.password_hash,
                    user.avatar,
                    now,
                ],
                user_from_row,
            )?;
            Ok(row)
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                [email],
                user_from_row,
            )
            .optional()
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                [id],
                user_from_row,
            )
            .optional()
        })
    }

    /// Ids of the channels owned by a user, oldest first.
    pub fn channel_ids_for_user(&self, user_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id FROM channels WHERE owner_id = ?1 ORDER BY created_at, rowid",
            )?;
            let ids = stmt
                .query_map([user_id], |row| row.get(0))?
                .collect::<std::result::Result<Vec<String>, _>>()?;
            Ok(ids)
        })
    }

    // -- Channels --

    pub fn create_channel(&self, channel: &NewChannel<'_>) -> Result<ChannelRow> {
        let now = now_timestamp();
        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO channels (id, name, description, banner, logo, owner_id, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                     RETURNING {CHANNEL_COLUMNS}"
                ),
                params![
                    channel.id,
                    channel.name,
                    channel.description,
                    channel.banner,
                    channel.logo,
                    channel.owner_id,
                    now,
                ],
                |row| channel_from_row(row, 0),
            )?;
            Ok(row)
        })
    }

    pub fn get_channel(&self, id: &str) -> Result<Option<ChannelRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {CHANNEL_COLUMNS} FROM channels WHERE id = ?1"),
                [id],
                |row| channel_from_row(row, 0),
            )
            .optional()
        })
    }

    /// Applies the provided fields; `None` leaves a column unchanged.
    /// Returns `None` when the channel does not exist.
    pub fn update_channel(&self, id: &str, changes: &ChannelChanges) -> Result<Option<ChannelRow>> {
        let now = now_timestamp();
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "UPDATE channels SET
                        name = COALESCE(?2, name),
                        description = COALESCE(?3, description),
                        banner = COALESCE(?4, banner),
                        logo = COALESCE(?5, logo),
                        updated_at = ?6
                     WHERE id = ?1
                     RETURNING {CHANNEL_COLUMNS}"
                ),
                params![
                    id,
                    changes.name,
                    changes.description,
                    changes.banner,
                    changes.logo,
                    now,
                ],
                |row| channel_from_row(row, 0),
            )
            .optional()
        })
    }

    /// Deletes the channel together with its videos and their comments.
    pub fn delete_channel(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM channels WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    pub fn video_ids_for_channel(&self, channel_id: &str) -> Result<Vec<String>> {
        let mut map = self.video_ids_for_channels(&[channel_id.to_string()])?;
        Ok(map.remove(channel_id).unwrap_or_default())
    }

    /// Batch-fetch video ids (upload order) for a set of channel ids.
    pub fn video_ids_for_channels(&self, channel_ids: &[String]) -> Result<HashMap<String, Vec<String>>> {
        self.with_conn(|conn| child_ids(conn, "videos", "channel_id", channel_ids))
    }

    // -- Videos --

    pub fn create_video(&self, video: &NewVideo<'_>) -> Result<VideoRow> {
        let now = now_timestamp();
        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO videos (id, title, video_url, thumbnail_url, description, category, channel_id, uploader_id, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)
                     RETURNING {VIDEO_COLUMNS}"
                ),
                params![
                    video.id,
                    video.title,
                    video.video_url,
                    video.thumbnail_url,
                    video.description,
                    video.category,
                    video.channel_id,
                    video.uploader_id,
                    now,
                ],
                |row| video_from_row(row, 0),
            )?;
            Ok(row)
        })
    }

    pub fn get_video(&self, id: &str) -> Result<Option<VideoRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE id = ?1"),
                [id],
                |row| video_from_row(row, 0),
            )
            .optional()
        })
    }

    /// Adds one to a counter in a single statement and returns the updated
    /// row, or `None` when the video does not exist.
    pub fn increment_counter(&self, id: &str, counter: VideoCounter) -> Result<Option<VideoRow>> {
        let column = counter.column();
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "UPDATE videos SET {column} = {column} + 1 WHERE id = ?1 RETURNING {VIDEO_COLUMNS}"
                ),
                [id],
                |row| video_from_row(row, 0),
            )
            .optional()
        })
    }

    pub fn update_video(&self, id: &str, changes: &VideoChanges) -> Result<Option<VideoRow>> {
        let now = now_timestamp();
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "UPDATE videos SET
                        title = COALESCE(?2, title),
                        video_url = COALESCE(?3, video_url),
                        thumbnail_url = COALESCE(?4, thumbnail_url),
                        description = COALESCE(?5, description),
                        category = COALESCE(?6, category),
                        updated_at = ?7
                     WHERE id = ?1
                     RETURNING {VIDEO_COLUMNS}"
                ),
                params![
                    id,
                    changes.title,
                    changes.video_url,
                    changes.thumbnail_url,
                    changes.description,
                    changes.category,
                    now,
                ],
                |row| video_from_row(row, 0),
            )
            .optional()
        })
    }

    /// Deletes the video and its comments.
    pub fn delete_video(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM videos WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }

    /// Videos joined with their channel, newest first.
    pub fn list_videos(&self, filter: &VideoFilter) -> Result<Vec<VideoListingRow>> {
        self.with_conn(|conn| query_video_listings(conn, filter))
    }

    pub fn comment_ids_for_video(&self, video_id: &str) -> Result<Vec<String>> {
        let mut map = self.comment_ids_for_videos(&[video_id.to_string()])?;
        Ok(map.remove(video_id).unwrap_or_default())
    }

    /// Batch-fetch comment ids (posting order) for a set of video ids.
    pub fn comment_ids_for_videos(&self, video_ids: &[String]) -> Result<HashMap<String, Vec<String>>> {
        self.with_conn(|conn| child_ids(conn, "comments", "video_id", video_ids))
    }

    // -- Comments --

    pub fn create_comment(&self, comment: &NewComment<'_>) -> Result<CommentRow> {
        let now = now_timestamp();
        self.with_conn(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO comments (id, video_id, user_id, username, user_avatar, text, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
                     RETURNING {COMMENT_COLUMNS}"
                ),
                params![
                    comment.id,
                    comment.video_id,
                    comment.user_id,
                    comment.username,
                    comment.user_avatar,
                    comment.text,
                    now,
                ],
                comment_from_row,
            )?;
            Ok(row)
        })
    }

    pub fn get_comment(&self, id: &str) -> Result<Option<CommentRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = ?1"),
                [id],
                comment_from_row,
            )
            .optional()
        })
    }

    /// All comments on a video, newest first.
    pub fn comments_for_video(&self, video_id: &str) -> Result<Vec<CommentRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {COMMENT_COLUMNS} FROM comments
                 WHERE video_id = ?1
                 ORDER BY created_at DESC, rowid DESC"
            ))?;
            let rows = stmt
                .query_map([video_id], comment_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_comment_text(&self, id: &str, text: &str) -> Result<Option<CommentRow>> {
        let now = now_timestamp();
        self.with_conn(|conn| {
            conn.query_row(
                &format!(
                    "UPDATE comments SET text = ?2, updated_at = ?3 WHERE id = ?1 RETURNING {COMMENT_COLUMNS}"
                ),
                params![id, text, now],
                comment_from_row,
            )
            .optional()
        })
    }

    pub fn delete_comment(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM comments WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }
}

fn query_video_listings(conn: &Connection, filter: &VideoFilter) -> Result<Vec<VideoListingRow>> {
    let mut clauses: Vec<String> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(category) = &filter.category {
        values.push(Value::Text(category.clone()));
        clauses.push(format!("v.category = ?{}", values.len()));
    }
    if let Some(channel_id) = &filter.channel_id {
        values.push(Value::Text(channel_id.clone()));
        clauses.push(format!("v.channel_id = ?{}", values.len()));
    }
    if let Some(needle) = &filter.title_contains {
        // LIKE is case-insensitive for ASCII in SQLite
        values.push(Value::Text(escape_like(needle)));
        clauses.push(format!(
            "v.title LIKE '%' || ?{} || '%' ESCAPE '\\'",
            values.len()
        ));
    }

    let mut sql = format!(
        "SELECT {LISTING_COLUMNS} FROM videos v JOIN channels c ON c.id = v.channel_id"
    );
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY v.created_at DESC, v.rowid DESC");

    // SQLite needs a LIMIT before OFFSET; -1 means unbounded.
    values.push(Value::Integer(filter.limit.map(i64::from).unwrap_or(-1)));
    sql.push_str(&format!(" LIMIT ?{}", values.len()));
    values.push(Value::Integer(i64::from(filter.skip)));
    sql.push_str(&format!(" OFFSET ?{}", values.len()));

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), |row| {
            Ok(VideoListingRow {
                video: video_from_row(row, 0)?,
                channel: channel_from_row(row, VIDEO_COLUMN_COUNT)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Bind parameters per `IN (...)` lookup, well under SQLite's variable limit.
const ID_CHUNK: usize = 500;

/// Groups `id`s of `table` by their `parent_column`, in insertion order.
/// Every requested parent gets an entry, empty if it has no children.
fn child_ids(
    conn: &Connection,
    table: &str,
    parent_column: &str,
    parent_ids: &[String],
) -> Result<HashMap<String, Vec<String>>> {
    let mut grouped: HashMap<String, Vec<String>> = parent_ids
        .iter()
        .map(|id| (id.clone(), Vec::new()))
        .collect();

    for chunk in parent_ids.chunks(ID_CHUNK) {
        let placeholders: Vec<String> = (1..=chunk.len()).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "SELECT {parent_column}, id FROM {table} WHERE {parent_column} IN ({}) ORDER BY created_at, rowid",
            placeholders.join(", ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let pairs = stmt
            .query_map(params_from_iter(chunk.iter()), |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for (parent, id) in pairs {
            grouped.entry(parent).or_default().push(id);
        }
    }

    Ok(grouped)
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        username: row.get(3)?,
        email: row.get(4)?,
        password: row.get(5)?,
        avatar: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn channel_from_row(row: &Row<'_>, base: usize) -> rusqlite::Result<ChannelRow> {
    Ok(ChannelRow {
        id: row.get(base)?,
        name: row.get(base + 1)?,
        description: row.get(base + 2)?,
        banner: row.get(base + 3)?,
        logo: row.get(base + 4)?,
        owner_id: row.get(base + 5)?,
        subscribers: row.get(base + 6)?,
        created_at: row.get(base + 7)?,
        updated_at: row.get(base + 8)?,
    })
}

fn video_from_row(row: &Row<'_>, base: usize) -> rusqlite::Result<VideoRow> {
    Ok(VideoRow {
        id: row.get(base)?,
        title: row.get(base + 1)?,
        video_url: row.get(base + 2)?,
        thumbnail_url: row.get(base + 3)?,
        description: row.get(base + 4)?,
        category: row.get(base + 5)?,
        channel_id: row.get(base + 6)?,
        uploader_id: row.get(base + 7)?,
        views: row.get(base + 8)?,
        likes: row.get(base + 9)?,
        dislikes: row.get(base + 10)?,
        created_at: row.get(base + 11)?,
        updated_at: row.get(base + 12)?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<CommentRow> {
    Ok(CommentRow {
        id: row.get(0)?,
        video_id: row.get(1)?,
        user_id: row.get(2)?,
        username: row.get(3)?,
        user_avatar: row.get(4)?,
        text: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::is_constraint_violation;
    use uuid::Uuid;

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    fn seed_user(db: &Database, email: &str) -> UserRow {
        db.create_user(&NewUser {
            id: &new_id(),
            first_name: "Ada",
            last_name: "Lovelace",
            email,
            password_hash: "not-a-real-hash",
            avatar: "",
        })
        .unwrap()
    }

    fn seed_channel(db: &Database, owner: &UserRow) -> ChannelRow {
        db.create_channel(&NewChannel {
            id: &new_id(),
            name: "Engines",
            description: "",
            banner: "",
            logo: "",
            owner_id: &owner.id,
        })
        .unwrap()
    }

    fn seed_video(db: &Database, channel: &ChannelRow, title: &str, category: &str) -> VideoRow {
        db.create_video(&NewVideo {
            id: &new_id(),
            title,
            video_url: "https://cdn.example.com/v.mp4",
            thumbnail_url: "",
            description: "",
            category,
            channel_id: &channel.id,
            uploader_id: &channel.owner_id,
        })
        .unwrap()
    }

    #[test]
    fn create_user_derives_username() {
        let db = Database::open_in_memory().unwrap();
        let user = seed_user(&db, "ada@example.com");

        assert_eq!(user.username, "Ada Lovelace");
        let found = db.get_user_by_email("ada@example.com").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(db.get_user_by_email("nobody@example.com").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_constraint_violation() {
        let db = Database::open_in_memory().unwrap();
        seed_user(&db, "ada@example.com");

        let err = db
            .create_user(&NewUser {
                id: &new_id(),
                first_name: "Other",
                last_name: "Person",
                email: "ADA@example.com",
                password_hash: "x",
                avatar: "",
            })
            .unwrap_err();
        assert!(is_constraint_violation(&err));
    }

    #[test]
    fn channel_ids_follow_ownership() {
        let db = Database::open_in_memory().unwrap();
        let owner = seed_user(&db, "owner@example.com");
        let first = seed_channel(&db, &owner);
        let second = seed_channel(&db, &owner);

        assert_eq!(
            db.channel_ids_for_user(&owner.id).unwrap(),
            vec![first.id.clone(), second.id.clone()]
        );

        assert!(db.delete_channel(&first.id).unwrap());
        assert_eq!(db.channel_ids_for_user(&owner.id).unwrap(), vec![second.id]);
        assert!(!db.delete_channel(&first.id).unwrap());
    }

    #[test]
    fn update_channel_keeps_unset_fields() {
        let db = Database::open_in_memory().unwrap();
        let owner = seed_user(&db, "owner@example.com");
        let channel = seed_channel(&db, &owner);

        let updated = db
            .update_channel(
                &channel.id,
                &ChannelChanges {
                    description: Some("all about engines".into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Engines");
        assert_eq!(updated.description, "all about engines");
        assert!(db.update_channel("missing", &ChannelChanges::default()).unwrap().is_none());
    }

    #[test]
    fn counters_increment_by_one() {
        let db = Database::open_in_memory().unwrap();
        let owner = seed_user(&db, "owner@example.com");
        let channel = seed_channel(&db, &owner);
        let video = seed_video(&db, &channel, "Difference engine", "science");

        for expected in 1..=3 {
            let row = db.increment_counter(&video.id, VideoCounter::Views).unwrap().unwrap();
            assert_eq!(row.views, expected);
        }
        let row = db.increment_counter(&video.id, VideoCounter::Likes).unwrap().unwrap();
        assert_eq!((row.views, row.likes, row.dislikes), (3, 1, 0));

        assert!(db.increment_counter("missing", VideoCounter::Dislikes).unwrap().is_none());
    }

    #[test]
    fn list_videos_filters_and_orders_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let owner = seed_user(&db, "owner@example.com");
        let channel = seed_channel(&db, &owner);
        let a = seed_video(&db, &channel, "First science", "science");
        seed_video(&db, &channel, "Some music", "music");
        let c = seed_video(&db, &channel, "Second science", "science");

        let science = db
            .list_videos(&VideoFilter {
                category: Some("science".into()),
                ..Default::default()
            })
            .unwrap();
        let ids: Vec<_> = science.iter().map(|r| r.video.id.clone()).collect();
        assert_eq!(ids, vec![c.id.clone(), a.id.clone()]);
        assert!(science.iter().all(|r| r.channel.id == channel.id));

        let page = db
            .list_videos(&VideoFilter {
                skip: 1,
                limit: Some(1),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].video.title, "Some music");
    }

    #[test]
    fn title_search_is_case_insensitive_and_literal() {
        let db = Database::open_in_memory().unwrap();
        let owner = seed_user(&db, "owner@example.com");
        let channel = seed_channel(&db, &owner);
        seed_video(&db, &channel, "Rust in 100% of cases", "tech");
        seed_video(&db, &channel, "Rusty bikes", "sport");

        let search = |needle: &str| {
            db.list_videos(&VideoFilter {
                title_contains: Some(needle.into()),
                ..Default::default()
            })
            .unwrap()
            .len()
        };

        assert_eq!(search("rust"), 2);
        assert_eq!(search("100%"), 1);
        assert_eq!(search("_"), 0);
    }

    #[test]
    fn deleting_video_cascades_to_comments() {
        let db = Database::open_in_memory().unwrap();
        let owner = seed_user(&db, "owner@example.com");
        let channel = seed_channel(&db, &owner);
        let video = seed_video(&db, &channel, "Loom", "tech");
        let comment = db
            .create_comment(&NewComment {
                id: &new_id(),
                video_id: &video.id,
                user_id: &owner.id,
                username: &owner.username,
                user_avatar: "",
                text: "first",
            })
            .unwrap();

        assert_eq!(db.comment_ids_for_video(&video.id).unwrap(), vec![comment.id.clone()]);
        assert_eq!(db.video_ids_for_channel(&channel.id).unwrap(), vec![video.id.clone()]);

        assert!(db.delete_video(&video.id).unwrap());
        assert!(db.get_video(&video.id).unwrap().is_none());
        assert!(db.get_comment(&comment.id).unwrap().is_none());
        assert!(db.video_ids_for_channel(&channel.id).unwrap().is_empty());
    }

    #[test]
    fn comments_for_video_newest_first() {
        let db = Database::open_in_memory().unwrap();
        let owner = seed_user(&db, "owner@example.com");
        let channel = seed_channel(&db, &owner);
        let video = seed_video(&db, &channel, "Loom", "tech");

        for text in ["one", "two", "three"] {
            db.create_comment(&NewComment {
                id: &new_id(),
                video_id: &video.id,
                user_id: &owner.id,
                username: &owner.username,
                user_avatar: "",
                text,
            })
            .unwrap();
        }

        let texts: Vec<_> = db
            .comments_for_video(&video.id)
            .unwrap()
            .into_iter()
            .map(|c| c.text)
            .collect();
        assert_eq!(texts, vec!["three", "two", "one"]);
    }

    #[test]
    fn child_id_lookup_spans_many_parents() {
        let db = Database::open_in_memory().unwrap();
        let owner = seed_user(&db, "owner@example.com");
        let channel = seed_channel(&db, &owner);

        let mut video_ids = Vec::new();
        let mut expected = Vec::new();
        for title in ["one", "two", "three"] {
            let video = seed_video(&db, &channel, title, "tech");
            let comment = db
                .create_comment(&NewComment {
                    id: &new_id(),
                    video_id: &video.id,
                    user_id: &owner.id,
                    username: &owner.username,
                    user_avatar: "",
                    text: title,
                })
                .unwrap();
            video_ids.push(video.id.clone());
            expected.push((video.id, comment.id));
        }

        // More ids than SQLite accepts as bind variables in one statement;
        // one real video is moved to the far end of the list
        video_ids.extend((0..33_000).map(|_| new_id()));
        let last = video_ids.len() - 1;
        video_ids.swap(1, last);

        let grouped = db.comment_ids_for_videos(&video_ids).unwrap();
        assert_eq!(grouped.len(), video_ids.len());
        for (video_id, comment_id) in expected {
            assert_eq!(grouped[&video_id], vec![comment_id]);
        }
        assert!(grouped[&video_ids[1]].is_empty());
    }

    #[test]
    fn list_videos_honours_large_limits() {
        let db = Database::open_in_memory().unwrap();
        let owner = seed_user(&db, "owner@example.com");
        let channel = seed_channel(&db, &owner);
        for i in 0..120 {
            seed_video(&db, &channel, &format!("Episode {}", i), "series");
        }

        let page = |skip, limit| {
            db.list_videos(&VideoFilter {
                skip,
                limit,
                ..Default::default()
            })
            .unwrap()
        };

        assert_eq!(page(0, Some(100)).len(), 100);
        assert_eq!(page(100, Some(100)).len(), 20);
        assert_eq!(page(0, None).len(), 120);
        assert_eq!(page(0, Some(100))[0].video.title, "Episode 119");
    }

    #[test]
    fn comment_on_missing_video_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        let owner = seed_user(&db, "owner@example.com");

        let result = db.create_comment(&NewComment {
            id: &new_id(),
            video_id: "missing",
            user_id: &owner.id,
            username: &owner.username,
            user_avatar: "",
            text: "hello",
        });
        assert!(result.is_err());
    }
}
