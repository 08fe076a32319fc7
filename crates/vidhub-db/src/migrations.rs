use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            first_name  TEXT NOT NULL,
            last_name   TEXT NOT NULL,
            username    TEXT NOT NULL,
            email       TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password    TEXT NOT NULL,
            avatar      TEXT NOT NULL DEFAULT '',
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS channels (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            banner      TEXT NOT NULL DEFAULT '',
            logo        TEXT NOT NULL DEFAULT '',
            owner_id    TEXT NOT NULL REFERENCES users(id),
            subscribers INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_channels_owner
            ON channels(owner_id, created_at);

        CREATE TABLE IF NOT EXISTS videos (
            id              TEXT PRIMARY KEY,
            title           TEXT NOT NULL,
            video_url       TEXT NOT NULL,
            thumbnail_url   TEXT NOT NULL DEFAULT '',
            description     TEXT NOT NULL DEFAULT '',
            category        TEXT NOT NULL,
            channel_id      TEXT NOT NULL REFERENCES channels(id) ON DELETE CASCADE,
            uploader_id     TEXT NOT NULL REFERENCES users(id),
            views           INTEGER NOT NULL DEFAULT 0,
            likes           INTEGER NOT NULL DEFAULT 0,
            dislikes        INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL,
            updated_at      TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_videos_channel
            ON videos(channel_id, created_at);

        CREATE INDEX IF NOT EXISTS idx_videos_category
            ON videos(category, created_at);

        CREATE TABLE IF NOT EXISTS comments (
            id          TEXT PRIMARY KEY,
            video_id    TEXT NOT NULL REFERENCES videos(id) ON DELETE CASCADE,
            user_id     TEXT NOT NULL REFERENCES users(id),
            username    TEXT NOT NULL,
            user_avatar TEXT NOT NULL DEFAULT '',
            text        TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_comments_video
            ON comments(video_id, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
