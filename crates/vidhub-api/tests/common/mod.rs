//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use vidhub_api::auth::{AppStateInner, create_token};
use vidhub_api::routes;
use vidhub_db::Database;

pub const JWT_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
}

/// A registered user and a valid token for them.
pub struct TestUser {
    pub id: String,
    pub email: String,
    pub token: String,
}

impl TestApp {
    pub fn new() -> Self {
        let db = Database::open_in_memory().expect("Failed to open in-memory database");
        let state = Arc::new(AppStateInner {
            db,
            jwt_secret: JWT_SECRET.to_string(),
        });
        Self {
            router: routes::router(state),
        }
    }

    /// Send a request and return the status plus the decoded JSON body
    /// (`Value::Null` for an empty or non-JSON body).
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }

        let body = match body {
            Some(v) => {
                builder = builder.header("Content-Type", "application/json");
                Body::from(serde_json::to_vec(&v).unwrap())
            }
            None => Body::empty(),
        };

        let request = builder.body(body).unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Register a user and mint a token for them directly, skipping a
    /// second password hash through the login route.
    pub async fn register(&self, email: &str) -> TestUser {
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/register",
                Some(json!({
                    "firstName": "Test",
                    "lastName": "User",
                    "email": email,
                    "password": "correct-horse",
                })),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let id = body["user"]["userId"].as_str().unwrap().to_string();
        let uuid: Uuid = id.parse().unwrap();
        let token = create_token(JWT_SECRET, uuid, email).unwrap();

        TestUser {
            id,
            email: email.to_string(),
            token,
        }
    }

    pub async fn create_channel(&self, user: &TestUser, name: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/channel",
                Some(json!({ "channelName": name, "description": "test channel" })),
                Some(&user.token),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create channel failed: {}", body);
        body["channel"]["channelId"].as_str().unwrap().to_string()
    }

    pub async fn upload_video(
        &self,
        user: &TestUser,
        channel_id: &str,
        title: &str,
        category: &str,
    ) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/videos",
                Some(json!({
                    "title": title,
                    "videoUrl": "https://cdn.example.com/video.mp4",
                    "category": category,
                    "channelId": channel_id,
                })),
                Some(&user.token),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "upload failed: {}", body);
        body["video"]["videoId"].as_str().unwrap().to_string()
    }

    pub async fn add_comment(&self, user: &TestUser, video_id: &str, text: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/comments",
                Some(json!({ "videoId": video_id, "text": text })),
                Some(&user.token),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "add comment failed: {}", body);
        body["comment"]["commentId"].as_str().unwrap().to_string()
    }
}

/// Extract a JSON array of id strings.
pub fn string_ids(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
