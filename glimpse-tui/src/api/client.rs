use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use super::{ApiError, ApiResult};
use glimpse_types::{CommentRaw, LikeSummary, Post, UserDetail};

/// The remote feed services the client sequences. The feed loader and
/// the tests program against this trait; `ApiClient` is the production
/// implementation.
#[async_trait]
pub trait FeedApi {
    async fn fetch_all_posts(&self) -> ApiResult<Vec<Post>>;
    async fn fetch_comments(&self, post_id: i64) -> ApiResult<Vec<CommentRaw>>;
    async fn fetch_likes_data(&self, post_id: i64) -> ApiResult<LikeSummary>;
    async fn toggle_like(&self, post_id: i64) -> ApiResult<()>;
    async fn fetch_user_details(&self, user_ids: &[i64]) -> ApiResult<HashMap<i64, UserDetail>>;
}

/// API client for communicating with the Glimpse backend
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session_token: Option<String>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            session_token: None,
        }
    }

    /// Set the session token for authenticated requests
    pub fn set_session_token(&mut self, token: Option<String>) {
        self.session_token = token;
    }

    /// Helper to add the bearer token to a request if available
    fn add_auth_header(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.session_token {
            req.header("Authorization", format!("Bearer {}", token))
        } else {
            req
        }
    }

    /// Helper to handle API responses
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ApiResult<T> {
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            // Clean up HTML error messages (e.g., from nginx 404 pages)
            let clean_error = if error_text.contains("<html>") || error_text.contains("<!DOCTYPE") {
                format!(
                    "Server returned {} error. Please check the server URL.",
                    status.as_u16()
                )
            } else {
                error_text
            };

            match status.as_u16() {
                404 => Err(ApiError::NotFound(clean_error)),
                401 => Err(ApiError::Unauthorized(clean_error)),
                400 => Err(ApiError::BadRequest(clean_error)),
                _ => Err(ApiError::Api(clean_error)),
            }
        }
    }
}

#[async_trait]
impl FeedApi for ApiClient {
    /// Get the full feed
    async fn fetch_all_posts(&self) -> ApiResult<Vec<Post>> {
        let url = format!("{}/posts", self.base_url);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Get the comments for one post
    async fn fetch_comments(&self, post_id: i64) -> ApiResult<Vec<CommentRaw>> {
        let url = format!("{}/posts/{}/comments", self.base_url, post_id);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Get like data for one post. The endpoint answers with arrays; only
    /// the first entry of each describes the requested post.
    async fn fetch_likes_data(&self, post_id: i64) -> ApiResult<LikeSummary> {
        let url = format!("{}/posts/{}/likes", self.base_url, post_id);
        let req = self.add_auth_header(self.client.get(&url));
        let response = req.send().await?;
        self.handle_response(response).await
    }

    /// Flip the acting user's like on a post
    async fn toggle_like(&self, post_id: i64) -> ApiResult<()> {
        let url = format!("{}/posts/{}/like", self.base_url, post_id);
        let req = self.add_auth_header(self.client.post(&url));
        let response = req.send().await?;
        response.error_for_status()?;
        Ok(())
    }

    /// Resolve a batch of user ids to display details in one call
    async fn fetch_user_details(
        &self,
        user_ids: &[i64],
    ) -> ApiResult<HashMap<i64, UserDetail>> {
        let url = format!("{}/users/details", self.base_url);
        let request_body = serde_json::json!({ "userIds": user_ids });
        let req = self.add_auth_header(self.client.post(&url).json(&request_body));
        let response = req.send().await?;
        self.handle_response(response).await
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        let base_url = std::env::var("GLIMPSE_SERVER_URL")
            .unwrap_or_else(|_| crate::config::DEFAULT_SERVER_URL.to_string());
        Self::new(base_url)
    }
}
