use anyhow::Result;
use chrono::Utc;
use glimpse_types::{Comment, LikeState};
use tui_textarea::TextArea;

use crate::api::{ApiClient, ApiError, FeedApi};
use crate::auth;
use crate::session::SessionStore;

pub mod handlers;
pub mod loader;
pub mod state;
pub use state::*;

#[cfg(test)]
mod tests;

impl App {
    pub fn new(api_client: ApiClient, session_store: SessionStore) -> Self {
        Self {
            running: true,
            api_client,
            session_store,
            input_mode: InputMode::Navigation,
            feed: FeedState::new(),
            composer: ComposerState::new(),
            cancel: loader::CancelFlag::new(),
            log_config: crate::logging::LogConfig::default(),
        }
    }

    /// Stop the event loop and cancel any in-flight load.
    pub fn quit(&mut self) {
        self.running = false;
        self.cancel.cancel();
    }

    /// Move the feed cursor down
    pub fn select_next(&mut self) {
        if self.feed.posts.is_empty() {
            return;
        }
        let next = match self.feed.list_state.selected() {
            Some(i) if i + 1 < self.feed.posts.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.feed.list_state.select(Some(next));
    }

    /// Move the feed cursor up
    pub fn select_previous(&mut self) {
        if self.feed.posts.is_empty() {
            return;
        }
        let previous = match self.feed.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.feed.list_state.select(Some(previous));
    }

    /// Open the comment modal for the selected post
    pub fn open_comment_modal(&mut self) {
        if let Some(post_id) = self.feed.selected_post_id() {
            self.composer.selected_post = Some(post_id);
            self.composer.textarea = TextArea::default();
            self.input_mode = InputMode::Typing;
        }
    }

    /// Close the comment modal. Clears the input and the selection;
    /// comments already added stay in state.
    pub fn close_comment_modal(&mut self) {
        self.composer.selected_post = None;
        self.composer.textarea = TextArea::default();
        self.input_mode = InputMode::Navigation;
    }

    /// Rebuild the whole feed from scratch on the next loop iteration.
    pub fn request_reload(&mut self) {
        self.feed.loading = true;
        self.feed.pending_load = true;
    }

    /// Run one load cycle and commit the snapshot.
    ///
    /// A failed load is logged and leaves the screen on the loading
    /// indicator; there is no retry and no user-facing error surface.
    pub async fn load_feed(&mut self) -> Result<()> {
        self.feed.loading = true;

        // Yield so the loading frame renders before the fetches start
        tokio::task::yield_now().await;

        log_api_call!(self.log_config, "load_feed: start");

        match loader::aggregate_feed(&self.api_client, &self.cancel).await {
            Ok(snapshot) => {
                let has_posts = !snapshot.posts.is_empty();
                self.feed.posts = snapshot.posts;
                self.feed.comments = snapshot.comments;
                self.feed.likes = snapshot.likes;
                self.feed.user_details = snapshot.user_details;
                if has_posts {
                    self.feed.list_state.select(Some(0));
                } else {
                    self.feed.list_state.select(None);
                }
                self.feed.loading = false;
                log_api_call!(
                    self.log_config,
                    "load_feed: committed {} posts",
                    self.feed.posts.len()
                );
            }
            Err(ApiError::Cancelled) => {
                log::debug!("Feed load cancelled before commit");
            }
            Err(e) => {
                log::error!("Failed to load feed: {}", e);
            }
        }

        Ok(())
    }

    /// Flip the local like state for a post. Returns the new state, or
    /// `None` when the post has no like entry (unknown id).
    pub fn apply_like_toggle(&mut self, post_id: i64) -> Option<LikeState> {
        let entry = self.feed.likes.get_mut(&post_id)?;
        entry.liked = !entry.liked;
        entry.count += if entry.liked { 1 } else { -1 };
        Some(*entry)
    }

    /// Toggle like on the selected post and persist the flip remotely.
    /// A remote failure is logged; the local flip stays.
    pub async fn toggle_selected_like(&mut self) -> Result<()> {
        let Some(post_id) = self.feed.selected_post_id() else {
            return Ok(());
        };
        let Some(state) = self.apply_like_toggle(post_id) else {
            return Ok(());
        };

        log_api_call!(
            self.log_config,
            "toggle_like: post={} liked={} count={}",
            post_id,
            state.liked,
            state.count
        );

        if let Err(e) = self.api_client.toggle_like(post_id).await {
            log::error!("Failed to persist like for post {}: {}", post_id, e);
        }

        Ok(())
    }

    /// Submit the composer content as a comment on the scoped post.
    ///
    /// The comment is constructed locally and appended to state; no
    /// comment-creation endpoint exists on the backend today. On any
    /// validation failure the modal stays open with the input unchanged.
    pub fn submit_comment(&mut self) {
        let content = self.composer.get_content();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return;
        }

        let identity = match auth::resolve_identity(&self.session_store) {
            Ok(identity) => identity,
            Err(e) => {
                log::error!("Cannot attribute comment: {}", e);
                return;
            }
        };

        let Some(post_id) = self.composer.selected_post else {
            log::error!("Comment submitted with no post selected");
            return;
        };

        let comment = Comment {
            id: self.composer.ids.next(),
            post_id,
            user_id: Some(identity.user_id),
            user_name: identity.display_name,
            content: trimmed.to_string(),
            created_at: Utc::now(),
        };

        self.feed.comments.entry(post_id).or_default().push(comment);

        // Keep the modal open for follow-up comments, input cleared
        self.composer.textarea = TextArea::default();
    }
}
