use std::collections::HashMap;

use chrono::Utc;
use glimpse_types::{Comment, LikeState, Post, UserDetail};
use ratatui::widgets::ListState;
use tui_textarea::TextArea;

use crate::api::ApiClient;
use crate::session::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Navigation, // Browsing the feed, shortcuts active
    Typing,     // In the comment input, shortcuts disabled
}

/// Everything the feed screen holds between renders. Rebuilt from
/// scratch on every load; nothing here survives a reload.
pub struct FeedState {
    pub posts: Vec<Post>,
    /// Comments keyed by owning post id.
    pub comments: HashMap<i64, Vec<Comment>>,
    /// Like state keyed by post id; one entry per fetched post.
    pub likes: HashMap<i64, LikeState>,
    /// Per-load lookup cache resolving commenter ids to names.
    pub user_details: HashMap<i64, UserDetail>,
    /// True until the first successful commit; stays true forever if the
    /// load fails.
    pub loading: bool,
    pub list_state: ListState,
    /// Flag to trigger the actual load after the UI has rendered the
    /// loading state.
    pub pending_load: bool,
}

impl FeedState {
    pub fn new() -> Self {
        Self {
            posts: Vec::new(),
            comments: HashMap::new(),
            likes: HashMap::new(),
            user_details: HashMap::new(),
            loading: true,
            list_state: ListState::default(),
            pending_load: false,
        }
    }

    /// Id of the post under the cursor, if any.
    pub fn selected_post_id(&self) -> Option<i64> {
        self.list_state
            .selected()
            .and_then(|i| self.posts.get(i))
            .map(|p| p.id)
    }

    pub fn comment_count(&self, post_id: i64) -> usize {
        self.comments.get(&post_id).map(|c| c.len()).unwrap_or(0)
    }
}

/// Comment composer modal, scoped to one post while open.
pub struct ComposerState {
    /// The post the modal is scoped to; `None` means closed.
    pub selected_post: Option<i64>,
    pub textarea: TextArea<'static>,
    pub ids: CommentIdSeq,
}

impl ComposerState {
    pub fn new() -> Self {
        Self {
            selected_post: None,
            textarea: TextArea::default(),
            ids: CommentIdSeq::default(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.selected_post.is_some()
    }

    pub fn get_content(&self) -> String {
        self.textarea.lines().join("\n")
    }
}

/// Client-side comment id generator: millisecond timestamps, bumped past
/// the previous value so ids stay strictly increasing within a session.
#[derive(Debug, Default)]
pub struct CommentIdSeq {
    last: i64,
}

impl CommentIdSeq {
    pub fn next(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last = now.max(self.last + 1);
        self.last
    }
}

/// Main application state
pub struct App {
    pub running: bool,
    pub api_client: ApiClient,
    /// Credential storage, injected at construction; the composer
    /// resolves the acting user through it on submit.
    pub session_store: SessionStore,
    pub input_mode: InputMode,
    pub feed: FeedState,
    pub composer: ComposerState,
    pub cancel: crate::app::loader::CancelFlag,
    pub log_config: crate::logging::LogConfig,
}
