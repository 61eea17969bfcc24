use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glimpse_types::{Comment, LikeState, Post, UserDetail};

use crate::api::{ApiError, ApiResult, FeedApi};

/// Liveness guard for the sequential load. The event loop sets it on
/// teardown; every step of the loop consults it, so a cancelled load
/// never reaches the commit.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    fn check(&self) -> ApiResult<()> {
        if self.is_cancelled() {
            Err(ApiError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Everything one load cycle produces, committed into app state in one
/// step or not at all.
#[derive(Debug, Default)]
pub struct FeedSnapshot {
    pub posts: Vec<Post>,
    pub comments: HashMap<i64, Vec<Comment>>,
    pub likes: HashMap<i64, LikeState>,
    pub user_details: HashMap<i64, UserDetail>,
}

/// Fetch and aggregate the whole feed.
///
/// Posts first, then per post (in sequence, not fan-out) its comments
/// and like data, then one batched user-detail lookup for every
/// commenter seen. Any error aborts the whole load; the caller decides
/// what to do with the screen.
pub async fn aggregate_feed<C: FeedApi + ?Sized>(
    client: &C,
    cancel: &CancelFlag,
) -> ApiResult<FeedSnapshot> {
    cancel.check()?;
    let posts = client.fetch_all_posts().await?;

    let mut comments: HashMap<i64, Vec<Comment>> = HashMap::new();
    let mut likes: HashMap<i64, LikeState> = HashMap::new();
    let mut commenter_ids: BTreeSet<i64> = BTreeSet::new();

    for post in &posts {
        cancel.check()?;
        let raw_comments = client.fetch_comments(post.id).await?;

        cancel.check()?;
        let summary = client.fetch_likes_data(post.id).await?;
        likes.insert(post.id, summary.first_entry());

        let normalized: Vec<Comment> = raw_comments.into_iter().map(Comment::from).collect();
        for comment in &normalized {
            if let Some(user_id) = comment.user_id {
                commenter_ids.insert(user_id);
            }
        }
        comments.insert(post.id, normalized);
    }

    cancel.check()?;
    let ids: Vec<i64> = commenter_ids.into_iter().collect();
    let user_details = client.fetch_user_details(&ids).await?;

    cancel.check()?;
    Ok(FeedSnapshot {
        posts,
        comments,
        likes,
        user_details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use glimpse_types::{CommentRaw, LikeSummary};

    /// Scripted remote services for exercising the load loop.
    struct StubFeed {
        posts: Vec<Post>,
        comments: HashMap<i64, Vec<CommentRaw>>,
        likes: HashMap<i64, LikeSummary>,
        details: HashMap<i64, UserDetail>,
        fail_comments_for: Option<i64>,
    }

    impl StubFeed {
        fn single_post_scenario() -> Self {
            let post = make_post(1);
            let comments = vec![make_raw_comment(10, 1, 3), make_raw_comment(11, 1, 4)];

            let mut stub = Self {
                posts: vec![post],
                comments: HashMap::from([(1, comments)]),
                likes: HashMap::from([(
                    1,
                    LikeSummary {
                        like_counts: vec![5],
                        liked_posts: vec![false],
                    },
                )]),
                details: HashMap::new(),
                fail_comments_for: None,
            };
            stub.details.insert(3, make_detail("Ana"));
            stub.details.insert(4, make_detail("Ben"));
            stub
        }
    }

    #[async_trait::async_trait]
    impl FeedApi for StubFeed {
        async fn fetch_all_posts(&self) -> ApiResult<Vec<Post>> {
            Ok(self.posts.clone())
        }

        async fn fetch_comments(&self, post_id: i64) -> ApiResult<Vec<CommentRaw>> {
            if self.fail_comments_for == Some(post_id) {
                return Err(ApiError::Api("comments unavailable".to_string()));
            }
            Ok(self.comments.get(&post_id).cloned().unwrap_or_default())
        }

        async fn fetch_likes_data(&self, post_id: i64) -> ApiResult<LikeSummary> {
            Ok(self.likes.get(&post_id).cloned().unwrap_or(LikeSummary {
                like_counts: vec![],
                liked_posts: vec![],
            }))
        }

        async fn toggle_like(&self, _post_id: i64) -> ApiResult<()> {
            Ok(())
        }

        async fn fetch_user_details(
            &self,
            user_ids: &[i64],
        ) -> ApiResult<HashMap<i64, UserDetail>> {
            Ok(user_ids
                .iter()
                .filter_map(|id| self.details.get(id).map(|d| (*id, d.clone())))
                .collect())
        }
    }

    fn make_post(id: i64) -> Post {
        Post {
            id,
            content: format!("post {}", id),
            user_name: "ana".to_string(),
            user_image_url: "https://cdn.example/u/1.png".to_string(),
            image_urls: vec![],
        }
    }

    fn make_raw_comment(id: i64, post_id: i64, user_id: i64) -> CommentRaw {
        CommentRaw {
            id,
            post_id,
            user_id: Some(user_id),
            user_name: Some("someone".to_string()),
            content: "hi".to_string(),
            created_at: Utc::now(),
        }
    }

    fn make_detail(first: &str) -> UserDetail {
        UserDetail {
            first_name: first.to_string(),
            last_name: "Test".to_string(),
        }
    }

    #[tokio::test]
    async fn aggregates_single_post_scenario() {
        let stub = StubFeed::single_post_scenario();
        let snapshot = aggregate_feed(&stub, &CancelFlag::new()).await.unwrap();

        assert_eq!(snapshot.posts.len(), 1);
        assert_eq!(
            snapshot.likes.get(&1),
            Some(&LikeState {
                liked: false,
                count: 5
            })
        );
        assert_eq!(snapshot.comments.get(&1).unwrap().len(), 2);
        assert_eq!(snapshot.user_details.len(), 2);
    }

    #[tokio::test]
    async fn one_like_entry_per_post() {
        let mut stub = StubFeed::single_post_scenario();
        stub.posts = vec![make_post(1), make_post(2), make_post(3)];

        let snapshot = aggregate_feed(&stub, &CancelFlag::new()).await.unwrap();

        assert_eq!(snapshot.likes.len(), 3);
        assert_eq!(snapshot.comments.len(), 3);
        for post in &snapshot.posts {
            assert!(snapshot.likes.contains_key(&post.id));
            assert!(snapshot.comments.contains_key(&post.id));
        }
        // Posts without like rows fall back to the default entry
        assert_eq!(snapshot.likes.get(&2), Some(&LikeState::default()));
    }

    #[tokio::test]
    async fn any_failure_aborts_the_whole_load() {
        let mut stub = StubFeed::single_post_scenario();
        stub.posts = vec![make_post(1), make_post(2)];
        stub.fail_comments_for = Some(2);

        let result = aggregate_feed(&stub, &CancelFlag::new()).await;
        assert!(matches!(result, Err(ApiError::Api(_))));
    }

    #[tokio::test]
    async fn cancelled_load_commits_nothing() {
        let stub = StubFeed::single_post_scenario();
        let cancel = CancelFlag::new();
        cancel.cancel();

        let result = aggregate_feed(&stub, &cancel).await;
        assert!(matches!(result, Err(ApiError::Cancelled)));
    }
}
