use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Custom serde module for DateTime to ensure RFC3339 string format
mod datetime_format {
    use chrono::{DateTime, Utc};
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = date.to_rfc3339();
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<DateTime<Utc>>().map_err(serde::de::Error::custom)
    }
}

/// A feed entry. Immutable once fetched.
///
/// The backend speaks camelCase; `imageUrl` is singular on the wire even
/// though it carries the full carousel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub content: String,
    pub user_name: String,
    pub user_image_url: String,
    #[serde(rename = "imageUrl", default)]
    pub image_urls: Vec<String>,
}

/// A comment as the backend returns it. `userName` is denormalized and
/// not guaranteed to be present on older rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRaw {
    pub id: i64,
    pub post_id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_name: Option<String>,
    pub content: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

/// A normalized comment held in app state. Created either from a wire
/// row or locally on submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub user_id: Option<i64>,
    pub user_name: String,
    pub content: String,
    #[serde(with = "datetime_format")]
    pub created_at: DateTime<Utc>,
}

impl From<CommentRaw> for Comment {
    fn from(raw: CommentRaw) -> Self {
        Self {
            id: raw.id,
            post_id: raw.post_id,
            user_id: raw.user_id,
            user_name: raw.user_name.unwrap_or_default(),
            content: raw.content,
            created_at: raw.created_at,
        }
    }
}

/// Display details for a commenting user, keyed by user id in the
/// per-load lookup cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    pub first_name: String,
    pub last_name: String,
}

impl UserDetail {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Like data as the backend returns it: arrays, of which exactly the
/// first entry describes the requested post. The endpoint's multi-row
/// shape is its contract, not ours to generalize.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeSummary {
    pub like_counts: Vec<i64>,
    pub liked_posts: Vec<bool>,
}

impl LikeSummary {
    /// Collapse the wire arrays into the single relevant entry.
    /// Missing entries default to an un-liked, zero-count state.
    pub fn first_entry(&self) -> LikeState {
        LikeState {
            count: self.like_counts.first().copied().unwrap_or(0),
            liked: self.liked_posts.first().copied().unwrap_or(false),
        }
    }
}

/// Per-post like state for the acting user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LikeState {
    pub liked: bool,
    pub count: i64,
}
