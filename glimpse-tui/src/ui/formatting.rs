use std::collections::HashMap;

use chrono::{DateTime, Utc};
use glimpse_types::{Comment, UserDetail};

/// Resolve a comment's author label from the per-load lookup cache.
/// Unresolvable authors render as a fallback label, not an error.
pub fn commenter_label(comment: &Comment, details: &HashMap<i64, UserDetail>) -> String {
    comment
        .user_id
        .and_then(|id| details.get(&id))
        .map(|d| d.full_name())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "Unknown user".to_string())
}

/// Compact relative age for comment rows.
pub fn relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);

    if elapsed.num_seconds() < 60 {
        "now".to_string()
    } else if elapsed.num_minutes() < 60 {
        format!("{}m", elapsed.num_minutes())
    } else if elapsed.num_hours() < 24 {
        format!("{}h", elapsed.num_hours())
    } else if elapsed.num_days() < 7 {
        format!("{}d", elapsed.num_days())
    } else {
        timestamp.format("%b %d").to_string()
    }
}

/// Truncate to a display width, appending an ellipsis when cut.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let cut: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}
