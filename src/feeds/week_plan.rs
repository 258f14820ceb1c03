//! Demo week plan built from JSONPlaceholder posts.

use serde::Serialize;
use serde_json::Value;

use super::{FeedClient, FeedError};

/// Weekday labels for the five expected posts.
pub const DAY_LABELS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

const TITLE_LIMIT: usize = 70;
const BODY_LIMIT: usize = 140;

/// One card of the week-plan panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekPlanItem {
    pub day: String,
    pub title: String,
    pub body: String,
}

/// Fetch the demo posts and map them onto weekday cards.
pub async fn load_week_plan(
    client: &FeedClient,
    url: &str,
) -> Result<Vec<WeekPlanItem>, FeedError> {
    let payload = client.get_json(url).await?;
    let posts = payload
        .as_array()
        .ok_or_else(|| FeedError::Malformed("expected a JSON array of posts".to_string()))?;
    Ok(build_week_plan(posts))
}

/// Zip posts with the weekday labels. Posts beyond the fifth get a plain
/// `Day N` label; the feed query already asks for five, so overflow only
/// happens if the demo endpoint misbehaves.
pub fn build_week_plan(posts: &[Value]) -> Vec<WeekPlanItem> {
    posts
        .iter()
        .enumerate()
        .map(|(idx, post)| {
            let title = post.get("title").and_then(Value::as_str).unwrap_or("");
            let body = post.get("body").and_then(Value::as_str).unwrap_or("");
            WeekPlanItem {
                day: day_label(idx),
                title: truncate_chars(title, TITLE_LIMIT),
                // Trailing ellipsis is unconditional, as on the original
                // kiosk page, even when nothing was cut.
                body: format!("{}…", truncate_chars(body, BODY_LIMIT)),
            }
        })
        .collect()
}

fn day_label(idx: usize) -> String {
    match DAY_LABELS.get(idx) {
        Some(label) => (*label).to_string(),
        None => format!("Day {}", idx + 1),
    }
}

/// Truncate to at most `limit` characters on a char boundary.
fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
