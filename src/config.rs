use std::path::PathBuf;
use std::time::Duration;

/// Base URL of the Wikimedia "on this day" feed; month/day get appended.
///
/// Docs: https://api.wikimedia.org/wiki/Feed_API/Reference/On_this_day
pub const BIRTHDAYS_FEED_BASE: &str =
    "https://api.wikimedia.org/feed/v1/wikipedia/en/onthisday/births";

/// JSONPlaceholder demo posts, capped at five by the query parameter.
pub const WEEK_PLAN_FEED_URL: &str = "https://jsonplaceholder.typicode.com/posts?_limit=5";

/// Runtime configuration for the kiosk.
///
/// Built once at startup from CLI flags and passed to each component; no
/// component reads shared mutable settings.
#[derive(Debug, Clone)]
pub struct KioskConfig {
    /// Path of the poster manifest JSON document.
    pub posters_manifest: PathBuf,
    /// Directory poster image files are resolved against.
    pub posters_dir: PathBuf,
    /// Delay between poster display ticks.
    pub poster_interval: Duration,
    /// How often the poster manifest is re-read and rotation restarted.
    pub manifest_refresh: Duration,
    /// Clock repaint cadence.
    pub clock_interval: Duration,
    /// Birthday feed refresh cadence.
    pub birthdays_refresh: Duration,
    /// Week-plan feed refresh cadence.
    pub week_plan_refresh: Duration,
    /// Birthday feed base URL (month/day appended per request).
    pub birthdays_url: String,
    /// Week-plan feed URL, already carrying its limit parameter.
    pub week_plan_url: String,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            posters_manifest: PathBuf::from("posters/posters.json"),
            posters_dir: PathBuf::from("posters/"),
            poster_interval: Duration::from_secs(10),
            manifest_refresh: Duration::from_secs(5 * 60),
            clock_interval: Duration::from_secs(10),
            birthdays_refresh: Duration::from_secs(60 * 60),
            week_plan_refresh: Duration::from_secs(10 * 60),
            birthdays_url: BIRTHDAYS_FEED_BASE.to_string(),
            week_plan_url: WEEK_PLAN_FEED_URL.to_string(),
        }
    }
}
