//! "On this day" birthday facts from the Wikimedia feed.

use chrono::{Datelike, NaiveDate};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use serde_json::Value;

use super::{FeedClient, FeedError};

/// How many facts the widget shows at most.
pub const SAMPLE_SIZE: usize = 6;

/// One public birthday fact for the current calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BirthdayFact {
    pub year: i64,
    pub text: String,
}

impl BirthdayFact {
    /// The list line shown on screen.
    pub fn to_line(&self) -> String {
        format!("{} – {}", self.year, self.text)
    }
}

/// Fetch the births feed for `today` and return up to [`SAMPLE_SIZE`]
/// randomly chosen display lines. An empty result means the feed had no
/// usable entries for the day, not an error.
pub async fn load_birthdays(
    client: &FeedClient,
    base_url: &str,
    today: NaiveDate,
) -> Result<Vec<String>, FeedError> {
    let url = format!("{}/{:02}/{:02}", base_url, today.month(), today.day());
    let payload = client.get_json(&url).await?;

    let facts = extract_births(&payload);
    let picked = sample_facts(&facts, SAMPLE_SIZE, &mut rand::thread_rng());
    Ok(picked.iter().map(|f| f.to_line()).collect())
}

/// Pull birthday facts out of the feed payload.
///
/// A missing or non-array `births` field yields an empty list; entries
/// without a numeric `year` and string `text` are skipped.
pub fn extract_births(payload: &Value) -> Vec<BirthdayFact> {
    let births = match payload.get("births").and_then(Value::as_array) {
        Some(births) => births,
        None => return Vec::new(),
    };

    births
        .iter()
        .filter_map(|entry| {
            let year = entry.get("year")?.as_i64()?;
            let text = entry.get("text")?.as_str()?;
            Some(BirthdayFact {
                year,
                text: text.to_string(),
            })
        })
        .collect()
}

/// Uniform sample of up to `count` facts without replacement.
pub fn sample_facts<R: Rng + ?Sized>(
    facts: &[BirthdayFact],
    count: usize,
    rng: &mut R,
) -> Vec<BirthdayFact> {
    facts.choose_multiple(rng, count).cloned().collect()
}
