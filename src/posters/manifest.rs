//! Poster manifest: a JSON document listing poster files with optional
//! expiry dates.
//!
//! Expiry can come from an explicit `expires` field (`YYYY-MM-DD`) or from a
//! `YYYY-MM-DD_` filename prefix, the field taking precedence. An expired
//! poster is dropped when the manifest is loaded; expiry always means the
//! end of that calendar day in local time.

use std::path::Path;

use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Manifest load errors.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("could not read poster manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("poster manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("poster manifest must contain {{ \"items\": [...] }}")]
    Shape,
}

/// One poster, already normalized: non-empty file path, caption defaulting
/// to empty, expiry resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PosterEntry {
    pub file: String,
    pub caption: String,
    pub expires_at: Option<DateTime<Local>>,
}

/// Read the manifest file and return the active posters in manifest order.
///
/// Errors cover a missing/unreadable file, invalid JSON, and a document
/// without an `items` array. Individual malformed items are not errors;
/// they are skipped.
pub async fn load_posters_manifest(path: &Path) -> Result<Vec<PosterEntry>, ManifestError> {
    let text = tokio::fs::read_to_string(path).await?;
    parse_manifest(&text, Local::now())
}

/// Parse manifest text and filter out entries expired at `now`.
pub fn parse_manifest(
    text: &str,
    now: DateTime<Local>,
) -> Result<Vec<PosterEntry>, ManifestError> {
    let document: Value = serde_json::from_str(text)?;
    let items = document
        .get("items")
        .and_then(Value::as_array)
        .ok_or(ManifestError::Shape)?;

    let entries = items
        .iter()
        .filter_map(normalize_item)
        .filter(|entry| !is_expired(entry, now))
        .collect();
    Ok(entries)
}

/// Normalize one raw manifest item; `None` for items without a usable
/// `file` field.
fn normalize_item(item: &Value) -> Option<PosterEntry> {
    let file = item.get("file")?.as_str()?;
    if file.is_empty() {
        return None;
    }

    let caption = item
        .get("caption")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let explicit = item
        .get("expires")
        .and_then(Value::as_str)
        .and_then(parse_expires);
    let expires_at = explicit.or_else(|| expiry_from_filename(file));

    Some(PosterEntry {
        file: file.to_string(),
        caption,
        expires_at,
    })
}

fn is_expired(entry: &PosterEntry, now: DateTime<Local>) -> bool {
    match entry.expires_at {
        Some(expires_at) => expires_at <= now,
        None => false,
    }
}

/// Parse an explicit `expires` value. Anything but three numeric dash-joined
/// parts forming a real calendar date is ignored.
fn parse_expires(raw: &str) -> Option<DateTime<Local>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parts: Vec<&str> = trimmed.split('-').collect();
    if parts.len() != 3 {
        return None;
    }
    let year: i32 = parts[0].parse().ok()?;
    let month: u32 = parts[1].parse().ok()?;
    let day: u32 = parts[2].parse().ok()?;
    end_of_day(year, month, day)
}

/// Derive expiry from a `YYYY-MM-DD_` filename prefix.
fn expiry_from_filename(file: &str) -> Option<DateTime<Local>> {
    let bytes = file.as_bytes();
    if bytes.len() < 11 || bytes[4] != b'-' || bytes[7] != b'-' || bytes[10] != b'_' {
        return None;
    }
    // All checked bytes are ASCII, so the slices below sit on char boundaries.
    let all_digits = bytes[0..4]
        .iter()
        .chain(&bytes[5..7])
        .chain(&bytes[8..10])
        .all(u8::is_ascii_digit);
    if !all_digits {
        return None;
    }
    let year: i32 = file[0..4].parse().ok()?;
    let month: u32 = file[5..7].parse().ok()?;
    let day: u32 = file[8..10].parse().ok()?;
    end_of_day(year, month, day)
}

/// 23:59:59.999 local time on the given date.
fn end_of_day(year: i32, month: u32, day: u32) -> Option<DateTime<Local>> {
    NaiveDate::from_ymd_opt(year, month, day)?
        .and_hms_milli_opt(23, 59, 59, 999)?
        .and_local_timezone(Local)
        .earliest()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(year: i32, month: u32, day: u32) -> DateTime<Local> {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            .and_local_timezone(Local)
            .earliest()
            .unwrap()
    }

    fn files(entries: &[PosterEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.file.as_str()).collect()
    }

    #[test]
    fn filename_prefix_yields_end_of_day_expiry() {
        let expiry = expiry_from_filename("2099-01-01_sale.png").unwrap();
        assert_eq!(expiry, end_of_day(2099, 1, 1).unwrap());
    }

    #[test]
    fn filename_without_prefix_has_no_expiry() {
        assert!(expiry_from_filename("sale.png").is_none());
        assert!(expiry_from_filename("2099-01-01sale.png").is_none());
        assert!(expiry_from_filename("2099_01_01_sale.png").is_none());
    }

    #[test]
    fn filename_with_invalid_date_has_no_expiry() {
        assert!(expiry_from_filename("2099-13-01_sale.png").is_none());
        assert!(expiry_from_filename("2099-02-30_sale.png").is_none());
    }

    #[test]
    fn explicit_expires_wins_over_filename_date() {
        let manifest = r#"{ "items": [
            { "file": "2000-01-01_old.png", "expires": "2099-06-30" }
        ] }"#;
        let entries = parse_manifest(manifest, at(2026, 1, 1)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].expires_at, end_of_day(2099, 6, 30));
    }

    #[test]
    fn malformed_expires_falls_back_to_filename() {
        for bad in ["2099-06", "soon", "2099-6-30-1", "2099-13-01", ""] {
            let manifest = format!(
                r#"{{ "items": [ {{ "file": "2098-01-01_a.png", "expires": "{bad}" }} ] }}"#
            );
            let entries = parse_manifest(&manifest, at(2026, 1, 1)).unwrap();
            assert_eq!(entries[0].expires_at, end_of_day(2098, 1, 1), "expires={bad:?}");
        }
    }

    #[test]
    fn expired_entries_are_dropped_in_order() {
        let manifest = r#"{ "items": [
            { "file": "a.png" },
            { "file": "2000-01-01_old.png" },
            { "file": "b.png", "expires": "2099-01-01" },
            { "file": "c.png" }
        ] }"#;
        let entries = parse_manifest(manifest, at(2026, 8, 25)).unwrap();
        assert_eq!(files(&entries), vec!["a.png", "b.png", "c.png"]);
    }

    #[test]
    fn expiry_exactly_at_evaluation_time_is_dropped() {
        let manifest = r#"{ "items": [ { "file": "2026-08-24_x.png" } ] }"#;
        let now = end_of_day(2026, 8, 24).unwrap();
        let entries = parse_manifest(manifest, now).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn future_expiry_is_kept_until_end_of_day() {
        let manifest = r#"{ "items": [ { "file": "2099-01-01_sale.png" } ] }"#;
        let entries = parse_manifest(manifest, at(2098, 12, 31)).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn items_without_string_file_are_skipped() {
        let manifest = r#"{ "items": [
            { "file": 7 },
            { "caption": "no file" },
            { "file": "" },
            null,
            { "file": "ok.png" }
        ] }"#;
        let entries = parse_manifest(manifest, at(2026, 1, 1)).unwrap();
        assert_eq!(files(&entries), vec!["ok.png"]);
    }

    #[test]
    fn empty_items_array_is_valid_and_empty() {
        let entries = parse_manifest(r#"{ "items": [] }"#, at(2026, 1, 1)).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn missing_items_field_is_a_shape_error() {
        let err = parse_manifest(r#"{ "posters": [] }"#, at(2026, 1, 1)).unwrap_err();
        assert!(matches!(err, ManifestError::Shape));
    }

    #[test]
    fn non_array_items_field_is_a_shape_error() {
        let err = parse_manifest(r#"{ "items": {} }"#, at(2026, 1, 1)).unwrap_err();
        assert!(matches!(err, ManifestError::Shape));
    }

    #[test]
    fn invalid_json_is_a_json_error() {
        let err = parse_manifest("{ nope", at(2026, 1, 1)).unwrap_err();
        assert!(matches!(err, ManifestError::Json(_)));
    }

    #[test]
    fn caption_is_kept_when_present() {
        let manifest = r#"{ "items": [ { "file": "a.png", "caption": "Spring sale" } ] }"#;
        let entries = parse_manifest(manifest, at(2026, 1, 1)).unwrap();
        assert_eq!(entries[0].caption, "Spring sale");
    }
}
