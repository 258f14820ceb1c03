//! Terminal frame model and renderer.
//!
//! The kiosk repaints one plain-text frame per update. Each widget owns
//! exactly one region of the [`Screen`]; nothing else writes into it.
//! Rendering is a pure function so frames can be asserted in tests.

use chrono::{DateTime, Local};

use crate::feeds::week_plan::WeekPlanItem;
use crate::posters::PosterFrame;

/// Lifecycle of a feed-backed region.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum WidgetState<T> {
    #[default]
    Loading,
    Ready(T),
    Failed,
}

/// A feed-backed region plus its error banner. The banner is cleared at the
/// start of every load attempt and set again on failure.
#[derive(Debug, Clone, Default)]
pub struct FeedView<T> {
    pub state: WidgetState<T>,
    pub banner: Option<String>,
}

/// Clock region: time and long date, no error states.
#[derive(Debug, Clone, Default)]
pub struct ClockView {
    pub time: String,
    pub date: String,
}

impl ClockView {
    /// Format the wall-clock instant: zero-padded 24-hour `HH:MM` and a
    /// long localized date.
    pub fn at(now: DateTime<Local>) -> Self {
        Self {
            time: now.format("%H:%M").to_string(),
            date: now.format("%A, %-d %B %Y").to_string(),
        }
    }
}

/// Poster region: the current frame, or the placeholder when no posters
/// are active.
#[derive(Debug, Clone, Default)]
pub struct PosterView {
    pub frame: Option<PosterFrame>,
    pub interval_secs: u64,
    pub banner: Option<String>,
}

/// The whole kiosk frame.
#[derive(Debug, Clone, Default)]
pub struct Screen {
    pub clock: ClockView,
    pub birthdays: FeedView<Vec<String>>,
    pub week_plan: FeedView<Vec<WeekPlanItem>>,
    pub poster: PosterView,
}

/// Render the frame as plain text.
pub fn render_frame(screen: &Screen) -> String {
    let mut out = String::new();

    out.push_str(&screen.clock.time);
    out.push('\n');
    out.push_str(&screen.clock.date);
    out.push('\n');

    out.push_str("\n== Birthdays today ==\n");
    match &screen.birthdays.state {
        WidgetState::Loading => out.push_str("Loading…\n"),
        WidgetState::Failed => out.push_str("Could not load data.\n"),
        WidgetState::Ready(lines) if lines.is_empty() => {
            out.push_str("No entries found for today.\n");
        }
        WidgetState::Ready(lines) => {
            for line in lines {
                out.push_str("- ");
                out.push_str(line);
                out.push('\n');
            }
        }
    }
    push_banner(&mut out, &screen.birthdays.banner);

    out.push_str("\n== Week plan ==\n");
    match &screen.week_plan.state {
        WidgetState::Loading => out.push_str("Loading…\n"),
        WidgetState::Failed => out.push_str("Could not load data.\n"),
        WidgetState::Ready(items) => {
            for item in items {
                out.push_str(&item.day);
                out.push('\n');
                out.push_str("  ");
                out.push_str(&item.title);
                out.push('\n');
                out.push_str("  ");
                out.push_str(&item.body);
                out.push('\n');
            }
        }
    }
    push_banner(&mut out, &screen.week_plan.banner);

    out.push_str(&format!(
        "\n== Posters (every {} s) ==\n",
        screen.poster.interval_secs
    ));
    match &screen.poster.frame {
        None => out.push_str("No active posters.\n"),
        Some(frame) => {
            out.push_str("▶ ");
            out.push_str(&frame.source.display().to_string());
            if !frame.loaded {
                out.push_str(" (not found)");
            }
            out.push('\n');
            out.push_str("  ");
            out.push_str(&frame.caption);
            out.push('\n');
        }
    }
    push_banner(&mut out, &screen.poster.banner);

    out
}

fn push_banner(out: &mut String, banner: &Option<String>) {
    if let Some(message) = banner {
        out.push_str("[!] ");
        out.push_str(message);
        out.push('\n');
    }
}
