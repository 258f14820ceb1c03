//! Kiosk runtime.
//!
//! Every widget runs as its own tokio task on an independent interval and
//! sends region updates over one channel; a single render loop applies them
//! last-write-wins and repaints the frame. Widgets never touch each other's
//! regions, so a failing feed only degrades its own section.

use std::io::Write;

use chrono::Local;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::KioskConfig;
use crate::feeds::week_plan::WeekPlanItem;
use crate::feeds::{birthdays, week_plan, FeedClient};
use crate::posters::manifest::PosterEntry;
use crate::posters::{self, PosterFrame, PosterRotation};
use crate::screen::{render_frame, ClockView, Screen, WidgetState};

/// Region updates flowing from widget tasks to the render loop.
#[derive(Debug)]
pub enum ScreenUpdate {
    Clock(ClockView),
    Birthdays {
        state: WidgetState<Vec<String>>,
        banner: Option<String>,
    },
    WeekPlan {
        state: WidgetState<Vec<WeekPlanItem>>,
        banner: Option<String>,
    },
    Poster(Option<PosterFrame>),
    PosterBanner(Option<String>),
}

/// Start all widgets and run the render loop until shutdown.
pub async fn run(config: KioskConfig) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = FeedClient::new();

    tokio::spawn(clock_task(config.clone(), tx.clone()));
    tokio::spawn(birthdays_task(client.clone(), config.clone(), tx.clone()));
    tokio::spawn(week_plan_task(client, config.clone(), tx.clone()));
    tokio::spawn(posters_task(config.clone(), tx.clone()));
    drop(tx);

    let mut screen = Screen::default();
    screen.poster.interval_secs = config.poster_interval.as_secs();

    while let Some(update) = rx.recv().await {
        apply_update(&mut screen, update);
        paint(&screen);
    }
    Ok(())
}

fn apply_update(screen: &mut Screen, update: ScreenUpdate) {
    match update {
        ScreenUpdate::Clock(clock) => screen.clock = clock,
        ScreenUpdate::Birthdays { state, banner } => {
            screen.birthdays.state = state;
            screen.birthdays.banner = banner;
        }
        ScreenUpdate::WeekPlan { state, banner } => {
            screen.week_plan.state = state;
            screen.week_plan.banner = banner;
        }
        ScreenUpdate::Poster(frame) => screen.poster.frame = frame,
        ScreenUpdate::PosterBanner(banner) => screen.poster.banner = banner,
    }
}

fn paint(screen: &Screen) {
    // Clear and home, then the whole frame; stderr carries the logs.
    print!("\x1b[2J\x1b[H{}", render_frame(screen));
    let _ = std::io::stdout().flush();
}

async fn clock_task(config: KioskConfig, tx: mpsc::UnboundedSender<ScreenUpdate>) {
    let mut ticker = tokio::time::interval(config.clock_interval);
    loop {
        ticker.tick().await;
        if tx.send(ScreenUpdate::Clock(ClockView::at(Local::now()))).is_err() {
            break;
        }
    }
}

async fn birthdays_task(
    client: FeedClient,
    config: KioskConfig,
    tx: mpsc::UnboundedSender<ScreenUpdate>,
) {
    let mut ticker = tokio::time::interval(config.birthdays_refresh);
    loop {
        ticker.tick().await;
        // Each refresh starts over: clear the banner, show the loading line.
        let _ = tx.send(ScreenUpdate::Birthdays {
            state: WidgetState::Loading,
            banner: None,
        });

        let today = Local::now().date_naive();
        let update = match birthdays::load_birthdays(&client, &config.birthdays_url, today).await {
            Ok(lines) => {
                info!(count = lines.len(), "birthday feed loaded");
                ScreenUpdate::Birthdays {
                    state: WidgetState::Ready(lines),
                    banner: None,
                }
            }
            Err(err) => {
                warn!("birthday feed load failed: {err}");
                ScreenUpdate::Birthdays {
                    state: WidgetState::Failed,
                    banner: Some(format!(
                        "Could not load birthdays: {err}. (On public WiFi the API may be blocked.)"
                    )),
                }
            }
        };
        if tx.send(update).is_err() {
            break;
        }
    }
}

async fn week_plan_task(
    client: FeedClient,
    config: KioskConfig,
    tx: mpsc::UnboundedSender<ScreenUpdate>,
) {
    let mut ticker = tokio::time::interval(config.week_plan_refresh);
    loop {
        ticker.tick().await;
        let _ = tx.send(ScreenUpdate::WeekPlan {
            state: WidgetState::Loading,
            banner: None,
        });

        let update = match week_plan::load_week_plan(&client, &config.week_plan_url).await {
            Ok(items) => {
                info!(count = items.len(), "week plan loaded");
                ScreenUpdate::WeekPlan {
                    state: WidgetState::Ready(items),
                    banner: None,
                }
            }
            Err(err) => {
                warn!("week plan load failed: {err}");
                ScreenUpdate::WeekPlan {
                    state: WidgetState::Failed,
                    banner: Some(format!("Week plan demo data did not load: {err}.")),
                }
            }
        };
        if tx.send(update).is_err() {
            break;
        }
    }
}

/// Load the manifest on start and every refresh interval, restarting the
/// rotation with the fresh list each time.
async fn posters_task(config: KioskConfig, tx: mpsc::UnboundedSender<ScreenUpdate>) {
    let mut rotation = RotationTask::default();
    let mut ticker = tokio::time::interval(config.manifest_refresh);
    loop {
        ticker.tick().await;
        let items = match posters::load_posters_manifest(&config.posters_manifest).await {
            Ok(items) => {
                info!(count = items.len(), "poster manifest loaded");
                let _ = tx.send(ScreenUpdate::PosterBanner(None));
                items
            }
            Err(err) => {
                warn!("poster manifest load failed: {err}");
                let _ = tx.send(ScreenUpdate::PosterBanner(Some(format!(
                    "Could not read the poster list: {err}"
                ))));
                Vec::new()
            }
        };
        rotation.restart(items, config.clone(), tx.clone());
    }
}

/// Handle to the active rotation timer. Restarting aborts the previous
/// timer before spawning the next one, so display ticks never overlap;
/// dropping the handle releases the timer too.
#[derive(Debug, Default)]
struct RotationTask {
    handle: Option<JoinHandle<()>>,
}

impl RotationTask {
    fn restart(
        &mut self,
        items: Vec<PosterEntry>,
        config: KioskConfig,
        tx: mpsc::UnboundedSender<ScreenUpdate>,
    ) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        self.handle = Some(tokio::spawn(rotation_loop(items, config, tx)));
    }
}

impl Drop for RotationTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// One rotation pass: show the current poster immediately, then advance on
/// every interval tick until aborted by the next manifest refresh.
async fn rotation_loop(
    items: Vec<PosterEntry>,
    config: KioskConfig,
    tx: mpsc::UnboundedSender<ScreenUpdate>,
) {
    let mut rotation = PosterRotation::new(items);
    let mut ticker = tokio::time::interval(config.poster_interval);
    loop {
        ticker.tick().await;
        let update = match rotation.advance(&config.posters_dir) {
            None => ScreenUpdate::Poster(None),
            Some(mut frame) => {
                // The terminal analog of waiting for the image to load:
                // only mark the frame visible once the file is readable.
                frame.loaded = tokio::fs::metadata(&frame.source)
                    .await
                    .map(|meta| meta.is_file())
                    .unwrap_or(false);
                ScreenUpdate::Poster(Some(frame))
            }
        };
        if tx.send(update).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::Duration;

    fn entry(file: &str) -> PosterEntry {
        PosterEntry {
            file: file.to_string(),
            caption: String::new(),
            expires_at: None,
        }
    }

    fn poster_file(update: ScreenUpdate) -> Option<PathBuf> {
        match update {
            ScreenUpdate::Poster(Some(frame)) => Some(frame.source),
            _ => None,
        }
    }

    #[test]
    fn updates_touch_only_their_own_region() {
        let mut screen = Screen::default();
        apply_update(
            &mut screen,
            ScreenUpdate::Birthdays {
                state: WidgetState::Failed,
                banner: Some("boom".to_string()),
            },
        );
        apply_update(
            &mut screen,
            ScreenUpdate::Clock(ClockView {
                time: "10:00".to_string(),
                date: "date".to_string(),
            }),
        );

        assert_eq!(screen.clock.time, "10:00");
        assert_eq!(screen.birthdays.banner.as_deref(), Some("boom"));
        assert!(matches!(screen.week_plan.state, WidgetState::Loading));
    }

    #[test]
    fn successful_refresh_clears_the_banner() {
        let mut screen = Screen::default();
        screen.birthdays.banner = Some("boom".to_string());
        apply_update(
            &mut screen,
            ScreenUpdate::Birthdays {
                state: WidgetState::Ready(vec!["line".to_string()]),
                banner: None,
            },
        );
        assert!(screen.birthdays.banner.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn rotation_emits_frames_in_manifest_order_and_wraps() {
        let config = KioskConfig {
            poster_interval: Duration::from_secs(10),
            ..KioskConfig::default()
        };
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(rotation_loop(
            vec![entry("a.png"), entry("b.png")],
            config,
            tx,
        ));

        let mut seen = Vec::new();
        for _ in 0..3 {
            let update = rx.recv().await.expect("rotation frame");
            seen.push(poster_file(update).expect("poster frame").file_name().unwrap().to_owned());
        }
        assert_eq!(seen, ["a.png", "b.png", "a.png"]);
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn empty_rotation_emits_placeholder_frames() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(rotation_loop(Vec::new(), KioskConfig::default(), tx));
        let update = rx.recv().await.expect("placeholder update");
        assert!(matches!(update, ScreenUpdate::Poster(None)));
        task.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn restart_aborts_the_previous_rotation_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut rotation = RotationTask::default();

        rotation.restart(vec![entry("old.png")], KioskConfig::default(), tx.clone());
        let first = rotation.handle.as_ref().unwrap().abort_handle();
        rx.recv().await.expect("frame from first rotation");

        rotation.restart(vec![entry("new.png")], KioskConfig::default(), tx.clone());
        // Drain until the new rotation's first frame; only new.png may appear.
        loop {
            let update = rx.recv().await.expect("frame after restart");
            if let Some(source) = poster_file(update) {
                assert_eq!(source.file_name().unwrap(), "new.png");
                break;
            }
        }
        // The aborted timer winds down as soon as the runtime polls it.
        for _ in 0..10 {
            if first.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(first.is_finished());
    }
}
