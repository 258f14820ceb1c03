use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttg_kiosk::{app, config::KioskConfig, posters};

#[derive(Parser)]
#[command(name = "kiosk")]
#[command(about = "Unattended single-screen info display: clock, birthdays, week plan, posters")]
struct Cli {
    /// Path of the poster manifest JSON document
    #[arg(long, default_value = "posters/posters.json")]
    posters_manifest: PathBuf,

    /// Directory containing the poster files
    #[arg(long, default_value = "posters/")]
    posters_dir: PathBuf,

    /// Seconds between poster display ticks
    #[arg(long, default_value = "10")]
    poster_interval: u64,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the kiosk display (default)
    Run,
    /// Load the poster manifest once and list the active posters
    Posters,
}

/// Initialize tracing on stderr; stdout is the display surface.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "ttg_kiosk=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = KioskConfig {
        posters_manifest: cli.posters_manifest,
        posters_dir: cli.posters_dir,
        poster_interval: Duration::from_secs(cli.poster_interval),
        ..KioskConfig::default()
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            tracing::info!("starting kiosk display");
            app::run(config).await?;
        }
        Commands::Posters => {
            let entries = posters::load_posters_manifest(&config.posters_manifest).await?;
            if entries.is_empty() {
                println!("No active posters.");
            }
            for entry in &entries {
                match entry.expires_at {
                    Some(expires_at) => {
                        println!("{}  until {}", entry.file, expires_at.format("%d.%m.%Y"))
                    }
                    None => println!("{}", entry.file),
                }
            }
        }
    }

    Ok(())
}
