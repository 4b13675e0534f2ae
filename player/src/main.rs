use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use teaser_core::{SdkConfig, VideoKind, VideoSource};

mod app;
mod events;

use app::App;

#[derive(Parser)]
#[command(
    name = "teaser-player",
    about = "Drive a video teaser block through its modal player lifecycle"
)]
struct Cli {
    /// JSON file overriding the SDK configuration.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify an href and print how it would be played
    Classify { href: String },
    /// Decorate a demo teaser block and print the resulting markup
    Decorate {
        href: String,
        /// Add a heading column in front of the image column
        #[arg(long)]
        heading: Option<String>,
    },
    /// Drive the decorated block through a scripted event sequence
    Run {
        href: String,
        /// Comma-separated actions: open, close, ready, seek:<secs>
        #[arg(long, default_value = "open,ready,close")]
        script: String,
        /// Add a heading column in front of the image column
        #[arg(long)]
        heading: Option<String>,
        /// Simulate the SDK calling back this many milliseconds after
        /// the load request instead of waiting for a `ready` action
        #[arg(long)]
        ready_delay_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Classify { href } => classify(&href),
        Command::Decorate { href, heading } => {
            let app = App::new(&href, heading.as_deref(), config, None)?;
            print!("{}", app.render());
            Ok(())
        }
        Command::Run {
            href,
            script,
            heading,
            ready_delay_ms,
        } => {
            let actions = events::parse_script(&script)?;
            let ready_delay = ready_delay_ms.map(Duration::from_millis);
            let mut app = App::new(&href, heading.as_deref(), config, ready_delay)?;
            for action in actions {
                info!("action: {action:?}");
                app.apply(action).await?;
                println!("{}", app.status());
            }
            print!("{}", app.render());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<SdkConfig> {
    match path {
        None => Ok(SdkConfig::default()),
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid config {}", path.display()))
        }
    }
}

fn classify(href: &str) -> Result<()> {
    match VideoSource::classify(href) {
        None => println!("{href}: not a video link (plain hyperlink behavior)"),
        Some(source) => match source.kind {
            VideoKind::Youtube => println!(
                "{href}: youtube (video id: {})",
                source.video_id.as_deref().unwrap_or("<unparsable>")
            ),
            VideoKind::ExternalEmbeddable => {
                println!("{href}: embeddable elsewhere; opens in a new tab")
            }
            VideoKind::DirectFile => {
                println!("{href}: direct file; plays in a native video element")
            }
        },
    }
    Ok(())
}
