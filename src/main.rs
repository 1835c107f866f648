mod cache;
mod config;
mod lyrics;
mod model;
mod pipeline;
mod scorer;

use anyhow::Context;
use cache::CacheStore;
use cache::kv::SqliteKv;
use clap::{Parser, Subcommand};
use lyrics::{HttpBackend, LyricsProvider};
use model::{MoodResponse, Track};
use pipeline::{CancelToken, Pipeline};
use std::io::Read;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "vibelines", version, about = "Weekly mood timeline from liked-track lyrics")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Analyze a JSON track list and print the weekly mood timeline.
    Analyze {
        /// Path to a JSON array of tracks (id, name, artists, added_at).
        #[arg(long)]
        input: std::path::PathBuf,
        /// Print the full response as JSON instead of a summary.
        #[arg(long)]
        json: bool,
    },
    /// Score a text and print the sentiment result (headless).
    Score {
        /// Text to score; read from stdin when omitted.
        text: Option<String>,
    },
    /// Check whether the lyrics backend is reachable.
    Health,
    /// Inspect or manage the local cache.
    Cache {
        #[command(subcommand)]
        cmd: CacheCommand,
    },
}

#[derive(Debug, Subcommand)]
enum CacheCommand {
    /// Print entry counts, size and hit rates.
    Stats,
    /// Delete all cached lyrics, sentiment and counters.
    Clear,
    /// Write the whole cache to a JSON file.
    Export {
        #[arg(long)]
        output: std::path::PathBuf,
    },
    /// Load a previously exported JSON file.
    Import {
        #[arg(long)]
        input: std::path::PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;

    match cli.command {
        Command::Analyze { input, json } => {
            let raw = std::fs::read_to_string(&input)
                .with_context(|| format!("read {}", input.display()))?;
            let tracks: Vec<Track> = serde_json::from_str(&raw)
                .with_context(|| format!("parse tracks from {}", input.display()))?;

            let mut pipeline = make_pipeline(&cfg)?;
            let cancel = CancelToken::new();
            let trigger = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    trigger.cancel();
                }
            });

            let response = pipeline
                .analyze_tracks(
                    &tracks,
                    |p| {
                        eprintln!(
                            "[{}/{}] {} {}",
                            p.current,
                            p.total,
                            p.stage.label(),
                            p.current_track
                        );
                    },
                    &cancel,
                )
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else {
                print_summary(&response);
            }
        }
        Command::Score { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("read stdin")?;
                    buf
                }
            };
            println!("{}", serde_json::to_string_pretty(&scorer::score(&text))?);
        }
        Command::Health => {
            let provider = make_provider(&cfg);
            if provider.health_check().await {
                println!("lyrics backend reachable");
            } else {
                println!("lyrics backend unreachable");
                std::process::exit(1);
            }
        }
        Command::Cache { cmd } => {
            let mut cache = make_cache(&cfg)?;
            match cmd {
                CacheCommand::Stats => {
                    println!("{}", serde_json::to_string_pretty(&cache.stats())?);
                }
                CacheCommand::Clear => {
                    cache.clear();
                    println!("Cache cleared.");
                }
                CacheCommand::Export { output } => {
                    let blob = cache.export()?;
                    std::fs::write(&output, blob)
                        .with_context(|| format!("write {}", output.display()))?;
                    println!("Cache exported to {}", output.display());
                }
                CacheCommand::Import { input } => {
                    let blob = std::fs::read_to_string(&input)
                        .with_context(|| format!("read {}", input.display()))?;
                    if cache.import(&blob) {
                        println!("Cache imported from {}", input.display());
                    } else {
                        anyhow::bail!("import rejected: {} is not a valid cache export", input.display());
                    }
                }
            }
        }
    }

    Ok(())
}

fn make_cache(cfg: &config::Config) -> anyhow::Result<CacheStore<SqliteKv>> {
    let kv = SqliteKv::open(&cfg.paths.data_dir.join("cache.sqlite3"))?;
    Ok(CacheStore::new(kv, cfg.cache.to_cache_config()))
}

fn make_provider(cfg: &config::Config) -> LyricsProvider<HttpBackend> {
    let backend = HttpBackend::new(
        &cfg.api.base_url,
        Duration::from_secs(cfg.api.timeout_secs),
    );
    LyricsProvider::new(backend)
}

fn make_pipeline(cfg: &config::Config) -> anyhow::Result<Pipeline<SqliteKv, HttpBackend>> {
    Ok(Pipeline::new(make_cache(cfg)?, make_provider(cfg)))
}

fn print_summary(response: &MoodResponse) {
    for point in &response.timeline {
        println!(
            "{}  valence {:+.3}  energy {:.3}  ({} tracks)",
            point.week, point.valence, point.energy, point.track_count
        );
    }
    let stats = &response.processing_stats;
    println!(
        "{} tracks in {}ms ({} cached, {} new)",
        stats.total_tracks, stats.processing_time_ms, stats.cached_sentiment, stats.new_analysis
    );
}
