use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use dust2_stats::config::AppConfig;
use dust2_stats::models::PageOutput;
use dust2_stats::pipeline::Pipeline;
use dust2_stats::scraper::process_body;
use dust2_stats::storage::CsvSink;
use dust2_stats::utils;

#[derive(Parser)]
#[command(name = "dust2-stats", about = "dust2.us match result scraper", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a range of match pages and write matches/maps/player_stats CSVs
    Scrape {
        /// First match ID (inclusive)
        #[arg(long)]
        from: Option<u64>,

        /// Last match ID (exclusive)
        #[arg(long)]
        to: Option<u64>,

        /// Parallel requests
        #[arg(short, long)]
        concurrency: Option<usize>,

        /// Output directory for the CSV files
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Newline-delimited User-Agent list
        #[arg(long, env = "DUST2_USER_AGENTS")]
        user_agents: Option<PathBuf>,
    },

    /// Run the extractors on a saved match page and print the records as JSON
    Parse {
        file: PathBuf,

        /// Match ID the page belongs to
        #[arg(long)]
        id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "dust2_stats=info,warn",
        1 => "dust2_stats=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Command::Scrape {
            from,
            to,
            concurrency,
            out,
            user_agents,
        } => {
            let mut config = AppConfig::load()?;
            if let Some(from) = from {
                config.pipeline.from = from;
            }
            if let Some(to) = to {
                config.pipeline.to = to;
            }
            if let Some(n) = concurrency {
                config.pipeline.concurrency = n;
            }
            if let Some(dir) = out {
                config.storage.output_dir = dir;
            }
            if let Some(path) = user_agents {
                config.scraper.user_agents_path = path;
            }
            config.pipeline.clamp();

            let _t = utils::Timer::start("Scrape");
            let range = config.pipeline.from..config.pipeline.to;
            let sink = CsvSink::new(&config.storage.output_dir);

            let (tables, stats) = Pipeline::new(config).run(range).await?;
            if tables.is_empty() {
                warn!("No records extracted; nothing to write");
            }
            let written = sink.write_tables(&tables)?;

            info!(
                "Done: {} files written, {} pages ({} fetch failures, {} parse failures)",
                written.len(),
                stats.pages,
                stats.fetch_failures,
                stats.parse_failures
            );
        }

        Command::Parse { file, id } => {
            let body = std::fs::read(&file).with_context(|| format!("Cannot read {:?}", file))?;
            let url = file.display().to_string();

            let report = match process_body(&body, id, url) {
                PageOutput::Failed { error, .. } => serde_json::json!({ "error": error.to_string() }),
                PageOutput::Extracted {
                    matches,
                    maps,
                    players,
                    ..
                } => serde_json::json!({
                    "match": as_json(matches),
                    "maps": as_json(maps),
                    "players": as_json(players),
                }),
            };

            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn as_json<T: serde::Serialize, E: std::fmt::Display>(r: Result<T, E>) -> serde_json::Value {
    match r {
        Ok(v) => serde_json::to_value(v).unwrap_or_default(),
        Err(e) => serde_json::json!({ "error": e.to_string() }),
    }
}
