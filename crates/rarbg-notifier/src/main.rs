//! Polling loop for the rarbg leaderboard
//!
//! Runs one scrape cycle every `--interval` seconds, carrying the cache
//! from cycle to cycle, and logs releases that newly entered the newest
//! strip. Delivering those as notifications is left to whatever reads
//! the log or the `--json` output.

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rarbg_core::{ClientConfig, Cookies, LeaderboardCache, LeaderboardScraper, ScraperConfig};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rarbg-notifier", version, about = "Watch the rarbg leaderboard")]
struct Args {
    /// Cookie header sent to rarbg
    #[arg(long, env = "RARBG_COOKIE", default_value = "", hide_env_values = true)]
    rarbg_cookie: String,

    /// Cookie header sent to IMDB
    #[arg(long, env = "IMDB_COOKIE", default_value = "", hide_env_values = true)]
    imdb_cookie: String,

    /// Seconds between cycles
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value_t = 600)]
    interval: u64,

    /// Maximum requests per second across both sites
    #[arg(long, default_value_t = 2.0, value_parser = parse_rate)]
    requests_per_second: f64,

    /// Run a single cycle and exit with its status
    #[arg(long)]
    once: bool,

    /// Print every finished cache as JSON on stdout
    #[arg(long)]
    json: bool,
}

/// Accepts only positive, finite request rates
fn parse_rate(value: &str) -> Result<f64, String> {
    let rate: f64 = value
        .parse()
        .map_err(|e| format!("`{}` is not a number: {}", value, e))?;
    if rate.is_finite() && rate > 0.0 {
        Ok(rate)
    } else {
        Err(format!("`{}` must be a positive number", value))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let scraper = LeaderboardScraper::with_config(ScraperConfig {
        client: ClientConfig {
            requests_per_second: args.requests_per_second,
            ..ClientConfig::default()
        },
        cookies: Cookies::new(args.rarbg_cookie.as_str(), args.imdb_cookie.as_str()),
    })
    .context("failed to build HTTP client")?;

    let mut cache = LeaderboardCache::empty();
    loop {
        match scraper.run_cycle(&cache).await {
            Ok(next) => {
                report(&next, &cache, args.json)?;
                cache = next;
            }
            Err(e) if args.once => {
                return Err(anyhow::Error::from(e).context("leaderboard cycle failed"));
            }
            Err(e) => error!(error = %e, "Cycle failed, keeping previous cache"),
        }

        if args.once {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(args.interval)) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                break;
            }
        }
    }

    Ok(())
}

fn report(current: &LeaderboardCache, previous: &LeaderboardCache, json: bool) -> anyhow::Result<()> {
    info!(
        leaderboard = current.video_list.len(),
        newest = current.newest.len(),
        "Cycle finished"
    );

    for video in current.fresh_newest(previous) {
        info!(
            release = %video.release,
            title = %video.title,
            year = ?video.year,
            rating = ?video.rating,
            review = ?video.review,
            "New release in newest"
        );
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(current).context("failed to serialize cache")?
        );
    }
    Ok(())
}
