use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use candor_common::{Config, RatedContribution};
use candor_moderation::ModerationPipeline;
use candor_scoring::ReputationScoringEngine;

#[derive(Parser)]
#[command(name = "candor", about = "Run review moderation and reputation scoring by hand")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Moderate review text (reads stdin when TEXT is omitted)
    Moderate {
        text: Option<String>,
    },
    /// Helpfulness score for a vote tally
    ScoreReview {
        #[arg(long)]
        up: u32,
        #[arg(long)]
        down: u32,
    },
    /// Weighted average rating from a JSON array of contributions
    CompanyRating {
        #[arg(long)]
        file: PathBuf,
        /// Evaluation time (RFC 3339), defaults to now
        #[arg(long)]
        now: Option<DateTime<Utc>>,
    },
    /// Trust tier from average rating and verified percentage
    TrustTier {
        #[arg(long)]
        rating: f64,
        #[arg(long)]
        verified: f64,
    },
    /// Share of postings that ended in a hire
    HiringRate {
        #[arg(long)]
        hires: u32,
        #[arg(long)]
        postings: u32,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    // Logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::from_default_env().add_directive(config.log_directive.parse()?);
    if cli.json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    config.log_summary();
    let engine = ReputationScoringEngine;

    match cli.command {
        Command::Moderate { text } => {
            let text = match text {
                Some(t) => t,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("failed to read text from stdin")?;
                    buf
                }
            };
            let lexicon = config.load_lexicon()?;
            let pipeline = ModerationPipeline::new(&lexicon)?;
            let verdict = pipeline.moderate(&text);
            info!(approved = verdict.is_approved, "Moderation finished");
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
        Command::ScoreReview { up, down } => {
            println!("{:.4}", engine.score_review(up, down));
        }
        Command::CompanyRating { file, now } => {
            let json = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let contributions: Vec<RatedContribution> = serde_json::from_str(&json)
                .with_context(|| format!("{} is not a contribution array", file.display()))?;
            let now = now.unwrap_or_else(Utc::now);
            info!(count = contributions.len(), now = %now, "Scoring company");
            println!("{:.4}", engine.score_company(&contributions, now));
        }
        Command::TrustTier { rating, verified } => {
            println!("{}", engine.trust_tier(rating, verified));
        }
        Command::HiringRate { hires, postings } => {
            println!("{}", engine.hiring_rate(hires, postings));
        }
    }

    Ok(())
}
