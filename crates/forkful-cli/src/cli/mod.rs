//! CLI command definitions and dispatch for the `forkful` binary.
//!
//! Uses clap derive macros for argument parsing. `forkful chat` opens the
//! interactive session; the other commands are one-shot lookups against
//! the backend.

pub mod chat;
pub mod display;
pub mod health;
pub mod restaurants;
pub mod session;

use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use indicatif::{ProgressBar, ProgressStyle};

use forkful_types::restaurant::{DEFAULT_RADIUS_METERS, DEFAULT_RESULT_LIMIT};

/// Chat with an AI restaurant recommender.
#[derive(Parser)]
#[command(name = "forkful", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Backend base URL (overrides config.toml and FORKFUL_API_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive recommendation chat.
    Chat(ChatArgs),

    /// Search restaurants directly.
    Search(SearchArgs),

    /// List restaurants around a point.
    Nearby {
        /// Latitude of the search point.
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        /// Longitude of the search point.
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Search radius in meters.
        #[arg(long, default_value_t = DEFAULT_RADIUS_METERS)]
        radius: u32,

        /// Maximum number of results.
        #[arg(long, default_value_t = DEFAULT_RESULT_LIMIT)]
        limit: u32,
    },

    /// Show details of a restaurant.
    Show {
        /// Restaurant id.
        restaurant_id: String,

        /// Skip fetching reviews.
        #[arg(long)]
        no_reviews: bool,
    },

    /// Inspect or discard backend chat sessions.
    Session {
        #[command(subcommand)]
        action: SessionCommand,
    },

    /// Check backend health.
    Health,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SessionCommand {
    /// Show the transcript the backend holds for a session.
    Show {
        /// Session id.
        session_id: String,
    },

    /// Discard a session on the backend.
    #[command(alias = "rm")]
    Delete {
        /// Session id.
        session_id: String,
    },
}

/// Options for `forkful chat`.
#[derive(Args, Debug, Clone, Default)]
pub struct ChatArgs {
    /// Starting latitude (use with --lon).
    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    /// Starting longitude (use with --lat).
    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Starting street address.
    #[arg(long, conflicts_with = "lat")]
    pub address: Option<String>,

    /// City for --address.
    #[arg(long, requires = "address")]
    pub city: Option<String>,

    /// State or region for --address.
    #[arg(long, requires = "address")]
    pub state: Option<String>,

    /// Detect the current location at startup.
    #[arg(long, conflicts_with_all = ["lat", "address"])]
    pub detect_location: bool,

    /// Preferred cuisine sent with every message.
    #[arg(long)]
    pub cuisine: Option<String>,

    /// Preferred price range, e.g. "$$".
    #[arg(long)]
    pub price_range: Option<String>,

    /// Dietary restriction (repeatable).
    #[arg(long = "dietary", value_name = "RESTRICTION")]
    pub dietary: Vec<String>,

    /// Remove your message from the transcript when sending fails.
    #[arg(long)]
    pub rollback_on_error: bool,

    /// Cancel a pending request when a new message is sent.
    #[arg(long)]
    pub cancel_superseded: bool,
}

/// Options for `forkful search`.
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Free-text query, e.g. "ramen".
    pub query: Option<String>,

    /// Location text, e.g. "Austin, TX".
    #[arg(long)]
    pub location: Option<String>,

    #[arg(long, allow_negative_numbers = true, requires = "lon")]
    pub lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true, requires = "lat")]
    pub lon: Option<f64>,

    /// Comma-separated category aliases.
    #[arg(long)]
    pub categories: Option<String>,

    /// Comma-separated price tiers, e.g. "1,2".
    #[arg(long)]
    pub price: Option<String>,

    /// Search radius in meters.
    #[arg(long)]
    pub radius: Option<u32>,

    /// Maximum number of results.
    #[arg(long)]
    pub limit: Option<u32>,

    /// best_match, rating, review_count, or distance.
    #[arg(long)]
    pub sort_by: Option<String>,
}

/// Output switches shared by the one-shot commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

/// Spinner shown while a one-shot request is in flight. Hidden for JSON
/// and quiet output.
pub(crate) fn spinner(out: Output, message: &'static str) -> ProgressBar {
    if out.json || out.quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
