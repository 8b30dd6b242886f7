//! Forkful CLI entry point.
//!
//! Binary name: `forkful`
//!
//! Parses CLI arguments, loads configuration, builds the backend client,
//! then dispatches to the interactive chat loop or a one-shot command.

mod cli;
mod logging;
mod state;

use clap::Parser;
use clap_complete::generate;
use forkful_infra::config::resolve_data_dir;

use cli::{Cli, Commands, SessionCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The chat loop draws its own prompt, so its logs go to a file.
    let chatting = matches!(cli.command, Commands::Chat(_));
    logging::init(cli.verbose, cli.quiet, chatting, &resolve_data_dir());

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "forkful", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.api_url.clone()).await?;
    let out = cli::Output {
        json: cli.json,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Chat(args) => {
            cli::chat::loop_runner::run_chat_loop(&state, args).await?;
        }

        Commands::Search(args) => {
            cli::restaurants::search(&state, args, out).await?;
        }

        Commands::Nearby {
            lat,
            lon,
            radius,
            limit,
        } => {
            cli::restaurants::nearby(&state, lat, lon, radius, limit, out).await?;
        }

        Commands::Show {
            restaurant_id,
            no_reviews,
        } => {
            cli::restaurants::show(&state, &restaurant_id, !no_reviews, out).await?;
        }

        Commands::Session { action } => match action {
            SessionCommand::Show { session_id } => {
                cli::session::show_session(&state, &session_id, out).await?;
            }
            SessionCommand::Delete { session_id } => {
                cli::session::delete_session(&state, &session_id, out).await?;
            }
        },

        Commands::Health => {
            cli::health::health(&state, out).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
