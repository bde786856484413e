//! Suparank CLI entrypoint.

use std::io::Write;

use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;

use suparank::config::Config;
use suparank::console::{
    Command, CommandError, HELP, parse_command, render_json, render_outcome, render_view,
};
use suparank::{HttpRankingService, ItemId, RankingSession, SessionError};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "suparank", version, about = "Rank items by picking between two at a time")]
struct Cli {
    /// Ranking service base URL (overrides SUPARANK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare items interactively
    Rank,
    /// Print ranked items, then the ones still being compared
    List {
        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Add an item
    Add {
        title: String,
        #[arg(long, short, default_value = "")]
        description: String,
    },
    /// Delete an item by id
    Delete { id: String },
    /// Clear every ranking and start comparing again
    Reset,
}

type Session = RankingSession<HttpRankingService>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(api_url) = &cli.api_url {
        config = config.with_api_url(api_url)?;
    }

    tracing::info!(api_url = %config.api_url, "suparank starting");
    let session = RankingSession::connect(&config)?;

    match cli.command {
        Commands::Rank => run_interactive(&session).await,
        Commands::List { json } => {
            // Items loaded before a failure are still worth showing.
            let loaded = session.initialize().await;
            let view = session.snapshot().view;
            if json {
                println!("{}", render_json(&view)?);
            } else {
                print!("{}", render_view(&view));
            }
            loaded?;
            Ok(())
        }
        Commands::Add { title, description } => {
            session.add_item(&title, &description).await?;
            print!("{}", render_view(&session.snapshot().view));
            Ok(())
        }
        Commands::Delete { id } => {
            session.delete_item(&ItemId::new(id)).await?;
            print!("{}", render_view(&session.snapshot().view));
            Ok(())
        }
        Commands::Reset => {
            session.reset().await?;
            println!("Rankings cleared.");
            Ok(())
        }
    }
}

async fn run_interactive(session: &Session) -> anyhow::Result<()> {
    if let Err(e) = session.initialize().await {
        tracing::debug!(error = %e, "initial load failed");
    }
    print!("{}", render_outcome(&session.snapshot()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, leaving");
                None
            }
        };
        let Some(line) = line else {
            println!();
            print!("{}", render_view(&session.snapshot().view));
            break;
        };

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(CommandError::Empty) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        let result = match command {
            Command::Choose(side) => session.choose(side).await,
            Command::Add { title, description } => session.add_item(&title, &description).await,
            Command::Delete(id) => session.delete_item(&id).await,
            Command::Reset => session.reset().await,
            Command::Retry => session.initialize().await,
            Command::ShowRankings => {
                print!("{}", render_view(&session.snapshot().view));
                continue;
            }
            Command::Help => {
                println!("{HELP}");
                continue;
            }
            Command::Quit => {
                print!("{}", render_view(&session.snapshot().view));
                break;
            }
        };

        match result {
            Ok(()) => {}
            // Rejected before any request; the state did not change.
            Err(
                e @ (SessionError::InvalidTransition { .. }
                | SessionError::InvalidInput(_)
                | SessionError::Busy),
            ) => {
                println!("{e}");
                continue;
            }
            Err(e) => tracing::debug!(error = %e, "command failed"),
        }

        print!("{}", render_outcome(&session.snapshot()));
    }

    Ok(())
}
