//! # raven-cli
//!
//! Command-line launcher for Raven: initialize or rebuild the index, chat
//! interactively, ask one-off questions, or start the HTTP server.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use futures::StreamExt;

use raven_chat::{AppConfig, ChatSession};
use raven_server::AppState;
use raven_tts::TtsClient;

pub mod repl;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "raven", about = "Persona chat over your own documents", version)]
pub struct Cli {
    /// Path of the configuration file.
    #[arg(short, long, default_value = "raven.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands. Without one, an interactive chat starts.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Initialize the system: load or build the vector index.
    Init {
        /// Rebuild the index even if a persisted one exists.
        #[arg(long)]
        force: bool,
    },
    /// Rebuild the vector index from the source documents.
    Rebuild,
    /// Start an interactive chat in the terminal.
    Chat,
    /// Ask a single question and print the reply.
    Ask {
        /// The question to ask.
        question: String,
        /// Print the complete reply at once instead of streaming it.
        #[arg(long)]
        no_stream: bool,
    },
    /// Start the HTTP API server.
    Serve,
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load_or_default(&cli.config)?;
    let tts = config.tts.enabled.then(|| Arc::new(TtsClient::new(config.tts.clone())));
    let session = Arc::new(ChatSession::new(config.clone()));

    match cli.command.unwrap_or(Command::Chat) {
        Command::Init { force } => {
            session.initialize(force).await?;
            println!("index ready ({} entries)", session.index_len().await.unwrap_or(0));
        }
        Command::Rebuild => {
            session.initialize(true).await?;
            println!("index rebuilt ({} entries)", session.index_len().await.unwrap_or(0));
        }
        Command::Chat => repl::run(session, tts).await?,
        Command::Ask { question, no_stream } => {
            if no_stream {
                println!("{}", session.ask(&question).await?);
            } else {
                use std::io::Write as _;
                let mut stream = session.ask_stream(&question).await?;
                while let Some(fragment) = stream.next().await {
                    print!("{fragment}");
                    std::io::stdout().flush()?;
                }
                println!();
            }
        }
        Command::Serve => {
            let state = AppState::new(session, tts);
            raven_server::serve(&config.server, state).await?;
        }
    }

    Ok(())
}
