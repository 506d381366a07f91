mod cli;
mod config;
mod speech_client;

use std::io;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dotenv::dotenv;
use eyre::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::cli::chat::ChatContext;
use crate::config::Settings;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Process a single command and exit
    #[arg(short, long)]
    input: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Text-only mode: do not synthesize speech
    #[arg(long)]
    no_speech: bool,

    /// Command used to play synthesized speech, e.g. "mpv --no-video"
    #[arg(long)]
    player: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a chat session
    Chat {
        /// Process a single command and exit
        #[arg(short, long)]
        input: Option<String>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();

    let (input, verbose) = match cli.command {
        Some(Commands::Chat { input, verbose }) => (input.or(cli.input), verbose || cli.verbose),
        None => (cli.input, cli.verbose),
    };

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let settings = Settings::load(cli.no_speech, cli.player)?;
    info!("Starting PAPI 3.0-1 (speech {})", if settings.speech_enabled { "on" } else { "off" });

    let mut chat_context = ChatContext::new(Box::new(io::stdout()), input, &settings);
    chat_context.run().await
}
