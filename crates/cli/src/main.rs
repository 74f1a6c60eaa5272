//! Sommelier CLI, the main entry point.
//!
//! Commands:
//! - `serve`   Start the HTTP chat server
//! - `ask`     One-shot chat, or the sample questions when no message is given
//! - `check`   Probe each tool and the completion API individually
//! - `status`  Show the effective configuration (secrets redacted)

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "sommelier",
    about = "Sommelier: a wine concierge chat server",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP chat server
    Serve {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,

        /// Override the bind host
        #[arg(long)]
        host: Option<String>,
    },

    /// Ask the concierge a question
    Ask {
        /// Message to send; runs the sample questions when omitted
        #[arg(short, long)]
        message: Option<String>,
    },

    /// Check the knowledge file, weather, web search, and completion API
    Check,

    /// Show the effective configuration
    Status,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(port, host).await?,
        Commands::Ask { message } => commands::ask::run(message).await?,
        Commands::Check => commands::check::run().await?,
        Commands::Status => commands::status::run()?,
    }

    Ok(())
}
