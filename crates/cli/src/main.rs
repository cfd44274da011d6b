//! QuickMailer CLI - Database migrations and operator tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! qm-cli migrate
//!
//! # Issue an API key for an account (operator stand-in for the
//! # external key-generation service)
//! qm-cli keys issue -e user@example.com
//!
//! # Send a test email through the external endpoint
//! qm-cli send --to you@example.com --subject Hello --message "It works!" \
//!     --api-key pk_xxx
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `keys issue` - Mint and record an API key for an account
//! - `send` - Send an email through the external send-email endpoint

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "qm-cli")]
#[command(author, version, about = "QuickMailer CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage account API keys
    Keys {
        #[command(subcommand)]
        action: KeysAction,
    },
    /// Send an email through the external send-email endpoint
    Send {
        /// Recipient email address
        #[arg(long)]
        to: String,

        /// Subject line
        #[arg(long)]
        subject: String,

        /// Message body
        #[arg(long)]
        message: String,

        /// API key for the send-email endpoint
        #[arg(long)]
        api_key: String,

        /// Endpoint base URL (defaults to `QUICKMAILER_MAIL_BASE_URL`)
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[derive(Subcommand)]
enum KeysAction {
    /// Mint a new API key and record it for an account
    Issue {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Keys { action } => match action {
            KeysAction::Issue { email } => {
                commands::keys::issue(&email).await?;
            }
        },
        Commands::Send {
            to,
            subject,
            message,
            api_key,
            base_url,
        } => {
            commands::send::run(&to, &subject, &message, &api_key, base_url.as_deref()).await?;
        }
    }
    Ok(())
}
