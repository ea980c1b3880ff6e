//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;

#[cfg(test)]
mod tests;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::say::run_say;
use crate::core::config::data::ConfigKey;
use crate::core::config::{Config, Overrides, Settings};
use crate::logging::{self, Fallback};
use crate::ui::chat_loop::run_chat;
use crate::utils::logging::TranscriptLog;

#[derive(Parser)]
#[command(name = "headstart", version)]
#[command(about = "Find the right service through a guided consultation chat")]
#[command(
    long_about = "Headstart walks you from a welcome screen through a consultation chat \
with an assistant to a list of recommended services. Replies stream in from the configured \
chat endpoint.\n\n\
Environment Variables:\n\
  HEADSTART_ENDPOINT  Chat endpoint URL (overrides the config file)\n\
  RUST_LOG            Diagnostic log filter (used with --log)\n\n\
Controls:\n\
  Enter             Get started / send the message / book\n\
  Tab               Go to recommendations / next form field\n\
  Esc               Go back one page\n\
  Up/Down/PgUp/PgDn Scroll the conversation\n\
  Ctrl+C            Quit"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Chat endpoint URL
    #[arg(short = 'e', long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Seconds to wait for reply data before giving up (0 waits forever)
    #[arg(short = 't', long, global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Write diagnostic logs to the specified file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Append the conversation transcript to the specified file
    #[arg(long, global = true, value_name = "FILE")]
    pub transcript: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the interactive session (default)
    Chat,
    /// Send a single message without the interface and print the reply
    Say {
        /// Message to send
        #[arg(trailing_var_arg = true, required = true)]
        prompt: Vec<String>,
    },
    /// Set configuration values
    Set {
        /// Configuration key to set
        key: String,
        /// Value to set for the key (multiple words are joined)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Option<Vec<String>>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let mut args = Args::parse();
    let command = args.command.take().unwrap_or(Commands::Chat);

    let fallback = match command {
        Commands::Chat => Fallback::Discard,
        _ => Fallback::Stderr,
    };
    logging::init(args.log.as_deref(), fallback)?;

    match command {
        Commands::Chat => {
            let settings = resolve_settings(&args)?;
            let transcript_log = TranscriptLog::new(args.transcript.clone())?;
            run_chat(settings, transcript_log).await
        }
        Commands::Say { prompt } => {
            let settings = resolve_settings(&args)?;
            let transcript_log = TranscriptLog::new(args.transcript.clone())?;
            run_say(prompt, settings, transcript_log).await
        }
        Commands::Set { key, value } => {
            let mut config = Config::load()?;
            let key = parse_key_or_exit(&key);
            match value {
                Some(values) if !values.is_empty() => {
                    if let Err(message) = config.set_value(key, &values) {
                        eprintln!("❌ {message}");
                        std::process::exit(1);
                    }
                    config.save()?;
                    println!("✅ Set {} to: {}", key.as_str(), values.join(" "));
                }
                _ => config.print_all(),
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = Config::load()?;
            let key = parse_key_or_exit(&key);
            config.unset_value(key);
            config.save()?;
            println!("✅ Unset {}", key.as_str());
            Ok(())
        }
    }
}

fn resolve_settings(args: &Args) -> Result<Settings, Box<dyn Error>> {
    let config = Config::load()?;
    Ok(Settings::from_environment(&config, &args.overrides())?)
}

fn parse_key_or_exit(key: &str) -> ConfigKey {
    match ConfigKey::parse(key) {
        Some(key) => key,
        None => {
            let known: Vec<&str> = ConfigKey::ALL.iter().map(|k| k.as_str()).collect();
            eprintln!("❌ Unknown config key: {key}");
            eprintln!("Known keys: {}", known.join(", "));
            std::process::exit(1);
        }
    }
}
