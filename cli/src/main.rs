use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use cura_companion::{ConversationSession, ResponseResolver};
use cura_core::{get_default_config_file, CuraConfig, GeminiClient, GenerativeClient};
use cura_memory::{FileStore, SessionStore};
use std::sync::Arc;
use tracing::{info, warn};

mod app;
mod cli;
mod logging;
mod output;

use crate::cli::Args;
use crate::output::print_usage_instructions;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Defaults, config file, environment, then command line
    let config = CuraConfig::load(args.config.as_deref())
        .context("Failed to load configuration")?
        .merge(&args.overrides());

    logging::init_logging(args.verbose, config.log_level.as_deref());

    if args.write_config {
        let path = match &args.config {
            Some(path) => path.clone(),
            None => get_default_config_file("cura")?,
        };
        // Environment values stay out of the written file
        CuraConfig::load_file_only(Some(&path))
            .context("Failed to load configuration")?
            .merge(&args.overrides())
            .save_to_file(&path)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        println!("Wrote configuration to {}", path.display());
        return Ok(());
    }

    let client: Option<Arc<dyn GenerativeClient>> = if args.offline {
        info!("Offline mode, using built-in replies");
        None
    } else {
        match GeminiClient::new(&config) {
            Ok(client) => Some(Arc::new(client) as Arc<dyn GenerativeClient>),
            Err(e) => {
                warn!(error = %e, "Gemini client unavailable, using built-in replies");
                eprintln!(
                    "{}",
                    "No Gemini API key configured (set GEMINI_API_KEY); replies will come from CURA's built-in responses."
                        .yellow()
                );
                None
            }
        }
    };

    let data_dir = config
        .resolved_data_dir()
        .context("Failed to determine data directory")?;
    info!(data_dir = %data_dir.display(), "Using data directory");

    let resolver = ResponseResolver::from_config(&config, client);
    let mut session = ConversationSession::open(SessionStore::new(FileStore::new(data_dir)), resolver);

    if args.new_session {
        session
            .clear_history()
            .context("Failed to clear chat history")?;
        info!("Starting a new session as requested");
    }

    if args.interactive {
        app::run_interactive_chat(&mut session).await?;
    } else if let Some(prompt) = args.prompt.as_deref() {
        app::run_single_query(&mut session, prompt).await?;
    } else if !args.new_session {
        // No prompt and not interactive, show usage
        print_usage_instructions();
    }

    Ok(())
}
