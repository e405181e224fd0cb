use clap::Parser;
use cura_core::CuraConfig;
use std::path::PathBuf;

/// Terminal client for the CURA mental health companion
#[derive(Parser, Debug)]
#[command(name = "cura", author, version, about, long_about = None)]
pub struct Args {
    /// Message to send to CURA
    #[arg(index = 1)] // Positional argument
    pub prompt: Option<String>,

    /// Enter interactive chat mode
    #[arg(short, long, default_value_t = false)]
    pub interactive: bool,

    /// Clear the stored chat history before starting (mood history is kept)
    #[arg(long, default_value_t = false)]
    pub new_session: bool,

    /// Never call the Gemini API; use the built-in replies only
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    /// Path to the config file (defaults to ~/.config/cura/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory holding chat and mood history
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Gemini API key
    #[arg(short = 'k', long)]
    pub api_key: Option<String>,

    /// Gemini model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Seconds to wait for the model before answering locally
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Write the effective configuration to the config file and exit
    #[arg(long, default_value_t = false)]
    pub write_config: bool,

    /// Enable verbose output
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    /// Config values given on the command line
    pub fn overrides(&self) -> CuraConfig {
        CuraConfig {
            api_key: self.api_key.clone(),
            model_name: self.model.clone(),
            request_timeout_secs: self.timeout,
            data_dir: self.data_dir.clone(),
            ..CuraConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_prompt() {
        let args = Args::parse_from(["cura", "I feel stressed", "--offline", "--timeout", "5"]);
        assert_eq!(args.prompt.as_deref(), Some("I feel stressed"));
        assert!(args.offline);
        assert!(!args.interactive);
        assert_eq!(args.overrides().request_timeout_secs, Some(5));
    }

    #[test]
    fn test_overrides_only_set_given_values() {
        let args = Args::parse_from(["cura", "-i", "--model", "gemini-2.0-flash"]);
        let overrides = args.overrides();
        assert_eq!(overrides.model_name.as_deref(), Some("gemini-2.0-flash"));
        assert!(overrides.api_key.is_none());
        assert!(overrides.log_level.is_none());
    }
}
