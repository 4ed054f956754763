use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::lexicon::Lexicon;

/// Process configuration loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// JSON lexicon file. None means the built-in tables.
    pub lexicon_path: Option<PathBuf>,

    /// Default tracing directive, applied on top of `RUST_LOG`.
    pub log_directive: String,
}

pub const DEFAULT_LOG_DIRECTIVE: &str = "candor=info";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            lexicon_path: std::env::var("CANDOR_LEXICON_PATH")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            log_directive: std::env::var("CANDOR_LOG")
                .unwrap_or_else(|_| DEFAULT_LOG_DIRECTIVE.to_string()),
        })
    }

    /// Load the configured lexicon, or the built-in tables when no path is set.
    pub fn load_lexicon(&self) -> Result<Lexicon> {
        match &self.lexicon_path {
            Some(path) => {
                let lexicon = Lexicon::load(path)?;
                info!(
                    path = %path.display(),
                    profanity = lexicon.profanity.len(),
                    threats = lexicon.threats.len(),
                    discrimination = lexicon.discrimination.len(),
                    "Loaded lexicon from file"
                );
                Ok(lexicon)
            }
            None => Ok(Lexicon::builtin().clone()),
        }
    }

    pub fn log_summary(&self) {
        let lexicon = self
            .lexicon_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "builtin".to_string());
        info!(
            lexicon = lexicon.as_str(),
            log = self.log_directive.as_str(),
            "Config loaded"
        );
    }
}
