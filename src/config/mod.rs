use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub mod validator;

use crate::cli::Cli;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub answers: AnswerSettings,
    #[serde(default)]
    pub debug: DebugSettings,
    #[serde(default)]
    pub http: HttpSettings,
}

/// Canned values the synthesizer starts from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnswerSettings {
    /// Baseline for short answer questions (also the "Other" free-text response)
    pub short_answer: String,
    /// Baseline for paragraph questions
    pub long_answer: String,
    /// Used for email-validated answers and the collected respondent email
    pub email: String,
    /// Used for URL-validated answers
    pub url: String,
    /// Replace the text baselines with generated lorem sentences
    #[serde(default)]
    pub bogus_sentences: bool,
}

impl Default for AnswerSettings {
    fn default() -> Self {
        Self {
            short_answer: default_short_answer(),
            long_answer: default_long_answer(),
            email: default_email(),
            url: default_url(),
            bogus_sentences: false,
        }
    }
}

fn default_short_answer() -> String {
    "Sample short answer".to_string()
}

fn default_long_answer() -> String {
    "This is a sample long answer.".to_string()
}

fn default_email() -> String {
    "form@example.com".to_string()
}

fn default_url() -> String {
    "https://example.com".to_string()
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DebugSettings {
    /// Emit debug-level logs for every synthesized answer
    #[serde(default)]
    pub verbose: bool,
    /// Fall back to `default_form_url` when no URL is given
    #[serde(default)]
    pub use_default_url: bool,
    #[serde(default)]
    pub default_form_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64; rv:133.0) Gecko/20100101 Firefox/133.0".to_string()
}

fn default_accept_language() -> String {
    "en-CA,en-US;q=0.7,en;q=0.3".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Settings {
    /// Create settings from CLI arguments (config file plus CLI overrides)
    pub fn new_with_cli(cli: &Cli) -> Result<Self, anyhow::Error> {
        let mut settings = Self::load(&cli.config)?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        settings.validate()?;
        Ok(settings)
    }

    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        let settings = Self::load(&Path::new(root).join("autoform"))?;
        settings.validate()?;
        Ok(settings)
    }

    fn load(config_path: &Path) -> Result<Self, anyhow::Error> {
        let answers = AnswerSettings::default();
        let s = Config::builder()
            .add_source(File::from(config_path.to_path_buf()).required(false))
            .set_default("answers.short_answer", answers.short_answer)?
            .set_default("answers.long_answer", answers.long_answer)?
            .set_default("answers.email", answers.email)?
            .set_default("answers.url", answers.url)?
            .set_default("answers.bogus_sentences", false)?
            .build()?;

        Ok(s.try_deserialize()?)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if cli.verbose {
            self.debug.verbose = true;
        }
        if let Some(email) = &cli.email {
            self.answers.email = email.clone();
        }
        if cli.bogus_sentences {
            self.answers.bogus_sentences = true;
        }
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate(self).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!(
                "Configuration validation failed:\n{}",
                error_messages.join("\n")
            )
        })
    }

    /// The URL to fill: the explicit one, else the configured default when enabled.
    pub fn resolve_form_url(&self, explicit: Option<&str>) -> Option<String> {
        match explicit.map(str::trim).filter(|u| !u.is_empty()) {
            Some(url) => Some(url.to_string()),
            None if self.debug.use_default_url => {
                tracing::debug!("No form URL entered, using default");
                self.debug.default_form_url.clone()
            }
            None => None,
        }
    }
}
