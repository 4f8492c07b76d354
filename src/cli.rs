use clap::Parser;
use std::path::PathBuf;

/// Autoform - fills a hosted form with answers that pass its validation rules
#[derive(Parser, Debug, Clone)]
#[command(name = "autoform", version, about, long_about = None)]
pub struct Cli {
    /// Form URL (the /viewform page)
    #[arg(env = "AUTOFORM_URL")]
    pub form_url: Option<String>,

    /// Path to the configuration file
    #[arg(short, long, env = "AUTOFORM_CONFIG", default_value = "autoform.toml")]
    pub config: PathBuf,

    /// Read the form schema from a JSON file instead of fetching the page
    #[arg(long, requires = "token")]
    pub schema_file: Option<PathBuf>,

    /// Session token to use with --schema-file
    #[arg(long, env = "AUTOFORM_TOKEN")]
    pub token: Option<String>,

    /// Seed for the answer generator (reproducible bodies)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Print the request body instead of submitting it
    #[arg(long)]
    pub dry_run: bool,

    /// Override the configured respondent email
    #[arg(long, env = "AUTOFORM_EMAIL")]
    pub email: Option<String>,

    /// Use generated lorem sentences for text answers
    #[arg(long)]
    pub bogus_sentences: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}
