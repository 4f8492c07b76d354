use anyhow::Context;
use autoform::adapters::form_client::{ClientError, HttpFormClient};
use autoform::cli::Cli;
use autoform::config::Settings;
use autoform::domain::{FormGateway, RawForm};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = Settings::new_with_cli(&cli)?;

    // Initialize tracing
    let level = if settings.debug.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let client = HttpFormClient::new(&settings.http)?;

    let (form_url, raw) = if let Some(path) = &cli.schema_file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file {}", path.display()))?;
        let raw = RawForm {
            schema: serde_json::from_str(&content)?,
            token: cli.token.clone().unwrap_or_default(),
        };
        (settings.resolve_form_url(cli.form_url.as_deref()), raw)
    } else {
        let form_url = settings
            .resolve_form_url(cli.form_url.as_deref())
            .context("No form URL provided")?;
        let raw = client.fetch(&form_url).await?;
        (Some(form_url), raw)
    };

    let submission = autoform::fill_form(&raw.schema, &raw.token, &settings.answers, &mut rng)?;
    if !submission.warnings.is_empty() {
        info!(
            "{} answer(s) were filled without honoring their validation",
            submission.warnings.len()
        );
    }

    let form_url = match form_url {
        Some(url) if !cli.dry_run => url,
        _ => {
            println!("{}", submission.body);
            return Ok(());
        }
    };

    let status = client.submit(&form_url, &raw.token, &submission.body).await?;
    if status != 200 {
        let err = ClientError::UnexpectedStatus { status };
        error!("Error submitting form: {}", err);
        return Err(err.into());
    }

    info!("Form submitted successfully (status {})", status);
    Ok(())
}
