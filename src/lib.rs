//! # Autoform - hosted form filler
//!
//! Autoform reads the array-encoded schema a hosted form page embeds, works out
//! what every question accepts, and builds a submission body whose answers pass
//! the form's own validation rules.
//!
//! ## Pipeline
//!
//! - **Schema Navigator**: raw schema to ordered [`domain::Question`] records
//! - **Validation Interpreter**: validation descriptors to typed [`domain::Constraint`]s
//! - **Answer Synthesizer**: question + constraint to answer fields, using an injected RNG
//! - **Submission Encoder**: answers + session metadata to the url-encoded body
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use autoform::config::AnswerSettings;
//! use rand::SeedableRng;
//!
//! fn main() -> anyhow::Result<()> {
//!     let schema: serde_json::Value = serde_json::from_str(&std::fs::read_to_string("form.json")?)?;
//!     let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//!
//!     let submission = autoform::fill_form(&schema, "-1234567890", &AnswerSettings::default(), &mut rng)?;
//!     println!("{}", submission.body);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **Domain**: schema, answer and error types plus the [`domain::FormGateway`] port
//! - **Adapters**: the four pipeline stages and the HTTP client
//! - **Config**: layered settings (file, env, CLI)

pub mod adapters;
pub mod cli;
pub mod config;
pub mod domain;

use crate::adapters::answer_synthesizer::AnswerSynthesizer;
use crate::adapters::schema_navigator::SchemaNavigator;
use crate::adapters::submission_encoder::{SubmissionBody, SubmissionEncoder};
use crate::adapters::validation_interpreter::ValidationInterpreter;
use crate::config::AnswerSettings;
use crate::domain::{FillError, FormSchema, Submission, Warning};
use rand::Rng;
use serde_json::Value;
use tracing::{info, warn};

/// Runs one fill pass over a raw schema: navigate, synthesize every question in order, encode.
///
/// # Arguments
///
/// * `raw_schema` - the JSON array embedded in the form page
/// * `token` - per-load session token echoed back to the host
/// * `answers` - canned answer values
/// * `rng` - randomness source; pass a seeded generator for reproducible bodies
///
/// # Returns
///
/// The encoded body with the warnings for answers that could not honor a rule,
/// or the first fatal [`FillError`]. No body is produced on failure.
pub fn fill_form<R: Rng>(
    raw_schema: &Value,
    token: &str,
    answers: &AnswerSettings,
    rng: &mut R,
) -> Result<Submission, FillError> {
    if token.trim().is_empty() {
        return Err(FillError::EmptySessionToken);
    }

    let schema = SchemaNavigator::parse(raw_schema)?;
    let (body, warnings) = synthesize_body(&schema, SubmissionEncoder::new(token, &answers.email), answers, rng)?;

    info!(
        questions = schema.questions.len(),
        warnings = warnings.len(),
        "Generated request body"
    );

    Ok(Submission {
        body: body.to_string(),
        warnings,
    })
}

/// Synthesizes answers for an already navigated schema and encodes them.
pub fn synthesize_body<R: Rng>(
    schema: &FormSchema,
    encoder: SubmissionEncoder<'_>,
    answers: &AnswerSettings,
    rng: &mut R,
) -> Result<(SubmissionBody, Vec<Warning>), FillError> {
    let mut synthesizer = AnswerSynthesizer::new(rng, answers);
    let mut produced = Vec::with_capacity(schema.questions.len());
    let mut warnings = Vec::new();

    for question in &schema.questions {
        let constraint = question.validation.as_ref().map(ValidationInterpreter::interpret);
        let synthesized = synthesizer.synthesize(question, constraint.as_ref())?;

        for warning in &synthesized.warnings {
            warn!("{}", warning);
        }
        warnings.extend(synthesized.warnings);
        produced.extend(synthesized.answer);
    }

    let page_history = synthesizer.into_page_history();
    Ok((encoder.encode(schema, &produced, &page_history), warnings))
}
