use thiserror::Error;

use crate::config::{AnswerSettings, DebugSettings, HttpSettings, Settings};

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

pub struct ConfigValidator;

impl ConfigValidator {
    pub fn validate(settings: &Settings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = Self::validate_answers(&settings.answers) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_debug(&settings.debug) {
            errors.extend(e);
        }

        if let Err(e) = Self::validate_http(&settings.http) {
            errors.extend(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_answers(answers: &AnswerSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if answers.short_answer.is_empty() {
            errors.push(ValidationError::MissingField("answers.short_answer".to_string()));
        }

        if answers.long_answer.is_empty() {
            errors.push(ValidationError::MissingField("answers.long_answer".to_string()));
        }

        // Hosts reject email-validated answers without a local part and a dotted domain.
        match answers.email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') && !domain.contains('@') => {}
            _ => errors.push(ValidationError::InvalidValue {
                field: "answers.email".to_string(),
                reason: format!("'{}' is not an email address", answers.email),
            }),
        }

        if let Err(e) = reqwest::Url::parse(&answers.url) {
            errors.push(ValidationError::InvalidValue {
                field: "answers.url".to_string(),
                reason: e.to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_debug(debug: &DebugSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if debug.use_default_url {
            match &debug.default_form_url {
                None => errors.push(ValidationError::MissingField("debug.default_form_url".to_string())),
                Some(url) => {
                    if let Err(e) = reqwest::Url::parse(url) {
                        errors.push(ValidationError::InvalidValue {
                            field: "debug.default_form_url".to_string(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn validate_http(http: &HttpSettings) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if http.user_agent.is_empty() {
            errors.push(ValidationError::MissingField("http.user_agent".to_string()));
        }

        if http.timeout_seconds == 0 {
            errors.push(ValidationError::InvalidValue {
                field: "http.timeout_seconds".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
