use crate::config::HttpSettings;
use crate::domain::{FormGateway, RawForm};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, REFERER};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Script variable holding the form schema on the served page.
const SCHEMA_MARKER: &str = "FB_PUBLIC_LOAD_DATA_";
/// Form attribute holding the per-load session token.
const TOKEN_ATTRIBUTE: &str = "data-shuffle-seed";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to extract FB_PUBLIC_LOAD_DATA_ from the form page")]
    MissingSchema,

    #[error("Failed to extract the session token (data-shuffle-seed) from the form page")]
    MissingToken,

    #[error("Form schema is not valid JSON: {0}")]
    InvalidSchemaJson(#[from] serde_json::Error),

    #[error("Form submission rejected with status {status}")]
    UnexpectedStatus { status: u16 },
}

/// Pulls the schema and session token out of a served form page.
pub fn extract_form_data(html: &str) -> Result<RawForm, ClientError> {
    let schema = extract_schema(html)?;
    let token = form_attribute(html, TOKEN_ATTRIBUTE)
        .filter(|t| !t.is_empty())
        .ok_or(ClientError::MissingToken)?;

    Ok(RawForm { schema, token })
}

fn extract_schema(html: &str) -> Result<Value, ClientError> {
    let start = html.find(SCHEMA_MARKER).ok_or(ClientError::MissingSchema)?;
    let after_marker = &html[start + SCHEMA_MARKER.len()..];
    let (_, assigned) = after_marker
        .split_once('=')
        .ok_or(ClientError::MissingSchema)?;

    // The array is followed by `;` and more script, so only the first value is read.
    let mut values = serde_json::Deserializer::from_str(assigned.trim_start()).into_iter::<Value>();
    let schema = values.next().ok_or(ClientError::MissingSchema)??;

    if !schema.is_array() {
        return Err(ClientError::MissingSchema);
    }
    Ok(schema)
}

/// Value of `name` on the first `<form>` tag that carries it.
fn form_attribute(html: &str, name: &str) -> Option<String> {
    const FORM_TAG: &str = "<form";

    let mut rest = html;
    while let Some(start) = rest.find(FORM_TAG) {
        let after_name = &rest[start + FORM_TAG.len()..];
        if !after_name.starts_with(|c: char| c.is_ascii_whitespace() || c == '>') {
            rest = after_name;
            continue;
        }
        let end = after_name.find('>')?;
        if let Some(value) = tag_attribute(&after_name[..end], name) {
            return Some(value);
        }
        rest = &after_name[end..];
    }
    None
}

/// Quoted value of `name` inside one tag's attribute text.
fn tag_attribute(attributes: &str, name: &str) -> Option<String> {
    let needle = format!("{}=", name);
    let mut offset = 0;
    while let Some(found) = attributes[offset..].find(&needle) {
        let start = offset + found;
        offset = start + needle.len();
        // Skip matches that are the tail of a longer attribute name.
        if !attributes[..start].ends_with(|c: char| c.is_ascii_whitespace()) {
            continue;
        }
        let rest = &attributes[offset..];
        let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
        let value = &rest[1..];
        let end = value.find(quote)?;
        return Some(value[..end].to_string());
    }
    None
}

/// Submission endpoint for a `/viewform` URL.
pub fn response_url(form_url: &str) -> String {
    form_url.replace("/viewform", "/formResponse")
}

pub struct HttpFormClient {
    client: reqwest::Client,
    accept_language: String,
}

impl HttpFormClient {
    pub fn new(settings: &HttpSettings) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            accept_language: settings.accept_language.clone(),
        })
    }
}

#[async_trait]
impl FormGateway for HttpFormClient {
    async fn fetch(&self, form_url: &str) -> Result<RawForm, ClientError> {
        info!("Fetching form page {}", form_url);
        let html = self
            .client
            .get(form_url)
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        extract_form_data(&html)
    }

    async fn submit(&self, form_url: &str, token: &str, body: &str) -> Result<u16, ClientError> {
        let url = response_url(form_url);
        info!("Submitting form response to {}", url);

        let response = self
            .client
            .post(&url)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, &self.accept_language)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(REFERER, format!("{}?fbzx={}", form_url, token))
            .header("Sec-GPC", "1")
            .header("Upgrade-Insecure-Requests", "1")
            .body(body.to_string())
            .send()
            .await?;

        Ok(response.status().as_u16())
    }
}
