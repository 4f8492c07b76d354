use crate::domain::{Answer, FormSchema, PageHistory};
use std::fmt;
use urlencoding::{decode, encode};

/// Format version the host expects on every submission.
const FORM_VERSION: &str = "1";

/// Encoded `key=value` segments in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionBody {
    segments: Vec<String>,
}

impl SubmissionBody {
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Percent-decoded `(key, value)` pairs, in order.
    pub fn pairs(&self) -> Vec<(String, String)> {
        decode_pairs(&self.to_string())
    }

    fn push(&mut self, key: &str, encoded_value: String) {
        self.segments.push(format!("{}={}", encode(key), encoded_value));
    }
}

impl fmt::Display for SubmissionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("&"))
    }
}

/// Splits an `application/x-www-form-urlencoded` string back into decoded pairs.
pub fn decode_pairs(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let (key, value) = segment.split_once('=').unwrap_or((segment, ""));
            (decode_lossy(key), decode_lossy(value))
        })
        .collect()
}

fn decode_lossy(raw: &str) -> String {
    decode(raw)
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Appends answers and the trailing metadata block the host needs to accept a response.
pub struct SubmissionEncoder<'a> {
    token: &'a str,
    email: &'a str,
    timestamp_ms: Option<i64>,
}

impl<'a> SubmissionEncoder<'a> {
    pub fn new(token: &'a str, email: &'a str) -> Self {
        Self {
            token,
            email,
            timestamp_ms: None,
        }
    }

    /// Pins `submissionTimestamp` instead of reading the clock.
    pub fn with_timestamp(mut self, timestamp_ms: i64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    pub fn encode(
        &self,
        schema: &FormSchema,
        answers: &[Answer],
        page_history: &PageHistory,
    ) -> SubmissionBody {
        let mut body = SubmissionBody {
            segments: Vec::new(),
        };

        for field in answers.iter().flat_map(|a| a.fields.iter()) {
            body.push(&field.key, encode(&field.value).into_owned());
        }

        if schema.collects_email {
            body.push("emailAddress", encode(self.email).into_owned());
        }

        let token = encode(self.token);
        body.push("fvv", FORM_VERSION.to_string());
        // JSON `[null,null,"<token>"]`, pre-encoded around the encoded token.
        body.push("partialResponse", format!("%5Bnull%2Cnull%2C%22{}%22%5D", token));
        body.push("pageHistory", encode(&page_history.joined()).into_owned());
        body.push("fbzx", token.into_owned());

        let timestamp = self
            .timestamp_ms
            .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
        body.push("submissionTimestamp", timestamp.to_string());

        body
    }
}
