use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod constraint;
pub mod error;

pub use constraint::{Constraint, NumberBound, NumberComparison};
pub use error::{FillError, Warning};

use crate::adapters::form_client::ClientError;

/// Host type code of a question, as found at `q[3]` in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionType {
    ShortAnswer,
    LongAnswer,
    MultipleChoice,
    Checkbox,
    Dropdown,
    LinearScale,
    StarRating,
    SectionDivider,
    Date,
    Time,
    /// Any code the synthesizer has no handler for.
    Unsupported(i64),
}

impl QuestionType {
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::ShortAnswer,
            1 => Self::LongAnswer,
            2 => Self::MultipleChoice,
            3 => Self::Dropdown,
            4 => Self::Checkbox,
            5 => Self::LinearScale,
            8 => Self::SectionDivider,
            9 => Self::Date,
            10 => Self::Time,
            18 => Self::StarRating,
            other => Self::Unsupported(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::ShortAnswer => 0,
            Self::LongAnswer => 1,
            Self::MultipleChoice => 2,
            Self::Dropdown => 3,
            Self::Checkbox => 4,
            Self::LinearScale => 5,
            Self::SectionDivider => 8,
            Self::Date => 9,
            Self::Time => 10,
            Self::StarRating => 18,
            Self::Unsupported(code) => *code,
        }
    }

    /// Static content blocks (title/description = 6, image = 11) carry no input.
    pub fn is_static_content(code: i64) -> bool {
        matches!(code, 6 | 11)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    /// The "Other:" choice that takes a free-text response.
    pub is_other: bool,
}

/// Validation descriptor exactly as the schema carries it: `[category, subcategory, [operand, ...]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawValidation {
    pub category: i64,
    pub subcategory: i64,
    #[serde(default)]
    pub operands: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub entry_id: Option<String>,
    pub kind: QuestionType,
    pub title: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub validation: Option<RawValidation>,
    /// Only meaningful for `QuestionType::Date`.
    #[serde(default)]
    pub needs_time_of_day: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    pub questions: Vec<Question>,
    pub collects_email: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub key: String,
    pub value: String,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// All fields produced for one question, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub fields: Vec<Field>,
}

impl Answer {
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push(Field::new(key, value));
    }

    pub fn values_for<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |f| f.key == key)
            .map(|f| f.value.as_str())
    }
}

/// Visited section indices; always starts with section 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageHistory {
    pages: Vec<u32>,
}

impl PageHistory {
    pub fn new() -> Self {
        Self { pages: vec![0] }
    }

    /// Records the next section and returns its index.
    pub fn advance(&mut self) -> u32 {
        let next = self.pages.last().copied().unwrap_or(0) + 1;
        self.pages.push(next);
        next
    }

    pub fn pages(&self) -> &[u32] {
        &self.pages
    }

    pub fn joined(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for PageHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Schema and session token as handed over by the retrieval step.
#[derive(Debug, Clone)]
pub struct RawForm {
    pub schema: Value,
    pub token: String,
}

/// Result of one fill pass: the encoded body plus everything that was only approximated.
#[derive(Debug, Clone)]
pub struct Submission {
    pub body: String,
    pub warnings: Vec<Warning>,
}

#[async_trait]
pub trait FormGateway: Send + Sync {
    async fn fetch(&self, form_url: &str) -> Result<RawForm, ClientError>;
    async fn submit(&self, form_url: &str, token: &str, body: &str) -> Result<u16, ClientError>;
}
