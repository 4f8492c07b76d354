use crate::domain::{Choice, FillError, FormSchema, Question, QuestionType, RawValidation};
use serde_json::Value;
use tracing::debug;

/// A named position inside the positional schema arrays.
#[derive(Debug, Clone, Copy)]
pub struct SchemaPath {
    pub name: &'static str,
    pub indices: &'static [usize],
}

impl SchemaPath {
    const fn new(name: &'static str, indices: &'static [usize]) -> Self {
        Self { name, indices }
    }

    /// Walks the path; `None` as soon as an index is out of range or a node is not an array.
    pub fn lookup<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.indices
            .iter()
            .try_fold(root, |node, &idx| node.get(idx))
            .filter(|v| !v.is_null())
    }

    pub fn require<'v>(&self, root: &'v Value, scope: &str) -> Result<&'v Value, FillError> {
        self.lookup(root)
            .ok_or_else(|| FillError::malformed(self.describe(scope), "value is missing"))
    }

    pub fn describe(&self, scope: &str) -> String {
        let indices: String = self.indices.iter().map(|i| format!("[{}]", i)).collect();
        format!("{} ({}{})", self.name, scope, indices)
    }
}

// Form level, relative to the schema root.
pub const QUESTION_LIST: SchemaPath = SchemaPath::new("question list", &[1, 1]);
pub const EMAIL_FLAG: SchemaPath = SchemaPath::new("email collection flag", &[1, 10, 6]);

// Question level, relative to one question descriptor.
pub const QUESTION_TITLE: SchemaPath = SchemaPath::new("question title", &[1]);
pub const QUESTION_TYPE: SchemaPath = SchemaPath::new("question type", &[3]);
pub const ENTRY_ID: SchemaPath = SchemaPath::new("entry id", &[4, 0, 0]);
pub const CHOICE_LIST: SchemaPath = SchemaPath::new("choice list", &[4, 0, 1]);
pub const VALIDATION: SchemaPath = SchemaPath::new("validation", &[4, 0, 4, 0]);
pub const TIME_FLAG: SchemaPath = SchemaPath::new("time flag", &[4, 0, 7, 0]);

// Choice and validation level.
const CHOICE_LABEL: SchemaPath = SchemaPath::new("choice label", &[0]);
const CHOICE_OTHER_FLAG: SchemaPath = SchemaPath::new("other flag", &[4]);
const VALIDATION_CATEGORY: SchemaPath = SchemaPath::new("validation category", &[0]);
const VALIDATION_SUBCATEGORY: SchemaPath = SchemaPath::new("validation subcategory", &[1]);
const VALIDATION_OPERANDS: SchemaPath = SchemaPath::new("validation operands", &[2]);

/// Host value of the email flag meaning "collect respondent email".
const COLLECTS_EMAIL: i64 = 3;

/// Turns the raw schema array into normalized questions.
pub struct SchemaNavigator;

impl SchemaNavigator {
    pub fn parse(raw: &Value) -> Result<FormSchema, FillError> {
        if !raw.is_array() {
            return Err(FillError::malformed("schema root", "expected an array"));
        }

        // The host emits `null` for a form without questions.
        let descriptors: &[Value] = match QUESTION_LIST.lookup(raw) {
            Some(Value::Array(items)) => items.as_slice(),
            Some(_) => {
                return Err(FillError::malformed(
                    QUESTION_LIST.describe("schema"),
                    "expected an array of question descriptors",
                ))
            }
            None if raw.get(1).map_or(false, Value::is_array) => &[],
            None => return Err(FillError::malformed(QUESTION_LIST.describe("schema"), "value is missing")),
        };

        let mut questions = Vec::with_capacity(descriptors.len());
        for (idx, descriptor) in descriptors.iter().enumerate() {
            let scope = format!("questions[{}]", idx);
            if let Some(question) = Self::parse_question(descriptor, &scope)? {
                questions.push(question);
            }
        }

        let collects_email = EMAIL_FLAG.lookup(raw).and_then(Value::as_i64) == Some(COLLECTS_EMAIL);

        debug!(
            questions = questions.len(),
            collects_email, "Parsed form schema"
        );

        Ok(FormSchema {
            questions,
            collects_email,
        })
    }

    /// `Ok(None)` for static content blocks that take no input.
    fn parse_question(descriptor: &Value, scope: &str) -> Result<Option<Question>, FillError> {
        if !descriptor.is_array() {
            return Err(FillError::malformed(scope, "question descriptor is not an array"));
        }

        let type_code = QUESTION_TYPE
            .require(descriptor, scope)?
            .as_i64()
            .ok_or_else(|| FillError::malformed(QUESTION_TYPE.describe(scope), "expected an integer"))?;

        let title = QUESTION_TITLE
            .lookup(descriptor)
            .and_then(Value::as_str)
            .map(str::to_string);

        if QuestionType::is_static_content(type_code) {
            debug!(title = ?title, type_code, "Skipping static content block");
            return Ok(None);
        }

        let entry_id = ENTRY_ID.lookup(descriptor).and_then(scalar_to_string);
        let choices = match CHOICE_LIST.lookup(descriptor) {
            Some(Value::Array(items)) => items.iter().map(parse_choice).collect(),
            _ => Vec::new(),
        };
        let validation = VALIDATION
            .lookup(descriptor)
            .map(|v| parse_validation(v, scope))
            .transpose()?;
        let needs_time_of_day = TIME_FLAG.lookup(descriptor).and_then(Value::as_i64) == Some(1);

        Ok(Some(Question {
            entry_id,
            kind: QuestionType::from_code(type_code),
            title,
            choices,
            validation,
            needs_time_of_day,
        }))
    }
}

fn parse_choice(raw: &Value) -> Choice {
    Choice {
        label: CHOICE_LABEL
            .lookup(raw)
            .and_then(scalar_to_string)
            .unwrap_or_default(),
        is_other: CHOICE_OTHER_FLAG.lookup(raw).and_then(Value::as_i64) == Some(1),
    }
}

fn parse_validation(raw: &Value, scope: &str) -> Result<RawValidation, FillError> {
    let code = |path: SchemaPath| -> Result<i64, FillError> {
        path.require(raw, scope)?
            .as_i64()
            .ok_or_else(|| FillError::malformed(path.describe(scope), "expected an integer"))
    };

    let operands = match VALIDATION_OPERANDS.lookup(raw) {
        Some(Value::Array(items)) => items.clone(),
        Some(single) => vec![single.clone()],
        None => Vec::new(),
    };

    Ok(RawValidation {
        category: code(VALIDATION_CATEGORY)?,
        subcategory: code(VALIDATION_SUBCATEGORY)?,
        operands,
    })
}

/// Entry ids and labels arrive as either JSON numbers or strings.
fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
