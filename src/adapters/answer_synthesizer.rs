use crate::config::AnswerSettings;
use crate::domain::{
    Answer, Constraint, FillError, NumberBound, NumberComparison, PageHistory, Question,
    QuestionType, Warning,
};
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::Fake;
use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::debug;

/// Value the host expects on the base field when the "Other" choice is selected.
pub const OTHER_OPTION_SENTINEL: &str = "__other_option__";
pub const OTHER_OPTION_SUFFIX: &str = ".other_option_response";

/// Exclusive upper bound for random numbers and "not equal" offsets.
const RANDOM_NUMBER_CEILING: i128 = 50;
/// Hours go up to 24 inclusive; the host accepts it.
const HOUR_CEILING: u32 = 25;

/// What one question contributed to the submission.
#[derive(Debug, Default)]
pub struct Synthesized {
    /// `None` for section dividers.
    pub answer: Option<Answer>,
    pub warnings: Vec<Warning>,
}

/// Produces answers that satisfy decoded constraints, one question at a time and in order.
pub struct AnswerSynthesizer<'a, R> {
    rng: &'a mut R,
    answers: &'a AnswerSettings,
    page_history: PageHistory,
}

impl<'a, R: Rng> AnswerSynthesizer<'a, R> {
    pub fn new(rng: &'a mut R, answers: &'a AnswerSettings) -> Self {
        Self {
            rng,
            answers,
            page_history: PageHistory::new(),
        }
    }

    pub fn page_history(&self) -> &PageHistory {
        &self.page_history
    }

    pub fn into_page_history(self) -> PageHistory {
        self.page_history
    }

    pub fn synthesize(
        &mut self,
        question: &Question,
        constraint: Option<&Constraint>,
    ) -> Result<Synthesized, FillError> {
        if question.kind == QuestionType::SectionDivider {
            let page = self.page_history.advance();
            debug!(page, "Entered section");
            return Ok(Synthesized::default());
        }

        let entry_id = question
            .entry_id
            .as_deref()
            .ok_or(FillError::MissingEntryId {
                type_code: question.kind.code(),
            })?;
        let key = format!("entry.{}", entry_id);

        let mut warnings = Vec::new();
        if let Some(Constraint::Unsupported {
            category,
            subcategory,
        }) = constraint
        {
            warnings.push(Warning::UnsupportedValidation {
                entry_id: entry_id.to_string(),
                category: *category,
                subcategory: *subcategory,
            });
        }
        let constraint = constraint.filter(|c| !c.is_unsupported());

        let mut answer = Answer::default();
        match question.kind {
            QuestionType::ShortAnswer | QuestionType::LongAnswer => {
                if constraint.map_or(false, Constraint::is_checkbox_count) {
                    warnings.push(mismatch(entry_id, question));
                }
                let value = match constraint {
                    Some(Constraint::NumberRange { comparison, bound }) => {
                        match self.number_answer(*comparison, *bound) {
                            Some(value) => value,
                            None => {
                                warnings.push(Warning::NumberOutOfRange {
                                    entry_id: entry_id.to_string(),
                                    bound: bound.to_string(),
                                });
                                self.baseline(question.kind)
                            }
                        }
                    }
                    _ => self.text_answer(question.kind, constraint),
                };
                debug!(entry = %key, value = %value, "Filled out text entry");
                answer.push(key, value);
            }
            QuestionType::MultipleChoice
            | QuestionType::Dropdown
            | QuestionType::LinearScale
            | QuestionType::StarRating => {
                if constraint.is_some() {
                    warnings.push(mismatch(entry_id, question));
                }
                if question.choices.is_empty() {
                    return Err(FillError::NoChoices {
                        entry_id: entry_id.to_string(),
                    });
                }
                let pick = self.rng.gen_range(0..question.choices.len());
                let label = question.choices[pick].label.clone();
                debug!(entry = %key, choice = %label, "Selected random choice");
                answer.push(key, label);
            }
            QuestionType::Checkbox => {
                if question.choices.is_empty() {
                    return Err(FillError::NoChoices {
                        entry_id: entry_id.to_string(),
                    });
                }
                self.checkbox_answer(question, entry_id, &key, constraint, &mut answer, &mut warnings);
            }
            QuestionType::Date => {
                if question.needs_time_of_day {
                    self.time_fields(&key, &mut answer);
                }
                let year = self.rng.gen_range(0..10000u32);
                let month = self.rng.gen_range(1..=12u32);
                let day = if month == 2 {
                    self.rng.gen_range(1..=28u32)
                } else {
                    self.rng.gen_range(1..=30u32)
                };
                debug!(entry = %key, year, month, day, "Generated a random date");
                answer.push(format!("{}_year", key), year.to_string());
                answer.push(format!("{}_month", key), month.to_string());
                answer.push(format!("{}_day", key), day.to_string());
            }
            QuestionType::Time => self.time_fields(&key, &mut answer),
            QuestionType::SectionDivider => unreachable!("section dividers return early"),
            QuestionType::Unsupported(code) => {
                return Err(FillError::UnsupportedQuestionType { code });
            }
        }

        Ok(Synthesized {
            answer: Some(answer),
            warnings,
        })
    }

    fn baseline(&mut self, kind: QuestionType) -> String {
        if self.answers.bogus_sentences {
            return match kind {
                QuestionType::LongAnswer => Paragraph(2..4).fake_with_rng(&mut *self.rng),
                _ => Sentence(3..8).fake_with_rng(&mut *self.rng),
            };
        }
        match kind {
            QuestionType::LongAnswer => self.answers.long_answer.clone(),
            _ => self.answers.short_answer.clone(),
        }
    }

    fn text_answer(&mut self, kind: QuestionType, constraint: Option<&Constraint>) -> String {
        let baseline = self.baseline(kind);

        match constraint {
            Some(Constraint::TextContains(needle)) => format!("{} {}", needle, baseline),
            Some(Constraint::TextExcludes(needle)) => strip_all(baseline, needle),
            Some(Constraint::TextIsEmail) => self.answers.email.clone(),
            Some(Constraint::TextIsUrl) => self.answers.url.clone(),
            Some(Constraint::LengthMax(max)) => baseline.chars().take(*max).collect(),
            Some(Constraint::LengthMin(min)) => self.pad_to(baseline, *min),
            _ => baseline,
        }
    }

    /// `None` when no integer answer is representable for the bound.
    fn number_answer(&mut self, comparison: NumberComparison, bound: NumberBound) -> Option<String> {
        use NumberComparison::*;

        let value = match comparison {
            GreaterThan | GreaterOrEqual => bound.floor()?.checked_add(1)?.to_string(),
            LessThan | LessOrEqual | NotBetween => bound.ceil()?.checked_sub(1)?.to_string(),
            Equal | Between => bound.to_string(),
            NotEqual => {
                // Offset starts at 1 so the answer never lands on the bound itself.
                let offset = self.rng.gen_range(1..RANDOM_NUMBER_CEILING);
                let raw = bound.as_f64();
                match bound.integral() {
                    Some(exact) => exact.checked_add(offset)?.to_string(),
                    // Fractional floats are below 2^52, where the offset always changes the value.
                    None if raw.fract() != 0.0 => NumberBound::Decimal(raw + offset as f64).to_string(),
                    None => return None,
                }
            }
            IsNumber | IsInteger => self.rng.gen_range(0..RANDOM_NUMBER_CEILING).to_string(),
        };
        Some(value)
    }

    fn pad_to(&mut self, mut text: String, min: usize) -> String {
        let mut len = text.chars().count();
        if len >= min {
            return text;
        }
        if !text.is_empty() {
            text.push(' ');
            len += 1;
        }
        // Hosts trim answers, so a trailing space must not count toward `min`.
        while len < min || text.ends_with(' ') {
            let filler: u8 = self.rng.sample(Alphanumeric);
            text.push(char::from(filler));
            len += 1;
        }
        text
    }

    fn checkbox_answer(
        &mut self,
        question: &Question,
        entry_id: &str,
        key: &str,
        constraint: Option<&Constraint>,
        answer: &mut Answer,
        warnings: &mut Vec<Warning>,
    ) {
        let total = question.choices.len();
        let last = total - 1;
        let mut selected = 0usize;

        match constraint {
            Some(Constraint::CheckboxCountAtLeast(n)) | Some(Constraint::CheckboxCountExact(n)) => {
                if *n > total {
                    warnings.push(Warning::CheckboxCountExceedsChoices {
                        entry_id: entry_id.to_string(),
                        requested: *n,
                        available: total,
                    });
                }
                for idx in 0..(*n).min(total) {
                    selected += 1;
                    self.select_choice(question, key, idx, answer);
                }
            }
            Some(Constraint::CheckboxCountAtMost(n)) => {
                // Forcing the last pick can push the count past `n`.
                for idx in 0..total {
                    if self.rng.gen_bool(0.5) || (selected < *n && idx == last) {
                        selected += 1;
                        self.select_choice(question, key, idx, answer);
                    }
                }
            }
            other => {
                if other.is_some() {
                    warnings.push(mismatch(entry_id, question));
                }
                for idx in 0..total {
                    if self.rng.gen_bool(0.5) || (selected == 0 && idx == last) {
                        selected += 1;
                        self.select_choice(question, key, idx, answer);
                    }
                }
            }
        }

        debug!(entry = %key, selected, total, "Selected checkbox options");
    }

    fn select_choice(&mut self, question: &Question, key: &str, idx: usize, answer: &mut Answer) {
        let choice = &question.choices[idx];

        if choice.is_other {
            let response = self.baseline(QuestionType::ShortAnswer);
            answer.push(format!("{}{}", key, OTHER_OPTION_SUFFIX), response);
            answer.push(key, OTHER_OPTION_SENTINEL);
        } else {
            answer.push(key, choice.label.clone());
        }
    }

    fn time_fields(&mut self, key: &str, answer: &mut Answer) {
        let hour = self.rng.gen_range(0..HOUR_CEILING);
        let minute = self.rng.gen_range(0..60u32);
        debug!(entry = %key, hour, minute, "Generated a random time");
        answer.push(format!("{}_hour", key), hour.to_string());
        answer.push(format!("{}_minute", key), minute.to_string());
    }
}

fn mismatch(entry_id: &str, question: &Question) -> Warning {
    Warning::ConstraintMismatch {
        entry_id: entry_id.to_string(),
        type_code: question.kind.code(),
    }
}

/// Removes `needle` until none is left; a single pass can splice a new occurrence together.
fn strip_all(mut text: String, needle: &str) -> String {
    if needle.is_empty() {
        return text;
    }
    while text.contains(needle) {
        text = text.replace(needle, "");
    }
    text
}
