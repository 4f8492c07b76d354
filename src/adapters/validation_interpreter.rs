use crate::domain::{Constraint, NumberBound, NumberComparison, RawValidation};
use serde_json::Value;
use tracing::warn;

pub const CATEGORY_NUMBER: i64 = 1;
pub const CATEGORY_TEXT: i64 = 2;
pub const CATEGORY_REGEX: i64 = 4;
pub const CATEGORY_LENGTH: i64 = 6;

/// Operand assumed by the host when a numeric or length rule carries none.
const DEFAULT_OPERAND: i128 = 1;

/// Decodes `[category, subcategory, operands]` descriptors into typed constraints.
pub struct ValidationInterpreter;

impl ValidationInterpreter {
    pub fn interpret(raw: &RawValidation) -> Constraint {
        let unsupported = Constraint::Unsupported {
            category: raw.category,
            subcategory: raw.subcategory,
        };

        let constraint = match (raw.category, raw.subcategory) {
            (CATEGORY_NUMBER, sub) => {
                number_comparison(sub).and_then(|comparison| Self::number_range(comparison, &raw.operands))
            }
            (CATEGORY_TEXT, 100) => Some(Constraint::TextContains(text_operand(&raw.operands))),
            (CATEGORY_TEXT, 101) => Some(Constraint::TextExcludes(text_operand(&raw.operands))),
            (CATEGORY_TEXT, 102) => Some(Constraint::TextIsEmail),
            (CATEGORY_TEXT, 103) => Some(Constraint::TextIsUrl),
            (CATEGORY_LENGTH, 202) => length_operand(&raw.operands, f64::floor).map(Constraint::LengthMax),
            (CATEGORY_LENGTH, 203) => length_operand(&raw.operands, f64::ceil).map(Constraint::LengthMin),
            // Checkbox count subcategories are unique, the host pairs them with varying categories.
            (_, 200) => count_operand(&raw.operands).map(Constraint::CheckboxCountAtLeast),
            (_, 201) => count_operand(&raw.operands).map(Constraint::CheckboxCountAtMost),
            (_, 204) => count_operand(&raw.operands).map(Constraint::CheckboxCountExact),
            _ => None,
        };

        match constraint {
            Some(constraint) => constraint,
            None => {
                if raw.category == CATEGORY_REGEX {
                    warn!("No handling for regular expression validation (subcategory {})", raw.subcategory);
                } else {
                    warn!(
                        category = raw.category,
                        subcategory = raw.subcategory,
                        operands = ?raw.operands,
                        "Unknown or unreadable validation rule"
                    );
                }
                unsupported
            }
        }
    }

    fn number_range(comparison: NumberComparison, operands: &[Value]) -> Option<Constraint> {
        let mut bound = match operands.first() {
            Some(value) => numeric_operand(value)?,
            None => NumberBound::Integer(DEFAULT_OPERAND),
        };

        // Ranges may arrive with their ends swapped; answers only need the lower one.
        if matches!(comparison, NumberComparison::Between | NumberComparison::NotBetween) {
            if let Some(upper) = operands.get(1).and_then(numeric_operand) {
                let swapped = match (upper, bound) {
                    (NumberBound::Integer(hi), NumberBound::Integer(lo)) => hi < lo,
                    _ => upper.as_f64() < bound.as_f64(),
                };
                if swapped {
                    bound = upper;
                }
            }
        }

        Some(Constraint::NumberRange { comparison, bound })
    }
}

fn number_comparison(subcategory: i64) -> Option<NumberComparison> {
    use NumberComparison::*;

    Some(match subcategory {
        1 => GreaterThan,
        2 => GreaterOrEqual,
        3 => LessThan,
        4 => LessOrEqual,
        5 => Equal,
        6 => NotEqual,
        7 => Between,
        8 => NotBetween,
        9 => IsNumber,
        10 => IsInteger,
        _ => return None,
    })
}

/// Operands come as JSON numbers or as numeric strings. Integers are kept exact.
fn numeric_operand(value: &Value) -> Option<NumberBound> {
    match value {
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(i), _) => Some(NumberBound::Integer(i.into())),
            (None, Some(u)) => Some(NumberBound::Integer(u.into())),
            _ => n.as_f64().and_then(decimal),
        },
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i128>() {
                Ok(i) => Some(NumberBound::Integer(i)),
                Err(_) => s.parse::<f64>().ok().and_then(decimal),
            }
        }
        _ => None,
    }
}

fn decimal(value: f64) -> Option<NumberBound> {
    value.is_finite().then_some(NumberBound::Decimal(value))
}

fn text_operand(operands: &[Value]) -> String {
    match operands.first() {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn length_operand(operands: &[Value], round: fn(f64) -> f64) -> Option<usize> {
    let raw = match operands.first() {
        Some(value) => numeric_operand(value)?.as_f64(),
        None => DEFAULT_OPERAND as f64,
    };
    Some(round(raw).max(0.0) as usize)
}

fn count_operand(operands: &[Value]) -> Option<usize> {
    let raw = numeric_operand(operands.first()?)?.as_f64();
    Some(raw.floor().max(0.0) as usize)
}
