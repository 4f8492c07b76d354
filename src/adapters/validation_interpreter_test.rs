use super::validation_interpreter::ValidationInterpreter;
use crate::domain::{Constraint, NumberBound, NumberComparison, RawValidation};
use serde_json::{json, Value};

fn rule(category: i64, subcategory: i64, operands: Vec<Value>) -> RawValidation {
    RawValidation {
        category,
        subcategory,
        operands,
    }
}

fn number(comparison: NumberComparison, bound: NumberBound) -> Constraint {
    Constraint::NumberRange { comparison, bound }
}

#[test]
fn test_number_subcategories() {
    use NumberComparison::*;

    let cases = [
        (1, GreaterThan),
        (2, GreaterOrEqual),
        (3, LessThan),
        (4, LessOrEqual),
        (5, Equal),
        (6, NotEqual),
        (9, IsNumber),
        (10, IsInteger),
    ];
    for (subcategory, comparison) in cases {
        let constraint = ValidationInterpreter::interpret(&rule(1, subcategory, vec![json!("5")]));
        assert_eq!(
            constraint,
            number(comparison, NumberBound::Integer(5)),
            "subcategory {}",
            subcategory
        );
    }
}

#[test]
fn test_number_ranges_use_lower_end() {
    let between = ValidationInterpreter::interpret(&rule(1, 7, vec![json!("3"), json!("9")]));
    assert_eq!(between, number(NumberComparison::Between, NumberBound::Integer(3)));

    let outside = ValidationInterpreter::interpret(&rule(1, 8, vec![json!(3), json!(9)]));
    assert_eq!(outside, number(NumberComparison::NotBetween, NumberBound::Integer(3)));

    let swapped = ValidationInterpreter::interpret(&rule(1, 7, vec![json!("9"), json!("2.5")]));
    assert_eq!(swapped, number(NumberComparison::Between, NumberBound::Decimal(2.5)));
}

#[test]
fn test_number_operand_forms() {
    let from_float_string = ValidationInterpreter::interpret(&rule(1, 1, vec![json!(" 2.5 ")]));
    assert_eq!(
        from_float_string,
        number(NumberComparison::GreaterThan, NumberBound::Decimal(2.5))
    );

    let from_float = ValidationInterpreter::interpret(&rule(1, 1, vec![json!(-0.5)]));
    assert_eq!(
        from_float,
        number(NumberComparison::GreaterThan, NumberBound::Decimal(-0.5))
    );

    let defaulted = ValidationInterpreter::interpret(&rule(1, 1, vec![]));
    assert_eq!(
        defaulted,
        number(NumberComparison::GreaterThan, NumberBound::Integer(1))
    );

    let unreadable = ValidationInterpreter::interpret(&rule(1, 1, vec![json!("five")]));
    assert_eq!(
        unreadable,
        Constraint::Unsupported {
            category: 1,
            subcategory: 1
        }
    );
}

#[test]
fn test_large_integer_operands_stay_exact() {
    let from_string =
        ValidationInterpreter::interpret(&rule(1, 1, vec![json!("9007199254740993")]));
    assert_eq!(
        from_string,
        number(NumberComparison::GreaterThan, NumberBound::Integer(9_007_199_254_740_993))
    );

    let from_number = ValidationInterpreter::interpret(&rule(1, 6, vec![json!(u64::MAX)]));
    assert_eq!(
        from_number,
        number(NumberComparison::NotEqual, NumberBound::Integer(u64::MAX as i128))
    );

    let beyond_i128 = ValidationInterpreter::interpret(&rule(
        1,
        1,
        vec![json!("1000000000000000000000000000000000000000")],
    ));
    assert_eq!(
        beyond_i128,
        number(NumberComparison::GreaterThan, NumberBound::Decimal(1e39))
    );
}

#[test]
fn test_text_subcategories() {
    assert_eq!(
        ValidationInterpreter::interpret(&rule(2, 100, vec![json!("hello")])),
        Constraint::TextContains("hello".to_string())
    );
    assert_eq!(
        ValidationInterpreter::interpret(&rule(2, 101, vec![json!("sample")])),
        Constraint::TextExcludes("sample".to_string())
    );
    assert_eq!(
        ValidationInterpreter::interpret(&rule(2, 102, vec![])),
        Constraint::TextIsEmail
    );
    assert_eq!(
        ValidationInterpreter::interpret(&rule(2, 103, vec![])),
        Constraint::TextIsUrl
    );
}

#[test]
fn test_length_subcategories() {
    assert_eq!(
        ValidationInterpreter::interpret(&rule(6, 202, vec![json!("10")])),
        Constraint::LengthMax(10)
    );
    assert_eq!(
        ValidationInterpreter::interpret(&rule(6, 203, vec![json!(40)])),
        Constraint::LengthMin(40)
    );
    // Fractional limits round toward the satisfying side.
    assert_eq!(
        ValidationInterpreter::interpret(&rule(6, 202, vec![json!("4.5")])),
        Constraint::LengthMax(4)
    );
    assert_eq!(
        ValidationInterpreter::interpret(&rule(6, 203, vec![json!("4.5")])),
        Constraint::LengthMin(5)
    );
}

#[test]
fn test_checkbox_count_subcategories() {
    assert_eq!(
        ValidationInterpreter::interpret(&rule(7, 200, vec![json!("2")])),
        Constraint::CheckboxCountAtLeast(2)
    );
    assert_eq!(
        ValidationInterpreter::interpret(&rule(7, 201, vec![json!("3")])),
        Constraint::CheckboxCountAtMost(3)
    );
    assert_eq!(
        ValidationInterpreter::interpret(&rule(7, 204, vec![json!(2)])),
        Constraint::CheckboxCountExact(2)
    );
    // Count rules without a count cannot be honored.
    assert!(ValidationInterpreter::interpret(&rule(7, 204, vec![])).is_unsupported());
}

#[test]
fn test_regex_is_unsupported() {
    let constraint = ValidationInterpreter::interpret(&rule(4, 299, vec![json!("[a-z]+")]));
    assert_eq!(
        constraint,
        Constraint::Unsupported {
            category: 4,
            subcategory: 299
        }
    );
}

#[test]
fn test_unknown_codes_are_unsupported() {
    for (category, subcategory) in [(1, 11), (2, 104), (6, 200 + 9), (9, 1)] {
        let constraint = ValidationInterpreter::interpret(&rule(category, subcategory, vec![json!("1")]));
        assert_eq!(
            constraint,
            Constraint::Unsupported {
                category,
                subcategory
            }
        );
    }
}
