use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberComparison {
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    Equal,
    NotEqual,
    /// Inclusive range between the two operands.
    Between,
    /// Outside the range between the two operands.
    NotBetween,
    IsNumber,
    IsInteger,
}

/// Numeric rule operand. Integral operands stay exact; only fractional ones are floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberBound {
    Integer(i128),
    Decimal(f64),
}

impl NumberBound {
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Integer(i) => *i as f64,
            Self::Decimal(d) => *d,
        }
    }

    /// The bound as an exact integer, when it is one and fits in `i128`.
    pub fn integral(&self) -> Option<i128> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Decimal(d) if d.fract() == 0.0 => to_i128(*d),
            Self::Decimal(_) => None,
        }
    }

    /// Largest integer not above the bound.
    pub fn floor(&self) -> Option<i128> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Decimal(d) => to_i128(d.floor()),
        }
    }

    /// Smallest integer not below the bound.
    pub fn ceil(&self) -> Option<i128> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Decimal(d) => to_i128(d.ceil()),
        }
    }
}

fn to_i128(value: f64) -> Option<i128> {
    // i128::MAX as f64 rounds up to 2^127, which does not fit.
    (value >= i128::MIN as f64 && value < i128::MAX as f64).then(|| value as i128)
}

impl fmt::Display for NumberBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{}", i),
            // Avoids rendering "-0".
            Self::Decimal(d) if *d == 0.0 => f.write_str("0"),
            Self::Decimal(d) => write!(f, "{}", d),
        }
    }
}

/// A decoded validation rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// For `Between` and `NotBetween` the bound is the lower end of the range.
    NumberRange {
        comparison: NumberComparison,
        bound: NumberBound,
    },
    TextContains(String),
    TextExcludes(String),
    TextIsEmail,
    TextIsUrl,
    LengthMax(usize),
    LengthMin(usize),
    CheckboxCountExact(usize),
    CheckboxCountAtLeast(usize),
    CheckboxCountAtMost(usize),
    Unsupported {
        category: i64,
        subcategory: i64,
    },
}

impl Constraint {
    pub fn is_checkbox_count(&self) -> bool {
        matches!(
            self,
            Self::CheckboxCountExact(_) | Self::CheckboxCountAtLeast(_) | Self::CheckboxCountAtMost(_)
        )
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}
