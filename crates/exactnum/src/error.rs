//! Error type shared by every fallible arithmetic operation.
//!
//! All failures are local to the operation that raised them: nothing here is
//! fatal, and no operation returns a partial result alongside an error.

use std::fmt;

/// Result type alias for arithmetic operations that can fail.
pub type ArithResult<T> = Result<T, ArithError>;

/// Error returned when an arithmetic operation cannot produce a valid result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArithError {
    /// A construction string could not be parsed.
    MalformedNumericLiteral { input: String, reason: &'static str },
    /// Integer or decimal division (or `mod`) by a zero-valued operand.
    DivisionByZero,
    /// `UNNECESSARY` rounding met a non-zero discarded digit.
    RoundingRequired,
    /// Unlimited-precision division detected a repeating remainder cycle.
    NonTerminatingDecimal { digits: usize },
    /// The result cannot be represented within the requested precision.
    PrecisionOverflow { precision: u32, needed: u64 },
    /// `mod`, `mod_pow` or `mod_inverse` received an unusable modulus.
    InvalidModulus { reason: &'static str },
    /// `probable_prime` exhausted its candidate budget.
    PrimeGenerationExhausted { bits: u64, attempts: usize },
    /// Square root of a negative value.
    NegativeSquareRoot,
    /// A result scale falls outside the 64-bit signed range.
    ScaleOverflow,
    /// Any other argument outside an operation's domain.
    InvalidArgument { operation: &'static str, reason: String },
}

impl ArithError {
    /// Builds a `MalformedNumericLiteral` for `input`.
    pub(crate) fn malformed(input: &str, reason: &'static str) -> Self {
        Self::MalformedNumericLiteral {
            input: input.to_owned(),
            reason,
        }
    }

    /// Builds an `InvalidArgument` for the named operation.
    pub(crate) fn invalid(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ArithError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedNumericLiteral { input, reason } => {
                write!(f, "malformed numeric literal {input:?}: {reason}")
            }
            Self::DivisionByZero => write!(f, "division by zero"),
            Self::RoundingRequired => write!(f, "rounding necessary"),
            Self::NonTerminatingDecimal { digits } => {
                write!(
                    f,
                    "non-terminating decimal expansion; no exact representable result (cycle after {digits} digits)"
                )
            }
            Self::PrecisionOverflow { precision, needed } => {
                write!(f, "result needs {needed} digits but precision is {precision}")
            }
            Self::InvalidModulus { reason } => write!(f, "invalid modulus: {reason}"),
            Self::PrimeGenerationExhausted { bits, attempts } => {
                write!(f, "no {bits}-bit probable prime found after {attempts} attempts")
            }
            Self::NegativeSquareRoot => write!(f, "square root of a negative value"),
            Self::ScaleOverflow => write!(f, "scale out of range"),
            Self::InvalidArgument { operation, reason } => write!(f, "{operation}: {reason}"),
        }
    }
}

impl std::error::Error for ArithError {}
