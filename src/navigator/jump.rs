//! Jump-to-slide input parsing.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

lazy_static! {
    /// Leading integer the way a browser number field reads it: optional
    /// whitespace and sign, then digits; trailing text is ignored.
    #[allow(clippy::expect_used)]
    static ref RE_LEADING_INT: Regex = Regex::new(r"^\s*([+-]?)(\d+)").expect("valid regex: RE_LEADING_INT");
}

/// Why a jump request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JumpError {
    /// Nothing numeric at the start of the input.
    #[error("'{0}' is not a slide number")]
    NotANumber(String),
    /// A number, but not one of the slides.
    #[error("slide {number} is outside 1..={total}")]
    OutOfRange {
        /// The 1-indexed number typed.
        number: i64,
        /// Slides in the deck.
        total: usize,
    },
}

/// Parse a 1-indexed slide number into a 0-indexed target.
///
/// Returns `Ok(None)` for an empty field.
pub fn parse_jump_target(input: &str, total: usize) -> Result<Option<usize>, JumpError> {
    if input.is_empty() {
        return Ok(None);
    }
    let caps = RE_LEADING_INT
        .captures(input)
        .ok_or_else(|| JumpError::NotANumber(input.to_string()))?;
    let negative = caps.get(1).is_some_and(|m| m.as_str() == "-");
    let digits = caps.get(2).map_or("", |m| m.as_str());
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    let number = if negative { -magnitude } else { magnitude };

    match usize::try_from(number) {
        Ok(n) if (1..=total).contains(&n) => Ok(Some(n - 1)),
        _ => Err(JumpError::OutOfRange { number, total }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numbers_in_range() {
        assert_eq!(parse_jump_target("1", 5), Ok(Some(0)));
        assert_eq!(parse_jump_target("5", 5), Ok(Some(4)));
        assert_eq!(parse_jump_target("  3", 5), Ok(Some(2)));
        assert_eq!(parse_jump_target("+2", 5), Ok(Some(1)));
    }

    #[test]
    fn ignores_trailing_text_like_parse_int() {
        assert_eq!(parse_jump_target("4abc", 5), Ok(Some(3)));
        assert_eq!(parse_jump_target("2.9", 5), Ok(Some(1)));
    }

    #[test]
    fn empty_input_is_not_an_error() {
        assert_eq!(parse_jump_target("", 5), Ok(None));
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(parse_jump_target("7", 5), Err(JumpError::OutOfRange { number: 7, total: 5 }));
        assert_eq!(parse_jump_target("0", 5), Err(JumpError::OutOfRange { number: 0, total: 5 }));
        assert_eq!(parse_jump_target("-1", 5), Err(JumpError::OutOfRange { number: -1, total: 5 }));
        assert!(matches!(
            parse_jump_target("99999999999999999999999", 5),
            Err(JumpError::OutOfRange { .. })
        ));
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(parse_jump_target("abc", 5), Err(JumpError::NotANumber("abc".into())));
        assert_eq!(parse_jump_target("   ", 5), Err(JumpError::NotANumber("   ".into())));
    }
}
