//! Field parsers for raw scouting cells.
//!
//! Each function takes one cell's text and returns a typed value, a sentinel
//! for a blank cell, or a [`FieldError`].

use crate::analysis::types::{DefenseTier, HangarTier, SENTINEL, Taxi, Tier};
use crate::error::FieldError;

/// Parses a team or match number.
///
/// Accepts float-formatted input such as `"254.0"` and truncates it. A blank
/// cell yields [`SENTINEL`].
///
/// # Errors
///
/// Returns [`FieldError::Parse`] for non-numeric or non-finite text.
pub fn parse_number(raw: &str) -> Result<i64, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(SENTINEL);
    }

    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v.trunc() as i64),
        _ => Err(FieldError::Parse {
            value: raw.to_string(),
        }),
    }
}

/// Returns the largest count in a comma-separated list such as `"0,1,2"`.
///
/// Scouts append a new reading each time they correct a count, so the maximum
/// is taken as authoritative. Empty segments count as zero; a blank cell
/// yields [`SENTINEL`].
///
/// # Errors
///
/// Returns [`FieldError::Parse`] if a non-empty segment is not an integer.
pub fn max_of_comma_separated(raw: &str) -> Result<i64, FieldError> {
    if raw.trim().is_empty() {
        return Ok(SENTINEL);
    }

    let mut max = SENTINEL;
    for segment in raw.split(',') {
        let segment = segment.trim();
        let value = if segment.is_empty() {
            0
        } else {
            segment.parse::<i64>().map_err(|_| FieldError::Parse {
                value: raw.to_string(),
            })?
        };
        max = max.max(value);
    }

    Ok(max)
}

pub fn parse_taxi(raw: &str) -> Result<Taxi, FieldError> {
    Taxi::from_label(raw).ok_or_else(|| unrecognized(raw))
}

/// Parses a climb tier. A blank cell means the scout did not record one.
pub fn parse_hangar(raw: &str) -> Result<Option<HangarTier>, FieldError> {
    parse_tier(raw)
}

pub fn parse_defense(raw: &str) -> Result<Option<DefenseTier>, FieldError> {
    parse_tier(raw)
}

fn parse_tier<T: Tier>(raw: &str) -> Result<Option<T>, FieldError> {
    if raw.is_empty() {
        return Ok(None);
    }
    T::from_label(raw).map(Some).ok_or_else(|| unrecognized(raw))
}

fn unrecognized(raw: &str) -> FieldError {
    FieldError::UnrecognizedCategory {
        value: raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_of_comma_separated() {
        assert_eq!(max_of_comma_separated("0,3,1"), Ok(3));
        assert_eq!(max_of_comma_separated("5"), Ok(5));
        assert_eq!(max_of_comma_separated(""), Ok(-1));
        assert_eq!(max_of_comma_separated("0,"), Ok(0));
    }

    #[test]
    fn test_max_of_comma_separated_tolerates_spaces() {
        assert_eq!(max_of_comma_separated("0, 1, 2, 3"), Ok(3));
        assert_eq!(max_of_comma_separated(",,4"), Ok(4));
    }

    #[test]
    fn test_max_of_comma_separated_rejects_text() {
        let result = max_of_comma_separated("1,two");
        assert_eq!(
            result,
            Err(FieldError::Parse {
                value: "1,two".to_string()
            })
        );
        assert!(max_of_comma_separated("1.5").is_err());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("254"), Ok(254));
        assert_eq!(parse_number("254.0"), Ok(254));
        assert_eq!(parse_number("12.9"), Ok(12));
        assert_eq!(parse_number(" 7 "), Ok(7));
        assert_eq!(parse_number(""), Ok(-1));
    }

    #[test]
    fn test_parse_number_rejects_garbage() {
        assert!(parse_number("team254").is_err());
        assert!(parse_number("inf").is_err());
        assert!(parse_number("NaN").is_err());
    }

    #[test]
    fn test_parse_taxi() {
        assert_eq!(parse_taxi("Yes"), Ok(Taxi::Yes));
        assert_eq!(parse_taxi("No"), Ok(Taxi::No));
        assert_eq!(parse_taxi(""), Ok(Taxi::Unknown));
        assert!(matches!(
            parse_taxi("YES"),
            Err(FieldError::UnrecognizedCategory { .. })
        ));
    }

    #[test]
    fn test_parse_hangar() {
        assert_eq!(parse_hangar("Mid Rung (2)"), Ok(Some(HangarTier::Mid)));
        assert_eq!(parse_hangar(""), Ok(None));
        assert!(parse_hangar("Mid Rung").is_err());
        assert!(parse_hangar("No Hang ").is_err());
    }

    #[test]
    fn test_parse_defense() {
        assert_eq!(parse_defense("Unsure"), Ok(Some(DefenseTier::Unsure)));
        assert_eq!(parse_defense(""), Ok(None));
        assert!(parse_defense("Maybe").is_err());
    }
}
