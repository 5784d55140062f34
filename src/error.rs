//! Error taxonomy for the scouting pipeline.
//!
//! Every variant of [`ScoutError`] is fatal: the run aborts before any output
//! is written. Non-fatal conditions (sentinel team numbers, duplicate matches)
//! are counted by the aggregator instead of being raised.

use thiserror::Error;

/// Failure to turn a single raw cell into a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("cannot parse {value:?} as a number")]
    Parse { value: String },

    #[error("{value:?} is not a recognized category")]
    UnrecognizedCategory { value: String },
}

#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("row {row}, column {column} ({field}): {source}")]
    Field {
        row: usize,
        column: usize,
        field: &'static str,
        #[source]
        source: FieldError,
    },

    #[error("row {row}: expected at least {expected} columns, found {found}")]
    MissingColumns {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("team {team_num} has no accepted matches")]
    EmptyTeam { team_num: i64 },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ScoutError {
    /// True for the two input-integrity failures raised by the field parser.
    pub fn is_field_error(&self) -> bool {
        matches!(self, ScoutError::Field { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_message_includes_location() {
        let err = ScoutError::Field {
            row: 7,
            column: 10,
            field: "hangar tier",
            source: FieldError::UnrecognizedCategory {
                value: "low rung".to_string(),
            },
        };

        let msg = err.to_string();
        assert!(msg.contains("row 7"));
        assert!(msg.contains("column 10"));
        assert!(msg.contains("hangar tier"));
        assert!(err.is_field_error());
    }

    #[test]
    fn test_empty_team_message() {
        let err = ScoutError::EmptyTeam { team_num: 254 };
        assert_eq!(err.to_string(), "team 254 has no accepted matches");
        assert!(!err.is_field_error());
    }
}
