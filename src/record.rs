//! Builds [`MatchEntry`] values from CSV rows.
//!
//! The scouting form export has a fixed positional layout; only the columns
//! listed in [`columns`] are read and everything else is ignored.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::analysis::types::MatchEntry;
use crate::error::{FieldError, ScoutError};
use crate::parser::{
    max_of_comma_separated, parse_defense, parse_hangar, parse_number, parse_taxi,
};

/// Zero-based column positions in the scouting export.
pub mod columns {
    pub const TEAM: usize = 3;
    pub const QUAL_MATCH: usize = 4;
    pub const TAXI: usize = 5;
    pub const AUTO_UPPER: usize = 6;
    pub const AUTO_LOWER: usize = 7;
    pub const TELE_UPPER: usize = 8;
    pub const TELE_LOWER: usize = 9;
    pub const HANGAR: usize = 10;
    pub const DEFENSE: usize = 11;
    pub const NOTES: usize = 12;

    /// Minimum number of columns a data row must have.
    pub const REQUIRED: usize = NOTES + 1;
}

/// Reads every data row from CSV text. The header row is always skipped.
///
/// # Errors
///
/// Stops at the first malformed row; no entries are returned in that case.
#[tracing::instrument(skip(input))]
pub fn read_entries<R: Read>(input: R) -> Result<Vec<MatchEntry>, ScoutError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input);

    let mut entries = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let record = result?;
        // Quoted notes may span lines, so prefer the reader's line count.
        let row = record
            .position()
            .map_or(i + 2, |pos| pos.line() as usize);
        debug!(row, "Processing row");
        entries.push(build_entry(row, &record)?);
    }

    debug!(count = entries.len(), "Rows parsed");
    Ok(entries)
}

/// Assembles one row into an immutable [`MatchEntry`].
pub fn build_entry(row: usize, record: &StringRecord) -> Result<MatchEntry, ScoutError> {
    if record.len() < columns::REQUIRED {
        return Err(ScoutError::MissingColumns {
            row,
            expected: columns::REQUIRED,
            found: record.len(),
        });
    }

    let cell = |column: usize| record.get(column).unwrap_or_default();

    let field = |column: usize, name: &'static str| {
        move |source: FieldError| ScoutError::Field {
            row,
            column,
            field: name,
            source,
        }
    };

    use columns::*;

    Ok(MatchEntry {
        row,
        team_num: parse_number(cell(TEAM)).map_err(field(TEAM, "team number"))?,
        qual_match_num: parse_number(cell(QUAL_MATCH))
            .map_err(field(QUAL_MATCH, "qual match number"))?,
        taxi: parse_taxi(cell(TAXI)).map_err(field(TAXI, "taxi"))?,
        auto_cargo_upper: max_of_comma_separated(cell(AUTO_UPPER))
            .map_err(field(AUTO_UPPER, "auto cargo upper"))?,
        auto_cargo_lower: max_of_comma_separated(cell(AUTO_LOWER))
            .map_err(field(AUTO_LOWER, "auto cargo lower"))?,
        tele_cargo_upper: max_of_comma_separated(cell(TELE_UPPER))
            .map_err(field(TELE_UPPER, "teleop cargo upper"))?,
        tele_cargo_lower: max_of_comma_separated(cell(TELE_LOWER))
            .map_err(field(TELE_LOWER, "teleop cargo lower"))?,
        hangar: parse_hangar(cell(HANGAR)).map_err(field(HANGAR, "hangar tier"))?,
        defense: parse_defense(cell(DEFENSE)).map_err(field(DEFENSE, "defense tier"))?,
        other_info: cell(NOTES).to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{DefenseTier, HangarTier, Taxi};

    const HEADER: &str = "Timestamp,Email,Scout,Team,Match,Taxi,AutoUpper,AutoLower,TeleUpper,TeleLower,Hangar,Defense,Notes\n";

    fn csv_with(rows: &[&str]) -> String {
        let mut text = HEADER.to_string();
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_read_entries_skips_header() {
        let text = csv_with(&[
            "t,e,s,254,3,Yes,\"0,1,2\",1,\"3,4\",0,High Rung (3),Unsure,fast robot",
        ]);
        let entries = read_entries(text.as_bytes()).unwrap();

        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.row, 2);
        assert_eq!(e.team_num, 254);
        assert_eq!(e.qual_match_num, 3);
        assert_eq!(e.taxi, Taxi::Yes);
        assert_eq!(e.auto_cargo_upper, 2);
        assert_eq!(e.auto_cargo_lower, 1);
        assert_eq!(e.tele_cargo_upper, 4);
        assert_eq!(e.tele_cargo_lower, 0);
        assert_eq!(e.hangar, Some(HangarTier::High));
        assert_eq!(e.defense, Some(DefenseTier::Unsure));
        assert_eq!(e.other_info, "fast robot");
    }

    #[test]
    fn test_row_numbers_follow_multiline_notes() {
        let text = csv_with(&[
            "t,e,s,100,1,Yes,1,0,2,1,No Hang,No,\"line one\nline two\"",
            "t,e,s,100,2,Maybe,1,0,2,1,No Hang,No,",
        ]);

        match read_entries(text.as_bytes()) {
            Err(ScoutError::Field { row, column, .. }) => {
                assert_eq!(row, 4);
                assert_eq!(column, columns::TAXI);
            }
            other => panic!("expected field error, got {other:?}"),
        }
    }

    #[test]
    fn test_header_only_input_has_no_entries() {
        let entries = read_entries(HEADER.as_bytes()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_blank_team_becomes_sentinel() {
        let text = csv_with(&[",,,,,,,,,,,,"]);
        let entries = read_entries(text.as_bytes()).unwrap();

        assert_eq!(entries[0].team_num, -1);
        assert_eq!(entries[0].qual_match_num, -1);
        assert_eq!(entries[0].taxi, Taxi::Unknown);
        assert_eq!(entries[0].auto_cargo_upper, -1);
        assert_eq!(entries[0].hangar, None);
        assert_eq!(entries[0].defense, None);
    }

    #[test]
    fn test_unrecognized_category_is_fatal() {
        let text = csv_with(&[
            "t,e,s,254,1,Yes,0,0,0,0,No Hang,No,",
            "t,e,s,254,2,Yes,0,0,0,0,Top Rung,No,",
        ]);
        let err = read_entries(text.as_bytes()).unwrap_err();

        match err {
            ScoutError::Field {
                row, column, source, ..
            } => {
                assert_eq!(row, 3);
                assert_eq!(column, columns::HANGAR);
                assert!(matches!(source, FieldError::UnrecognizedCategory { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bad_number_is_fatal() {
        let text = csv_with(&["t,e,s,abc,1,Yes,0,0,0,0,No Hang,No,"]);
        let err = read_entries(text.as_bytes()).unwrap_err();
        assert!(err.is_field_error());
    }

    #[test]
    fn test_short_row_is_rejected() {
        let text = csv_with(&["t,e,s,254,1,Yes"]);
        let err = read_entries(text.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            ScoutError::MissingColumns {
                row: 2,
                expected: 13,
                found: 6
            }
        ));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let text = csv_with(&["t,e,s,100,1,No,0,0,0,0,No Hang,No,note,extra,more"]);
        let entries = read_entries(text.as_bytes()).unwrap();
        assert_eq!(entries[0].other_info, "note");
    }
}
