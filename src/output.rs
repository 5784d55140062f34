//! Output formatting and persistence for scouting reports.
//!
//! Supports pretty-printing, JSON serialization, and the spreadsheet report.

mod workbook;

use std::io::Write;

use anyhow::Result;
use tracing::debug;

use crate::analysis::pipeline::ScoutingReport;

pub use workbook::write_workbook;

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(report: &ScoutingReport) {
    debug!("{:#?}", report);
}

/// Writes the report as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut writer: W, report: &ScoutingReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
