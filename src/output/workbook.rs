//! Spreadsheet report: one ranking sheet followed by one sheet per team.

use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{
    Chart, ChartFormat, ChartPoint, ChartSolidFill, ChartType, ColNum, Format, RowNum, Workbook,
    Worksheet,
};
use tracing::{debug, info, warn};

use crate::analysis::pipeline::{ScoutingReport, TeamSummary};
use crate::analysis::rank::{Metric, RankingTable, TeamRanks};
use crate::analysis::types::{DefenseTier, HangarTier, Tier};

const RANKING_SHEET: &str = "Rankings";

// Team sheet layout (zero-based rows).
const CHART_ROW: RowNum = 0;
const CHART_ROW_SPACING: RowNum = 16;
const FIRST_CHART_COL: ColNum = 0;
const SECOND_CHART_COL: ColNum = 4;
const THIRD_CHART_COL: ColNum = 8;
const STATISTICS_ROW: RowNum = 16;
const RANKS_ROW: RowNum = 22;
const AVERAGES_ROW: RowNum = 33;
const DATA_ROW: RowNum = 37;

const MATCH_NUM_COL: ColNum = 0;

/// Longest string Excel stores in a single cell, in characters.
const MAX_CELL_CHARS: usize = 32_767;

// Helper columns feeding the charts.
const HANGAR_LABEL_COL: ColNum = 19;
const HANGAR_FREQ_COL: ColNum = 20;
const DEFENSE_LABEL_COL: ColNum = 21;
const DEFENSE_FREQ_COL: ColNum = 22;
const TAXI_NUM_COL: ColNum = 23;
const CLIMB_NUM_COL: ColNum = 24;
const DEFENSE_NUM_COL: ColNum = 25;

// Chart axis ceilings for a single robot.
const MAX_AUTO_CARGO: f64 = 10.0;
const MAX_TELE_CARGO: f64 = 30.0;
const MAX_HANGAR_POINTS: f64 = 15.0;

const RED: &str = "#EA5545";
const BLUE: &str = "#27AEEF";
const YELLOW: &str = "#FFCA3A";
const GREEN: &str = "#4DA167";
const BLACK: &str = "#252323";

/// Background colors for highlighted teams, indexed by ordinal - 1.
const TEAM_COLORS: [&str; 25] = [
    "#fe3b1e", "#f4ea5c", "#2d69cb", "#11963b", "#e61cf7", "#b7c0ff", "#ae6507", "#4f02ec",
    "#fa2f7a", "#51e113", "#6febff", "#f7aa30", "#992f7c", "#00a6ee", "#acbe9c", "#a12c32",
    "#9b9500", "#08fdcc", "#827c70", "#8e7ba4", "#566204", "#fb9fda", "#08a29a", "#2a666a",
    "#805D93",
];

const MATCH_COLUMNS: [(&str, u16); 9] = [
    ("Qualification Number", 120),
    ("Taxi", 50),
    ("AUTO - Cargo Scored [Upper Hub]", 180),
    ("AUTO - Cargo Scored [Lower Hub]", 180),
    ("TELEOP - Cargo Scored [Upper Hub]", 190),
    ("TELEOP - Cargo Scored [Lower Hub]", 190),
    ("Hangar", 100),
    ("Mostly defense?", 90),
    ("Other Information", 1000),
];

struct Formats {
    percent: Format,
    one_decimal: Format,
    bold: Format,
    highlight: Vec<Format>,
}

impl Formats {
    fn new() -> Self {
        Self {
            percent: Format::new().set_num_format("0.0%"),
            one_decimal: Format::new().set_num_format("0.0"),
            bold: Format::new().set_bold(),
            highlight: TEAM_COLORS
                .iter()
                .map(|&c| Format::new().set_num_format("0").set_background_color(c))
                .collect(),
        }
    }

    fn for_ordinal(&self, ordinal: usize) -> &Format {
        &self.highlight[(ordinal - 1) % self.highlight.len()]
    }

    fn for_metric(&self, metric: Metric) -> &Format {
        match metric {
            Metric::DefenseFraction => &self.percent,
            _ => &self.one_decimal,
        }
    }
}

/// Builds the workbook in memory and saves it to `path`, replacing any
/// existing file. Nothing is written unless every sheet builds.
#[tracing::instrument(skip(report), fields(path = %path.display(), teams = report.teams.len()))]
pub fn write_workbook(report: &ScoutingReport, path: &Path) -> Result<()> {
    let formats = Formats::new();
    let mut workbook = Workbook::new();

    workbook.push_worksheet(ranking_sheet(report, &formats)?);

    for team in &report.teams {
        let ranks = report.ranks_for(team.team_num());
        let sheet = team_sheet(team, &ranks, &formats)
            .with_context(|| format!("failed to build sheet for team {}", team.team_num()))?;
        workbook.push_worksheet(sheet);
        debug!(team = team.team_num(), "Team sheet built");
    }

    workbook
        .save(path)
        .with_context(|| format!("failed to save workbook '{}'", path.display()))?;

    info!(sheets = report.teams.len() + 1, "Workbook written");
    Ok(())
}

fn ranking_sheet(report: &ScoutingReport, formats: &Formats) -> Result<Worksheet> {
    let mut sheet = Worksheet::new();
    sheet.set_name(RANKING_SHEET)?;

    sheet.write_string_with_format(0, 0, "#", &formats.bold)?;
    sheet.set_column_width_pixels(0, 20)?;
    sheet.set_column_width_pixels(1, 10)?;

    for rank in 1..=report.teams.len() {
        sheet.write_number(rank as RowNum, 0, rank as f64)?;
    }

    for (i, table) in report.rankings.tables.iter().enumerate() {
        let team_col = 2 + 3 * i as ColNum;
        write_ranking_column(&mut sheet, report, table, team_col, formats)?;
    }

    let stamp_col = 2 + 3 * report.rankings.tables.len() as ColNum;
    sheet.write_string(0, stamp_col, "Generated")?;
    sheet.write_string(
        0,
        stamp_col + 1,
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )?;

    Ok(sheet)
}

fn write_ranking_column(
    sheet: &mut Worksheet,
    report: &ScoutingReport,
    table: &RankingTable,
    team_col: ColNum,
    formats: &Formats,
) -> Result<()> {
    let value_col = team_col + 1;
    let value_width = match table.metric {
        Metric::MatchContribution => 170,
        Metric::AutoPoints => 80,
        Metric::TeleopPoints => 90,
        Metric::ClimbPoints => 85,
        Metric::DefenseFraction => 60,
    };

    sheet.write_string_with_format(0, team_col, "Team", &formats.bold)?;
    sheet.write_string_with_format(0, value_col, table.metric.heading(), &formats.bold)?;
    sheet.set_column_width_pixels(team_col, 40)?;
    sheet.set_column_width_pixels(value_col, value_width)?;
    sheet.set_column_width_pixels(value_col + 1, 10)?;

    for (i, &(team_num, value)) in table.entries.iter().enumerate() {
        let row = i as RowNum + 1;
        match report.rankings.highlights.ordinal(team_num) {
            Some(ordinal) => {
                sheet.write_number_with_format(
                    row,
                    team_col,
                    team_num as f64,
                    formats.for_ordinal(ordinal),
                )?;
            }
            None => {
                sheet.write_number(row, team_col, team_num as f64)?;
            }
        }
        sheet.write_number_with_format(row, value_col, value, formats.for_metric(table.metric))?;
    }

    Ok(())
}

fn team_sheet(team: &TeamSummary, ranks: &TeamRanks, formats: &Formats) -> Result<Worksheet> {
    let name = team.team_num().to_string();
    let mut sheet = Worksheet::new();
    sheet.set_name(&name)?;

    write_statistics(&mut sheet, team, formats)?;
    write_ranks(&mut sheet, ranks, formats)?;
    write_averages(&mut sheet, team, formats)?;
    write_matches(&mut sheet, team, formats)?;
    write_frequencies(&mut sheet, team)?;
    insert_charts(&mut sheet, &name, team.record.matches.len())?;

    Ok(sheet)
}

fn write_statistics(sheet: &mut Worksheet, team: &TeamSummary, formats: &Formats) -> Result<()> {
    let avg = &team.stats.averages;
    let scores = &team.stats.scores;
    let row = STATISTICS_ROW;

    let lines: [(&str, f64, &Format, Option<&str>); 5] = [
        ("Taxi Percentage: ", avg.taxi_rate, &formats.percent, None),
        (
            "Avg. Auto Points: ",
            scores.avg_auto_points,
            &formats.one_decimal,
            Some("(Including avg. taxi points)"),
        ),
        ("Avg. Teleop Points: ", scores.avg_tele_points, &formats.one_decimal, None),
        ("Avg. Climb Points: ", avg.avg_climb_points, &formats.one_decimal, None),
        (
            "Defense Percentage: ",
            avg.avg_defense_fraction,
            &formats.percent,
            Some("(100% = Yes/Always, 0% = No/Never)"),
        ),
    ];

    for (i, (label, value, format, note)) in lines.into_iter().enumerate() {
        let r = row + i as RowNum;
        sheet.write_string(r, 0, label)?;
        sheet.write_number_with_format(r, 1, value, format)?;
        if let Some(note) = note {
            sheet.write_string(r, 2, note)?;
        }
    }

    Ok(())
}

fn write_ranks(sheet: &mut Worksheet, ranks: &TeamRanks, formats: &Formats) -> Result<()> {
    sheet.write_string_with_format(RANKS_ROW, 0, "Ranked Category", &formats.bold)?;
    sheet.write_string_with_format(RANKS_ROW, 1, "Rank", &formats.bold)?;

    for (i, metric) in Metric::ALL.iter().enumerate() {
        let row = RANKS_ROW + 1 + i as RowNum;
        sheet.write_string(row, 0, metric.rank_label())?;
        if let Some(position) = ranks.get(*metric) {
            sheet.write_number(row, 1, position as f64)?;
        }
    }

    Ok(())
}

fn write_averages(sheet: &mut Worksheet, team: &TeamSummary, formats: &Formats) -> Result<()> {
    let avg = &team.stats.averages;

    let cells: [(&str, f64, &Format); 7] = [
        ("Taxi", avg.taxi_rate, &formats.percent),
        ("AUTO - Cargo Scored [Upper Hub]", avg.avg_auto_upper, &formats.one_decimal),
        ("AUTO - Cargo Scored [Lower Hub]", avg.avg_auto_lower, &formats.one_decimal),
        ("TELEOP - Cargo Scored [Upper Hub]", avg.avg_tele_upper, &formats.one_decimal),
        ("TELEOP - Cargo Scored [Lower Hub]", avg.avg_tele_lower, &formats.one_decimal),
        ("Hangar", avg.avg_climb_points, &formats.one_decimal),
        ("Mostly defense?", avg.avg_defense_fraction, &formats.percent),
    ];

    sheet.write_string(AVERAGES_ROW, 0, "Averages:")?;
    for (i, (heading, value, format)) in cells.into_iter().enumerate() {
        let col = 1 + i as ColNum;
        sheet.write_string(AVERAGES_ROW - 1, col, heading)?;
        sheet.write_number_with_format(AVERAGES_ROW, col, value, format)?;
    }

    Ok(())
}

fn write_matches(sheet: &mut Worksheet, team: &TeamSummary, formats: &Formats) -> Result<()> {
    sheet.write_string_with_format(DATA_ROW - 1, 0, "MATCH DATA", &formats.bold)?;
    for (col, (heading, width)) in MATCH_COLUMNS.iter().enumerate() {
        let col = col as ColNum;
        sheet.write_string(DATA_ROW, col, *heading)?;
        sheet.set_column_width_pixels(col, (*width).into())?;
    }
    sheet.write_string(DATA_ROW, TAXI_NUM_COL, "Taxi Num")?;
    sheet.write_string(DATA_ROW, CLIMB_NUM_COL, "Climb Num")?;
    sheet.write_string(DATA_ROW, DEFENSE_NUM_COL, "Defense Num")?;

    for (i, m) in team.record.matches.iter().enumerate() {
        let row = DATA_ROW + 1 + i as RowNum;
        sheet.write_number(row, MATCH_NUM_COL, m.qual_match_num as f64)?;
        sheet.write_string(row, 1, m.taxi.label())?;
        sheet.write_number(row, 2, m.auto_cargo_upper as f64)?;
        sheet.write_number(row, 3, m.auto_cargo_lower as f64)?;
        sheet.write_number(row, 4, m.tele_cargo_upper as f64)?;
        sheet.write_number(row, 5, m.tele_cargo_lower as f64)?;
        sheet.write_string(row, 6, m.hangar.map_or("", HangarTier::label))?;
        sheet.write_string(row, 7, m.defense.map_or("", DefenseTier::label))?;
        sheet.write_string(row, 8, fit_cell(&m.other_info, m.row))?;

        sheet.write_number(row, TAXI_NUM_COL, m.taxi.value())?;
        sheet.write_number(row, CLIMB_NUM_COL, m.hangar_points())?;
        sheet.write_number(row, DEFENSE_NUM_COL, m.defense_fraction())?;
    }

    Ok(())
}

/// Cuts text to the cell limit on a char boundary.
fn fit_cell(text: &str, row: usize) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            warn!(row, chars = MAX_CELL_CHARS, "Notes truncated to fit a cell");
            &text[..end]
        }
        None => text,
    }
}

fn write_frequencies(sheet: &mut Worksheet, team: &TeamSummary) -> Result<()> {
    sheet.write_string(DATA_ROW, HANGAR_LABEL_COL, "Hangar levels")?;
    sheet.write_string(DATA_ROW, HANGAR_FREQ_COL, "Frequency")?;
    for (i, (tier, count)) in team.record.hangar_counts.iter().enumerate() {
        let row = DATA_ROW + 1 + i as RowNum;
        sheet.write_string(row, HANGAR_LABEL_COL, tier.label())?;
        sheet.write_number(row, HANGAR_FREQ_COL, count as f64)?;
    }

    sheet.write_string(DATA_ROW, DEFENSE_LABEL_COL, "Defense levels")?;
    sheet.write_string(DATA_ROW, DEFENSE_FREQ_COL, "Frequency")?;
    for (i, (tier, count)) in team.record.defense_counts.iter().enumerate() {
        let row = DATA_ROW + 1 + i as RowNum;
        sheet.write_string(row, DEFENSE_LABEL_COL, tier.label())?;
        sheet.write_number(row, DEFENSE_FREQ_COL, count as f64)?;
    }

    Ok(())
}

fn solid_fill(color: &str) -> ChartFormat {
    let mut fill = ChartSolidFill::new();
    fill.set_color(color);
    let mut format = ChartFormat::new();
    format.set_solid_fill(&fill);
    format
}

/// Column chart with match numbers along the x axis.
fn match_chart(
    sheet_name: &str,
    match_count: usize,
    title: &str,
    y_name: &str,
    y_max: f64,
    series: &[(&str, ColNum, &str)],
) -> Chart {
    let first = DATA_ROW + 1;
    let last = DATA_ROW + match_count as RowNum;

    let mut chart = Chart::new(ChartType::Column);
    chart.title().set_name(title);
    chart.x_axis().set_name("Qualification Match");
    chart.y_axis().set_name(y_name).set_min(0.0).set_max(y_max);

    for &(name, col, color) in series {
        chart
            .add_series()
            .set_name(name)
            .set_categories((sheet_name, first, MATCH_NUM_COL, last, MATCH_NUM_COL))
            .set_values((sheet_name, first, col, last, col))
            .set_format(&mut solid_fill(color));
    }

    chart
}

fn pie_chart(
    sheet_name: &str,
    title: &str,
    series_name: &str,
    label_col: ColNum,
    value_col: ColNum,
    colors: &[&str],
) -> Chart {
    let first = DATA_ROW + 1;
    let last = DATA_ROW + colors.len() as RowNum;
    let points: Vec<ChartPoint> = colors
        .iter()
        .map(|&c| ChartPoint::new().set_format(&mut solid_fill(c)))
        .collect();

    let mut chart = Chart::new(ChartType::Pie);
    chart.title().set_name(title);
    chart
        .add_series()
        .set_name(series_name)
        .set_categories((sheet_name, first, label_col, last, label_col))
        .set_values((sheet_name, first, value_col, last, value_col))
        .set_points(&points);

    chart
}

fn insert_charts(sheet: &mut Worksheet, sheet_name: &str, match_count: usize) -> Result<()> {
    let auto = match_chart(
        sheet_name,
        match_count,
        "AUTO - Upper vs. Lower Hub Cargo",
        "Cargo Scored",
        MAX_AUTO_CARGO,
        &[("Upper Hub", 2, BLUE), ("Lower Hub", 3, RED)],
    );
    sheet.insert_chart(CHART_ROW, FIRST_CHART_COL, &auto)?;

    let teleop = match_chart(
        sheet_name,
        match_count,
        "TELEOP - Upper vs. Lower Hub Cargo",
        "Cargo Scored",
        MAX_TELE_CARGO,
        &[("Upper Hub", 4, BLUE), ("Lower Hub", 5, RED)],
    );
    sheet.insert_chart(CHART_ROW, SECOND_CHART_COL, &teleop)?;

    let hangar_over_time = match_chart(
        sheet_name,
        match_count,
        "Hangar Points Over Time",
        "Hangar Points",
        MAX_HANGAR_POINTS,
        &[("Hangar Points", CLIMB_NUM_COL, RED)],
    );
    sheet.insert_chart(CHART_ROW + CHART_ROW_SPACING, SECOND_CHART_COL, &hangar_over_time)?;

    let hangar_colors = [BLACK, RED, YELLOW, BLUE, GREEN];
    debug_assert_eq!(hangar_colors.len(), HangarTier::ALL.len());
    let hangar_pie = pie_chart(
        sheet_name,
        "Climb Level Breakdown",
        "Climb Level",
        HANGAR_LABEL_COL,
        HANGAR_FREQ_COL,
        &hangar_colors,
    );
    sheet.insert_chart(CHART_ROW + CHART_ROW_SPACING, THIRD_CHART_COL, &hangar_pie)?;

    let defense_colors = [RED, YELLOW, GREEN];
    debug_assert_eq!(defense_colors.len(), DefenseTier::ALL.len());
    let defense_pie = pie_chart(
        sheet_name,
        "Does This Team Play Defense?",
        "Defense",
        DEFENSE_LABEL_COL,
        DEFENSE_FREQ_COL,
        &defense_colors,
    );
    sheet.insert_chart(CHART_ROW, THIRD_CHART_COL, &defense_pie)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::pipeline::run;
    use crate::config::PipelineConfig;
    use std::env;
    use std::fs;

    #[test]
    fn test_fit_cell_keeps_short_text() {
        assert_eq!(fit_cell("quick cycles", 2), "quick cycles");
        let exact = "x".repeat(MAX_CELL_CHARS);
        assert_eq!(fit_cell(&exact, 2).len(), MAX_CELL_CHARS);
    }

    #[test]
    fn test_fit_cell_cuts_on_char_boundary() {
        let long = "é".repeat(MAX_CELL_CHARS + 10);
        let cut = fit_cell(&long, 2);
        assert_eq!(cut.chars().count(), MAX_CELL_CHARS);
        assert!(long.starts_with(cut));
    }

    #[test]
    fn test_oversized_notes_still_save() {
        let input = format!(
            "Timestamp,Email,Scout,Team,Match,Taxi,AutoUpper,AutoLower,TeleUpper,TeleLower,Hangar,Defense,Notes\n\
             t,e,s,100,1,Yes,2,1,3,2,Low Rung (1),No,{}\n",
            "x".repeat(40_000)
        );
        let report = run(input.as_bytes(), &PipelineConfig::default()).unwrap();

        let path = format!("{}/scouting_report_long_notes.xlsx", env::temp_dir().display());
        let _ = fs::remove_file(&path);
        write_workbook(&report, Path::new(&path)).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], b"PK");
        fs::remove_file(&path).unwrap();
    }
}
