// Reading the vote results from an Excel workbook.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};
use election_tally::builder::TallyBuilder;

use crate::vizzard::{io_common::ensure_exists, *};

// The first two rows are headers.
const HEADER_ROWS: u32 = 2;
// The columns are positional, the header names are not read.
const STATE_COLUMN: u32 = 1;
const B_VOTES_COLUMN: u32 = 3;
const A_VOTES_COLUMN: u32 = 4;

pub fn read_vote_results(path: &str, worksheet_name: &str) -> VizzardResult<VoteTally> {
    ensure_exists(path)?;
    let wrange = get_range(path, worksheet_name)?;
    let tally = read_results_range(&wrange);
    info!("Loaded {} state vote results.", tally.len());
    Ok(tally)
}

/// The worksheet to read: the requested one if it exists, the first one otherwise.
pub fn select_worksheet(sheet_names: &[String], worksheet_name: &str) -> Option<String> {
    if sheet_names.iter().any(|s| s == worksheet_name) {
        Some(worksheet_name.to_string())
    } else {
        sheet_names.first().cloned()
    }
}

fn get_range(path: &str, worksheet_name: &str) -> VizzardResult<Range<DataType>> {
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;
    let sheet_names: Vec<String> = workbook.sheet_names().to_owned();
    debug!(
        "get_range: path: {:?} worksheets: {:?}",
        &path, &sheet_names
    );
    let selected =
        select_worksheet(&sheet_names, worksheet_name).context(MissingWorksheetSnafu { path })?;
    if selected != worksheet_name {
        warn!(
            "Worksheet {:?} not found in {:?}, using {:?}",
            worksheet_name, path, selected
        );
    }
    let wrange = workbook
        .worksheet_range(&selected)
        .context(MissingWorksheetSnafu { path })?
        .context(OpeningExcelSnafu { path })?;
    Ok(wrange)
}

/// A cell that is present and not empty.
fn filled_cell(wrange: &Range<DataType>, row: u32, col: u32) -> Option<&DataType> {
    wrange
        .get_value((row, col))
        .filter(|c| !matches!(c, DataType::Empty))
}

/// Reads the votes of every state in the worksheet.
///
/// Rows are addressed by their absolute position in the worksheet, so the
/// header rows are skipped even if the used range starts lower.
pub fn read_results_range(wrange: &Range<DataType>) -> VoteTally {
    let mut builder = TallyBuilder::new();
    let (start, end) = match (wrange.start(), wrange.end()) {
        (Some(s), Some(e)) => (s, e),
        _ => {
            warn!("read_results_range: empty worksheet");
            return builder.vote_tally();
        }
    };

    for row in start.0.max(HEADER_ROWS)..=end.0 {
        let cells = (
            filled_cell(wrange, row, STATE_COLUMN),
            filled_cell(wrange, row, B_VOTES_COLUMN),
            filled_cell(wrange, row, A_VOTES_COLUMN),
        );
        let (state_cell, b_cell, a_cell) = match cells {
            (Some(s), Some(b), Some(a)) => (s, b, a),
            _ => {
                debug!("read_results_range: row {}: missing cells, skipping", row);
                continue;
            }
        };
        let state = match read_state_cell(state_cell) {
            Some(s) => s,
            None => {
                warn!(
                    "read_results_range: row {}: could not understand state cell {:?}, skipping",
                    row, state_cell
                );
                continue;
            }
        };
        let b_votes = read_count_cell(b_cell, row);
        let a_votes = read_count_cell(a_cell, row);
        debug!(
            "read_results_range: row {}: {} A={} B={}",
            row, state, a_votes, b_votes
        );
        builder.add_state_votes(&state, a_votes, b_votes);
    }
    builder.vote_tally()
}

fn read_state_cell(cell: &DataType) -> Option<String> {
    match cell {
        DataType::String(s) if !s.trim().is_empty() => Some(s.clone()),
        // Numbers are accepted as identifiers: 6.0 is read as "6".
        DataType::Float(f) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        DataType::Float(f) => Some(f.to_string()),
        DataType::Int(i) => Some(i.to_string()),
        _ => None,
    }
}

/// A vote count. Anything that cannot be read counts as 0.
fn read_count_cell(cell: &DataType, row: u32) -> u64 {
    match cell {
        DataType::Float(f) => *f as u64,
        DataType::Int(i) => (*i).max(0) as u64,
        DataType::String(s) => match s.trim().parse::<u64>() {
            Ok(x) => x,
            Err(_) => {
                debug!(
                    "read_count_cell: row {}: could not read count {:?}, using 0",
                    row, s
                );
                0
            }
        },
        _ => {
            debug!(
                "read_count_cell: row {}: could not understand cell {:?}, using 0",
                row, cell
            );
            0
        }
    }
}
