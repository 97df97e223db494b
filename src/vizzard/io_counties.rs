// Reading the county results used by the maps.

use std::collections::HashMap;

use crate::vizzard::{io_common::open_records, *};

// Accepted header names, by order of preference.
const LATITUDE_HEADERS: &[&str] = &["lat", "latitude"];
const LONGITUDE_HEADERS: &[&str] = &["lng", "longitude"];
const STATE_HEADERS: &[&str] = &["state_id", "state"];
const A_VOTES_HEADERS: &[&str] = &["a_votes", "bb votes"];
const B_VOTES_HEADERS: &[&str] = &["b_votes", "rr votes"];

/// Positions of the columns of interest in the counties file.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct CountyColumns {
    pub latitude: usize,
    pub longitude: usize,
    pub state: usize,
    pub a_votes: usize,
    pub b_votes: usize,
}

impl CountyColumns {
    /// Finds the columns in the header, ignoring case and surrounding spaces.
    /// Returns None if one of the columns is missing.
    pub fn from_header(header: &[String]) -> Option<CountyColumns> {
        // When a name appears twice, the last column wins.
        let col_names: HashMap<String, usize> = header
            .iter()
            .enumerate()
            .map(|(idx, s)| (s.trim().to_lowercase(), idx))
            .collect();
        let find = |names: &[&str]| names.iter().find_map(|n| col_names.get(*n).cloned());

        Some(CountyColumns {
            latitude: find(LATITUDE_HEADERS)?,
            longitude: find(LONGITUDE_HEADERS)?,
            state: find(STATE_HEADERS)?,
            a_votes: find(A_VOTES_HEADERS)?,
            b_votes: find(B_VOTES_HEADERS)?,
        })
    }

    fn max_index(&self) -> usize {
        [
            self.latitude,
            self.longitude,
            self.state,
            self.a_votes,
            self.b_votes,
        ]
        .iter()
        .cloned()
        .max()
        .unwrap_or(0)
    }
}

fn parse_county(fields: &[String], columns: &CountyColumns) -> Option<CountyRecord> {
    let latitude = fields.get(columns.latitude)?.trim().parse::<f64>().ok()?;
    let longitude = fields.get(columns.longitude)?.trim().parse::<f64>().ok()?;
    // Counts are only compared, negative values are kept as they are.
    let a_votes = fields.get(columns.a_votes)?.trim().parse::<i64>().ok()?;
    let b_votes = fields.get(columns.b_votes)?.trim().parse::<i64>().ok()?;
    let state = StateId::new(fields.get(columns.state)?);
    Some(CountyRecord {
        state,
        latitude,
        longitude,
        winner: Candidate::county_winner(a_votes, b_votes),
    })
}

/// Reads the counties for the maps.
///
/// This never fails: a missing file or a header without the expected columns
/// is reported in the logs and gives no county, malformed lines are skipped.
pub fn read_counties(path: &str) -> Vec<CountyRecord> {
    let mut records = match open_records(path, b',') {
        Ok(r) => r,
        Err(e) => {
            error!("Counties file could not be read: {}", e);
            return Vec::new();
        }
    };

    let header = match records.next() {
        Some(Ok(h)) if h.lineno == 1 => h,
        Some(Ok(h)) => {
            warn!(
                "Header mismatch: expected lat,lng,state_id,a_votes,b_votes on the first line of {:?}, found line {}",
                path, h.lineno
            );
            return Vec::new();
        }
        Some(Err(e)) => {
            warn!("read_counties: unreadable header in {:?}: {}", path, e);
            return Vec::new();
        }
        None => {
            warn!("read_counties: {:?} is empty", path);
            return Vec::new();
        }
    };

    let columns = match CountyColumns::from_header(&header.fields) {
        Some(c) => c,
        None => {
            warn!(
                "Header mismatch: expected lat,lng,state_id,a_votes,b_votes. Found headers: {:?}",
                header.fields
            );
            return Vec::new();
        }
    };
    debug!("read_counties: columns: {:?}", columns);

    let mut res: Vec<CountyRecord> = Vec::new();
    for record_r in records {
        let record = match record_r {
            Ok(r) => r,
            Err(e) => {
                debug!("read_counties: skipping unreadable line: {}", e);
                continue;
            }
        };
        if record.fields.len() <= columns.max_index() {
            continue;
        }
        match parse_county(&record.fields, &columns) {
            Some(c) => res.push(c),
            None => debug!(
                "read_counties: line {}: could not parse {:?}, skipping",
                record.lineno, record.fields
            ),
        }
    }
    info!("Loaded {} counties for visualization.", res.len());
    res
}
