// Reading the electoral votes from the state information file.

use election_tally::builder::TallyBuilder;

use crate::vizzard::{io_common::open_records, *};

// The first two lines of the file are headers, blank or not.
const HEADER_ROWS: usize = 2;
const MIN_FIELDS: usize = 15;
const STATE_ID_FIELD: usize = 1;
const ELECTORAL_VOTES_FIELD: usize = 14;

/// The content of the electoral votes field after cleanup.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ElectoralVotesField {
    Votes(u64),
    /// Nothing numeric in the field.
    Blank,
    /// Some digits, but not a number (for example `1.2.3`).
    Invalid(String),
}

/// Reads a field such as `10 votes` or `29.0`.
///
/// Everything but the digits and the dots is dropped before parsing, and
/// decimals are truncated.
pub fn parse_electoral_votes(raw: &str) -> ElectoralVotesField {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return ElectoralVotesField::Blank;
    }
    match cleaned.parse::<f64>() {
        Ok(f) if f.is_finite() => ElectoralVotesField::Votes(f.trunc() as u64),
        _ => ElectoralVotesField::Invalid(cleaned),
    }
}

pub fn read_electoral_allocation(path: &str) -> VizzardResult<ElectoralAllocation> {
    let records = open_records(path, b',')?;
    let mut builder = TallyBuilder::new();

    for record_r in records {
        let record = match record_r {
            Ok(r) => r,
            Err(e) => {
                warn!("read_electoral_allocation: skipping unreadable line: {}", e);
                continue;
            }
        };
        if record.lineno <= HEADER_ROWS {
            continue;
        }
        if record.fields.len() < MIN_FIELDS {
            debug!(
                "read_electoral_allocation: line {}: only {} fields, ignoring",
                record.lineno,
                record.fields.len()
            );
            continue;
        }
        let state = record.fields[STATE_ID_FIELD].trim();
        if state.is_empty() {
            warn!(
                "read_electoral_allocation: line {}: no state identifier, skipping",
                record.lineno
            );
            continue;
        }
        match parse_electoral_votes(&record.fields[ELECTORAL_VOTES_FIELD]) {
            ElectoralVotesField::Votes(ev) => {
                builder.add_electoral_votes(state, ev);
            }
            ElectoralVotesField::Blank => {
                debug!(
                    "read_electoral_allocation: line {}: no electoral votes for {}",
                    record.lineno, state
                );
            }
            ElectoralVotesField::Invalid(cleaned) => {
                warn!("Skipping invalid electoral votes for {}: {}", state, cleaned);
            }
        }
    }

    let allocation = builder.electoral_allocation();
    info!("Loaded {} state electoral entries.", allocation.len());
    Ok(allocation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_line(state: &str, ev: &str) -> String {
        let mut fields: Vec<String> = vec!["x".to_string(); MIN_FIELDS];
        fields[STATE_ID_FIELD] = state.to_string();
        fields[ELECTORAL_VOTES_FIELD] = ev.to_string();
        fields.join(",")
    }

    fn write_state_info(dir: &Path, lines: &[String]) -> String {
        let p = dir.join("State-Info.csv");
        let mut contents = "Name,Code,header\nsecond,header,line\n".to_string();
        for l in lines {
            contents.push_str(l);
            contents.push('\n');
        }
        fs::write(&p, contents).unwrap();
        p.display().to_string()
    }

    #[test]
    fn three_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_state_info(
            dir.path(),
            &[
                state_line("AA", "5"),
                state_line("BB", "10 votes"),
                state_line("CC", "abc"),
            ],
        );
        let allocation = read_electoral_allocation(&path).unwrap();
        assert_eq!(allocation.len(), 2);
        assert_eq!(allocation.votes_for(&StateId::new("AA")), 5);
        assert_eq!(allocation.votes_for(&StateId::new("BB")), 10);
        assert!(!allocation.contains(&StateId::new("CC")));
    }

    #[test]
    fn headers_short_and_invalid_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_state_info(
            dir.path(),
            &[
                " ny ,NY".to_string(),
                state_line(" tx ", "40.9"),
                state_line("ZZ", "1.2.3"),
                state_line("CA", "54"),
                state_line("CA", "55"),
            ],
        );
        let allocation = read_electoral_allocation(&path).unwrap();
        assert_eq!(allocation.len(), 2);
        assert_eq!(allocation.votes_for(&StateId::new("TX")), 40);
        // Last row wins.
        assert_eq!(allocation.votes_for(&StateId::new("CA")), 55);
        assert!(!allocation.contains(&StateId::new("ZZ")));
        assert!(!allocation.contains(&StateId::new("NY")));
    }

    #[test]
    fn header_rows_are_never_read() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("State-Info.csv");
        let contents = format!(
            "{}\n{}\n{}\n",
            state_line("H1", "1"),
            state_line("H2", "2"),
            state_line("AL", "9")
        );
        fs::write(&p, contents).unwrap();
        let allocation = read_electoral_allocation(p.to_str().unwrap()).unwrap();
        assert_eq!(allocation.len(), 1);
        assert_eq!(allocation.votes_for(&StateId::new("AL")), 9);
    }

    #[test]
    fn blank_header_line() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("State-Info.csv");
        let contents = format!(
            "Title\n\n{}\n{}\n",
            state_line("AL", "9"),
            state_line("AK", "3")
        );
        fs::write(&p, contents).unwrap();
        let allocation = read_electoral_allocation(p.to_str().unwrap()).unwrap();
        assert_eq!(allocation.len(), 2);
        assert_eq!(allocation.votes_for(&StateId::new("AL")), 9);
        assert_eq!(allocation.votes_for(&StateId::new("AK")), 3);
    }

    #[test]
    fn latin1_bytes_in_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("State-Info.csv");
        let mut contents: Vec<u8> = b"h\nh\n".to_vec();
        contents.extend_from_slice(b"Nuevo M\xE9xico,");
        contents.extend_from_slice(state_line("NM", "5").split_once(',').unwrap().1.as_bytes());
        contents.push(b'\n');
        fs::write(&p, contents).unwrap();
        let allocation = read_electoral_allocation(p.to_str().unwrap()).unwrap();
        assert_eq!(allocation.votes_for(&StateId::new("NM")), 5);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("State-Info.csv");
        let res = read_electoral_allocation(p.to_str().unwrap());
        assert!(matches!(res, Err(VizzardError::FileNotFound { .. })));
    }

    #[test]
    fn electoral_votes_field() {
        assert_eq!(parse_electoral_votes("5"), ElectoralVotesField::Votes(5));
        assert_eq!(
            parse_electoral_votes(" 10 votes"),
            ElectoralVotesField::Votes(10)
        );
        assert_eq!(parse_electoral_votes("3.0"), ElectoralVotesField::Votes(3));
        assert_eq!(parse_electoral_votes("abc"), ElectoralVotesField::Blank);
        assert_eq!(parse_electoral_votes(""), ElectoralVotesField::Blank);
        assert_eq!(
            parse_electoral_votes("1.2.3"),
            ElectoralVotesField::Invalid("1.2.3".to_string())
        );
        assert_eq!(
            parse_electoral_votes("."),
            ElectoralVotesField::Invalid(".".to_string())
        );
    }
}
