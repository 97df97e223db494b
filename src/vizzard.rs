use log::{debug, error, info, warn};

use election_tally::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use std::collections::BTreeMap;
use text_diff::print_diff;

use crate::args::Args;
use crate::vizzard::config_reader::*;
use crate::vizzard::console::Console;
use crate::vizzard::render::{RenderRequest, Renderer, SvgRenderer};

mod config_reader;
mod console;
mod io_common;
mod io_counties;
mod io_csv;
mod io_excel;
mod render;
mod report;

#[derive(Debug, Snafu)]
pub enum VizzardError {
    #[snafu(display("Input file not found: {path}"))]
    FileNotFound { path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in {path}"))]
    MissingWorksheet { path: String },
    #[snafu(display("Error reading delimited file {path}"))]
    CsvRead { source: csv::Error, path: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error on the console"))]
    Console { source: std::io::Error },
    #[snafu(display("Difference detected between computed summary and reference summary"))]
    SummaryMismatch {},
}

pub type VizzardResult<T> = Result<T, VizzardError>;

/// The two state-level tables, loaded once.
#[derive(Debug, Clone)]
pub struct ElectionData {
    pub allocation: ElectoralAllocation,
    pub tally: VoteTally,
}

/// Loads the required inputs. Any missing file stops the run.
pub fn load_election(settings: &RunSettings) -> VizzardResult<ElectionData> {
    info!(
        "Attempting to read state information file {:?}",
        settings.state_info_path
    );
    let allocation = io_csv::read_electoral_allocation(&settings.state_info_path)?;
    info!(
        "Attempting to read vote results file {:?}",
        settings.vote_results_path
    );
    let tally =
        io_excel::read_vote_results(&settings.vote_results_path, &settings.results_worksheet)?;
    Ok(ElectionData { allocation, tally })
}

fn build_summary_js(
    labels: &CandidateLabels,
    percentages: &BTreeMap<StateId, StatePercentages>,
    popular: &PopularTotals,
    electoral: &ElectoralTotals,
    partial: Option<&PartialReport>,
) -> JSValue {
    let mut states: JSMap<String, JSValue> = JSMap::new();
    for (sid, pct) in percentages.iter() {
        states.insert(sid.to_string(), json!({"a": pct.a, "b": pct.b}));
    }

    let partial_js = partial.map(|r| {
        let reported: Vec<String> = r.reported_states.iter().map(|s| s.to_string()).collect();
        json!({
            "hour": r.hour,
            "reportedStates": reported,
            "totalStates": r.total_states,
            "coverage": r.coverage,
            "popularVote": {"a": r.popular.a, "b": r.popular.b},
            "electoralVote": {"a": r.electoral.a, "b": r.electoral.b},
        })
    });

    json!({
        "candidates": {"a": labels.a, "b": labels.b},
        "popularVote": {
            "a": popular.a,
            "b": popular.b,
            "winner": labels.outcome_label(popular.leader()),
        },
        "electoralVote": {
            "a": electoral.a,
            "b": electoral.b,
            "winner": labels.outcome_label(electoral.leader()),
        },
        "statePercentages": states,
        "partialReport": partial_js,
    })
}

/// Runs one interactive session: prompts, loading, reports, simulation and drawings.
///
/// Returns the summary of the election in JSON.
pub fn run_session<R: BufRead, W: Write>(
    settings: &RunSettings,
    args: &Args,
    console: &mut Console<R, W>,
    renderer: Option<&dyn Renderer>,
) -> VizzardResult<JSValue> {
    let name_a = console.answer_or_prompt(
        &settings.candidate_a,
        "Enter the name of candidate A (empty for default): ",
    )?;
    let name_b = console.answer_or_prompt(
        &settings.candidate_b,
        "Enter the name of candidate B (empty for default): ",
    )?;
    let labels = CandidateLabels::new(Some(name_a), Some(name_b));
    debug!("run_session: labels: {:?}", labels);

    let data = load_election(settings)?;
    analyze_election(&data, &labels, settings, args, console, renderer)
}

/// The part of the session that follows the loading of the state tables:
/// report sections in order, then the simulation, then the drawings.
fn analyze_election<R: BufRead, W: Write>(
    data: &ElectionData,
    labels: &CandidateLabels,
    settings: &RunSettings,
    args: &Args,
    console: &mut Console<R, W>,
    renderer: Option<&dyn Renderer>,
) -> VizzardResult<JSValue> {
    let percentages = state_percentages(&data.tally);
    let electoral = electoral_totals(&data.tally, &data.allocation);
    let popular = popular_totals(&data.tally);

    console.say(&report::format_state_percentages(&percentages, labels))?;
    console.say(&report::format_popular_vote(&popular, labels))?;
    console.say(&report::format_election_summary(
        &electoral, &popular, labels,
    ))?;

    let state = console.answer_or_prompt(&args.state, "\nEnter State ID for summary: ")?;
    match state_summary(&data.tally, &data.allocation, &state) {
        Ok(summary) => console.say(&report::format_state_summary(&summary, labels))?,
        Err(e) => {
            debug!("analyze_election: {}", e);
            console.say(&report::format_state_not_found())?
        }
    }

    let hour_s = console.answer_or_prompt(
        &args.hour,
        "\nEnter report cutoff hour (e.g., 12 or 18): ",
    )?;
    let partial = match parse_cutoff_hour(&hour_s) {
        Ok(hour) => {
            let r = simulate_partial_report(&data.tally, &data.allocation, hour);
            console.say(&report::format_partial_report(&r, labels))?;
            Some(r)
        }
        Err(e) => {
            warn!("analyze_election: {}", e);
            console.say("Invalid input. Skipping simulation.\n")?;
            None
        }
    };

    if let Some(r) = renderer {
        r.render(&RenderRequest::ResultChart {
            popular,
            electoral,
            labels,
        });

        let counties = io_counties::read_counties(&settings.counties_path);
        r.render(&RenderRequest::CountyMap {
            counties: &counties,
            focus_state: None,
            labels,
        });
        console.say("\nAnalysis complete. Visualization written.\n")?;

        let map_state = console.answer_or_prompt(
            &args.map_state,
            "\nEnter a State ID to plot (e.g., CA, TX, PA): ",
        )?;
        if !map_state.trim().is_empty() {
            r.render(&RenderRequest::CountyMap {
                counties: &counties,
                focus_state: Some(StateId::new(&map_state)),
                labels,
            });
        }
    } else {
        console.say("\nAnalysis complete.\n")?;
    }

    Ok(build_summary_js(
        labels,
        &percentages,
        &popular,
        &electoral,
        partial.as_ref(),
    ))
}

fn read_reference(path: &str) -> VizzardResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}

/// Compares the summary with a reference summary stored in a file.
fn check_reference(reference_path: &str, summary: &JSValue) -> VizzardResult<()> {
    let pretty_js_stats = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
    let summary_ref = read_reference(reference_path)?;
    debug!("check_reference: reference: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference summary");
        print_diff(
            pretty_js_summary_ref.as_str(),
            pretty_js_stats.as_ref(),
            "\n",
        );
        return SummaryMismatchSnafu {}.fail();
    }
    info!("The summary matches the reference {:?}", reference_path);
    Ok(())
}

fn write_summary(out: &str, summary: &JSValue) -> VizzardResult<()> {
    let pretty_js_stats = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
    if out == "stdout" {
        println!("{}", pretty_js_stats);
    } else {
        info!("Writing summary to {:?}", out);
        fs::write(out, pretty_js_stats).context(WritingOutputSnafu { path: out })?;
    }
    Ok(())
}

pub fn run_analysis(args: &Args) -> VizzardResult<()> {
    let (config, config_dir) = match &args.config {
        Some(config_path) => {
            info!("Reading configuration {:?}", config_path);
            let config = read_config(config_path)?;
            debug!("config: {:?}", config);
            (config, Path::new(config_path).parent().map(|p| p.to_path_buf()))
        }
        None => (VizzardConfig::default(), None),
    };
    let settings = resolve_settings(&config, config_dir.as_deref(), args);
    info!("settings: {:?}", settings);

    let svg_renderer = SvgRenderer::new(&settings.output_directory, &settings.map_image_path);
    let renderer: Option<&dyn Renderer> = if args.no_render {
        None
    } else {
        Some(&svg_renderer)
    };

    let mut console = console::stdin_console();
    let summary = run_session(&settings, args, &mut console, renderer)?;

    if let Some(out) = &args.out {
        write_summary(out, &summary)?;
    }
    if let Some(reference) = &args.reference {
        check_reference(reference, &summary)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Cursor;

    #[derive(Default)]
    struct RecordingRenderer {
        requests: RefCell<Vec<String>>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&self, request: &RenderRequest) {
            self.requests.borrow_mut().push(format!("{:?}", request));
        }
    }

    fn settings_in(dir: &Path) -> RunSettings {
        let args = Args {
            data_dir: Some(dir.display().to_string()),
            ..Args::default()
        };
        resolve_settings(&VizzardConfig::default(), None, &args)
    }

    #[test]
    fn missing_state_info_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        let mut console = Console::new(Cursor::new("Alice\nBob\n"), Vec::new());
        let renderer = RecordingRenderer::default();
        let res = run_session(&settings, &Args::default(), &mut console, Some(&renderer));
        assert!(matches!(res, Err(VizzardError::FileNotFound { .. })));
        // Nothing was drawn.
        assert!(renderer.requests.borrow().is_empty());
    }

    fn two_state_election() -> ElectionData {
        let mut builder = election_tally::builder::TallyBuilder::new();
        builder.add_state_votes("AA", 60, 40);
        builder.add_state_votes("BB", 10, 90);
        builder.add_electoral_votes("AA", 3);
        builder.add_electoral_votes("BB", 5);
        let (tally, allocation) = builder.build();
        ElectionData { allocation, tally }
    }

    fn position(output: &str, section: &str) -> usize {
        match output.find(section) {
            Some(idx) => idx,
            None => panic!("section {:?} not found in {:?}", section, output),
        }
    }

    #[test]
    fn bad_hour_skips_only_the_simulation() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Voting-Counties.csv"),
            "state_id,lat,lng,a_votes,b_votes\nTX,30.3,-97.7,5,4\nNY,40.6,-73.9,1,4\n",
        )
        .unwrap();
        let settings = settings_in(dir.path());
        let data = two_state_election();
        let labels = CandidateLabels::default();
        let renderer = RecordingRenderer::default();

        let mut out: Vec<u8> = Vec::new();
        let mut console = Console::new(Cursor::new("ZZ\nnoon\ntx\n"), &mut out);
        let js = analyze_election(
            &data,
            &labels,
            &settings,
            &Args::default(),
            &mut console,
            Some(&renderer),
        )
        .unwrap();
        drop(console);
        let output = String::from_utf8(out).unwrap();

        let sections: Vec<usize> = [
            "STATE PERCENTAGES",
            "POPULAR VOTE",
            "ELECTION SUMMARY",
            "Enter State ID for summary",
            "State not found.",
            "Enter report cutoff hour",
            "Invalid input. Skipping simulation.",
            "Analysis complete. Visualization written.",
            "Enter a State ID to plot",
        ]
        .iter()
        .map(|s| position(&output, s))
        .collect();
        assert!(sections.windows(2).all(|w| w[0] < w[1]));
        assert!(!output.contains("PARTIAL RESULTS"));
        assert_eq!(js["partialReport"], JSValue::Null);
        assert_eq!(js["electoralVote"]["b"], json!(5));

        // The drawings are still made.
        let requests = renderer.requests.borrow();
        assert_eq!(requests.len(), 3);
        assert!(requests[0].starts_with("ResultChart"));
        assert!(requests[1].starts_with("CountyMap"));
        assert!(requests[1].contains("focus_state: None"));
        assert!(requests[1].contains("NY"));
        assert!(requests[2].contains("focus_state: Some(StateId(\"TX\"))"));
    }

    #[test]
    fn full_session_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings_in(dir.path());
        let data = two_state_election();
        let labels = CandidateLabels::new(Some("Alice".to_string()), Some("Bob".to_string()));
        let args = Args {
            state: Some("aa".to_string()),
            ..Args::default()
        };

        let mut out: Vec<u8> = Vec::new();
        // Hour, then an empty answer for the state map.
        let mut console = Console::new(Cursor::new("12\n\n"), &mut out);
        let js = analyze_election(&data, &labels, &settings, &args, &mut console, None).unwrap();
        drop(console);
        let output = String::from_utf8(out).unwrap();

        let sections: Vec<usize> = [
            "STATE PERCENTAGES",
            "AA: Alice 60.00% | Bob 40.00%",
            "POPULAR VOTE",
            "Popular Vote Winner: Bob",
            "ELECTION SUMMARY",
            "-\nWinner: Bob",
            "Summary for AA",
            "PARTIAL RESULTS",
            "Reporting Time: 12:00 (1/2 states, 50.0%)",
            "Analysis complete.",
        ]
        .iter()
        .map(|s| position(&output, s))
        .collect();
        assert!(sections.windows(2).all(|w| w[0] < w[1]));
        // The state was given on the command line.
        assert!(!output.contains("Enter State ID for summary"));
        assert_eq!(js["partialReport"]["reportedStates"], json!(["AA"]));
        assert_eq!(js["candidates"]["a"], json!("Alice"));
    }

    #[test]
    fn missing_vote_results_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("State-Info.csv"),
            "h\nh\n1,CA,,,,,,,,,,,,,54\n",
        )
        .unwrap();
        let settings = settings_in(dir.path());
        let res = load_election(&settings);
        match res {
            Err(VizzardError::FileNotFound { path }) => {
                assert!(path.ends_with("Vote-Results.xlsx"))
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn summary_js() {
        let mut builder = election_tally::builder::TallyBuilder::new();
        builder.add_state_votes("AA", 60, 40);
        builder.add_state_votes("BB", 10, 90);
        builder.add_electoral_votes("AA", 3);
        builder.add_electoral_votes("BB", 5);
        let (tally, allocation) = builder.build();
        let labels = CandidateLabels::default();
        let partial = simulate_partial_report(&tally, &allocation, 12);

        let js = build_summary_js(
            &labels,
            &state_percentages(&tally),
            &popular_totals(&tally),
            &electoral_totals(&tally, &allocation),
            Some(&partial),
        );
        assert_eq!(js["popularVote"]["a"], json!(70));
        assert_eq!(js["popularVote"]["winner"], json!("Candidate B"));
        assert_eq!(js["electoralVote"]["b"], json!(5));
        assert_eq!(js["statePercentages"]["AA"]["a"], json!(60.0));
        assert_eq!(js["partialReport"]["reportedStates"], json!(["AA"]));
    }

    #[test]
    fn reference_check() {
        let dir = tempfile::tempdir().unwrap();
        let summary = json!({"popularVote": {"a": 1, "b": 2}});
        let ref_path = dir.path().join("reference.json");
        fs::write(&ref_path, r#"{"popularVote": {"a": 1, "b": 2}}"#).unwrap();
        assert!(check_reference(ref_path.to_str().unwrap(), &summary).is_ok());

        fs::write(&ref_path, r#"{"popularVote": {"a": 1, "b": 3}}"#).unwrap();
        assert!(matches!(
            check_reference(ref_path.to_str().unwrap(), &summary),
            Err(VizzardError::SummaryMismatch {})
        ));
    }

    #[test]
    fn summary_written_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("summary.json");
        let summary = json!({"electoralVote": {"a": 3}});
        write_summary(out.to_str().unwrap(), &summary).unwrap();
        let back: JSValue = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(back, summary);
    }
}
