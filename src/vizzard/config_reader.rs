use crate::args::Args;
use crate::vizzard::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIRECTORY: &str = "data";
pub const DEFAULT_STATE_INFO_FILE: &str = "State-Info.csv";
pub const DEFAULT_VOTE_RESULTS_FILE: &str = "Vote-Results.xlsx";
pub const DEFAULT_RESULTS_WORKSHEET: &str = "Results";
pub const DEFAULT_COUNTIES_FILE: &str = "Voting-Counties.csv";
pub const DEFAULT_MAP_IMAGE: &str = "us_map.png";

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct CandidateNames {
    pub a: Option<String>,
    pub b: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct VizzardConfig {
    #[serde(rename = "dataDirectory")]
    pub data_directory: Option<String>,
    #[serde(rename = "stateInfoFile")]
    pub state_info_file: Option<String>,
    #[serde(rename = "voteResultsFile")]
    pub vote_results_file: Option<String>,
    #[serde(rename = "resultsWorksheet")]
    pub results_worksheet: Option<String>,
    #[serde(rename = "countiesFile")]
    pub counties_file: Option<String>,
    #[serde(rename = "mapImage")]
    pub map_image: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    pub candidates: Option<CandidateNames>,
}

/// Where to find the inputs and write the outputs, once the configuration
/// file and the command line have been merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub state_info_path: String,
    pub vote_results_path: String,
    pub results_worksheet: String,
    pub counties_path: String,
    pub map_image_path: String,
    pub output_directory: String,
    pub candidate_a: Option<String>,
    pub candidate_b: Option<String>,
}

pub fn read_config(path: &str) -> VizzardResult<VizzardConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: {:?}", contents);
    let config: VizzardConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(config)
}

/// Merges the configuration with the command line. The command line wins.
///
/// `config_dir` is the directory of the configuration file, if one was read.
pub fn resolve_settings(
    config: &VizzardConfig,
    config_dir: Option<&Path>,
    args: &Args,
) -> RunSettings {
    let base: PathBuf = config_dir.map(|p| p.to_path_buf()).unwrap_or_default();

    let data_dir: PathBuf = match (&args.data_dir, &config.data_directory) {
        (Some(d), _) => PathBuf::from(d),
        (None, Some(d)) => base.join(d),
        (None, None) => base.join(DEFAULT_DATA_DIRECTORY),
    };

    let in_data_dir = |file: &Option<String>, default: &str| -> String {
        let name = file.clone().unwrap_or_else(|| default.to_string());
        data_dir.join(name).display().to_string()
    };

    let output_directory: PathBuf = match (&args.output_dir, &config.output_directory) {
        (Some(d), _) => PathBuf::from(d),
        (None, Some(d)) => base.join(d),
        (None, None) => base.join("."),
    };

    let names = config.candidates.clone().unwrap_or_default();

    RunSettings {
        state_info_path: in_data_dir(&config.state_info_file, DEFAULT_STATE_INFO_FILE),
        vote_results_path: in_data_dir(&config.vote_results_file, DEFAULT_VOTE_RESULTS_FILE),
        results_worksheet: config
            .results_worksheet
            .clone()
            .unwrap_or_else(|| DEFAULT_RESULTS_WORKSHEET.to_string()),
        counties_path: in_data_dir(&config.counties_file, DEFAULT_COUNTIES_FILE),
        map_image_path: in_data_dir(&config.map_image, DEFAULT_MAP_IMAGE),
        output_directory: output_directory.display().to_string(),
        candidate_a: args.candidate_a.clone().or(names.a),
        candidate_b: args.candidate_b.clone().or(names.b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let settings = resolve_settings(&VizzardConfig::default(), None, &Args::default());
        let expected = |f: &str| -> String {
            Path::new("data").join(f).display().to_string()
        };
        assert_eq!(settings.state_info_path, expected("State-Info.csv"));
        assert_eq!(settings.vote_results_path, expected("Vote-Results.xlsx"));
        assert_eq!(settings.counties_path, expected("Voting-Counties.csv"));
        assert_eq!(settings.map_image_path, expected("us_map.png"));
        assert_eq!(settings.results_worksheet, "Results");
        assert_eq!(settings.candidate_a, None);
    }

    #[test]
    fn config_file_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("election.json");
        let mut f = fs::File::create(&config_path).unwrap();
        write!(
            f,
            r#"{{
                "dataDirectory": "inputs",
                "voteResultsFile": "results-2024.xlsx",
                "outputDirectory": "out",
                "candidates": {{ "a": "Alice", "b": "Bob" }}
            }}"#
        )
        .unwrap();

        let config = read_config(config_path.to_str().unwrap()).unwrap();
        assert_eq!(config.data_directory, Some("inputs".to_string()));

        let args = Args {
            candidate_b: Some("Bella".to_string()),
            ..Args::default()
        };
        let settings = resolve_settings(&config, Some(dir.path()), &args);
        assert_eq!(
            settings.vote_results_path,
            dir.path()
                .join("inputs")
                .join("results-2024.xlsx")
                .display()
                .to_string()
        );
        assert_eq!(
            settings.state_info_path,
            dir.path()
                .join("inputs")
                .join("State-Info.csv")
                .display()
                .to_string()
        );
        assert_eq!(
            settings.output_directory,
            dir.path().join("out").display().to_string()
        );
        assert_eq!(settings.candidate_a, Some("Alice".to_string()));
        assert_eq!(settings.candidate_b, Some("Bella".to_string()));

        let args = Args {
            data_dir: Some("elsewhere".to_string()),
            ..Args::default()
        };
        let settings = resolve_settings(&config, Some(dir.path()), &args);
        assert_eq!(
            settings.counties_path,
            Path::new("elsewhere")
                .join("Voting-Counties.csv")
                .display()
                .to_string()
        );
    }

    #[test]
    fn malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("broken.json");
        fs::write(&config_path, "{ not json").unwrap();
        let res = read_config(config_path.to_str().unwrap());
        assert!(matches!(res, Err(VizzardError::ParsingJson { .. })));

        let res = read_config(dir.path().join("missing.json").to_str().unwrap());
        assert!(matches!(res, Err(VizzardError::OpeningJson { .. })));
    }
}
