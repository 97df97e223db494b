use clap::Parser;

/// This is an election results analyzer.
#[derive(Parser, Debug, Clone, Default)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file describing where the election data is located.
    /// Relative paths in this file are resolved from the directory of the file.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (directory, default 'data') The directory containing the state information, vote results and
    /// counties files. Setting this option overrides the directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub data_dir: Option<String>,

    /// (directory, default current directory) Where the charts and maps are written.
    #[clap(long, value_parser)]
    pub output_dir: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON format
    /// to the given location.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) A reference file containing a summary in JSON format. If provided, vizzard will
    /// check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// Display name of candidate A. Prompted for if not provided.
    #[clap(long, value_parser)]
    pub candidate_a: Option<String>,

    /// Display name of candidate B. Prompted for if not provided.
    #[clap(long, value_parser)]
    pub candidate_b: Option<String>,

    /// The state to summarize (for example CA). Prompted for if not provided.
    #[clap(short, long, value_parser)]
    pub state: Option<String>,

    /// The reporting cutoff hour (0 to 24) of the partial results. Prompted for if not provided.
    #[clap(long, value_parser)]
    pub hour: Option<String>,

    /// The state to draw on a dedicated county map. Prompted for if not provided.
    #[clap(long, value_parser)]
    pub map_state: Option<String>,

    /// If passed as an argument, the charts and maps are not drawn.
    #[clap(long, takes_value = false)]
    pub no_render: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
