use clap::Parser;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The SeqHarvest Developers",
    version,
    about = "SeqHarvest CLI - Groups the sampled models of a design silent file by the residues at the design positions, and writes the full score aggregate plus a ranked shortlist.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    /// Path to the silent file written by the design run (e.g., swm_design.out).
    #[arg(required = true, value_name = "SILENT_FILE")]
    pub input: PathBuf,

    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Output Overrides ---
    /// Override the JSON aggregate path (defaults to the input path with a .json extension).
    #[arg(long = "json", value_name = "PATH")]
    pub json_path: Option<PathBuf>,

    /// Override the ranked shortlist path (defaults to top_100_seqs.csv).
    #[arg(short = 'o', long = "shortlist", value_name = "PATH")]
    pub shortlist_path: Option<PathBuf>,

    // --- Shortlist Overrides ---
    /// Override the number of variants kept in the shortlist.
    #[arg(short = 'n', long, value_name = "INT")]
    pub top_n: Option<usize>,

    /// Override the number of variable regions every shortlisted variant must have.
    #[arg(short = 'r', long, value_name = "INT")]
    pub regions: Option<usize>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S shortlist.top-n=20
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,

    // --- Console ---
    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Do not draw the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}
