use clap::{Args, Parser, Subcommand};
use deepid_core::{Environment, Modality};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "deepid",
    version,
    args_conflicts_with_subcommands = true,
    about = "Analyze a folder of images, audio and video with the DeepID API",
    after_help = "Results are written as JSON files plus a results.csv summary in the results directory."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Folder arguments for the default command (same as `deepid scan`)
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Trace requests and polling on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors and the final summary
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit every media file in a folder and collect the results
    Scan(ScanArgs),

    /// Compute ROC / precision-recall / confusion matrices from labelled results
    Evaluate(EvaluateArgs),

    /// Show or change stored settings
    Config(ConfigArgs),

    /// Interactive first-time configuration
    Setup,
}

#[derive(Args, Debug, Default, Clone)]
pub struct ScanArgs {
    /// Folder containing media files (not searched recursively)
    pub folder: Option<PathBuf>,

    /// Only submit files of this modality
    #[arg(long, value_name = "MODALITY")]
    pub only: Option<Modality>,

    /// Where JSON results and results.csv are written
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Status queries per file before giving up
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Seconds between status queries
    #[arg(long, value_name = "SECS")]
    pub retry_delay: Option<u64>,

    /// DeepID environment (production, staging)
    #[arg(long = "env", value_name = "ENV")]
    pub environment: Option<Environment>,

    /// Override the API base URL
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Request a written explanation with every analysis
    #[arg(long)]
    pub run_description: bool,
}

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    /// JSON file with real_score / model_score records
    pub input: PathBuf,

    /// Report directory (defaults to the input file name without extension)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Store the DeepID API key
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Remove the stored API key
    #[arg(long, conflicts_with = "api_key")]
    pub clear_api_key: bool,

    /// Default environment (production, staging)
    #[arg(long = "env", value_name = "ENV")]
    pub environment: Option<Environment>,

    /// Default API base URL override ("" to clear)
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Default status queries per file
    #[arg(long, value_name = "N")]
    pub max_retries: Option<u32>,

    /// Default seconds between status queries
    #[arg(long, value_name = "SECS")]
    pub retry_delay: Option<u64>,

    /// Default results directory
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Request written explanations by default
    #[arg(long, value_name = "BOOL")]
    pub run_description: Option<bool>,

    /// Print the current settings
    #[arg(long)]
    pub show: bool,
}
