use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "vidsizes")]
#[command(about = "Encode videos at responsive sizes with ffmpeg", long_about = None)]
pub struct Cli {
    /// ffmpeg binary to invoke
    #[arg(long, global = true, default_value = "ffmpeg", value_name = "PATH")]
    pub ffmpeg: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct TaskArgs {
    /// Video files or directories to encode (directories are scanned recursively)
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Task config file (.toml or .json); defaults to the user config
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Output directory (defaults to each source's directory)
    #[arg(long, short)]
    pub dest: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Plan and run every encode
    Encode(TaskArgs),

    /// Show ffmpeg commands without executing or touching any file
    DryRun(TaskArgs),

    /// Check if ffmpeg is installed
    CheckFfmpeg,

    /// Show config status and location, or create default config if missing
    InitConfig,
}

pub fn parse() -> Cli {
    Cli::parse()
}
