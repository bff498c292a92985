// Planning and execution engine - independent of the CLI

pub mod error;
pub mod executor;
pub mod ffmpeg_info;
pub mod filter;
pub mod fs;
pub mod naming;
pub mod plan;
pub mod poster;
pub mod resolve;
pub mod scan;
pub mod tally;

pub use error::{ConfigError, JobError, PlanError, RunError};
pub use executor::{Encoder, FfmpegEncoder, JobExecutor, JobFailure, RunReport};
pub use ffmpeg_info::ffmpeg_version;
pub use filter::build_filter;
pub use fs::{DryRunFs, LocalFs, OutputFs};
pub use plan::{ExecutionPlan, FileMapping, JobDescriptor, JobKind, PlanStep, plan_jobs};
pub use poster::{PosterConfigWarning, PosterPolicy, poster_args};
pub use resolve::{ResolvedSize, resolve_name, resolve_sizes, validate_size, validate_sizes};
pub use scan::{build_mappings, is_video_file, scan};
pub use tally::Tally;

use crate::config::Config;
use tracing::info;

/// Plan every job for `mappings` and run them one after another.
///
/// Configuration problems abort before any job runs. Failed jobs don't;
/// they are collected in the returned report.
pub fn run_task<E: Encoder>(
    config: &Config,
    mappings: &[FileMapping],
    fs: &mut dyn OutputFs,
    encoder: E,
) -> Result<RunReport, PlanError> {
    let plan = plan_jobs(config, mappings, fs)?;
    let report = JobExecutor::new(encoder).run(plan);

    for (codec, count) in report.completed.codecs() {
        info!("Encoded {} {} files", count, codec);
    }
    info!(
        "Finished {} of {} jobs",
        report.total_jobs - report.failures.len(),
        report.total_jobs
    );

    Ok(report)
}
