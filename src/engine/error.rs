//! Error types for planning and running encode jobs.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal configuration problems. Raised before any job runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No sizes have been defined")]
    NoSizes,

    #[error(
        "Width {width} of size {size} is invalid. It must be a positive integer divisible by 2 (libx264 requirement)"
    )]
    InvalidWidth { size: usize, width: String },

    #[error(
        "Unable to encode {count} videos into {}. Each mapping must have exactly one source file",
        .destination.display()
    )]
    AmbiguousMapping { count: usize, destination: PathBuf },

    #[error("Mapping for {} has no source file", .destination.display())]
    MissingSource { destination: PathBuf },

    #[error("Invalid task configuration: {0}")]
    Parse(String),
}

/// Planning failed before any job ran.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to prepare {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure of a single encoder invocation.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("ffmpeg exited with {}", describe_exit(.exit_code))]
    Failed {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("ffmpeg was cancelled by a signal")]
    Cancelled,

    #[error("Failed to spawn ffmpeg: {0}")]
    Spawn(#[from] std::io::Error),
}

fn describe_exit(exit_code: &Option<i32>) -> String {
    match exit_code {
        Some(code) => format!("code {}", code),
        None => "no exit code".to_string(),
    }
}

impl JobError {
    /// Last non-empty stderr line, if the encoder printed one.
    pub fn stderr_tail(&self) -> Option<&str> {
        match self {
            JobError::Failed { stderr, .. } => stderr.lines().rev().find(|l| !l.trim().is_empty()),
            _ => None,
        }
    }
}

/// Outcome of a whole run whose plan was valid but some jobs failed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("{} of {total} jobs failed", .failures.len())]
    JobsFailed {
        total: usize,
        failures: Vec<super::executor::JobFailure>,
    },
}
