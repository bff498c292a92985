// Sequential job execution
//
// One ffmpeg process at a time. ffmpeg already spreads a single encode over
// all cores, so running several side by side only fights over CPU and disk.

use super::error::{JobError, RunError};
use super::plan::{ExecutionPlan, JobDescriptor, JobKind, PlanStep};
use super::tally::Tally;
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, info, warn};

/// Runs one encoder invocation to completion
pub trait Encoder {
    fn run(&mut self, args: &[String]) -> Result<(), JobError>;
}

/// Invokes the ffmpeg binary and waits for it
#[derive(Debug, Clone)]
pub struct FfmpegEncoder {
    program: PathBuf,
}

impl Default for FfmpegEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FfmpegEncoder {
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }
}

impl Encoder for FfmpegEncoder {
    fn run(&mut self, args: &[String]) -> Result<(), JobError> {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if was_user_cancelled(&output.status, &stderr) {
            return Err(JobError::Cancelled);
        }

        Err(JobError::Failed {
            exit_code: output.status.code(),
            stderr,
        })
    }
}

/// ffmpeg usually catches SIGINT/SIGTERM/SIGQUIT and exits printing
/// "Exiting normally, received signal X", so check stderr as well as the status.
#[cfg(unix)]
fn was_user_cancelled(status: &ExitStatus, stderr: &str) -> bool {
    use std::os::unix::process::ExitStatusExt;

    if let Some(signal) = status.signal() {
        if matches!(signal, 2 | 3 | 15) {
            return true;
        }
    }

    stderr.contains("received signal 2")
        || stderr.contains("received signal 3")
        || stderr.contains("received signal 15")
}

#[cfg(not(unix))]
fn was_user_cancelled(_status: &ExitStatus, stderr: &str) -> bool {
    stderr.contains("received signal")
}

/// A job whose encoder invocation did not succeed
#[derive(Debug)]
pub struct JobFailure {
    pub source: PathBuf,
    pub output: PathBuf,
    pub size: String,
    /// `None` for posters
    pub codec: Option<String>,
    pub error: JobError,
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [size {}, {}]: {}",
            self.source.display(),
            self.size,
            self.codec.as_deref().unwrap_or("poster"),
            self.error
        )?;
        if let Some(tail) = self.error.stderr_tail() {
            write!(f, " ({})", tail)?;
        }
        Ok(())
    }
}

/// What happened during a run
#[derive(Debug, Default)]
pub struct RunReport {
    pub completed: Tally,
    pub failures: Vec<JobFailure>,
    /// Jobs attempted, posters included
    pub total_jobs: usize,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Completed tally if every job succeeded, otherwise every failure
    pub fn into_result(self) -> Result<Tally, RunError> {
        if self.failures.is_empty() {
            Ok(self.completed)
        } else {
            Err(RunError::JobsFailed {
                total: self.total_jobs,
                failures: self.failures,
            })
        }
    }
}

pub struct JobExecutor<E: Encoder> {
    encoder: E,
}

impl<E: Encoder> JobExecutor<E> {
    pub fn new(encoder: E) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &E {
        &self.encoder
    }

    pub fn run(&mut self, plan: ExecutionPlan) -> RunReport {
        self.run_with_callback(plan, |_job, _result| {})
    }

    /// Run every job in order. A failed job is recorded and the run moves on;
    /// no job depends on another.
    /// The callback is invoked after each job with its result.
    pub fn run_with_callback<F>(&mut self, plan: ExecutionPlan, mut callback: F) -> RunReport
    where
        F: FnMut(&JobDescriptor, &Result<(), JobError>),
    {
        let mut report = RunReport::default();
        for (size, _) in plan.planned().sizes() {
            report.completed.register_size(size);
        }

        for step in plan.into_steps() {
            match step {
                PlanStep::Job(job) => {
                    report.total_jobs += 1;
                    debug!("ffmpeg {}", job.args.join(" "));

                    let result = self.encoder.run(&job.args);
                    callback(&job, &result);

                    match result {
                        Ok(()) => {
                            debug!(
                                "Responsive video: {} now {}",
                                job.source.display(),
                                job.output.display()
                            );
                            match (&job.kind, &job.codec) {
                                (JobKind::Encode, Some(codec)) => {
                                    report.completed.record_encode(&job.size, codec)
                                }
                                _ => report.completed.record_poster(),
                            }
                        }
                        Err(error) => {
                            let failure = JobFailure {
                                source: job.source,
                                output: job.output,
                                size: job.size,
                                codec: job.codec,
                                error,
                            };
                            warn!("Job failed: {}", failure);
                            report.failures.push(failure);
                        }
                    }
                }
                PlanStep::Report { size } => {
                    let count = report.completed.size_count(&size);
                    if count > 0 {
                        info!("Created {} files for size {}", count, size);
                    }
                }
            }
        }

        report
    }
}
