// Job planning: every (size, file, codec) combination as an ordered list of
// ffmpeg invocations

use super::error::{ConfigError, PlanError};
use super::filter::build_filter;
use super::fs::OutputFs;
use super::naming::{destination_base, strip_extension, with_extension};
use super::poster::poster_args;
use super::resolve::{ResolvedSize, resolve_sizes};
use super::tally::Tally;
use crate::config::{Config, EncodeTarget};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One source file and the directory its outputs go to.
/// Exactly one source is supported per mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct FileMapping {
    pub sources: Vec<PathBuf>,
    pub destination_dir: PathBuf,
}

impl FileMapping {
    pub fn new(source: impl Into<PathBuf>, destination_dir: impl Into<PathBuf>) -> Self {
        Self {
            sources: vec![source.into()],
            destination_dir: destination_dir.into(),
        }
    }

    /// Explicit `destination: source` form. Outputs land next to `destination`.
    pub fn pair(destination: impl AsRef<Path>, source: impl Into<PathBuf>) -> Self {
        let destination_dir = destination
            .as_ref()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self::new(source, destination_dir)
    }

    fn single_source(&self) -> Result<&Path, ConfigError> {
        match self.sources.as_slice() {
            [source] => Ok(source.as_path()),
            [] => Err(ConfigError::MissingSource {
                destination: self.destination_dir.clone(),
            }),
            many => Err(ConfigError::AmbiguousMapping {
                count: many.len(),
                destination: self.destination_dir.clone(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Poster,
    Encode,
}

/// One planned ffmpeg invocation
#[derive(Debug, Clone, PartialEq)]
pub struct JobDescriptor {
    pub kind: JobKind,
    pub source: PathBuf,
    pub output: PathBuf,
    /// Display name of the size, e.g. `-small`
    pub size: String,
    /// `None` for posters
    pub codec: Option<String>,
    pub args: Vec<String>,
}

impl JobDescriptor {
    /// Shell-quoted command line for display
    pub fn command_line(&self, program: &str) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(quote(program));
        parts.extend(self.args.iter().map(|a| quote(a)));
        parts.join(" ")
    }
}

fn quote(arg: &str) -> String {
    shlex::try_quote(arg)
        .map(|q| q.into_owned())
        .unwrap_or_else(|_| arg.to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanStep {
    Job(JobDescriptor),
    /// Log how many encodes of this size have completed so far
    Report { size: String },
}

/// Ordered steps of one run. Consumed by `JobExecutor::run`.
#[derive(Debug, Clone, Default)]
pub struct ExecutionPlan {
    steps: Vec<PlanStep>,
    planned: Tally,
}

impl ExecutionPlan {
    pub fn steps(&self) -> &[PlanStep] {
        &self.steps
    }

    pub fn jobs(&self) -> impl Iterator<Item = &JobDescriptor> {
        self.steps.iter().filter_map(|step| match step {
            PlanStep::Job(job) => Some(job),
            PlanStep::Report { .. } => None,
        })
    }

    /// Number of jobs, report steps excluded
    pub fn len(&self) -> usize {
        self.jobs().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encodes the plan will attempt, per size and per codec
    pub fn planned(&self) -> &Tally {
        &self.planned
    }

    pub fn into_steps(self) -> Vec<PlanStep> {
        self.steps
    }

    fn push_job(&mut self, job: JobDescriptor) {
        match job.kind {
            JobKind::Poster => self.planned.record_poster(),
            JobKind::Encode => {
                if let Some(codec) = &job.codec {
                    self.planned.record_encode(&job.size, codec);
                }
            }
        }
        self.steps.push(PlanStep::Job(job));
    }
}

/// Encode arguments: input, flags in declared order, filter, output
pub fn encode_args(source: &Path, target: &EncodeTarget, filter: &str, output: &Path) -> Vec<String> {
    let mut args = Vec::with_capacity(target.flags.len() * 2 + 5);
    args.push("-i".to_string());
    args.push(source.to_string_lossy().into_owned());
    for (flag, value) in &target.flags {
        args.push(flag.clone());
        args.push(value.clone());
    }
    args.push("-vf".to_string());
    args.push(filter.to_string());
    args.push(output.to_string_lossy().into_owned());
    args
}

/// Build the full plan.
///
/// Every size and every mapping is validated before the filesystem is touched.
/// Stale outputs are removed while planning so ffmpeg never finds an existing
/// file at its output path.
pub fn plan_jobs(
    config: &Config,
    mappings: &[FileMapping],
    fs: &mut dyn OutputFs,
) -> Result<ExecutionPlan, PlanError> {
    let sizes = resolve_sizes(config)?;
    let sources = mappings
        .iter()
        .map(FileMapping::single_source)
        .collect::<Result<Vec<_>, _>>()?;

    warn_duplicate_names(&sizes);

    let mut plan = ExecutionPlan::default();
    for size in &sizes {
        plan.planned.register_size(&size.display_name);
    }

    for size in &sizes {
        let filter = build_filter(size);

        for (mapping, source) in mappings.iter().zip(&sources) {
            let base = destination_base(
                &mapping.destination_dir,
                &strip_extension(source),
                &size.display_name,
            );

            prepare(fs.ensure_dir(&mapping.destination_dir), &mapping.destination_dir)?;

            let poster_path = with_extension(&base, "jpg");
            if let Some(args) = poster_args(&size.poster, source, &filter, &poster_path) {
                remove_stale(fs, &poster_path)?;
                plan.push_job(JobDescriptor {
                    kind: JobKind::Poster,
                    source: source.to_path_buf(),
                    output: poster_path,
                    size: size.display_name.clone(),
                    codec: None,
                    args,
                });
            }

            for target in config.encodes.iter().flat_map(|group| &group.targets) {
                let output = with_extension(&base, &target.codec);
                remove_stale(fs, &output)?;
                plan.push_job(JobDescriptor {
                    kind: JobKind::Encode,
                    source: source.to_path_buf(),
                    args: encode_args(source, target, &filter, &output),
                    output,
                    size: size.display_name.clone(),
                    codec: Some(target.codec.clone()),
                });
            }

            plan.steps.push(PlanStep::Report {
                size: size.display_name.clone(),
            });
        }
    }

    info!(
        "Starting {} encode jobs ({} posters)",
        plan.planned.total(),
        plan.planned.posters()
    );
    Ok(plan)
}

fn remove_stale(fs: &mut dyn OutputFs, path: &Path) -> Result<(), PlanError> {
    if prepare(fs.remove_stale(path), path)? {
        debug!("Removed previous output {}", path.display());
    }
    Ok(())
}

fn prepare<T>(result: std::io::Result<T>, path: &Path) -> Result<T, PlanError> {
    result.map_err(|source| PlanError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn warn_duplicate_names(sizes: &[ResolvedSize]) {
    let mut seen = HashSet::new();
    for size in sizes {
        if !seen.insert(size.display_name.as_str()) {
            warn!(
                "Size name {} is used more than once; later outputs overwrite earlier ones",
                size.display_name
            );
        }
    }
}
