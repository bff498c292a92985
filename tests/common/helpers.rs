use std::path::Path;
use vidsizes::config::{Config, EncodeGroup, EncodeTarget, PosterConfig, SizeConfig};
use vidsizes::engine::{Encoder, ExecutionPlan, JobError};

/// Records every invocation; fails those whose output path ends with one of `fail_suffixes`
#[derive(Default)]
pub struct RecordingEncoder {
    pub calls: Vec<Vec<String>>,
    pub fail_suffixes: Vec<String>,
}

impl RecordingEncoder {
    pub fn failing(suffixes: &[&str]) -> Self {
        Self {
            fail_suffixes: suffixes.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }
}

impl Encoder for RecordingEncoder {
    fn run(&mut self, args: &[String]) -> Result<(), JobError> {
        self.calls.push(args.to_vec());
        let output = args.last().cloned().unwrap_or_default();
        if self.fail_suffixes.iter().any(|s| output.ends_with(s.as_str())) {
            return Err(JobError::Failed {
                exit_code: Some(1),
                stderr: format!("{}: Invalid argument", output),
            });
        }
        Ok(())
    }
}

/// Writes each output file so reruns have something stale to remove
pub struct TouchEncoder;

impl Encoder for TouchEncoder {
    fn run(&mut self, args: &[String]) -> Result<(), JobError> {
        let output = args.last().expect("output path");
        if Path::new(output).exists() {
            return Err(JobError::Failed {
                exit_code: Some(1),
                stderr: format!("File '{}' already exists. Exiting.", output),
            });
        }
        std::fs::write(output, b"encoded")?;
        Ok(())
    }
}

pub fn webm_target() -> EncodeTarget {
    EncodeTarget::new(
        "webm",
        &[
            ("-vcodec", "libvpx"),
            ("-acodec", "libvorbis"),
            ("-crf", "15"),
            ("-q:a", "80"),
        ],
    )
}

pub fn mp4_target() -> EncodeTarget {
    EncodeTarget::new(
        "mp4",
        &[
            ("-vcodec", "libx264"),
            ("-acodec", "libfaac"),
            ("-pix_fmt", "yuv420p"),
            ("-q:v", "4"),
        ],
    )
}

pub fn config_with(sizes: Vec<SizeConfig>, targets: Vec<EncodeTarget>) -> Config {
    Config {
        separator: "-".to_string(),
        sizes,
        encodes: vec![EncodeGroup::new(targets)],
    }
}

pub fn poster_size(name: &str, width: u32, poster: PosterConfig) -> SizeConfig {
    SizeConfig::named(name, width).with_poster(poster)
}

/// Output path of every job in plan order
pub fn outputs(plan: &ExecutionPlan) -> Vec<String> {
    plan.jobs()
        .map(|j| j.output.to_string_lossy().into_owned())
        .collect()
}

/// Plan as `ffmpeg <args>` lines, unquoted
pub fn plan_to_string(plan: &ExecutionPlan) -> String {
    plan.jobs()
        .map(|j| format!("ffmpeg {}", j.args.join(" ")))
        .collect::<Vec<_>>()
        .join("\n")
}
