// Poster frame extraction strategy
//
// Seeking before -i is done while demuxing (fast, lands on a nearby keyframe).
// Seeking after -i decodes forward to the exact time (slow, frame accurate).
// https://trac.ffmpeg.org/wiki/Seeking

use crate::config::PosterConfig;
use serde_json::{Map, Value};
use std::path::Path;

/// How the still frame for a size is picked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterPolicy {
    None,
    FirstFrame,
    FastSeek(String),
    AccurateSeek(String),
}

/// A `poster` value that could not be understood. First frame is used instead.
#[derive(Debug, Clone, PartialEq)]
pub struct PosterConfigWarning {
    pub value: String,
}

impl std::fmt::Display for PosterConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Poster option {} invalid. Using first frame.", self.value)
    }
}

impl PosterPolicy {
    /// Resolve the raw config value.
    ///
    /// `false`, `null` and an empty string disable the poster. In a table the
    /// first key holding a non-empty string wins, `accurateseek` before `fastseek`.
    pub fn from_config(config: &PosterConfig) -> (Self, Option<PosterConfigWarning>) {
        match config {
            PosterConfig::Flag(false) | PosterConfig::Other(Value::Null) => {
                (PosterPolicy::None, None)
            }
            PosterConfig::Flag(true) => (PosterPolicy::FirstFrame, None),
            PosterConfig::Seek(time) if time.is_empty() => (PosterPolicy::None, None),
            PosterConfig::Seek(time) => (PosterPolicy::FastSeek(time.clone()), None),
            PosterConfig::Options(options) => {
                if let Some(time) = seek_time(options, "accurateseek") {
                    (PosterPolicy::AccurateSeek(time), None)
                } else if let Some(time) = seek_time(options, "fastseek") {
                    (PosterPolicy::FastSeek(time), None)
                } else {
                    let value = Value::Object(options.clone()).to_string();
                    (PosterPolicy::FirstFrame, Some(PosterConfigWarning { value }))
                }
            }
            PosterConfig::Other(value) => (
                PosterPolicy::FirstFrame,
                Some(PosterConfigWarning {
                    value: value.to_string(),
                }),
            ),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, PosterPolicy::None)
    }
}

fn seek_time(options: &Map<String, Value>, key: &str) -> Option<String> {
    options
        .get(key)
        .and_then(Value::as_str)
        .filter(|time| !time.is_empty())
        .map(str::to_string)
}

/// Arguments for grabbing one frame from `source` into `output`.
/// Returns `None` when the policy disables posters.
pub fn poster_args(
    policy: &PosterPolicy,
    source: &Path,
    filter: &str,
    output: &Path,
) -> Option<Vec<String>> {
    let source = source.to_string_lossy().into_owned();
    let mut args = Vec::with_capacity(11);

    match policy {
        PosterPolicy::None => return None,
        PosterPolicy::FirstFrame => {
            args.extend(["-i".to_string(), source]);
        }
        PosterPolicy::FastSeek(time) => {
            args.extend(["-ss".to_string(), time.clone()]);
            args.extend(["-i".to_string(), source]);
        }
        PosterPolicy::AccurateSeek(time) => {
            args.extend(["-i".to_string(), source]);
            args.extend(["-ss".to_string(), time.clone()]);
        }
    }

    args.extend(["-vframes".to_string(), "1".to_string()]);
    args.extend(["-vf".to_string(), filter.to_string()]);
    args.push(output.to_string_lossy().into_owned());
    Some(args)
}
