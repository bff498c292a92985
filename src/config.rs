// Task configuration: sizes, encode groups and the name separator

use crate::engine::ConfigError;
use anyhow::{Context, Result};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// User options. Every key that is left out falls back to the built-in default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Inserted between the source file name and the size name
    #[serde(default = "default_separator")]
    pub separator: String,

    #[serde(default = "default_sizes")]
    pub sizes: Vec<SizeConfig>,

    /// Encode groups, applied in declaration order
    #[serde(default = "default_encodes")]
    pub encodes: Vec<EncodeGroup>,
}

/// One output size as written by the user. Validated by `engine::resolve_sizes`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Kept loose so that a non-numeric width is reported as a config error
    /// rather than a parse failure.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub width: serde_json::Value,

    /// Custom filter graph, replaces the derived scale filter entirely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    #[serde(default, skip_serializing_if = "PosterConfig::is_disabled")]
    pub poster: PosterConfig,
}

impl SizeConfig {
    pub fn new(width: u32) -> Self {
        Self {
            width: width.into(),
            ..Default::default()
        }
    }

    pub fn named(name: &str, width: u32) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::new(width)
        }
    }

    pub fn with_poster(mut self, poster: PosterConfig) -> Self {
        self.poster = poster;
        self
    }

    pub fn with_filter(mut self, filter: &str) -> Self {
        self.filter = Some(filter.to_string());
        self
    }
}

/// Raw `poster` value: a bool, a seek time, or a table with `fastseek` or
/// `accurateseek`. Tables are kept as written so each key can be checked on its
/// own. Anything else lands in `Other` and is resolved by `PosterPolicy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PosterConfig {
    Flag(bool),
    Seek(String),
    Options(serde_json::Map<String, serde_json::Value>),
    Other(serde_json::Value),
}

impl Default for PosterConfig {
    fn default() -> Self {
        PosterConfig::Flag(false)
    }
}

impl PosterConfig {
    /// `{ fastseek = "<time>" }`
    pub fn fastseek(time: &str) -> Self {
        Self::table("fastseek", time)
    }

    /// `{ accurateseek = "<time>" }`
    pub fn accurateseek(time: &str) -> Self {
        Self::table("accurateseek", time)
    }

    fn table(key: &str, time: &str) -> Self {
        let mut options = serde_json::Map::new();
        options.insert(key.to_string(), time.into());
        PosterConfig::Options(options)
    }

    fn is_disabled(&self) -> bool {
        matches!(self, PosterConfig::Flag(false))
    }
}

/// One codec and the ffmpeg flags used to produce it.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeTarget {
    /// Also used as the output file extension
    pub codec: String,
    pub flags: Vec<(String, String)>,
}

impl EncodeTarget {
    pub fn new(codec: &str, flags: &[(&str, &str)]) -> Self {
        Self {
            codec: codec.to_string(),
            flags: flags
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// A table of codec name to flag list, e.g. `{ webm = [{ "-vcodec" = "libvpx" }] }`.
/// Document order of codecs and flags is preserved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EncodeGroup {
    pub targets: Vec<EncodeTarget>,
}

impl EncodeGroup {
    pub fn new(targets: Vec<EncodeTarget>) -> Self {
        Self { targets }
    }
}

/// Flag values may be written as strings, numbers or booleans
#[derive(Deserialize)]
#[serde(untagged)]
enum FlagValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for FlagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlagValue::Text(s) => f.write_str(s),
            FlagValue::Int(i) => write!(f, "{i}"),
            FlagValue::Float(x) => write!(f, "{x}"),
            FlagValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// One entry of a flag list. Usually a single pair, but every pair is kept.
struct FlagEntries(Vec<(String, String)>);

impl<'de> Deserialize<'de> for FlagEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = FlagEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of ffmpeg flag to value")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<FlagEntries, A::Error> {
                let mut pairs = Vec::new();
                while let Some((flag, value)) = map.next_entry::<String, FlagValue>()? {
                    pairs.push((flag, value.to_string()));
                }
                Ok(FlagEntries(pairs))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

impl<'de> Deserialize<'de> for EncodeGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GroupVisitor;

        impl<'de> Visitor<'de> for GroupVisitor {
            type Value = EncodeGroup;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a table of codec name to a list of flags")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<EncodeGroup, A::Error> {
                let mut targets = Vec::new();
                while let Some((codec, entries)) = map.next_entry::<String, Vec<FlagEntries>>()? {
                    if codec.is_empty() {
                        return Err(de::Error::custom("codec name must not be empty"));
                    }
                    let flags = entries.into_iter().flat_map(|e| e.0).collect();
                    targets.push(EncodeTarget { codec, flags });
                }
                Ok(EncodeGroup { targets })
            }
        }

        deserializer.deserialize_map(GroupVisitor)
    }
}

struct FlagPair<'a>(&'a str, &'a str);

impl Serialize for FlagPair<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.0, self.1)?;
        map.end()
    }
}

impl Serialize for EncodeGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.targets.len()))?;
        for target in &self.targets {
            let flags: Vec<FlagPair<'_>> = target
                .flags
                .iter()
                .map(|(k, v)| FlagPair(k, v))
                .collect();
            map.serialize_entry(&target.codec, &flags)?;
        }
        map.end()
    }
}

fn default_separator() -> String {
    "-".to_string()
}

fn default_sizes() -> Vec<SizeConfig> {
    vec![
        SizeConfig::named("small", 320).with_poster(PosterConfig::Flag(true)),
        SizeConfig::named("large", 640).with_poster(PosterConfig::Flag(true)),
    ]
}

fn default_encodes() -> Vec<EncodeGroup> {
    vec![EncodeGroup::new(vec![
        EncodeTarget::new(
            "webm",
            &[
                ("-vcodec", "libvpx"),
                ("-acodec", "libvorbis"),
                ("-q:a", "100"),
                ("-quality", "good"),
                ("-cpu-used", "0"),
                ("-b:v", "500k"),
                ("-qmax", "42"),
                ("-maxrate", "500k"),
                ("-bufsize", "1000k"),
                ("-threads", "0"),
            ],
        ),
        EncodeTarget::new(
            "mp4",
            &[
                ("-vcodec", "libx264"),
                ("-acodec", "libfaac"),
                ("-pix_fmt", "yuv420p"),
                ("-q:v", "4"),
                ("-q:a", "100"),
                ("-threads", "0"),
            ],
        ),
    ])]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            sizes: default_sizes(),
            encodes: default_encodes(),
        }
    }
}

impl Config {
    /// Get the path to the default config file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = if cfg!(target_os = "macos") {
            dirs::home_dir()
                .context("Could not determine home directory")?
                .join(".config")
                .join("vidsizes")
        } else {
            dirs::config_dir()
                .context("Could not determine config directory")?
                .join("vidsizes")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Parse options written as TOML, overlaying them on the defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse options written as JSON, overlaying them on the defaults
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load options from a file; `.json` files are read as JSON, anything else as TOML
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        let config = if is_json {
            Self::from_json_str(&contents)
        } else {
            Self::from_toml_str(&contents)
        };

        config.with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the default config file, or use built-in defaults if it doesn't exist.
    /// Nothing is written; `init-config` creates the file.
    pub fn load() -> Result<Self> {
        Self::load_or_default(&Self::config_path()?)
    }

    /// Load `path` if it exists, otherwise return the built-in defaults
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            tracing::debug!("No config file at {}, using defaults", path.display());
            Ok(Config::default())
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Check if the default config file exists
    pub fn exists() -> bool {
        Self::config_path().map(|p| p.exists()).unwrap_or(false)
    }

    /// Create a default config file if it doesn't exist
    pub fn ensure_default() -> Result<()> {
        if !Self::exists() {
            Config::default().save()?;
        }
        Ok(())
    }
}
