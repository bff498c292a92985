// Size validation and name resolution

use super::error::ConfigError;
use super::poster::PosterPolicy;
use crate::config::{Config, SizeConfig};
use tracing::warn;

/// A validated size. Built once from `SizeConfig`, never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSize {
    /// Separator + name (or width) + suffix, e.g. `-small`
    pub display_name: String,
    pub width: u32,
    pub filter: Option<String>,
    pub poster: PosterPolicy,
}

pub fn validate_sizes(sizes: &[SizeConfig]) -> Result<(), ConfigError> {
    if sizes.is_empty() {
        return Err(ConfigError::NoSizes);
    }
    Ok(())
}

/// Returns the width if it is a positive integer divisible by 2.
/// Whole floats such as `320.0` count as integers.
pub fn validate_size(index: usize, size: &SizeConfig) -> Result<u32, ConfigError> {
    let width = size
        .width
        .as_u64()
        .or_else(|| {
            size.width
                .as_f64()
                .filter(|w| w.fract() == 0.0 && *w >= 0.0 && *w <= f64::from(u32::MAX))
                .map(|w| w as u64)
        })
        .and_then(|w| u32::try_from(w).ok())
        .filter(|w| *w > 0 && w % 2 == 0);

    width.ok_or_else(|| ConfigError::InvalidWidth {
        size: index + 1,
        width: size.width.to_string(),
    })
}

/// `separator + name`, or `separator + width` when no name is given, then the suffix
pub fn resolve_name(name: Option<&str>, width: u32, suffix: Option<&str>, separator: &str) -> String {
    let label = match name {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => width.to_string(),
    };
    format!("{}{}{}", separator, label, suffix.unwrap_or(""))
}

/// Validate every size and resolve names and poster policies.
/// Nothing is resolved unless all sizes are valid.
pub fn resolve_sizes(config: &Config) -> Result<Vec<ResolvedSize>, ConfigError> {
    validate_sizes(&config.sizes)?;

    let widths = config
        .sizes
        .iter()
        .enumerate()
        .map(|(i, size)| validate_size(i, size))
        .collect::<Result<Vec<_>, _>>()?;

    let resolved = config
        .sizes
        .iter()
        .zip(widths)
        .map(|(size, width)| {
            let display_name = resolve_name(
                size.name.as_deref(),
                width,
                size.suffix.as_deref(),
                &config.separator,
            );

            let (poster, warning) = PosterPolicy::from_config(&size.poster);
            if let Some(warning) = warning {
                warn!(size = %display_name, "{}", warning);
            }

            ResolvedSize {
                display_name,
                width,
                filter: size.filter.clone(),
                poster,
            }
        })
        .collect();

    Ok(resolved)
}
