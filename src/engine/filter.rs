// Filter graph for the -vf flag
// https://ffmpeg.org/ffmpeg-filters.html#Filtering-Introduction

use super::resolve::ResolvedSize;

/// Custom filter if one was configured, otherwise scale to the requested
/// width with the height rounded to an even number, keeping aspect ratio.
pub fn build_filter(size: &ResolvedSize) -> String {
    match size.filter.as_deref() {
        Some(custom) if !custom.is_empty() => custom.to_string(),
        _ => scale_filter(size.width),
    }
}

pub fn scale_filter(width: u32) -> String {
    format!("scale={}:trunc(ow/a/2)*2", width)
}
