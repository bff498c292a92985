// Destination path derivation. No I/O here.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// File name of `path` without its final extension
pub fn strip_extension(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string())
}

/// `<dir>/<base_name><display_name>`, the path every artifact of one
/// (file, size) pair is derived from
pub fn destination_base(dir: &Path, base_name: &str, display_name: &str) -> PathBuf {
    dir.join(format!("{}{}", base_name, display_name))
}

/// Append `.ext` to `path`.
///
/// Unlike `Path::with_extension` this never replaces anything: a display name
/// such as `-1.5x` must survive intact.
pub fn with_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}
