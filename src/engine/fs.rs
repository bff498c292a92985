// Filesystem side effects of planning: output directories and stale outputs

use std::fs;
use std::io;
use std::path::Path;

/// The only filesystem access the planner needs
pub trait OutputFs {
    fn ensure_dir(&mut self, dir: &Path) -> io::Result<()>;

    /// Delete a previous output so ffmpeg doesn't refuse to overwrite it.
    /// Returns whether a file was removed.
    fn remove_stale(&mut self, path: &Path) -> io::Result<bool>;
}

/// Real filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFs;

impl OutputFs for LocalFs {
    fn ensure_dir(&mut self, dir: &Path) -> io::Result<()> {
        if dir.as_os_str().is_empty() || dir.is_dir() {
            return Ok(());
        }
        fs::create_dir_all(dir)
    }

    fn remove_stale(&mut self, path: &Path) -> io::Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Touches nothing. Used to print a plan without side effects.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunFs;

impl OutputFs for DryRunFs {
    fn ensure_dir(&mut self, _dir: &Path) -> io::Result<()> {
        Ok(())
    }

    fn remove_stale(&mut self, _path: &Path) -> io::Result<bool> {
        Ok(false)
    }
}
