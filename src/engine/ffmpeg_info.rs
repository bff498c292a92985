use anyhow::{Context, Result};
use std::path::Path;
use std::process::Command;

/// Check if ffmpeg is available and return its version line
pub fn ffmpeg_version(program: &Path) -> Result<String> {
    let output = Command::new(program)
        .arg("-version")
        .output()
        .with_context(|| {
            format!(
                "Failed to execute {}. Is ffmpeg installed and in PATH?",
                program.display()
            )
        })?;

    if !output.status.success() {
        anyhow::bail!("ffmpeg command failed with status: {}", output.status);
    }

    Ok(first_line(&String::from_utf8_lossy(&output.stdout)))
}

fn first_line(version_output: &str) -> String {
    version_output
        .lines()
        .next()
        .unwrap_or("Unknown version")
        .to_string()
}
