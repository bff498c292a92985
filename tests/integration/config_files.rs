use crate::common::helpers::*;
use std::fs;
use tempfile::TempDir;
use vidsizes::config::{Config, PosterConfig};
use vidsizes::engine::{DryRunFs, FileMapping, plan_jobs};

#[test]
fn test_toml_task_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom_options.toml");
    fs::write(
        &path,
        r#"
[[sizes]]
width = 240
poster = true

[[encodes]]
webm = [
    { "-vcodec" = "libvpx" },
    { "-acodec" = "libvorbis" },
    { "-crf" = "15" },
    { "-q:a" = "80" },
]
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.separator, "-");
    assert_eq!(config.sizes[0].poster, PosterConfig::Flag(true));
    assert_eq!(config.encodes[0].targets, vec![webm_target()]);

    let plan = plan_jobs(&config, &[FileMapping::new("clip.mov", "out")], &mut DryRunFs).unwrap();
    assert_eq!(outputs(&plan), vec!["out/clip-240.jpg", "out/clip-240.webm"]);
}

#[test]
fn test_json_task_file_with_numeric_flags() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("task.JSON");
    fs::write(
        &path,
        r#"{
            "separator": ".",
            "sizes": [{ "width": 480 }],
            "encodes": [{ "mp4": [{ "-q:v": 4 }, { "-threads": 0 }] }]
        }"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    let plan = plan_jobs(&config, &[FileMapping::new("clip.mov", "out")], &mut DryRunFs).unwrap();
    let job = plan.jobs().next().unwrap();
    assert_eq!(
        job.args,
        vec![
            "-i",
            "clip.mov",
            "-q:v",
            "4",
            "-threads",
            "0",
            "-vf",
            "scale=480:trunc(ow/a/2)*2",
            "out/clip.480.mp4"
        ]
    );
}

#[test]
fn test_unparseable_task_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    fs::write(&path, "sizes = \"all of them\"\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    let msg = format!("{:#}", err);
    assert!(msg.contains("Failed to parse config file"));
    assert!(msg.contains("Invalid task configuration"));
}

#[test]
fn test_missing_task_file() {
    let err = Config::load_from(std::path::Path::new("/nonexistent/task.toml")).unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
