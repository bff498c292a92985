use crate::cli::{Cli, Commands, TaskArgs};
use anyhow::{Context, Result};
use std::path::Path;
use std::process;
use vidsizes::config::Config;
use vidsizes::engine::{self, DryRunFs, FfmpegEncoder, JobExecutor, LocalFs};

pub fn run(cli: Cli) {
    let result = match cli.command {
        Commands::Encode(args) => handle_encode(&args, &cli.ffmpeg),
        Commands::DryRun(args) => handle_dry_run(&args, &cli.ffmpeg),
        Commands::CheckFfmpeg => handle_check_ffmpeg(&cli.ffmpeg),
        Commands::InitConfig => handle_init_config(),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn handle_encode(args: &TaskArgs, ffmpeg: &Path) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mappings = engine::build_mappings(&args.inputs, args.dest.as_deref())?;

    // Sizes are validated even when there is nothing to encode
    let plan = engine::plan_jobs(&config, &mappings, &mut LocalFs)
        .context("Failed to plan encode jobs")?;
    if plan.is_empty() {
        println!("No video files found");
        return Ok(());
    }

    let total = plan.len();
    let mut done = 0;
    let report = JobExecutor::new(FfmpegEncoder::with_program(ffmpeg)).run_with_callback(
        plan,
        |job, result| {
            done += 1;
            let status = if result.is_ok() { "ok" } else { "FAILED" };
            println!("[{}/{}] {} {}", done, total, job.output.display(), status);
        },
    );

    for (size, count) in report.completed.sizes() {
        println!("Created {} files for size {}", count, size);
    }
    for (codec, count) in report.completed.codecs() {
        println!("Encoded {} {} files", count, codec);
    }
    if report.completed.posters() > 0 {
        println!("Extracted {} posters", report.completed.posters());
    }

    match report.into_result() {
        Ok(_) => Ok(()),
        Err(vidsizes::engine::RunError::JobsFailed { total, failures }) => {
            for failure in &failures {
                eprintln!("  {}", failure);
            }
            anyhow::bail!("{} of {} jobs failed", failures.len(), total)
        }
    }
}

fn handle_dry_run(args: &TaskArgs, ffmpeg: &Path) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let mappings = engine::build_mappings(&args.inputs, args.dest.as_deref())?;

    let plan = engine::plan_jobs(&config, &mappings, &mut DryRunFs)
        .context("Failed to plan encode jobs")?;

    let program = ffmpeg.to_string_lossy();
    for job in plan.jobs() {
        println!("{}", job.command_line(&program));
    }
    println!(
        "Total jobs: {} ({} encodes, {} posters)",
        plan.len(),
        plan.planned().total(),
        plan.planned().posters()
    );
    Ok(())
}

fn handle_check_ffmpeg(ffmpeg: &Path) -> Result<()> {
    let version = engine::ffmpeg_version(ffmpeg)?;
    println!("ffmpeg found: {}", version);
    Ok(())
}

fn handle_init_config() -> Result<()> {
    let path = Config::config_path()?;

    if Config::exists() {
        let cfg = Config::load_from(&path)?;
        println!("Config loaded successfully from {}", path.display());
        println!("{:#?}", cfg);
        return Ok(());
    }

    println!("Creating default config...");
    Config::ensure_default()?;
    println!("Default config saved to {}", path.display());
    Ok(())
}
