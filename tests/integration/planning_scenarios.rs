use crate::common::helpers::*;
use std::path::PathBuf;
use vidsizes::config::{Config, PosterConfig, SizeConfig};
use vidsizes::engine::{
    ConfigError, DryRunFs, FileMapping, JobKind, PlanError, PlanStep, plan_jobs,
};

#[test]
fn test_single_size_poster_then_webm() {
    let config = config_with(
        vec![SizeConfig::new(240).with_poster(PosterConfig::Flag(true))],
        vec![webm_target()],
    );
    let mappings = vec![FileMapping::new("test/assets/cappadocia.mp4", "tmp/custom_options")];

    let plan = plan_jobs(&config, &mappings, &mut DryRunFs).unwrap();

    assert_eq!(plan.len(), 2);
    assert_eq!(
        outputs(&plan),
        vec![
            "tmp/custom_options/cappadocia-240.jpg",
            "tmp/custom_options/cappadocia-240.webm",
        ]
    );
    let kinds: Vec<JobKind> = plan.jobs().map(|j| j.kind).collect();
    assert_eq!(kinds, vec![JobKind::Poster, JobKind::Encode]);
}

#[test]
fn test_two_sizes_two_codecs_size_major() {
    let config = config_with(
        vec![
            poster_size("small", 320, PosterConfig::Flag(true)),
            poster_size("large", 640, PosterConfig::Flag(true)),
        ],
        vec![webm_target(), mp4_target()],
    );
    let mappings = vec![FileMapping::pair("out/bunny.mov", "assets/bunny.mov")];

    let plan = plan_jobs(&config, &mappings, &mut DryRunFs).unwrap();

    assert_eq!(plan.len(), 6);
    assert_eq!(
        outputs(&plan),
        vec![
            "out/bunny-small.jpg",
            "out/bunny-small.webm",
            "out/bunny-small.mp4",
            "out/bunny-large.jpg",
            "out/bunny-large.webm",
            "out/bunny-large.mp4",
        ]
    );
    assert_eq!(plan.planned().size_count("-small"), 2);
    assert_eq!(plan.planned().codec_count("mp4"), 2);
    assert_eq!(plan.planned().posters(), 2);
}

#[test]
fn test_file_major_within_size_and_report_after_each_file() {
    let config = config_with(vec![SizeConfig::new(200)], vec![mp4_target()]);
    let mappings = vec![
        FileMapping::new("a.mp4", "out"),
        FileMapping::new("b.mp4", "out"),
    ];

    let plan = plan_jobs(&config, &mappings, &mut DryRunFs).unwrap();

    let steps: Vec<String> = plan
        .steps()
        .iter()
        .map(|step| match step {
            PlanStep::Job(job) => job.output.to_string_lossy().into_owned(),
            PlanStep::Report { size } => format!("report {}", size),
        })
        .collect();
    assert_eq!(
        steps,
        vec!["out/a-200.mp4", "report -200", "out/b-200.mp4", "report -200"]
    );
}

#[test]
fn test_groups_applied_in_declaration_order() {
    let toml_str = r#"
        [[sizes]]
        width = 200

        [[encodes]]
        webm = [{ "-vcodec" = "libvpx" }]

        [[encodes]]
        ogv = [{ "-vcodec" = "libtheora" }]
        mp4 = [{ "-vcodec" = "libx264" }]
    "#;
    let config = Config::from_toml_str(toml_str).unwrap();

    let plan = plan_jobs(&config, &[FileMapping::new("a.mov", "out")], &mut DryRunFs).unwrap();
    let codecs: Vec<&str> = plan.jobs().filter_map(|j| j.codec.as_deref()).collect();
    assert_eq!(codecs, vec!["webm", "ogv", "mp4"]);
}

#[test]
fn test_custom_filter_used_for_poster_and_encode() {
    let filter = "scale=640:trunc(ow/a/2)*2,crop=360:360:140:0";
    let config = config_with(
        vec![poster_size("filtered", 640, PosterConfig::Flag(true)).with_filter(filter)],
        vec![mp4_target()],
    );

    let plan = plan_jobs(&config, &[FileMapping::new("cappadocia.mp4", "out")], &mut DryRunFs)
        .unwrap();

    for job in plan.jobs() {
        let vf = job.args.iter().position(|a| a == "-vf").unwrap();
        assert_eq!(job.args[vf + 1], filter);
    }
    assert_eq!(outputs(&plan)[1], "out/cappadocia-filtered.mp4");
}

#[test]
fn test_default_config_plan() {
    let plan = plan_jobs(
        &Config::default(),
        &[FileMapping::pair("tmp/default_options/big_buck_bunny.mov", "test/assets/big_buck_bunny.mov")],
        &mut DryRunFs,
    )
    .unwrap();

    assert_eq!(
        outputs(&plan),
        vec![
            "tmp/default_options/big_buck_bunny-small.jpg",
            "tmp/default_options/big_buck_bunny-small.webm",
            "tmp/default_options/big_buck_bunny-small.mp4",
            "tmp/default_options/big_buck_bunny-large.jpg",
            "tmp/default_options/big_buck_bunny-large.webm",
            "tmp/default_options/big_buck_bunny-large.mp4",
        ]
    );
}

#[test]
fn test_separator_and_suffix() {
    let mut size = SizeConfig::named("hd", 1280);
    size.suffix = Some("@2x".to_string());
    let mut config = config_with(vec![size], vec![webm_target()]);
    config.separator = "_".to_string();

    let plan = plan_jobs(&config, &[FileMapping::new("clip.mp4", "out")], &mut DryRunFs).unwrap();
    assert_eq!(outputs(&plan), vec!["out/clip_hd@2x.webm"]);
}

#[test]
fn test_config_errors() {
    let no_sizes = config_with(vec![], vec![webm_target()]);
    let err = plan_jobs(&no_sizes, &[FileMapping::new("a.mp4", "out")], &mut DryRunFs)
        .unwrap_err();
    assert!(matches!(err, PlanError::Config(ConfigError::NoSizes)));
    assert_eq!(err.to_string(), "No sizes have been defined");

    let odd = config_with(vec![SizeConfig::new(241)], vec![webm_target()]);
    let err = plan_jobs(&odd, &[FileMapping::new("a.mp4", "out")], &mut DryRunFs).unwrap_err();
    assert!(matches!(err, PlanError::Config(ConfigError::InvalidWidth { .. })));

    let valid = config_with(vec![SizeConfig::new(240)], vec![webm_target()]);
    let empty = FileMapping {
        sources: vec![],
        destination_dir: PathBuf::from("out"),
    };
    let err = plan_jobs(&valid, &[empty], &mut DryRunFs).unwrap_err();
    assert!(matches!(err, PlanError::Config(ConfigError::MissingSource { .. })));
}

#[test]
fn test_no_mappings_plans_nothing() {
    let plan = plan_jobs(&Config::default(), &[], &mut DryRunFs).unwrap();
    assert!(plan.is_empty());
    assert_eq!(plan.planned().sizes().count(), 2);
}
