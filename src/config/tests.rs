//! Tests for the config module

use super::*;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.aws.region, None);
    assert_eq!(config.cluster.master_instance_type, "t2.micro");
    assert_eq!(config.cluster.max_queue_size, 10);
    assert!(config.cluster.post_install);
}

#[test]
fn test_config_parse_toml() {
    let toml = r#"
[aws]
region = "us-west-2"
profile = "sim"

[output]
directory = "build"

[cluster]
compute_instance_type = "c5.2xlarge"
max_queue_size = 50
post_install = false
"#;

    let config: Config = toml::from_str(toml).unwrap();

    assert_eq!(config.aws.region.as_deref(), Some("us-west-2"));
    assert_eq!(config.aws.profile.as_deref(), Some("sim"));
    assert_eq!(config.output.directory, Some(PathBuf::from("build")));
    assert_eq!(config.cluster.compute_instance_type, "c5.2xlarge");
    assert_eq!(config.cluster.master_instance_type, "t2.micro");
    assert_eq!(config.cluster.max_queue_size, 50);
    assert!(!config.cluster.post_install);
}

#[test]
fn test_unknown_keys_become_warnings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vaws.toml");
    fs::write(&path, "[aws]\nregoin = \"us-east-1\"\n").unwrap();

    let (config, warnings) = load_with_warnings(&path).unwrap();

    assert_eq!(config.aws.region, None);
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "regoin");
    assert_eq!(warnings[0].line, Some(2));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("region"));
    assert!(warnings[0].to_string().contains("did you mean 'region'?"));
}

#[test]
fn test_unknown_table_points_at_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vaws.toml");
    fs::write(
        &path,
        "# max_queue_size is per cluster\n[clustr]\nmax_queue_size = 4\n",
    )
    .unwrap();

    let (_, warnings) = load_with_warnings(&path).unwrap();

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "clustr");
    assert_eq!(warnings[0].line, Some(2));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("cluster"));
}

#[test]
fn test_distant_unknown_key_has_no_suggestion() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vaws.toml");
    fs::write(&path, "[output]\ncompression = \"gzip\"\n").unwrap();

    let (_, warnings) = load_with_warnings(&path).unwrap();

    assert_eq!(warnings[0].line, Some(2));
    assert!(warnings[0].suggestion.is_none());
}

#[test]
fn test_invalid_toml_is_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vaws.toml");
    fs::write(&path, "[aws\nregion = 1").unwrap();

    let err = load_with_warnings(&path).unwrap_err();
    assert!(matches!(err, VawsError::InvalidConfig { .. }));
}

#[test]
fn test_env_region_precedence() {
    let config = with_overrides_from(
        Config::default(),
        env(&[("AWS_DEFAULT_REGION", "eu-west-1"), ("AWS_REGION", "us-east-2")]),
    );
    assert_eq!(config.aws.region.as_deref(), Some("us-east-2"));

    let config = with_overrides_from(
        Config::default(),
        env(&[("AWS_REGION", "us-east-2"), ("VAWS_REGION", "ap-south-1")]),
    );
    assert_eq!(config.aws.region.as_deref(), Some("ap-south-1"));
}

#[test]
fn test_env_overrides_file_values() {
    let mut base = Config::default();
    base.aws.region = Some("us-west-2".into());
    base.aws.profile = Some("file".into());

    let config = with_overrides_from(base, env(&[("AWS_PROFILE", "env"), ("VAWS_OUTPUT_DIR", "/out")]));

    assert_eq!(config.aws.region.as_deref(), Some("us-west-2"));
    assert_eq!(config.aws.profile.as_deref(), Some("env"));
    assert_eq!(config.output.directory, Some(PathBuf::from("/out")));
}

#[test]
fn test_empty_env_values_are_ignored() {
    let mut base = Config::default();
    base.aws.region = Some("us-west-2".into());

    let config = with_overrides_from(base, env(&[("AWS_REGION", "  ")]));

    assert_eq!(config.aws.region.as_deref(), Some("us-west-2"));
}

#[test]
fn test_region_flag_wins_and_unset_is_error() {
    let mut config = Config::default();
    assert!(matches!(
        config.resolve_region(None),
        Err(VawsError::RegionUnset)
    ));

    config.aws.region = Some("us-west-2".into());
    assert_eq!(config.resolve_region(None).unwrap(), "us-west-2");
    assert_eq!(config.resolve_region(Some("eu-central-1")).unwrap(), "eu-central-1");
}

#[test]
fn test_provider_context_carries_profile() {
    let mut config = Config::default();
    config.aws.profile = Some("sim".into());

    let ctx = config.provider_context(Some("us-west-2")).unwrap();

    assert_eq!(ctx.region, "us-west-2");
    assert_eq!(ctx.profile.as_deref(), Some("sim"));
}

#[test]
fn test_output_dir_resolution() {
    let mut config = Config::default();
    let cwd = Path::new("/work");

    assert_eq!(config.resolve_output_dir(None, cwd), PathBuf::from("/work"));
    config.output.directory = Some(PathBuf::from("/cfg"));
    assert_eq!(config.resolve_output_dir(None, cwd), PathBuf::from("/cfg"));
    assert_eq!(
        config.resolve_output_dir(Some(Path::new("/flag")), cwd),
        PathBuf::from("/flag")
    );
}

#[test]
fn test_explicit_config_must_exist() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    assert!(load(Some(&missing), dir.path()).is_err());
}

#[test]
fn test_project_config_is_found() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join(PROJECT_CONFIG_FILE),
        "[cluster]\nmax_queue_size = 3\n",
    )
    .unwrap();

    let (config, warnings) = load(None, dir.path()).unwrap();

    assert_eq!(config.cluster.max_queue_size, 3);
    assert!(warnings.is_empty());
}
