//! End-to-end tests for `vaws configure ami`.

mod common;

use std::fs;
use std::io::Read;
use std::path::Path;

use common::*;
use flate2::read::GzDecoder;

fn archive_entries(archive: &Path) -> Vec<(String, String)> {
    let mut tar = tar::Archive::new(GzDecoder::new(fs::File::open(archive).unwrap()));
    let mut entries = Vec::new();
    for entry in tar.entries().unwrap() {
        let mut entry = entry.unwrap();
        let name = entry.path().unwrap().to_string_lossy().to_string();
        let mut content = String::new();
        let _ = entry.read_to_string(&mut content);
        entries.push((name, content));
    }
    entries
}

fn setup() -> (TestEnv, String) {
    let env = TestEnv::new();
    let artifact = env.write_project_file("data/input.hdf", "0123456789");
    simulation_package(&env.project_path("code"), &artifact.display().to_string());
    (env, artifact.display().to_string())
}

#[test]
fn test_configure_ami_writes_build_directory() {
    let (env, artifact) = setup();
    let spec_before = fs::read_to_string(env.project_path("code/src/sim/model_specifications/india.yaml")).unwrap();

    let result = env.run(&[
        "configure",
        "ami",
        "sim",
        "code",
        "--region",
        "us-west-2",
        "--instance-type",
        "t2.small",
    ]);
    assert!(result.success, "{}", result.combined_output());

    let out = env.project_path("sim_ami_configuration");
    assert!(out.join("code.tar.gz").is_file());
    assert!(out.join("provision_environment.sh").is_file());

    let spec: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out.join("sim_ami.json")).unwrap()).unwrap();
    let builder = &spec["builders"][0];
    assert_eq!(builder["type"], "amazon-ebs");
    assert_eq!(builder["region"], "us-west-2");
    assert_eq!(builder["instance_type"], "t2.small");
    assert_eq!(builder["ami_name"], "sim {{timestamp}}");
    assert_eq!(spec["provisioners"][0]["destination"], "/tmp/code.tar.gz");
    assert_eq!(spec["provisioners"][1]["source"], artifact.as_str());
    assert_eq!(spec["provisioners"][1]["destination"], "/tmp/input.hdf");
    assert_eq!(spec["provisioners"][2]["type"], "shell");

    let script = fs::read_to_string(out.join("provision_environment.sh")).unwrap();
    assert!(script.contains("/tmp/input.hdf"));

    let entries = archive_entries(&out.join("code.tar.gz"));
    let rewritten = entries
        .iter()
        .find(|(name, _)| name == "simulation_code/src/sim/model_specifications/india.yaml")
        .map(|(_, content)| content.clone())
        .expect("model specification in archive");
    assert!(rewritten.contains("        artifact_path: /usr/local/share/vivarium/artifacts/input.hdf\n"));
    assert!(rewritten.starts_with("# Simulation of a small population\n"));
    assert!(entries.iter().all(|(name, _)| !name.ends_with(".hdf")));
    assert!(entries.iter().all(|(name, _)| !name.contains("/.git")));

    let spec_after = fs::read_to_string(env.project_path("code/src/sim/model_specifications/india.yaml")).unwrap();
    assert_eq!(spec_before, spec_after, "user tree must not be modified");
}

#[test]
fn test_configure_ami_region_from_environment() {
    let (env, _) = setup();

    let result = env.run_with_env(
        &["configure", "ami", "sim", "code", "--instance-type", "t2.small"],
        &[("AWS_DEFAULT_REGION", "eu-west-1")],
    );
    assert!(result.success, "{}", result.combined_output());

    let spec: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(env.project_path("sim_ami_configuration/sim_ami.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(spec["builders"][0]["region"], "eu-west-1");
}

#[test]
fn test_configure_ami_output_dir_from_project_config() {
    let (env, _) = setup();
    env.write_project_file("vaws.toml", "[aws]\nregion = \"us-east-2\"\n\n[output]\ndirectory = \"build\"\n");

    let result = env.run(&["configure", "ami", "sim", "code", "--instance-type", "t2.small"]);
    assert!(result.success, "{}", result.combined_output());

    assert!(env
        .project_path("build/sim_ami_configuration/sim_ami.json")
        .is_file());
}

#[test]
fn test_configure_ami_json_output() {
    let (env, _) = setup();

    let result = env.run(&[
        "configure",
        "ami",
        "sim",
        "code",
        "-r",
        "us-west-2",
        "--instance-type",
        "t2.small",
        "--json",
    ]);
    assert!(result.success, "{}", result.combined_output());

    let events: Vec<serde_json::Value> = result
        .stdout
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(events.first().unwrap()["event"], "start");
    let complete = events.last().unwrap();
    assert_eq!(complete["event"], "complete");
    assert_eq!(complete["instance_type"], "t2.small");
    assert_eq!(complete["payload_bytes"], 10);
}

#[test]
fn test_configure_ami_without_region_fails() {
    let (env, _) = setup();

    let result = env.run(&["configure", "ami", "sim", "code", "--instance-type", "t2.small"]);

    assert!(!result.success);
    assert_eq!(result.exit_code, 1);
    assert!(result.stderr.contains("region"), "{}", result.stderr);
    assert!(!env.project_path("sim_ami_configuration").exists());
}

#[test]
fn test_configure_ami_missing_artifact_fails() {
    let env = TestEnv::new();
    simulation_package(&env.project_path("code"), "/nonexistent/vaws/input.hdf");

    let result = env.run(&[
        "configure",
        "ami",
        "sim",
        "code",
        "-r",
        "us-west-2",
        "--instance-type",
        "t2.small",
    ]);

    assert!(!result.success);
    assert!(result.stderr.contains("artifact not found"), "{}", result.stderr);
}

#[test]
fn test_configure_ami_without_aws_cli_fails_before_work() {
    let (env, _) = setup();

    // No --instance-type: the catalog must be queried and `aws` is not on PATH
    let result = env.run(&["configure", "ami", "sim", "code", "-r", "us-west-2"]);

    assert!(!result.success);
    assert!(result.stderr.contains("`aws`"), "{}", result.stderr);
    assert!(!env.project_path("sim_ami_configuration").exists());
}

#[test]
fn test_unknown_config_key_is_a_warning() {
    let (env, _) = setup();
    env.write_project_file("vaws.toml", "[aws]\nregoin = \"us-east-2\"\n");

    let result = env.run(&[
        "configure",
        "ami",
        "sim",
        "code",
        "-r",
        "us-west-2",
        "--instance-type",
        "t2.small",
    ]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stderr.contains("Unknown config key 'regoin'"));
    assert!(result.stderr.contains("Did you mean 'region'?"));
}
