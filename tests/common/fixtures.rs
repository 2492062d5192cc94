//! Test fixtures - reusable source trees and documents.

use std::path::Path;

use super::env::write_file;

/// Model specification with the artifact path nested under input_data.
pub fn model_spec(artifact_path: &str) -> String {
    format!(
        "# Simulation of a small population
components:
    vivarium_public_health:
        population:
            - BasePopulation()

configuration:
    input_data:
        location: India
        artifact_path: {}
    population:
        population_size: 10_000
",
        artifact_path
    )
}

/// Minimal simulation package: setup.py, one model specification, a
/// cached data file that must not be shipped.
pub fn simulation_package(root: &Path, artifact_path: &str) {
    write_file(root, "setup.py", "from setuptools import setup\nsetup(name='sim')\n");
    write_file(root, "src/sim/__init__.py", "");
    write_file(
        root,
        "src/sim/model_specifications/india.yaml",
        &model_spec(artifact_path),
    );
    write_file(root, "src/sim/cache.hdf", "not shipped");
    write_file(root, ".git/HEAD", "ref: refs/heads/main\n");
}

pub const PACKER_TEMPLATE_WITHOUT_INSTANCE: &str = r#"{
  "builders": [
    { "type": "amazon-ebs", "region": "us-west-2", "ssh_username": "ubuntu" }
  ],
  "provisioners": []
}
"#;

pub const PACKER_TEMPLATE: &str = r#"{
  "builders": [
    { "type": "amazon-ebs", "region": "us-west-2", "instance_type": "t2.large" }
  ],
  "provisioners": []
}
"#;

pub const CLUSTER_CONFIG: &str = "[aws]
aws_region_name = us-west-2

[global]
cluster_template = sim
update_check = true
";
