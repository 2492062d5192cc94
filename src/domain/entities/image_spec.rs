//! Packer build specification for the simulation machine image
//!
//! The template builds one `amazon-ebs` image on top of the
//! aws-parallelcluster base image, then copies the code tarball and the
//! artifacts in and runs the environment provisioning script.

use serde::Serialize;

use super::artifact::{ArtifactReference, IMAGE_ARTIFACT_DIR};

/// Base image name pattern. The parallelcluster version must match the
/// `pcluster` used to create clusters from the image.
pub const SOURCE_IMAGE_PATTERN: &str = "aws-parallelcluster-2.6.1-ubuntu-1804-*";

/// File name of the packaged source tree.
pub const CODE_ARCHIVE_NAME: &str = "code.tar.gz";

/// File name of the environment provisioning script.
pub const PROVISION_SCRIPT_NAME: &str = "provision_environment.sh";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageSpec {
    pub variables: Variables,
    pub builders: Vec<AmazonEbsBuilder>,
    pub provisioners: Vec<Provisioner>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Variables {
    pub aws_access_key: String,
    pub aws_secret_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmazonEbsBuilder {
    #[serde(rename = "type")]
    pub kind: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    pub source_ami_filter: SourceImageFilter,
    /// `None` is written as `null` so the user can fill it in.
    pub instance_type: Option<String>,
    pub ssh_username: String,
    pub ami_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceImageFilter {
    pub filters: ImageFilters,
    pub owners: Vec<String>,
    pub most_recent: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageFilters {
    #[serde(rename = "virtualization-type")]
    pub virtualization_type: String,
    pub name: String,
    #[serde(rename = "root-device-type")]
    pub root_device_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Provisioner {
    File { source: String, destination: String },
    Shell { script: String },
}

impl AmazonEbsBuilder {
    pub fn new(image_name: &str, region: &str, instance_type: Option<String>) -> Self {
        Self {
            kind: "amazon-ebs".to_string(),
            access_key: "{{user `aws_access_key`}}".to_string(),
            secret_key: "{{user `aws_secret_key`}}".to_string(),
            region: region.to_string(),
            source_ami_filter: SourceImageFilter {
                filters: ImageFilters {
                    virtualization_type: "hvm".to_string(),
                    name: SOURCE_IMAGE_PATTERN.to_string(),
                    root_device_type: "ebs".to_string(),
                },
                owners: vec!["amazon".to_string()],
                most_recent: true,
            },
            instance_type,
            ssh_username: "ubuntu".to_string(),
            // Image names must be unique per account
            ami_name: format!("{} {{{{timestamp}}}}", image_name),
        }
    }
}

impl ImageSpec {
    /// Assemble the full template for an image.
    pub fn new(
        image_name: &str,
        region: &str,
        instance_type: Option<String>,
        artifacts: &[ArtifactReference],
    ) -> Self {
        let mut provisioners = vec![Provisioner::File {
            source: CODE_ARCHIVE_NAME.to_string(),
            destination: format!("/tmp/{}", CODE_ARCHIVE_NAME),
        }];
        provisioners.extend(artifacts.iter().map(|artifact| Provisioner::File {
            source: artifact.original_path.display().to_string(),
            destination: artifact.staging_path(),
        }));
        provisioners.push(Provisioner::Shell {
            script: PROVISION_SCRIPT_NAME.to_string(),
        });

        Self {
            variables: Variables::default(),
            builders: vec![AmazonEbsBuilder::new(image_name, region, instance_type)],
            provisioners,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// True if any `amazon-ebs` builder in a (possibly hand-edited) template
    /// has no instance type.
    pub fn has_unset_instance_type(template: &serde_json::Value) -> bool {
        let Some(builders) = template.get("builders").and_then(|b| b.as_array()) else {
            return false;
        };
        builders
            .iter()
            .filter(|b| b.get("type").and_then(|t| t.as_str()) == Some("amazon-ebs"))
            .any(|b| {
                b.get("instance_type")
                    .and_then(|t| t.as_str())
                    .map(|t| t.trim().is_empty())
                    .unwrap_or(true)
            })
    }
}

/// Shell script that prepares the simulation environment inside the image.
pub fn provision_script(artifacts: &[ArtifactReference]) -> String {
    let staged = artifacts
        .iter()
        .map(|a| a.staging_path())
        .collect::<Vec<_>>()
        .join(" ");

    format!(
        r#"#!/bin/bash -e -x

sudo apt-get update
sudo apt-get upgrade -y
sudo apt-get install -y tar mosh

wget -q -O install_miniconda.sh https://repo.anaconda.com/miniconda/Miniconda3-latest-Linux-x86_64.sh
sudo chmod +x install_miniconda.sh
sudo -u ubuntu ./install_miniconda.sh -b -q

echo "export PATH=\$HOME/miniconda3/bin:\$PATH" >> $HOME/.bashrc

$HOME/miniconda3/bin/conda create -y --name simulation python=3.6
$HOME/miniconda3/condabin/conda install redis
$HOME/miniconda3/condabin/conda install hdf5

sudo mkdir -p {dir}
sudo mv {staged} {dir} || true

sudo tar -xvzf /tmp/{archive} --directory $HOME
cd $HOME/simulation_code
sudo -u ubuntu $HOME/miniconda3/envs/simulation/bin/pip install -e .
"#,
        dir = IMAGE_ARTIFACT_DIR,
        staged = staged,
        archive = CODE_ARCHIVE_NAME,
    )
}
