//! Configuration types

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// AWS account settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AwsConfig {
    /// Region for every provider call and for the image build
    #[serde(default)]
    pub region: Option<String>,

    /// Named profile handed to the `aws` client
    #[serde(default)]
    pub profile: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct OutputConfig {
    /// Parent directory for generated configuration directories
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// Defaults for `configure cluster`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClusterConfig {
    #[serde(default = "default_master_instance_type")]
    pub master_instance_type: String,

    #[serde(default = "default_compute_instance_type")]
    pub compute_instance_type: String,

    #[serde(default = "default_max_queue_size")]
    pub max_queue_size: u32,

    /// Upload and reference the post-install script
    #[serde(default = "default_true")]
    pub post_install: bool,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            master_instance_type: default_master_instance_type(),
            compute_instance_type: default_compute_instance_type(),
            max_queue_size: default_max_queue_size(),
            post_install: true,
        }
    }
}

fn default_master_instance_type() -> String {
    "t2.micro".to_string()
}

fn default_compute_instance_type() -> String {
    "c5.xlarge".to_string()
}

fn default_max_queue_size() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub aws: AwsConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub cluster: ClusterConfig,
}
