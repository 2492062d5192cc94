use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// vaws - build simulation images and clusters on AWS
#[derive(Parser, Debug)]
#[command(name = "vaws")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ./vaws.toml and the user config
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate configuration for images and clusters
    #[command(subcommand)]
    Configure(ConfigureCommand),

    /// Build images and clusters from generated configuration
    #[command(subcommand)]
    Make(MakeCommand),
}

#[derive(Subcommand, Debug)]
pub enum ConfigureCommand {
    /// Write a Packer build directory for a simulation package
    Ami(ConfigureAmiArgs),

    /// Write a parallelcluster configuration
    Cluster(ConfigureClusterArgs),
}

#[derive(Args, Debug)]
pub struct ConfigureAmiArgs {
    /// Image name
    pub name: String,

    /// Root of the simulation package
    pub code_root: PathBuf,

    /// Parent directory for the configuration directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Artifact to load into the image (repeatable); defaults to those
    /// referenced by the model specifications
    #[arg(short, long = "artifact-path", value_name = "PATH")]
    pub artifact: Vec<PathBuf>,

    /// AWS region
    #[arg(short, long)]
    pub region: Option<String>,

    /// Build instance type, skipping automatic selection
    #[arg(long)]
    pub instance_type: Option<String>,
}

#[derive(Args, Debug)]
pub struct ConfigureClusterArgs {
    /// Cluster name
    pub name: String,

    /// Image id produced by `vaws make ami`
    pub image_id: String,

    /// S3 bucket the cluster may read and write
    pub bucket: String,

    /// Parent directory for the configuration directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// AWS region
    #[arg(short, long)]
    pub region: Option<String>,

    /// VPC to launch into (default: the region's default VPC)
    #[arg(long)]
    pub vpc_id: Option<String>,

    /// Master subnet (default: first subnet of the VPC)
    #[arg(long)]
    pub subnet_id: Option<String>,

    /// EC2 key pair (default: first key pair in the region)
    #[arg(long)]
    pub key_name: Option<String>,

    #[arg(long)]
    pub master_instance_type: Option<String>,

    #[arg(long)]
    pub compute_instance_type: Option<String>,

    #[arg(long)]
    pub max_queue_size: Option<u32>,

    /// Do not upload or reference the post-install script
    #[arg(long)]
    pub no_post_install: bool,
}

#[derive(Subcommand, Debug)]
pub enum MakeCommand {
    /// Run `packer build` on an image configuration
    Ami {
        /// Path to `<name>_ami.json`
        spec: PathBuf,
    },

    /// Run `pcluster create` on a cluster configuration
    Cluster {
        /// Path to `<name>_cluster.ini`
        #[arg(value_name = "CONFIG")]
        cluster_config: PathBuf,
    },
}
