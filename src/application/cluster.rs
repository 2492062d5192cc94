//! Configure Cluster Use Case
//!
//! Resolves the network placement for a cluster, makes sure the mosh
//! security rule exists, and writes the parallelcluster configuration.

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::ClusterConfig;
use crate::domain::entities::{post_install_script, ClusterSettings, SecurityRule, POST_INSTALL_KEY};
use crate::domain::ports::{NetworkInventory, ObjectStorage, ProviderContext, SecurityRules};
use crate::domain::services::ensure_security_rule;
use crate::error::{VawsError, VawsResult};
use crate::infrastructure::fs::atomic_write;

/// Options for the configure cluster operation
#[derive(Debug, Clone)]
pub struct ClusterOptions {
    pub name: String,
    /// Image built by `make ami`
    pub image_id: String,
    /// Bucket the cluster may read and write
    pub bucket: String,
    /// Parent directory for `<name>_cluster_configuration`
    pub output_root: PathBuf,
    pub vpc_id: Option<String>,
    pub subnet_id: Option<String>,
    pub key_name: Option<String>,
    pub master_instance_type: String,
    pub compute_instance_type: String,
    pub max_queue_size: u32,
    pub post_install: bool,
}

impl ClusterOptions {
    /// Options with instance types, queue size and post-install taken from
    /// configuration.
    pub fn from_config(
        name: impl Into<String>,
        image_id: impl Into<String>,
        bucket: impl Into<String>,
        config: &ClusterConfig,
    ) -> Self {
        Self {
            name: name.into(),
            image_id: image_id.into(),
            bucket: bucket.into(),
            output_root: PathBuf::from("."),
            vpc_id: None,
            subnet_id: None,
            key_name: None,
            master_instance_type: config.master_instance_type.clone(),
            compute_instance_type: config.compute_instance_type.clone(),
            max_queue_size: config.max_queue_size,
            post_install: config.post_install,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_root.join(format!("{}_cluster_configuration", self.name))
    }
}

/// Result of a configure cluster run
#[derive(Debug, Clone)]
pub struct ClusterConfiguration {
    pub config_path: PathBuf,
    pub settings: ClusterSettings,
}

/// Configure cluster use case
pub struct ConfigureClusterUseCase<P>
where
    P: NetworkInventory + SecurityRules + ObjectStorage,
{
    provider: P,
}

impl<P> ConfigureClusterUseCase<P>
where
    P: NetworkInventory + SecurityRules + ObjectStorage,
{
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn execute(
        &self,
        ctx: &ProviderContext,
        options: &ClusterOptions,
    ) -> VawsResult<ClusterConfiguration> {
        let vpc_id = match &options.vpc_id {
            Some(id) => id.clone(),
            None => self.provider.default_vpc(ctx)?.ok_or_else(|| {
                VawsError::not_found("default VPC", format!("no default VPC in {}", ctx.region))
            })?,
        };

        // First available is not checked against instance availability in
        // the subnet's zone.
        let subnet_id = match &options.subnet_id {
            Some(id) => id.clone(),
            None => first(self.provider.subnets(ctx, &vpc_id)?).ok_or_else(|| {
                VawsError::not_found("subnet", format!("no subnets in {}", vpc_id))
            })?,
        };

        let key_name = match &options.key_name {
            Some(name) => name.clone(),
            None => first(self.provider.key_pairs(ctx)?).ok_or_else(|| {
                VawsError::not_found("key pair", format!("no key pairs in {}", ctx.region))
            })?,
        };
        debug!(vpc_id = %vpc_id, subnet_id = %subnet_id, key_name = %key_name, "resolved placement");

        if !self.provider.image_exists(ctx, &options.image_id)? {
            return Err(VawsError::not_found(
                "image",
                format!("{} in {}", options.image_id, ctx.region),
            ));
        }

        let security_group_id =
            ensure_security_rule(&self.provider, ctx, &vpc_id, &SecurityRule::mosh())?;

        let post_install = if options.post_install {
            Some(self.provider.put_object(
                ctx,
                &options.bucket,
                POST_INSTALL_KEY,
                &post_install_script(),
            )?)
        } else {
            None
        };

        let settings = ClusterSettings {
            cluster_name: options.name.clone(),
            image_id: options.image_id.clone(),
            bucket: options.bucket.clone(),
            region: ctx.region.clone(),
            vpc_id,
            master_subnet_id: subnet_id,
            key_name,
            master_instance_type: options.master_instance_type.clone(),
            compute_instance_type: options.compute_instance_type.clone(),
            max_queue_size: options.max_queue_size,
            security_group_id,
            post_install,
        };

        let config_path = options
            .output_dir()
            .join(format!("{}_cluster.ini", options.name));
        atomic_write(&config_path, settings.to_ini().to_string().as_bytes())?;
        info!(cluster = %options.name, config = %config_path.display(), "wrote cluster configuration");

        Ok(ClusterConfiguration {
            config_path,
            settings,
        })
    }
}

fn first(mut items: Vec<String>) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(items.swap_remove(0))
    }
}
