//! Configuration module for vaws
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (VAWS_*, AWS_REGION, AWS_DEFAULT_REGION, AWS_PROFILE)
//! 3. Explicit `--config` file, or project config (./vaws.toml)
//! 4. User config (~/.config/vaws/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
#[cfg(test)]
mod tests;
mod types;

use std::path::{Path, PathBuf};

pub use loader::{
    load, load_with_warnings, with_env_overrides, with_overrides_from, ConfigWarning,
    PROJECT_CONFIG_FILE,
};
pub use types::{AwsConfig, ClusterConfig, Config, OutputConfig};

use crate::domain::ports::ProviderContext;
use crate::error::{VawsError, VawsResult};

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> VawsResult<Self> {
        let (config, _warnings) = load_with_warnings(path)?;
        Ok(config)
    }

    /// Region from the flag, else from config/environment.
    pub fn resolve_region(&self, flag: Option<&str>) -> VawsResult<String> {
        flag.map(str::to_string)
            .or_else(|| self.aws.region.clone())
            .filter(|r| !r.trim().is_empty())
            .ok_or(VawsError::RegionUnset)
    }

    /// Provider context for the resolved region and configured profile.
    pub fn provider_context(&self, region_flag: Option<&str>) -> VawsResult<ProviderContext> {
        Ok(ProviderContext::new(self.resolve_region(region_flag)?)
            .with_profile(self.aws.profile.clone()))
    }

    /// Output parent directory: flag, else config, else `cwd`.
    pub fn resolve_output_dir(&self, flag: Option<&Path>, cwd: &Path) -> PathBuf {
        flag.map(Path::to_path_buf)
            .or_else(|| self.output.directory.clone())
            .unwrap_or_else(|| cwd.to_path_buf())
    }
}
