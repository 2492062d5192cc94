//! Configuration loading

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{VawsError, VawsResult};
use crate::infrastructure::fs::vaws_config_dir;

use super::types::Config;

/// Project config file name, looked up in the working directory.
pub const PROJECT_CONFIG_FILE: &str = "vaws.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> VawsResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| VawsError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_key_line(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Load the explicit file, else the project config, else the user config,
/// else defaults. Environment overrides are applied on top.
///
/// A config file that exists but fails to parse is an error rather than a
/// silent fallback to defaults.
pub fn load(
    explicit: Option<&Path>,
    project_root: &Path,
) -> VawsResult<(Config, Vec<ConfigWarning>)> {
    let candidates: Vec<PathBuf> = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => {
            let mut c = vec![project_root.join(PROJECT_CONFIG_FILE)];
            if let Some(dir) = vaws_config_dir() {
                c.push(dir.join("config.toml"));
            }
            c
        }
    };

    for path in &candidates {
        if explicit.is_some() || path.is_file() {
            debug!(config = %path.display(), "loading configuration");
            let (config, warnings) = load_with_warnings(path)?;
            return Ok((with_env_overrides(config), warnings));
        }
    }

    Ok((with_env_overrides(Config::default()), Vec::new()))
}

/// Apply environment variable overrides from the process environment.
pub fn with_env_overrides(config: Config) -> Config {
    with_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply environment overrides read through `lookup`.
///
/// Region: `VAWS_REGION`, then `AWS_REGION`, then `AWS_DEFAULT_REGION`.
/// Profile: `VAWS_PROFILE`, then `AWS_PROFILE`. Output: `VAWS_OUTPUT_DIR`.
pub fn with_overrides_from(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Config {
    let first = |keys: &[&str]| {
        keys.iter()
            .filter_map(|k| lookup(k))
            .find(|v| !v.trim().is_empty())
    };

    if let Some(region) = first(&["VAWS_REGION", "AWS_REGION", "AWS_DEFAULT_REGION"]) {
        config.aws.region = Some(region);
    }
    if let Some(profile) = first(&["VAWS_PROFILE", "AWS_PROFILE"]) {
        config.aws.profile = Some(profile);
    }
    if let Some(dir) = first(&["VAWS_OUTPUT_DIR"]) {
        config.output.directory = Some(PathBuf::from(dir));
    }

    config
}

/// 1-based line where `key` is assigned or opened as a table.
fn find_key_line(content: &str, key: &str) -> Option<usize> {
    let header = format!("[{}]", key);
    content
        .lines()
        .position(|line| {
            let line = line.trim();
            line == header
                || line
                    .strip_prefix(key)
                    .is_some_and(|rest| rest.trim_start().starts_with('='))
        })
        .map(|i| i + 1)
}

const KNOWN_KEYS: &[&str] = &[
    "aws",
    "region",
    "profile",
    "output",
    "directory",
    "cluster",
    "master_instance_type",
    "compute_instance_type",
    "max_queue_size",
    "post_install",
];

fn suggest_key(unknown: &str) -> Option<String> {
    KNOWN_KEYS
        .iter()
        .map(|candidate| (candidate, strsim::levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}
