//! Make Use Cases
//!
//! Hand generated configurations to the external build tools. Both tools run
//! in the foreground and own the terminal until they exit.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::info;

use crate::domain::entities::{ImageSpec, IniDocument};
use crate::error::{VawsError, VawsResult};
use crate::infrastructure::process::{ensure_command_exists, run_interruptible, Interrupt, RunOutcome};

pub const PACKER: &str = "packer";
pub const PCLUSTER: &str = "pcluster";

/// Build the image described by the template at `spec`.
///
/// `packer` runs in the template's directory so the relative provisioner
/// sources (`code.tar.gz`, the provisioning script) resolve.
pub fn make_image(spec: &Path, interrupt: &Interrupt) -> VawsResult<RunOutcome> {
    let program = ensure_command_exists(PACKER)?;
    let (dir, file_name) = split_path(spec)?;

    let content = fs::read_to_string(spec)?;
    let template: serde_json::Value =
        serde_json::from_str(&content).map_err(|e| VawsError::InvalidDocument {
            kind: "image specification",
            file: spec.to_path_buf(),
            message: e.to_string(),
        })?;
    if ImageSpec::has_unset_instance_type(&template) {
        return Err(VawsError::InstanceTypeUnset {
            file: spec.to_path_buf(),
        });
    }

    info!(spec = %spec.display(), "building image");
    let mut cmd = Command::new(program);
    cmd.arg("build").arg(file_name).current_dir(dir);
    finish(PACKER, run_interruptible(&mut cmd, interrupt)?)
}

/// Create the cluster described by the configuration at `config`.
pub fn make_cluster(config: &Path, interrupt: &Interrupt) -> VawsResult<RunOutcome> {
    let program = ensure_command_exists(PCLUSTER)?;
    let name = cluster_name(config)?;

    info!(cluster = %name, config = %config.display(), "creating cluster");
    let mut cmd = Command::new(program);
    cmd.arg("create").arg("-c").arg(config).arg(&name);
    finish(PCLUSTER, run_interruptible(&mut cmd, interrupt)?)
}

/// Cluster name from the `[global] cluster_template` key.
pub fn cluster_name(config: &Path) -> VawsResult<String> {
    let content = fs::read_to_string(config)?;
    let doc = IniDocument::parse(&content).map_err(|line| VawsError::InvalidDocument {
        kind: "cluster configuration",
        file: config.to_path_buf(),
        message: format!("malformed line {}", line),
    })?;
    doc.get("global", "cluster_template")
        .map(str::to_string)
        .ok_or_else(|| VawsError::MissingField {
            field: "global.cluster_template".to_string(),
            file: config.to_path_buf(),
        })
}

fn split_path(spec: &Path) -> VawsResult<(PathBuf, &std::ffi::OsStr)> {
    let file_name = spec.file_name().ok_or_else(|| VawsError::InvalidDocument {
        kind: "image specification",
        file: spec.to_path_buf(),
        message: "path does not name a file".to_string(),
    })?;
    let dir = match spec.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, file_name))
}

/// A failed build is an error unless the user asked it to stop.
fn finish(command: &str, outcome: RunOutcome) -> VawsResult<RunOutcome> {
    match outcome {
        RunOutcome::Completed(status) if !status.success() => Err(VawsError::CommandFailed {
            command: command.to_string(),
            status: status.to_string(),
        }),
        other => Ok(other),
    }
}
