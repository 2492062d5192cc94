//! Configure Image Use Case
//!
//! Turns a simulation source tree into a Packer build directory: a code
//! archive with model specifications pointing at in-image artifact
//! locations, a provisioning script, and the template itself.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::domain::entities::{
    provision_script, ArtifactReference, ImageSpec, InstanceSelection, CODE_ARCHIVE_NAME,
    PROVISION_SCRIPT_NAME,
};
use crate::domain::ports::{InstanceCatalog, ProviderContext};
use crate::domain::services::select_instance;
use crate::error::{VawsError, VawsResult};
use crate::infrastructure::archive::pack_source_tree;
use crate::infrastructure::fs::{atomic_write, copy_tree, is_hdf};
use crate::infrastructure::repositories::FsModelSpecRepository;

/// Options for the configure image operation
#[derive(Debug, Clone)]
pub struct ImageOptions {
    /// Image name, used for the output directory and the AMI name
    pub name: String,
    /// Root of the simulation package
    pub code_root: PathBuf,
    /// Parent directory for `<name>_ami_configuration`
    pub output_root: PathBuf,
    /// Artifacts to ship instead of the ones referenced by model specifications
    pub artifacts: Vec<PathBuf>,
    /// Build instance type; skips automatic selection when set
    pub instance_type: Option<String>,
}

impl ImageOptions {
    pub fn new(name: impl Into<String>, code_root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            code_root: code_root.into(),
            output_root: PathBuf::from("."),
            artifacts: Vec::new(),
            instance_type: None,
        }
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_root.join(format!("{}_ami_configuration", self.name))
    }
}

/// Files produced by a configure image run
#[derive(Debug, Clone)]
pub struct ImageConfiguration {
    pub output_dir: PathBuf,
    /// `<name>_ami.json`
    pub spec_path: PathBuf,
    pub archive_path: PathBuf,
    pub script_path: PathBuf,
    pub artifacts: Vec<ArtifactReference>,
    /// Total artifact size in bytes
    pub payload_bytes: u64,
    /// `None` when no candidate was large enough
    pub instance_type: Option<String>,
}

impl ImageConfiguration {
    pub fn has_instance_type(&self) -> bool {
        self.instance_type.is_some()
    }
}

/// Configure image use case
pub struct ConfigureImageUseCase<C>
where
    C: InstanceCatalog,
{
    catalog: C,
}

impl<C> ConfigureImageUseCase<C>
where
    C: InstanceCatalog,
{
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Build the image configuration directory.
    ///
    /// The source tree is copied to a temporary directory first; the user's
    /// model specifications are never modified.
    pub fn execute(
        &self,
        ctx: &ProviderContext,
        options: &ImageOptions,
    ) -> VawsResult<ImageConfiguration> {
        if !options.code_root.is_dir() {
            return Err(VawsError::DirectoryNotFound {
                path: options.code_root.clone(),
            });
        }

        let output_dir = options.output_dir();
        fs::create_dir_all(&output_dir)?;

        let workspace = tempfile::Builder::new()
            .prefix("vaws_configuration")
            .tempdir()?;
        let working_copy = workspace.path().join("code");
        let copied = copy_tree(&options.code_root, &working_copy, is_hdf)?;
        debug!(files = copied, copy = %working_copy.display(), "copied source tree");

        let scanned = FsModelSpecRepository::new(&working_copy).rewrite_all()?;
        let artifacts = if options.artifacts.is_empty() {
            dedup(scanned)
        } else {
            explicit_artifacts(&options.artifacts)?
        };

        let payload_bytes = payload_size(&artifacts)?;
        let instance_type = match &options.instance_type {
            Some(manual) => {
                debug!(instance_type = %manual, "using requested build instance");
                Some(manual.clone())
            }
            None => match select_instance(&self.catalog, ctx, payload_bytes)? {
                InstanceSelection::Selected(entry) => Some(entry.instance_type),
                InstanceSelection::Unresolved { .. } => None,
            },
        };

        let archive_path = output_dir.join(CODE_ARCHIVE_NAME);
        pack_source_tree(&working_copy, &archive_path)?;

        let script_path = output_dir.join(PROVISION_SCRIPT_NAME);
        atomic_write(&script_path, provision_script(&artifacts).as_bytes())?;
        make_executable(&script_path)?;

        let spec = ImageSpec::new(&options.name, &ctx.region, instance_type.clone(), &artifacts);
        let spec_path = output_dir.join(format!("{}_ami.json", options.name));
        atomic_write(&spec_path, spec.to_json_pretty()?.as_bytes())?;

        info!(
            image = %options.name,
            artifacts = artifacts.len(),
            payload_bytes,
            instance_type = instance_type.as_deref().unwrap_or("<unset>"),
            output = %output_dir.display(),
            "wrote image configuration"
        );

        Ok(ImageConfiguration {
            output_dir,
            spec_path,
            archive_path,
            script_path,
            artifacts,
            payload_bytes,
            instance_type,
        })
    }
}

/// Several model specifications commonly share one artifact; ship it once.
fn dedup(mut artifacts: Vec<ArtifactReference>) -> Vec<ArtifactReference> {
    artifacts.sort();
    artifacts.dedup();
    artifacts
}

fn explicit_artifacts(paths: &[PathBuf]) -> VawsResult<Vec<ArtifactReference>> {
    paths
        .iter()
        .map(|path| {
            let absolute = path
                .canonicalize()
                .map_err(|_| VawsError::ArtifactNotFound { path: path.clone() })?;
            if !absolute.is_file() {
                return Err(VawsError::ArtifactNotFound { path: path.clone() });
            }
            ArtifactReference::from_path(absolute).ok_or_else(|| VawsError::InvalidArtifactPath {
                value: path.display().to_string(),
                file: path.clone(),
            })
        })
        .collect()
}

/// Sum of artifact file sizes.
pub fn payload_size(artifacts: &[ArtifactReference]) -> VawsResult<u64> {
    artifacts.iter().try_fold(0u64, |total, artifact| {
        let meta = fs::metadata(artifact.path()).map_err(|_| VawsError::ArtifactNotFound {
            path: artifact.original_path.clone(),
        })?;
        Ok(total.saturating_add(meta.len()))
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> VawsResult<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> VawsResult<()> {
    Ok(())
}
