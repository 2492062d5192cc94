//! Artifact reference entity
//!
//! An artifact is an external data file a simulation needs at run time. It
//! lives outside the source tree while the image is built and is copied into
//! a fixed directory inside the image.

use std::path::{Path, PathBuf};

/// Directory inside the machine image where artifacts are installed.
pub const IMAGE_ARTIFACT_DIR: &str = "/usr/local/share/vivarium/artifacts";

/// A data file referenced by a model specification.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtifactReference {
    /// Path as written in the source document (or passed on the command line)
    pub original_path: PathBuf,
    /// Base name of the file
    pub file_name: String,
}

impl ArtifactReference {
    /// Build a reference from a path. Returns `None` if the path has no file name.
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let original_path = path.into();
        let file_name = original_path.file_name()?.to_str()?.to_string();
        Some(Self {
            original_path,
            file_name,
        })
    }

    /// Location of the artifact inside the built image.
    pub fn image_path(&self) -> String {
        format!("{}/{}", IMAGE_ARTIFACT_DIR, self.file_name)
    }

    /// Staging location used while the image is being provisioned.
    pub fn staging_path(&self) -> String {
        format!("/tmp/{}", self.file_name)
    }

    pub fn path(&self) -> &Path {
        &self.original_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_path_takes_base_name() {
        let artifact = ArtifactReference::from_path("/data/x/input.hdf").unwrap();
        assert_eq!(artifact.file_name, "input.hdf");
        assert_eq!(
            artifact.image_path(),
            "/usr/local/share/vivarium/artifacts/input.hdf"
        );
        assert_eq!(artifact.staging_path(), "/tmp/input.hdf");
    }

    #[test]
    fn from_path_rejects_directory_like_paths() {
        assert!(ArtifactReference::from_path("/").is_none());
        assert!(ArtifactReference::from_path("..").is_none());
    }
}
