//! File System Model Specification Repository
//!
//! Finds model specifications (`**/model_specifications/*.yaml`) in a
//! simulation source tree, reads their artifact references, and rewrites them
//! in place for the image.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tracing::{debug, info};

use crate::domain::entities::ArtifactReference;
use crate::domain::services::{extract_artifact, rewrite_artifact_path};
use crate::error::{VawsError, VawsResult};
use crate::infrastructure::fs::atomic_write;

/// Directory name model specifications live in.
pub const MODEL_SPEC_DIR: &str = "model_specifications";

/// Model specification repository rooted at a source tree
pub struct FsModelSpecRepository {
    root: PathBuf,
}

impl FsModelSpecRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All model specification files, sorted by path. Hidden directories are
    /// skipped.
    pub fn discover(&self) -> VawsResult<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(VawsError::DirectoryNotFound {
                path: self.root.clone(),
            });
        }

        let walker = WalkBuilder::new(&self.root)
            .standard_filters(false)
            .hidden(true)
            .build();

        let mut found = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| VawsError::Io(std::io::Error::other(e.to_string())))?;
            if is_model_spec(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();

        debug!(root = %self.root.display(), count = found.len(), "discovered model specifications");
        Ok(found)
    }

    /// Artifact references of every model specification, without modifying anything.
    pub fn scan(&self) -> VawsResult<Vec<ArtifactReference>> {
        self.discover()?
            .iter()
            .map(|path| {
                let content = fs::read_to_string(path)?;
                extract_artifact(&content, path)
            })
            .collect()
    }

    /// Rewrite the artifact path of every model specification to the image
    /// location and return the artifacts as originally referenced.
    ///
    /// All documents are validated before any is written, so one bad file
    /// leaves the tree untouched.
    pub fn rewrite_all(&self) -> VawsResult<Vec<ArtifactReference>> {
        let mut outcomes = Vec::new();
        for path in self.discover()? {
            let content = fs::read_to_string(&path)?;
            let outcome = rewrite_artifact_path(&content, &path)?;
            outcomes.push((path, outcome));
        }

        let mut artifacts = Vec::with_capacity(outcomes.len());
        for (path, outcome) in outcomes {
            if outcome.changed {
                atomic_write(&path, outcome.content.as_bytes())?;
                info!(
                    file = %path.display(),
                    artifact = %outcome.artifact.file_name,
                    "rewrote artifact path"
                );
            }
            artifacts.push(outcome.artifact);
        }
        Ok(artifacts)
    }
}

fn is_model_spec(path: &Path) -> bool {
    let is_yaml = path.extension().and_then(|e| e.to_str()) == Some("yaml");
    let in_spec_dir = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        == Some(MODEL_SPEC_DIR);
    is_yaml && in_spec_dir && path.is_file()
}
