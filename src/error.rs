//! Error types for vaws
//!
//! Uses `thiserror` for library errors. Variants are grouped by how the
//! failure should be handled by the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for vaws operations
pub type VawsResult<T> = Result<T, VawsError>;

/// Main error type for vaws operations
#[derive(Error, Debug)]
pub enum VawsError {
    // --- missing prerequisites: fail before touching the provider ---
    /// Required external command is not installed
    #[error("the command `{command}` must be installed on your machine; please consult the vaws requirements")]
    MissingCommand { command: String },

    /// No region could be resolved from flags, environment or config
    #[error("no AWS region configured; pass --region, set AWS_REGION, or add `region` under [aws] in vaws.toml")]
    RegionUnset,

    /// Image spec was generated without an instance type
    #[error("no instance type set in {file}; choose one manually and set `instance_type` in the amazon-ebs builder")]
    InstanceTypeUnset { file: PathBuf },

    /// Provider client could not find usable credentials
    #[error("AWS credentials are missing or invalid: {message}")]
    Credentials { message: String },

    // --- provider rejected a request ---
    /// The provider returned an error for a request
    #[error("AWS {operation} failed: {message}")]
    Provider {
        operation: String,
        code: Option<String>,
        message: String,
    },

    /// Provider response could not be understood
    #[error("unexpected response from AWS {operation}: {message}")]
    ProviderResponse { operation: String, message: String },

    // --- not found ---
    /// A cloud resource the operation depends on does not exist
    #[error("{resource} not found: {detail}")]
    ResourceNotFound { resource: String, detail: String },

    /// Artifact file referenced by a model specification is missing
    #[error("artifact not found: {path}")]
    ArtifactNotFound { path: PathBuf },

    /// Directory not found
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    // --- document errors ---
    /// Model specification is not valid YAML
    #[error("invalid model specification {file}: {message}")]
    InvalidModelSpec { file: PathBuf, message: String },

    /// Model specification has no artifact path
    #[error("missing required field '{field}' in {file}")]
    MissingField { field: String, file: PathBuf },

    /// Artifact path has no file name component
    #[error("artifact path '{value}' in {file} does not name a file")]
    InvalidArtifactPath { value: String, file: PathBuf },

    /// Artifact path is relative; the build cannot tell what it is relative to
    #[error("artifact path '{value}' in {file} must be absolute")]
    RelativeArtifactPath { value: String, file: PathBuf },

    /// Config file could not be parsed
    #[error("invalid config {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Generated or user-supplied document is malformed
    #[error("invalid {kind} {file}: {message}")]
    InvalidDocument {
        kind: &'static str,
        file: PathBuf,
        message: String,
    },

    // --- external tools ---
    /// External tool exited unsuccessfully
    #[error("{command} exited with {status}")]
    CommandFailed { command: String, status: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VawsError {
    /// True when the error means a prerequisite was missing before any work began.
    pub fn is_missing_prerequisite(&self) -> bool {
        matches!(
            self,
            VawsError::MissingCommand { .. }
                | VawsError::RegionUnset
                | VawsError::InstanceTypeUnset { .. }
                | VawsError::Credentials { .. }
        )
    }

    /// True when a named resource (cloud or local) does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            VawsError::ResourceNotFound { .. }
                | VawsError::ArtifactNotFound { .. }
                | VawsError::DirectoryNotFound { .. }
        )
    }

    pub(crate) fn not_found(resource: impl Into<String>, detail: impl Into<String>) -> Self {
        VawsError::ResourceNotFound {
            resource: resource.into(),
            detail: detail.into(),
        }
    }
}
