//! Repository Implementations
//!
//! Concrete implementations over the local file system.

mod model_spec;

pub use model_spec::{FsModelSpecRepository, MODEL_SPEC_DIR};
