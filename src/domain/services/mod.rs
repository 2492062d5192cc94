//! Domain Services
//!
//! Stateless logic over domain entities. Provider access is through ports.

mod artifact_rewriter;
mod instance_selector;
mod rule_ensurer;

pub use artifact_rewriter::{extract_artifact, rewrite_artifact_path, RewriteOutcome, ARTIFACT_FIELD};
pub use instance_selector::{
    select_from, select_instance, BASE_IMAGE_OVERHEAD_BYTES, GENERAL_PURPOSE_INSTANCE_TYPES,
};
pub use rule_ensurer::ensure_security_rule;
