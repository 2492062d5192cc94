//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `aws_cli` - Provider ports over the `aws` command line client
//! - `repositories/` - Model specifications in a source tree
//! - `archive` - Code archive for the image
//! - `process` - External tools and interrupt forwarding

pub mod archive;
pub mod aws_cli;
pub mod fs;
pub mod process;
pub mod repositories;

// Re-export for convenience
pub use aws_cli::AwsCli;
pub use process::{ensure_command_exists, run_interruptible, Interrupt, RunOutcome};
pub use repositories::FsModelSpecRepository;
