//! Domain Layer
//!
//! Pure logic for artifact discovery, instance sizing and security rule
//! idempotency. Provider access goes through the traits in `ports/`.
//!
//! ## Structure
//!
//! - `entities/` - Artifacts, instance catalog, security rules, generated documents
//! - `services/` - Scanner/rewriter, instance selector, rule ensurer
//! - `ports/` - Interface definitions for infrastructure

pub mod entities;
pub mod ports;
pub mod services;
