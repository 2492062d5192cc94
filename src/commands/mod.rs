//! Command handlers
//!
//! Each handler resolves configuration into use case options, runs the use
//! case, and renders the result as text or NDJSON.

pub mod configure;
pub mod make;
