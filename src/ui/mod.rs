//! Terminal output helpers

pub mod json;
pub mod output;
