//! Artifact path extraction and rewriting for model specifications
//!
//! A model specification is YAML with the artifact location at
//! `configuration.input_data.artifact_path`. The rewrite points that field
//! at the in-image artifact directory and leaves every other line untouched,
//! including comments and key order, which a YAML round-trip would lose.

use std::path::Path;

use serde_yaml_ng::Value;

use crate::domain::entities::ArtifactReference;
use crate::error::{VawsError, VawsResult};

/// Key path of the artifact field inside a model specification.
pub const ARTIFACT_FIELD: [&str; 3] = ["configuration", "input_data", "artifact_path"];

/// Result of rewriting one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOutcome {
    /// Artifact as referenced before the rewrite
    pub artifact: ArtifactReference,
    /// Document with the artifact field rewritten
    pub content: String,
    /// False when the field already pointed at the image location
    pub changed: bool,
}

/// Extract the artifact referenced by a model specification.
pub fn extract_artifact(content: &str, file: &Path) -> VawsResult<ArtifactReference> {
    let doc: Value = serde_yaml_ng::from_str(content).map_err(|e| VawsError::InvalidModelSpec {
        file: file.to_path_buf(),
        message: format_yaml_error(&e),
    })?;

    let mut node = &doc;
    for key in ARTIFACT_FIELD {
        node = node.get(key).ok_or_else(|| missing_field(file))?;
    }

    let value = match node {
        Value::String(s) => s.as_str(),
        Value::Null => return Err(missing_field(file)),
        other => {
            return Err(VawsError::InvalidArtifactPath {
                value: format!("{:?}", other),
                file: file.to_path_buf(),
            })
        }
    };

    // Sizing and packer would resolve a relative path against different directories
    if !Path::new(value).is_absolute() {
        return Err(VawsError::RelativeArtifactPath {
            value: value.to_string(),
            file: file.to_path_buf(),
        });
    }

    ArtifactReference::from_path(value).ok_or_else(|| VawsError::InvalidArtifactPath {
        value: value.to_string(),
        file: file.to_path_buf(),
    })
}

/// Rewrite the artifact field of a model specification to the image location.
pub fn rewrite_artifact_path(content: &str, file: &Path) -> VawsResult<RewriteOutcome> {
    let artifact = extract_artifact(content, file)?;
    let target = artifact.image_path();

    let mut out = String::with_capacity(content.len() + target.len());
    let mut stack: Vec<(usize, String)> = Vec::new();
    let mut found = false;
    let mut changed = false;

    for raw in content.split_inclusive('\n') {
        let (body, ending) = split_line_ending(raw);

        if !found {
            if let Some((indent, key, value_start)) = mapping_key(body) {
                while stack.last().is_some_and(|(i, _)| *i >= indent) {
                    stack.pop();
                }
                stack.push((indent, key));

                if stack.iter().map(|(_, k)| k.as_str()).eq(ARTIFACT_FIELD) {
                    found = true;
                    let rewritten = rewrite_value(body, value_start, &target, file)?;
                    changed = rewritten != body;
                    out.push_str(&rewritten);
                    out.push_str(ending);
                    continue;
                }
            }
        }

        out.push_str(body);
        out.push_str(ending);
    }

    if !found {
        return Err(VawsError::InvalidModelSpec {
            file: file.to_path_buf(),
            message: format!(
                "'{}' must be written in block style, one key per line",
                ARTIFACT_FIELD.join(".")
            ),
        });
    }

    // A value continued on following lines would leave the tail behind.
    let written = extract_artifact(&out, file)?;
    if written.original_path != Path::new(&target) {
        return Err(VawsError::InvalidModelSpec {
            file: file.to_path_buf(),
            message: format!("'{}' must be a single-line scalar", ARTIFACT_FIELD.join(".")),
        });
    }

    Ok(RewriteOutcome {
        artifact,
        content: out,
        changed,
    })
}

fn missing_field(file: &Path) -> VawsError {
    VawsError::MissingField {
        field: ARTIFACT_FIELD.join("."),
        file: file.to_path_buf(),
    }
}

fn split_line_ending(raw: &str) -> (&str, &str) {
    if let Some(body) = raw.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = raw.strip_suffix('\n') {
        (body, "\n")
    } else {
        (raw, "")
    }
}

/// Recognize a block mapping key line: returns (indent, key, byte offset of
/// the value after the colon).
fn mapping_key(line: &str) -> Option<(usize, String, usize)> {
    let trimmed = line.trim_start_matches(' ');
    let indent = line.len() - trimmed.len();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('-') {
        return None;
    }

    let (key, rest_offset) = if let Some(quote) = trimmed.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let close = trimmed[1..].find(quote)? + 1;
        (&trimmed[1..close], close + 1)
    } else {
        let colon = key_colon(trimmed)?;
        (trimmed[..colon].trim_end(), colon)
    };

    let after = &trimmed[rest_offset..];
    let after_colon = after.strip_prefix(':')?;
    if !(after_colon.is_empty() || after_colon.starts_with(' ') || after_colon.starts_with('\t')) {
        return None;
    }

    Some((indent, key.to_string(), indent + rest_offset + 1))
}

/// Offset of the colon that ends a plain key (`: ` or a trailing `:`).
fn key_colon(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'#' && i > 0 && bytes[i - 1] == b' ' {
            return None;
        }
        if *b == b':' && (i + 1 == bytes.len() || bytes[i + 1] == b' ' || bytes[i + 1] == b'\t') {
            return Some(i);
        }
    }
    None
}

fn rewrite_value(line: &str, value_start: usize, target: &str, file: &Path) -> VawsResult<String> {
    let head = &line[..value_start];
    let value = &line[value_start..];
    let value_trimmed = value.trim_start();

    if value_trimmed.is_empty() || value_trimmed.starts_with('#') {
        return Err(VawsError::InvalidModelSpec {
            file: file.to_path_buf(),
            message: format!("'{}' must be a single-line scalar", ARTIFACT_FIELD.join(".")),
        });
    }
    if value_trimmed.starts_with('|') || value_trimmed.starts_with('>') {
        return Err(VawsError::InvalidModelSpec {
            file: file.to_path_buf(),
            message: format!(
                "'{}' must not be a block scalar",
                ARTIFACT_FIELD.join(".")
            ),
        });
    }

    let comment = trailing_comment(value_trimmed).unwrap_or("");
    Ok(format!("{}: {}{}", head.trim_end_matches(':'), yaml_scalar(target), comment))
}

/// Trailing ` # comment` of a scalar value, including the leading whitespace.
fn trailing_comment(value: &str) -> Option<&str> {
    let search_from = match value.chars().next() {
        Some(q @ ('"' | '\'')) => value[1..].find(q).map(|i| i + 2)?,
        _ => 0,
    };
    let rel = value[search_from..]
        .char_indices()
        .find(|(i, c)| {
            *c == '#' && value[search_from..][..*i].ends_with([' ', '\t'])
        })
        .map(|(i, _)| i)?;
    let hash = search_from + rel;
    let start = value[..hash].trim_end_matches([' ', '\t']).len();
    Some(&value[start..])
}

/// Write `s` as a plain scalar when that is unambiguous, otherwise quoted.
fn yaml_scalar(s: &str) -> String {
    let needs_quotes = s.is_empty()
        || s.contains(": ")
        || s.contains(" #")
        || s.ends_with(':')
        || s.starts_with([
            '!', '&', '*', '{', '}', '[', ']', ',', '#', '|', '>', '@', '`', '"', '\'', '%', '?',
            '-', ' ',
        ])
        || s.ends_with(' ');
    if needs_quotes {
        serde_json::to_string(s).unwrap_or_else(|_| format!("\"{}\"", s))
    } else {
        s.to_string()
    }
}

fn format_yaml_error(err: &serde_yaml_ng::Error) -> String {
    match err.location() {
        Some(loc) => format!("line {}: invalid YAML - {}", loc.line(), err),
        None => format!("invalid YAML - {}", err),
    }
}
