//! Local file system helpers
//!
//! Atomic writes, tree copies with exclusions, and config directory
//! resolution with test isolation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use tempfile::NamedTempFile;
use tracing::trace;

use crate::error::{VawsError, VawsResult};

/// Environment variable overriding the user config directory (test isolation).
pub const VAWS_TEST_CONFIG_DIR_VAR: &str = "VAWS_TEST_CONFIG_DIR";

/// Directory holding the user-level `config.toml`.
///
/// `VAWS_TEST_CONFIG_DIR` wins over the platform config directory so tests
/// never read the developer's real configuration.
pub fn vaws_config_dir() -> Option<PathBuf> {
    std::env::var(VAWS_TEST_CONFIG_DIR_VAR)
        .ok()
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|d| d.join("vaws")))
}

/// Write `content` to `path` via a temp file in the same directory and a rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> VawsResult<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| VawsError::Io(e.error))?;
    Ok(())
}

/// Recursively copy `src` into `dst`, skipping files for which `exclude`
/// returns true. Hidden files and VCS directories are copied too.
///
/// Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path, exclude: impl Fn(&Path) -> bool) -> VawsResult<usize> {
    if !src.is_dir() {
        return Err(VawsError::DirectoryNotFound {
            path: src.to_path_buf(),
        });
    }
    fs::create_dir_all(dst)?;

    let mut copied = 0;
    let walker = WalkBuilder::new(src)
        .standard_filters(false)
        .follow_links(false)
        .build();

    for entry in walker {
        let entry = entry.map_err(|e| VawsError::Io(std::io::Error::other(e.to_string())))?;
        let path = entry.path();
        let relative = match path.strip_prefix(src) {
            Ok(r) if !r.as_os_str().is_empty() => r,
            _ => continue,
        };
        let target = dst.join(relative);

        if path.is_dir() {
            fs::create_dir_all(&target)?;
        } else if path.is_file() {
            if exclude(path) {
                trace!(path = %path.display(), "skipping excluded file");
                continue;
            }
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// True for HDF data files, which are artifacts rather than code.
pub fn is_hdf(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("hdf") | Some("h5")
    )
}
