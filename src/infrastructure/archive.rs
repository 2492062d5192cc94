//! Source tree packaging
//!
//! Packs the simulation package into a gzip-compressed tar archive for the
//! image, leaving out artifact data and git metadata.

use std::fs::File;
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use ignore::WalkBuilder;
use tracing::debug;

use crate::error::{VawsError, VawsResult};
use crate::infrastructure::fs::is_hdf;

/// Top-level directory of the code inside the archive.
pub const ARCHIVE_ROOT: &str = "simulation_code";

/// Create `archive` as a `.tar.gz` of `source`, rooted at [`ARCHIVE_ROOT`].
///
/// Returns the number of files added.
pub fn pack_source_tree(source: &Path, archive: &Path) -> VawsResult<usize> {
    if !source.is_dir() {
        return Err(VawsError::DirectoryNotFound {
            path: source.to_path_buf(),
        });
    }

    let file = File::create(archive)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.follow_symlinks(false);
    builder.append_dir(ARCHIVE_ROOT, source)?;

    let walker = WalkBuilder::new(source)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| entry.file_name() != ".git")
        .build();

    let mut files = 0;
    for entry in walker {
        let entry = entry.map_err(|e| VawsError::Io(std::io::Error::other(e.to_string())))?;
        let path = entry.path();
        let relative = match path.strip_prefix(source) {
            Ok(r) if !r.as_os_str().is_empty() => r,
            _ => continue,
        };
        let name: PathBuf = Path::new(ARCHIVE_ROOT).join(relative);

        let file_type = match entry.file_type() {
            Some(ft) => ft,
            None => continue,
        };
        if file_type.is_dir() {
            builder.append_dir(&name, path)?;
        } else if is_hdf(path) {
            continue;
        } else {
            builder.append_path_with_name(path, &name)?;
            files += 1;
        }
    }

    let encoder = builder.into_inner()?;
    encoder.finish()?;

    debug!(archive = %archive.display(), files, "packed source tree");
    Ok(files)
}
