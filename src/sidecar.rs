//! Naming convention for AppleDouble sidecars: `._name` beside `name`.
//!
//! Older producers used `%name` and `R.name`; these are not recognised.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const SIDECAR_PREFIX: &str = "._";

/// Path of the sidecar for a data file. `None` if the path has no file name.
pub fn sidecar_path(data_path: &Path) -> Option<PathBuf> {
    let name = data_path.file_name()?;
    let mut sidecar_name = OsString::from(SIDECAR_PREFIX);
    sidecar_name.push(name);
    Some(data_path.with_file_name(sidecar_name))
}

/// Whether a path names a sidecar, going by its file name alone.
pub fn is_sidecar(path: &Path) -> bool {
    path.file_name()
        .map(|name| {
            let name = name.as_encoded_bytes();
            name.len() > SIDECAR_PREFIX.len() && name.starts_with(SIDECAR_PREFIX.as_bytes())
        })
        .unwrap_or(false)
}

/// Path of the data file a sidecar describes. Only UTF-8 names are handled.
pub fn data_path(sidecar_path: &Path) -> Option<PathBuf> {
    let name = sidecar_path.file_name()?.to_str()?;
    let data_name = name.strip_prefix(SIDECAR_PREFIX).filter(|n| !n.is_empty())?;
    Some(sidecar_path.with_file_name(data_name))
}
