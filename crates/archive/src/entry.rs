//! Entry name resolution.
//!
//! Tar entry names are untrusted input. They are resolved against the output
//! root component by component so that no entry can escape it.

use crate::error::{ErrorKind, Result};
use std::path::{Component, Path, PathBuf};

/// Resolves a raw entry name to a path relative to the output root.
///
/// - `.` components and repeated separators are dropped.
/// - A leading `/` is stripped, the way GNU tar does on extraction.
/// - `..` is allowed only while it stays inside the root.
/// - Windows drive prefixes are rejected outright.
///
/// An empty result (e.g. the entry `./`) means the output root itself.
pub(crate) fn resolve(raw: &Path) -> Result<PathBuf> {
    let mut components = Vec::new();
    for component in raw.components() {
        match component {
            Component::Normal(s) => components.push(s),
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidEntry(raw.to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidEntry(raw.to_path_buf()));
                }
            },
        }
    }
    Ok(components.into_iter().collect())
}
