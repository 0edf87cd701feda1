#![forbid(unsafe_code)]

use std::path::Path;

use crate::zap::error::{ZapError, ZapResult};

/// Normalizes a user-supplied path argument: forward slashes only, no
/// trailing slash or glob star.
pub fn clean_path(path: &str) -> String {
    let mut out = path.replace('\\', "/");
    while out.ends_with('*') || out.ends_with('/') {
        out.pop();
    }
    out
}

/// Virtual path for a file found under a walked directory: the directory's
/// own name followed by the file's path relative to it, forward-slashed.
pub fn walked_path(root: &Path, file_path: &Path) -> ZapResult<String> {
    let rel = file_path
        .strip_prefix(root)
        .map_err(|_| ZapError::Outside(file_path.to_string_lossy().into_owned()))?;

    let mut out = String::new();
    if let Some(name) = root.file_name() {
        out.push_str(&name.to_string_lossy());
    }
    for comp in rel.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&comp.as_os_str().to_string_lossy());
    }
    let out = out.replace('\\', "/");

    if out.is_empty() {
        return Err(ZapError::Invalid("empty relative path".into()));
    }
    Ok(out)
}

/// True when joining the virtual path under an output directory cannot
/// escape it.
pub fn is_extraction_safe(virtual_path: &str) -> bool {
    !virtual_path.is_empty()
        && !virtual_path.starts_with('/')
        && !virtual_path.split('/').any(|c| c == "..")
}
