//! Cache key derivation
//!
//! Maps a source path and rendering parameters to a stable file base name.
//! The hash covers the path string, not the file contents: the same path
//! always lands on the same artifact.

use crate::preview::ImgDims;
use md5::{Digest, Md5};
use tracing::debug;

/// Separator between key components
const KEY_SEPARATOR: &str = "-";

/// Drop the last `.`-delimited segment of a path string.
///
/// `a.b.tar.gz` becomes `a.b.tar`; a string without any `.` is returned
/// unchanged. The split is purely textual, so a dot in a directory name
/// counts too.
pub fn strip_extension(path: &str) -> &str {
    match path.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => path,
    }
}

/// Last path segment of an already extension-stripped path
fn base_name(stripped: &str) -> &str {
    stripped.rsplit(['/', '\\']).next().unwrap_or(stripped)
}

/// Lowercase hex MD5 digest (32 chars) of the UTF-8 bytes of `value`
fn path_digest(value: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(value.as_bytes());
    hex::encode(hasher.finalize())
}

/// Derive the cache key for a preview artifact.
///
/// Components, joined with `-`:
/// 1. the base name of the extension-stripped path, if `use_original_filename`
/// 2. `{width}x{height}` if `size` is given
/// 3. the MD5 hex digest of the extension-stripped path
/// 4. `page{N}` if `page` is given
///
/// An empty `source_path` yields the digest of the empty string.
pub fn derive_cache_key(
    source_path: &str,
    size: Option<ImgDims>,
    page: Option<u32>,
    use_original_filename: bool,
) -> String {
    let stripped = strip_extension(source_path);

    let mut components: Vec<String> = Vec::with_capacity(4);
    if use_original_filename {
        components.push(base_name(stripped).to_string());
    }
    if let Some(size) = size {
        components.push(format!("{}x{}", size.width, size.height));
    }
    components.push(path_digest(stripped));
    if let Some(page) = page {
        components.push(format!("page{}", page));
    }

    let key = components.join(KEY_SEPARATOR);
    debug!("Derived cache key {} for {}", key, source_path);
    key
}
