//! Preview artifact cache
//!
//! Path-derived cache keys and the flat on-disk store they index.
//!
//! # Layout
//!
//! | File | Producer |
//! |------|----------|
//! | `<key>.jpeg` | JPEG preview |
//! | `<key>.pdf` | PDF preview (also the office-to-JPEG intermediate) |
//! | `<key>.txt` | Text preview |
//! | `<key>.html` | HTML preview |
//! | `<key>.json` | JSON metadata preview |
//!
//! Artifacts are never mutated in place and never evicted here; a forced
//! rebuild replaces the file wholesale.

pub mod key;
pub mod lock;
pub mod store;

pub use key::{derive_cache_key, strip_extension};
pub use lock::KeyLocks;
pub use store::{artifact_path, format_bytes, publish_atomically, CacheInventory, CacheStore};
