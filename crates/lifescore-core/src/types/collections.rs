//! FxHash-based collections (fast, non-cryptographic hashing).

pub use rustc_hash::{FxHashMap, FxHashSet};
