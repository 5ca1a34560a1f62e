//! Unopinionated standalone utilities.

mod flags;
pub use flags::{FlagLookup, FlagTable};

mod grid;
pub use grid::Grid;

mod idm;
pub use idm::directory_to_idm;

mod rect;
pub use rect::Rect;

mod text;
pub use text::StrExt;

/// Map with an efficient hash function.
pub use rustc_hash::FxHashMap as HashMap;

type DefaultHashBuilder = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;

/// Insertion order preserving map with an efficient hash function.
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, DefaultHashBuilder>;
