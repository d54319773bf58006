//! Specialized collection types

pub use slotmap::{new_key_type, SlotMap};

/// Handle-based map using slot maps for stable, generational references
///
/// Pools and asset stores keep their storage here; the rest of the engine
/// holds keys, never references, so compaction and reuse can never dangle.
pub type HandleMap<K, T> = SlotMap<K, T>;
