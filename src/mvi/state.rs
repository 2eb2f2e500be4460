//! Base trait for store state.

/// Marker trait for state objects held by a store.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (everything an observer needs to render)
/// - Comparable (PartialEq for detecting changes)
pub trait State: Clone + PartialEq + Default + Send + Sync + 'static {}
