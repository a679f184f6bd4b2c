//! Builder for configuring [`LruBackend`].

use smol_str::SmolStr;

use crate::backend::LruBackend;

/// Marker type: capacity has not been configured yet.
///
/// This is the initial state of a [`LruBackendBuilder`]. You must call
/// [`max_entries()`](LruBackendBuilder::max_entries) before calling `build()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapacity;

/// Marker type: entry-count capacity has been configured.
#[derive(Debug, Clone, Copy)]
pub struct EntryCapacity(pub(crate) usize);

/// Builder for creating and configuring a [`LruBackend`].
///
/// Use [`LruBackend::builder`] to create a new builder instance. Capacity is
/// tracked in the builder's type, so `build()` only exists once
/// [`max_entries`](Self::max_entries) has been called.
///
/// ```
/// use stashbox_lru::LruBackend;
///
/// let backend = LruBackend::builder()
///     .label("responses")
///     .max_entries(1_000)
///     .build();
/// assert_eq!(backend.capacity(), 1_000);
/// ```
#[derive(Debug, Clone)]
pub struct LruBackendBuilder<Cap> {
    capacity: Cap,
    label: SmolStr,
}

impl LruBackendBuilder<NoCapacity> {
    /// Creates a new builder with no capacity configured.
    pub fn new() -> Self {
        Self {
            capacity: NoCapacity,
            label: SmolStr::new_static("lru"),
        }
    }

    /// Sets the maximum number of entries the store can hold.
    ///
    /// Once the store holds `capacity` entries, every new key evicts the least
    /// recently used one. `0` means no limit.
    pub fn max_entries(self, capacity: usize) -> LruBackendBuilder<EntryCapacity> {
        LruBackendBuilder {
            capacity: EntryCapacity(capacity),
            label: self.label,
        }
    }
}

impl Default for LruBackendBuilder<NoCapacity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Cap> LruBackendBuilder<Cap> {
    /// Sets a custom label for this store.
    ///
    /// The label appears in logs and debug output.
    ///
    /// # Default
    ///
    /// `"lru"`
    pub fn label(mut self, label: impl Into<SmolStr>) -> Self {
        self.label = label.into();
        self
    }
}

impl LruBackendBuilder<EntryCapacity> {
    /// Builds the store.
    pub fn build(self) -> LruBackend {
        LruBackend::from_parts(self.capacity.0, self.label)
    }
}
