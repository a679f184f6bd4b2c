use std::fmt;

/// How a dispatched request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CacheStatus {
    /// Served from the store without contacting the origin.
    Hit,
    /// No usable entry; the origin answered.
    #[default]
    Miss,
    /// A stored entry was confirmed by a `304 Not Modified`.
    Revalidated,
    /// The request is not eligible for caching at all.
    Bypass,
}

impl CacheStatus {
    /// Returns the status as a string slice.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "hit",
            CacheStatus::Miss => "miss",
            CacheStatus::Revalidated => "revalidated",
            CacheStatus::Bypass => "bypass",
        }
    }

    /// Returns `true` if the response body came from the store.
    pub const fn is_from_cache(&self) -> bool {
        matches!(self, CacheStatus::Hit | CacheStatus::Revalidated)
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
