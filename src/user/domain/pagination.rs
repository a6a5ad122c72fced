//! Page selection for user listings.

/// A validated page window over the user listing.
///
/// Out-of-range input falls back to defaults rather than failing: a page
/// below one becomes the first page, a page past `u32::MAX` is clamped to
/// it, and a limit outside `1..=100` becomes [`Pagination::DEFAULT_LIMIT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    /// Page size used when none (or an out-of-range one) is requested.
    pub const DEFAULT_LIMIT: u32 = 10;
    /// Largest accepted page size.
    pub const MAX_LIMIT: u32 = 100;

    /// Builds a page window from optional raw query values.
    #[must_use]
    pub fn from_query(page: Option<i64>, limit: Option<i64>) -> Self {
        let page_number = page
            .filter(|value| *value >= 1)
            .map_or(1, |value| u32::try_from(value).unwrap_or(u32::MAX));
        let page_size = limit
            .and_then(|value| u32::try_from(value).ok())
            .filter(|value| (1..=Self::MAX_LIMIT).contains(value))
            .unwrap_or(Self::DEFAULT_LIMIT);
        Self {
            page: page_number,
            limit: page_size,
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    /// Maximum number of users on the page.
    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Number of users skipped before the page starts.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::from_query(None, None)
    }
}
