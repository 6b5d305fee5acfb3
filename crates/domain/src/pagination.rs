// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Offset/limit window for list reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    offset: i64,
    limit: i64,
}

impl Page {
    /// Limit used when the caller supplies none.
    pub const DEFAULT_LIMIT: i64 = 20;
    /// Largest limit a caller may request.
    pub const MAX_LIMIT: i64 = 100;

    /// Builds a page, clamping the offset to `0..` and the limit to
    /// `1..=MAX_LIMIT`.
    #[must_use]
    pub fn new(offset: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            offset: offset.unwrap_or(0).max(0),
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
        }
    }

    /// Rows to skip.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// Rows to return at most.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}
