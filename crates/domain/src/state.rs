// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Derived visibility state of a dependent record.
///
/// The two flags are independent: a record can be trashed and orphaned at
/// the same time. Neither flag is ever stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordState {
    /// The record's own `deleted_at` is set.
    pub trashed: bool,
    /// The parent organization's `deleted_at` is set.
    pub orphaned: bool,
}

impl RecordState {
    /// Derives the state from the two deletion flags.
    #[must_use]
    pub const fn derive(own_deleted: bool, parent_deleted: bool) -> Self {
        Self {
            trashed: own_deleted,
            orphaned: parent_deleted,
        }
    }

    /// Neither the record nor its parent is deleted.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !self.trashed && !self.orphaned
    }
}
