// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::{Date, OffsetDateTime};

use crate::state::RecordState;

/// Returns the current UTC time truncated to whole seconds.
///
/// Stored timestamps are compared for equality after a round trip through
/// the database, so sub-second precision is dropped up front.
#[must_use]
pub fn timestamp_now() -> OffsetDateTime {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    now.replace_nanosecond(0).unwrap_or(now)
}

/// Records that carry a soft-delete timestamp.
pub trait SoftDeletable {
    /// The moment the record was moved to the trash, if it was.
    fn deleted_at(&self) -> Option<OffsetDateTime>;

    /// Whether the record itself is trashed.
    fn is_trashed(&self) -> bool {
        self.deleted_at().is_some()
    }
}

/// An organization: employer, school or any other body that owns
/// experience and education entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    /// Canonical identifier.
    pub organization_id: i64,
    /// Display name.
    pub name: String,
    /// Homepage URL.
    pub website: Option<String>,
    /// Free-form location (city, country).
    pub location: Option<String>,
    /// Creation time.
    pub created_at: OffsetDateTime,
    /// Last modification time.
    pub updated_at: OffsetDateTime,
    /// Soft-delete time.
    pub deleted_at: Option<OffsetDateTime>,
}

impl SoftDeletable for Organization {
    fn deleted_at(&self) -> Option<OffsetDateTime> {
        self.deleted_at
    }
}

/// A work experience entry held at an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experience {
    /// Canonical identifier.
    pub experience_id: i64,
    /// The owning organization.
    pub organization_id: i64,
    /// Job title.
    pub title: String,
    /// What the role involved.
    pub description: Option<String>,
    /// Where the role was held, when it differs from the organization.
    pub location: Option<String>,
    /// First day in the role.
    pub start_date: Date,
    /// Last day in the role; `None` while ongoing.
    pub end_date: Option<Date>,
    /// Creation time.
    pub created_at: OffsetDateTime,
    /// Last modification time.
    pub updated_at: OffsetDateTime,
    /// Soft-delete time.
    pub deleted_at: Option<OffsetDateTime>,
}

impl SoftDeletable for Experience {
    fn deleted_at(&self) -> Option<OffsetDateTime> {
        self.deleted_at
    }
}

/// An education entry completed (or in progress) at an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Education {
    /// Canonical identifier.
    pub education_id: i64,
    /// The owning organization.
    pub organization_id: i64,
    /// Degree or certificate name.
    pub degree: String,
    /// Major or field of study.
    pub field_of_study: Option<String>,
    /// Grade point average as written on the transcript (e.g. `3.8/4.0`).
    pub gpa: Option<String>,
    /// Societies, clubs and similar.
    pub activities: Option<String>,
    /// First academic year.
    pub start_year: i32,
    /// Graduation year; `None` while ongoing.
    pub end_year: Option<i32>,
    /// Creation time.
    pub created_at: OffsetDateTime,
    /// Last modification time.
    pub updated_at: OffsetDateTime,
    /// Soft-delete time.
    pub deleted_at: Option<OffsetDateTime>,
}

impl SoftDeletable for Education {
    fn deleted_at(&self) -> Option<OffsetDateTime> {
        self.deleted_at
    }
}

/// A dependent record read together with its parent organization.
///
/// The organization is held as an explicit field rather than flattened
/// into the record so each level keeps its own export rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependent<T> {
    /// The dependent record.
    pub record: T,
    /// The organization that owns it.
    pub organization: Organization,
}

impl<T: SoftDeletable> Dependent<T> {
    /// Derives the visibility state from both deletion timestamps.
    #[must_use]
    pub fn state(&self) -> RecordState {
        RecordState::derive(self.record.is_trashed(), self.organization.is_trashed())
    }
}

/// A user's public profile.
///
/// `username` and `display_name` are read from the owning account and are
/// never written through the profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Canonical identifier.
    pub profile_id: i64,
    /// The owning user account.
    pub user_id: i64,
    /// The owner's login name.
    pub username: String,
    /// The owner's display name.
    pub display_name: String,
    /// One-line summary.
    pub headline: Option<String>,
    /// Longer biography.
    pub bio: Option<String>,
    /// Free-form location.
    pub location: Option<String>,
    /// Featured flag. `None` means the profile was never considered,
    /// `Some(false)` means it was explicitly downgraded.
    pub is_featured: Option<bool>,
    /// Creation time.
    pub created_at: OffsetDateTime,
    /// Last modification time.
    pub updated_at: OffsetDateTime,
}

impl Profile {
    /// Whether this profile currently holds the featured flag.
    #[must_use]
    pub const fn is_featured(&self) -> bool {
        matches!(self.is_featured, Some(true))
    }
}
