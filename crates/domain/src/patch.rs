// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Partial updates.
//!
//! A patch names only the fields a caller sent. `None` leaves a field
//! untouched. For nullable fields the inner option distinguishes "clear"
//! (`Some(None)`) from "set" (`Some(Some(v))`).
//!
//! Merging is pure: it never validates and never touches `updated_at`.
//! Validation runs on the merged record, since whether one field is valid
//! can depend on another field that was left untouched.

use time::{Date, OffsetDateTime};

use crate::types::{Education, Experience, Organization, Profile};

/// Applies a trash toggle to a deletion timestamp.
///
/// Trashing an already trashed record keeps the original timestamp.
const fn toggle_trash(
    current: Option<OffsetDateTime>,
    in_trash: Option<bool>,
    now: OffsetDateTime,
) -> Option<OffsetDateTime> {
    match in_trash {
        None => current,
        Some(false) => None,
        Some(true) => match current {
            Some(deleted_at) => Some(deleted_at),
            None => Some(now),
        },
    }
}

/// Chooses the patched value when one was supplied.
fn pick<T: Clone>(patched: Option<&T>, current: &T) -> T {
    patched.map_or_else(|| current.clone(), Clone::clone)
}

/// Field patch for an organization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrganizationPatch {
    /// New name.
    pub name: Option<String>,
    /// New or cleared website.
    pub website: Option<Option<String>>,
    /// New or cleared location.
    pub location: Option<Option<String>>,
    /// Move to (`true`) or restore from (`false`) the trash.
    pub in_trash: Option<bool>,
}

impl OrganizationPatch {
    /// Merges this patch over an existing organization.
    #[must_use]
    pub fn merge(&self, existing: &Organization, now: OffsetDateTime) -> Organization {
        Organization {
            organization_id: existing.organization_id,
            name: pick(self.name.as_ref(), &existing.name),
            website: pick(self.website.as_ref(), &existing.website),
            location: pick(self.location.as_ref(), &existing.location),
            created_at: existing.created_at,
            updated_at: existing.updated_at,
            deleted_at: toggle_trash(existing.deleted_at, self.in_trash, now),
        }
    }
}

/// Field patch for an experience entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExperiencePatch {
    /// Re-parent to another organization.
    pub organization_id: Option<i64>,
    /// New title.
    pub title: Option<String>,
    /// New or cleared description.
    pub description: Option<Option<String>>,
    /// New or cleared location.
    pub location: Option<Option<String>>,
    /// New start date.
    pub start_date: Option<Date>,
    /// New or cleared end date.
    pub end_date: Option<Option<Date>>,
    /// Move to (`true`) or restore from (`false`) the trash.
    pub in_trash: Option<bool>,
}

impl ExperiencePatch {
    /// Merges this patch over an existing experience entry.
    #[must_use]
    pub fn merge(&self, existing: &Experience, now: OffsetDateTime) -> Experience {
        Experience {
            experience_id: existing.experience_id,
            organization_id: self.organization_id.unwrap_or(existing.organization_id),
            title: pick(self.title.as_ref(), &existing.title),
            description: pick(self.description.as_ref(), &existing.description),
            location: pick(self.location.as_ref(), &existing.location),
            start_date: self.start_date.unwrap_or(existing.start_date),
            end_date: self.end_date.unwrap_or(existing.end_date),
            created_at: existing.created_at,
            updated_at: existing.updated_at,
            deleted_at: toggle_trash(existing.deleted_at, self.in_trash, now),
        }
    }
}

/// Field patch for an education entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EducationPatch {
    /// Re-parent to another organization.
    pub organization_id: Option<i64>,
    /// New degree.
    pub degree: Option<String>,
    /// New or cleared field of study.
    pub field_of_study: Option<Option<String>>,
    /// New or cleared GPA.
    pub gpa: Option<Option<String>>,
    /// New or cleared activities.
    pub activities: Option<Option<String>>,
    /// New start year.
    pub start_year: Option<i32>,
    /// New or cleared end year.
    pub end_year: Option<Option<i32>>,
    /// Move to (`true`) or restore from (`false`) the trash.
    pub in_trash: Option<bool>,
}

impl EducationPatch {
    /// Merges this patch over an existing education entry.
    #[must_use]
    pub fn merge(&self, existing: &Education, now: OffsetDateTime) -> Education {
        Education {
            education_id: existing.education_id,
            organization_id: self.organization_id.unwrap_or(existing.organization_id),
            degree: pick(self.degree.as_ref(), &existing.degree),
            field_of_study: pick(self.field_of_study.as_ref(), &existing.field_of_study),
            gpa: pick(self.gpa.as_ref(), &existing.gpa),
            activities: pick(self.activities.as_ref(), &existing.activities),
            start_year: self.start_year.unwrap_or(existing.start_year),
            end_year: self.end_year.unwrap_or(existing.end_year),
            created_at: existing.created_at,
            updated_at: existing.updated_at,
            deleted_at: toggle_trash(existing.deleted_at, self.in_trash, now),
        }
    }
}

/// Field patch for a profile. The featured flag is not patchable; it only
/// changes through the featured swap.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfilePatch {
    /// New or cleared headline.
    pub headline: Option<Option<String>>,
    /// New or cleared biography.
    pub bio: Option<Option<String>>,
    /// New or cleared location.
    pub location: Option<Option<String>>,
}

impl ProfilePatch {
    /// Merges this patch over an existing profile.
    #[must_use]
    pub fn merge(&self, existing: &Profile) -> Profile {
        Profile {
            headline: pick(self.headline.as_ref(), &existing.headline),
            bio: pick(self.bio.as_ref(), &existing.bio),
            location: pick(self.location.as_ref(), &existing.location),
            ..existing.clone()
        }
    }
}
