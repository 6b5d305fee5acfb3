// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain records and rules for the Folio profile backend.
//!
//! Everything in this crate is pure: no I/O, no clock reads outside
//! [`timestamp_now`], no database types.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod pagination;
mod patch;
mod state;
mod types;
mod validation;
mod visibility;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use pagination::Page;
pub use patch::{EducationPatch, ExperiencePatch, OrganizationPatch, ProfilePatch};
pub use state::RecordState;
pub use types::{
    Dependent, Education, Experience, Organization, Profile, SoftDeletable, timestamp_now,
};
pub use validation::{
    MAX_YEAR, MIN_YEAR, validate_account, validate_education, validate_experience,
    validate_organization, validate_profile, validate_website,
};
pub use visibility::{
    Combinator, Predicate, PredicateSet, Privilege, StateFilter, VisibilityPolicy,
};
