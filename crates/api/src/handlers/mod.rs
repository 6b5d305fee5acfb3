// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request handlers.
//!
//! Every handler takes the persistence adapter, the [`Caller`] and its
//! request, and returns an exported view or an [`ApiError`]. Handlers pick
//! the read path from the caller's privilege: admins read with the
//! unrestricted `get_any_*` lookups, everyone else with the active-only
//! lookups.

mod educations;
mod experiences;
mod organizations;
mod profiles;
mod sessions;
mod users;

pub use educations::{
    create_education, delete_education, get_education, list_educations, update_education,
};
pub use experiences::{
    create_experience, delete_experience, get_experience, list_experiences, update_experience,
};
pub use organizations::{
    create_organization, delete_organization, get_organization, list_organizations,
    update_organization,
};
pub use profiles::{get_featured_profile, get_profile, set_featured, update_profile};
pub use sessions::{login, logout, resolve_caller};
pub use users::{create_user, list_users, whoami};

use folio_domain::Organization;
use folio_persistence::{PersistenceError, SqlitePersistence};

use crate::auth::Caller;
use crate::error::{ApiError, translate_persistence_error};

/// Loads the organization a dependent record is about to point at.
///
/// The lookup uses the caller's own visibility, so a parent the caller
/// cannot see is treated as missing.
///
/// # Errors
///
/// Returns [`ApiError::InvalidInput`] on `organization_id` if the parent is
/// missing.
fn fetch_parent_organization(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    organization_id: i64,
) -> Result<Organization, ApiError> {
    let result: Result<Organization, PersistenceError> = if caller.privilege().is_admin() {
        persistence.get_any_organization_by_id(organization_id)
    } else {
        persistence.get_organization_by_id(organization_id)
    };

    result.map_err(|e| match e {
        PersistenceError::NotFound(_) => ApiError::InvalidInput {
            field: String::from("organization_id"),
            message: format!("Organization {organization_id} does not exist"),
        },
        other => translate_persistence_error(other, "Organization"),
    })
}
