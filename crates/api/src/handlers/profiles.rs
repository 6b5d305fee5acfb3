// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use folio_domain::{Profile, ProfilePatch, validate_profile};
use folio_persistence::SqlitePersistence;
use tracing::{debug, info};

use crate::auth::{AuthenticatedActor, AuthorizationService, Caller};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{ExportLevel, PatchProfileRequest, ProfileView, SetFeaturedResponse};

const RESOURCE: &str = "Profile";

/// Reads one profile.
///
/// # Errors
///
/// Returns [`ApiError::ResourceNotFound`] if it does not exist.
pub fn get_profile(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    profile_id: i64,
) -> Result<ProfileView, ApiError> {
    let profile: Profile = persistence
        .get_profile(profile_id)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?;
    ProfileView::export(&profile, ExportLevel::for_privilege(caller.privilege()))
}

/// Reads the featured profile.
///
/// # Errors
///
/// Returns [`ApiError::ResourceNotFound`] if no profile is featured.
pub fn get_featured_profile(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
) -> Result<ProfileView, ApiError> {
    let profile: Profile = persistence
        .get_featured_profile()
        .map_err(|e| translate_persistence_error(e, RESOURCE))?;
    ProfileView::export(&profile, ExportLevel::for_privilege(caller.privilege()))
}

/// Applies a partial update to a profile. The owner or an admin only.
///
/// # Errors
///
/// Returns an error if the caller may not edit the profile, it does not
/// exist, or the merged profile is invalid.
pub fn update_profile(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    profile_id: i64,
    request: PatchProfileRequest,
) -> Result<ProfileView, ApiError> {
    let actor: &AuthenticatedActor =
        AuthorizationService::require_authenticated(caller, "update_profile")?;

    let existing: Profile = persistence
        .get_profile(profile_id)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?;
    AuthorizationService::authorize_profile_edit(actor, &existing)?;

    let patch: ProfilePatch = request.into();
    let merged: Profile = patch.merge(&existing);
    validate_profile(&merged).map_err(translate_domain_error)?;

    let level: ExportLevel = ExportLevel::for_privilege(caller.privilege());
    if merged == existing {
        debug!(profile_id, "Patch leaves profile unchanged");
        return ProfileView::export(&existing, level);
    }

    let updated: Profile = persistence
        .update_profile(&merged)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?;
    info!(profile_id, user_id = actor.user_id, "Profile patched");

    ProfileView::export(&updated, level)
}

/// Makes `profile_id` the featured profile, un-featuring the previous
/// holder in the same transaction. Admin only.
///
/// # Errors
///
/// - [`ApiError::ResourceNotFound`] if the profile does not exist.
/// - [`ApiError::Conflict`] on `featured_user` if it is already featured,
///   or a concurrent writer featured another profile first.
/// - [`ApiError::Internal`] if the swap was rolled back.
pub fn set_featured(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    profile_id: i64,
) -> Result<SetFeaturedResponse, ApiError> {
    AuthorizationService::require_admin(caller, "set_featured")?;

    let changed: Vec<ProfileView> = persistence
        .set_featured(profile_id)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?
        .iter()
        .map(|profile| ProfileView::export(profile, ExportLevel::Admin))
        .collect::<Result<_, _>>()?;

    Ok(SetFeaturedResponse { changed })
}
