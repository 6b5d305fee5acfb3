// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use folio_domain::{Page, Profile, validate_account};
use folio_persistence::{NewUser, SqlitePersistence, UserData};
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService, Caller, Role};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::password_policy::PasswordPolicy;
use crate::request_response::{
    CreateUserRequest, CreateUserResponse, ExportLevel, ListUsersResponse, ProfileView,
    UserView, WhoAmIResponse,
};

const RESOURCE: &str = "User";

/// Creates a user account and its empty profile.
///
/// While no account exists anyone may call this, and the account created
/// is an admin whatever role was requested. After that only admins may
/// create accounts.
///
/// # Errors
///
/// Returns an error if the caller may not create accounts, a field or the
/// password is invalid, or the username or email is taken.
pub fn create_user(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    request: CreateUserRequest,
) -> Result<CreateUserResponse, ApiError> {
    let existing_users: i64 = persistence
        .count_users()
        .map_err(|e| translate_persistence_error(e, RESOURCE))?;

    let role: Role = if existing_users == 0 {
        info!(username = %request.username, "Bootstrapping first account as admin");
        Role::Admin
    } else {
        AuthorizationService::require_admin(caller, "create_user")?;
        request
            .role
            .as_deref()
            .map_or(Ok(Role::Member), str::parse::<Role>)?
    };

    validate_account(&request.username, &request.email, &request.display_name)
        .map_err(translate_domain_error)?;
    PasswordPolicy::default().validate(
        &request.password,
        &request.password_confirmation,
        &[
            ("username", request.username.as_str()),
            ("email", request.email.as_str()),
            ("display_name", request.display_name.as_str()),
        ],
    )?;

    let (user, profile): (UserData, Profile) = persistence
        .create_user(NewUser {
            username: &request.username,
            email: &request.email,
            display_name: &request.display_name,
            password: &request.password,
            role: role.as_str(),
        })
        .map_err(|e| translate_persistence_error(e, RESOURCE))?;

    Ok(CreateUserResponse {
        user: UserView::export(&user)?,
        profile: ProfileView::export(&profile, ExportLevel::Private)?,
    })
}

/// Describes the signed-in account.
///
/// # Errors
///
/// Returns an error if the caller has no session.
pub fn whoami(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
) -> Result<WhoAmIResponse, ApiError> {
    let actor: &AuthenticatedActor = AuthorizationService::require_authenticated(caller, "whoami")?;

    let user: UserData = persistence
        .get_user_by_id(actor.user_id)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from(RESOURCE),
            message: format!("User {} no longer exists", actor.user_id),
        })?;
    let profile: Profile = persistence
        .get_profile_by_user(actor.user_id)
        .map_err(|e| translate_persistence_error(e, "Profile"))?;

    Ok(WhoAmIResponse {
        user: UserView::export(&user)?,
        profile: ProfileView::export(&profile, ExportLevel::for_privilege(caller.privilege()))?,
    })
}

/// Lists accounts by username. Admin only.
///
/// # Errors
///
/// Returns an error if the caller is not an admin or the query fails.
pub fn list_users(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    page: Page,
) -> Result<ListUsersResponse, ApiError> {
    AuthorizationService::require_admin(caller, "list_users")?;

    let users: Vec<UserView> = persistence
        .list_users(page)
        .map_err(|e| translate_persistence_error(e, RESOURCE))?
        .iter()
        .map(UserView::export)
        .collect::<Result<_, _>>()?;

    Ok(ListUsersResponse { users })
}
