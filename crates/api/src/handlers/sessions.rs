// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use folio_persistence::{SessionData, SqlitePersistence, UserData};
use time::Duration;
use time::format_description::well_known::Rfc3339;
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Caller};
use crate::error::ApiError;
use crate::request_response::{LoginRequest, LoginResponse, UserView};

/// Logs in with a username and password.
///
/// # Errors
///
/// Returns [`ApiError::AuthenticationFailed`] if the credentials are wrong.
pub fn login(
    persistence: &mut SqlitePersistence,
    request: &LoginRequest,
    session_duration: Duration,
) -> Result<LoginResponse, ApiError> {
    let (session, _actor, user): (SessionData, AuthenticatedActor, UserData) =
        AuthenticationService::login(
            persistence,
            &request.username,
            &request.password,
            session_duration,
        )?;

    let expires_at: String = session
        .expires_at
        .format(&Rfc3339)
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format expiration time: {e}"),
        })?;

    Ok(LoginResponse {
        session_token: session.session_token,
        expires_at,
        user: UserView::export(&user)?,
    })
}

/// Ends the caller's session.
///
/// # Errors
///
/// Returns an error if the caller has no session.
pub fn logout(
    persistence: &mut SqlitePersistence,
    caller: &Caller,
    session_token: &str,
) -> Result<(), ApiError> {
    let actor: &AuthenticatedActor = AuthorizationService::require_authenticated(caller, "logout")?;

    AuthenticationService::logout(persistence, session_token)?;
    info!(user_id = actor.user_id, "User logged out");
    Ok(())
}

/// Resolves an optional bearer token to a caller.
///
/// No token means an anonymous caller. A token that does not name a live
/// session is an error rather than a silent downgrade.
///
/// # Errors
///
/// Returns [`ApiError::AuthenticationFailed`] if the token is unknown or
/// expired.
pub fn resolve_caller(
    persistence: &mut SqlitePersistence,
    session_token: Option<&str>,
) -> Result<Caller, ApiError> {
    let Some(token) = session_token else {
        return Ok(Caller::Anonymous);
    };
    let (actor, _user): (AuthenticatedActor, UserData) =
        AuthenticationService::validate_session(persistence, token)?;
    Ok(Caller::Authenticated(actor))
}
