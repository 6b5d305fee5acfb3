// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roles, callers, authorization checks and session authentication.

use std::fmt;
use std::str::FromStr;

use folio_domain::{Privilege, Profile, timestamp_now};
use folio_persistence::{Persistence, PersistenceError, SessionData, SqlitePersistence, UserData};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::{ApiError, AuthError};

/// Account roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// May create, edit, trash and delete every record, and see trashed
    /// and orphaned ones.
    Admin,
    /// May edit their own profile. Otherwise sees what anonymous callers
    /// see.
    Member,
}

impl Role {
    /// The stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Member => "Member",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Self::Admin),
            "Member" => Ok(Self::Member),
            other => Err(ApiError::InvalidInput {
                field: String::from("role"),
                message: format!("'{other}' is not one of 'Admin', 'Member'"),
            }),
        }
    }
}

/// A user who presented a valid session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The account's ID.
    pub user_id: i64,
    /// The account's username.
    pub username: String,
    /// The account's role.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(user_id: i64, username: String, role: Role) -> Self {
        Self {
            user_id,
            username,
            role,
        }
    }

    /// Builds an actor from a stored account.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored role is not recognised.
    pub fn from_user(user: &UserData) -> Result<Self, AuthError> {
        let role: Role = user
            .role
            .parse()
            .map_err(|_| AuthError::AuthenticationFailed {
                reason: format!("Invalid role: {}", user.role),
            })?;
        Ok(Self::new(user.user_id, user.username.clone(), role))
    }

    /// Whether the actor is an administrator.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Whoever sent the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    /// No session was presented.
    Anonymous,
    /// A valid session was presented.
    Authenticated(AuthenticatedActor),
}

impl Caller {
    /// The visibility privilege of this caller.
    #[must_use]
    pub const fn privilege(&self) -> Privilege {
        match self {
            Self::Anonymous => Privilege::Anonymous,
            Self::Authenticated(actor) if actor.is_admin() => Privilege::Admin,
            Self::Authenticated(_) => Privilege::Authenticated,
        }
    }

    /// The signed-in actor, if any.
    #[must_use]
    pub const fn actor(&self) -> Option<&AuthenticatedActor> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(actor) => Some(actor),
        }
    }
}

/// Authorization checks.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Requires a signed-in caller.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AuthenticationFailed`] for anonymous callers.
    pub fn require_authenticated<'a>(
        caller: &'a Caller,
        action: &str,
    ) -> Result<&'a AuthenticatedActor, AuthError> {
        caller
            .actor()
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: format!("'{action}' requires a session"),
            })
    }

    /// Requires a signed-in administrator.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::AuthenticationFailed`] for anonymous callers and
    /// [`AuthError::Unauthorized`] for members.
    pub fn require_admin<'a>(
        caller: &'a Caller,
        action: &str,
    ) -> Result<&'a AuthenticatedActor, AuthError> {
        let actor: &AuthenticatedActor = Self::require_authenticated(caller, action)?;
        match actor.role {
            Role::Admin => Ok(actor),
            Role::Member => Err(AuthError::Unauthorized {
                action: action.to_string(),
                required_role: Role::Admin.to_string(),
            }),
        }
    }

    /// Checks that `actor` may edit `profile`: the owner or any admin.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthorized`] otherwise.
    pub fn authorize_profile_edit(
        actor: &AuthenticatedActor,
        profile: &Profile,
    ) -> Result<(), AuthError> {
        if actor.is_admin() || actor.user_id == profile.user_id {
            return Ok(());
        }
        Err(AuthError::Unauthorized {
            action: String::from("update_profile"),
            required_role: Role::Admin.to_string(),
        })
    }
}

/// Password login and session handling.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Session lifetime used when none is configured.
    pub const DEFAULT_SESSION_DURATION: Duration = Duration::days(30);

    /// Verifies credentials and opens a session lasting `session_duration`.
    ///
    /// Unknown usernames and wrong passwords fail with the same reason.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are wrong or the session cannot
    /// be stored.
    pub fn login(
        persistence: &mut SqlitePersistence,
        username: &str,
        password: &str,
        session_duration: Duration,
    ) -> Result<(SessionData, AuthenticatedActor, UserData), AuthError> {
        let rejected = || AuthError::AuthenticationFailed {
            reason: String::from("Invalid username or password"),
        };

        let Some(user) = persistence
            .get_user_by_username(username)
            .map_err(Self::map_persistence_error)?
        else {
            debug!(username, "Login for unknown user");
            return Err(rejected());
        };

        let verified: bool = Persistence::verify_password(password, &user.password_hash)
            .map_err(Self::map_persistence_error)?;
        if !verified {
            warn!(user_id = user.user_id, "Login with wrong password");
            return Err(rejected());
        }

        let actor: AuthenticatedActor = AuthenticatedActor::from_user(&user)?;

        let session_token: String = Self::generate_session_token();
        let expires_at: OffsetDateTime = timestamp_now() + session_duration;
        let session: SessionData = persistence
            .create_session(&session_token, user.user_id, expires_at)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to create session: {e}"),
            })?;

        persistence
            .update_last_login(user.user_id)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to update last login: {e}"),
            })?;

        info!(user_id = user.user_id, role = %actor.role, "User logged in");
        Ok((session, actor, user))
    }

    /// Resolves a session token to its actor and refreshes its activity.
    ///
    /// Expired sessions are removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is unknown or expired, or its account
    /// is gone.
    pub fn validate_session(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<(AuthenticatedActor, UserData), AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        if timestamp_now() >= session.expires_at {
            debug!(session_id = session.session_id, "Removing expired session");
            persistence
                .delete_session(session_token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let user: UserData = persistence
            .get_user_by_id(session.user_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("User not found"),
            })?;
        let actor: AuthenticatedActor = AuthenticatedActor::from_user(&user)?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok((actor, user))
    }

    /// Ends a session. Returns whether the token named a live session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(
        persistence: &mut SqlitePersistence,
        session_token: &str,
    ) -> Result<bool, AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })
    }

    /// Generates an opaque session token from 256 random bits.
    fn generate_session_token() -> String {
        format!(
            "session_{:032x}{:032x}",
            rand::random::<u128>(),
            rand::random::<u128>()
        )
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::AuthenticationFailed {
            reason: format!("Database error: {err}"),
        }
    }
}
