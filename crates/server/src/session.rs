// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! Every route takes a [`SessionCaller`]. Requests without an
//! `Authorization` header are anonymous; requests with one must carry a
//! live `Bearer` token.

use axum::{extract::FromRequestParts, http::request::Parts};
use folio_api::{Caller, resolve_caller};
use tracing::{debug, warn};

use crate::AppState;
use crate::error::HttpError;

/// The resolved caller and the token it presented, if any.
///
/// # Errors
///
/// Rejects with HTTP 401 if:
/// - the `Authorization` header is not valid ASCII
/// - it does not use the `Bearer` scheme
/// - the token is unknown or expired
pub struct SessionCaller {
    /// Who is calling.
    pub caller: Caller,
    /// The bearer token, needed to end the session.
    pub token: Option<String>,
}

impl FromRequestParts<AppState> for SessionCaller {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(header) = parts.headers.get("Authorization") else {
            return Ok(Self {
                caller: Caller::Anonymous,
                token: None,
            });
        };

        let header: &str = header.to_str().map_err(|_| {
            warn!("Invalid Authorization header encoding");
            HttpError::unauthenticated("Invalid Authorization header encoding")
        })?;

        let token: &str = header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header does not start with 'Bearer '");
            HttpError::unauthenticated(
                "Invalid Authorization header format. Expected: 'Bearer <token>'",
            )
        })?;

        let mut persistence = state.persistence.lock().await;
        let caller: Caller = resolve_caller(&mut persistence, Some(token)).map_err(|e| {
            warn!(error = %e, "Session validation failed");
            HttpError::from(e)
        })?;

        if let Some(actor) = caller.actor() {
            debug!(
                username = %actor.username,
                role = %actor.role,
                "Session validated"
            );
        }

        Ok(Self {
            caller,
            token: Some(token.to_string()),
        })
    }
}
