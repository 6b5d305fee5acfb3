// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use folio_domain::DomainError;
use folio_persistence::PersistenceError;
use thiserror::Error;

use crate::password_policy::PasswordPolicyError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

/// API-level errors.
///
/// These are distinct from domain and persistence errors and represent the
/// API contract. The server maps each variant to one HTTP status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No valid session was presented.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller is signed in but lacks the required role.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found, or is hidden from the caller.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request conflicts with the current state.
    #[error("Conflict on field '{field}': {message}")]
    Conflict {
        /// The field whose value conflicts.
        field: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
    /// Password policy violation.
    #[error("Password policy violation: {message}")]
    PasswordPolicyViolation {
        /// A human-readable description of the policy violation.
        message: String,
    },
}

impl ApiError {
    /// The field this error names, if any.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { field, .. } | Self::Conflict { field, .. } => Some(field),
            Self::PasswordPolicyViolation { .. } => Some("password"),
            Self::AuthenticationFailed { .. }
            | Self::Unauthorized { .. }
            | Self::ResourceNotFound { .. }
            | Self::Internal { .. } => None,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

impl From<PasswordPolicyError> for ApiError {
    fn from(err: PasswordPolicyError) -> Self {
        Self::PasswordPolicyViolation {
            message: err.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// Every domain error is a validation failure and names its field.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: err.field().to_string(),
        message: err.to_string(),
    }
}

/// Maps a unique constraint description to the request field it guards.
///
/// SQLite reports `UNIQUE constraint failed: <table>.<column>`.
fn conflicting_field(constraint: &str) -> String {
    if constraint.contains("profiles.is_featured") {
        return String::from("featured_user");
    }
    constraint
        .rsplit(['.', ' '])
        .next()
        .filter(|column| !column.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

/// Translates a persistence error into an API error.
///
/// `resource_type` names what was being read or written and is only used
/// in not-found messages.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError, resource_type: &str) -> ApiError {
    match err {
        PersistenceError::NotFound(_) => ApiError::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message: format!("The requested {} does not exist", resource_type.to_lowercase()),
        },
        PersistenceError::UniqueViolation { constraint } => {
            let field: String = conflicting_field(&constraint);
            ApiError::Conflict {
                message: format!("Another record already uses this {field}"),
                field,
            }
        }
        PersistenceError::AlreadyFeatured { profile_id } => ApiError::Conflict {
            field: String::from("featured_user"),
            message: format!("Profile {profile_id} is already the featured profile"),
        },
        PersistenceError::OrganizationReferenced {
            organization_id,
            dependents,
        } => ApiError::Conflict {
            field: String::from("organization_id"),
            message: format!(
                "Organization {organization_id} is still referenced by {dependents} entries"
            ),
        },
        PersistenceError::ForeignKeyViolation(message) => ApiError::InvalidInput {
            field: String::from("organization_id"),
            message,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
