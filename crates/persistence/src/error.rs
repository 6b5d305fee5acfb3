// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::DatabaseErrorKind;
use thiserror::Error;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// Database connection failed.
    #[error("Database connection failed: {0}")]
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),
    /// A stored value could not be converted to or from its domain type.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Initialization error.
    #[error("Initialization error: {0}")]
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    #[error("Foreign key enforcement is not enabled")]
    ForeignKeyEnforcementNotEnabled,
    /// The requested record was not found, or is hidden from the caller.
    #[error("Not found: {0}")]
    NotFound(String),
    /// A unique constraint rejected the write.
    ///
    /// `constraint` carries the database's description, e.g.
    /// `UNIQUE constraint failed: users.username`.
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },
    /// A foreign key constraint rejected the write.
    #[error("Foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
    /// The organization still owns experience or education entries.
    #[error(
        "Organization {organization_id} cannot be deleted: referenced by {dependents} entries"
    )]
    OrganizationReferenced {
        organization_id: i64,
        dependents: i64,
    },
    /// The profile already holds the featured flag.
    #[error("Profile {profile_id} is already featured")]
    AlreadyFeatured { profile_id: i64 },
    /// The featured swap failed and was rolled back.
    #[error("Transaction failed and was rolled back: {0}")]
    TransactionFailed(String),
    /// A general error occurred.
    #[error("{0}")]
    Other(String),
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            diesel::result::Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                Self::UniqueViolation {
                    constraint: info.message().to_string(),
                }
            }
            diesel::result::Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                Self::ForeignKeyViolation(info.message().to_string())
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}
