// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Folio profile backend.
//!
//! Built on Diesel over `SQLite`. The schema is migrated on startup from the
//! embedded `migrations/` directory and foreign key enforcement is verified
//! before the adapter is handed out.
//!
//! ## Read modes
//!
//! Dependent records (experience and education entries) are always read
//! together with their organization. Each has two single-record reads:
//!
//! - `get_*_by_id` admits the record only when neither it nor its
//!   organization is trashed.
//! - `get_any_*_by_id` matches on the primary key alone. Mutation paths and
//!   admin reads use this one.
//!
//! Both report [`PersistenceError::NotFound`] for a missing row and for a
//! row that was filtered out, without distinguishing the two.
//!
//! ## Testing
//!
//! Every call to [`Persistence::new_in_memory`] opens its own named
//! in-memory database, so tests never share state.

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
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use folio_domain::{
    Dependent, Education, Experience, Organization, Page, PredicateSet, Profile,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{NewUser, SessionData, UserData};
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Type alias kept for call sites that name the backend explicitly.
pub type SqlitePersistence = Persistence;

/// Persistence adapter owning a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
    hash_cost: u32,
}

impl Persistence {
    /// Creates a persistence adapter backed by a fresh in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_folio_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn,
            hash_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Creates a persistence adapter backed by a database file, creating
    /// the file when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn,
            hash_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Overrides the bcrypt cost used when hashing new passwords.
    ///
    /// Tests lower this to keep account creation fast.
    #[must_use]
    pub const fn with_hash_cost(mut self, hash_cost: u32) -> Self {
        self.hash_cost = hash_cost;
        self
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Organizations
    // ========================================================================

    /// Inserts an organization built from `draft`.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_organization(
        &mut self,
        draft: &Organization,
    ) -> Result<Organization, PersistenceError> {
        mutations::organizations::create_organization(&mut self.conn, draft)
    }

    /// Retrieves an organization that is not trashed.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if it is absent or trashed.
    pub fn get_organization_by_id(
        &mut self,
        organization_id: i64,
    ) -> Result<Organization, PersistenceError> {
        queries::organizations::get_organization(
            &mut self.conn,
            organization_id,
            &PredicateSet::untrashed_only(),
        )
    }

    /// Retrieves an organization whatever its state.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if it is absent.
    pub fn get_any_organization_by_id(
        &mut self,
        organization_id: i64,
    ) -> Result<Organization, PersistenceError> {
        queries::organizations::get_organization(
            &mut self.conn,
            organization_id,
            &PredicateSet::unrestricted(),
        )
    }

    /// Lists organizations admitted by `predicates`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_organizations(
        &mut self,
        predicates: &PredicateSet,
        page: Page,
    ) -> Result<Vec<Organization>, PersistenceError> {
        queries::organizations::list_organizations(&mut self.conn, predicates, page)
    }

    /// Overwrites an organization's mutable columns.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if it is absent.
    pub fn update_organization(
        &mut self,
        organization: &Organization,
    ) -> Result<Organization, PersistenceError> {
        mutations::organizations::update_organization(&mut self.conn, organization)
    }

    /// Permanently deletes an unreferenced organization.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::OrganizationReferenced`] while entries
    /// reference it, or [`PersistenceError::NotFound`] if it is absent.
    pub fn delete_organization(&mut self, organization_id: i64) -> Result<(), PersistenceError> {
        mutations::organizations::delete_organization(&mut self.conn, organization_id)
    }

    // ========================================================================
    // Experiences
    // ========================================================================

    /// Inserts an experience entry built from `draft`.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_experience(
        &mut self,
        draft: &Experience,
    ) -> Result<Dependent<Experience>, PersistenceError> {
        mutations::experiences::create_experience(&mut self.conn, draft)
    }

    /// Retrieves an active experience entry.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if it is absent, trashed or
    /// orphaned.
    pub fn get_experience_by_id(
        &mut self,
        experience_id: i64,
    ) -> Result<Dependent<Experience>, PersistenceError> {
        queries::experiences::get_experience(
            &mut self.conn,
            experience_id,
            &PredicateSet::active_only(),
        )
    }

    /// Retrieves an experience entry whatever its state.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if it is absent.
    pub fn get_any_experience_by_id(
        &mut self,
        experience_id: i64,
    ) -> Result<Dependent<Experience>, PersistenceError> {
        queries::experiences::get_experience(
            &mut self.conn,
            experience_id,
            &PredicateSet::unrestricted(),
        )
    }

    /// Lists experience entries admitted by `predicates`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_experiences(
        &mut self,
        predicates: &PredicateSet,
        page: Page,
    ) -> Result<Vec<Dependent<Experience>>, PersistenceError> {
        queries::experiences::list_experiences(&mut self.conn, predicates, page)
    }

    /// Overwrites an experience entry's mutable columns.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if it is absent.
    pub fn update_experience(
        &mut self,
        experience: &Experience,
    ) -> Result<Dependent<Experience>, PersistenceError> {
        mutations::experiences::update_experience(&mut self.conn, experience)
    }

    /// Permanently deletes an experience entry.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if it is absent.
    pub fn delete_experience(&mut self, experience_id: i64) -> Result<(), PersistenceError> {
        mutations::experiences::delete_experience(&mut self.conn, experience_id)
    }

    // ========================================================================
    // Educations
    // ========================================================================

    /// Inserts an education entry built from `draft`.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_education(
        &mut self,
        draft: &Education,
    ) -> Result<Dependent<Education>, PersistenceError> {
        mutations::educations::create_education(&mut self.conn, draft)
    }

    /// Retrieves an active education entry.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if it is absent, trashed or
    /// orphaned.
    pub fn get_education_by_id(
        &mut self,
        education_id: i64,
    ) -> Result<Dependent<Education>, PersistenceError> {
        queries::educations::get_education(
            &mut self.conn,
            education_id,
            &PredicateSet::active_only(),
        )
    }

    /// Retrieves an education entry whatever its state.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if it is absent.
    pub fn get_any_education_by_id(
        &mut self,
        education_id: i64,
    ) -> Result<Dependent<Education>, PersistenceError> {
        queries::educations::get_education(
            &mut self.conn,
            education_id,
            &PredicateSet::unrestricted(),
        )
    }

    /// Lists education entries admitted by `predicates`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_educations(
        &mut self,
        predicates: &PredicateSet,
        page: Page,
    ) -> Result<Vec<Dependent<Education>>, PersistenceError> {
        queries::educations::list_educations(&mut self.conn, predicates, page)
    }

    /// Overwrites an education entry's mutable columns.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if it is absent.
    pub fn update_education(
        &mut self,
        education: &Education,
    ) -> Result<Dependent<Education>, PersistenceError> {
        mutations::educations::update_education(&mut self.conn, education)
    }

    /// Permanently deletes an education entry.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if it is absent.
    pub fn delete_education(&mut self, education_id: i64) -> Result<(), PersistenceError> {
        mutations::educations::delete_education(&mut self.conn, education_id)
    }

    // ========================================================================
    // Profiles
    // ========================================================================

    /// Retrieves a profile by ID.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if it is absent.
    pub fn get_profile(&mut self, profile_id: i64) -> Result<Profile, PersistenceError> {
        queries::profiles::get_profile(&mut self.conn, profile_id)
    }

    /// Retrieves the profile owned by a user.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if it is absent.
    pub fn get_profile_by_user(&mut self, user_id: i64) -> Result<Profile, PersistenceError> {
        queries::profiles::get_profile_by_user(&mut self.conn, user_id)
    }

    /// Retrieves the featured profile.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] when no profile is featured.
    pub fn get_featured_profile(&mut self) -> Result<Profile, PersistenceError> {
        queries::profiles::get_featured_profile(&mut self.conn)
    }

    /// Overwrites a profile's editable columns.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] if it is absent.
    pub fn update_profile(&mut self, profile: &Profile) -> Result<Profile, PersistenceError> {
        mutations::profiles::update_profile(&mut self.conn, profile)
    }

    /// Makes a profile the featured one, returning the rows that changed.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::AlreadyFeatured`] if the profile already
    /// holds the flag, [`PersistenceError::NotFound`] if it is absent, or
    /// [`PersistenceError::TransactionFailed`] if the swap was rolled back.
    pub fn set_featured(&mut self, profile_id: i64) -> Result<Vec<Profile>, PersistenceError> {
        mutations::profiles::set_featured(&mut self.conn, profile_id)
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Creates a user account together with its profile.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::UniqueViolation`] if the username or email
    /// is taken.
    pub fn create_user(
        &mut self,
        new_user: NewUser<'_>,
    ) -> Result<(UserData, Profile), PersistenceError> {
        mutations::users::create_user(&mut self.conn, new_user, self.hash_cost)
    }

    /// Retrieves a user by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_username(&mut self.conn, username)
    }

    /// Retrieves a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_user_by_id(&mut self, user_id: i64) -> Result<Option<UserData>, PersistenceError> {
        queries::users::get_user_by_id(&mut self.conn, user_id)
    }

    /// Lists users by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_users(&mut self, page: Page) -> Result<Vec<UserData>, PersistenceError> {
        queries::users::list_users(&mut self.conn, page)
    }

    /// Counts user accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_users(&mut self) -> Result<i64, PersistenceError> {
        queries::users::count_users(&mut self.conn)
    }

    /// Checks a plain-text password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the hash is malformed.
    pub fn verify_password(
        password: &str,
        password_hash: &str,
    ) -> Result<bool, PersistenceError> {
        queries::users::verify_password(password, password_hash)
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_last_login(&mut self, user_id: i64) -> Result<(), PersistenceError> {
        mutations::users::update_last_login(&mut self.conn, user_id)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Stores a new session.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        user_id: i64,
        expires_at: OffsetDateTime,
    ) -> Result<SessionData, PersistenceError> {
        mutations::users::create_session(&mut self.conn, session_token, user_id, expires_at)
    }

    /// Retrieves a session by token without checking expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::users::get_session_by_token(&mut self.conn, session_token)
    }

    /// Refreshes a session's activity timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_session_activity(&mut self, session_id: i64) -> Result<(), PersistenceError> {
        mutations::users::update_session_activity(&mut self.conn, session_id)
    }

    /// Deletes a session, returning whether one existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<bool, PersistenceError> {
        mutations::users::delete_session(&mut self.conn, session_token)
    }

    /// Deletes sessions that expired before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self, now: OffsetDateTime) -> Result<usize, PersistenceError> {
        mutations::users::delete_expired_sessions(&mut self.conn, now)
    }
}
