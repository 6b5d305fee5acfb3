// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and conversions between stored text and domain values.
//!
//! Timestamps are stored as RFC 3339 text, calendar dates as `YYYY-MM-DD`.

use diesel::prelude::*;
use folio_domain::{Education, Experience, Organization, Profile};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::diesel_schema::{educations, experiences, organizations, profiles, sessions, users};
use crate::error::PersistenceError;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Renders a timestamp in UTC so stored values sort as text.
pub(crate) fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(format!("timestamp: {e}")))
}

pub(crate) fn parse_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(format!("timestamp '{value}': {e}")))
}

pub(crate) fn format_optional_timestamp(
    value: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    value.map(format_timestamp).transpose()
}

fn parse_optional_timestamp(
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(parse_timestamp).transpose()
}

pub(crate) fn format_date(value: Date) -> Result<String, PersistenceError> {
    value
        .format(DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(format!("date: {e}")))
}

fn parse_date(value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(format!("date '{value}': {e}")))
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = organizations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct OrganizationRow {
    organization_id: i64,
    name: String,
    website: Option<String>,
    location: Option<String>,
    created_at: String,
    updated_at: String,
    deleted_at: Option<String>,
}

impl OrganizationRow {
    pub(crate) fn into_domain(self) -> Result<Organization, PersistenceError> {
        Ok(Organization {
            organization_id: self.organization_id,
            name: self.name,
            website: self.website,
            location: self.location,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            deleted_at: parse_optional_timestamp(self.deleted_at.as_deref())?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = experiences)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ExperienceRow {
    experience_id: i64,
    organization_id: i64,
    title: String,
    description: Option<String>,
    location: Option<String>,
    start_date: String,
    end_date: Option<String>,
    created_at: String,
    updated_at: String,
    deleted_at: Option<String>,
}

impl ExperienceRow {
    pub(crate) fn into_domain(self) -> Result<Experience, PersistenceError> {
        Ok(Experience {
            experience_id: self.experience_id,
            organization_id: self.organization_id,
            title: self.title,
            description: self.description,
            location: self.location,
            start_date: parse_date(&self.start_date)?,
            end_date: self.end_date.as_deref().map(parse_date).transpose()?,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            deleted_at: parse_optional_timestamp(self.deleted_at.as_deref())?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = educations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct EducationRow {
    education_id: i64,
    organization_id: i64,
    degree: String,
    field_of_study: Option<String>,
    gpa: Option<String>,
    activities: Option<String>,
    start_year: i32,
    end_year: Option<i32>,
    created_at: String,
    updated_at: String,
    deleted_at: Option<String>,
}

impl EducationRow {
    pub(crate) fn into_domain(self) -> Result<Education, PersistenceError> {
        Ok(Education {
            education_id: self.education_id,
            organization_id: self.organization_id,
            degree: self.degree,
            field_of_study: self.field_of_study,
            gpa: self.gpa,
            activities: self.activities,
            start_year: self.start_year,
            end_year: self.end_year,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            deleted_at: parse_optional_timestamp(self.deleted_at.as_deref())?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct ProfileRow {
    profile_id: i64,
    user_id: i64,
    headline: Option<String>,
    bio: Option<String>,
    location: Option<String>,
    is_featured: Option<bool>,
    created_at: String,
    updated_at: String,
}

impl ProfileRow {
    /// Combines the profile row with the owner's account names.
    pub(crate) fn into_domain(
        self,
        username: String,
        display_name: String,
    ) -> Result<Profile, PersistenceError> {
        Ok(Profile {
            profile_id: self.profile_id,
            user_id: self.user_id,
            username,
            display_name,
            headline: self.headline,
            bio: self.bio,
            location: self.location,
            is_featured: self.is_featured,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct UserRow {
    user_id: i64,
    username: String,
    email: String,
    display_name: String,
    password_hash: String,
    role: String,
    created_at: String,
    updated_at: String,
    last_login_at: Option<String>,
}

impl UserRow {
    pub(crate) fn into_data(self) -> Result<UserData, PersistenceError> {
        Ok(UserData {
            user_id: self.user_id,
            username: self.username,
            email: self.email,
            display_name: self.display_name,
            password_hash: self.password_hash,
            role: self.role,
            created_at: parse_timestamp(&self.created_at)?,
            updated_at: parse_timestamp(&self.updated_at)?,
            last_login_at: parse_optional_timestamp(self.last_login_at.as_deref())?,
        })
    }
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = sessions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct SessionRow {
    session_id: i64,
    session_token: String,
    user_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

impl SessionRow {
    pub(crate) fn into_data(self) -> Result<SessionData, PersistenceError> {
        Ok(SessionData {
            session_id: self.session_id,
            session_token: self.session_token,
            user_id: self.user_id,
            created_at: parse_timestamp(&self.created_at)?,
            last_activity_at: parse_timestamp(&self.last_activity_at)?,
            expires_at: parse_timestamp(&self.expires_at)?,
        })
    }
}

/// A stored user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserData {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    /// `Admin` or `Member`.
    pub role: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub last_login_at: Option<OffsetDateTime>,
}

/// A stored login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub user_id: i64,
    pub created_at: OffsetDateTime,
    pub last_activity_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

/// Fields for a new user account.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub display_name: &'a str,
    /// Plain-text password; hashed before it is stored.
    pub password: &'a str,
    /// `Admin` or `Member`.
    pub role: &'a str,
}
