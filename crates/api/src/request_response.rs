// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API.
//!
//! Responses are exported views of domain records. How much of a record a
//! view carries depends on the caller's [`ExportLevel`].

use folio_domain::{
    Combinator, Dependent, Education, EducationPatch, Experience, ExperiencePatch, Organization,
    OrganizationPatch, Page, Privilege, Profile, ProfilePatch, RecordState, SoftDeletable,
    StateFilter,
};
use folio_persistence::UserData;
use serde::{Deserialize, Deserializer, Serialize};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::error::{ApiError, translate_domain_error};

// ============================================================================
// Field helpers
// ============================================================================

/// Deserializes a field that distinguishes "absent" from "null".
///
/// Used with `#[serde(default)]`: an absent field stays `None`, an explicit
/// `null` becomes `Some(None)`.
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parses a `YYYY-MM-DD` date, naming `field` on failure.
///
/// # Errors
///
/// Returns [`ApiError::InvalidInput`] if `value` is not a calendar date.
pub fn parse_date(field: &str, value: &str) -> Result<Date, ApiError> {
    Date::parse(value, format_description!("[year]-[month]-[day]")).map_err(|e| {
        ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("'{value}' is not a YYYY-MM-DD date: {e}"),
        }
    })
}

fn format_date(date: Date) -> Result<String, ApiError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|e| ApiError::Internal {
            message: format!("Failed to format date: {e}"),
        })
}

fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, ApiError> {
    timestamp.format(&Rfc3339).map_err(|e| ApiError::Internal {
        message: format!("Failed to format timestamp: {e}"),
    })
}

fn format_optional_timestamp(timestamp: Option<OffsetDateTime>) -> Result<Option<String>, ApiError> {
    timestamp.map(format_timestamp).transpose()
}

// ============================================================================
// Export levels
// ============================================================================

/// How much of a record a response carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportLevel {
    /// Content only.
    Public,
    /// Content plus creation and modification times.
    Private,
    /// Everything, including deletion time and derived state.
    Admin,
}

impl ExportLevel {
    /// Picks the level for a caller's privilege.
    #[must_use]
    pub const fn for_privilege(privilege: Privilege) -> Self {
        match privilege {
            Privilege::Anonymous => Self::Public,
            Privilege::Authenticated => Self::Private,
            Privilege::Admin => Self::Admin,
        }
    }

    const fn includes_timestamps(self) -> bool {
        !matches!(self, Self::Public)
    }

    const fn includes_state(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// Timestamps and state shared by every soft-deletable view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMeta {
    /// Creation time (private and admin views).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Last modification time (private and admin views).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    /// Soft-delete time (admin views, when set).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<String>,
    /// Whether the record itself is trashed (admin views).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trashed: Option<bool>,
    /// Whether the record's organization is trashed (admin views of
    /// dependent records).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orphaned: Option<bool>,
}

impl RecordMeta {
    fn export(
        level: ExportLevel,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
        deleted_at: Option<OffsetDateTime>,
        orphaned: Option<bool>,
    ) -> Result<Self, ApiError> {
        let mut meta: Self = Self::default();
        if level.includes_timestamps() {
            meta.created_at = Some(format_timestamp(created_at)?);
            meta.updated_at = Some(format_timestamp(updated_at)?);
        }
        if level.includes_state() {
            meta.deleted_at = format_optional_timestamp(deleted_at)?;
            meta.trashed = Some(deleted_at.is_some());
            meta.orphaned = orphaned;
        }
        Ok(meta)
    }
}

// ============================================================================
// List queries
// ============================================================================

/// Parses an optional boolean query parameter, ignoring case and
/// surrounding whitespace.
fn parse_flag(field: &str, value: Option<&str>) -> Result<Option<bool>, ApiError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(Some(true)),
        "false" => Ok(Some(false)),
        _ => Err(ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("'{value}' is not true or false"),
        }),
    }
}

/// Query string accepted by every list endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Select trashed (`true`) or untrashed (`false`) records. Admin only.
    pub deleted: Option<String>,
    /// Select orphaned (`true`) or non-orphaned (`false`) records. Admin
    /// only.
    pub orphans: Option<String>,
    /// `and` (default) or `or`, joining `deleted` and `orphans`.
    pub op: Option<String>,
    /// Rows to skip.
    pub offset: Option<i64>,
    /// Rows to return at most.
    pub limit: Option<i64>,
}

impl ListQuery {
    /// Builds the state filter for a caller.
    ///
    /// Filters from non-admin callers are dropped unread, so a malformed
    /// `deleted`, `orphans` or `op` only fails for admins.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] naming `deleted` or `orphans` if
    /// either is not a boolean, or `op` if it is not `and` or `or`.
    pub fn state_filter(&self, privilege: Privilege) -> Result<StateFilter, ApiError> {
        if !privilege.is_admin() {
            return Ok(StateFilter::default());
        }
        let combinator: Combinator = self
            .op
            .as_deref()
            .map(str::parse::<Combinator>)
            .transpose()
            .map_err(translate_domain_error)?
            .unwrap_or_default();
        Ok(StateFilter {
            deleted: parse_flag("deleted", self.deleted.as_deref())?,
            orphans: parse_flag("orphans", self.orphans.as_deref())?,
            combinator,
        })
    }

    /// The requested page, clamped.
    #[must_use]
    pub fn page(&self) -> Page {
        Page::new(self.offset, self.limit)
    }
}

// ============================================================================
// Organizations
// ============================================================================

/// API request to create an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOrganizationRequest {
    /// Display name.
    pub name: String,
    /// Homepage URL.
    #[serde(default)]
    pub website: Option<String>,
    /// Free-form location.
    #[serde(default)]
    pub location: Option<String>,
}

impl CreateOrganizationRequest {
    /// Builds the record to insert.
    #[must_use]
    pub fn into_draft(self, now: OffsetDateTime) -> Organization {
        Organization {
            organization_id: 0,
            name: self.name,
            website: self.website,
            location: self.location,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// API request to partially update an organization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOrganizationRequest {
    /// New name.
    #[serde(default)]
    pub name: Option<String>,
    /// New website, or `null` to clear it.
    #[serde(default, deserialize_with = "double_option")]
    pub website: Option<Option<String>>,
    /// New location, or `null` to clear it.
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    /// Move to (`true`) or restore from (`false`) the trash.
    #[serde(default)]
    pub in_trash: Option<bool>,
}

impl From<PatchOrganizationRequest> for OrganizationPatch {
    fn from(request: PatchOrganizationRequest) -> Self {
        Self {
            name: request.name,
            website: request.website,
            location: request.location,
            in_trash: request.in_trash,
        }
    }
}

/// An exported organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationView {
    pub organization_id: i64,
    pub name: String,
    pub website: Option<String>,
    pub location: Option<String>,
    #[serde(flatten)]
    pub meta: RecordMeta,
}

impl OrganizationView {
    /// Exports an organization at `level`.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be formatted.
    pub fn export(organization: &Organization, level: ExportLevel) -> Result<Self, ApiError> {
        Ok(Self {
            organization_id: organization.organization_id,
            name: organization.name.clone(),
            website: organization.website.clone(),
            location: organization.location.clone(),
            meta: RecordMeta::export(
                level,
                organization.created_at,
                organization.updated_at,
                organization.deleted_at,
                None,
            )?,
        })
    }
}

/// API response for an organization list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOrganizationsResponse {
    pub organizations: Vec<OrganizationView>,
    pub offset: i64,
    pub limit: i64,
}

// ============================================================================
// Experiences
// ============================================================================

/// API request to create an experience entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateExperienceRequest {
    /// The owning organization.
    pub organization_id: i64,
    /// Job title.
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    /// `YYYY-MM-DD`.
    pub start_date: String,
    /// `YYYY-MM-DD`, absent while ongoing.
    #[serde(default)]
    pub end_date: Option<String>,
}

impl CreateExperienceRequest {
    /// Builds the record to insert.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] if a date is malformed.
    pub fn into_draft(self, now: OffsetDateTime) -> Result<Experience, ApiError> {
        Ok(Experience {
            experience_id: 0,
            organization_id: self.organization_id,
            title: self.title,
            description: self.description,
            location: self.location,
            start_date: parse_date("start_date", &self.start_date)?,
            end_date: self
                .end_date
                .as_deref()
                .map(|end| parse_date("end_date", end))
                .transpose()?,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }
}

/// API request to partially update an experience entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchExperienceRequest {
    /// Re-parent to another organization.
    #[serde(default)]
    pub organization_id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
    /// `YYYY-MM-DD`.
    #[serde(default)]
    pub start_date: Option<String>,
    /// `YYYY-MM-DD`, or `null` to mark the role ongoing.
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<String>>,
    /// Move to (`true`) or restore from (`false`) the trash.
    #[serde(default)]
    pub in_trash: Option<bool>,
}

impl PatchExperienceRequest {
    /// Converts the request into a domain patch.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] if a date is malformed.
    pub fn into_patch(self) -> Result<ExperiencePatch, ApiError> {
        let start_date: Option<Date> = self
            .start_date
            .as_deref()
            .map(|start| parse_date("start_date", start))
            .transpose()?;
        let end_date: Option<Option<Date>> = match self.end_date {
            None => None,
            Some(None) => Some(None),
            Some(Some(end)) => Some(Some(parse_date("end_date", &end)?)),
        };
        Ok(ExperiencePatch {
            organization_id: self.organization_id,
            title: self.title,
            description: self.description,
            location: self.location,
            start_date,
            end_date,
            in_trash: self.in_trash,
        })
    }
}

/// An exported experience entry together with its organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceView {
    pub experience_id: i64,
    pub organization_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// The owning organization, exported at the same level.
    pub organization: OrganizationView,
}

impl ExperienceView {
    /// Exports an experience entry at `level`.
    ///
    /// # Errors
    ///
    /// Returns an error if a date or timestamp cannot be formatted.
    pub fn export(dependent: &Dependent<Experience>, level: ExportLevel) -> Result<Self, ApiError> {
        let experience: &Experience = &dependent.record;
        let state: RecordState = dependent.state();
        Ok(Self {
            experience_id: experience.experience_id,
            organization_id: experience.organization_id,
            title: experience.title.clone(),
            description: experience.description.clone(),
            location: experience.location.clone(),
            start_date: format_date(experience.start_date)?,
            end_date: experience.end_date.map(format_date).transpose()?,
            meta: RecordMeta::export(
                level,
                experience.created_at,
                experience.updated_at,
                experience.deleted_at(),
                Some(state.orphaned),
            )?,
            organization: OrganizationView::export(&dependent.organization, level)?,
        })
    }
}

/// API response for an experience list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListExperiencesResponse {
    pub experiences: Vec<ExperienceView>,
    pub offset: i64,
    pub limit: i64,
}

// ============================================================================
// Educations
// ============================================================================

/// API request to create an education entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateEducationRequest {
    /// The owning organization.
    pub organization_id: i64,
    /// Degree or certificate name.
    pub degree: String,
    #[serde(default)]
    pub field_of_study: Option<String>,
    #[serde(default)]
    pub gpa: Option<String>,
    #[serde(default)]
    pub activities: Option<String>,
    pub start_year: i32,
    #[serde(default)]
    pub end_year: Option<i32>,
}

impl CreateEducationRequest {
    /// Builds the record to insert.
    #[must_use]
    pub fn into_draft(self, now: OffsetDateTime) -> Education {
        Education {
            education_id: 0,
            organization_id: self.organization_id,
            degree: self.degree,
            field_of_study: self.field_of_study,
            gpa: self.gpa,
            activities: self.activities,
            start_year: self.start_year,
            end_year: self.end_year,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// API request to partially update an education entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchEducationRequest {
    /// Re-parent to another organization.
    #[serde(default)]
    pub organization_id: Option<i64>,
    #[serde(default)]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub field_of_study: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub gpa: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub activities: Option<Option<String>>,
    #[serde(default)]
    pub start_year: Option<i32>,
    /// New end year, or `null` to mark the entry ongoing.
    #[serde(default, deserialize_with = "double_option")]
    pub end_year: Option<Option<i32>>,
    /// Move to (`true`) or restore from (`false`) the trash.
    #[serde(default)]
    pub in_trash: Option<bool>,
}

impl From<PatchEducationRequest> for EducationPatch {
    fn from(request: PatchEducationRequest) -> Self {
        Self {
            organization_id: request.organization_id,
            degree: request.degree,
            field_of_study: request.field_of_study,
            gpa: request.gpa,
            activities: request.activities,
            start_year: request.start_year,
            end_year: request.end_year,
            in_trash: request.in_trash,
        }
    }
}

/// An exported education entry together with its organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationView {
    pub education_id: i64,
    pub organization_id: i64,
    pub degree: String,
    pub field_of_study: Option<String>,
    pub gpa: Option<String>,
    pub activities: Option<String>,
    pub start_year: i32,
    pub end_year: Option<i32>,
    #[serde(flatten)]
    pub meta: RecordMeta,
    /// The owning organization, exported at the same level.
    pub organization: OrganizationView,
}

impl EducationView {
    /// Exports an education entry at `level`.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be formatted.
    pub fn export(dependent: &Dependent<Education>, level: ExportLevel) -> Result<Self, ApiError> {
        let education: &Education = &dependent.record;
        let state: RecordState = dependent.state();
        Ok(Self {
            education_id: education.education_id,
            organization_id: education.organization_id,
            degree: education.degree.clone(),
            field_of_study: education.field_of_study.clone(),
            gpa: education.gpa.clone(),
            activities: education.activities.clone(),
            start_year: education.start_year,
            end_year: education.end_year,
            meta: RecordMeta::export(
                level,
                education.created_at,
                education.updated_at,
                education.deleted_at(),
                Some(state.orphaned),
            )?,
            organization: OrganizationView::export(&dependent.organization, level)?,
        })
    }
}

/// API response for an education list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEducationsResponse {
    pub educations: Vec<EducationView>,
    pub offset: i64,
    pub limit: i64,
}

// ============================================================================
// Profiles
// ============================================================================

/// API request to partially update a profile.
///
/// The featured flag is not accepted here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchProfileRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub headline: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub location: Option<Option<String>>,
}

impl From<PatchProfileRequest> for ProfilePatch {
    fn from(request: PatchProfileRequest) -> Self {
        Self {
            headline: request.headline,
            bio: request.bio,
            location: request.location,
        }
    }
}

/// An exported profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileView {
    pub profile_id: i64,
    pub user_id: i64,
    pub username: String,
    pub display_name: String,
    pub headline: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ProfileView {
    /// Exports a profile at `level`.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be formatted.
    pub fn export(profile: &Profile, level: ExportLevel) -> Result<Self, ApiError> {
        let (created_at, updated_at): (Option<String>, Option<String>) =
            if level.includes_timestamps() {
                (
                    Some(format_timestamp(profile.created_at)?),
                    Some(format_timestamp(profile.updated_at)?),
                )
            } else {
                (None, None)
            };
        Ok(Self {
            profile_id: profile.profile_id,
            user_id: profile.user_id,
            username: profile.username.clone(),
            display_name: profile.display_name.clone(),
            headline: profile.headline.clone(),
            bio: profile.bio.clone(),
            location: profile.location.clone(),
            is_featured: profile.is_featured(),
            created_at,
            updated_at,
        })
    }
}

/// API response for the featured swap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFeaturedResponse {
    /// The profiles whose flag changed: the previous holder (if any)
    /// followed by the new one.
    pub changed: Vec<ProfileView>,
}

// ============================================================================
// Users and sessions
// ============================================================================

/// API request to create a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub password: String,
    pub password_confirmation: String,
    /// `Admin` or `Member`; defaults to `Member`. Ignored for the first
    /// account, which is always an admin.
    #[serde(default)]
    pub role: Option<String>,
}

/// A user account without its credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
    pub created_at: String,
    pub last_login_at: Option<String>,
}

impl UserView {
    /// Exports an account.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be formatted.
    pub fn export(user: &UserData) -> Result<Self, ApiError> {
        Ok(Self {
            user_id: user.user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            role: user.role.clone(),
            created_at: format_timestamp(user.created_at)?,
            last_login_at: format_optional_timestamp(user.last_login_at)?,
        })
    }
}

/// API response for account creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserResponse {
    pub user: UserView,
    pub profile: ProfileView,
}

/// API response for the account list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserView>,
}

/// API response describing the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub user: UserView,
    pub profile: ProfileView,
}

/// API request to log in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Bearer token for subsequent requests.
    pub session_token: String,
    /// When the token stops being accepted.
    pub expires_at: String,
    pub user: UserView,
}
