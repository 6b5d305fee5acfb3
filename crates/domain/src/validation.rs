// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Record validation.
//!
//! These functions run on complete records, after a patch has been merged.

use url::Url;

use crate::error::DomainError;
use crate::types::{Education, Experience, Organization, Profile};

const MAX_NAME_LENGTH: usize = 200;
const MAX_TEXT_LENGTH: usize = 5000;
const MAX_GPA_LENGTH: usize = 32;
const MAX_USERNAME_LENGTH: usize = 32;
const MIN_USERNAME_LENGTH: usize = 3;
const MAX_EMAIL_LENGTH: usize = 254;

/// Earliest accepted academic year.
pub const MIN_YEAR: i32 = 1900;
/// Latest accepted academic year.
pub const MAX_YEAR: i32 = 2100;

fn require_text(field: &'static str, value: &str, max: usize) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::EmptyField { field });
    }
    check_length(field, value, max)
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), DomainError> {
    let length: usize = value.chars().count();
    if length > max {
        return Err(DomainError::FieldTooLong { field, length, max });
    }
    Ok(())
}

fn check_optional(field: &'static str, value: Option<&str>, max: usize) -> Result<(), DomainError> {
    value.map_or(Ok(()), |v| check_length(field, v, max))
}

fn check_year(field: &'static str, year: i32) -> Result<(), DomainError> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(DomainError::YearOutOfRange {
            field,
            year,
            min: MIN_YEAR,
            max: MAX_YEAR,
        });
    }
    Ok(())
}

/// Validates a website URL.
///
/// # Errors
///
/// Returns an error if the URL is not an absolute `http` or `https` URL.
pub fn validate_website(website: &str) -> Result<(), DomainError> {
    let invalid = || DomainError::InvalidField {
        field: "website",
        reason: String::from("must be an absolute http(s) URL with a host"),
    };

    let url: Url = Url::parse(website).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid());
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid());
    }
    check_length("website", website, MAX_NAME_LENGTH)
}

/// Validates an organization.
///
/// # Errors
///
/// Returns an error naming the first field that fails.
pub fn validate_organization(organization: &Organization) -> Result<(), DomainError> {
    require_text("name", &organization.name, MAX_NAME_LENGTH)?;
    if let Some(website) = organization.website.as_deref() {
        validate_website(website)?;
    }
    check_optional(
        "location",
        organization.location.as_deref(),
        MAX_NAME_LENGTH,
    )
}

/// Validates an experience entry.
///
/// # Errors
///
/// Returns an error naming the first field that fails, including
/// `end_date` when it precedes `start_date`.
pub fn validate_experience(experience: &Experience) -> Result<(), DomainError> {
    require_text("title", &experience.title, MAX_NAME_LENGTH)?;
    check_optional(
        "description",
        experience.description.as_deref(),
        MAX_TEXT_LENGTH,
    )?;
    check_optional("location", experience.location.as_deref(), MAX_NAME_LENGTH)?;

    if let Some(end_date) = experience.end_date
        && end_date < experience.start_date
    {
        return Err(DomainError::EndBeforeStart {
            field: "end_date",
            start_field: "start_date",
            start: experience.start_date.to_string(),
            end: end_date.to_string(),
        });
    }
    Ok(())
}

/// Validates an education entry.
///
/// # Errors
///
/// Returns an error naming the first field that fails, including
/// `end_year` when it precedes `start_year`.
pub fn validate_education(education: &Education) -> Result<(), DomainError> {
    require_text("degree", &education.degree, MAX_NAME_LENGTH)?;
    check_optional(
        "field_of_study",
        education.field_of_study.as_deref(),
        MAX_NAME_LENGTH,
    )?;
    check_optional("gpa", education.gpa.as_deref(), MAX_GPA_LENGTH)?;
    check_optional(
        "activities",
        education.activities.as_deref(),
        MAX_TEXT_LENGTH,
    )?;
    check_year("start_year", education.start_year)?;

    if let Some(end_year) = education.end_year {
        check_year("end_year", end_year)?;
        if end_year < education.start_year {
            return Err(DomainError::EndBeforeStart {
                field: "end_year",
                start_field: "start_year",
                start: education.start_year.to_string(),
                end: end_year.to_string(),
            });
        }
    }
    Ok(())
}

/// Validates the editable fields of a profile.
///
/// # Errors
///
/// Returns an error naming the first field that fails.
pub fn validate_profile(profile: &Profile) -> Result<(), DomainError> {
    check_optional("headline", profile.headline.as_deref(), MAX_NAME_LENGTH)?;
    check_optional("bio", profile.bio.as_deref(), MAX_TEXT_LENGTH)?;
    check_optional("location", profile.location.as_deref(), MAX_NAME_LENGTH)
}

/// Validates the identity fields of a new user account.
///
/// # Errors
///
/// Returns an error naming the first field that fails.
pub fn validate_account(
    username: &str,
    email: &str,
    display_name: &str,
) -> Result<(), DomainError> {
    let username_length: usize = username.chars().count();
    if username_length < MIN_USERNAME_LENGTH {
        return Err(DomainError::InvalidField {
            field: "username",
            reason: format!("must be at least {MIN_USERNAME_LENGTH} characters"),
        });
    }
    check_length("username", username, MAX_USERNAME_LENGTH)?;
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(DomainError::InvalidField {
            field: "username",
            reason: String::from("may only contain letters, digits, '_' and '-'"),
        });
    }

    check_length("email", email, MAX_EMAIL_LENGTH)?;
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace) => {}
        _ => {
            return Err(DomainError::InvalidField {
                field: "email",
                reason: String::from("must be an email address"),
            });
        }
    }

    require_text("display_name", display_name, MAX_NAME_LENGTH)
}
