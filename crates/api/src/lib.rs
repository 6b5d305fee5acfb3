// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Folio profile backend.
//!
//! This crate sits between the HTTP server and persistence. It resolves
//! who is calling, decides what they may do and see, merges and validates
//! partial updates, and exports records at the caller's level. It knows
//! nothing about HTTP.

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

mod auth;
mod error;
mod handlers;
mod password_policy;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService, Caller, Role};
pub use error::{ApiError, AuthError, translate_domain_error, translate_persistence_error};
pub use handlers::{
    create_education, create_experience, create_organization, create_user, delete_education,
    delete_experience, delete_organization, get_education, get_experience, get_featured_profile,
    get_organization, get_profile, list_educations, list_experiences, list_organizations,
    list_users, login, logout, resolve_caller, set_featured, update_education, update_experience,
    update_organization, update_profile, whoami,
};
pub use password_policy::{PasswordPolicy, PasswordPolicyError};
pub use request_response::{
    CreateEducationRequest, CreateExperienceRequest, CreateOrganizationRequest,
    CreateUserRequest, CreateUserResponse, EducationView, ExperienceView, ExportLevel,
    ListEducationsResponse, ListExperiencesResponse, ListOrganizationsResponse, ListQuery,
    ListUsersResponse, LoginRequest, LoginResponse, OrganizationView, PatchEducationRequest,
    PatchExperienceRequest, PatchOrganizationRequest, PatchProfileRequest, ProfileView,
    RecordMeta, SetFeaturedResponse, UserView, WhoAmIResponse, parse_date,
};
