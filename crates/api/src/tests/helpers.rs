// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use folio_persistence::SqlitePersistence;

use crate::{
    AuthenticatedActor, Caller, CreateEducationRequest, CreateExperienceRequest,
    CreateOrganizationRequest, CreateUserRequest, CreateUserResponse, EducationView,
    ExperienceView, OrganizationView, PatchOrganizationRequest, Role, create_education,
    create_experience, create_organization, create_user, update_organization,
};

pub const TEST_PASSWORD: &str = "Str0ng-Passw0rd!";

pub fn setup_test_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory()
        .expect("Failed to create in-memory persistence")
        .with_hash_cost(4)
}

pub fn user_request(username: &str, role: Option<&str>) -> CreateUserRequest {
    CreateUserRequest {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        display_name: format!("Test {username}"),
        password: String::from(TEST_PASSWORD),
        password_confirmation: String::from(TEST_PASSWORD),
        role: role.map(str::to_string),
    }
}

/// Creates the first account, which is always an admin, and returns it as
/// a caller.
pub fn bootstrap_admin(persistence: &mut SqlitePersistence) -> Caller {
    let response: CreateUserResponse =
        create_user(persistence, &Caller::Anonymous, user_request("admin", None))
            .expect("Failed to bootstrap admin");
    Caller::Authenticated(AuthenticatedActor::new(
        response.user.user_id,
        response.user.username,
        Role::Admin,
    ))
}

pub fn create_member(persistence: &mut SqlitePersistence, admin: &Caller, username: &str) -> Caller {
    let response: CreateUserResponse = create_user(persistence, admin, user_request(username, None))
        .expect("Failed to create member");
    Caller::Authenticated(AuthenticatedActor::new(
        response.user.user_id,
        response.user.username,
        Role::Member,
    ))
}

pub fn create_test_organization(
    persistence: &mut SqlitePersistence,
    admin: &Caller,
    name: &str,
) -> OrganizationView {
    create_organization(
        persistence,
        admin,
        CreateOrganizationRequest {
            name: name.to_string(),
            website: Some(String::from("https://example.com")),
            location: None,
        },
    )
    .expect("Failed to create organization")
}

pub fn trash_organization(persistence: &mut SqlitePersistence, admin: &Caller, organization_id: i64) {
    update_organization(
        persistence,
        admin,
        organization_id,
        PatchOrganizationRequest {
            in_trash: Some(true),
            ..PatchOrganizationRequest::default()
        },
    )
    .expect("Failed to trash organization");
}

pub fn create_test_experience(
    persistence: &mut SqlitePersistence,
    admin: &Caller,
    organization_id: i64,
    title: &str,
) -> ExperienceView {
    create_experience(
        persistence,
        admin,
        CreateExperienceRequest {
            organization_id,
            title: title.to_string(),
            description: Some(String::from("Built things")),
            location: None,
            start_date: String::from("2019-03-01"),
            end_date: Some(String::from("2021-06-30")),
        },
    )
    .expect("Failed to create experience")
}

pub fn create_test_education(
    persistence: &mut SqlitePersistence,
    admin: &Caller,
    organization_id: i64,
    degree: &str,
) -> EducationView {
    create_education(
        persistence,
        admin,
        CreateEducationRequest {
            organization_id,
            degree: degree.to_string(),
            field_of_study: Some(String::from("Computer Science")),
            gpa: Some(String::from("3.8/4.0")),
            activities: None,
            start_year: 2012,
            end_year: Some(2016),
        },
    )
    .expect("Failed to create education")
}
