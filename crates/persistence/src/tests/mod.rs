// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod featured_tests;
mod initialization_tests;
mod organization_tests;
mod orphan_fetch_tests;
mod user_tests;

use folio_domain::{Education, Experience, Organization, Profile, timestamp_now};
use time::Date;

use crate::{NewUser, Persistence, UserData};

/// Opens an isolated in-memory database with a cheap bcrypt cost.
pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory()
        .expect("in-memory database")
        .with_hash_cost(4)
}

pub fn draft_organization(name: &str) -> Organization {
    let now = timestamp_now();
    Organization {
        organization_id: 0,
        name: String::from(name),
        website: Some(String::from("https://example.com")),
        location: None,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub fn draft_experience(
    organization_id: i64,
    title: &str,
    start_date: Date,
    end_date: Option<Date>,
) -> Experience {
    let now = timestamp_now();
    Experience {
        experience_id: 0,
        organization_id,
        title: String::from(title),
        description: None,
        location: None,
        start_date,
        end_date,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub fn draft_education(organization_id: i64, start_year: i32, end_year: Option<i32>) -> Education {
    let now = timestamp_now();
    Education {
        education_id: 0,
        organization_id,
        degree: format!("Degree {start_year}"),
        field_of_study: None,
        gpa: None,
        activities: None,
        start_year,
        end_year,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

/// Creates an organization and returns its ID.
pub fn create_test_organization(persistence: &mut Persistence, name: &str) -> i64 {
    persistence
        .create_organization(&draft_organization(name))
        .unwrap()
        .organization_id
}

/// Moves an organization to the trash.
pub fn trash_organization(persistence: &mut Persistence, organization_id: i64) {
    let mut organization: Organization = persistence
        .get_any_organization_by_id(organization_id)
        .unwrap();
    organization.deleted_at = Some(timestamp_now());
    persistence.update_organization(&organization).unwrap();
}

/// Creates a member account and returns it with its profile.
pub fn create_test_user(persistence: &mut Persistence, username: &str) -> (UserData, Profile) {
    let email: String = format!("{username}@example.com");
    persistence
        .create_user(NewUser {
            username,
            email: &email,
            display_name: username,
            password: "correct horse battery staple",
            role: "Member",
        })
        .unwrap()
}
