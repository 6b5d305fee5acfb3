// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use time::macros::{date, datetime};
use time::OffsetDateTime;

use crate::{Education, Experience, Organization, Profile};

pub const CREATED: OffsetDateTime = datetime!(2026-01-01 00:00:00 UTC);
pub const NOW: OffsetDateTime = datetime!(2026-03-15 12:00:00 UTC);

pub fn create_test_organization() -> Organization {
    Organization {
        organization_id: 1,
        name: String::from("Acme Corp"),
        website: Some(String::from("https://acme.example")),
        location: Some(String::from("Springfield")),
        created_at: CREATED,
        updated_at: CREATED,
        deleted_at: None,
    }
}

pub fn create_test_experience() -> Experience {
    Experience {
        experience_id: 10,
        organization_id: 1,
        title: String::from("Software Engineer"),
        description: Some(String::from("Built things")),
        location: None,
        start_date: date!(2019 - 06 - 01),
        end_date: Some(date!(2021 - 08 - 31)),
        created_at: CREATED,
        updated_at: CREATED,
        deleted_at: None,
    }
}

pub fn create_test_education() -> Education {
    Education {
        education_id: 20,
        organization_id: 1,
        degree: String::from("BSc Computer Science"),
        field_of_study: Some(String::from("Computer Science")),
        gpa: Some(String::from("3.8/4.0")),
        activities: None,
        start_year: 2013,
        end_year: Some(2017),
        created_at: CREATED,
        updated_at: CREATED,
        deleted_at: None,
    }
}

pub fn create_test_profile() -> Profile {
    Profile {
        profile_id: 5,
        user_id: 7,
        username: String::from("jdoe"),
        display_name: String::from("Jane Doe"),
        headline: Some(String::from("Engineer")),
        bio: None,
        location: None,
        is_featured: None,
        created_at: CREATED,
        updated_at: CREATED,
    }
}
