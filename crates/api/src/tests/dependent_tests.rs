// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Experience and education handler tests: orphan-aware reads and the
//! PATCH flow.

use crate::{
    ApiError, Caller, CreateExperienceRequest, ListQuery, PatchEducationRequest,
    PatchExperienceRequest, create_experience, delete_experience, get_education,
    get_experience, list_educations, list_experiences, update_education, update_experience,
};

use super::helpers::{
    bootstrap_admin, create_member, create_test_education, create_test_experience,
    create_test_organization, setup_test_persistence, trash_organization,
};

fn trash_experience(persistence: &mut folio_persistence::SqlitePersistence, admin: &Caller, id: i64) {
    update_experience(
        persistence,
        admin,
        id,
        PatchExperienceRequest {
            in_trash: Some(true),
            ..PatchExperienceRequest::default()
        },
    )
    .unwrap();
}

#[test]
fn test_create_experience_requires_existing_organization() {
    let mut persistence = setup_test_persistence();
    let admin = bootstrap_admin(&mut persistence);

    let result = create_experience(
        &mut persistence,
        &admin,
        CreateExperienceRequest {
            organization_id: 999,
            title: String::from("Engineer"),
            description: None,
            location: None,
            start_date: String::from("2020-01-01"),
            end_date: None,
        },
    );

    assert!(
        matches!(result, Err(ApiError::InvalidInput { ref field, .. }) if field == "organization_id")
    );
}

#[test]
fn test_create_experience_rejects_malformed_date() {
    let mut persistence = setup_test_persistence();
    let admin = bootstrap_admin(&mut persistence);
    let organization = create_test_organization(&mut persistence, &admin, "Acme");

    let result = create_experience(
        &mut persistence,
        &admin,
        CreateExperienceRequest {
            organization_id: organization.organization_id,
            title: String::from("Engineer"),
            description: None,
            location: None,
            start_date: String::from("2020-13-01"),
            end_date: None,
        },
    );

    assert!(
        matches!(result, Err(ApiError::InvalidInput { ref field, .. }) if field == "start_date")
    );
}

#[test]
fn test_experience_embeds_organization() {
    let mut persistence = setup_test_persistence();
    let admin = bootstrap_admin(&mut persistence);
    let organization = create_test_organization(&mut persistence, &admin, "Acme");
    let experience =
        create_test_experience(&mut persistence, &admin, organization.organization_id, "Engineer");

    let public =
        get_experience(&mut persistence, &Caller::Anonymous, experience.experience_id).unwrap();

    assert_eq!(public.organization.organization_id, organization.organization_id);
    assert_eq!(public.organization.name, "Acme");
    assert_eq!(public.start_date, "2019-03-01");
    assert_eq!(public.end_date.as_deref(), Some("2021-06-30"));
}

#[test]
fn test_orphaned_experience_hidden_from_non_admins() {
    let mut persistence = setup_test_persistence();
    let admin = bootstrap_admin(&mut persistence);
    let member = create_member(&mut persistence, &admin, "alice");
    let organization = create_test_organization(&mut persistence, &admin, "Acme");
    let experience =
        create_test_experience(&mut persistence, &admin, organization.organization_id, "Engineer");
    trash_organization(&mut persistence, &admin, organization.organization_id);

    for caller in [Caller::Anonymous, member] {
        assert!(matches!(
            get_experience(&mut persistence, &caller, experience.experience_id),
            Err(ApiError::ResourceNotFound { .. })
        ));
    }

    let seen = get_experience(&mut persistence, &admin, experience.experience_id).unwrap();
    assert_eq!(seen.meta.trashed, Some(false));
    assert_eq!(seen.meta.orphaned, Some(true));
    assert_eq!(seen.organization.meta.trashed, Some(true));
}

#[test]
fn test_trashed_experience_hidden_from_non_admins() {
    let mut persistence = setup_test_persistence();
    let admin = bootstrap_admin(&mut persistence);
    let organization = create_test_organization(&mut persistence, &admin, "Acme");
    let experience =
        create_test_experience(&mut persistence, &admin, organization.organization_id, "Engineer");
    trash_experience(&mut persistence, &admin, experience.experience_id);

    assert!(matches!(
        get_experience(&mut persistence, &Caller::Anonymous, experience.experience_id),
        Err(ApiError::ResourceNotFound { .. })
    ));
    let seen = get_experience(&mut persistence, &admin, experience.experience_id).unwrap();
    assert_eq!(seen.meta.trashed, Some(true));
    assert_eq!(seen.meta.orphaned, Some(false));
}

#[test]
fn test_non_admin_list_matches_admin_active_filter() {
    let mut persistence = setup_test_persistence();
    let admin = bootstrap_admin(&mut persistence);
    let member = create_member(&mut persistence, &admin, "alice");

    let kept = create_test_organization(&mut persistence, &admin, "Kept");
    let gone = create_test_organization(&mut persistence, &admin, "Gone");
    create_test_experience(&mut persistence, &admin, kept.organization_id, "Active");
    let trashed = create_test_experience(&mut persistence, &admin, kept.organization_id, "Trashed");
    create_test_experience(&mut persistence, &admin, gone.organization_id, "Orphaned");
    let both = create_test_experience(&mut persistence, &admin, gone.organization_id, "Both");
    trash_experience(&mut persistence, &admin, trashed.experience_id);
    trash_experience(&mut persistence, &admin, both.experience_id);
    trash_organization(&mut persistence, &admin, gone.organization_id);

    let ids = |list: crate::ListExperiencesResponse| -> Vec<i64> {
        list.experiences.into_iter().map(|e| e.experience_id).collect()
    };

    let admin_active = ids(list_experiences(
        &mut persistence,
        &admin,
        &ListQuery {
            deleted: Some(String::from("false")),
            orphans: Some(String::from("false")),
            op: Some(String::from("and")),
            ..ListQuery::default()
        },
    )
    .unwrap());
    assert_eq!(admin_active.len(), 1);

    let filters = [
        ListQuery::default(),
        ListQuery {
            deleted: Some(String::from("true")),
            ..ListQuery::default()
        },
        ListQuery {
            deleted: Some(String::from("true")),
            orphans: Some(String::from("true")),
            op: Some(String::from("or")),
            ..ListQuery::default()
        },
    ];
    for query in &filters {
        for caller in [&Caller::Anonymous, &member] {
            let listed = ids(list_experiences(&mut persistence, caller, query).unwrap());
            assert_eq!(listed, admin_active);
        }
    }

    let admin_all = ids(list_experiences(&mut persistence, &admin, &ListQuery::default()).unwrap());
    assert_eq!(admin_all.len(), 4);

    let trashed_or_orphaned = ids(list_experiences(
        &mut persistence,
        &admin,
        &ListQuery {
            deleted: Some(String::from("true")),
            orphans: Some(String::from("true")),
            op: Some(String::from("or")),
            ..ListQuery::default()
        },
    )
    .unwrap());
    assert_eq!(trashed_or_orphaned.len(), 3);
}

#[test]
fn test_patch_validates_merged_record() {
    let mut persistence = setup_test_persistence();
    let admin = bootstrap_admin(&mut persistence);
    let organization = create_test_organization(&mut persistence, &admin, "Acme");
    let experience =
        create_test_experience(&mut persistence, &admin, organization.organization_id, "Engineer");

    // only the start moves, but it now falls after the stored end
    let result = update_experience(
        &mut persistence,
        &admin,
        experience.experience_id,
        PatchExperienceRequest {
            start_date: Some(String::from("2022-01-01")),
            ..PatchExperienceRequest::default()
        },
    );
    assert!(matches!(result, Err(ApiError::InvalidInput { ref field, .. }) if field == "end_date"));

    let unchanged = get_experience(&mut persistence, &admin, experience.experience_id).unwrap();
    assert_eq!(unchanged, experience);

    // clearing the end date makes the same start valid
    let ongoing = update_experience(
        &mut persistence,
        &admin,
        experience.experience_id,
        PatchExperienceRequest {
            start_date: Some(String::from("2022-01-01")),
            end_date: Some(None),
            ..PatchExperienceRequest::default()
        },
    )
    .unwrap();
    assert_eq!(ongoing.start_date, "2022-01-01");
    assert_eq!(ongoing.end_date, None);
    assert_eq!(ongoing.title, "Engineer");
}

#[test]
fn test_reparent_experience() {
    let mut persistence = setup_test_persistence();
    let admin = bootstrap_admin(&mut persistence);
    let first = create_test_organization(&mut persistence, &admin, "First");
    let second = create_test_organization(&mut persistence, &admin, "Second");
    let experience =
        create_test_experience(&mut persistence, &admin, first.organization_id, "Engineer");

    let missing = update_experience(
        &mut persistence,
        &admin,
        experience.experience_id,
        PatchExperienceRequest {
            organization_id: Some(999),
            ..PatchExperienceRequest::default()
        },
    );
    assert!(
        matches!(missing, Err(ApiError::InvalidInput { ref field, .. }) if field == "organization_id")
    );

    let moved = update_experience(
        &mut persistence,
        &admin,
        experience.experience_id,
        PatchExperienceRequest {
            organization_id: Some(second.organization_id),
            ..PatchExperienceRequest::default()
        },
    )
    .unwrap();
    assert_eq!(moved.organization_id, second.organization_id);
    assert_eq!(moved.organization.name, "Second");
}

#[test]
fn test_restoring_parent_restores_visibility() {
    let mut persistence = setup_test_persistence();
    let admin = bootstrap_admin(&mut persistence);
    let organization = create_test_organization(&mut persistence, &admin, "Acme");
    let experience =
        create_test_experience(&mut persistence, &admin, organization.organization_id, "Engineer");
    trash_organization(&mut persistence, &admin, organization.organization_id);

    crate::update_organization(
        &mut persistence,
        &admin,
        organization.organization_id,
        crate::PatchOrganizationRequest {
            in_trash: Some(false),
            ..crate::PatchOrganizationRequest::default()
        },
    )
    .unwrap();

    assert!(get_experience(&mut persistence, &Caller::Anonymous, experience.experience_id).is_ok());
}

#[test]
fn test_delete_experience() {
    let mut persistence = setup_test_persistence();
    let admin = bootstrap_admin(&mut persistence);
    let organization = create_test_organization(&mut persistence, &admin, "Acme");
    let experience =
        create_test_experience(&mut persistence, &admin, organization.organization_id, "Engineer");

    delete_experience(&mut persistence, &admin, experience.experience_id).unwrap();

    assert!(matches!(
        get_experience(&mut persistence, &admin, experience.experience_id),
        Err(ApiError::ResourceNotFound { .. })
    ));
    assert!(matches!(
        delete_experience(&mut persistence, &admin, experience.experience_id),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_education_fields_patch_independently() {
    let mut persistence = setup_test_persistence();
    let admin = bootstrap_admin(&mut persistence);
    let organization = create_test_organization(&mut persistence, &admin, "University");
    let education =
        create_test_education(&mut persistence, &admin, organization.organization_id, "BSc");

    let degree_only = update_education(
        &mut persistence,
        &admin,
        education.education_id,
        PatchEducationRequest {
            degree: Some(String::from("MSc")),
            ..PatchEducationRequest::default()
        },
    )
    .unwrap();
    assert_eq!(degree_only.degree, "MSc");
    assert_eq!(degree_only.gpa.as_deref(), Some("3.8/4.0"));

    let gpa_only = update_education(
        &mut persistence,
        &admin,
        education.education_id,
        PatchEducationRequest {
            gpa: Some(Some(String::from("3.9/4.0"))),
            ..PatchEducationRequest::default()
        },
    )
    .unwrap();
    assert_eq!(gpa_only.degree, "MSc");
    assert_eq!(gpa_only.gpa.as_deref(), Some("3.9/4.0"));
    assert_eq!(gpa_only.field_of_study.as_deref(), Some("Computer Science"));
}

#[test]
fn test_education_end_year_before_start_rejected() {
    let mut persistence = setup_test_persistence();
    let admin = bootstrap_admin(&mut persistence);
    let organization = create_test_organization(&mut persistence, &admin, "University");
    let education =
        create_test_education(&mut persistence, &admin, organization.organization_id, "BSc");

    let result = update_education(
        &mut persistence,
        &admin,
        education.education_id,
        PatchEducationRequest {
            end_year: Some(Some(2010)),
            ..PatchEducationRequest::default()
        },
    );

    assert!(matches!(result, Err(ApiError::InvalidInput { ref field, .. }) if field == "end_year"));
}

#[test]
fn test_education_untrash_is_idempotent() {
    let mut persistence = setup_test_persistence();
    let admin = bootstrap_admin(&mut persistence);
    let organization = create_test_organization(&mut persistence, &admin, "University");
    let education =
        create_test_education(&mut persistence, &admin, organization.organization_id, "BSc");

    let toggle = |in_trash: bool| PatchEducationRequest {
        in_trash: Some(in_trash),
        ..PatchEducationRequest::default()
    };
    update_education(&mut persistence, &admin, education.education_id, toggle(true)).unwrap();
    assert!(get_education(&mut persistence, &Caller::Anonymous, education.education_id).is_err());

    let first =
        update_education(&mut persistence, &admin, education.education_id, toggle(false)).unwrap();
    let second =
        update_education(&mut persistence, &admin, education.education_id, toggle(false)).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.meta.trashed, Some(false));
    assert_eq!(
        list_educations(&mut persistence, &Caller::Anonymous, &ListQuery::default())
            .unwrap()
            .educations
            .len(),
        1
    );
}
