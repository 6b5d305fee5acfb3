// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Organization persistence tests.

use folio_domain::{Organization, Page, PredicateSet, Privilege, StateFilter, VisibilityPolicy};
use time::macros::date;

use super::{
    create_test_organization, create_test_persistence, draft_education, draft_experience,
    draft_organization, trash_organization,
};
use crate::error::PersistenceError;

#[test]
fn test_create_and_get_organization() {
    let mut persistence = create_test_persistence();

    let created: Organization = persistence
        .create_organization(&draft_organization("Acme Corp"))
        .unwrap();
    let fetched: Organization = persistence
        .get_organization_by_id(created.organization_id)
        .unwrap();

    assert_eq!(created, fetched);
    assert_eq!(fetched.name, "Acme Corp");
    assert_eq!(fetched.website.as_deref(), Some("https://example.com"));
    assert!(fetched.deleted_at.is_none());
}

#[test]
fn test_trashed_organization_hidden_from_public_read() {
    let mut persistence = create_test_persistence();
    let organization_id = create_test_organization(&mut persistence, "Acme Corp");

    trash_organization(&mut persistence, organization_id);

    assert!(matches!(
        persistence.get_organization_by_id(organization_id),
        Err(PersistenceError::NotFound(_))
    ));
    let any: Organization = persistence
        .get_any_organization_by_id(organization_id)
        .unwrap();
    assert!(any.deleted_at.is_some());
}

#[test]
fn test_missing_organization_not_found() {
    let mut persistence = create_test_persistence();
    assert!(matches!(
        persistence.get_any_organization_by_id(42),
        Err(PersistenceError::NotFound(_))
    ));
}

#[test]
fn test_list_organizations_sorted_by_name() {
    let mut persistence = create_test_persistence();
    for name in ["Initech", "Acme Corp", "Globex"] {
        create_test_organization(&mut persistence, name);
    }

    let names: Vec<String> = persistence
        .list_organizations(&PredicateSet::unrestricted(), Page::default())
        .unwrap()
        .into_iter()
        .map(|o| o.name)
        .collect();

    assert_eq!(names, vec!["Acme Corp", "Globex", "Initech"]);
}

#[test]
fn test_list_organizations_respects_visibility() {
    let mut persistence = create_test_persistence();
    create_test_organization(&mut persistence, "Acme Corp");
    let trashed = create_test_organization(&mut persistence, "Globex");
    trash_organization(&mut persistence, trashed);

    let public = persistence
        .list_organizations(
            &VisibilityPolicy::resolve_standalone(
                Privilege::Anonymous,
                &StateFilter {
                    deleted: Some(true),
                    ..StateFilter::default()
                },
            ),
            Page::default(),
        )
        .unwrap();
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].name, "Acme Corp");

    let only_trashed = persistence
        .list_organizations(
            &VisibilityPolicy::resolve_standalone(
                Privilege::Admin,
                &StateFilter {
                    deleted: Some(true),
                    ..StateFilter::default()
                },
            ),
            Page::default(),
        )
        .unwrap();
    assert_eq!(only_trashed.len(), 1);
    assert_eq!(only_trashed[0].organization_id, trashed);
}

#[test]
fn test_list_organizations_paginates() {
    let mut persistence = create_test_persistence();
    for name in ["A", "B", "C", "D", "E"] {
        create_test_organization(&mut persistence, name);
    }

    let names: Vec<String> = persistence
        .list_organizations(&PredicateSet::unrestricted(), Page::new(Some(1), Some(2)))
        .unwrap()
        .into_iter()
        .map(|o| o.name)
        .collect();

    assert_eq!(names, vec!["B", "C"]);
}

#[test]
fn test_update_organization_overwrites_and_restores() {
    let mut persistence = create_test_persistence();
    let organization_id = create_test_organization(&mut persistence, "Acme Corp");
    trash_organization(&mut persistence, organization_id);

    let mut organization = persistence
        .get_any_organization_by_id(organization_id)
        .unwrap();
    organization.name = String::from("Acme Inc");
    organization.website = None;
    organization.deleted_at = None;

    let updated = persistence.update_organization(&organization).unwrap();

    assert_eq!(updated.name, "Acme Inc");
    assert_eq!(updated.website, None);
    assert_eq!(updated.deleted_at, None);
    assert!(updated.updated_at >= updated.created_at);
    assert!(persistence.get_organization_by_id(organization_id).is_ok());
}

#[test]
fn test_update_missing_organization_not_found() {
    let mut persistence = create_test_persistence();
    let mut organization = draft_organization("Nobody");
    organization.organization_id = 77;

    assert!(matches!(
        persistence.update_organization(&organization),
        Err(PersistenceError::NotFound(_))
    ));
}

#[test]
fn test_delete_unreferenced_organization() {
    let mut persistence = create_test_persistence();
    let organization_id = create_test_organization(&mut persistence, "Acme Corp");

    persistence.delete_organization(organization_id).unwrap();

    assert!(matches!(
        persistence.get_any_organization_by_id(organization_id),
        Err(PersistenceError::NotFound(_))
    ));
    assert!(matches!(
        persistence.delete_organization(organization_id),
        Err(PersistenceError::NotFound(_))
    ));
}

#[test]
fn test_delete_referenced_organization_refused() {
    let mut persistence = create_test_persistence();
    let organization_id = create_test_organization(&mut persistence, "Acme Corp");
    let experience = persistence
        .create_experience(&draft_experience(
            organization_id,
            "Engineer",
            date!(2020 - 01 - 01),
            None,
        ))
        .unwrap();
    persistence
        .create_education(&draft_education(organization_id, 2010, Some(2014)))
        .unwrap();

    assert_eq!(
        persistence.delete_organization(organization_id),
        Err(PersistenceError::OrganizationReferenced {
            organization_id,
            dependents: 2,
        })
    );

    // Trashed dependents still count.
    let mut record = experience.record;
    record.deleted_at = Some(folio_domain::timestamp_now());
    persistence.update_experience(&record).unwrap();
    assert!(persistence.delete_organization(organization_id).is_err());
    assert!(persistence.get_any_organization_by_id(organization_id).is_ok());
}
