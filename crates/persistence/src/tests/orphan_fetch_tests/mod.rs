// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Join-based reads of experience and education entries.
//!
//! The fixture holds one record in each of the four states: active,
//! trashed, orphaned, and trashed under a trashed organization.

use folio_domain::{
    Combinator, Dependent, Education, Experience, Page, PredicateSet, Privilege, StateFilter,
    VisibilityPolicy, timestamp_now,
};
use time::macros::date;

use super::{
    create_test_organization, create_test_persistence, draft_education, draft_experience,
    trash_organization,
};
use crate::Persistence;
use crate::error::PersistenceError;

struct Fixture {
    persistence: Persistence,
    active: i64,
    trashed: i64,
    orphaned: i64,
    trashed_and_orphaned: i64,
}

fn trash_experience(persistence: &mut Persistence, experience_id: i64) {
    let mut record: Experience = persistence
        .get_any_experience_by_id(experience_id)
        .unwrap()
        .record;
    record.deleted_at = Some(timestamp_now());
    persistence.update_experience(&record).unwrap();
}

fn experience_fixture() -> Fixture {
    let mut persistence = create_test_persistence();
    let live_org = create_test_organization(&mut persistence, "Live Org");
    let dead_org = create_test_organization(&mut persistence, "Dead Org");

    let mut create = |organization_id: i64, title: &str, year: i32| -> i64 {
        let start = time::Date::from_calendar_date(year, time::Month::January, 1).unwrap();
        persistence
            .create_experience(&draft_experience(organization_id, title, start, None))
            .unwrap()
            .record
            .experience_id
    };
    let active = create(live_org, "active", 2020);
    let trashed = create(live_org, "trashed", 2019);
    let orphaned = create(dead_org, "orphaned", 2018);
    let trashed_and_orphaned = create(dead_org, "trashed_and_orphaned", 2017);

    trash_experience(&mut persistence, trashed);
    trash_experience(&mut persistence, trashed_and_orphaned);
    trash_organization(&mut persistence, dead_org);

    Fixture {
        persistence,
        active,
        trashed,
        orphaned,
        trashed_and_orphaned,
    }
}

fn listed_ids(persistence: &mut Persistence, predicates: &PredicateSet) -> Vec<i64> {
    let mut ids: Vec<i64> = persistence
        .list_experiences(predicates, Page::default())
        .unwrap()
        .into_iter()
        .map(|d| d.record.experience_id)
        .collect();
    ids.sort_unstable();
    ids
}

fn admin(deleted: Option<bool>, orphans: Option<bool>, combinator: Combinator) -> PredicateSet {
    VisibilityPolicy::resolve(
        Privilege::Admin,
        &StateFilter {
            deleted,
            orphans,
            combinator,
        },
    )
}

#[test]
fn test_get_by_id_returns_active_record_with_organization() {
    let mut fixture = experience_fixture();

    let dependent: Dependent<Experience> = fixture
        .persistence
        .get_experience_by_id(fixture.active)
        .unwrap();

    assert_eq!(dependent.record.title, "active");
    assert_eq!(dependent.organization.name, "Live Org");
    assert_eq!(
        dependent.organization.organization_id,
        dependent.record.organization_id
    );
    assert!(dependent.state().is_active());
}

#[test]
fn test_get_by_id_hides_trashed_and_orphaned_records() {
    let mut fixture = experience_fixture();

    for id in [
        fixture.trashed,
        fixture.orphaned,
        fixture.trashed_and_orphaned,
    ] {
        assert!(matches!(
            fixture.persistence.get_experience_by_id(id),
            Err(PersistenceError::NotFound(_))
        ));
        assert!(fixture.persistence.get_any_experience_by_id(id).is_ok());
    }
}

#[test]
fn test_filtered_out_and_absent_are_indistinguishable() {
    let mut fixture = experience_fixture();

    let filtered = fixture.persistence.get_experience_by_id(fixture.trashed);
    let absent = fixture.persistence.get_experience_by_id(9_999);

    assert!(matches!(filtered, Err(PersistenceError::NotFound(_))));
    assert!(matches!(absent, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_get_any_by_id_reports_derived_state() {
    let mut fixture = experience_fixture();

    let both = fixture
        .persistence
        .get_any_experience_by_id(fixture.trashed_and_orphaned)
        .unwrap();
    assert!(both.state().trashed);
    assert!(both.state().orphaned);

    let orphan = fixture
        .persistence
        .get_any_experience_by_id(fixture.orphaned)
        .unwrap();
    assert!(!orphan.state().trashed);
    assert!(orphan.state().orphaned);
}

#[test]
fn test_non_admin_list_matches_admin_active_filter() {
    let mut fixture = experience_fixture();

    let admin_active = listed_ids(
        &mut fixture.persistence,
        &admin(Some(false), Some(false), Combinator::And),
    );
    assert_eq!(admin_active, vec![fixture.active]);

    for privilege in [Privilege::Anonymous, Privilege::Authenticated] {
        for requested in [
            StateFilter::default(),
            StateFilter {
                deleted: Some(true),
                orphans: Some(true),
                combinator: Combinator::Or,
            },
        ] {
            let predicates = VisibilityPolicy::resolve(privilege, &requested);
            assert_eq!(
                listed_ids(&mut fixture.persistence, &predicates),
                admin_active
            );
        }
    }
}

#[test]
fn test_admin_without_filters_sees_everything() {
    let mut fixture = experience_fixture();

    let mut expected = vec![
        fixture.active,
        fixture.trashed,
        fixture.orphaned,
        fixture.trashed_and_orphaned,
    ];
    expected.sort_unstable();

    assert_eq!(
        listed_ids(&mut fixture.persistence, &admin(None, None, Combinator::And)),
        expected
    );
}

#[test]
fn test_admin_single_filters() {
    let mut fixture = experience_fixture();

    let mut trashed = vec![fixture.trashed, fixture.trashed_and_orphaned];
    trashed.sort_unstable();
    assert_eq!(
        listed_ids(&mut fixture.persistence, &admin(Some(true), None, Combinator::Or)),
        trashed
    );

    let mut orphans = vec![fixture.orphaned, fixture.trashed_and_orphaned];
    orphans.sort_unstable();
    assert_eq!(
        listed_ids(&mut fixture.persistence, &admin(None, Some(true), Combinator::And)),
        orphans
    );
}

#[test]
fn test_admin_combined_filters() {
    let mut fixture = experience_fixture();

    assert_eq!(
        listed_ids(
            &mut fixture.persistence,
            &admin(Some(true), Some(true), Combinator::And)
        ),
        vec![fixture.trashed_and_orphaned]
    );

    let mut either = vec![
        fixture.trashed,
        fixture.orphaned,
        fixture.trashed_and_orphaned,
    ];
    either.sort_unstable();
    assert_eq!(
        listed_ids(
            &mut fixture.persistence,
            &admin(Some(true), Some(true), Combinator::Or)
        ),
        either
    );

    assert_eq!(
        listed_ids(
            &mut fixture.persistence,
            &admin(Some(false), Some(true), Combinator::And)
        ),
        vec![fixture.orphaned]
    );
}

#[test]
fn test_list_results_agree_with_in_memory_evaluation() {
    let mut fixture = experience_fixture();
    let all = fixture
        .persistence
        .list_experiences(&PredicateSet::unrestricted(), Page::default())
        .unwrap();

    for deleted in [None, Some(false), Some(true)] {
        for orphans in [None, Some(false), Some(true)] {
            for combinator in [Combinator::And, Combinator::Or] {
                let predicates = admin(deleted, orphans, combinator);
                let mut expected: Vec<i64> = all
                    .iter()
                    .filter(|d| predicates.admits(d.state()))
                    .map(|d| d.record.experience_id)
                    .collect();
                expected.sort_unstable();
                assert_eq!(
                    listed_ids(&mut fixture.persistence, &predicates),
                    expected,
                    "deleted={deleted:?} orphans={orphans:?} op={combinator}"
                );
            }
        }
    }
}

#[test]
fn test_experience_list_order() {
    let mut persistence = create_test_persistence();
    let organization_id = create_test_organization(&mut persistence, "Acme Corp");
    let rows = [
        ("old", date!(2010 - 01 - 01), Some(date!(2012 - 06 - 30))),
        ("current", date!(2021 - 03 - 01), None),
        ("recent", date!(2016 - 01 - 01), Some(date!(2021 - 02 - 28))),
        ("side", date!(2022 - 01 - 01), None),
    ];
    for (title, start, end) in rows {
        persistence
            .create_experience(&draft_experience(organization_id, title, start, end))
            .unwrap();
    }

    let titles: Vec<String> = persistence
        .list_experiences(&PredicateSet::active_only(), Page::default())
        .unwrap()
        .into_iter()
        .map(|d| d.record.title)
        .collect();

    assert_eq!(titles, vec!["side", "current", "recent", "old"]);
}

#[test]
fn test_education_list_order() {
    let mut persistence = create_test_persistence();
    let organization_id = create_test_organization(&mut persistence, "State University");
    let rows = [
        (2013, Some(2014)),
        (2016, None),
        (2011, Some(2013)),
        (2015, Some(2016)),
        (2017, None),
        (2014, Some(2016)),
    ];
    for (start_year, end_year) in rows {
        persistence
            .create_education(&draft_education(organization_id, start_year, end_year))
            .unwrap();
    }

    let years: Vec<(i32, Option<i32>)> = persistence
        .list_educations(&PredicateSet::active_only(), Page::default())
        .unwrap()
        .into_iter()
        .map(|d| (d.record.start_year, d.record.end_year))
        .collect();

    assert_eq!(
        years,
        vec![
            (2017, None),
            (2016, None),
            (2015, Some(2016)),
            (2014, Some(2016)),
            (2013, Some(2014)),
            (2011, Some(2013)),
        ]
    );
}

#[test]
fn test_education_visibility_follows_parent() {
    let mut persistence = create_test_persistence();
    let organization_id = create_test_organization(&mut persistence, "State University");
    let education: Dependent<Education> = persistence
        .create_education(&draft_education(organization_id, 2010, Some(2014)))
        .unwrap();
    let education_id = education.record.education_id;

    assert!(persistence.get_education_by_id(education_id).is_ok());

    trash_organization(&mut persistence, organization_id);

    assert!(matches!(
        persistence.get_education_by_id(education_id),
        Err(PersistenceError::NotFound(_))
    ));
    let any = persistence.get_any_education_by_id(education_id).unwrap();
    assert!(any.state().orphaned);
    assert!(!any.state().trashed);
    assert!(
        persistence
            .list_educations(&PredicateSet::active_only(), Page::default())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_reparenting_moves_record_between_organizations() {
    let mut persistence = create_test_persistence();
    let first = create_test_organization(&mut persistence, "First");
    let second = create_test_organization(&mut persistence, "Second");
    let created = persistence
        .create_experience(&draft_experience(
            first,
            "Engineer",
            date!(2020 - 01 - 01),
            None,
        ))
        .unwrap();

    let mut record = created.record;
    record.organization_id = second;
    let updated = persistence.update_experience(&record).unwrap();

    assert_eq!(updated.record.organization_id, second);
    assert_eq!(updated.organization.name, "Second");

    trash_organization(&mut persistence, first);
    assert!(
        persistence
            .get_experience_by_id(record.experience_id)
            .is_ok()
    );
}

#[test]
fn test_delete_dependents() {
    let mut persistence = create_test_persistence();
    let organization_id = create_test_organization(&mut persistence, "Acme Corp");
    let experience_id = persistence
        .create_experience(&draft_experience(
            organization_id,
            "Engineer",
            date!(2020 - 01 - 01),
            None,
        ))
        .unwrap()
        .record
        .experience_id;
    let education_id = persistence
        .create_education(&draft_education(organization_id, 2010, None))
        .unwrap()
        .record
        .education_id;

    persistence.delete_experience(experience_id).unwrap();
    persistence.delete_education(education_id).unwrap();

    assert!(matches!(
        persistence.get_any_experience_by_id(experience_id),
        Err(PersistenceError::NotFound(_))
    ));
    assert!(matches!(
        persistence.delete_education(education_id),
        Err(PersistenceError::NotFound(_))
    ));
    persistence.delete_organization(organization_id).unwrap();
}
