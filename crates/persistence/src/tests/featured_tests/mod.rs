// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Featured-profile swap tests.

use diesel::prelude::*;
use folio_domain::Profile;

use super::{create_test_persistence, create_test_user};
use crate::Persistence;
use crate::diesel_schema::profiles;
use crate::error::PersistenceError;

fn featured_count(persistence: &mut Persistence) -> i64 {
    profiles::table
        .filter(profiles::is_featured.eq(true))
        .count()
        .get_result(&mut persistence.conn)
        .unwrap()
}

fn three_profiles(persistence: &mut Persistence) -> (i64, i64, i64) {
    let (_, a) = create_test_user(persistence, "alice");
    let (_, b) = create_test_user(persistence, "bob");
    let (_, c) = create_test_user(persistence, "carol");
    (a.profile_id, b.profile_id, c.profile_id)
}

#[test]
fn test_new_profiles_are_never_considered() {
    let mut persistence = create_test_persistence();
    let (_, profile) = create_test_user(&mut persistence, "alice");

    assert_eq!(profile.is_featured, None);
    assert!(matches!(
        persistence.get_featured_profile(),
        Err(PersistenceError::NotFound(_))
    ));
}

#[test]
fn test_set_featured_without_holder_updates_one_row() {
    let mut persistence = create_test_persistence();
    let (a, _, _) = three_profiles(&mut persistence);

    let changed: Vec<Profile> = persistence.set_featured(a).unwrap();

    assert_eq!(changed.len(), 1);
    assert_eq!(changed[0].profile_id, a);
    assert_eq!(changed[0].is_featured, Some(true));
    assert_eq!(persistence.get_featured_profile().unwrap().profile_id, a);
    assert_eq!(featured_count(&mut persistence), 1);
}

#[test]
fn test_set_featured_swaps_holder() {
    let mut persistence = create_test_persistence();
    let (a, b, _) = three_profiles(&mut persistence);
    persistence.set_featured(a).unwrap();

    let changed: Vec<Profile> = persistence.set_featured(b).unwrap();

    assert_eq!(changed.len(), 2);
    assert_eq!(changed[0].profile_id, a);
    assert_eq!(changed[0].is_featured, Some(false));
    assert_eq!(changed[1].profile_id, b);
    assert_eq!(changed[1].is_featured, Some(true));
    assert_eq!(persistence.get_profile(a).unwrap().is_featured, Some(false));
    assert_eq!(persistence.get_featured_profile().unwrap().profile_id, b);
    assert_eq!(featured_count(&mut persistence), 1);
}

#[test]
fn test_refeaturing_holder_conflicts_without_writing() {
    let mut persistence = create_test_persistence();
    let (a, b, _) = three_profiles(&mut persistence);
    persistence.set_featured(a).unwrap();
    let holder_before = persistence.get_profile(a).unwrap();
    let other_before = persistence.get_profile(b).unwrap();

    assert_eq!(
        persistence.set_featured(a),
        Err(PersistenceError::AlreadyFeatured { profile_id: a })
    );

    assert_eq!(persistence.get_profile(a).unwrap(), holder_before);
    assert_eq!(persistence.get_profile(b).unwrap(), other_before);
}

#[test]
fn test_set_featured_missing_profile_not_found() {
    let mut persistence = create_test_persistence();
    let (a, _, _) = three_profiles(&mut persistence);
    persistence.set_featured(a).unwrap();

    assert!(matches!(
        persistence.set_featured(9_999),
        Err(PersistenceError::NotFound(_))
    ));
    assert_eq!(persistence.get_featured_profile().unwrap().profile_id, a);
}

#[test]
fn test_invariant_holds_across_sequence() {
    let mut persistence = create_test_persistence();
    let (a, b, c) = three_profiles(&mut persistence);

    let mut previous: Option<i64> = None;
    for target in [a, b, b, c, a, c, c, b] {
        let result = persistence.set_featured(target);
        if previous == Some(target) {
            assert!(matches!(
                result,
                Err(PersistenceError::AlreadyFeatured { profile_id }) if profile_id == target
            ));
        } else {
            assert!(!result.unwrap().is_empty());
        }
        previous = Some(target);
        assert_eq!(featured_count(&mut persistence), 1);
        assert_eq!(persistence.get_featured_profile().unwrap().profile_id, target);
    }
}

#[test]
fn test_unique_index_rejects_second_featured_row() {
    let mut persistence = create_test_persistence();
    let (a, b, _) = three_profiles(&mut persistence);
    persistence.set_featured(a).unwrap();

    let result = diesel::update(profiles::table)
        .filter(profiles::profile_id.eq(b))
        .set(profiles::is_featured.eq(Some(true)))
        .execute(&mut persistence.conn)
        .map_err(PersistenceError::from);

    match result {
        Err(PersistenceError::UniqueViolation { constraint }) => {
            assert!(constraint.contains("profiles.is_featured"), "{constraint}");
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
    assert_eq!(featured_count(&mut persistence), 1);
}

#[test]
fn test_unfeatured_rows_are_not_limited_by_index() {
    let mut persistence = create_test_persistence();
    let (a, b, c) = three_profiles(&mut persistence);

    persistence.set_featured(a).unwrap();
    persistence.set_featured(b).unwrap();
    persistence.set_featured(c).unwrap();

    assert_eq!(persistence.get_profile(a).unwrap().is_featured, Some(false));
    assert_eq!(persistence.get_profile(b).unwrap().is_featured, Some(false));
    assert_eq!(persistence.get_profile(c).unwrap().is_featured, Some(true));
}

#[test]
fn test_failed_swap_rolls_back_entirely() {
    let mut persistence = create_test_persistence();
    let (a, b, _) = three_profiles(&mut persistence);
    persistence.set_featured(a).unwrap();
    let holder_before = persistence.get_profile(a).unwrap();
    let target_before = persistence.get_profile(b).unwrap();

    // Fails the second write of the swap, after the holder was cleared.
    diesel::sql_query(format!(
        "CREATE TRIGGER fail_featuring BEFORE UPDATE OF is_featured ON profiles \
         WHEN NEW.is_featured = 1 AND NEW.profile_id = {b} \
         BEGIN SELECT RAISE(ABORT, 'forced failure'); END"
    ))
    .execute(&mut persistence.conn)
    .unwrap();

    let result = persistence.set_featured(b);

    assert!(matches!(result, Err(PersistenceError::TransactionFailed(_))));
    assert_eq!(persistence.get_profile(a).unwrap(), holder_before);
    assert_eq!(persistence.get_profile(b).unwrap(), target_before);
    assert_eq!(persistence.get_featured_profile().unwrap().profile_id, a);
}

#[test]
fn test_profile_update_leaves_featured_flag() {
    let mut persistence = create_test_persistence();
    let (a, _, _) = three_profiles(&mut persistence);
    persistence.set_featured(a).unwrap();

    let mut profile = persistence.get_profile(a).unwrap();
    profile.headline = Some(String::from("Staff Engineer"));
    profile.is_featured = Some(false);
    let updated = persistence.update_profile(&profile).unwrap();

    assert_eq!(updated.headline.as_deref(), Some("Staff Engineer"));
    assert_eq!(updated.is_featured, Some(true));
}
