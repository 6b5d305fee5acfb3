// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.
//!
//! Every other persistence test opens its own database through
//! `new_in_memory`, so connection setup and migrations are exercised
//! throughout. The tests here pin the properties the rest rely on.

use folio_domain::{Page, PredicateSet};
use time::macros::date;

use super::{create_test_organization, create_test_persistence, draft_experience};
use crate::error::PersistenceError;
use crate::{Persistence, SqlitePersistence};

#[test]
fn test_persistence_initialization() {
    let result: Result<SqlitePersistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = create_test_persistence();
    let mut db2 = create_test_persistence();

    create_test_organization(&mut db1, "Only In One");

    let in_db1 = db1
        .list_organizations(&PredicateSet::unrestricted(), Page::default())
        .unwrap();
    let in_db2 = db2
        .list_organizations(&PredicateSet::unrestricted(), Page::default())
        .unwrap();

    assert_eq!(in_db1.len(), 1);
    assert!(in_db2.is_empty());
}

#[test]
fn test_foreign_key_enforcement_enabled() {
    let mut persistence = create_test_persistence();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_dependent_insert_rejected_without_parent() {
    let mut persistence = create_test_persistence();

    let result = persistence.create_experience(&draft_experience(
        999,
        "Ghost",
        date!(2020 - 01 - 01),
        None,
    ));

    assert!(matches!(
        result,
        Err(PersistenceError::ForeignKeyViolation(_))
    ));
}

#[test]
fn test_file_database_persists_across_connections() {
    let path = std::env::temp_dir().join(format!(
        "folio_persistence_test_{}.db",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&path);

    {
        let mut persistence = Persistence::new_with_file(&path).unwrap();
        create_test_organization(&mut persistence, "Durable");
    }

    let mut reopened = Persistence::new_with_file(&path).unwrap();
    let organizations = reopened
        .list_organizations(&PredicateSet::unrestricted(), Page::default())
        .unwrap();
    assert_eq!(organizations.len(), 1);
    assert_eq!(organizations[0].name, "Durable");

    drop(reopened);
    let _ = std::fs::remove_file(&path);
    let _ = std::fs::remove_file(path.with_extension("db-wal"));
    let _ = std::fs::remove_file(path.with_extension("db-shm"));
}
