// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Visibility policy for soft-deleted records.
//!
//! The policy turns a caller's privilege and the optional `deleted` /
//! `orphans` filters into an ordered set of predicates. The persistence
//! layer renders the set into a `WHERE` clause; the same set can also be
//! evaluated in memory against a [`RecordState`].
//!
//! Non-admin callers always get the active-only set. Their filters are
//! accepted and ignored so every client can send the same query string.

use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::state::RecordState;

/// How much of the stored state a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// No session.
    Anonymous,
    /// A signed-in, non-admin user.
    Authenticated,
    /// A signed-in administrator.
    Admin,
}

impl Privilege {
    /// Whether the caller is an administrator.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// How two predicates are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combinator {
    /// Both predicates must hold.
    #[default]
    And,
    /// Either predicate may hold.
    Or,
}

impl Combinator {
    /// The SQL keyword for this combinator.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => write!(f, "and"),
            Self::Or => write!(f, "or"),
        }
    }
}

impl FromStr for Combinator {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            other => Err(DomainError::InvalidField {
                field: "op",
                reason: format!("'{other}' is not one of 'and', 'or'"),
            }),
        }
    }
}

/// Filters a caller may attach to a list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateFilter {
    /// `Some(true)` selects trashed records, `Some(false)` untrashed ones.
    pub deleted: Option<bool>,
    /// `Some(true)` selects records whose parent is trashed,
    /// `Some(false)` those whose parent is not.
    pub orphans: Option<bool>,
    /// Joins the two filters when both are present.
    pub combinator: Combinator,
}

/// A single visibility predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    /// The record's own `deleted_at` is set (`true`) or unset (`false`).
    Trashed(bool),
    /// The parent's `deleted_at` is set (`true`) or unset (`false`).
    ParentTrashed(bool),
}

impl Predicate {
    /// Renders the predicate as a SQL fragment.
    ///
    /// `own` and `parent` are table names, never user input.
    #[must_use]
    pub fn to_sql(self, own: &str, parent: &str) -> String {
        let (table, deleted): (&str, bool) = match self {
            Self::Trashed(deleted) => (own, deleted),
            Self::ParentTrashed(deleted) => (parent, deleted),
        };
        if deleted {
            format!("{table}.deleted_at IS NOT NULL")
        } else {
            format!("{table}.deleted_at IS NULL")
        }
    }

    /// Evaluates the predicate against a derived state.
    #[must_use]
    pub const fn admits(self, state: RecordState) -> bool {
        match self {
            Self::Trashed(deleted) => state.trashed == deleted,
            Self::ParentTrashed(deleted) => state.orphaned == deleted,
        }
    }
}

/// An ordered list of predicates and the combinator joining them.
///
/// An empty set places no restriction at all.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PredicateSet {
    predicates: Vec<Predicate>,
    combinator: Combinator,
}

impl PredicateSet {
    /// A set that admits every record.
    #[must_use]
    pub const fn unrestricted() -> Self {
        Self {
            predicates: Vec::new(),
            combinator: Combinator::And,
        }
    }

    /// A set that admits only records whose own and parent timestamps are
    /// both unset.
    #[must_use]
    pub fn active_only() -> Self {
        Self {
            predicates: vec![Predicate::Trashed(false), Predicate::ParentTrashed(false)],
            combinator: Combinator::And,
        }
    }

    /// A set for records without a parent: only the record's own state
    /// counts.
    #[must_use]
    pub fn untrashed_only() -> Self {
        Self {
            predicates: vec![Predicate::Trashed(false)],
            combinator: Combinator::And,
        }
    }

    /// The predicates in evaluation order.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// The combinator joining the predicates.
    #[must_use]
    pub const fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// Whether the set places no restriction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Renders the individual SQL fragments in order.
    #[must_use]
    pub fn to_sql_fragments(&self, own: &str, parent: &str) -> Vec<String> {
        self.predicates
            .iter()
            .map(|predicate| predicate.to_sql(own, parent))
            .collect()
    }

    /// Renders the whole set as one parenthesised boolean expression, or
    /// `None` when no `WHERE` clause is needed.
    #[must_use]
    pub fn where_clause(&self, own: &str, parent: &str) -> Option<String> {
        if self.predicates.is_empty() {
            return None;
        }
        let separator: String = format!(" {} ", self.combinator.keyword());
        Some(format!(
            "({})",
            self.to_sql_fragments(own, parent).join(&separator)
        ))
    }

    /// Evaluates the set against a derived state.
    #[must_use]
    pub fn admits(&self, state: RecordState) -> bool {
        match self.combinator {
            Combinator::And => self.predicates.iter().all(|p| p.admits(state)),
            Combinator::Or => {
                self.predicates.is_empty() || self.predicates.iter().any(|p| p.admits(state))
            }
        }
    }
}

/// Maps caller privilege and filters to a predicate set.
pub struct VisibilityPolicy;

impl VisibilityPolicy {
    /// Resolves the predicates for a dependent record joined with its
    /// parent.
    ///
    /// Non-admins are pinned to the active-only set whatever they ask for.
    /// Admins get one predicate per supplied filter; with a single filter
    /// the combinator has no effect.
    #[must_use]
    pub fn resolve(privilege: Privilege, filter: &StateFilter) -> PredicateSet {
        if !privilege.is_admin() {
            return PredicateSet::active_only();
        }

        let mut predicates: Vec<Predicate> = Vec::with_capacity(2);
        if let Some(deleted) = filter.deleted {
            predicates.push(Predicate::Trashed(deleted));
        }
        if let Some(orphans) = filter.orphans {
            predicates.push(Predicate::ParentTrashed(orphans));
        }

        PredicateSet {
            predicates,
            combinator: filter.combinator,
        }
    }

    /// Resolves the predicates for a record without a parent.
    ///
    /// The `orphans` filter is meaningless here and is ignored.
    #[must_use]
    pub fn resolve_standalone(privilege: Privilege, filter: &StateFilter) -> PredicateSet {
        if !privilege.is_admin() {
            return PredicateSet::untrashed_only();
        }

        filter.deleted.map_or_else(PredicateSet::unrestricted, |deleted| PredicateSet {
            predicates: vec![Predicate::Trashed(deleted)],
            combinator: filter.combinator,
        })
    }
}
