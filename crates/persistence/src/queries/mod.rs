// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read paths.
//!
//! Dependent records are always read joined with their organization. The
//! visibility predicates produced by the domain policy are rendered into
//! the `WHERE` clause against the table names below, so those names must
//! match `diesel_schema`.

pub mod educations;
pub mod experiences;
pub mod organizations;
pub mod profiles;
pub mod users;

/// SQL name of the organizations table.
pub(crate) const ORGANIZATIONS: &str = "organizations";
/// SQL name of the experiences table.
pub(crate) const EXPERIENCES: &str = "experiences";
/// SQL name of the educations table.
pub(crate) const EDUCATIONS: &str = "educations";
