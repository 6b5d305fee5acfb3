// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write paths.
//!
//! Every mutation stamps `updated_at` itself and returns the row as stored,
//! re-read without visibility restrictions.

pub mod educations;
pub mod experiences;
pub mod organizations;
pub mod profiles;
pub mod users;
