// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors that can occur during domain validation.
///
/// Every variant names the field that failed so the API boundary can report
/// it back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A required text field is empty or whitespace only.
    #[error("{field} must not be empty")]
    EmptyField {
        /// The offending field.
        field: &'static str,
    },
    /// A text field exceeds its maximum length.
    #[error("{field} is too long: {length} characters, maximum is {max}")]
    FieldTooLong {
        /// The offending field.
        field: &'static str,
        /// The observed length in characters.
        length: usize,
        /// The maximum permitted length.
        max: usize,
    },
    /// A field value is malformed.
    #[error("{field} is invalid: {reason}")]
    InvalidField {
        /// The offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// An end value precedes its start value after merging.
    #[error("{field} ({end}) may not precede {start_field} ({start})")]
    EndBeforeStart {
        /// The end field that failed.
        field: &'static str,
        /// The start field it was compared against.
        start_field: &'static str,
        /// The start value, rendered.
        start: String,
        /// The end value, rendered.
        end: String,
    },
    /// A year lies outside the accepted range.
    #[error("{field} {year} is outside the accepted range {min}..={max}")]
    YearOutOfRange {
        /// The offending field.
        field: &'static str,
        /// The rejected year.
        year: i32,
        /// Lowest accepted year.
        min: i32,
        /// Highest accepted year.
        max: i32,
    },
}

impl DomainError {
    /// Returns the name of the field this error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyField { field }
            | Self::FieldTooLong { field, .. }
            | Self::InvalidField { field, .. }
            | Self::EndBeforeStart { field, .. }
            | Self::YearOutOfRange { field, .. } => field,
        }
    }
}
