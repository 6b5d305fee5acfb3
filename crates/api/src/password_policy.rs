// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy for user accounts.

use thiserror::Error;

/// Password policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error("Password must be at least {min_length} characters long")]
    TooShort { min_length: usize },

    /// Password exceeds what bcrypt will hash without truncation.
    #[error("Password must be at most {max_bytes} bytes long")]
    TooLong { max_bytes: usize },

    /// Password does not meet complexity requirements.
    #[error(
        "Password must contain at least {required} of the following: uppercase letter, lowercase letter, digit, symbol (found {found})"
    )]
    InsufficientComplexity { required: usize, found: usize },

    /// Password matches a forbidden value.
    #[error("Password must not match {field}")]
    MatchesForbiddenField { field: String },

    /// Password and confirmation do not match.
    #[error("Password and confirmation do not match")]
    ConfirmationMismatch,
}

/// Password policy configuration.
pub struct PasswordPolicy {
    /// Minimum password length in characters.
    pub min_length: usize,
    /// Minimum number of character classes required (out of 4).
    pub min_complexity: usize,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 12,
            min_complexity: 3,
        }
    }
}

impl PasswordPolicy {
    /// bcrypt only reads the first 72 bytes of its input.
    pub const MAX_BYTES: usize = 72;

    /// Validates a password for a new account.
    ///
    /// The password may not equal (ignoring case) the account's username,
    /// email or display name.
    ///
    /// # Errors
    ///
    /// Returns a `PasswordPolicyError` describing the first rule broken.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        forbidden: &[(&str, &str)],
    ) -> Result<(), PasswordPolicyError> {
        if password != confirmation {
            return Err(PasswordPolicyError::ConfirmationMismatch);
        }

        if password.chars().count() < self.min_length {
            return Err(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        if password.len() > Self::MAX_BYTES {
            return Err(PasswordPolicyError::TooLong {
                max_bytes: Self::MAX_BYTES,
            });
        }

        let complexity: usize = Self::calculate_complexity(password);
        if complexity < self.min_complexity {
            return Err(PasswordPolicyError::InsufficientComplexity {
                required: self.min_complexity,
                found: complexity,
            });
        }

        let password_lower: String = password.to_lowercase();
        if let Some((field, _)) = forbidden
            .iter()
            .find(|(_, value)| value.to_lowercase() == password_lower)
        {
            return Err(PasswordPolicyError::MatchesForbiddenField {
                field: (*field).to_string(),
            });
        }

        Ok(())
    }

    /// Counts the character classes present: uppercase, lowercase, digit
    /// and anything else that is not whitespace.
    fn calculate_complexity(password: &str) -> usize {
        let has_uppercase: bool = password.chars().any(char::is_uppercase);
        let has_lowercase: bool = password.chars().any(char::is_lowercase);
        let has_digit: bool = password.chars().any(|c| c.is_ascii_digit());
        let has_symbol: bool = password
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace());

        [has_uppercase, has_lowercase, has_digit, has_symbol]
            .into_iter()
            .filter(|present| *present)
            .count()
    }
}
