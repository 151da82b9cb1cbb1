//! Password policy for new passwords.

use identity_core::config::AuthConfig;
use identity_core::error::AppError;
use identity_core::result::AppResult;

/// Validates password strength at signup.
#[derive(Debug, Clone)]
pub struct PasswordValidator {
    /// Minimum password length in characters.
    min_length: usize,
}

impl PasswordValidator {
    /// Creates a new validator from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            min_length: config.password_min_length,
        }
    }

    /// Checks length and estimated strength.
    ///
    /// `user_inputs` are values the password should not be guessable from,
    /// such as the username and email.
    pub fn validate(&self, password: &str, user_inputs: &[&str]) -> AppResult<()> {
        if password.chars().count() < self.min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters long",
                self.min_length
            )));
        }

        let estimate = zxcvbn::zxcvbn(password, user_inputs);
        if estimate.score() < zxcvbn::Score::Two {
            return Err(AppError::validation(
                "Password is too weak. Please use a stronger password.",
            ));
        }

        Ok(())
    }
}
