#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PasswordPolicyError {
    #[error("Password must be at least 8 characters long")]
    TooShort,

    #[error("Password must be at most 128 characters long")]
    TooLong,

    #[error("Password must contain at least one letter and one number")]
    MissingCharacterClass,
}

pub struct PasswordPolicy;

impl PasswordPolicy {
    pub fn validate(password: &str) -> Result<(), PasswordPolicyError> {
        if password.len() < 8 {
            return Err(PasswordPolicyError::TooShort);
        }

        if password.len() > 128 {
            return Err(PasswordPolicyError::TooLong);
        }

        let has_letter = password.chars().any(|c| c.is_alphabetic());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        if !has_letter || !has_digit {
            return Err(PasswordPolicyError::MissingCharacterClass);
        }

        Ok(())
    }
}
