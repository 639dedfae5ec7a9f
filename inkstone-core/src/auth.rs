//! Validated credential fields for registration and login

use crate::ValidationError;

const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 64;
const MIN_PASSWORD_LEN: usize = 6;
const MAX_PASSWORD_LEN: usize = 128;
const MAX_EMAIL_LEN: usize = 254;

/// Validated username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// # Rules
    /// - Non-empty after trimming
    /// - 3 to 64 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "username" });
        }
        if trimmed.chars().count() < MIN_USERNAME_LEN {
            return Err(ValidationError::TooShort {
                field: "username",
                min: MIN_USERNAME_LEN,
            });
        }
        if trimmed.chars().count() > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: MAX_USERNAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Validated email address.
///
/// Syntactic plausibility only: one `@` with a dotted, whitespace-free
/// domain. Deliverability is not this layer's problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }
        if trimmed.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }

        let invalid = ValidationError::InvalidFormat {
            field: "email",
            reason: "not a valid email address",
        };

        if trimmed.chars().any(char::is_whitespace) {
            return Err(invalid);
        }
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(invalid);
        };
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(invalid);
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(invalid);
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// Validated plaintext password, pre-hash. Never trimmed: leading and
/// trailing whitespace is significant in a password.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    pub fn new(s: String) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }
        if s.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::TooShort {
                field: "password",
                min: MIN_PASSWORD_LEN,
            });
        }
        if s.chars().count() > MAX_PASSWORD_LEN {
            return Err(ValidationError::TooLong {
                field: "password",
                max: MAX_PASSWORD_LEN,
            });
        }

        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep password material out of debug output.
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(Username::new("mahadi").is_ok());
        assert_eq!(Username::new("  padded  ").unwrap().as_str(), "padded");
        assert!(matches!(
            Username::new("").unwrap_err(),
            ValidationError::Empty { .. }
        ));
        assert!(matches!(
            Username::new("ab").unwrap_err(),
            ValidationError::TooShort { min: 3, .. }
        ));
        assert!(Username::new(&"x".repeat(65)).is_err());
    }

    #[test]
    fn email_accepts_plausible_addresses() {
        assert!(EmailAddress::new("a@b.co").is_ok());
        assert!(EmailAddress::new("first.last+tag@sub.example.com").is_ok());
    }

    #[test]
    fn email_rejects_malformed_addresses() {
        for bad in [
            "", "plain", "@no-local.com", "no-domain@", "two@@ats.com",
            "spaces in@mail.com", "nodot@domain", "dot@.leading", "dot@trailing.",
        ] {
            assert!(EmailAddress::new(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn password_rules() {
        assert!(Password::new("secret".into()).is_ok());
        assert!(matches!(
            Password::new("12345".into()).unwrap_err(),
            ValidationError::TooShort { min: 6, .. }
        ));
        assert!(Password::new("x".repeat(129)).is_err());
    }

    #[test]
    fn password_keeps_whitespace() {
        let p = Password::new("  spaced  ".into()).unwrap();
        assert_eq!(p.as_str(), "  spaced  ");
    }

    #[test]
    fn password_debug_is_masked() {
        let p = Password::new("hunter2x".into()).unwrap();
        assert_eq!(format!("{:?}", p), "Password(***)");
    }
}
