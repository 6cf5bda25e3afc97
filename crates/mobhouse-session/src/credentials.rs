//! Sign-in and sign-up forms and the credentials they produce.
//!
//! The forms hold exactly what the viewer typed. [`Credentials`] can only
//! be built by validating a form, so anything that reaches an
//! [`Authenticator`](crate::Authenticator) has already passed the local
//! checks.

use std::fmt;

use crate::CredentialError;

/// Raw input from the "Sign In" tab.
#[derive(Debug, Clone, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    /// Checks the form and produces credentials.
    ///
    /// # Errors
    /// - [`CredentialError::MissingField`] for a blank email or password
    /// - [`CredentialError::InvalidEmail`] for a malformed address
    pub fn validate(&self) -> Result<Credentials, CredentialError> {
        let email = validate_email(&self.email)?;
        require(&self.password, "password")?;

        Ok(Credentials {
            email,
            password: self.password.clone(),
            name: None,
        })
    }
}

/// Raw input from the "Sign Up" tab.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    /// Checks the form and produces credentials.
    ///
    /// # Errors
    /// - [`CredentialError::MissingField`] for any blank field
    /// - [`CredentialError::InvalidEmail`] for a malformed address
    /// - [`CredentialError::PasswordMismatch`] when the confirmation differs
    pub fn validate(&self) -> Result<Credentials, CredentialError> {
        let name = require(&self.name, "name")?;
        let email = validate_email(&self.email)?;
        require(&self.password, "password")?;
        require(&self.confirm_password, "password confirmation")?;

        if self.password != self.confirm_password {
            return Err(CredentialError::PasswordMismatch);
        }

        Ok(Credentials {
            email,
            password: self.password.clone(),
            name: Some(name),
        })
    }
}

/// Validated credentials, ready for an authenticator.
///
/// `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
    /// Present for sign-ups only.
    name: Option<String>,
}

impl Credentials {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// The full name given on sign-up, `None` for a plain sign-in.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_sign_up(&self) -> bool {
        self.name.is_some()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

fn require(value: &str, field: &'static str) -> Result<String, CredentialError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CredentialError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn validate_email(raw: &str) -> Result<String, CredentialError> {
    let email = require(raw, "email")?;
    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(email)
        }
        _ => Err(CredentialError::InvalidEmail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(password: &str, confirm: &str) -> SignUpForm {
        SignUpForm {
            name: "Achieng Odhiambo".into(),
            email: "achieng@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    // =====================================================================
    // SignInForm
    // =====================================================================

    #[test]
    fn test_sign_in_valid_form_returns_credentials() {
        let form = SignInForm {
            email: " kamau@example.com ".into(),
            password: "hunter2".into(),
        };

        let creds = form.validate().expect("should validate");

        assert_eq!(creds.email(), "kamau@example.com");
        assert_eq!(creds.password(), "hunter2");
        assert!(!creds.is_sign_up());
        assert_eq!(creds.name(), None);
    }

    #[test]
    fn test_sign_in_blank_password_returns_missing_field() {
        let form = SignInForm {
            email: "kamau@example.com".into(),
            password: "   ".into(),
        };

        assert_eq!(
            form.validate(),
            Err(CredentialError::MissingField("password"))
        );
    }

    #[test]
    fn test_sign_in_email_without_at_returns_invalid_email() {
        let form = SignInForm {
            email: "kamau.example.com".into(),
            password: "pw".into(),
        };

        assert_eq!(form.validate(), Err(CredentialError::InvalidEmail));
    }

    #[test]
    fn test_sign_in_email_with_empty_local_part_returns_invalid_email() {
        let form = SignInForm {
            email: "@example.com".into(),
            password: "pw".into(),
        };

        assert_eq!(form.validate(), Err(CredentialError::InvalidEmail));
    }

    // =====================================================================
    // SignUpForm
    // =====================================================================

    #[test]
    fn test_sign_up_matching_passwords_returns_credentials_with_name() {
        let creds = sign_up("secret", "secret").validate().unwrap();

        assert!(creds.is_sign_up());
        assert_eq!(creds.name(), Some("Achieng Odhiambo"));
    }

    #[test]
    fn test_sign_up_mismatched_passwords_returns_mismatch() {
        let result = sign_up("secret", "secrte").validate();

        assert_eq!(result, Err(CredentialError::PasswordMismatch));
    }

    #[test]
    fn test_sign_up_blank_name_returns_missing_field() {
        let mut form = sign_up("secret", "secret");
        form.name = String::new();

        assert_eq!(form.validate(), Err(CredentialError::MissingField("name")));
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = sign_up("topsecret", "topsecret").validate().unwrap();

        let printed = format!("{creds:?}");

        assert!(!printed.contains("topsecret"));
        assert!(printed.contains("<redacted>"));
    }
}
