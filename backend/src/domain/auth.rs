//! Authentication primitives such as login credentials and registrations.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{Email, FullName, UserId, UserValidationError};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN: usize = 6;

/// Domain error returned when login or registration payloads are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email address did not look like `local@domain.tld`.
    InvalidEmail,
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
    /// Full name shorter than the profile minimum.
    FullNameTooShort { min: usize },
}

impl CredentialsValidationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "email",
            Self::PasswordTooShort { .. } => "password",
            Self::FullNameTooShort { .. } => "fullName",
        }
    }

    /// Stable machine-readable validation code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidEmail => "invalid_email",
            Self::PasswordTooShort { .. } => "password_too_short",
            Self::FullNameTooShort { .. } => "full_name_too_short",
        }
    }
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "Please enter a valid email address"),
            Self::PasswordTooShort { min } => {
                write!(f, "Password must be at least {min} characters")
            }
            Self::FullNameTooShort { min } => {
                write!(f, "Full name must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

impl From<UserValidationError> for CredentialsValidationError {
    fn from(value: UserValidationError) -> Self {
        match value {
            UserValidationError::FullNameTooShort { min } => Self::FullNameTooShort { min },
            _ => Self::InvalidEmail,
        }
    }
}

fn validate_password(password: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if password.chars().count() < PASSWORD_MIN {
        return Err(CredentialsValidationError::PasswordTooShort { min: PASSWORD_MIN });
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed and shaped like an address.
/// - `password` is at least [`PASSWORD_MIN`] characters and retains
///   caller-provided whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use notes_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("ada@example.com", "secret").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = Email::new(email)?;
        let password = validate_password(password)?;
        Ok(Self { email, password })
    }

    /// Email used for identity lookups.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated sign-up request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: LoginCredentials,
    full_name: Option<FullName>,
}

impl Registration {
    /// Construct a registration; a blank full name counts as absent.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<Self, CredentialsValidationError> {
        let credentials = LoginCredentials::try_from_parts(email, password)?;
        let full_name = full_name
            .filter(|name| !name.trim().is_empty())
            .map(FullName::new)
            .transpose()?;
        Ok(Self {
            credentials,
            full_name,
        })
    }

    pub fn credentials(&self) -> &LoginCredentials {
        &self.credentials
    }

    pub fn email(&self) -> &Email {
        self.credentials.email()
    }

    pub fn password(&self) -> &str {
        self.credentials.password()
    }

    pub fn full_name(&self) -> Option<&FullName> {
        self.full_name.as_ref()
    }
}

/// Identity returned by the identity provider after a successful sign-in,
/// sign-up or code exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub user_id: UserId,
    pub email: Email,
    pub full_name: Option<FullName>,
    pub avatar_url: Option<String>,
    /// Opaque provider access token, when the provider issues one.
    pub access_token: Option<Zeroizing<String>>,
}

impl AuthenticatedIdentity {
    pub fn new(user_id: UserId, email: Email) -> Self {
        Self {
            user_id,
            email,
            full_name: None,
            avatar_url: None,
            access_token: None,
        }
    }
}

impl fmt::Debug for AuthenticatedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedIdentity")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("full_name", &self.full_name)
            .field("avatar_url", &self.avatar_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "secret", CredentialsValidationError::InvalidEmail)]
    #[case("not-an-email", "secret", CredentialsValidationError::InvalidEmail)]
    #[case("ada@example.com", "12345", CredentialsValidationError::PasswordTooShort { min: 6 })]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  ada@example.com  ", "secret")]
    #[case("grace@example.org", " correct horse battery staple ")]
    fn valid_credentials_trim_email(#[case] email: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(email, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.email().as_ref(), email.trim());
        assert_eq!(creds.password(), password);
    }

    #[test]
    fn password_message_names_minimum() {
        let err = LoginCredentials::try_from_parts("ada@example.com", "abc")
            .expect_err("short password");
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
        assert_eq!(err.field(), "password");
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("   "), None)]
    #[case(Some("Ada Lovelace"), Some("Ada Lovelace"))]
    fn registration_full_name_is_optional(
        #[case] full_name: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let registration = Registration::try_from_parts("ada@example.com", "secret", full_name)
            .expect("valid registration");
        assert_eq!(registration.full_name().map(AsRef::as_ref), expected);
    }

    #[test]
    fn registration_rejects_single_character_name() {
        let err = Registration::try_from_parts("ada@example.com", "secret", Some("A"))
            .expect_err("short name");
        assert_eq!(err, CredentialsValidationError::FullNameTooShort { min: 2 });
        assert_eq!(err.to_string(), "Full name must be at least 2 characters");
    }

    #[test]
    fn identity_debug_redacts_token() {
        let mut identity = AuthenticatedIdentity::new(
            UserId::random(),
            Email::new("ada@example.com").expect("email"),
        );
        identity.access_token = Some(Zeroizing::new("super-secret".to_owned()));
        let rendered = format!("{identity:?}");
        assert!(!rendered.contains("super-secret"));
    }
}
