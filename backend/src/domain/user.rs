//! User identity model.
//!
//! Identifiers are opaque strings issued by the identity store; the domain
//! never parses them. Usernames follow the identity store's allowed
//! character set, and role names are free-form labels.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum length of an opaque user identifier.
pub const USER_ID_MAX: usize = 450;
/// Maximum length of a username.
pub const USERNAME_MAX: usize = 256;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// Identifier had surrounding whitespace.
    #[error("user id must not have surrounding whitespace")]
    PaddedId,
    /// Identifier exceeded [`USER_ID_MAX`].
    #[error("user id must be at most {max} characters")]
    IdTooLong { max: usize },
    /// Username was blank.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username exceeded [`USERNAME_MAX`].
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    /// Username used characters outside the allowed set.
    #[error("username may only contain letters, digits, or the characters -._@+")]
    UsernameInvalidCharacters,
    /// Email address was not of the form `local@domain`.
    #[error("email address is malformed")]
    InvalidEmail,
    /// Role name was blank.
    #[error("role name must not be empty")]
    EmptyRoleName,
}

/// Opaque, stable user identifier.
///
/// # Examples
/// ```
/// use focus_backend::domain::UserId;
///
/// let id = UserId::new("8d3c2f1e-user").expect("valid id");
/// assert_eq!(id.as_ref(), "8d3c2f1e-user");
/// assert!(UserId::new(" padded ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::PaddedId);
        }
        if id.chars().count() > USER_ID_MAX {
            return Err(UserValidationError::IdTooLong { max: USER_ID_MAX });
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately.
        Regex::new(r"^[A-Za-z0-9\-._@+]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Login name shown to other users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&username) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Contact email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        let trimmed = email.trim();
        match trimmed.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role label attached to a user, such as `Admin`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleName(String);

impl RoleName {
    /// Validate and construct a [`RoleName`]; surrounding whitespace is trimmed.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyRoleName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RoleName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<RoleName> for String {
    fn from(value: RoleName) -> Self {
        value.0
    }
}

impl TryFrom<String> for RoleName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user together with its role memberships.
///
/// ## Invariants
/// - `id` never changes once issued.
/// - `roles` holds each role once; order carries no meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: Option<Email>,
    roles: BTreeSet<RoleName>,
}

impl User {
    /// Build a user with no role memberships.
    pub fn new(id: UserId, username: Username, email: Option<Email>) -> Self {
        Self {
            id,
            username,
            email,
            roles: BTreeSet::new(),
        }
    }

    /// Fallible constructor from raw strings.
    pub fn try_from_strings(
        id: &str,
        username: &str,
        email: Option<&str>,
    ) -> Result<Self, UserValidationError> {
        let email = email.map(Email::new).transpose()?;
        Ok(Self::new(UserId::new(id)?, Username::new(username)?, email))
    }

    /// Replace the role set.
    #[must_use]
    pub fn with_roles(self, roles: BTreeSet<RoleName>) -> Self {
        Self { roles, ..self }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact email, when recorded.
    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    /// Role memberships.
    pub fn roles(&self) -> &BTreeSet<RoleName> {
        &self.roles
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case(" abc", UserValidationError::PaddedId)]
    #[case("abc\n", UserValidationError::PaddedId)]
    fn user_id_rejects_malformed_values(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
    }

    #[rstest]
    fn user_id_rejects_overlong_values() {
        let raw = "x".repeat(USER_ID_MAX + 1);
        assert_eq!(
            UserId::new(raw).expect_err("too long"),
            UserValidationError::IdTooLong { max: USER_ID_MAX }
        );
    }

    #[rstest]
    #[case("3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    #[case("legacy|42")]
    fn user_id_accepts_opaque_values(#[case] raw: &str) {
        let id = UserId::new(raw).expect("opaque ids are accepted verbatim");
        assert_eq!(id.as_ref(), raw);
    }

    #[rstest]
    #[case("ada.lovelace@example.org", true)]
    #[case("admin", true)]
    #[case("has space", false)]
    #[case("", false)]
    fn username_character_set(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(Username::new(raw).is_ok(), valid);
    }

    #[rstest]
    #[case("ada@example.org", true)]
    #[case("  ada@example.org ", true)]
    #[case("ada", false)]
    #[case("@example.org", false)]
    #[case("a@b@c", false)]
    fn email_shape(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(Email::new(raw).is_ok(), valid);
    }

    #[rstest]
    fn role_names_are_trimmed_and_deduplicated() {
        let roles: BTreeSet<RoleName> = ["Admin", " Admin ", "User"]
            .into_iter()
            .map(|raw| RoleName::new(raw).expect("valid role"))
            .collect();
        let names: Vec<&str> = roles.iter().map(AsRef::as_ref).collect();
        assert_eq!(names, vec!["Admin", "User"]);
    }

    #[rstest]
    fn with_roles_replaces_memberships() {
        let user = User::try_from_strings("u-1", "ada", Some("ada@example.org"))
            .expect("valid user")
            .with_roles(BTreeSet::from([RoleName::new("Admin").expect("role")]));
        assert_eq!(user.roles().len(), 1);
        assert_eq!(user.email().map(AsRef::as_ref), Some("ada@example.org"));
    }
}
