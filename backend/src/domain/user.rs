//! User account records read from the host user store.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Attribute key holding the linked submission entry identifier.
pub const ENTRY_ID_META_KEY: &str = "entry_id";

/// Numeric user identifier assigned by the user store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u64);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A user account as exposed by the user store.
///
/// ## Invariants
/// - `roles` keeps the store's order; it is never sorted or deduplicated here.
/// - `meta` is a free-form attribute bag. Only [`ENTRY_ID_META_KEY`] is read
///   by the export.
///
/// # Examples
/// ```
/// use users_export::domain::{UserId, UserRecord};
///
/// let user = UserRecord::new(UserId::new(7), "ada", "ada@example.com")
///     .with_name("Ada", "Lovelace")
///     .with_roles(["administrator", "editor"])
///     .with_meta("entry_id", "42");
/// assert_eq!(user.full_name(), "Ada Lovelace");
/// assert_eq!(user.joined_roles(), "administrator, editor");
/// assert_eq!(user.get("entry_id"), Some("42"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    id: UserId,
    login: String,
    email: String,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    roles: Vec<String>,
    #[serde(default)]
    meta: BTreeMap<String, String>,
}

impl UserRecord {
    /// Build a record with the mandatory identity fields.
    pub fn new(id: UserId, login: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
            email: email.into(),
            first_name: String::new(),
            last_name: String::new(),
            roles: Vec::new(),
            meta: BTreeMap::new(),
        }
    }

    /// Set first and last name.
    #[must_use]
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Replace the assigned roles.
    #[must_use]
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Set a single attribute.
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Whether the user holds `role`.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|held| held == role)
    }

    /// Generic attribute getter.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.meta.get(key).map(String::as_str)
    }

    /// First and last name joined by a single space.
    ///
    /// The space is always present, even when one or both parts are empty.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Roles joined by `", "`.
    pub fn joined_roles(&self) -> String {
        self.roles.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "", " ")]
    #[case("Ada", "", "Ada ")]
    #[case("", "Lovelace", " Lovelace")]
    fn full_name_always_keeps_the_separator(
        #[case] first: &str,
        #[case] last: &str,
        #[case] expected: &str,
    ) {
        let user = UserRecord::new(UserId::new(1), "u", "u@example.com").with_name(first, last);
        assert_eq!(user.full_name(), expected);
    }

    #[test]
    fn deserialises_with_optional_fields_missing() {
        let user: UserRecord =
            serde_json::from_str(r#"{"id":3,"login":"bob","email":"bob@example.com"}"#)
                .expect("minimal record");
        assert_eq!(user.id(), UserId::new(3));
        assert!(user.roles().is_empty());
        assert_eq!(user.get(ENTRY_ID_META_KEY), None);
        assert_eq!(user.joined_roles(), "");
    }
}
