//! Form-submission entries and the address fields the export reads from
//! them.
//!
//! Entries are keyed by positional form-field identifiers such as `10.1`.
//! The mapping from those keys to address parts is fixed and lives only in
//! [`ADDRESS_FIELD_KEYS`]; a change to the upstream form means editing that
//! table.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Form-field keys holding, in order: address line 1, address line 2, city,
/// postal code and country.
pub const ADDRESS_FIELD_KEYS: [&str; 5] = ["10.1", "10.3", "10.4", "10.5", "10.6"];

/// Identifier of a submission entry, as stored on the user record.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Parse a stored link value; blank values link to nothing.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for EntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A previously submitted form: sparse field key to value mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionRecord(BTreeMap<String, String>);

impl SubmissionRecord {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl<K, V> FromIterator<(K, V)> for SubmissionRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Outcome of resolving a user's submission link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionLookup {
    Found(SubmissionRecord),
    NotFound,
}

/// The five address cells of an export row.
///
/// # Examples
/// ```
/// use users_export::domain::{AddressFields, SubmissionLookup, SubmissionRecord};
///
/// let record: SubmissionRecord = [("10.1", "Main St"), ("10.6", "US")].into_iter().collect();
/// let cells = AddressFields::from_lookup(&SubmissionLookup::Found(record)).into_cells();
/// assert_eq!(cells, ["Main St", "", "", "", "US"].map(String::from));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressFields([String; 5]);

impl AddressFields {
    /// Extract address cells; a missing key or an unresolved lookup yields
    /// empty strings.
    pub fn from_lookup(lookup: &SubmissionLookup) -> Self {
        match lookup {
            SubmissionLookup::Found(record) => Self(
                ADDRESS_FIELD_KEYS.map(|key| record.get(key).unwrap_or_default().to_owned()),
            ),
            SubmissionLookup::NotFound => Self::default(),
        }
    }

    pub fn into_cells(self) -> [String; 5] {
        self.0
    }
}
