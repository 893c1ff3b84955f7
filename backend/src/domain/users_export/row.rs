//! Fixed column layout of the export.

use crate::domain::{AddressFields, UserRecord};

/// Width of the header and of every row.
pub const EXPORT_COLUMNS: usize = 10;

/// Header row, in column order.
pub const EXPORT_HEADER: [&str; EXPORT_COLUMNS] = [
    "User ID",
    "HRMIS",
    "E-mail",
    "Name",
    "Roles",
    "Address 1",
    "Address 2",
    "City",
    "Postal code",
    "Country",
];

/// One exported user: always exactly [`EXPORT_COLUMNS`] cells.
///
/// # Examples
/// ```
/// use users_export::domain::users_export::ExportRow;
/// use users_export::domain::{AddressFields, SubmissionLookup, UserId, UserRecord};
///
/// let user = UserRecord::new(UserId::new(1), "ada", "ada@example.com")
///     .with_name("Ada", "Lovelace")
///     .with_roles(["subscriber"]);
/// let row = ExportRow::new(&user, AddressFields::from_lookup(&SubmissionLookup::NotFound));
/// assert_eq!(row.cells()[3], "Ada Lovelace");
/// assert!(row.cells()[5..].iter().all(String::is_empty));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow([String; EXPORT_COLUMNS]);

impl ExportRow {
    pub fn new(user: &UserRecord, address: AddressFields) -> Self {
        let [address1, address2, city, postal_code, country] = address.into_cells();
        Self([
            user.id().to_string(),
            user.login().to_owned(),
            user.email().to_owned(),
            user.full_name(),
            user.joined_roles(),
            address1,
            address2,
            city,
            postal_code,
            country,
        ])
    }

    pub fn cells(&self) -> &[String; EXPORT_COLUMNS] {
        &self.0
    }
}
