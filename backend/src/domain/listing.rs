//! Query arguments for the user listing and the raw request parameters they
//! are built from.
//!
//! The listing builds a [`UserQueryArgs`] from the request, hands it to the
//! query-args filter chain and finally to the user store. `number == 0`
//! means "no limit".

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Field used to sort listing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    #[default]
    Login,
    Email,
    Id,
    Name,
}

impl OrderBy {
    /// Request-parameter spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Email => "email",
            Self::Id => "id",
            Self::Name => "name",
        }
    }
}

impl FromStr for OrderBy {
    type Err = ListingValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "login" | "user_login" => Ok(Self::Login),
            "email" | "user_email" => Ok(Self::Email),
            "id" => Ok(Self::Id),
            "name" | "display_name" => Ok(Self::Name),
            _ => Err(ListingValidationError::InvalidOrderBy {
                value: value.to_owned(),
            }),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Request-parameter spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ListingValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(ListingValidationError::InvalidOrder {
                value: value.to_owned(),
            }),
        }
    }
}

/// Validation failures raised while reading listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingValidationError {
    InvalidNumber { field: &'static str, value: String },
    InvalidOrderBy { value: String },
    InvalidOrder { value: String },
}

impl ListingValidationError {
    /// Name of the offending request parameter.
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidNumber { field, .. } => *field,
            Self::InvalidOrderBy { .. } => "orderby",
            Self::InvalidOrder { .. } => "order",
        }
    }
}

impl fmt::Display for ListingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidNumber { field, value } => {
                write!(f, "{field} must be a non-negative integer, got '{value}'")
            }
            Self::InvalidOrderBy { value } => {
                write!(f, "orderby must be one of login, email, id, name; got '{value}'")
            }
            Self::InvalidOrder { value } => write!(f, "order must be asc or desc; got '{value}'"),
        }
    }
}

impl std::error::Error for ListingValidationError {}

/// Raw request parameters of a listing request.
///
/// Presence matters independently of value: a key supplied with an empty
/// value is still "present".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams(BTreeMap<String, String>);

impl RequestParams {
    pub fn new(params: BTreeMap<String, String>) -> Self {
        Self(params)
    }

    /// Whether `key` was supplied, whatever its value.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of `key` when present and not blank.
    fn non_blank(&self, key: &str) -> Option<&str> {
        self.get(key).map(str::trim).filter(|value| !value.is_empty())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParams
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

/// Arguments handed to the user store.
///
/// # Examples
/// ```
/// use users_export::domain::UserQueryArgs;
///
/// let args = UserQueryArgs::paged(20, 40).with_role("subscriber");
/// let all = args.without_paging();
/// assert_eq!((all.number, all.offset), (0, 0));
/// assert_eq!(all.role.as_deref(), Some("subscriber"));
/// assert_eq!((args.number, args.offset), (20, 40));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQueryArgs {
    /// Only users holding this role.
    pub role: Option<String>,
    /// Case-insensitive substring over login, email and full name.
    pub search: Option<String>,
    pub order_by: OrderBy,
    pub order: SortOrder,
    /// Page size; `0` means unlimited.
    pub number: u32,
    pub offset: u32,
}

impl UserQueryArgs {
    /// Unfiltered arguments for one page.
    pub fn paged(number: u32, offset: u32) -> Self {
        Self {
            number,
            offset,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn ordered(mut self, order_by: OrderBy, order: SortOrder) -> Self {
        self.order_by = order_by;
        self.order = order;
        self
    }

    /// A copy with every filter and sort kept and paging removed.
    #[must_use]
    pub fn without_paging(&self) -> Self {
        Self {
            number: 0,
            offset: 0,
            ..self.clone()
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.number == 0
    }

    /// Build arguments from request parameters, paging included.
    ///
    /// # Errors
    /// Returns [`ListingValidationError`] when a numeric or sort parameter is
    /// malformed.
    pub fn from_params(
        params: &RequestParams,
        default_page_size: u32,
    ) -> Result<Self, ListingValidationError> {
        let paging = Paging::from_params(params, default_page_size)?;
        Ok(Self::unpaged_from_params(params)?.with_paging(paging))
    }

    /// Filters and sorting from request parameters; `number`, `offset` and
    /// `paged` are not read.
    ///
    /// # Errors
    /// Returns [`ListingValidationError`] when a sort parameter is malformed.
    pub fn unpaged_from_params(params: &RequestParams) -> Result<Self, ListingValidationError> {
        let order_by: OrderBy = params
            .non_blank("orderby")
            .map(str::parse)
            .transpose()?
            .unwrap_or_default();
        let order: SortOrder = params
            .non_blank("order")
            .map(str::parse)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            role: params.non_blank("role").map(str::to_owned),
            search: params.non_blank("search").map(str::to_owned),
            order_by,
            order,
            number: 0,
            offset: 0,
        })
    }

    #[must_use]
    pub fn with_paging(self, paging: Paging) -> Self {
        Self {
            number: paging.number,
            offset: paging.offset,
            ..self
        }
    }
}

/// Page window requested through `number`, `offset` and `paged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub number: u32,
    pub offset: u32,
}

impl Paging {
    pub const fn first_page(number: u32) -> Self {
        Self { number, offset: 0 }
    }

    /// Read the window; `paged` (1-based) takes precedence over `offset`.
    ///
    /// # Errors
    /// Returns [`ListingValidationError::InvalidNumber`] for a value that is
    /// not a non-negative integer.
    pub fn from_params(
        params: &RequestParams,
        default_page_size: u32,
    ) -> Result<Self, ListingValidationError> {
        let number = parse_u32(params, "number")?.unwrap_or(default_page_size);
        let offset = match parse_u32(params, "paged")? {
            Some(page) if page > 1 => (page - 1).saturating_mul(number),
            Some(_) => 0,
            None => parse_u32(params, "offset")?.unwrap_or(0),
        };
        Ok(Self { number, offset })
    }
}

fn parse_u32(params: &RequestParams, field: &'static str) -> Result<Option<u32>, ListingValidationError> {
    params
        .non_blank(field)
        .map(|raw| {
            raw.parse::<u32>()
                .map_err(|_| ListingValidationError::InvalidNumber {
                    field,
                    value: raw.to_owned(),
                })
        })
        .transpose()
}
