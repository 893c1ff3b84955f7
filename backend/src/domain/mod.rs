//! Domain primitives, ports and the users export feature.
//!
//! Nothing in this module depends on Actix or on the filesystem; adapters in
//! `inbound` and `outbound` translate to and from these types.

pub mod auth;
pub mod error;
pub mod hooks;
pub mod listing;
pub mod ports;
pub mod submission;
pub mod trace_id;
pub mod user;
pub mod users_export;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::hooks::{
    Attachment, DEFAULT_PRIORITY, ExtensionPoint, FilterOutcome, HookRegistry, QueryArgsFilter,
    ToolbarAction, ToolbarPosition, escape_html,
};
pub use self::listing::{
    ListingValidationError, OrderBy, Paging, RequestParams, SortOrder, UserQueryArgs,
};
pub use self::submission::{
    ADDRESS_FIELD_KEYS, AddressFields, EntryId, SubmissionLookup, SubmissionRecord,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{ENTRY_ID_META_KEY, UserId, UserRecord};
