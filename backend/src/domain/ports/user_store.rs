//! Driven port for querying the host user store.
//!
//! The listing and the export both go through this port; the export simply
//! passes arguments with paging removed.

use async_trait::async_trait;

use crate::domain::{UserQueryArgs, UserRecord};

use super::define_port_error;

define_port_error! {
    /// Failures raised by user store adapters.
    pub enum UserStoreError {
        /// The backing store could not be reached or loaded.
        Unavailable { message: String } => "user store unavailable: {message}",
        /// The query itself failed.
        Query { message: String } => "user store query failed: {message}",
    }
}

/// One page of users plus the number of matches before paging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPage {
    pub users: Vec<UserRecord>,
    pub total: usize,
}

/// Query interface of the user store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Return the users matching `args`, ordered as `args` requests and
    /// limited by `args.number` / `args.offset` (`number == 0` is unlimited).
    async fn query_users(&self, args: &UserQueryArgs) -> Result<UserPage, UserStoreError>;
}
