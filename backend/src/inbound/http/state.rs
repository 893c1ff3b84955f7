//! Shared HTTP adapter state.
//!
//! Handlers take this via `web::Data` and only see domain ports, so they can
//! be tested with in-memory doubles.

use std::sync::Arc;

use crate::domain::HookRegistry;
use crate::domain::ports::{LoginService, UserStore};

/// Parameter object bundling the ports and settings handlers need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserStore>,
    pub hooks: Arc<HookRegistry>,
    pub default_page_size: u32,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserStore>,
    /// Listing extension points; read-only once the server runs.
    pub hooks: Arc<HookRegistry>,
    /// Page size when the request has no `number`.
    pub default_page_size: u32,
}

impl HttpState {
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use users_export::domain::HookRegistry;
    /// use users_export::domain::ports::StaticLoginService;
    /// use users_export::inbound::http::state::{HttpState, HttpStatePorts};
    /// use users_export::outbound::directory::JsonDirectory;
    ///
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: Arc::new(StaticLoginService::new("admin", None)),
    ///     users: Arc::new(JsonDirectory::default()),
    ///     hooks: Arc::new(HookRegistry::default()),
    ///     default_page_size: 20,
    /// });
    /// assert_eq!(state.default_page_size, 20);
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            users,
            hooks,
            default_page_size,
        } = ports;
        Self {
            login,
            users,
            hooks,
            default_page_size,
        }
    }
}
