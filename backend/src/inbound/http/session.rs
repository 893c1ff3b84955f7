//! Session helpers standing in for the host permission check.
//!
//! A successful login stores the login name in the cookie session; every
//! listing and export endpoint requires it.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::Error;

pub(crate) const LOGIN_KEY: &str = "login";

/// Wrapper exposing the session operations handlers need.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the authenticated login in the session cookie.
    ///
    /// # Errors
    /// Fails when the session cannot be serialised.
    pub fn persist_login(&self, login: &str) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(LOGIN_KEY, login)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The login stored in the session, if any. Blank values count as absent.
    ///
    /// # Errors
    /// Fails when the session cannot be read.
    pub fn login(&self) -> Result<Option<String>, Error> {
        let login = self
            .0
            .get::<String>(LOGIN_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(login.filter(|value| !value.trim().is_empty()))
    }

    /// The stored login, or `401 Unauthorized`.
    ///
    /// # Errors
    /// Returns [`crate::domain::ErrorCode::Unauthorized`] without a login.
    pub fn require_login(&self) -> Result<String, Error> {
        self.login()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
