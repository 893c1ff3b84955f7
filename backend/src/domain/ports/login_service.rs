//! Driving port for the host permission check.
//!
//! Every listing and export endpoint requires a session established through
//! this port; there is no finer-grained authorisation.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{Error, LoginCredentials};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the login to store in the session.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<String, Error>;
}

/// Single administrator account configured at startup.
///
/// Without a configured password every login is rejected.
#[derive(Debug, Clone)]
pub struct StaticLoginService {
    username: String,
    password: Option<Zeroizing<String>>,
}

impl StaticLoginService {
    pub fn new(username: impl Into<String>, password: Option<String>) -> Self {
        Self {
            username: username.into(),
            password: password.map(Zeroizing::new),
        }
    }
}

#[async_trait]
impl LoginService for StaticLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<String, Error> {
        match &self.password {
            Some(password)
                if credentials.username() == self.username
                    && credentials.password() == password.as_str() =>
            {
                Ok(self.username.clone())
            }
            _ => Err(Error::unauthorized("invalid credentials")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case("admin", "password", true)]
    #[case("admin", "wrong", false)]
    #[case("other", "password", false)]
    #[tokio::test]
    async fn accepts_only_the_configured_pair(
        #[case] username: &str,
        #[case] password: &str,
        #[case] should_succeed: bool,
    ) {
        let service = StaticLoginService::new("admin", Some("password".to_owned()));
        let creds = LoginCredentials::try_from_parts(username, password).expect("shape");
        match (should_succeed, service.authenticate(&creds).await) {
            (true, Ok(login)) => assert_eq!(login, "admin"),
            (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
            (expected, other) => panic!("expected success={expected}, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejects_everything_without_password() {
        let service = StaticLoginService::new("admin", None);
        let creds = LoginCredentials::try_from_parts("admin", "anything").expect("shape");
        assert!(service.authenticate(&creds).await.is_err());
    }
}
