//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;

use crate::domain::ports::{StaticLoginService, UserStore};
use crate::domain::HookRegistry;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::users::LoginRequest;

pub const TEST_USERNAME: &str = "admin";
pub const TEST_PASSWORD: &str = "password";

/// Session middleware with a fresh key, cookie name `session` and no
/// `Secure` flag.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The session cookie set on `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// HTTP state accepting `admin` / `password`.
pub fn test_state(users: Arc<dyn UserStore>, hooks: HookRegistry) -> HttpState {
    HttpState::new(HttpStatePorts {
        login: Arc::new(StaticLoginService::new(
            TEST_USERNAME,
            Some(TEST_PASSWORD.to_owned()),
        )),
        users,
        hooks: Arc::new(hooks),
        default_page_size: 20,
    })
}

/// Log in through `/api/v1/login` and return the session cookie.
pub async fn login_cookie<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(&LoginRequest {
            username: TEST_USERNAME.into(),
            password: TEST_PASSWORD.into(),
        })
        .to_request();
    let res = test::call_service(app, req).await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    session_cookie(&res)
}
