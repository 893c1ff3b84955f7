//! Login and JSON user listing.
//!
//! ```text
//! POST /api/v1/login {"username":"admin","password":"password"}
//! GET /api/v1/users?role=subscriber&number=20
//! GET /api/v1/users?role=subscriber&export_all_data
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{Error, LoginCredentials, LoginValidationError, UserRecord};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::download::attachment_response;
use crate::inbound::http::listing::{ListingOutcome, request_params, run_listing};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// One listed user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: u64,
    pub login: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub roles: Vec<String>,
}

impl From<&UserRecord> for UserSummary {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id().get(),
            login: user.login().to_owned(),
            email: user.email().to_owned(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
            roles: user.roles().to_vec(),
        }
    }
}

/// One page of the user listing.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsersPage {
    pub users: Vec<UserSummary>,
    /// Matches before paging.
    pub total: usize,
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let login = state.login.authenticate(&credentials).await?;
    session.persist_login(&login)?;
    info!(%login, "session established");
    Ok(HttpResponse::Ok().finish())
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// List users, or download them as CSV when the export marker is present.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(
        ("role" = Option<String>, Query, description = "Only users holding this role"),
        ("search" = Option<String>, Query, description = "Substring of login, e-mail or name"),
        ("orderby" = Option<String>, Query, description = "login, email, id or name"),
        ("order" = Option<String>, Query, description = "asc or desc"),
        ("number" = Option<u32>, Query, description = "Page size; 0 lists everything"),
        ("offset" = Option<u32>, Query, description = "Rows to skip"),
        ("paged" = Option<u32>, Query, description = "1-based page; overrides offset"),
        ("export_all_data" = Option<String>, Query, description = "Any value downloads every matching user as CSV")
    ),
    responses(
        (status = 200, description = "Users; a text/csv attachment instead when the export marker is present", body = UsersPage),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    session.require_login()?;
    let params = request_params(query);
    match run_listing(&state, &params).await? {
        ListingOutcome::Download(attachment) => Ok(attachment_response(attachment)),
        ListingOutcome::Page { page, .. } => Ok(HttpResponse::Ok()
            .insert_header(private_no_cache_header())
            .json(UsersPage {
                users: page.users.iter().map(UserSummary::from).collect(),
                total: page.total,
            })),
    }
}
