//! The listing pipeline shared by the JSON and HTML user screens.
//!
//! Request parameters become [`UserQueryArgs`], the query-args filters run,
//! and either a page of users is fetched or a filter's attachment is
//! returned untouched.

use std::collections::BTreeMap;

use actix_web::web;
use tracing::error;

use crate::domain::ports::UserPage;
use crate::domain::{Attachment, Error, FilterOutcome, Paging, RequestParams, UserQueryArgs};

use super::ApiResult;
use super::error::map_listing_validation_error;
use super::state::HttpState;

/// What the listing endpoint should send back.
#[derive(Debug)]
pub enum ListingOutcome {
    Page { args: UserQueryArgs, page: UserPage },
    Download(Attachment),
}

/// Collect raw query parameters; a key without a value is kept as `""`.
pub fn request_params(query: web::Query<BTreeMap<String, String>>) -> RequestParams {
    RequestParams::new(query.into_inner())
}

/// Run the listing for `params`.
///
/// A malformed paging value is only reported once no filter has taken the
/// request over; until then the first page stands in for it.
///
/// # Errors
/// `400` for malformed listing parameters, `500` when a filter or the user
/// store fails.
pub async fn run_listing(state: &HttpState, params: &RequestParams) -> ApiResult<ListingOutcome> {
    let filters =
        UserQueryArgs::unpaged_from_params(params).map_err(|err| map_listing_validation_error(&err))?;
    let paging = Paging::from_params(params, state.default_page_size);
    let window = paging
        .as_ref()
        .map_or_else(|_| Paging::first_page(state.default_page_size), |paging| *paging);

    let args = match state
        .hooks
        .apply_query_args_filters(filters.with_paging(window), params)
        .await?
    {
        FilterOutcome::Respond(attachment) => return Ok(ListingOutcome::Download(attachment)),
        FilterOutcome::Continue(args) => args,
    };
    paging.map_err(|err| map_listing_validation_error(&err))?;

    let page = state.users.query_users(&args).await.map_err(|err| {
        error!(error = %err, "user listing query failed");
        Error::internal(err.to_string())
    })?;
    Ok(ListingOutcome::Page { args, page })
}
