//! HTML admin screens: the user listing and the export settings stub.
//!
//! The listing renders inside one GET form so toolbar controls submit the
//! current filters along with their own name.

use std::collections::BTreeMap;

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};

use crate::domain::ports::UserPage;
use crate::domain::{HookRegistry, ToolbarPosition, UserQueryArgs, UserRecord, escape_html};
use crate::inbound::http::ApiResult;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::download::attachment_response;
use crate::inbound::http::listing::{ListingOutcome, request_params, run_listing};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const LISTING_COLUMNS: [&str; 5] = ["ID", "Username", "Name", "E-mail", "Roles"];

fn html_page(title: &str, body: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .insert_header(private_no_cache_header())
        .body(format!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head><body>\n{body}</body></html>\n",
            escape_html(title)
        ))
}

fn hidden_input(out: &mut String, name: &str, value: &str) {
    out.push_str(&format!(
        "<input type=\"hidden\" name=\"{}\" value=\"{}\">\n",
        escape_html(name),
        escape_html(value)
    ));
}

/// Hidden fields carrying the filters of `args`; paging is left out so an
/// export always covers every page.
fn filter_inputs(args: &UserQueryArgs) -> String {
    let mut out = String::new();
    if let Some(role) = &args.role {
        hidden_input(&mut out, "role", role);
    }
    if let Some(search) = &args.search {
        hidden_input(&mut out, "search", search);
    }
    hidden_input(&mut out, "orderby", args.order_by.as_str());
    hidden_input(&mut out, "order", args.order.as_str());
    if !args.is_unlimited() {
        hidden_input(&mut out, "number", &args.number.to_string());
    }
    out
}

fn toolbar(hooks: &HookRegistry, which: ToolbarPosition) -> String {
    format!(
        "<div class=\"tablenav {}\">{}</div>\n",
        which.as_str(),
        hooks.render_toolbar(which)
    )
}

fn user_row(user: &UserRecord) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        user.id(),
        escape_html(user.login()),
        escape_html(user.full_name().trim()),
        escape_html(user.email()),
        escape_html(&user.joined_roles())
    )
}

fn users_table(page: &UserPage) -> String {
    let head: String = LISTING_COLUMNS
        .iter()
        .map(|column| format!("<th>{column}</th>"))
        .collect();
    let rows: String = if page.users.is_empty() {
        format!(
            "<tr><td colspan=\"{}\">No users found.</td></tr>\n",
            LISTING_COLUMNS.len()
        )
    } else {
        page.users.iter().map(user_row).collect()
    };
    format!(
        "<table class=\"users\">\n<thead><tr>{head}</tr></thead>\n<tbody>\n{rows}</tbody>\n</table>\n"
    )
}

/// Render the listing screen for one page.
pub fn render_listing(hooks: &HookRegistry, args: &UserQueryArgs, page: &UserPage) -> String {
    let mut body = String::from("<h1>Users</h1>\n<form method=\"get\" action=\"/admin/users\">\n");
    body.push_str(&filter_inputs(args));
    body.push_str(&toolbar(hooks, ToolbarPosition::Top));
    body.push_str(&users_table(page));
    body.push_str(&toolbar(hooks, ToolbarPosition::Bottom));
    body.push_str(&format!(
        "<p class=\"count\">{} of {} users</p>\n",
        page.users.len(),
        page.total
    ));
    body.push_str("</form>\n");
    body
}

/// HTML user listing. The export marker works here as on the JSON listing.
#[get("/users")]
pub async fn users_screen(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    session.require_login()?;
    let params = request_params(query);
    match run_listing(&state, &params).await? {
        ListingOutcome::Download(attachment) => Ok(attachment_response(attachment)),
        ListingOutcome::Page { args, page } => Ok(html_page(
            "Users",
            &render_listing(&state.hooks, &args, &page),
        )),
    }
}

/// Settings page of the export feature. It has no settings yet.
#[get("/users/export-settings")]
pub async fn export_settings(session: SessionContext) -> ApiResult<HttpResponse> {
    session.require_login()?;
    Ok(html_page(
        "Export Settings",
        "<h1>Export Settings</h1>\n<p>The users export has no configurable settings.</p>\n",
    ))
}
