//! Extension points of the user listing.
//!
//! The listing calls registered handlers at two named points:
//!
//! - [`ExtensionPoint::RestrictManageUsers`]: toolbar actions rendered above
//!   and below the listing table.
//! - [`ExtensionPoint::UsersListTableQueryArgs`]: filters that see the query
//!   arguments before the page is fetched. A filter may hand the arguments
//!   on, or take over the response with [`FilterOutcome::Respond`].
//!
//! Handlers run in ascending priority; equal priorities keep registration
//! order.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use super::{Error, RequestParams, UserQueryArgs};

/// Priority used when a handler has no reason to pick one.
pub const DEFAULT_PRIORITY: i32 = 10;

/// Named extension points offered by the listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtensionPoint {
    RestrictManageUsers,
    UsersListTableQueryArgs,
}

impl ExtensionPoint {
    pub const fn name(self) -> &'static str {
        match self {
            Self::RestrictManageUsers => "restrict_manage_users",
            Self::UsersListTableQueryArgs => "users_list_table_query_args",
        }
    }
}

impl fmt::Display for ExtensionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the toolbar is being rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarPosition {
    Top,
    Bottom,
}

impl ToolbarPosition {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
        }
    }
}

/// A file the client should save rather than display.
///
/// # Examples
/// ```
/// use users_export::domain::Attachment;
///
/// let file = Attachment::new("a\"b.csv", "text/csv", b"x".to_vec());
/// assert_eq!(file.content_disposition(), r#"attachment; filename="a\"b.csv""#);
/// assert_eq!(file.content_length(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    file_name: String,
    content_type: &'static str,
    content: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, content_type: &'static str, content: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            content,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn into_content(self) -> Vec<u8> {
        self.content
    }

    /// Byte length of the body.
    pub fn content_length(&self) -> usize {
        self.content.len()
    }

    /// `attachment; filename="..."` with `"` and `\` backslash-escaped.
    pub fn content_disposition(&self) -> String {
        let mut quoted = String::with_capacity(self.file_name.len() + 2);
        quoted.push('"');
        for ch in self.file_name.chars() {
            if matches!(ch, '"' | '\\') {
                quoted.push('\\');
            }
            quoted.push(ch);
        }
        quoted.push('"');
        format!("attachment; filename={quoted}")
    }
}

/// Escape text for HTML content and double-quoted attributes.
///
/// # Examples
/// ```
/// use users_export::domain::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">&"#), "&lt;a href=&quot;x&quot;&gt;&amp;");
/// ```
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Result of one query-args filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Carry on with these arguments.
    Continue(UserQueryArgs),
    /// The filter produced the whole response; the listing must stop.
    Respond(Attachment),
}

/// Handler for [`ExtensionPoint::RestrictManageUsers`].
pub trait ToolbarAction: Send + Sync {
    /// Render markup for the toolbar at `which`.
    fn render(&self, which: ToolbarPosition) -> String;
}

/// Handler for [`ExtensionPoint::UsersListTableQueryArgs`].
#[async_trait]
pub trait QueryArgsFilter: Send + Sync {
    /// Inspect (and optionally replace) the listing arguments.
    async fn filter(
        &self,
        args: UserQueryArgs,
        request: &RequestParams,
    ) -> Result<FilterOutcome, Error>;
}

struct Registered<H: ?Sized> {
    priority: i32,
    handler: Arc<H>,
}

impl<H: ?Sized> Clone for Registered<H> {
    fn clone(&self) -> Self {
        Self {
            priority: self.priority,
            handler: Arc::clone(&self.handler),
        }
    }
}

fn insert_by_priority<H: ?Sized>(list: &mut Vec<Registered<H>>, priority: i32, handler: Arc<H>) {
    let at = list
        .iter()
        .position(|entry| entry.priority > priority)
        .unwrap_or(list.len());
    list.insert(at, Registered { priority, handler });
}

/// Registry of listing extension handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use users_export::domain::{HookRegistry, ToolbarAction, ToolbarPosition, DEFAULT_PRIORITY};
///
/// struct Hello;
/// impl ToolbarAction for Hello {
///     fn render(&self, which: ToolbarPosition) -> String {
///         format!("<span>{}</span>", which.as_str())
///     }
/// }
///
/// let mut hooks = HookRegistry::default();
/// hooks.add_toolbar_action(DEFAULT_PRIORITY, Arc::new(Hello));
/// assert_eq!(hooks.render_toolbar(ToolbarPosition::Top), "<span>top</span>");
/// ```
#[derive(Clone, Default)]
pub struct HookRegistry {
    toolbar: Vec<Registered<dyn ToolbarAction>>,
    query_args: Vec<Registered<dyn QueryArgsFilter>>,
}

impl HookRegistry {
    pub fn add_toolbar_action(&mut self, priority: i32, action: Arc<dyn ToolbarAction>) {
        insert_by_priority(&mut self.toolbar, priority, action);
    }

    pub fn add_query_args_filter(&mut self, priority: i32, filter: Arc<dyn QueryArgsFilter>) {
        insert_by_priority(&mut self.query_args, priority, filter);
    }

    /// Number of handlers registered at `point`.
    pub fn handler_count(&self, point: ExtensionPoint) -> usize {
        match point {
            ExtensionPoint::RestrictManageUsers => self.toolbar.len(),
            ExtensionPoint::UsersListTableQueryArgs => self.query_args.len(),
        }
    }

    /// Concatenated markup of every toolbar action.
    pub fn render_toolbar(&self, which: ToolbarPosition) -> String {
        self.toolbar
            .iter()
            .map(|entry| entry.handler.render(which))
            .collect()
    }

    /// Run the query-args filters in order.
    ///
    /// Stops at the first filter that responds; otherwise returns the
    /// arguments produced by the last filter.
    ///
    /// # Errors
    /// Propagates the first filter error.
    pub async fn apply_query_args_filters(
        &self,
        args: UserQueryArgs,
        request: &RequestParams,
    ) -> Result<FilterOutcome, Error> {
        let mut current = args;
        for entry in &self.query_args {
            match entry.handler.filter(current, request).await? {
                FilterOutcome::Continue(next) => current = next,
                respond @ FilterOutcome::Respond(_) => {
                    tracing::debug!(
                        point = %ExtensionPoint::UsersListTableQueryArgs,
                        priority = entry.priority,
                        "query-args filter took over the response"
                    );
                    return Ok(respond);
                }
            }
        }
        Ok(FilterOutcome::Continue(current))
    }
}
