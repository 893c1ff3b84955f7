//! Cache-control policies shared by handlers.

/// Private listing pages and JSON must be revalidated before reuse.
pub const PRIVATE_NO_CACHE_MUST_REVALIDATE: &str = "private, no-cache, must-revalidate";

/// Policy sent with export downloads.
pub const DOWNLOAD_MUST_REVALIDATE: &str = "must-revalidate, post-check=0, pre-check=0";

/// Header tuple for private API and admin responses.
pub const fn private_no_cache_header() -> (&'static str, &'static str) {
    ("Cache-Control", PRIVATE_NO_CACHE_MUST_REVALIDATE)
}
