//! Application settings loaded via OrthoConfig.
//!
//! Every field can be set by CLI flag or by a `USERS_EXPORT_`-prefixed
//! environment variable, e.g. `USERS_EXPORT_EXPORT_DIR=/srv/exports`.

use std::net::{AddrParseError, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::users_export::{DEFAULT_EXPORT_MARKER, NamingPolicy};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_ADMIN_USER: &str = "admin";
const DEFAULT_PAGE_SIZE: u32 = 20;

/// Service settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERS_EXPORT")]
pub struct AppSettings {
    /// Listen address.
    pub bind_addr: Option<String>,
    /// Directory holding `users.json` and `entries.json`.
    pub data_dir: Option<PathBuf>,
    /// Directory receiving transient export files.
    pub export_dir: Option<PathBuf>,
    /// Request key that triggers the export.
    pub export_marker: Option<String>,
    /// Keep export files after they were sent.
    #[ortho_config(default = false)]
    pub keep_export_files: bool,
    /// Attempts at finding a free export file name.
    pub name_attempts: Option<u32>,
    /// Wait between file name attempts, in milliseconds.
    pub name_retry_ms: Option<u64>,
    /// Listing page size when the request has no `number`.
    pub default_page_size: Option<u32>,
    /// Login accepted by the admin session.
    pub admin_user: Option<String>,
    /// Password for `admin_user`; without one every login is rejected.
    pub admin_password: Option<String>,
}

impl AppSettings {
    /// # Errors
    /// Fails when the configured address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    /// Configured export directory, or the system temp dir.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    pub fn export_marker(&self) -> &str {
        self.export_marker
            .as_deref()
            .map(str::trim)
            .filter(|marker| !marker.is_empty())
            .unwrap_or(DEFAULT_EXPORT_MARKER)
    }

    pub fn naming_policy(&self) -> NamingPolicy {
        let defaults = NamingPolicy::default();
        NamingPolicy {
            attempts: self.name_attempts.unwrap_or(defaults.attempts).max(1),
            retry_delay: self
                .name_retry_ms
                .map_or(defaults.retry_delay, Duration::from_millis),
        }
    }

    pub fn default_page_size(&self) -> u32 {
        self.default_page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn admin_user(&self) -> &str {
        self.admin_user.as_deref().unwrap_or(DEFAULT_ADMIN_USER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 10] = [
        "USERS_EXPORT_BIND_ADDR",
        "USERS_EXPORT_DATA_DIR",
        "USERS_EXPORT_EXPORT_DIR",
        "USERS_EXPORT_EXPORT_MARKER",
        "USERS_EXPORT_KEEP_EXPORT_FILES",
        "USERS_EXPORT_NAME_ATTEMPTS",
        "USERS_EXPORT_NAME_RETRY_MS",
        "USERS_EXPORT_DEFAULT_PAGE_SIZE",
        "USERS_EXPORT_ADMIN_USER",
        "USERS_EXPORT_ADMIN_PASSWORD",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("users-export")]).expect("config should load")
    }

    fn cleared_except(set: &[(&'static str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = set
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(cleared_except(&[]));
        let settings = load_from_empty_args();

        assert_eq!(
            settings.bind_addr().expect("default addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("addr")
        );
        assert_eq!(settings.data_dir(), PathBuf::from("./data"));
        assert_eq!(settings.export_dir(), std::env::temp_dir());
        assert_eq!(settings.export_marker(), "export_all_data");
        assert!(!settings.keep_export_files);
        assert_eq!(settings.naming_policy(), NamingPolicy::default());
        assert_eq!(settings.default_page_size(), 20);
        assert_eq!(settings.admin_user(), "admin");
        assert!(settings.admin_password.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_except(&[
            ("USERS_EXPORT_BIND_ADDR", "127.0.0.1:9000"),
            ("USERS_EXPORT_EXPORT_DIR", "/srv/exports"),
            ("USERS_EXPORT_EXPORT_MARKER", "download_csv"),
            ("USERS_EXPORT_KEEP_EXPORT_FILES", "true"),
            ("USERS_EXPORT_NAME_ATTEMPTS", "3"),
            ("USERS_EXPORT_NAME_RETRY_MS", "5"),
            ("USERS_EXPORT_DEFAULT_PAGE_SIZE", "50"),
        ]));
        let settings = load_from_empty_args();

        assert_eq!(settings.bind_addr().expect("addr").port(), 9000);
        assert_eq!(settings.export_dir(), PathBuf::from("/srv/exports"));
        assert_eq!(settings.export_marker(), "download_csv");
        assert!(settings.keep_export_files);
        assert_eq!(
            settings.naming_policy(),
            NamingPolicy {
                attempts: 3,
                retry_delay: Duration::from_millis(5),
            }
        );
        assert_eq!(settings.default_page_size(), 50);
    }

    #[rstest]
    fn blank_marker_falls_back_to_default() {
        let _guard = lock_env(cleared_except(&[("USERS_EXPORT_EXPORT_MARKER", "  ")]));
        assert_eq!(load_from_empty_args().export_marker(), "export_all_data");
    }

    #[rstest]
    fn malformed_bind_addr_is_reported() {
        let _guard = lock_env(cleared_except(&[("USERS_EXPORT_BIND_ADDR", "not an addr")]));
        assert!(load_from_empty_args().bind_addr().is_err());
    }
}
