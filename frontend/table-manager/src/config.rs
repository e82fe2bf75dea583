//! Table manager configuration loaded via OrthoConfig.

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::domain::{EntityKind, EntityKindParseError};

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Errors raised while loading or interpreting settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Configuration sources could not be merged.
    #[error("failed to load settings: {message}")]
    Load {
        /// Loader diagnostic.
        message: String,
    },
    /// The backend base URL is not a valid URL.
    #[error("invalid base URL `{value}`: {source}")]
    BaseUrl {
        /// Configured value.
        value: String,
        /// Parser diagnostic.
        #[source]
        source: url::ParseError,
    },
    /// The request timeout must be at least one second.
    #[error("request timeout must be at least one second")]
    ZeroTimeout,
    /// The initial entity kind is not recognised.
    #[error(transparent)]
    InitialKind(#[from] EntityKindParseError),
}

/// Connection and startup settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TABLE_MANAGER")]
pub struct TableManagerSettings {
    /// Root URL of the backend; `/api/...` paths are appended to it.
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Entity kind selected at startup.
    pub initial_kind: Option<String>,
}

impl TableManagerSettings {
    /// Load settings from configuration files and `TABLE_MANAGER_*`
    /// environment variables.
    ///
    /// Command-line flags are handled by the binary, so only the program name
    /// is passed to the loader.
    ///
    /// # Errors
    ///
    /// Returns an error when a configuration source cannot be parsed.
    pub fn load_without_cli(program: &str) -> Result<Self, SettingsError> {
        Self::load_from_iter([OsString::from(program)]).map_err(|error| SettingsError::Load {
            message: error.to_string(),
        })
    }

    /// Return the configured base URL, falling back to the local backend.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value does not parse as a URL.
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let value = self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        Url::parse(value).map_err(|source| SettingsError::BaseUrl {
            value: value.to_owned(),
            source,
        })
    }

    /// Return the configured request timeout, falling back to 30 seconds.
    ///
    /// # Errors
    ///
    /// Returns an error when the timeout is configured as zero.
    pub fn request_timeout(&self) -> Result<Duration, SettingsError> {
        match self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS) {
            0 => Err(SettingsError::ZeroTimeout),
            secs => Ok(Duration::from_secs(secs)),
        }
    }

    /// Return the configured initial kind, falling back to `Mill`.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured name is not a known kind.
    pub fn initial_kind(&self) -> Result<EntityKind, SettingsError> {
        self.initial_kind
            .as_deref()
            .map_or(Ok(EntityKind::default()), str::parse)
            .map_err(SettingsError::from)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> TableManagerSettings {
        TableManagerSettings::load_without_cli("table-manager").expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("TABLE_MANAGER_BASE_URL", None::<String>),
            ("TABLE_MANAGER_REQUEST_TIMEOUT_SECS", None::<String>),
            ("TABLE_MANAGER_INITIAL_KIND", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.base_url().expect("default url").as_str(),
            "http://127.0.0.1:5000/"
        );
        assert_eq!(
            settings.request_timeout().expect("default timeout"),
            Duration::from_secs(30)
        );
        assert_eq!(settings.initial_kind().expect("default kind"), EntityKind::Mill);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "TABLE_MANAGER_BASE_URL",
                Some("http://mill.internal:8080/tools/".to_owned()),
            ),
            ("TABLE_MANAGER_REQUEST_TIMEOUT_SECS", Some("5".to_owned())),
            (
                "TABLE_MANAGER_INITIAL_KIND",
                Some("Product_Movement_Log".to_owned()),
            ),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.base_url().expect("configured url").as_str(),
            "http://mill.internal:8080/tools/"
        );
        assert_eq!(
            settings.request_timeout().expect("configured timeout"),
            Duration::from_secs(5)
        );
        assert_eq!(
            settings.initial_kind().expect("configured kind"),
            EntityKind::ProductMovementLog
        );
    }

    #[rstest]
    fn invalid_values_are_reported() {
        let _guard = lock_env([
            ("TABLE_MANAGER_BASE_URL", Some("not a url".to_owned())),
            ("TABLE_MANAGER_REQUEST_TIMEOUT_SECS", Some("0".to_owned())),
            ("TABLE_MANAGER_INITIAL_KIND", Some("Warehouse".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.base_url(),
            Err(SettingsError::BaseUrl { .. })
        ));
        assert!(matches!(
            settings.request_timeout(),
            Err(SettingsError::ZeroTimeout)
        ));
        assert!(matches!(
            settings.initial_kind(),
            Err(SettingsError::InitialKind(_))
        ));
    }
}
