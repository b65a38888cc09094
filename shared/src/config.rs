use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::error::APPLICATION_ERROR_HEADER;
use crate::pagination::PAGINATION_HEADER;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("base_url must not be empty")]
    EmptyBaseUrl,

    #[error("base_url '{url}' is invalid: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("{field} must not be empty")]
    EmptyHeaderName { field: &'static str },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Root of the REST API. Resource paths are joined under it.
    pub base_url: String,
    pub pagination_header: String,
    pub application_error_header: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            pagination_header: PAGINATION_HEADER.to_string(),
            application_error_header: APPLICATION_ERROR_HEADER.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_root().map(|_| ())?;
        if self.pagination_header.trim().is_empty() {
            return Err(ConfigError::EmptyHeaderName {
                field: "pagination_header",
            });
        }
        if self.application_error_header.trim().is_empty() {
            return Err(ConfigError::EmptyHeaderName {
                field: "application_error_header",
            });
        }
        Ok(())
    }

    /// The base URL parsed, with a trailing `/` so relative joins stay under it.
    pub fn api_root(&self) -> Result<Url, ConfigError> {
        let raw = self.base_url.trim();
        if raw.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        let mut url = Url::parse(raw).map_err(|e| ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidBaseUrl {
                url: raw.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(ConfigError::InvalidBaseUrl {
                url: raw.to_string(),
                reason: "query and fragment are not allowed".into(),
            });
        }

        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.pagination_header, "Pagination");
        assert_eq!(config.application_error_header, "Application-Error");
    }

    #[test]
    fn test_trailing_slash_is_added() {
        let root = ClientConfig::new("https://dating.example.com/api")
            .api_root()
            .unwrap();
        assert_eq!(root.as_str(), "https://dating.example.com/api/");
        assert_eq!(
            root.join("users/3").unwrap().as_str(),
            "https://dating.example.com/api/users/3"
        );
    }

    #[test]
    fn test_rejects_bad_base_urls() {
        assert_eq!(
            ClientConfig::new("  ").validate(),
            Err(ConfigError::EmptyBaseUrl)
        );
        assert!(matches!(
            ClientConfig::new("api/users").validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ClientConfig::new("ftp://example.com/").validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ClientConfig::new("https://example.com/api?x=1").validate(),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_partial_config_from_shell_uses_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url":"https://dating.example.com/api"}"#).unwrap();
        assert_eq!(config.base_url, "https://dating.example.com/api");
        assert_eq!(config.pagination_header, PAGINATION_HEADER);
    }

    #[test]
    fn test_rejects_empty_header_names() {
        let config = ClientConfig {
            pagination_header: String::new(),
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyHeaderName {
                field: "pagination_header"
            })
        );
    }
}
