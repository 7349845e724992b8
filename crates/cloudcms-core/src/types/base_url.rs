//! API base URL type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::{ConfigError, Error};

/// A validated Cloud CMS API base URL.
///
/// Only `http` and `https` URLs with a host are accepted. A trailing slash is
/// dropped so that endpoint paths, which always start with `/`, can be
/// appended directly. A path prefix (for deployments behind a proxy) is kept.
///
/// # Example
///
/// ```
/// use cloudcms_core::BaseUrl;
///
/// let base = BaseUrl::new("https://api.cloudcms.com/").unwrap();
/// assert_eq!(base.endpoint("/repositories"), "https://api.cloudcms.com/repositories");
/// assert_eq!(base.token_url(), "https://api.cloudcms.com/oauth/token");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Create a new base URL from a string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the string is not an
    /// absolute `http`/`https` URL with a host.
    pub fn new(s: impl AsRef<str>) -> Result<Self, Error> {
        let s = s.as_ref().trim();
        let url = Url::parse(s).map_err(|e| ConfigError::InvalidBaseUrl {
            value: s.to_string(),
            reason: e.to_string(),
        })?;

        Self::validate(&url, s)?;

        let normalized = url.as_str().trim_end_matches('/').to_string();
        Ok(Self(normalized))
    }

    /// Returns the absolute URL for an API path such as `/repositories`.
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.0, path)
        } else {
            format!("{}/{}", self.0, path)
        }
    }

    /// Returns the OAuth2 token endpoint.
    pub fn token_url(&self) -> String {
        self.endpoint("/oauth/token")
    }

    /// Returns the base URL as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(url: &Url, original: &str) -> Result<(), Error> {
        let invalid = |reason: &str| -> Error {
            ConfigError::InvalidBaseUrl {
                value: original.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        if url.cannot_be_a_base() {
            return Err(invalid("must be an absolute URL"));
        }

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("must use http or https"));
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid("must have a host"));
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("must not carry a query or fragment"));
        }

        Ok(())
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BaseUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for BaseUrl {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for BaseUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BaseUrl::new(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_https_url() {
        let base = BaseUrl::new("https://api.cloudcms.com").unwrap();
        assert_eq!(base.as_str(), "https://api.cloudcms.com");
    }

    #[test]
    fn http_is_allowed() {
        let base = BaseUrl::new("http://localhost:8080").unwrap();
        assert_eq!(base.endpoint("/"), "http://localhost:8080/");
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let base = BaseUrl::new("https://api.cloudcms.com/").unwrap();
        assert_eq!(
            base.endpoint("/jobs/123"),
            "https://api.cloudcms.com/jobs/123"
        );
    }

    #[test]
    fn path_prefix_is_kept() {
        let base = BaseUrl::new("https://example.com/proxy/").unwrap();
        assert_eq!(
            base.endpoint("repositories"),
            "https://example.com/proxy/repositories"
        );
        assert_eq!(base.token_url(), "https://example.com/proxy/oauth/token");
    }

    #[test]
    fn invalid_relative_url() {
        assert!(BaseUrl::new("/repositories").is_err());
    }

    #[test]
    fn invalid_scheme() {
        let err = BaseUrl::new("ftp://example.com").unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn query_is_rejected() {
        assert!(BaseUrl::new("https://example.com/?a=b").is_err());
    }
}
