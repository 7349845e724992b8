//! OAuth2 password-grant credentials.

use std::fmt;

/// Client and user credentials for the OAuth2 password grant.
///
/// # Security
///
/// The client secret and the password are never exposed in Debug output.
///
/// # Example
///
/// ```
/// use cloudcms_core::Credentials;
///
/// let creds = Credentials::new("client-key", "client-secret", "bob", "password1");
/// assert_eq!(creds.username(), "bob");
/// assert!(!format!("{creds:?}").contains("password1"));
/// ```
#[derive(Clone)]
pub struct Credentials {
    client_key: String,
    client_secret: String,
    username: String,
    password: String,
}

impl Credentials {
    /// Create new credentials.
    pub fn new(
        client_key: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client_key: client_key.into(),
            client_secret: client_secret.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns the OAuth client id.
    pub fn client_key(&self) -> &str {
        &self.client_key
    }

    /// Returns the OAuth client secret.
    ///
    /// Use only when constructing token requests.
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the username.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the password.
    ///
    /// Use only when constructing token requests.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_key", &self.client_key)
            .field("client_secret", &"[REDACTED]")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
