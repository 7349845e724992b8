//! OAuth2 token types and the token lifecycle state machine.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

use crate::error::{AuthError, Error};

/// Tokens are treated as expired this long before their actual expiry, so a
/// request never leaves with a token that lapses in flight.
pub const EXPIRY_LEEWAY_SECS: i64 = 30;

/// A bearer access token.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in authorization headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A refresh token for obtaining new access tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Create a new refresh token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in refresh requests.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}

/// The tokens issued by one successful grant.
#[derive(Debug, Clone)]
pub struct TokenSet {
    /// Bearer token attached to API requests.
    pub access_token: AccessToken,
    /// Token for the refresh grant, if the server issued one.
    pub refresh_token: Option<RefreshToken>,
    /// Absolute expiry; `None` means the server gave no lifetime.
    pub expires_at: Option<DateTime<Utc>>,
    /// Granted scopes, space separated.
    pub scope: Option<String>,
}

impl TokenSet {
    /// Build a token set from a grant response received at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidTokenResponse`] if `expires_in` does not
    /// fit in the calendar range.
    pub fn issued(
        access_token: AccessToken,
        refresh_token: Option<RefreshToken>,
        expires_in: Option<i64>,
        scope: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, Error> {
        let expires_at = expires_in
            .map(|secs| {
                Duration::try_seconds(secs)
                    .and_then(|lifetime| now.checked_add_signed(lifetime))
                    .ok_or_else(|| AuthError::InvalidTokenResponse {
                        reason: format!("expires_in {secs} is out of range"),
                    })
            })
            .transpose()?;

        Ok(Self {
            access_token,
            refresh_token,
            expires_at,
            scope,
        })
    }

    /// Returns true if the access token should no longer be used at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(at) => now + Duration::seconds(EXPIRY_LEEWAY_SECS) >= at,
            None => false,
        }
    }
}

/// Lifecycle of the session's credentials.
///
/// ```text
///   Unauthenticated --grant--> Authenticated --expiry--> Expired
///         ^                         ^                        |
///         |                         +------ refresh ---------+
///         +------------- rejected grant / refresh -----------+
/// ```
#[derive(Debug, Clone, Default)]
pub enum TokenState {
    /// No token has been acquired, or the last grant was rejected.
    #[default]
    Unauthenticated,
    /// A token is held and believed valid.
    Authenticated(TokenSet),
    /// A token is held but has expired; it must be refreshed before use.
    Expired(TokenSet),
}

/// What the transport must do before it can send a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenAction {
    /// Use this access token.
    Use(AccessToken),
    /// Run the refresh grant with this refresh token.
    Refresh(RefreshToken),
    /// Run the password grant.
    Grant,
}

impl TokenState {
    /// Apply the expiry transition, then decide what the caller must do.
    pub fn next_action(&mut self, now: DateTime<Utc>) -> TokenAction {
        if let TokenState::Authenticated(set) = self {
            if set.is_expired_at(now) {
                *self = TokenState::Expired(set.clone());
            }
        }

        match self {
            TokenState::Authenticated(set) => TokenAction::Use(set.access_token.clone()),
            TokenState::Expired(set) => match &set.refresh_token {
                Some(refresh) => TokenAction::Refresh(refresh.clone()),
                None => TokenAction::Grant,
            },
            TokenState::Unauthenticated => TokenAction::Grant,
        }
    }

    /// Record a successful grant or refresh.
    ///
    /// A refresh response that omits the refresh token keeps the previous one.
    pub fn authenticated(&mut self, mut set: TokenSet) {
        if set.refresh_token.is_none() {
            if let TokenState::Authenticated(old) | TokenState::Expired(old) = self {
                set.refresh_token = old.refresh_token.take();
            }
        }
        *self = TokenState::Authenticated(set);
    }

    /// Force the expiry transition, e.g. before an explicit refresh.
    pub fn expire(&mut self) {
        if let TokenState::Authenticated(set) = self {
            *self = TokenState::Expired(set.clone());
        }
    }

    /// Record a rejected grant.
    pub fn reset(&mut self) {
        *self = TokenState::Unauthenticated;
    }

    /// Returns the current token set, if any.
    pub fn tokens(&self) -> Option<&TokenSet> {
        match self {
            TokenState::Authenticated(set) | TokenState::Expired(set) => Some(set),
            TokenState::Unauthenticated => None,
        }
    }

    /// Returns true if a usable (not yet expired) token is held.
    pub fn is_authenticated(&self) -> bool {
        matches!(self, TokenState::Authenticated(_))
    }
}
