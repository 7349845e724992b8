//! OAuth2 password and refresh grants.

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use cloudcms_core::error::AuthError;
use cloudcms_core::{AccessToken, Credentials, Error, RefreshToken, Result, TokenAction, TokenSet, TokenState};

use crate::client::HttpClient;

/// Scope requested by the password grant.
const SCOPE: &str = "api";

/// Token endpoint response.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[allow(dead_code)]
    token_type: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    scope: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Drives the token state machine for one session.
pub(crate) struct Authenticator {
    credentials: Credentials,
    state: RwLock<TokenState>,
}

impl Authenticator {
    pub(crate) fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            state: RwLock::new(TokenState::default()),
        }
    }

    /// Returns a usable access token, running a grant first if needed.
    pub(crate) async fn access_token(&self, client: &HttpClient) -> Result<AccessToken> {
        {
            let state = self.state.read().await;
            if let TokenState::Authenticated(set) = &*state
                && !set.is_expired_at(Utc::now())
            {
                return Ok(set.access_token.clone());
            }
        }

        // Another task may have renewed the token while we waited for the
        // write lock; next_action re-checks.
        let mut state = self.state.write().await;
        self.advance(&mut state, client).await
    }

    /// Force the expiry transition and renew.
    pub(crate) async fn refresh(&self, client: &HttpClient) -> Result<()> {
        let mut state = self.state.write().await;
        state.expire();
        self.advance(&mut state, client).await.map(|_| ())
    }

    /// Snapshot of the current state.
    pub(crate) async fn state(&self) -> TokenState {
        self.state.read().await.clone()
    }

    async fn advance(&self, state: &mut TokenState, client: &HttpClient) -> Result<AccessToken> {
        let result = match state.next_action(Utc::now()) {
            TokenAction::Use(token) => return Ok(token),
            TokenAction::Refresh(refresh) => {
                debug!("access token expired, running refresh grant");
                self.refresh_grant(client, &refresh).await
            }
            TokenAction::Grant => {
                debug!("running password grant");
                self.password_grant(client).await
            }
        };

        match result {
            Ok(set) => {
                let token = set.access_token.clone();
                state.authenticated(set);
                Ok(token)
            }
            Err(err @ Error::Auth(_)) => {
                warn!(error = %err, "token grant rejected");
                state.reset();
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    async fn password_grant(&self, client: &HttpClient) -> Result<TokenSet> {
        let creds = &self.credentials;
        let form = [
            ("grant_type", "password"),
            ("username", creds.username()),
            ("password", creds.password()),
            ("client_id", creds.client_key()),
            ("client_secret", creds.client_secret()),
            ("scope", SCOPE),
        ];
        let set = grant(client, &form).await?;
        info!(username = creds.username(), "authenticated");
        Ok(set)
    }

    async fn refresh_grant(&self, client: &HttpClient, refresh: &RefreshToken) -> Result<TokenSet> {
        let creds = &self.credentials;
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh.as_str()),
            ("client_id", creds.client_key()),
            ("client_secret", creds.client_secret()),
        ];
        let set = grant(client, &form).await?;
        info!("access token refreshed");
        Ok(set)
    }
}

impl std::fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authenticator")
            .field("credentials", &self.credentials)
            .field("state", &"[REDACTED]")
            .finish()
    }
}

async fn grant(client: &HttpClient, form: &[(&str, &str)]) -> Result<TokenSet> {
    let issued_at = Utc::now();
    let (status, body) = client.token_request(form).await?;
    let text = String::from_utf8_lossy(&body).into_owned();

    if !(200..300).contains(&status) {
        return Err(AuthError::GrantRejected { status, body: text }.into());
    }

    let response: TokenResponse =
        serde_json::from_slice(&body).map_err(|e| AuthError::InvalidTokenResponse {
            reason: e.to_string(),
        })?;

    if let Some(error) = response.error {
        let detail = response
            .error_description
            .map(|d| format!("{error}: {d}"))
            .unwrap_or(error);
        return Err(AuthError::GrantRejected {
            status,
            body: detail,
        }
        .into());
    }

    let access_token = response
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthError::InvalidTokenResponse {
            reason: "missing access_token".to_string(),
        })?;

    TokenSet::issued(
        AccessToken::new(access_token),
        response.refresh_token.map(RefreshToken::new),
        response.expires_in,
        response.scope,
        issued_at,
    )
}
