//! Client-credentials authentication for the Microsoft identity platform.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use reqwest::Client;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::{DriveError, Result};
use crate::models::TokenResponse;

/// Default Microsoft identity endpoint base.
pub const LOGIN_BASE: &str = "https://login.microsoftonline.com";

/// Scope requesting the application permissions configured for the client.
const GRAPH_SCOPE: &str = "https://graph.microsoft.com/.default";

/// Cached access token with expiration.
#[derive(Clone)]
struct CachedToken {
    access_token: String,
    expires_at: SystemTime,
}

/// Token provider performing the OAuth2 client-credentials grant.
#[derive(Clone)]
pub struct TokenProvider {
    tenant: String,
    client_id: String,
    client_secret: String,
    login_base: String,
    client: Client,
    cached_token: Arc<RwLock<Option<CachedToken>>>,
}

impl TokenProvider {
    /// Create a token provider against the public identity endpoint.
    pub fn new(
        tenant: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self::with_login_base(LOGIN_BASE, tenant, client_id, client_secret)
    }

    /// Create a token provider against a custom identity endpoint base.
    pub fn with_login_base(
        login_base: impl Into<String>,
        tenant: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant: tenant.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            login_base: login_base.into(),
            client: Client::new(),
            cached_token: Arc::new(RwLock::new(None)),
        }
    }

    fn token_url(&self) -> String {
        format!("{}/{}/oauth2/v2.0/token", self.login_base, self.tenant)
    }

    /// Get a valid bearer token, exchanging credentials if necessary.
    pub async fn get_access_token(&self) -> Result<String> {
        // Check if we have a valid cached token
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                // Add 60 second buffer before expiration
                let buffer = Duration::from_secs(60);
                if token.expires_at > SystemTime::now() + buffer {
                    return Ok(token.access_token.clone());
                }
            }
        }

        // Exchange credentials for a fresh token
        let new_token = self.fetch_token().await?;

        {
            let mut cached = self.cached_token.write().await;
            *cached = Some(new_token.clone());
        }

        Ok(new_token.access_token)
    }

    /// Perform the client-credentials exchange.
    async fn fetch_token(&self) -> Result<CachedToken> {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", GRAPH_SCOPE),
            ("grant_type", "client_credentials"),
        ];

        debug!(tenant = %self.tenant, "requesting access token");

        let response = self
            .client
            .post(self.token_url())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DriveError::Authentication(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token_response: TokenResponse = response.json().await?;

        let expires_at = SystemTime::now() + Duration::from_secs(token_response.expires_in);

        Ok(CachedToken {
            access_token: token_response.access_token,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_url() {
        let provider = TokenProvider::new("contoso.onmicrosoft.com", "client", "secret");
        assert_eq!(
            provider.token_url(),
            "https://login.microsoftonline.com/contoso.onmicrosoft.com/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_token_url_with_custom_base() {
        let provider =
            TokenProvider::with_login_base("http://127.0.0.1:9999", "t1", "client", "secret");
        assert_eq!(provider.token_url(), "http://127.0.0.1:9999/t1/oauth2/v2.0/token");
    }
}
