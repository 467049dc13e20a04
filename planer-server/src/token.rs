//! Bearer tokens for the SharePoint REST API.
//!
//! Client-credentials grant against Azure ACS. The token is cached until
//! shortly before it expires and refreshed lazily on the next request.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::ServerConfig;
use crate::store::{StoreError, StoreResult};

/// Resource principal of SharePoint Online.
const SHAREPOINT_PRINCIPAL: &str = "00000003-0000-0ff1-ce00-000000000000";

/// Minimum lifetime granted to a cached token, in seconds.
const MIN_LIFETIME: i64 = 300;

/// Safety margin subtracted from the lifetime ACS reports, in seconds.
const EXPIRY_MARGIN: i64 = 300;

#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// A token that is valid right now, refreshed if needed.
    async fn valid_token(&self) -> StoreResult<String>;
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        let lifetime = (response.expires_in - EXPIRY_MARGIN).max(MIN_LIFETIME);
        CachedToken {
            access_token: response.access_token,
            expires_at: now + Duration::seconds(lifetime),
        }
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(deserialize_with = "seconds")]
    expires_in: i64,
}

/// ACS sends `expires_in` as a string.
fn seconds<'de, D: serde::Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(d)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

pub struct AcsTokenProvider {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    resource: String,
    cached: Mutex<Option<CachedToken>>,
}

impl AcsTokenProvider {
    pub fn new(http: reqwest::Client, config: &ServerConfig) -> Self {
        AcsTokenProvider {
            http,
            token_url: format!(
                "https://accounts.accesscontrol.windows.net/{}/tokens/OAuth/2",
                config.tenant_id
            ),
            client_id: format!("{}@{}", config.client_id, config.tenant_id),
            client_secret: config.client_secret.clone(),
            resource: format!(
                "{}/{}@{}",
                SHAREPOINT_PRINCIPAL, config.sp_site, config.tenant_id
            ),
            cached: Mutex::new(None),
        }
    }

    async fn request_token(&self) -> StoreResult<TokenResponse> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("resource", self.resource.as_str()),
        ];

        let response = self
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(StoreError::Token(response.status().as_u16().to_string()));
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::Decode(format!("token response: {e}")))
    }
}

#[async_trait]
impl TokenProvider for AcsTokenProvider {
    async fn valid_token(&self) -> StoreResult<String> {
        // Held across the refresh so concurrent requests wait for one exchange
        let mut cached = self.cached.lock().await;
        let now = Utc::now();

        if let Some(token) = cached.as_ref().filter(|t| !t.is_expired(now)) {
            return Ok(token.access_token.clone());
        }

        debug!("Requesting new ACS token");
        let token = CachedToken::from_response(self.request_token().await?, now);
        info!(expires_at = %token.expires_at, "ACS token refreshed");

        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }
}

/// Fixed token, for stores that do not need a real exchange.
#[cfg(test)]
pub struct StaticToken(pub String);

#[cfg(test)]
#[async_trait]
impl TokenProvider for StaticToken {
    async fn valid_token(&self) -> StoreResult<String> {
        Ok(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(expires_in: i64) -> TokenResponse {
        TokenResponse {
            access_token: "abc".into(),
            expires_in,
        }
    }

    #[test]
    fn test_expiry_keeps_margin() {
        let now = Utc::now();
        let token = CachedToken::from_response(response(3600), now);
        assert_eq!(token.expires_at, now + Duration::seconds(3300));
        assert!(!token.is_expired(now + Duration::seconds(3299)));
        assert!(token.is_expired(now + Duration::seconds(3300)));
    }

    #[test]
    fn test_short_lifetime_is_clamped() {
        let now = Utc::now();
        let token = CachedToken::from_response(response(400), now);
        assert_eq!(token.expires_at, now + Duration::seconds(300));
    }

    #[test]
    fn test_expires_in_as_string() {
        let parsed: TokenResponse =
            serde_json::from_str(r#"{"access_token":"t","expires_in":"86399","token_type":"Bearer"}"#)
                .unwrap();
        assert_eq!(parsed.expires_in, 86399);
    }

    #[tokio::test]
    async fn test_cached_token_is_reused() {
        let config = ServerConfig {
            tenant_id: "tenant".into(),
            client_id: "client".into(),
            client_secret: "secret".into(),
            sp_site: "contoso.sharepoint.com".into(),
            sp_site_path: "/sites/x".into(),
            bind: "127.0.0.1:0".into(),
            page_size: 1000,
            first_name_column: false,
        };
        let provider = AcsTokenProvider::new(reqwest::Client::new(), &config);
        assert_eq!(provider.client_id, "client@tenant");
        assert_eq!(
            provider.resource,
            "00000003-0000-0ff1-ce00-000000000000/contoso.sharepoint.com@tenant"
        );

        // A valid cached token answers without touching the network
        *provider.cached.lock().await = Some(CachedToken::from_response(response(3600), Utc::now()));
        assert_eq!(provider.valid_token().await.unwrap(), "abc");
    }
}
