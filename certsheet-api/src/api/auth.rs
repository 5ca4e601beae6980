//! Service account authentication
//!
//! Mints OAuth2 access tokens with the JWT bearer grant: a claim set signed
//! with the service account's RSA key is exchanged at the key's token URI.
//! Tokens are cached and refreshed shortly before they expire.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arc_swap::ArcSwapOption;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use log::debug;
use serde::Serialize;
use tokio::sync::Mutex;

use super::models::{ServiceAccountKey, TokenInfo, TokenResponse};

/// Full read/write access to spreadsheets
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for the signed assertion (Google caps it at one hour)
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh tokens this long before they expire
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// Issues bearer tokens for a service account
pub struct AuthManager {
    key: ServiceAccountKey,
    encoding_key: EncodingKey,
    scope: String,
    http: reqwest::Client,
    token: ArcSwapOption<TokenInfo>,
    /// Held while a new token is fetched so concurrent callers share it
    refresh: Mutex<()>,
}

impl AuthManager {
    /// Build from a parsed service account key
    pub fn new(key: ServiceAccountKey, scope: impl Into<String>, http: reqwest::Client) -> Result<Self> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .with_context(|| {
                format!(
                    "Invalid private key for service account {}",
                    key.client_email
                )
            })?;

        Ok(Self {
            key,
            encoding_key,
            scope: scope.into(),
            http,
            token: ArcSwapOption::empty(),
            refresh: Mutex::new(()),
        })
    }

    /// Load a service account key file from disk
    pub fn from_key_file(path: &Path, scope: impl Into<String>, http: reqwest::Client) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read service account key file: {}", path.display()))?;
        let key: ServiceAccountKey = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse service account key file: {}", path.display()))?;

        if let Some(key_type) = &key.key_type {
            if key_type != "service_account" {
                anyhow::bail!(
                    "Key file {} has type '{}', expected 'service_account'",
                    path.display(),
                    key_type
                );
            }
        }

        Self::new(key, scope, http)
    }

    pub fn client_email(&self) -> &str {
        &self.key.client_email
    }

    /// Return a valid access token, refreshing it if it is missing or about to expire
    pub async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let _refresh = self.refresh.lock().await;
        if let Some(token) = self.cached_token() {
            return Ok(token);
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        self.token.store(Some(Arc::new(token)));
        Ok(access_token)
    }

    /// The cached token, unless it is missing or about to expire
    fn cached_token(&self) -> Option<String> {
        let token = self.token.load_full()?;
        let margin = Duration::seconds(REFRESH_MARGIN_SECS);
        (!token.expires_within(Utc::now(), margin)).then(|| token.access_token.clone())
    }

    /// Drop the cached token so the next call fetches a fresh one
    pub fn invalidate(&self) {
        self.token.store(None);
    }

    fn signed_assertion(&self, issued_at: i64) -> Result<String> {
        let claims = Claims {
            iss: &self.key.client_email,
            scope: &self.scope,
            aud: &self.key.token_uri,
            iat: issued_at,
            exp: issued_at + ASSERTION_LIFETIME_SECS,
        };

        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key.private_key_id.clone();

        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .context("Failed to sign service account assertion")
    }

    async fn fetch_token(&self) -> Result<TokenInfo> {
        let now = Utc::now();
        let assertion = self.signed_assertion(now.timestamp())?;

        debug!(
            "Requesting access token for {} from {}",
            self.key.client_email, self.key.token_uri
        );

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .context("Failed to reach OAuth token endpoint")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Token request failed with status {}: {}", status, body);
        }

        let token: TokenResponse = response
            .json()
            .await
            .context("Failed to parse OAuth token response")?;

        debug!("Access token obtained, expires in {}s", token.expires_in);
        Ok(TokenInfo::from_response(token, now))
    }
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("client_email", &self.key.client_email)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::stub_server::{StubServer, TOKEN_PATH};
    use std::io::Write;

    #[test]
    fn test_missing_key_file() {
        let result = AuthManager::from_key_file(
            Path::new("/nonexistent/key.json"),
            SPREADSHEETS_SCOPE,
            reqwest::Client::new(),
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Failed to read service account key file"));
    }

    #[test]
    fn test_rejects_non_service_account_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type": "authorized_user", "client_email": "a@b.c", "private_key": "x"}}"#
        )
        .unwrap();

        let result =
            AuthManager::from_key_file(file.path(), SPREADSHEETS_SCOPE, reqwest::Client::new());
        assert!(result.unwrap_err().to_string().contains("expected 'service_account'"));
    }

    #[test]
    fn test_rejects_invalid_private_key() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type": "service_account", "client_email": "svc@project.iam.gserviceaccount.com", "private_key": "not a pem"}}"#
        )
        .unwrap();

        let result =
            AuthManager::from_key_file(file.path(), SPREADSHEETS_SCOPE, reqwest::Client::new());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Invalid private key"));
    }

    #[tokio::test]
    async fn test_token_exchange() {
        let server = StubServer::start().await;
        let auth = server.auth_manager();

        assert_eq!(auth.access_token().await.unwrap(), "token-1");

        let requests = server.token_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, reqwest::Method::POST);
        assert_eq!(
            requests[0].form_field("grant_type"),
            Some("urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer")
        );

        let assertion = requests[0].form_field("assertion").unwrap();
        let header = jsonwebtoken::decode_header(assertion).unwrap();
        assert_eq!(header.alg, Algorithm::RS256);
        assert_eq!(header.kid.as_deref(), Some("test-key-1"));
    }

    #[tokio::test]
    async fn test_token_is_cached() {
        let server = StubServer::start().await;
        let auth = server.auth_manager();

        auth.access_token().await.unwrap();
        assert_eq!(auth.access_token().await.unwrap(), "token-1");
        assert_eq!(server.token_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_refresh() {
        let server = StubServer::start().await;
        let auth = server.auth_manager();

        let (a, b, c) = tokio::join!(auth.access_token(), auth.access_token(), auth.access_token());

        assert_eq!(
            [a.unwrap(), b.unwrap(), c.unwrap()],
            ["token-1", "token-1", "token-1"]
        );
        assert_eq!(server.token_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_invalidate_forces_refresh() {
        let server = StubServer::start().await;
        let auth = server.auth_manager();

        auth.access_token().await.unwrap();
        auth.invalidate();
        assert_eq!(auth.access_token().await.unwrap(), "token-2");
    }

    #[tokio::test]
    async fn test_token_endpoint_error() {
        let server = StubServer::start().await;
        server.respond(
            TOKEN_PATH,
            reqwest::StatusCode::BAD_REQUEST,
            serde_json::json!({ "error": "invalid_grant", "error_description": "Invalid JWT Signature." }),
        );
        let auth = server.auth_manager();

        let err = auth.access_token().await.unwrap_err().to_string();
        assert!(err.contains("400"));
        assert!(err.contains("invalid_grant"));

        auth.access_token().await.unwrap_err();
        assert_eq!(server.token_requests().len(), 2);
    }
}
