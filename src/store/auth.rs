//! Firestore Authentication
//!
//! Production Firestore requires an OAuth2 access token. We mint one with the
//! service account JWT bearer grant: sign a short-lived RS256 assertion with the
//! account's private key and exchange it at the key's `token_uri`. The resulting
//! token is cached and reused until shortly before it expires.
//!
//! The emulator accepts any bearer; `owner` grants full access.

use super::credentials::ServiceAccountKey;
use super::protocol::{DATASTORE_SCOPE, TokenResponse};
use super::types::{StoreError, StoreResult};

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;

const ASSERTION_LIFETIME_SECS: u64 = 3600;
const REFRESH_MARGIN: Duration = Duration::from_secs(60);
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
pub const EMULATOR_BEARER: &str = "owner";

pub enum Authenticator {
    Emulator,
    ServiceAccount(ServiceAccountAuth),
}

impl Authenticator {
    pub async fn bearer(&self, http_client: &reqwest::Client) -> StoreResult<String> {
        match self {
            Self::Emulator => Ok(EMULATOR_BEARER.to_string()),
            Self::ServiceAccount(auth) => auth.access_token(http_client).await,
        }
    }
}

/// Claims of the signed assertion sent to the token endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssertionClaims {
    pub iss: String,
    pub scope: String,
    pub aud: String,
    pub iat: u64,
    pub exp: u64,
}

struct CachedToken {
    value: String,
    refresh_at: Instant,
}

pub struct ServiceAccountAuth {
    client_email: String,
    token_uri: String,
    signing_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountAuth {
    /// Fails if the private key is not a valid RSA PEM.
    pub fn new(key: &ServiceAccountKey) -> StoreResult<Self> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            StoreError::Unavailable(format!("invalid service account private key: {}", e))
        })?;

        Ok(Self {
            client_email: key.client_email.clone(),
            token_uri: key.token_uri.clone(),
            signing_key,
            cached: Mutex::new(None),
        })
    }

    pub async fn access_token(&self, http_client: &reqwest::Client) -> StoreResult<String> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref()
            && Instant::now() < token.refresh_at
        {
            return Ok(token.value.clone());
        }

        let fresh = self.exchange(http_client).await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);

        Ok(value)
    }

    pub fn sign_assertion(&self) -> StoreResult<String> {
        let iat = now_secs();
        let claims = AssertionClaims {
            iss: self.client_email.clone(),
            scope: DATASTORE_SCOPE.to_string(),
            aud: self.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| StoreError::Unavailable(format!("failed to sign token assertion: {}", e)))
    }

    async fn exchange(&self, http_client: &reqwest::Client) -> StoreResult<CachedToken> {
        let assertion = self.sign_assertion()?;

        let response = http_client
            .post(&self.token_uri)
            .form(&[
                ("grant_type", JWT_BEARER_GRANT),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("token exchange failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Unavailable(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Unavailable(format!("malformed token response: {}", e)))?;

        tracing::debug!("Obtained Firestore access token valid for {}s", token.expires_in);

        let lifetime = Duration::from_secs(token.expires_in).saturating_sub(REFRESH_MARGIN);
        Ok(CachedToken {
            value: token.access_token,
            refresh_at: Instant::now() + lifetime,
        })
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
