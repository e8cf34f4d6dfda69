//! Cache of platform JSON Web Key Sets used to verify launch id tokens.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use jsonwebtoken::jwk::{JwkSet, PublicKeyUse};
use jsonwebtoken::DecodingKey;
use tokio::sync::RwLock;

use super::LtiError;

/// How long a fetched key set is trusted before it is fetched again.
pub const JWKS_TTL: Duration = Duration::from_secs(300);

struct CachedKeys {
    fetched_at: Instant,
    keys: HashMap<String, DecodingKey>,
}

/// Signing keys per JWKS url.
///
/// A key id missing from a fresh set triggers one refetch, which picks up
/// keys the platform rotated in since the last fetch.
pub struct PlatformKeyCache {
    http: reqwest::Client,
    ttl: Duration,
    sets: RwLock<HashMap<String, CachedKeys>>,
}

impl PlatformKeyCache {
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_ttl(http, JWKS_TTL)
    }

    pub fn with_ttl(http: reqwest::Client, ttl: Duration) -> Self {
        Self {
            http,
            ttl,
            sets: RwLock::new(HashMap::new()),
        }
    }

    /// The decoding key `kid` published at `jwks_url`.
    pub async fn key(&self, jwks_url: &str, kid: &str) -> Result<DecodingKey, LtiError> {
        if let Some(key) = self.cached(jwks_url, kid).await {
            return Ok(key);
        }

        let keys = self.fetch(jwks_url).await?;
        let key = keys.get(kid).cloned();
        self.sets.write().await.insert(
            jwks_url.to_string(),
            CachedKeys {
                fetched_at: Instant::now(),
                keys,
            },
        );

        key.ok_or_else(|| LtiError::UnknownKey(kid.to_string()))
    }

    async fn cached(&self, jwks_url: &str, kid: &str) -> Option<DecodingKey> {
        let sets = self.sets.read().await;
        let entry = sets.get(jwks_url)?;
        if entry.fetched_at.elapsed() > self.ttl {
            return None;
        }
        entry.keys.get(kid).cloned()
    }

    async fn fetch(&self, jwks_url: &str) -> Result<HashMap<String, DecodingKey>, LtiError> {
        tracing::debug!(jwks_url, "Fetching platform keys");

        let jwk_set: JwkSet = self
            .http
            .get(jwks_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| LtiError::PlatformKeys(e.to_string()))?
            .json()
            .await
            .map_err(|e| LtiError::PlatformKeys(e.to_string()))?;

        let keys = jwk_set
            .keys
            .into_iter()
            .filter(|jwk| {
                matches!(jwk.common.public_key_use, None | Some(PublicKeyUse::Signature))
            })
            .filter_map(|jwk| {
                let kid = jwk.common.key_id.clone()?;
                match DecodingKey::from_jwk(&jwk) {
                    Ok(key) => Some((kid, key)),
                    Err(e) => {
                        tracing::warn!(kid, error = %e, "Skipping unusable platform key");
                        None
                    }
                }
            })
            .collect();

        Ok(keys)
    }
}
