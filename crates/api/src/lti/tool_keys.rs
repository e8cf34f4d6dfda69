//! The tool's public key set, served at `/jwks/` for platforms to verify
//! tool-signed messages.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use quizext_db::models::key::Key;
use rsa::pkcs1::DecodeRsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPublicKey;
use serde::Serialize;
use sha2::{Digest, Sha256};

use super::LtiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicJwk {
    pub kty: &'static str,
    pub alg: String,
    #[serde(rename = "use")]
    pub key_use: &'static str,
    pub kid: String,
    pub n: String,
    pub e: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicJwks {
    pub keys: Vec<PublicJwk>,
}

/// Key id of a public key: the SHA-256 hex digest of its PEM.
pub fn key_id(public_pem: &str) -> String {
    format!("{:x}", Sha256::digest(public_pem.as_bytes()))
}

fn parse_public_pem(pem: &str) -> Option<RsaPublicKey> {
    RsaPublicKey::from_public_key_pem(pem)
        .ok()
        .or_else(|| RsaPublicKey::from_pkcs1_pem(pem).ok())
}

/// Publish a stored key as an RSA JWK. Both SPKI and PKCS#1 PEMs are read.
pub fn public_jwk(key: &Key) -> Result<PublicJwk, LtiError> {
    let public = parse_public_pem(&key.public_key).ok_or_else(|| {
        LtiError::InvalidToolKey(key.id, "public key is not an RSA PEM".to_string())
    })?;

    Ok(PublicJwk {
        kty: "RSA",
        alg: key.alg.clone(),
        key_use: "sig",
        kid: key_id(&key.public_key),
        n: URL_SAFE_NO_PAD.encode(public.n().to_bytes_be()),
        e: URL_SAFE_NO_PAD.encode(public.e().to_bytes_be()),
    })
}

/// JWKS for a list of keys; keys that fail to parse are logged and left out.
pub fn public_jwks(keys: &[Key]) -> PublicJwks {
    let keys = keys
        .iter()
        .filter_map(|key| match public_jwk(key) {
            Ok(jwk) => Some(jwk),
            Err(e) => {
                tracing::error!(key_id = key.id, error = %e, "Skipping tool key");
                None
            }
        })
        .collect();
    PublicJwks { keys }
}
