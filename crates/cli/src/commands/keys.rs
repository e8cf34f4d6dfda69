//! Tool signing key generation.

use anyhow::{anyhow, bail, Context};
use quizext_core::types::DbId;
use quizext_db::models::key::{CreateKey, Key};
use quizext_db::repositories::{KeyRepo, KeySetRepo};
use rsa::pkcs8::{EncodePrivateKey, EncodePublicKey, LineEnding};
use rsa::rand_core::OsRng;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sqlx::PgPool;

pub const DEFAULT_KEY_BITS: usize = 4096;
/// RS256 verifiers reject smaller moduli.
pub const MIN_KEY_BITS: usize = 2048;
pub const KEY_ALG: &str = "RS256";

/// PKCS#8 private and SPKI public PEMs of a fresh RSA key pair.
fn generate_pem_pair(bits: usize) -> anyhow::Result<(String, String)> {
    let private = RsaPrivateKey::new(&mut OsRng, bits).context("Failed to generate RSA key")?;
    let public = RsaPublicKey::from(&private);

    let private_pem = private
        .to_pkcs8_pem(LineEnding::LF)
        .context("Failed to encode private key")?
        .to_string();
    let public_pem = public
        .to_public_key_pem(LineEnding::LF)
        .context("Failed to encode public key")?;
    Ok((private_pem, public_pem))
}

/// Generate a key pair and store it in `key_set`, or in a new key set.
pub async fn generate_keys(pool: &PgPool, key_set: Option<DbId>, bits: usize) -> anyhow::Result<Key> {
    if bits < MIN_KEY_BITS {
        bail!("Key size must be at least {MIN_KEY_BITS} bits");
    }

    let key_set_id = match key_set {
        Some(id) => {
            KeySetRepo::find_by_id(pool, id)
                .await?
                .ok_or_else(|| anyhow!("Key set {id} does not exist"))?
                .id
        }
        None => {
            let key_set = KeySetRepo::create(pool).await?;
            tracing::info!(key_set_id = key_set.id, "Key set created");
            key_set.id
        }
    };

    // Large moduli take seconds to generate.
    let (private_key, public_key) =
        tokio::task::spawn_blocking(move || generate_pem_pair(bits)).await??;

    let key = KeyRepo::create(
        pool,
        &CreateKey {
            key_set_id,
            public_key,
            private_key,
            alg: KEY_ALG.to_string(),
        },
    )
    .await?;

    tracing::info!(key_id = key.id, key_set_id, bits, "Key generated");
    Ok(key)
}
