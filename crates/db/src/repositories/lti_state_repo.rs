//! Repository for the `lti_login_states` table.
//!
//! A state row is written by the OIDC login step and consumed exactly once
//! by the launch that follows it.

use std::time::Duration;

use quizext_core::types::DbId;
use sqlx::PgPool;

use crate::models::lti_state::LtiLoginState;

const COLUMNS: &str = "state, nonce, registration_id, created_at, consumed_at";

pub struct LtiStateRepo;

impl LtiStateRepo {
    pub async fn insert(
        pool: &PgPool,
        state: &str,
        nonce: &str,
        registration_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO lti_login_states (state, nonce, registration_id) VALUES ($1, $2, $3)",
        )
        .bind(state)
        .bind(nonce)
        .bind(registration_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark a state consumed and return it.
    ///
    /// Returns `None` when the state is unknown, already consumed, or older
    /// than `max_age`.
    pub async fn consume(
        pool: &PgPool,
        state: &str,
        max_age: Duration,
    ) -> Result<Option<LtiLoginState>, sqlx::Error> {
        let query = format!(
            "UPDATE lti_login_states SET consumed_at = NOW() \
             WHERE state = $1 \
               AND consumed_at IS NULL \
               AND created_at > NOW() - make_interval(secs => $2) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LtiLoginState>(&query)
            .bind(state)
            .bind(max_age.as_secs_f64())
            .fetch_optional(pool)
            .await
    }

    /// Delete states older than `max_age`. Returns the number removed.
    pub async fn purge_expired(pool: &PgPool, max_age: Duration) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM lti_login_states WHERE created_at < NOW() - make_interval(secs => $1)",
        )
        .bind(max_age.as_secs_f64())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
