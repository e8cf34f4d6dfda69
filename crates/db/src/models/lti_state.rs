use quizext_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `lti_login_states` table.
#[derive(Debug, Clone, FromRow)]
pub struct LtiLoginState {
    pub state: String,
    pub nonce: String,
    pub registration_id: DbId,
    pub created_at: Timestamp,
    pub consumed_at: Option<Timestamp>,
}
