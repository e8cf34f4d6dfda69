use std::fmt;

use quizext_db::models::key::KeySet;
use quizext_db::models::registration::{Deployment, Registration};
use quizext_db::repositories::{DeploymentRepo, KeyRepo, KeySetRepo, RegistrationRepo};
use sqlx::PgPool;

/// Everything configured for LTI, in display order.
#[derive(Debug)]
pub struct Overview {
    pub key_sets: Vec<(KeySet, usize)>,
    pub registrations: Vec<(Registration, Vec<Deployment>)>,
}

pub async fn overview(pool: &PgPool) -> Result<Overview, sqlx::Error> {
    let mut key_sets = Vec::new();
    for key_set in KeySetRepo::list(pool).await? {
        let keys = KeyRepo::list_by_key_set(pool, key_set.id).await?.len();
        key_sets.push((key_set, keys));
    }

    let mut registrations = Vec::new();
    for registration in RegistrationRepo::list(pool).await? {
        let deployments = DeploymentRepo::list_by_registration(pool, registration.id).await?;
        registrations.push((registration, deployments));
    }

    Ok(Overview {
        key_sets,
        registrations,
    })
}

impl fmt::Display for Overview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Key sets:")?;
        if self.key_sets.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for (key_set, keys) in &self.key_sets {
            writeln!(f, "  #{} ({keys} keys)", key_set.id)?;
        }

        writeln!(f, "Registrations:")?;
        if self.registrations.is_empty() {
            writeln!(f, "  (none)")?;
        }
        for (registration, deployments) in &self.registrations {
            writeln!(
                f,
                "  #{} {} client_id={} key_set=#{}",
                registration.id, registration.issuer, registration.client_id, registration.key_set_id
            )?;
            for deployment in deployments {
                writeln!(f, "    deployment {}", deployment.deployment_id)?;
            }
        }
        Ok(())
    }
}
