use anyhow::bail;
use quizext_core::types::DbId;
use quizext_db::models::registration::Deployment;
use quizext_db::repositories::{DeploymentRepo, RegistrationRepo};
use sqlx::PgPool;

use super::violates;

pub async fn deploy(
    pool: &PgPool,
    registration_id: DbId,
    deployment_id: &str,
) -> anyhow::Result<Deployment> {
    let deployment_id = deployment_id.trim();
    if deployment_id.is_empty() {
        bail!("Deployment id must not be empty");
    }
    if RegistrationRepo::find_by_id(pool, registration_id).await?.is_none() {
        bail!("Registration {registration_id} does not exist");
    }

    match DeploymentRepo::create(pool, registration_id, deployment_id).await {
        Ok(deployment) => {
            tracing::info!(registration_id, deployment_id, "Deployment created");
            Ok(deployment)
        }
        Err(e) if violates(&e, "uq_deployments_registration_deployment") => {
            bail!("Deployment {deployment_id} already exists for registration {registration_id}")
        }
        Err(e) => Err(e.into()),
    }
}
