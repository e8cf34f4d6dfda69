use quizext_canvas::Lms;
use quizext_core::job_messages::JobMeta;
use quizext_core::types::DbId;
use quizext_db::repositories::JobRepo;
use sqlx::PgPool;

/// What a running job needs: the store, Canvas, and its own row to report
/// progress on.
pub struct JobContext<'a> {
    pub pool: &'a PgPool,
    pub lms: &'a dyn Lms,
    pub job_id: DbId,
}

impl<'a> JobContext<'a> {
    pub fn new(pool: &'a PgPool, lms: &'a dyn Lms, job_id: DbId) -> Self {
        Self { pool, lms, job_id }
    }

    /// Publish progress for pollers of the job status endpoint.
    pub async fn report(&self, meta: &JobMeta) -> Result<(), sqlx::Error> {
        JobRepo::update_meta(self.pool, self.job_id, &meta.to_json()).await
    }

    /// Publish a final meta and hand it back as the job result.
    pub async fn conclude(&self, meta: JobMeta) -> Result<JobMeta, sqlx::Error> {
        self.report(&meta).await?;
        Ok(meta)
    }
}
