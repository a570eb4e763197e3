//! Database queries for the job store.

use super::db::{DatabaseError, JobDatabase};
use super::models::Job;
use super::{JobStore, StoreError};
use crate::clock::now_secs;

impl JobDatabase {
    /// Create a new job.
    pub async fn create_job(&self, id: &str, name: &str) -> Result<Job, DatabaseError> {
        let now = now_secs();

        sqlx::query(
            "INSERT INTO jobs (id, name, status, created_at, updated_at) VALUES (?, ?, 'active', ?, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        self.find_job(id)
            .await?
            .ok_or_else(|| DatabaseError::NotFound(format!("Job {id}")))
    }

    /// Get a job by ID, `None` if it does not exist.
    pub async fn find_job(&self, id: &str) -> Result<Option<Job>, DatabaseError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(job)
    }

    /// Delete a job. Outstanding embed tokens for it stop resolving.
    pub async fn delete_job(&self, id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
            .bind(id)
            .execute(self.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

impl JobStore for JobDatabase {
    async fn find_job_by_id(&self, id: &str) -> Result<Option<Job>, StoreError> {
        Ok(self.find_job(id).await?)
    }
}
