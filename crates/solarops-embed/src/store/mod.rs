//! Job lookup capability and its `SQLite` implementation.

mod db;
mod models;
mod queries;


use std::future::Future;
use std::sync::Arc;

pub use db::{DatabaseError, JobDatabase};
pub use models::Job;

/// Error type returned by [`JobStore`] implementations.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Looks up jobs by id.
///
/// The embed subsystem only checks existence; implementations are free to
/// return whatever job view they hold.
pub trait JobStore: Send + Sync + 'static {
    /// Return the job with the given id, or `None` if it does not exist.
    fn find_job_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Job>, StoreError>> + Send;
}

impl<S: JobStore> JobStore for Arc<S> {
    fn find_job_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<Job>, StoreError>> + Send {
        (**self).find_job_by_id(id)
    }
}
