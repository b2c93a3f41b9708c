//! Directory listing service - application-layer orchestration
//!
//! Resolves raw pagination input, reads one slice from the store under a
//! timeout, and assembles the response together with its pagination view.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use super::projection::{assemble, PublicProjection, ResponsePayload};
use crate::domain::RecordStore;
use crate::shared::{DirectoryError, PaginationPolicy, PaginationView};

pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Result of one list request.
#[derive(Debug, Clone)]
pub struct DirectoryPage {
    pub payload: ResponsePayload,
    pub view: PaginationView,
}

pub struct DirectoryService<R> {
    store: Arc<dyn RecordStore<Record = R>>,
    policy: PaginationPolicy,
    projection: PublicProjection,
    store_timeout: Duration,
}

impl<R> DirectoryService<R>
where
    R: Serialize + Send + 'static,
{
    pub fn new(store: Arc<dyn RecordStore<Record = R>>) -> Self {
        Self {
            store,
            policy: PaginationPolicy::default(),
            projection: PublicProjection::default(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_policy(mut self, policy: PaginationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_projection(mut self, projection: PublicProjection) -> Self {
        self.projection = projection;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn policy(&self) -> &PaginationPolicy {
        &self.policy
    }

    /// List one page of records from raw `page` / `limit` query values.
    pub async fn list(
        &self,
        raw_page: Option<&str>,
        raw_limit: Option<&str>,
    ) -> Result<DirectoryPage, DirectoryError> {
        let result = self.list_inner(raw_page, raw_limit).await;
        let outcome = match &result {
            Ok(_) => "ok",
            Err(DirectoryError::Store(_)) => "store_error",
            Err(DirectoryError::StoreTimeout(_)) => "store_timeout",
            Err(DirectoryError::Projection(_)) => "projection_error",
        };
        metrics::counter!("directory_list_requests_total", "outcome" => outcome).increment(1);
        result
    }

    async fn list_inner(
        &self,
        raw_page: Option<&str>,
        raw_limit: Option<&str>,
    ) -> Result<DirectoryPage, DirectoryError> {
        let request = self.policy.resolve(raw_page, raw_limit);
        let offset = request.offset();

        let started = Instant::now();
        let fetched = tokio::time::timeout(self.store_timeout, self.store.find(offset, request.limit)).await;
        metrics::histogram!("directory_store_duration_seconds").record(started.elapsed().as_secs_f64());

        let mut slice = fetched.map_err(|_| {
            warn!(offset, limit = request.limit, "Record store timed out");
            DirectoryError::StoreTimeout(self.store_timeout)
        })??;

        let limit = usize::try_from(request.limit).unwrap_or(usize::MAX);
        if slice.items.len() > limit {
            warn!(
                returned = slice.items.len(),
                limit = request.limit,
                "Record store returned more items than requested, truncating"
            );
            slice.items.truncate(limit);
        }

        let view = self.policy.view(&request, slice.total);
        info!(
            page = request.page,
            limit = request.limit,
            offset,
            total = slice.total,
            returned = slice.items.len(),
            "Listed directory page"
        );

        let payload = assemble(slice, &view, &self.projection)?;
        Ok(DirectoryPage { payload, view })
    }
}
