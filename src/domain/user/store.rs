use async_trait::async_trait;

use crate::shared::DomainResult;

/// One page worth of records plus the size of the whole dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slice<T> {
    pub items: Vec<T>,
    /// Full cardinality of the dataset, independent of offset and count.
    pub total: u64,
}

impl<T> Slice<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Read-only access to an ordered collection of records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    type Record: Send;

    /// Return at most `count` records starting at `offset`, together with the
    /// total number of records in the store.
    async fn find(&self, offset: u64, count: u64) -> DomainResult<Slice<Self::Record>>;
}
