//! Data sources: records available now or produced later.

use std::fmt;
use std::future::Future;

use futures::FutureExt;
use futures::future::BoxFuture;

use crate::model::Record;

/// Records handed to a grid, either immediately or from a future.
pub enum DataSource {
    /// Records available now.
    Ready(Vec<Record>),
    /// Records produced by a deferred computation.
    Deferred(BoxFuture<'static, Vec<Record>>),
}

impl DataSource {
    /// Wrap records that are available now.
    pub fn ready(records: Vec<Record>) -> Self {
        DataSource::Ready(records)
    }

    /// Wrap a future producing records.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Vec<Record>> + Send + 'static,
    {
        DataSource::Deferred(future.boxed())
    }

    /// Returns `true` if the records are available without waiting.
    pub fn is_ready(&self) -> bool {
        matches!(self, DataSource::Ready(_))
    }

    /// Wait for the records.
    pub async fn resolve(self) -> Vec<Record> {
        match self {
            DataSource::Ready(records) => records,
            DataSource::Deferred(future) => future.await,
        }
    }
}

impl From<Vec<Record>> for DataSource {
    fn from(records: Vec<Record>) -> Self {
        DataSource::Ready(records)
    }
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Ready(records) => f.debug_tuple("Ready").field(&records.len()).finish(),
            DataSource::Deferred(_) => f.write_str("Deferred"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolve_both_kinds() {
        let ready = DataSource::from(vec![Record::new().set("id", 1i64)]);
        assert!(ready.is_ready());
        assert_eq!(ready.resolve().await.len(), 1);

        let deferred = DataSource::deferred(async { vec![Record::new(), Record::new()] });
        assert!(!deferred.is_ready());
        assert_eq!(deferred.resolve().await.len(), 2);
    }
}
