use std::future::Future;
use std::sync::{Mutex, PoisonError};

use crate::transaction::UserTransaction;

/// The persistence collaborator that receives each accepted batch.
///
/// A batch is handed over in a single call. Implementations decide how atomic that call
/// is; callers never split a batch across calls.
pub trait TransactionSink: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Store every transaction in `batch`, returning how many were written.
    fn insert_batch(
        &self,
        batch: &[UserTransaction],
    ) -> impl Future<Output = Result<usize, Self::Error>> + Send;
}

/// Keeps batches in memory. Used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    batches: Mutex<Vec<Vec<UserTransaction>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every batch received so far, in arrival order.
    pub fn batches(&self) -> Vec<Vec<UserTransaction>> {
        self.batches.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn stored(&self) -> Vec<UserTransaction> {
        self.batches().into_iter().flatten().collect()
    }
}

impl TransactionSink for MemorySink {
    type Error = std::convert::Infallible;

    async fn insert_batch(&self, batch: &[UserTransaction]) -> Result<usize, Self::Error> {
        self.batches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(batch.to_vec());
        Ok(batch.len())
    }
}
