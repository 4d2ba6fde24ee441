use chrono::NaiveDate;
use tally_core::{ExtractedTransaction, ParseResult, TransactionSink, UserId, UserTransaction};

use crate::error::{EmptyReason, ExtractError};

/// Batch-level policy: nothing extracted is a failure, anything else goes to the sink
/// in one call.
pub struct Aggregator;

impl Aggregator {
    pub fn collect(
        transactions: Vec<ExtractedTransaction>,
        document_date: Option<NaiveDate>,
        if_empty: EmptyReason,
    ) -> Result<ParseResult, ExtractError> {
        if transactions.is_empty() {
            return Err(ExtractError::EmptyExtraction(if_empty));
        }
        Ok(ParseResult { transactions, document_date })
    }

    pub fn attribute(result: ParseResult, user: &UserId) -> Vec<UserTransaction> {
        result
            .transactions
            .into_iter()
            .map(|transaction| UserTransaction { user_id: user.clone(), transaction })
            .collect()
    }

    /// Tag every transaction with `user` and hand the whole batch to `sink` at once.
    ///
    /// An empty result never reaches the sink.
    pub async fn commit<S: TransactionSink>(
        result: ParseResult,
        user: &UserId,
        sink: &S,
        if_empty: EmptyReason,
    ) -> Result<Vec<UserTransaction>, ExtractError> {
        if result.is_empty() {
            return Err(ExtractError::EmptyExtraction(if_empty));
        }
        let batch = Self::attribute(result, user);
        let written = sink.insert_batch(&batch).await.map_err(ExtractError::processing)?;
        tracing::debug!(user = %user, written, "batch committed");
        Ok(batch)
    }
}
