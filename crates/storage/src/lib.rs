pub mod db;

pub use db::{
    count_transactions, create_db, create_memory_db, get_transactions_for_user, DbPool,
    SqliteSink, StorageError, StoredTransaction,
};
