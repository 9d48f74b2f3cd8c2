//! Repository implementations of the core store traits.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod member;
pub mod subject;
pub mod transaction;

pub use member::MemberRepository;
pub use subject::SubjectRepository;
pub use transaction::TransactionRepository;

use jam3ya_core::store::StoreError;
use sea_orm::{DbErr, SqlErr};

/// Maps a database error, surfacing unique-key violations as conflicts.
pub(crate) fn store_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => StoreError::Conflict(msg),
        _ => StoreError::Database(err.to_string()),
    }
}
