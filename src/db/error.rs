//! Errors raised by the data access statements.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    /// A UNIQUE constraint rejected the row
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// A referenced row does not exist
    #[error("Foreign key constraint violated: {0}")]
    ForeignKey(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl DataError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::Conflict(db_err.message().to_string());
            }
            if db_err.is_foreign_key_violation() {
                return Self::ForeignKey(db_err.message().to_string());
            }
        }
        Self::Database(err)
    }
}
