// ABOUTME: Conversion from sqlx errors into the unified AppError
// ABOUTME: Separates an unavailable store from a failing query

use sqlx::Error as SqlxError;

use super::AppError;

impl From<SqlxError> for AppError {
    fn from(error: SqlxError) -> Self {
        let unavailable = matches!(
            error,
            SqlxError::PoolClosed
                | SqlxError::PoolTimedOut
                | SqlxError::Io(_)
                | SqlxError::Tls(_)
                | SqlxError::WorkerCrashed
        );
        let message = error.to_string();
        if unavailable {
            Self::storage(format!("Store unavailable: {message}")).with_source(error)
        } else {
            Self::database(message).with_source(error)
        }
    }
}
