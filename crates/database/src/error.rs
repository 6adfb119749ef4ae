use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection is not configured: {0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Column '{column}' has unsupported type '{type_name}'")]
    UnsupportedColumnType { column: String, type_name: String },

    #[error("An error occurred during JSON serialization/deserialization: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Store backend error: {0}")]
    Backend(String),
}

impl DbError {
    /// The message that may cross the process boundary. Connection strings, SQL and driver
    /// details stay in the log.
    pub fn public_message(&self) -> &'static str {
        match self {
            DbError::ConnectionConfigError(_) => "The database is not configured",
            DbError::QueryError(sqlx::Error::PoolTimedOut)
            | DbError::QueryError(sqlx::Error::PoolClosed)
            | DbError::QueryError(sqlx::Error::Io(_)) => "The database is unavailable",
            DbError::QueryError(_) | DbError::Backend(_) => "An internal database error occurred",
            DbError::UnsupportedColumnType { .. } | DbError::JsonError(_) => {
                "The query returned data in an unexpected shape"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn public_messages_do_not_leak_details() {
        let err = DbError::Backend("password=hunter2 host=10.0.0.1".to_string());
        assert!(!err.public_message().contains("hunter2"));
        assert!(err.to_string().contains("hunter2"));
    }

    #[rstest]
    #[case(DbError::QueryError(sqlx::Error::PoolTimedOut), "The database is unavailable")]
    #[case(DbError::QueryError(sqlx::Error::PoolClosed), "The database is unavailable")]
    #[case(DbError::QueryError(sqlx::Error::RowNotFound), "An internal database error occurred")]
    #[case(
        DbError::UnsupportedColumnType { column: "geom".to_string(), type_name: "GEOMETRY".to_string() },
        "The query returned data in an unexpected shape"
    )]
    fn faults_map_to_public_messages(#[case] err: DbError, #[case] expected: &str) {
        assert_eq!(err.public_message(), expected);
    }
}
