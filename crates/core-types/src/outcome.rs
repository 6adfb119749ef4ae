use crate::enums::FailureKind;
use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The sanitized description of a failed query. This is the only part of a fault that is
/// allowed to leave the process.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct QueryFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl QueryFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Store, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Validation, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transport, message)
    }

    pub fn method_not_allowed() -> Self {
        Self::new(FailureKind::MethodNotAllowed, "Method not allowed")
    }
}

/// The classified result of executing a query.
///
/// There are exactly two variants. "Not loaded yet" is not one of them: callers that need
/// it hold an `Option<QueryOutcome<T>>` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<T> {
    Success(T),
    Failure(QueryFailure),
}

impl<T> QueryOutcome<T> {
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        QueryOutcome::Failure(QueryFailure::new(kind, message))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, QueryOutcome::Success(_))
    }

    pub fn as_failure(&self) -> Option<&QueryFailure> {
        match self {
            QueryOutcome::Success(_) => None,
            QueryOutcome::Failure(failure) => Some(failure),
        }
    }

    pub fn as_ref(&self) -> QueryOutcome<&T> {
        match self {
            QueryOutcome::Success(data) => QueryOutcome::Success(data),
            QueryOutcome::Failure(failure) => QueryOutcome::Failure(failure.clone()),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryOutcome<U> {
        match self {
            QueryOutcome::Success(data) => QueryOutcome::Success(f(data)),
            QueryOutcome::Failure(failure) => QueryOutcome::Failure(failure),
        }
    }

    pub fn and_then<U>(self, f: impl FnOnce(T) -> QueryOutcome<U>) -> QueryOutcome<U> {
        match self {
            QueryOutcome::Success(data) => f(data),
            QueryOutcome::Failure(failure) => QueryOutcome::Failure(failure),
        }
    }

    /// Combines two independent outcomes. The first failure, in argument order, wins.
    pub fn zip<U>(self, other: QueryOutcome<U>) -> QueryOutcome<(T, U)> {
        match (self, other) {
            (QueryOutcome::Success(a), QueryOutcome::Success(b)) => QueryOutcome::Success((a, b)),
            (QueryOutcome::Failure(failure), _) | (_, QueryOutcome::Failure(failure)) => {
                QueryOutcome::Failure(failure)
            }
        }
    }

    pub fn into_result(self) -> Result<T, QueryFailure> {
        match self {
            QueryOutcome::Success(data) => Ok(data),
            QueryOutcome::Failure(failure) => Err(failure),
        }
    }
}

impl<T> From<Result<T, QueryFailure>> for QueryOutcome<T> {
    fn from(result: Result<T, QueryFailure>) -> Self {
        match result {
            Ok(data) => QueryOutcome::Success(data),
            Err(failure) => QueryOutcome::Failure(failure),
        }
    }
}

// --- Wire format ---
// Success: { "data": ..., "isError": false }
// Failure: { "error": "...", "kind": "store", "isError": true }

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireOutcomeRef<'a, T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<FailureKind>,
    is_error: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireOutcome<T> {
    data: Option<T>,
    error: Option<String>,
    kind: Option<FailureKind>,
    #[serde(default)]
    is_error: bool,
}

impl<T: Serialize> Serialize for QueryOutcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            QueryOutcome::Success(data) => WireOutcomeRef {
                data: Some(data),
                error: None,
                kind: None,
                is_error: false,
            },
            QueryOutcome::Failure(failure) => WireOutcomeRef {
                data: None,
                error: Some(&failure.message),
                kind: Some(failure.kind),
                is_error: true,
            },
        };
        wire.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for QueryOutcome<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = WireOutcome::<T>::deserialize(deserializer)?;
        let kind = wire.kind.unwrap_or(FailureKind::Store);
        match (wire.error, wire.data) {
            (Some(message), _) => Ok(QueryOutcome::Failure(QueryFailure::new(kind, message))),
            (None, _) if wire.is_error => Ok(QueryOutcome::Failure(QueryFailure::new(
                kind,
                "Unknown error",
            ))),
            (None, Some(data)) => Ok(QueryOutcome::Success(data)),
            (None, None) => Err(de::Error::missing_field("data")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_serializes_with_is_error_false() {
        let outcome: QueryOutcome<Vec<i32>> = QueryOutcome::Success(vec![1, 2, 3]);
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value, json!({ "data": [1, 2, 3], "isError": false }));
    }

    #[test]
    fn failure_serializes_error_message_and_kind() {
        let outcome: QueryOutcome<Vec<i32>> = QueryOutcome::Failure(QueryFailure::method_not_allowed());
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["error"], "Method not allowed");
        assert_eq!(value["kind"], "method_not_allowed");
        assert_eq!(value["isError"], true);
        assert!(value.get("data").is_none());
    }

    #[test]
    fn bare_error_body_deserializes_as_store_failure() {
        let outcome: QueryOutcome<Vec<i32>> =
            serde_json::from_value(json!({ "error": "Failed to fetch users" })).unwrap();
        assert_eq!(
            outcome,
            QueryOutcome::Failure(QueryFailure::store("Failed to fetch users"))
        );
    }

    #[test]
    fn body_without_data_or_error_is_rejected() {
        let result = serde_json::from_value::<QueryOutcome<Vec<i32>>>(json!({ "isError": false }));
        assert!(result.is_err());
    }

    #[test]
    fn zip_keeps_the_first_failure() {
        let a: QueryOutcome<i32> = QueryOutcome::failure(FailureKind::Store, "a failed");
        let b: QueryOutcome<i32> = QueryOutcome::failure(FailureKind::Timeout, "b failed");
        let zipped = a.zip(b);
        assert_eq!(zipped.as_failure().map(|f| f.message.as_str()), Some("a failed"));
    }

    #[test]
    fn zip_of_successes_pairs_the_data() {
        let zipped = QueryOutcome::Success(1).zip(QueryOutcome::Success("x"));
        assert_eq!(zipped, QueryOutcome::Success((1, "x")));
    }

    #[test]
    fn and_then_short_circuits_on_failure() {
        let mut called = false;
        let outcome: QueryOutcome<i32> = QueryOutcome::failure(FailureKind::Store, "boom");
        let chained = outcome.and_then(|v| {
            called = true;
            QueryOutcome::Success(v + 1)
        });
        assert!(!called);
        assert!(!chained.is_success());
    }
}
