use serde::{Deserialize, Serialize};

/// Classification of a failed query or request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The store rejected or could not run the statement.
    Store,
    /// The store did not answer within the configured deadline.
    Timeout,
    /// Pagination parameters were present but unusable (e.g. negative).
    Validation,
    /// The paginated-resource endpoint was called with something other than POST.
    MethodNotAllowed,
    /// The request never made it to the endpoint intact, or the response could not be read.
    Transport,
}

impl FailureKind {
    /// The HTTP status the endpoint answers with for this kind of failure.
    pub fn status_code(&self) -> u16 {
        match self {
            FailureKind::Store => 500,
            FailureKind::Timeout => 504,
            FailureKind::Validation => 400,
            FailureKind::MethodNotAllowed => 405,
            FailureKind::Transport => 400,
        }
    }

    /// Best-effort reverse of `status_code`, used when a response body carries no kind.
    pub fn from_status(status: u16) -> Self {
        match status {
            405 => FailureKind::MethodNotAllowed,
            400 | 422 => FailureKind::Validation,
            408 | 504 => FailureKind::Timeout,
            _ => FailureKind::Store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip_for_server_side_kinds() {
        for kind in [
            FailureKind::Store,
            FailureKind::Timeout,
            FailureKind::Validation,
            FailureKind::MethodNotAllowed,
        ] {
            assert_eq!(FailureKind::from_status(kind.status_code()), kind);
        }
    }

    #[test]
    fn unknown_error_statuses_are_store_failures() {
        assert_eq!(FailureKind::from_status(502), FailureKind::Store);
    }
}
