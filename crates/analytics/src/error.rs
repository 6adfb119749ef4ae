use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    #[error("Unknown dashboard '{0}'")]
    UnknownDashboard(String),

    #[error("Unknown paged resource '{0}'")]
    UnknownResource(String),
}
