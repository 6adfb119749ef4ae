use crate::error::AnalyticsError;
use crate::queries;
use crate::rows::{OrganizationRow, UserRow};
use core_types::Query;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

/// A dataset served in pages: a count statement returning one `total` row and a windowed
/// statement taking `$1 = limit`, `$2 = offset`.
pub trait PagedResource: Send + Sync + 'static {
    type Row: DeserializeOwned + Serialize + Send + Sync + 'static;

    /// Used in routes and log fields.
    const NAME: &'static str;
    const COUNT_STATEMENT: &'static str;
    const PAGE_STATEMENT: &'static str;

    fn count_query() -> Query {
        Query::new(Self::COUNT_STATEMENT)
    }

    fn page_query(limit: i64, offset: i64) -> Query {
        Query::with_params(Self::PAGE_STATEMENT, [limit, offset])
    }
}

/// All registered users, newest first.
pub struct UsersResource;

impl PagedResource for UsersResource {
    type Row = UserRow;

    const NAME: &'static str = "users";
    const COUNT_STATEMENT: &'static str = queries::USERS_COUNT;
    const PAGE_STATEMENT: &'static str = queries::USERS_PAGE;
}

/// Organizations with their active-user and product counts, by name.
pub struct OrganizationsResource;

impl PagedResource for OrganizationsResource {
    type Row = OrganizationRow;

    const NAME: &'static str = "orgs";
    const COUNT_STATEMENT: &'static str = queries::ORGANIZATIONS_COUNT;
    const PAGE_STATEMENT: &'static str = queries::ORGANIZATIONS_PAGE;
}

/// Runtime selector for the paged resources, e.g. from a CLI argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Users,
    Organizations,
}

impl ResourceKind {
    /// The endpoint path serving this resource.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceKind::Users => "/resources/users",
            ResourceKind::Organizations => "/resources/orgs",
        }
    }
}

impl FromStr for ResourceKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "users" => Ok(ResourceKind::Users),
            "orgs" | "organizations" => Ok(ResourceKind::Organizations),
            other => Err(AnalyticsError::UnknownResource(other.to_string())),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Users => write!(f, "{}", UsersResource::NAME),
            ResourceKind::Organizations => write!(f, "{}", OrganizationsResource::NAME),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::QueryParam;

    #[test]
    fn page_query_binds_limit_then_offset() {
        let query = UsersResource::page_query(10, 20);
        assert_eq!(query.params(), &[QueryParam::Int(10), QueryParam::Int(20)]);
        assert!(query.text().contains("LIMIT $1 OFFSET $2"));
    }

    #[test]
    fn count_query_has_no_params() {
        assert!(OrganizationsResource::count_query().params().is_empty());
    }

    #[test]
    fn resource_paths_match_their_names() {
        for kind in [ResourceKind::Users, ResourceKind::Organizations] {
            assert!(kind.path().ends_with(&kind.to_string()));
            assert_eq!(kind.to_string().parse::<ResourceKind>().unwrap(), kind);
        }
    }
}
