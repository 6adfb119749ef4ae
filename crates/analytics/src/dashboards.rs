use crate::error::AnalyticsError;
use crate::queries;
use crate::rows::{
    AveragePlanPriceRow, RegistrationTrendRow, SubscriptionTierRow, TopOrganizationRow,
    TotalActiveUsersRow, TotalProductsRow, TotalSalesAmountRow, UserKeyMetricsRow,
};
use core_types::{Query, QueryOutcome};
use database::QueryExecutor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The dashboards that have an initial load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardKind {
    Orgs,
    Users,
}

impl FromStr for DashboardKind {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "orgs" | "organizations" => Ok(DashboardKind::Orgs),
            "users" => Ok(DashboardKind::Users),
            other => Err(AnalyticsError::UnknownDashboard(other.to_string())),
        }
    }
}

impl fmt::Display for DashboardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DashboardKind::Orgs => write!(f, "orgs"),
            DashboardKind::Users => write!(f, "users"),
        }
    }
}

/// The organizations dashboard, one outcome per widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrgsDashboard {
    pub subscription_tiers: QueryOutcome<Vec<SubscriptionTierRow>>,
    pub top_orgs_by_revenue: QueryOutcome<Vec<TopOrganizationRow>>,
    pub average_plan_prices: QueryOutcome<Vec<AveragePlanPriceRow>>,
    pub total_active_users: QueryOutcome<Vec<TotalActiveUsersRow>>,
    pub total_products: QueryOutcome<Vec<TotalProductsRow>>,
    pub total_sales_amount: QueryOutcome<Vec<TotalSalesAmountRow>>,
}

/// The users dashboard. The users table itself is paginated and not part of the initial load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsersDashboard {
    pub user_key_metrics: QueryOutcome<Vec<UserKeyMetricsRow>>,
    pub user_registration_trend: QueryOutcome<Vec<RegistrationTrendRow>>,
}

/// Either dashboard, for callers that pick one at runtime.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Dashboard {
    Orgs(OrgsDashboard),
    Users(UsersDashboard),
}

/// Runs the six organizations widgets concurrently. Completes once all six have settled.
pub async fn load_orgs_dashboard(executor: &QueryExecutor) -> OrgsDashboard {
    tracing::debug!("Loading organizations dashboard.");
    let subscription_tiers_query = Query::new(queries::SUBSCRIPTION_TIERS);
    let top_orgs_query = Query::new(queries::TOP_ORGANIZATIONS_BY_REVENUE);
    let average_plan_query = Query::new(queries::AVERAGE_PLAN_PRICE);
    let active_users_query = Query::new(queries::TOTAL_ACTIVE_USERS);
    let products_query = Query::new(queries::TOTAL_PRODUCTS);
    let sales_query = Query::new(queries::TOTAL_SALES_AMOUNT);

    let (
        subscription_tiers,
        top_orgs_by_revenue,
        average_plan_prices,
        total_active_users,
        total_products,
        total_sales_amount,
    ) = futures::join!(
        executor.execute::<SubscriptionTierRow>(&subscription_tiers_query),
        executor.execute::<TopOrganizationRow>(&top_orgs_query),
        executor.execute::<AveragePlanPriceRow>(&average_plan_query),
        executor.execute::<TotalActiveUsersRow>(&active_users_query),
        executor.execute::<TotalProductsRow>(&products_query),
        executor.execute::<TotalSalesAmountRow>(&sales_query),
    );

    let dashboard = OrgsDashboard {
        subscription_tiers,
        top_orgs_by_revenue,
        average_plan_prices,
        total_active_users,
        total_products,
        total_sales_amount,
    };
    tracing::info!(failed_widgets = dashboard.failed_widgets(), "Organizations dashboard loaded.");
    dashboard
}

/// Runs the users dashboard widgets concurrently.
pub async fn load_users_dashboard(executor: &QueryExecutor) -> UsersDashboard {
    tracing::debug!("Loading users dashboard.");
    let metrics_query = Query::new(queries::USER_KEY_METRICS);
    let trend_query = Query::new(queries::USER_REGISTRATION_TREND);

    let (user_key_metrics, user_registration_trend) = futures::join!(
        executor.execute::<UserKeyMetricsRow>(&metrics_query),
        executor.execute::<RegistrationTrendRow>(&trend_query),
    );

    let dashboard = UsersDashboard {
        user_key_metrics,
        user_registration_trend,
    };
    tracing::info!(failed_widgets = dashboard.failed_widgets(), "Users dashboard loaded.");
    dashboard
}

pub async fn load_dashboard(kind: DashboardKind, executor: &QueryExecutor) -> Dashboard {
    match kind {
        DashboardKind::Orgs => Dashboard::Orgs(load_orgs_dashboard(executor).await),
        DashboardKind::Users => Dashboard::Users(load_users_dashboard(executor).await),
    }
}

impl OrgsDashboard {
    pub fn failed_widgets(&self) -> usize {
        [
            self.subscription_tiers.is_success(),
            self.top_orgs_by_revenue.is_success(),
            self.average_plan_prices.is_success(),
            self.total_active_users.is_success(),
            self.total_products.is_success(),
            self.total_sales_amount.is_success(),
        ]
        .iter()
        .filter(|ok| !**ok)
        .count()
    }
}

impl UsersDashboard {
    pub fn failed_widgets(&self) -> usize {
        [
            self.user_key_metrics.is_success(),
            self.user_registration_trend.is_success(),
        ]
        .iter()
        .filter(|ok| !**ok)
        .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::FailureKind;
    use database::testing::{ScriptedStore, row};
    use serde_json::json;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    fn healthy_orgs_store() -> ScriptedStore {
        ScriptedStore::new()
            .respond(
                queries::SUBSCRIPTION_TIERS,
                vec![
                    row(json!({ "subscription_tier": "Enterprise", "total_organizations": 12 })),
                    row(json!({ "subscription_tier": "Free", "total_organizations": 4 })),
                ],
            )
            .respond(
                queries::TOP_ORGANIZATIONS_BY_REVENUE,
                vec![row(json!({ "organization_name": "Acme", "total_revenue": "1500.50" }))],
            )
            .respond(
                queries::AVERAGE_PLAN_PRICE,
                vec![row(json!({ "plan_name": "Pro", "average_monthly_price": "49.00" }))],
            )
            .respond(queries::TOTAL_ACTIVE_USERS, vec![row(json!({ "total_active_users": 42 }))])
            .respond(queries::TOTAL_PRODUCTS, vec![row(json!({ "total_products": 7 }))])
            .respond(queries::TOTAL_SALES_AMOUNT, vec![row(json!({ "total_sales_amount": "999.99" }))])
    }

    #[tokio::test]
    async fn every_widget_is_loaded_once() {
        let store = Arc::new(healthy_orgs_store());
        let executor = QueryExecutor::new(store.clone());

        let dashboard = load_orgs_dashboard(&executor).await;

        assert_eq!(dashboard.failed_widgets(), 0);
        assert_eq!(store.calls().len(), 6);
        let tiers = dashboard.subscription_tiers.into_result().unwrap();
        assert_eq!(tiers[0].subscription_tier, "Enterprise");
    }

    #[tokio::test]
    async fn one_failing_widget_does_not_block_the_others() {
        let store = healthy_orgs_store().fail(queries::TOTAL_PRODUCTS, "relation \"products\" does not exist");
        let executor = QueryExecutor::new(Arc::new(store));

        let dashboard = load_orgs_dashboard(&executor).await;

        assert_eq!(dashboard.failed_widgets(), 1);
        assert_eq!(
            dashboard.total_products.as_failure().map(|f| f.kind),
            Some(FailureKind::Store)
        );
        assert!(dashboard.total_active_users.is_success());
        assert!(dashboard.total_sales_amount.is_success());
    }

    #[tokio::test]
    async fn widgets_are_queried_concurrently() {
        let store = healthy_orgs_store().with_delay(Duration::from_millis(200));
        let executor = QueryExecutor::new(Arc::new(store));

        let started = Instant::now();
        let dashboard = load_orgs_dashboard(&executor).await;

        assert_eq!(dashboard.failed_widgets(), 0);
        assert!(started.elapsed() < Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn users_dashboard_serializes_one_outcome_per_widget() {
        let store = ScriptedStore::new()
            .respond(
                queries::USER_KEY_METRICS,
                vec![row(json!({
                    "total_users": 10,
                    "verified_users": 8,
                    "unverified_users": 2,
                    "new_users_last_30_days": 3
                }))],
            )
            .fail(queries::USER_REGISTRATION_TREND, "timeout");
        let executor = QueryExecutor::new(Arc::new(store));

        let dashboard = load_users_dashboard(&executor).await;
        let value = serde_json::to_value(&dashboard).unwrap();

        assert_eq!(value["userKeyMetrics"]["isError"], false);
        assert_eq!(value["userKeyMetrics"]["data"][0]["verified_users"], 8);
        assert_eq!(value["userRegistrationTrend"]["isError"], true);
        assert!(value["userRegistrationTrend"]["error"].is_string());
    }

    #[test]
    fn dashboard_names_parse() {
        assert_eq!("orgs".parse::<DashboardKind>().unwrap(), DashboardKind::Orgs);
        assert_eq!("users".parse::<DashboardKind>().unwrap(), DashboardKind::Users);
        assert!("billing".parse::<DashboardKind>().is_err());
    }
}
