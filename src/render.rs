use analytics::rows::{
    AveragePlanPriceRow, OrganizationRow, RegistrationTrendRow, SubscriptionTierRow,
    TopOrganizationRow, TotalActiveUsersRow, TotalProductsRow, TotalSalesAmountRow,
    UserKeyMetricsRow, UserRow,
};
use analytics::{OrgsDashboard, UsersDashboard};
use api_client::PageSnapshot;
use comfy_table::{ContentArrangement, Table, presets::UTF8_FULL};
use core_types::OutcomeGate;

/// A row that can be shown as one line of a terminal table.
pub trait TableRow {
    fn header() -> Vec<&'static str>;
    fn cells(&self) -> Vec<String>;
}

fn table<R: TableRow>(rows: &[R]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(R::header());
    for row in rows {
        table.add_row(row.cells());
    }
    table.to_string()
}

fn widget(title: &str, body: String) -> String {
    format!("== {title} ==\n{body}\n")
}

pub fn render_orgs_dashboard(dashboard: OrgsDashboard) -> String {
    let mut out = String::new();
    out.push_str(&widget(
        "Subscription tiers",
        OutcomeGate::render(dashboard.subscription_tiers, |rows| table(&rows)),
    ));
    out.push_str(&widget(
        "Top organizations by revenue",
        OutcomeGate::render(dashboard.top_orgs_by_revenue, |rows| table(&rows)),
    ));
    out.push_str(&widget(
        "Average plan price",
        OutcomeGate::render(dashboard.average_plan_prices, |rows| table(&rows)),
    ));

    // The three single-value cards share one summary; any failure replaces all of them.
    let totals = dashboard
        .total_active_users
        .zip(dashboard.total_products)
        .zip(dashboard.total_sales_amount);
    out.push_str(&widget(
        "Totals",
        OutcomeGate::render(totals, |((users, products), sales)| {
            summary(&users, &products, &sales)
        }),
    ));
    out
}

fn summary(
    users: &[TotalActiveUsersRow],
    products: &[TotalProductsRow],
    sales: &[TotalSalesAmountRow],
) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Active users", "Products", "Sales amount"]);
    table.add_row(vec![
        users
            .first()
            .map_or_else(|| "-".to_string(), |r| r.total_active_users.to_string()),
        products
            .first()
            .map_or_else(|| "-".to_string(), |r| r.total_products.to_string()),
        sales
            .first()
            .and_then(|r| r.total_sales_amount)
            .map_or_else(|| "0".to_string(), |amount| amount.to_string()),
    ]);
    table.to_string()
}

pub fn render_users_dashboard(dashboard: UsersDashboard) -> String {
    let mut out = String::new();
    out.push_str(&widget(
        "User key metrics",
        OutcomeGate::render(dashboard.user_key_metrics, |rows| table(&rows)),
    ));
    out.push_str(&widget(
        "Registrations per month",
        OutcomeGate::render(dashboard.user_registration_trend, |rows| table(&rows)),
    ));
    out
}

/// The table for a paged resource, or its loading or error view.
pub fn render_page<T: TableRow>(snapshot: PageSnapshot<T>, limit: u32) -> String {
    let current_page = snapshot.current_page;
    let loading = if snapshot.is_loading() { " (loading)" } else { "" };
    OutcomeGate::render_pending(snapshot.last_outcome, |page| {
        format!(
            "{}\nPage {} of {} ({} rows){}",
            table(&page.rows),
            current_page,
            page.total_pages(limit).max(1),
            page.total_count,
            loading
        )
    })
}

// --- Row formatting ---

impl TableRow for SubscriptionTierRow {
    fn header() -> Vec<&'static str> {
        vec!["Tier", "Organizations"]
    }
    fn cells(&self) -> Vec<String> {
        vec![self.subscription_tier.clone(), self.total_organizations.to_string()]
    }
}

impl TableRow for TopOrganizationRow {
    fn header() -> Vec<&'static str> {
        vec!["Organization", "Revenue"]
    }
    fn cells(&self) -> Vec<String> {
        vec![self.organization_name.clone(), self.total_revenue.round_dp(2).to_string()]
    }
}

impl TableRow for AveragePlanPriceRow {
    fn header() -> Vec<&'static str> {
        vec!["Plan", "Avg. monthly price"]
    }
    fn cells(&self) -> Vec<String> {
        vec![self.plan_name.clone(), self.average_monthly_price.round_dp(2).to_string()]
    }
}

impl TableRow for UserKeyMetricsRow {
    fn header() -> Vec<&'static str> {
        vec!["Total", "Verified", "Unverified", "New (30 days)"]
    }
    fn cells(&self) -> Vec<String> {
        vec![
            self.total_users.to_string(),
            self.verified_users.to_string(),
            self.unverified_users.to_string(),
            self.new_users_last_30_days.to_string(),
        ]
    }
}

impl TableRow for RegistrationTrendRow {
    fn header() -> Vec<&'static str> {
        vec!["Month", "Registrations"]
    }
    fn cells(&self) -> Vec<String> {
        vec![self.month.format("%Y-%m").to_string(), self.registered_users.to_string()]
    }
}

impl TableRow for OrganizationRow {
    fn header() -> Vec<&'static str> {
        vec!["Organization", "Active users", "Products"]
    }
    fn cells(&self) -> Vec<String> {
        vec![
            self.organization_name.clone(),
            self.total_active_users.to_string(),
            self.total_products.to_string(),
        ]
    }
}

impl TableRow for UserRow {
    fn header() -> Vec<&'static str> {
        vec!["Email", "Created", "Last login", "Verified", "Signup"]
    }
    fn cells(&self) -> Vec<String> {
        vec![
            self.email.clone(),
            self.created_at.format("%Y-%m-%d %H:%M").to_string(),
            self.last_login_at
                .map_or_else(|| "never".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string()),
            if self.is_email_verified { "yes" } else { "no" }.to_string(),
            self.signup_method.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_client::ClientPhase;
    use core_types::{PagedResult, QueryFailure, QueryOutcome};

    fn org(name: &str) -> OrganizationRow {
        OrganizationRow {
            organization_name: name.to_string(),
            total_active_users: 3,
            total_products: 1,
        }
    }

    fn snapshot(last_outcome: Option<QueryOutcome<PagedResult<OrganizationRow>>>) -> PageSnapshot<OrganizationRow> {
        PageSnapshot {
            current_page: 2,
            last_outcome,
            phase: ClientPhase::Settled,
            in_flight: 0,
            latest_request_id: 1,
        }
    }

    #[test]
    fn page_before_first_response_is_loading() {
        assert_eq!(render_page(snapshot(None), 10), "Loading...");
    }

    #[test]
    fn failed_page_shows_the_message() {
        let view = render_page(
            snapshot(Some(QueryOutcome::Failure(QueryFailure::store("The database is unavailable")))),
            10,
        );
        assert_eq!(view, "Error: The database is unavailable");
    }

    #[test]
    fn settled_page_lists_rows_and_position() {
        let view = render_page(
            snapshot(Some(QueryOutcome::Success(PagedResult::new(vec![org("Acme"), org("Globex")], 12)))),
            10,
        );
        assert!(view.contains("Acme"));
        assert!(view.contains("Globex"));
        assert!(view.contains("Page 2 of 2 (12 rows)"));
    }

    #[test]
    fn one_failed_total_replaces_the_summary() {
        let dashboard = OrgsDashboard {
            subscription_tiers: QueryOutcome::Success(Vec::new()),
            top_orgs_by_revenue: QueryOutcome::Success(Vec::new()),
            average_plan_prices: QueryOutcome::Success(Vec::new()),
            total_active_users: QueryOutcome::Success(vec![TotalActiveUsersRow { total_active_users: 5 }]),
            total_products: QueryOutcome::Failure(QueryFailure::timeout("The query timed out")),
            total_sales_amount: QueryOutcome::Success(vec![TotalSalesAmountRow { total_sales_amount: None }]),
        };

        let view = render_orgs_dashboard(dashboard);

        assert!(view.contains("== Totals ==\nError: The query timed out"));
        assert!(view.contains("Subscription tiers"));
    }
}
