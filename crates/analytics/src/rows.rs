use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The single row every count statement returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    pub total: i64,
}

// --- Organizations dashboard ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionTierRow {
    pub subscription_tier: String,
    pub total_organizations: i64,
}

/// Rows arrive ranked by revenue, highest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopOrganizationRow {
    pub organization_name: String,
    pub total_revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AveragePlanPriceRow {
    pub plan_name: String,
    pub average_monthly_price: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalActiveUsersRow {
    pub total_active_users: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalProductsRow {
    pub total_products: i64,
}

/// `SUM` over an empty table is NULL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalSalesAmountRow {
    pub total_sales_amount: Option<Decimal>,
}

/// One line of the paginated organizations table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizationRow {
    pub organization_name: String,
    pub total_active_users: i64,
    pub total_products: i64,
}

// --- Users dashboard ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserKeyMetricsRow {
    pub total_users: i64,
    pub verified_users: i64,
    pub unverified_users: i64,
    pub new_users_last_30_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationTrendRow {
    pub month: DateTime<Utc>,
    pub registered_users: i64,
}

/// One line of the paginated users table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub is_email_verified: bool,
    pub signup_method: String,
}
