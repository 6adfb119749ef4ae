//! Statement texts, one per widget or paged resource. PostgreSQL dialect.

// --- Organizations dashboard ---

pub const SUBSCRIPTION_TIERS: &str = "
  SELECT subscription_tier, COUNT(organization_id) AS total_organizations
  FROM organizations
  GROUP BY subscription_tier
  ORDER BY total_organizations DESC
  LIMIT 10
";

pub const TOP_ORGANIZATIONS_BY_REVENUE: &str = "
  SELECT o.organization_name, SUM(r.total_revenue) AS total_revenue
  FROM organizations o
  JOIN revenue r ON o.organization_id = r.organization_id
  GROUP BY o.organization_name
  ORDER BY total_revenue DESC
  LIMIT 10
";

pub const AVERAGE_PLAN_PRICE: &str = "
  SELECT plan_name, AVG(monthly_price) AS average_monthly_price
  FROM subscriptions
  GROUP BY plan_name
  ORDER BY average_monthly_price DESC
  LIMIT 10
";

pub const TOTAL_ACTIVE_USERS: &str =
    "SELECT COUNT(user_id) AS total_active_users FROM users WHERE is_active = TRUE";

pub const TOTAL_PRODUCTS: &str = "SELECT COUNT(product_id) AS total_products FROM products";

pub const TOTAL_SALES_AMOUNT: &str = "SELECT SUM(total_amount) AS total_sales_amount FROM sales";

pub const ORGANIZATIONS_PAGE: &str = "
  SELECT o.organization_name,
         COUNT(DISTINCT u.user_id) AS total_active_users,
         COUNT(DISTINCT p.product_id) AS total_products
  FROM organizations o
  LEFT JOIN users u ON o.organization_id = u.organization_id AND u.is_active = TRUE
  LEFT JOIN products p ON o.organization_id = p.organization_id
  GROUP BY o.organization_name
  ORDER BY o.organization_name
  LIMIT $1 OFFSET $2
";

pub const ORGANIZATIONS_COUNT: &str = "SELECT COUNT(*) AS total FROM organizations";

// --- Users dashboard ---

pub const USER_KEY_METRICS: &str = "
  SELECT
    COUNT(*) AS total_users,
    COUNT(*) FILTER (WHERE is_email_verified = true) AS verified_users,
    COUNT(*) FILTER (WHERE is_email_verified = false) AS unverified_users,
    COUNT(*) FILTER (WHERE created_at >= NOW() - INTERVAL '30 days') AS new_users_last_30_days
  FROM users
";

pub const USER_REGISTRATION_TREND: &str = "
  SELECT
    DATE_TRUNC('month', created_at) AS month,
    COUNT(*) AS registered_users
  FROM users
  WHERE created_at >= NOW() - INTERVAL '12 months'
  GROUP BY DATE_TRUNC('month', created_at)
  ORDER BY month ASC
";

pub const USERS_PAGE: &str = "
  SELECT
    id,
    email,
    created_at,
    last_login_at,
    is_email_verified,
    signup_method
  FROM users
  ORDER BY created_at DESC
  LIMIT $1 OFFSET $2
";

pub const USERS_COUNT: &str = "SELECT COUNT(*) AS total FROM users";
