//! Fintrack Analytics Crate
//!
//! The pure computation core of the dashboard: given raw transaction rows and
//! the (possibly empty) precomputed view rows, it derives everything the
//! dashboard renders. No I/O happens here; the `fintrack-api` crate feeds it
//! rows from the query layer.
//!
//! # Architecture
//!
//! - **Types**: Data shapes live in the `fintrack-types` crate
//! - **Aggregation**: `aggregate` prefers precomputed views and falls back to
//!   reducing raw transactions when a view has no rows yet
//! - **Insights**: `generate_insights` turns the derived summary into a short,
//!   capped list of observations
//!
//! # Example
//!
//! ```rust,ignore
//! use fintrack_analytics::{aggregate, generate_insights};
//!
//! let derived = aggregate(&transactions, &summary_rows, &prev_rows, &category_rows, &daily_rows);
//! let insights = generate_insights(&derived.summary, &derived.expenses_by_category);
//! ```

pub mod aggregate;
pub mod insights;
pub mod period;
pub mod report;
mod sources;

pub use aggregate::{
    aggregate, split_by_confirmation, DashboardAggregate, RECENT_TRANSACTIONS_LIMIT,
    TOP_CATEGORIES, TREND_DAYS, UNCATEGORIZED,
};
pub use insights::{format_cop, generate_insights, MAX_INSIGHTS};
pub use period::{day_label, Period, PeriodError};
pub use report::monthly_report;
