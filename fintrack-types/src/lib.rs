pub mod category;
pub mod dashboard;
pub mod onboarding;
pub mod provider;
pub mod report;
pub mod transaction;

pub use category::{CategoriesResponse, Category, CreateCategoryRequest, UpdateCategoryRequest};
pub use dashboard::{
    CategoryComparison, CategoryExpense, CategorySpendRow, DailyBalanceRow, DailyTrend,
    DashboardData, Insight, InsightKind, MonthlySummary, MonthlySummaryRow,
};
pub use onboarding::{OnboardingProgress, UpdateOnboardingRequest};
pub use provider::{
    PaymentProvider, ProvidersResponse, UpdateUserProvidersRequest, UserProvider,
};
pub use report::{CategoryShare, MonthlyReport};
pub use transaction::{Transaction, TransactionType, TransactionsResponse};
