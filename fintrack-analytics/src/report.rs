use chrono::{Datelike, NaiveDate};
use fintrack_types::{CategoryShare, MonthlyReport, Transaction, TransactionType};

use crate::aggregate::expense_totals;
use crate::period::Period;

/// Derives the reports-page figures from a period's raw transactions.
///
/// The daily average divides by the elapsed days of the period: today's
/// day-of-month while the period is ongoing, the full month once it is over,
/// zero (and a zero average) before it starts.
pub fn monthly_report(
    transactions: &[Transaction],
    period: Period,
    today: NaiveDate,
) -> MonthlyReport {
    let total_expenses: f64 = transactions
        .iter()
        .filter(|t| t.transaction_type == TransactionType::Expense)
        .map(|t| if t.amount.is_finite() { t.amount.abs() } else { 0.0 })
        .sum();

    let totals = expense_totals(transactions);
    let breakdown: Vec<CategoryShare> = totals
        .into_iter()
        .map(|entry| {
            let percentage = if total_expenses > 0.0 {
                entry.value / total_expenses * 100.0
            } else {
                0.0
            };
            CategoryShare {
                name: entry.name,
                icon: entry.emoji,
                color: entry.color,
                total: entry.value,
                percentage,
            }
        })
        .collect();

    let elapsed_days = if today < period.first_day() {
        0
    } else if today > period.last_day() {
        period.days_in_month()
    } else {
        today.day()
    };

    let daily_average = if elapsed_days > 0 {
        total_expenses / elapsed_days as f64
    } else {
        0.0
    };

    let top_category = breakdown
        .first()
        .map(|share| share.name.clone())
        .unwrap_or_else(|| "Sin datos".to_string());

    MonthlyReport {
        total_expenses,
        daily_average,
        top_category,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn expense(id: &str, amount: f64, category: &str, occurred_at: &str) -> Transaction {
        Transaction {
            id: id.to_string(),
            user_id: "u1".to_string(),
            amount,
            currency: "COP".to_string(),
            transaction_type: TransactionType::Expense,
            merchant: None,
            description: None,
            occurred_at: occurred_at.parse::<DateTime<Utc>>().unwrap(),
            is_confirmed: true,
            category_id: None,
            category_name: Some(category.to_string()),
            category_icon: None,
            category_color: None,
            provider_id: None,
            provider_name: None,
            reference_number: None,
            location: None,
        }
    }

    #[test]
    fn test_daily_average_uses_elapsed_days_of_ongoing_period() {
        let period = Period::new(2026, 8).unwrap();
        let transactions = vec![
            expense("t1", 50_000.0, "Mercado", "2026-08-02T10:00:00Z"),
            expense("t2", 30_000.0, "Transporte", "2026-08-05T10:00:00Z"),
        ];
        let today = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();

        let report = monthly_report(&transactions, period, today);
        assert_eq!(report.total_expenses, 80_000.0);
        assert_eq!(report.daily_average, 8_000.0);
        assert_eq!(report.top_category, "Mercado");
    }

    #[test]
    fn test_closed_period_divides_by_full_month() {
        let period = Period::new(2026, 6).unwrap();
        let transactions = vec![expense("t1", 300_000.0, "Mercado", "2026-06-15T10:00:00Z")];
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();

        let report = monthly_report(&transactions, period, today);
        assert_eq!(report.daily_average, 10_000.0);
    }

    #[test]
    fn test_future_period_has_zero_average() {
        let period = Period::new(2026, 12).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).unwrap();

        let report = monthly_report(&[], period, today);
        assert_eq!(report.daily_average, 0.0);
        assert_eq!(report.top_category, "Sin datos");
        assert!(report.breakdown.is_empty());
    }

    #[test]
    fn test_percentages_sum_to_one_hundred() {
        let period = Period::new(2026, 8).unwrap();
        let transactions = vec![
            expense("t1", 75.0, "Mercado", "2026-08-01T10:00:00Z"),
            expense("t2", 25.0, "Transporte", "2026-08-02T10:00:00Z"),
        ];
        let today = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();

        let report = monthly_report(&transactions, period, today);
        let total_percent: f64 = report.breakdown.iter().map(|s| s.percentage).sum();
        assert!((total_percent - 100.0).abs() < 1e-9);
        assert_eq!(report.breakdown[0].percentage, 75.0);
    }
}
