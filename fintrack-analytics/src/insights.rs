use fintrack_types::{CategoryExpense, Insight, InsightKind, MonthlySummary};

/// The dashboard shows at most this many insights
pub const MAX_INSIGHTS: usize = 4;

/// Trend insights only fire beyond this percentage change, either direction
const TREND_THRESHOLD_PERCENT: i64 = 10;

/// Derives the insight list for one period. Deterministic given its inputs;
/// rules are evaluated in a fixed order (balance, top category, trend) and the
/// result is truncated to the first [`MAX_INSIGHTS`] entries in generation
/// order, never reordered by severity.
pub fn generate_insights(
    summary: &MonthlySummary,
    expenses_by_category: &[CategoryExpense],
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if summary.balance > 0.0 {
        insights.push(Insight {
            kind: InsightKind::Success,
            icon: "✅".to_string(),
            message: format!(
                "¡Bien! Llevas un balance positivo de ${} este mes.",
                format_cop(summary.balance)
            ),
        });
    } else if summary.balance < 0.0 {
        insights.push(Insight {
            kind: InsightKind::Warning,
            icon: "⚠️".to_string(),
            message: format!(
                "Cuidado: Tus gastos superan tus ingresos por ${}",
                format_cop(summary.balance.abs())
            ),
        });
    }

    if let Some(top_category) = expenses_by_category.first() {
        insights.push(Insight {
            kind: InsightKind::Info,
            icon: top_category.emoji.clone(),
            message: format!(
                "Tu mayor gasto es en {}: ${}",
                top_category.name,
                format_cop(top_category.value)
            ),
        });
    }

    if summary.previous_month_expenses > 0.0 {
        let change_percent = (((summary.expenses - summary.previous_month_expenses)
            / summary.previous_month_expenses)
            * 100.0)
            .round() as i64;

        if change_percent < -TREND_THRESHOLD_PERCENT {
            insights.push(Insight {
                kind: InsightKind::Success,
                icon: "📉".to_string(),
                message: format!(
                    "Gastaste {}% menos que el mes pasado. ¡Sigue así!",
                    change_percent.abs()
                ),
            });
        } else if change_percent > TREND_THRESHOLD_PERCENT {
            insights.push(Insight {
                kind: InsightKind::Warning,
                icon: "📈".to_string(),
                message: format!("Gastaste {}% más que el mes pasado.", change_percent),
            });
        }
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}

/// Formats an amount the way the es-CO locale renders pesos: rounded to whole
/// units, dot-separated thousands, no currency symbol (callers prepend `$`).
pub fn format_cop(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (index + 3 - offset) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(income: f64, expenses: f64, previous: f64) -> MonthlySummary {
        MonthlySummary {
            income,
            expenses,
            balance: income - expenses,
            previous_month_expenses: previous,
        }
    }

    fn category(name: &str, value: f64) -> CategoryExpense {
        CategoryExpense {
            name: name.to_string(),
            value,
            emoji: "🛒".to_string(),
            color: "#22c55e".to_string(),
        }
    }

    #[test]
    fn test_positive_balance_emits_success() {
        let insights = generate_insights(&summary(1_500_000.0, 900_000.0, 0.0), &[]);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Success);
        assert!(insights[0].message.contains("$600.000"));
    }

    #[test]
    fn test_negative_balance_emits_warning_with_deficit() {
        let insights = generate_insights(&summary(100.0, 350.0, 0.0), &[]);
        assert_eq!(insights[0].kind, InsightKind::Warning);
        assert!(insights[0].message.contains("$250"));
    }

    #[test]
    fn test_zero_balance_emits_nothing_for_balance_rule() {
        let insights = generate_insights(&summary(100.0, 100.0, 0.0), &[]);
        assert!(insights.is_empty());
    }

    #[test]
    fn test_top_category_named_in_info_insight() {
        let categories = vec![category("Mercado", 250_000.0), category("Transporte", 90_000.0)];
        let insights = generate_insights(&summary(0.0, 0.0, 0.0), &categories);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Info);
        assert!(insights[0].message.contains("Mercado"));
        assert!(insights[0].message.contains("$250.000"));
    }

    #[test]
    fn test_spending_drop_beyond_threshold_emits_success() {
        // 150 vs 200 is -25%, below -10
        let insights = generate_insights(&summary(0.0, 150.0, 200.0), &[]);
        let trend = insights.last().unwrap();
        assert_eq!(trend.kind, InsightKind::Success);
        assert!(trend.message.contains("25% menos"));
    }

    #[test]
    fn test_spending_rise_beyond_threshold_emits_warning() {
        // 260 vs 200 is +30%
        let insights = generate_insights(&summary(0.0, 260.0, 200.0), &[]);
        let trend = insights.last().unwrap();
        assert_eq!(trend.kind, InsightKind::Warning);
        assert!(trend.message.contains("30% más"));
    }

    #[test]
    fn test_small_change_emits_no_trend_insight() {
        // 210 vs 200 is +5%, inside the threshold band
        let insights = generate_insights(&summary(0.0, 210.0, 200.0), &[]);
        assert!(insights
            .iter()
            .all(|insight| !insight.message.contains("mes pasado")));
    }

    #[test]
    fn test_no_trend_insight_without_previous_data() {
        let insights = generate_insights(&summary(0.0, 500.0, 0.0), &[]);
        assert!(insights
            .iter()
            .all(|insight| !insight.message.contains("mes pasado")));
    }

    #[test]
    fn test_insight_list_never_exceeds_cap() {
        // All three rules firing at once still stays within the cap
        let categories = vec![category("Mercado", 250_000.0)];
        let insights = generate_insights(&summary(100.0, 400.0, 200.0), &categories);
        assert!(insights.len() <= MAX_INSIGHTS);
        assert_eq!(insights.len(), 3);
        // Generation order preserved: balance, then category, then trend
        assert_eq!(insights[0].kind, InsightKind::Warning);
        assert_eq!(insights[1].kind, InsightKind::Info);
        assert_eq!(insights[2].kind, InsightKind::Warning);
    }

    #[test]
    fn test_format_cop_groups_thousands() {
        assert_eq!(format_cop(0.0), "0");
        assert_eq!(format_cop(950.0), "950");
        assert_eq!(format_cop(1_234.0), "1.234");
        assert_eq!(format_cop(1_234_567.0), "1.234.567");
        assert_eq!(format_cop(-45_000.0), "-45.000");
        assert_eq!(format_cop(999.6), "1.000");
    }
}
