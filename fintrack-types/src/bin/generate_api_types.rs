use fintrack_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Transaction types
    types.push(clean_type(TransactionType::export_to_string()?));
    types.push(clean_type(Transaction::export_to_string()?));
    types.push(clean_type(TransactionsResponse::export_to_string()?));

    // Dashboard types
    types.push(clean_type(MonthlySummary::export_to_string()?));
    types.push(clean_type(CategoryExpense::export_to_string()?));
    types.push(clean_type(DailyTrend::export_to_string()?));
    types.push(clean_type(CategoryComparison::export_to_string()?));
    types.push(clean_type(InsightKind::export_to_string()?));
    types.push(clean_type(Insight::export_to_string()?));
    types.push(clean_type(MonthlySummaryRow::export_to_string()?));
    types.push(clean_type(CategorySpendRow::export_to_string()?));
    types.push(clean_type(DailyBalanceRow::export_to_string()?));
    types.push(clean_type(DashboardData::export_to_string()?));

    // Report types
    types.push(clean_type(CategoryShare::export_to_string()?));
    types.push(clean_type(MonthlyReport::export_to_string()?));

    // Category types
    types.push(clean_type(Category::export_to_string()?));
    types.push(clean_type(CreateCategoryRequest::export_to_string()?));
    types.push(clean_type(UpdateCategoryRequest::export_to_string()?));
    types.push(clean_type(CategoriesResponse::export_to_string()?));

    // Provider types
    types.push(clean_type(PaymentProvider::export_to_string()?));
    types.push(clean_type(UserProvider::export_to_string()?));
    types.push(clean_type(UpdateUserProvidersRequest::export_to_string()?));
    types.push(clean_type(ProvidersResponse::export_to_string()?));

    // Onboarding types
    types.push(clean_type(OnboardingProgress::export_to_string()?));
    types.push(clean_type(UpdateOnboardingRequest::export_to_string()?));

    let output_dir = Path::new("../web/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let lines: Vec<&str> = type_def.lines().collect();
    let has_import = lines
        .iter()
        .any(|line| line.trim().starts_with("import type"));

    let filtered: Vec<&str> = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            // Keep import lines only when a type genuinely references another file
            if trimmed.starts_with("import type") {
                return has_import;
            }
            !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .cloned()
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
