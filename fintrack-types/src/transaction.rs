use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Direction of a transaction as classified by the ingestion pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

/// A bank transaction synced from the ingestion pipeline, joined with its
/// category and provider metadata. Read-only from this service's perspective;
/// rows are created and updated only by the external email pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct Transaction {
    pub id: String,
    pub user_id: String,

    // Amount sign is not trusted; display always goes through abs()
    pub amount: f64,
    pub currency: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    pub merchant: Option<String>,
    pub description: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub is_confirmed: bool,

    // Denormalized category metadata from the view join
    pub category_id: Option<String>,
    pub category_name: Option<String>,
    pub category_icon: Option<String>,
    pub category_color: Option<String>,

    pub provider_id: Option<String>,
    pub provider_name: Option<String>,
    pub reference_number: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub total: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_serialization() {
        let json = serde_json::to_string(&TransactionType::Income).unwrap();
        assert_eq!(json, "\"income\"");

        let deserialized: TransactionType = serde_json::from_str("\"expense\"").unwrap();
        assert_eq!(deserialized, TransactionType::Expense);
    }

    #[test]
    fn test_transaction_type_field_renamed() {
        let transaction = Transaction {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            amount: 25000.0,
            currency: "COP".to_string(),
            transaction_type: TransactionType::Expense,
            merchant: Some("Exito".to_string()),
            description: None,
            occurred_at: "2026-08-05T14:30:00Z".parse().unwrap(),
            is_confirmed: true,
            category_id: None,
            category_name: Some("Mercado".to_string()),
            category_icon: Some("🛒".to_string()),
            category_color: Some("#22c55e".to_string()),
            provider_id: None,
            provider_name: Some("Bancolombia".to_string()),
            reference_number: None,
            location: None,
        };

        let value = serde_json::to_value(&transaction).unwrap();
        assert_eq!(value["type"], "expense");

        let roundtripped: Transaction = serde_json::from_value(value).unwrap();
        assert_eq!(roundtripped, transaction);
    }
}
