use anyhow::Result;
use chrono::{DateTime, Utc};
use fintrack_analytics::Period;
use fintrack_types::{Transaction, TransactionType};
use rusqlite::params;

use crate::database::AsyncDbConnection;

/// Period-scoped read of the transactions view, joined category and provider
/// metadata included, newest first. An empty result means "no data yet".
pub async fn list_for_period(
    conn: AsyncDbConnection,
    user_id: &str,
    period: Period,
) -> Result<Vec<Transaction>> {
    let conn = conn.lock().await;
    let start = period.start().to_rfc3339();
    let end = period.end().to_rfc3339();

    let mut stmt = conn.prepare(
        "SELECT id, user_id, amount, currency, type, merchant, description, occurred_at,
                is_confirmed, category_id, category_name, category_icon, category_color,
                provider_id, provider_name, reference_number, location
         FROM v_transactions_full
         WHERE user_id = ?1 AND occurred_at >= ?2 AND occurred_at < ?3
         ORDER BY occurred_at DESC",
    )?;

    let transactions = stmt
        .query_map(params![user_id, start, end], |row| {
            let type_str: String = row.get(4)?;
            let transaction_type = match type_str.as_str() {
                "income" => TransactionType::Income,
                _ => TransactionType::Expense,
            };

            let occurred_at_str: String = row.get(7)?;
            let occurred_at = parse_timestamp(&occurred_at_str).ok_or_else(|| {
                rusqlite::Error::InvalidColumnType(
                    7,
                    occurred_at_str.clone(),
                    rusqlite::types::Type::Text,
                )
            })?;

            Ok(Transaction {
                id: row.get(0)?,
                user_id: row.get(1)?,
                amount: row.get::<_, Option<f64>>(2)?.unwrap_or(0.0),
                currency: row.get(3)?,
                transaction_type,
                merchant: row.get(5)?,
                description: row.get(6)?,
                occurred_at,
                is_confirmed: row.get(8)?,
                category_id: row.get(9)?,
                category_name: row.get(10)?,
                category_icon: row.get(11)?,
                category_color: row.get(12)?,
                provider_id: row.get(13)?,
                provider_name: row.get(14)?,
                reference_number: row.get(15)?,
                location: row.get(16)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(transactions)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    fn seeded_database() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("ledger.sqlite3")).unwrap();

        {
            let conn = db.connection.lock().unwrap();
            let now = chrono::Utc::now().timestamp();
            for (id, amount, tx_type, occurred_at, confirmed) in [
                ("t1", 25000.0, "expense", "2026-08-05T14:30:00+00:00", true),
                ("t2", 1500000.0, "income", "2026-08-01T09:00:00+00:00", true),
                ("t3", 8000.0, "expense", "2026-07-28T18:00:00+00:00", false),
            ] {
                conn.execute(
                    "INSERT INTO transactions
                        (id, user_id, amount, currency, type, occurred_at, is_confirmed,
                         category_id, created_at, updated_at)
                     VALUES (?1, 'u1', ?2, 'COP', ?3, ?4, ?5, 'global-mercado', ?6, ?6)",
                    rusqlite::params![id, amount, tx_type, occurred_at, confirmed, now],
                )
                .unwrap();
            }
        }

        (dir, db)
    }

    #[tokio::test]
    async fn test_period_read_filters_and_orders() {
        let (_dir, db) = seeded_database();
        let period = Period::new(2026, 8).unwrap();

        let transactions = list_for_period(db.async_connection.clone(), "u1", period)
            .await
            .unwrap();

        // The July transaction stays out of the August window
        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].id, "t1");
        assert_eq!(transactions[1].id, "t2");
        assert_eq!(transactions[0].transaction_type, TransactionType::Expense);
        assert_eq!(transactions[0].category_name.as_deref(), Some("Mercado"));
        assert_eq!(transactions[0].category_icon.as_deref(), Some("🛒"));
    }

    #[tokio::test]
    async fn test_unknown_user_reads_empty() {
        let (_dir, db) = seeded_database();
        let period = Period::new(2026, 8).unwrap();

        let transactions = list_for_period(db.async_connection.clone(), "nobody", period)
            .await
            .unwrap();
        assert!(transactions.is_empty());
    }
}
