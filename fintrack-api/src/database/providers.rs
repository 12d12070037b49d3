use anyhow::Result;
use fintrack_types::PaymentProvider;
use rusqlite::params;

use crate::database::AsyncDbConnection;

/// The catalog of banks the ingestion pipeline understands
pub async fn list_providers(conn: AsyncDbConnection) -> Result<Vec<PaymentProvider>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT id, name, slug, logo
         FROM payment_providers
         ORDER BY name",
    )?;

    let providers = stmt
        .query_map([], |row| {
            Ok(PaymentProvider {
                id: row.get(0)?,
                name: row.get(1)?,
                slug: row.get(2)?,
                logo: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(providers)
}

/// The user's connected banks, joined back to the catalog
pub async fn list_user_providers(
    conn: AsyncDbConnection,
    user_id: &str,
) -> Result<Vec<PaymentProvider>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT p.id, p.name, p.slug, p.logo
         FROM user_providers up
         JOIN payment_providers p ON p.id = up.provider_id
         WHERE up.user_id = ?1 AND up.is_active = true
         ORDER BY p.name",
    )?;

    let providers = stmt
        .query_map([user_id], |row| {
            Ok(PaymentProvider {
                id: row.get(0)?,
                name: row.get(1)?,
                slug: row.get(2)?,
                logo: row.get(3)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(providers)
}

/// Replace the user's connected bank set in one transaction, matching the
/// onboarding flow's delete-then-insert write.
pub async fn replace_user_providers(
    conn: AsyncDbConnection,
    user_id: &str,
    provider_ids: &[String],
) -> Result<()> {
    let mut conn = conn.lock().await;
    let now = chrono::Utc::now().timestamp();

    let tx = conn.transaction()?;
    tx.execute("DELETE FROM user_providers WHERE user_id = ?1", [user_id])?;
    for provider_id in provider_ids {
        tx.execute(
            "INSERT INTO user_providers (user_id, provider_id, is_active, created_at)
             VALUES (?1, ?2, true, ?3)",
            params![user_id, provider_id, now],
        )?;
    }
    tx.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    fn new_database() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("ledger.sqlite3")).unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn test_catalog_seeded() {
        let (_dir, db) = new_database();

        let providers = list_providers(db.async_connection.clone()).await.unwrap();
        assert!(providers.iter().any(|p| p.slug == "bancolombia"));
        assert!(providers.iter().any(|p| p.slug == "nequi"));
    }

    #[tokio::test]
    async fn test_replace_swaps_the_whole_set() {
        let (_dir, db) = new_database();

        replace_user_providers(
            db.async_connection.clone(),
            "u1",
            &["provider-bancolombia".to_string(), "provider-nequi".to_string()],
        )
        .await
        .unwrap();

        let linked = list_user_providers(db.async_connection.clone(), "u1")
            .await
            .unwrap();
        assert_eq!(linked.len(), 2);

        replace_user_providers(
            db.async_connection.clone(),
            "u1",
            &["provider-bbva".to_string()],
        )
        .await
        .unwrap();

        let linked = list_user_providers(db.async_connection.clone(), "u1")
            .await
            .unwrap();
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].slug, "bbva");
    }

    #[tokio::test]
    async fn test_replace_with_empty_set_disconnects_all() {
        let (_dir, db) = new_database();

        replace_user_providers(
            db.async_connection.clone(),
            "u1",
            &["provider-nequi".to_string()],
        )
        .await
        .unwrap();
        replace_user_providers(db.async_connection.clone(), "u1", &[])
            .await
            .unwrap();

        let linked = list_user_providers(db.async_connection.clone(), "u1")
            .await
            .unwrap();
        assert!(linked.is_empty());
    }
}
