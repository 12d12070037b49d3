use fintrack_types::{Category, CreateCategoryRequest, UpdateCategoryRequest};
use rusqlite::params;
use thiserror::Error;

use crate::database::AsyncDbConnection;

#[derive(Debug, Error)]
pub enum CategoryDbError {
    #[error("Category not found")]
    NotFound,
    #[error("Global categories cannot be deleted")]
    GlobalImmutable,
    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for CategoryDbError {
    fn from(err: rusqlite::Error) -> Self {
        CategoryDbError::Database(err.to_string())
    }
}

fn category_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        slug: row.get(3)?,
        icon: row.get(4)?,
        color: row.get(5)?,
        is_income: row.get(6)?,
        is_global: row.get(7)?,
        sort_order: row.get(8)?,
    })
}

/// Global categories plus the user's own, globals first
pub async fn list_categories(
    conn: AsyncDbConnection,
    user_id: &str,
) -> Result<Vec<Category>, CategoryDbError> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, slug, icon, color, is_income, is_global, sort_order
         FROM categories
         WHERE is_global = true OR user_id = ?1
         ORDER BY is_global DESC, sort_order, name",
    )?;

    let categories = stmt
        .query_map([user_id], category_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(categories)
}

/// Insert a personal category. The slug is derived from the name; the id is a
/// fresh UUID.
pub async fn insert_category(
    conn: AsyncDbConnection,
    request: &CreateCategoryRequest,
) -> Result<Category, CategoryDbError> {
    let conn = conn.lock().await;
    let now = chrono::Utc::now().timestamp();

    let name = request.name.trim();
    let slug = name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-");
    let id = uuid::Uuid::new_v4().to_string();

    conn.execute(
        "INSERT INTO categories
            (id, user_id, name, slug, icon, color, is_income, is_global, sort_order, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, false, 0, ?8)",
        params![
            id,
            request.user_id,
            name,
            slug,
            request.icon,
            request.color,
            request.is_income,
            now,
        ],
    )?;

    Ok(Category {
        id,
        user_id: Some(request.user_id.clone()),
        name: name.to_string(),
        slug,
        icon: request.icon.clone(),
        color: request.color.clone(),
        is_income: request.is_income,
        is_global: false,
        sort_order: 0,
    })
}

/// Update one of the user's own categories. Globals and other users' rows
/// are rejected; absent fields keep their current value.
pub async fn update_category(
    conn: AsyncDbConnection,
    category_id: &str,
    request: &UpdateCategoryRequest,
) -> Result<Category, CategoryDbError> {
    let conn = conn.lock().await;

    let existing = conn
        .query_row(
            "SELECT id, user_id, name, slug, icon, color, is_income, is_global, sort_order
             FROM categories
             WHERE id = ?1",
            [category_id],
            category_from_row,
        )
        .map_err(|err| match err {
            rusqlite::Error::QueryReturnedNoRows => CategoryDbError::NotFound,
            other => CategoryDbError::from(other),
        })?;

    if existing.is_global {
        return Err(CategoryDbError::GlobalImmutable);
    }
    if existing.user_id.as_deref() != Some(request.user_id.as_str()) {
        return Err(CategoryDbError::NotFound);
    }

    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(&existing.name)
        .to_string();
    let slug = name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-");
    let updated = Category {
        name,
        slug,
        icon: request.icon.clone().unwrap_or(existing.icon),
        color: request.color.clone().unwrap_or(existing.color),
        is_income: request.is_income.unwrap_or(existing.is_income),
        ..existing
    };

    conn.execute(
        "UPDATE categories
         SET name = ?1, slug = ?2, icon = ?3, color = ?4, is_income = ?5
         WHERE id = ?6",
        params![
            updated.name,
            updated.slug,
            updated.icon,
            updated.color,
            updated.is_income,
            category_id,
        ],
    )?;

    Ok(updated)
}

/// Delete one of the user's own categories. Globals and other users' rows are
/// rejected, never silently ignored.
pub async fn delete_category(
    conn: AsyncDbConnection,
    user_id: &str,
    category_id: &str,
) -> Result<(), CategoryDbError> {
    let conn = conn.lock().await;

    let owner: Option<(Option<String>, bool)> = conn
        .query_row(
            "SELECT user_id, is_global FROM categories WHERE id = ?1",
            [category_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .map(Some)
        .or_else(|err| match err {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            other => Err(CategoryDbError::from(other)),
        })?;

    match owner {
        None => Err(CategoryDbError::NotFound),
        Some((_, true)) => Err(CategoryDbError::GlobalImmutable),
        Some((owner_id, false)) if owner_id.as_deref() != Some(user_id) => {
            Err(CategoryDbError::NotFound)
        }
        Some(_) => {
            conn.execute(
                "DELETE FROM categories WHERE id = ?1 AND is_global = false",
                [category_id],
            )?;
            Ok(())
        }
    }
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

    fn create_request(name: &str) -> CreateCategoryRequest {
        CreateCategoryRequest {
            user_id: "u1".to_string(),
            name: name.to_string(),
            icon: "🐕".to_string(),
            color: "#8b5cf6".to_string(),
            is_income: false,
        }
    }

    #[tokio::test]
    async fn test_listing_includes_seeded_globals() {
        let (_dir, db) = new_database();

        let categories = list_categories(db.async_connection.clone(), "u1")
            .await
            .unwrap();
        assert!(categories.iter().any(|c| c.name == "Mercado" && c.is_global));
        assert!(categories.iter().any(|c| c.name == "Salario" && c.is_income));
    }

    #[tokio::test]
    async fn test_insert_derives_slug_and_lists_for_owner_only() {
        let (_dir, db) = new_database();

        let created = insert_category(db.async_connection.clone(), &create_request("Comida Mascotas"))
            .await
            .unwrap();
        assert_eq!(created.slug, "comida-mascotas");
        assert!(!created.is_global);

        let mine = list_categories(db.async_connection.clone(), "u1").await.unwrap();
        assert!(mine.iter().any(|c| c.id == created.id));

        let theirs = list_categories(db.async_connection.clone(), "u2").await.unwrap();
        assert!(!theirs.iter().any(|c| c.id == created.id));
    }

    #[tokio::test]
    async fn test_update_edits_own_rows_only() {
        let (_dir, db) = new_database();

        let created = insert_category(db.async_connection.clone(), &create_request("Mascotas"))
            .await
            .unwrap();

        let request = UpdateCategoryRequest {
            user_id: "u1".to_string(),
            name: Some("Comida Mascotas".to_string()),
            icon: None,
            color: Some("#ef4444".to_string()),
            is_income: None,
        };
        let updated = update_category(db.async_connection.clone(), &created.id, &request)
            .await
            .unwrap();
        assert_eq!(updated.name, "Comida Mascotas");
        assert_eq!(updated.slug, "comida-mascotas");
        assert_eq!(updated.color, "#ef4444");
        // Unset fields keep their value
        assert_eq!(updated.icon, created.icon);

        let foreign = UpdateCategoryRequest {
            user_id: "u2".to_string(),
            name: None,
            icon: None,
            color: None,
            is_income: None,
        };
        let err = update_category(db.async_connection.clone(), &created.id, &foreign)
            .await
            .unwrap_err();
        assert!(matches!(err, CategoryDbError::NotFound));

        let err = update_category(db.async_connection.clone(), "global-mercado", &foreign)
            .await
            .unwrap_err();
        assert!(matches!(err, CategoryDbError::GlobalImmutable));
    }

    #[tokio::test]
    async fn test_delete_rejects_globals_and_foreign_rows() {
        let (_dir, db) = new_database();

        let err = delete_category(db.async_connection.clone(), "u1", "global-mercado")
            .await
            .unwrap_err();
        assert!(matches!(err, CategoryDbError::GlobalImmutable));

        let created = insert_category(db.async_connection.clone(), &create_request("Hobbies"))
            .await
            .unwrap();
        let err = delete_category(db.async_connection.clone(), "u2", &created.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CategoryDbError::NotFound));

        delete_category(db.async_connection.clone(), "u1", &created.id)
            .await
            .unwrap();
        let err = delete_category(db.async_connection.clone(), "u1", &created.id)
            .await
            .unwrap_err();
        assert!(matches!(err, CategoryDbError::NotFound));
    }
}
