use anyhow::Result;
use fintrack_types::OnboardingProgress;
use rusqlite::params;

use crate::database::AsyncDbConnection;

/// Reads the user's onboarding progress, creating the row on first contact so
/// every user always has one.
pub async fn onboarding_progress(
    conn: AsyncDbConnection,
    user_id: &str,
) -> Result<OnboardingProgress> {
    let conn = conn.lock().await;
    ensure_user(&conn, user_id)?;

    let progress = conn.query_row(
        "SELECT onboarding_step, onboarding_completed, welcome_seen
         FROM users
         WHERE id = ?1",
        [user_id],
        |row| {
            Ok(OnboardingProgress {
                user_id: user_id.to_string(),
                onboarding_step: row.get(0)?,
                onboarding_completed: row.get(1)?,
                welcome_seen: row.get(2)?,
            })
        },
    )?;

    Ok(progress)
}

/// Records the last completed onboarding step; completion is a separate flag
/// so a skipped step still advances the stepper.
pub async fn set_onboarding_step(
    conn: AsyncDbConnection,
    user_id: &str,
    step: i32,
    completed: bool,
) -> Result<()> {
    let conn = conn.lock().await;
    ensure_user(&conn, user_id)?;
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "UPDATE users
         SET onboarding_step = ?1, onboarding_completed = ?2, updated_at = ?3
         WHERE id = ?4",
        params![step, completed, now, user_id],
    )?;

    Ok(())
}

/// Server-side rendition of the welcome-modal-seen flag
pub async fn mark_welcome_seen(conn: AsyncDbConnection, user_id: &str) -> Result<()> {
    let conn = conn.lock().await;
    ensure_user(&conn, user_id)?;
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "UPDATE users SET welcome_seen = true, updated_at = ?1 WHERE id = ?2",
        params![now, user_id],
    )?;

    Ok(())
}

fn ensure_user(conn: &rusqlite::Connection, user_id: &str) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    conn.execute(
        "INSERT OR IGNORE INTO users (id, created_at, updated_at) VALUES (?1, ?2, ?2)",
        params![user_id, now],
    )?;
    Ok(())
}
