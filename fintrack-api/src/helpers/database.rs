use std::path::PathBuf;

use crate::config::ApiConfig;

/// Returns the path to the ledger database based on the operating system
///
/// # Platform-specific paths
///
/// - **macOS**: `~/Library/Application Support/fintrack/ledger.sqlite3`
/// - **Linux**: `~/.local/share/fintrack/ledger.sqlite3`
/// - **Windows**: `%LOCALAPPDATA%\fintrack\ledger.sqlite3`
pub fn get_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("fintrack").join("ledger.sqlite3"))
}

/// Open the ledger database at the configured path, falling back to the
/// platform default. The handle is injected everywhere; nothing else in the
/// service opens connections on its own.
pub fn initialize_database(
    config: &ApiConfig,
) -> anyhow::Result<std::sync::Arc<crate::database::Database>> {
    let db_path = match config.database.as_ref().and_then(|d| d.path.clone()) {
        Some(path) => PathBuf::from(path),
        None => get_db_path()?,
    };

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = crate::database::Database::new(&db_path)?;
    Ok(std::sync::Arc::new(db))
}
