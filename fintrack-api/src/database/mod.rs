pub mod categories;
pub mod migrations;
pub mod providers;
pub mod summaries;
pub mod transactions;
pub mod users;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type DbConnection = Arc<Mutex<Connection>>;

#[derive(Clone)]
pub struct AsyncDbConnection {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl AsyncDbConnection {
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn lock(&self) -> PooledConnection<SqliteConnectionManager> {
        self.pool
            .get()
            .expect("Failed to get DB connection from pool")
    }
}

pub struct Database {
    pub connection: DbConnection,
    pub async_connection: AsyncDbConnection,
}

impl Database {
    /// Open (or create) the ledger database and run migrations.
    ///
    /// The path comes from configuration; the service never constructs a
    /// hidden global connection.
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        // Ensure directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create sync connection first and run migrations
        let sync_conn = Connection::open(db_path)?;
        let sync_mutex = Arc::new(Mutex::new(sync_conn));

        // Run migrations on the sync connection before opening the pool
        {
            let conn = sync_mutex
                .lock()
                .map_err(|_| anyhow::anyhow!("Database mutex poisoned during migration"))?;
            migrations::run_migrations(&conn)?;
        }

        // Pooled connections see the migrated schema
        let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder().max_size(8).build(manager)?;

        Ok(Database {
            connection: sync_mutex,
            async_connection: AsyncDbConnection::new(pool),
        })
    }
}
