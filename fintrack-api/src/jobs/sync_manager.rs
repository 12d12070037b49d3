use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use fintrack_analytics::Period;
use fintrack_types::{CategorySpendRow, DailyBalanceRow, MonthlySummaryRow, Transaction};

use crate::database::{summaries, transactions, AsyncDbConnection};
use crate::helpers::query_cache::{CachedRows, QueryCache, QueryKey, QueryKind};

/// Everything the dashboard derivation needs for one (user, period)
pub struct DashboardRows {
    pub transactions: Vec<Transaction>,
    pub monthly_summary: Vec<MonthlySummaryRow>,
    pub prev_monthly_summary: Vec<MonthlySummaryRow>,
    pub spending_by_category: Vec<CategorySpendRow>,
    pub daily_balance: Vec<DailyBalanceRow>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Keeps visible dashboard periods fresh.
///
/// Handlers pull rows through `dashboard_rows`, which serves from the cache
/// while fresh and refetches otherwise; a background interval task calls
/// `refresh_visible_periods` so the data keeps moving while a dashboard stays
/// open. A failed read degrades to the empty default for that field and is
/// logged; the dashboard always renders.
pub struct SyncManager {
    db_conn: AsyncDbConnection,
    cache: Arc<QueryCache>,
    cache_ttl: Duration,
    visibility_window: Duration,
    shutting_down: AtomicBool,
}

impl SyncManager {
    pub fn new(
        db_conn: AsyncDbConnection,
        cache: Arc<QueryCache>,
        cache_ttl_secs: i64,
        visibility_window_secs: i64,
    ) -> Self {
        Self {
            db_conn,
            cache,
            cache_ttl: Duration::seconds(cache_ttl_secs),
            visibility_window: Duration::seconds(visibility_window_secs),
            shutting_down: AtomicBool::new(false),
        }
    }

    pub fn is_shutting_down(&self) -> bool {
        self.shutting_down.load(Ordering::SeqCst)
    }

    pub fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
    }

    /// Cache-or-fetch for all five period reads. The reads are independent
    /// and run concurrently; each one that fails is logged and replaced by
    /// its empty default rather than failing the whole load.
    pub async fn dashboard_rows(&self, user_id: &str, period: Period) -> DashboardRows {
        self.cache.touch_visible(user_id, period).await;

        let previous = period.previous();
        let (transactions, monthly_summary, prev_monthly_summary, spending, daily) = tokio::join!(
            self.load(user_id, period, QueryKind::Transactions),
            self.load(user_id, period, QueryKind::MonthlySummary),
            self.load(user_id, previous, QueryKind::MonthlySummary),
            self.load(user_id, period, QueryKind::SpendingByCategory),
            self.load(user_id, period, QueryKind::DailyBalance),
        );

        let transactions_key = QueryKey::new(user_id, period, QueryKind::Transactions);
        let last_updated = self.cache.fetched_at(&transactions_key).await;

        DashboardRows {
            transactions: match transactions {
                CachedRows::Transactions(rows) => rows,
                _ => Vec::new(),
            },
            monthly_summary: match monthly_summary {
                CachedRows::Summary(rows) => rows,
                _ => Vec::new(),
            },
            prev_monthly_summary: match prev_monthly_summary {
                CachedRows::Summary(rows) => rows,
                _ => Vec::new(),
            },
            spending_by_category: match spending {
                CachedRows::Categories(rows) => rows,
                _ => Vec::new(),
            },
            daily_balance: match daily {
                CachedRows::Daily(rows) => rows,
                _ => Vec::new(),
            },
            last_updated,
        }
    }

    /// Drop the cached rows for a period and fetch them again now (the manual
    /// refetch trigger behind the refresh endpoint).
    pub async fn refresh_period(&self, user_id: &str, period: Period) {
        self.cache.invalidate_period(user_id, period).await;
        self.cache.invalidate_period(user_id, period.previous()).await;
        let _ = self.dashboard_rows(user_id, period).await;
    }

    /// Refetch every (user, period) someone is currently looking at. Returns
    /// how many periods were refreshed.
    pub async fn refresh_visible_periods(&self) -> Result<usize> {
        let visible = self.cache.visible_periods(self.visibility_window).await;
        let refreshed = visible.len();

        for (user_id, period) in visible {
            if self.is_shutting_down() {
                break;
            }
            tracing::debug!(
                "Refreshing dashboard data for user={} period={}",
                user_id,
                period.month_key()
            );
            self.cache.invalidate_period(&user_id, period).await;
            self.cache
                .invalidate_period(&user_id, period.previous())
                .await;
            let _ = self.dashboard_rows(&user_id, period).await;
        }

        Ok(refreshed)
    }

    /// One cached read. On a miss the database is queried under a fetch
    /// ticket so an overlapping newer fetch supersedes this result.
    async fn load(&self, user_id: &str, period: Period, kind: QueryKind) -> CachedRows {
        let key = QueryKey::new(user_id, period, kind);

        if let Some(rows) = self.cache.get_fresh(&key, self.cache_ttl).await {
            return rows;
        }

        let ticket = self.cache.begin_fetch(&key).await;
        match self.fetch(user_id, period, kind).await {
            Ok(rows) => {
                self.cache.store(key, ticket, rows.clone()).await;
                rows
            }
            Err(e) => {
                tracing::error!(
                    "Failed to read {:?} for user={} period={}: {}",
                    kind,
                    user_id,
                    period.month_key(),
                    e
                );
                empty_rows(kind)
            }
        }
    }

    async fn fetch(&self, user_id: &str, period: Period, kind: QueryKind) -> Result<CachedRows> {
        match kind {
            QueryKind::Transactions => {
                let rows =
                    transactions::list_for_period(self.db_conn.clone(), user_id, period).await?;
                Ok(CachedRows::Transactions(rows))
            }
            QueryKind::MonthlySummary => {
                let rows =
                    summaries::monthly_summary_rows(self.db_conn.clone(), user_id, period).await?;
                Ok(CachedRows::Summary(rows))
            }
            QueryKind::SpendingByCategory => {
                let rows =
                    summaries::spending_by_category(self.db_conn.clone(), user_id, period).await?;
                Ok(CachedRows::Categories(rows))
            }
            QueryKind::DailyBalance => {
                let rows = summaries::daily_balance(self.db_conn.clone(), user_id, period).await?;
                Ok(CachedRows::Daily(rows))
            }
        }
    }
}

fn empty_rows(kind: QueryKind) -> CachedRows {
    match kind {
        QueryKind::Transactions => CachedRows::Transactions(Vec::new()),
        QueryKind::MonthlySummary => CachedRows::Summary(Vec::new()),
        QueryKind::SpendingByCategory => CachedRows::Categories(Vec::new()),
        QueryKind::DailyBalance => CachedRows::Daily(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    fn seeded_manager() -> (tempfile::TempDir, SyncManager) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("ledger.sqlite3")).unwrap();

        {
            let conn = db.connection.lock().unwrap();
            let now = chrono::Utc::now().timestamp();
            for (id, amount, tx_type, occurred_at) in [
                ("t1", 40000.0, "expense", "2026-08-03T10:00:00+00:00"),
                ("t2", 200000.0, "income", "2026-08-01T08:00:00+00:00"),
                ("t3", 50000.0, "expense", "2026-07-15T10:00:00+00:00"),
            ] {
                conn.execute(
                    "INSERT INTO transactions
                        (id, user_id, amount, currency, type, occurred_at, is_confirmed,
                         created_at, updated_at)
                     VALUES (?1, 'u1', ?2, 'COP', ?3, ?4, true, ?5, ?5)",
                    rusqlite::params![id, amount, tx_type, occurred_at, now],
                )
                .unwrap();
            }
        }

        let manager = SyncManager::new(
            db.async_connection.clone(),
            Arc::new(QueryCache::new()),
            10,
            120,
        );
        (dir, manager)
    }

    #[tokio::test]
    async fn test_dashboard_rows_loads_all_reads() {
        let (_dir, manager) = seeded_manager();
        let period = Period::new(2026, 8).unwrap();

        let rows = manager.dashboard_rows("u1", period).await;
        assert_eq!(rows.transactions.len(), 2);
        assert_eq!(rows.monthly_summary.len(), 2);
        // July expense surfaces through the previous-month summary
        assert_eq!(rows.prev_monthly_summary.len(), 1);
        assert_eq!(rows.prev_monthly_summary[0].total_amount, 50000.0);
        assert!(!rows.daily_balance.is_empty());
        assert!(rows.last_updated.is_some());
    }

    #[tokio::test]
    async fn test_poller_refreshes_only_visible_periods() {
        let (_dir, manager) = seeded_manager();
        let period = Period::new(2026, 8).unwrap();

        // Nothing visible yet
        assert_eq!(manager.refresh_visible_periods().await.unwrap(), 0);

        let _ = manager.dashboard_rows("u1", period).await;
        assert_eq!(manager.refresh_visible_periods().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_flag() {
        let (_dir, manager) = seeded_manager();
        assert!(!manager.is_shutting_down());
        manager.shutdown();
        assert!(manager.is_shutting_down());
    }
}
