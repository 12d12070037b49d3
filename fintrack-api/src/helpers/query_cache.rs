use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use fintrack_analytics::Period;
use fintrack_types::{CategorySpendRow, DailyBalanceRow, MonthlySummaryRow, Transaction};
use tokio::sync::Mutex;

/// One of the independent period-scoped reads. The previous-month summary is
/// cached as `MonthlySummary` keyed at the previous period, so both months
/// share entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Transactions,
    MonthlySummary,
    SpendingByCategory,
    DailyBalance,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub user_id: String,
    pub year: i32,
    pub month: u32,
    pub kind: QueryKind,
}

impl QueryKey {
    pub fn new(user_id: &str, period: Period, kind: QueryKind) -> Self {
        Self {
            user_id: user_id.to_string(),
            year: period.year(),
            month: period.month(),
            kind,
        }
    }
}

/// Typed row sets, one variant per query kind
#[derive(Clone)]
pub enum CachedRows {
    Transactions(Vec<Transaction>),
    Summary(Vec<MonthlySummaryRow>),
    Categories(Vec<CategorySpendRow>),
    Daily(Vec<DailyBalanceRow>),
}

struct CacheEntry {
    rows: CachedRows,
    fetched_at: DateTime<Utc>,
    generation: u64,
}

/// Cache for the period-scoped reads, one entry per (user, period, kind).
///
/// Overlapping fetches for the same key are deduplicated by generation: each
/// fetch takes a ticket before hitting the database and a result is only
/// stored when no newer ticket has been issued since, so only the newest
/// result ever applies.
///
/// The cache also tracks which (user, period) pairs are currently being
/// looked at; the background poller refreshes only those.
pub struct QueryCache {
    entries: Arc<Mutex<HashMap<QueryKey, CacheEntry>>>,
    tickets: Arc<Mutex<HashMap<QueryKey, u64>>>,
    visible: Arc<Mutex<HashMap<(String, i32, u32), DateTime<Utc>>>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            tickets: Arc::new(Mutex::new(HashMap::new())),
            visible: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Take a fetch ticket for this key. Tickets are monotonically increasing
    /// per key; the matching `store` call only wins while no newer ticket
    /// exists.
    pub async fn begin_fetch(&self, key: &QueryKey) -> u64 {
        let mut tickets = self.tickets.lock().await;
        let ticket = tickets.entry(key.clone()).or_insert(0);
        *ticket += 1;
        *ticket
    }

    /// Store a fetched row set. Returns false (and drops the rows) when a
    /// newer fetch has been started for the key since this ticket was taken.
    pub async fn store(&self, key: QueryKey, ticket: u64, rows: CachedRows) -> bool {
        let latest = {
            let tickets = self.tickets.lock().await;
            tickets.get(&key).copied().unwrap_or(0)
        };
        if ticket < latest {
            return false;
        }

        let mut entries = self.entries.lock().await;
        if let Some(existing) = entries.get(&key) {
            if existing.generation > ticket {
                return false;
            }
        }
        entries.insert(
            key,
            CacheEntry {
                rows,
                fetched_at: Utc::now(),
                generation: ticket,
            },
        );
        true
    }

    /// Rows fetched within `ttl`, if any
    pub async fn get_fresh(&self, key: &QueryKey, ttl: Duration) -> Option<CachedRows> {
        let entries = self.entries.lock().await;
        entries.get(key).and_then(|entry| {
            if Utc::now() - entry.fetched_at <= ttl {
                Some(entry.rows.clone())
            } else {
                None
            }
        })
    }

    /// When the rows for this key were last stored
    pub async fn fetched_at(&self, key: &QueryKey) -> Option<DateTime<Utc>> {
        let entries = self.entries.lock().await;
        entries.get(key).map(|entry| entry.fetched_at)
    }

    /// Drop every entry for one (user, period) so the next read refetches
    pub async fn invalidate_period(&self, user_id: &str, period: Period) {
        let mut entries = self.entries.lock().await;
        entries.retain(|key, _| {
            !(key.user_id == user_id
                && key.year == period.year()
                && key.month == period.month())
        });
    }

    /// Record that someone is currently looking at this (user, period)
    pub async fn touch_visible(&self, user_id: &str, period: Period) {
        let mut visible = self.visible.lock().await;
        visible.insert(
            (user_id.to_string(), period.year(), period.month()),
            Utc::now(),
        );
    }

    /// The (user, period) pairs touched within `window`, pruning the rest.
    /// The poller refreshes only these; dashboards nobody is looking at are
    /// left alone.
    pub async fn visible_periods(&self, window: Duration) -> Vec<(String, Period)> {
        let mut visible = self.visible.lock().await;
        let now = Utc::now();
        visible.retain(|_, touched_at| now - *touched_at <= window);

        visible
            .keys()
            .filter_map(|(user_id, year, month)| {
                Period::new(*year, *month)
                    .ok()
                    .map(|period| (user_id.clone(), period))
            })
            .collect()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(kind: QueryKind) -> QueryKey {
        QueryKey::new("u1", Period::new(2026, 8).unwrap(), kind)
    }

    fn summary_rows(total: f64) -> CachedRows {
        CachedRows::Summary(vec![MonthlySummaryRow {
            transaction_type: fintrack_types::TransactionType::Expense,
            total_amount: total,
        }])
    }

    fn stored_total(rows: CachedRows) -> f64 {
        match rows {
            CachedRows::Summary(rows) => rows[0].total_amount,
            _ => panic!("wrong variant"),
        }
    }

    #[tokio::test]
    async fn test_newest_fetch_wins() {
        let cache = QueryCache::new();
        let key = key(QueryKind::MonthlySummary);

        let stale_ticket = cache.begin_fetch(&key).await;
        let fresh_ticket = cache.begin_fetch(&key).await;

        // Fresh result lands first; the stale one must be discarded
        assert!(cache.store(key.clone(), fresh_ticket, summary_rows(2.0)).await);
        assert!(!cache.store(key.clone(), stale_ticket, summary_rows(1.0)).await);

        let rows = cache.get_fresh(&key, Duration::seconds(60)).await.unwrap();
        assert_eq!(stored_total(rows), 2.0);
    }

    #[tokio::test]
    async fn test_zero_ttl_is_always_stale() {
        let cache = QueryCache::new();
        let key = key(QueryKind::Transactions);

        let ticket = cache.begin_fetch(&key).await;
        cache
            .store(key.clone(), ticket, CachedRows::Transactions(Vec::new()))
            .await;

        assert!(cache
            .get_fresh(&key, Duration::seconds(-1))
            .await
            .is_none());
        assert!(cache
            .get_fresh(&key, Duration::seconds(60))
            .await
            .is_some());
    }

    #[tokio::test]
    async fn test_invalidate_period_drops_all_kinds() {
        let cache = QueryCache::new();
        let period = Period::new(2026, 8).unwrap();

        for kind in [QueryKind::MonthlySummary, QueryKind::DailyBalance] {
            let key = QueryKey::new("u1", period, kind);
            let ticket = cache.begin_fetch(&key).await;
            cache.store(key, ticket, summary_rows(1.0)).await;
        }
        // Another user's entry must survive
        let other = QueryKey::new("u2", period, QueryKind::MonthlySummary);
        let ticket = cache.begin_fetch(&other).await;
        cache.store(other.clone(), ticket, summary_rows(9.0)).await;

        cache.invalidate_period("u1", period).await;

        let key = QueryKey::new("u1", period, QueryKind::MonthlySummary);
        assert!(cache.get_fresh(&key, Duration::seconds(60)).await.is_none());
        assert!(cache.get_fresh(&other, Duration::seconds(60)).await.is_some());
    }

    #[tokio::test]
    async fn test_visibility_window_prunes_idle_periods() {
        let cache = QueryCache::new();
        let period = Period::new(2026, 8).unwrap();

        cache.touch_visible("u1", period).await;
        let active = cache.visible_periods(Duration::seconds(60)).await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].0, "u1");

        // A negative window puts every entry outside it
        let active = cache.visible_periods(Duration::seconds(-1)).await;
        assert!(active.is_empty());

        // And the prune is permanent
        let active = cache.visible_periods(Duration::seconds(60)).await;
        assert!(active.is_empty());
    }
}
