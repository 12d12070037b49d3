use rusqlite::Connection;

/// Run all database migrations
///
/// Base tables are written by the external ingestion pipeline; this service
/// owns the schema, the read views and the seed catalogs.
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // Create users table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id VARCHAR PRIMARY KEY,
            email VARCHAR,
            onboarding_step INTEGER NOT NULL DEFAULT 0,
            onboarding_completed BOOLEAN NOT NULL DEFAULT false,
            welcome_seen BOOLEAN NOT NULL DEFAULT false,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Create payment_providers table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS payment_providers (
            id VARCHAR PRIMARY KEY,
            name VARCHAR NOT NULL,
            slug VARCHAR NOT NULL UNIQUE,
            logo VARCHAR NOT NULL,
            created_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Create user_providers link table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS user_providers (
            user_id VARCHAR NOT NULL,
            provider_id VARCHAR NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT true,
            created_at BIGINT NOT NULL,
            PRIMARY KEY (user_id, provider_id),
            FOREIGN KEY (provider_id) REFERENCES payment_providers (id)
        )",
        [],
    )?;

    // Create categories table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS categories (
            id VARCHAR PRIMARY KEY,
            user_id VARCHAR,
            name VARCHAR NOT NULL,
            slug VARCHAR NOT NULL,
            icon VARCHAR NOT NULL,
            color VARCHAR NOT NULL,
            is_income BOOLEAN NOT NULL DEFAULT false,
            is_global BOOLEAN NOT NULL DEFAULT false,
            sort_order INTEGER NOT NULL DEFAULT 0,
            created_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Create transactions table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
            id VARCHAR PRIMARY KEY,
            user_id VARCHAR NOT NULL,
            amount REAL NOT NULL DEFAULT 0,
            currency VARCHAR NOT NULL DEFAULT 'COP',
            type VARCHAR NOT NULL CHECK (type IN ('income', 'expense')),
            merchant VARCHAR,
            description VARCHAR,
            occurred_at VARCHAR NOT NULL,
            is_confirmed BOOLEAN NOT NULL DEFAULT false,
            category_id VARCHAR,
            provider_id VARCHAR,
            reference_number VARCHAR,
            location VARCHAR,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            FOREIGN KEY (category_id) REFERENCES categories (id),
            FOREIGN KEY (provider_id) REFERENCES payment_providers (id)
        )",
        [],
    )?;

    // Indexes for the period-scoped reads
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_user_occurred
            ON transactions(user_id, occurred_at)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_categories_user
            ON categories(user_id, is_global)",
        [],
    )?;

    create_views(conn)?;
    seed_global_categories(conn)?;
    seed_payment_providers(conn)?;

    Ok(())
}

/// The read views the dashboard queries. Kept as SQL views so the query layer
/// stays a thin parameterized read against named resources.
fn create_views(conn: &Connection) -> anyhow::Result<()> {
    conn.execute(
        "CREATE VIEW IF NOT EXISTS v_transactions_full AS
            SELECT
                t.id,
                t.user_id,
                t.amount,
                t.currency,
                t.type,
                t.merchant,
                t.description,
                t.occurred_at,
                t.is_confirmed,
                t.category_id,
                c.name AS category_name,
                c.icon AS category_icon,
                c.color AS category_color,
                t.provider_id,
                p.name AS provider_name,
                t.reference_number,
                t.location
            FROM transactions t
            LEFT JOIN categories c ON c.id = t.category_id
            LEFT JOIN payment_providers p ON p.id = t.provider_id",
        [],
    )?;

    conn.execute(
        "CREATE VIEW IF NOT EXISTS v_monthly_summary AS
            SELECT
                user_id,
                strftime('%Y-%m', occurred_at) AS month,
                type,
                SUM(ABS(COALESCE(amount, 0))) AS total_amount
            FROM transactions
            GROUP BY user_id, month, type",
        [],
    )?;

    conn.execute(
        "CREATE VIEW IF NOT EXISTS v_spending_by_category AS
            SELECT
                t.user_id,
                strftime('%Y-%m', t.occurred_at) AS month,
                c.name AS category_name,
                c.icon AS icon,
                c.color AS color,
                SUM(ABS(COALESCE(t.amount, 0))) AS total
            FROM transactions t
            LEFT JOIN categories c ON c.id = t.category_id
            WHERE t.type = 'expense'
            GROUP BY t.user_id, month, c.name, c.icon, c.color",
        [],
    )?;

    conn.execute(
        "CREATE VIEW IF NOT EXISTS v_daily_balance AS
            SELECT
                user_id,
                date(occurred_at) AS date,
                SUM(CASE WHEN type = 'expense' THEN ABS(COALESCE(amount, 0)) ELSE 0 END) AS total_expense,
                SUM(CASE WHEN type = 'income' THEN ABS(COALESCE(amount, 0)) ELSE 0 END) AS total_income
            FROM transactions
            GROUP BY user_id, date",
        [],
    )?;

    Ok(())
}

/// Global categories drive the AI classifier and are shared by every user
fn seed_global_categories(conn: &Connection) -> anyhow::Result<()> {
    let expense_categories: &[(&str, &str, &str, &str)] = &[
        ("Mercado", "mercado", "🛒", "#22c55e"),
        ("Restaurantes", "restaurantes", "🍔", "#f97316"),
        ("Transporte", "transporte", "🚗", "#3b82f6"),
        ("Entretenimiento", "entretenimiento", "🎬", "#8b5cf6"),
        ("Salud", "salud", "💊", "#ef4444"),
        ("Servicios", "servicios", "💡", "#eab308"),
        ("Compras", "compras", "🛍️", "#ec4899"),
        ("Vivienda", "vivienda", "🏠", "#14b8a6"),
        ("Otros", "otros", "📦", "#6B7280"),
    ];
    let income_categories: &[(&str, &str, &str, &str)] = &[
        ("Salario", "salario", "💰", "#22c55e"),
        ("Otros ingresos", "otros-ingresos", "💵", "#14b8a6"),
    ];

    let now = chrono::Utc::now().timestamp();
    for (sort_order, (name, slug, icon, color)) in expense_categories.iter().enumerate() {
        conn.execute(
            "INSERT OR IGNORE INTO categories
                (id, user_id, name, slug, icon, color, is_income, is_global, sort_order, created_at)
             VALUES (?1, NULL, ?2, ?3, ?4, ?5, false, true, ?6, ?7)",
            rusqlite::params![
                format!("global-{}", slug),
                name,
                slug,
                icon,
                color,
                sort_order as i64,
                now,
            ],
        )?;
    }
    for (sort_order, (name, slug, icon, color)) in income_categories.iter().enumerate() {
        conn.execute(
            "INSERT OR IGNORE INTO categories
                (id, user_id, name, slug, icon, color, is_income, is_global, sort_order, created_at)
             VALUES (?1, NULL, ?2, ?3, ?4, ?5, true, true, ?6, ?7)",
            rusqlite::params![
                format!("global-{}", slug),
                name,
                slug,
                icon,
                color,
                sort_order as i64,
                now,
            ],
        )?;
    }

    Ok(())
}

/// The Colombian banks the email pipeline understands
fn seed_payment_providers(conn: &Connection) -> anyhow::Result<()> {
    let providers: &[(&str, &str, &str)] = &[
        ("Bancolombia", "bancolombia", "🏦"),
        ("Nequi", "nequi", "💜"),
        ("Daviplata", "daviplata", "🔴"),
        ("Nu Colombia", "nu", "💜"),
        ("Lulo Bank", "lulo", "🟡"),
        ("Rappipay", "rappipay", "🧡"),
        ("BBVA", "bbva", "🔵"),
        ("Banco de Bogotá", "bancodebogota", "🏛️"),
    ];

    let now = chrono::Utc::now().timestamp();
    for (name, slug, logo) in providers {
        conn.execute(
            "INSERT OR IGNORE INTO payment_providers (id, name, slug, logo, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![format!("provider-{}", slug), name, slug, logo, now],
        )?;
    }

    Ok(())
}
