//! Ledger migration.
//!
//! Creates the single-row account, the append-only transaction log and the
//! expense detail lines.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(LEDGER_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS expense_details CASCADE;
             DROP TABLE IF EXISTS transaction_logs CASCADE;
             DROP TABLE IF EXISTS accounts CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const LEDGER_SQL: &str = r"
-- The charity's one account. Totals may go negative.
CREATE TABLE accounts (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    total_amount_pkr NUMERIC NOT NULL DEFAULT 0,
    total_amount_usd NUMERIC NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

INSERT INTO accounts (id) VALUES (1) ON CONFLICT (id) DO NOTHING;

-- Append-only transaction log, ordered by seq
CREATE TABLE transaction_logs (
    seq BIGSERIAL PRIMARY KEY,
    id UUID NOT NULL UNIQUE,
    amount_before_pkr NUMERIC NOT NULL,
    amount_before_usd NUMERIC NOT NULL,
    amount_after_pkr NUMERIC NOT NULL,
    amount_after_usd NUMERIC NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL,
    amount NUMERIC NOT NULL,
    currency VARCHAR(3) NOT NULL CHECK (currency IN ('PKR', 'USD')),
    title VARCHAR(255) NOT NULL,
    details TEXT NOT NULL DEFAULT ''
);

CREATE INDEX idx_transaction_logs_timestamp ON transaction_logs(timestamp DESC);

CREATE OR REPLACE FUNCTION prevent_transaction_log_changes()
RETURNS TRIGGER AS $$
BEGIN
    RAISE EXCEPTION 'transaction_logs is append-only';
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_transaction_logs_append_only
    BEFORE UPDATE OR DELETE ON transaction_logs
    FOR EACH ROW EXECUTE FUNCTION prevent_transaction_log_changes();

-- Expense detail lines; a month's total is the sum of its lines
CREATE TABLE expense_details (
    seq BIGSERIAL PRIMARY KEY,
    year INTEGER NOT NULL,
    month SMALLINT NOT NULL CHECK (month BETWEEN 1 AND 12),
    amount NUMERIC NOT NULL,
    details TEXT NOT NULL DEFAULT '',
    date TIMESTAMPTZ NOT NULL
);

CREATE INDEX idx_expense_details_period ON expense_details(year, month);
";
