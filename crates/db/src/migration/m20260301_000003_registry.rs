//! Registry migration: conversions, extra expenditures and donors.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(REGISTRY_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS donor_contributions CASCADE;
             DROP TABLE IF EXISTS donors CASCADE;
             DROP TABLE IF EXISTS extra_expenditures CASCADE;
             DROP TABLE IF EXISTS conversion_history CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const REGISTRY_SQL: &str = r"
CREATE TABLE conversion_history (
    id UUID PRIMARY KEY,
    amount NUMERIC NOT NULL CHECK (amount > 0),
    date TIMESTAMPTZ NOT NULL,
    currency VARCHAR(3) NOT NULL CHECK (currency IN ('PKR', 'USD')),
    kind VARCHAR(16) NOT NULL CHECK (kind IN ('Convert', 'Receive')),
    depositor VARCHAR(255) NOT NULL,
    convert_date DATE,
    convert_rate NUMERIC CHECK (convert_rate > 0),
    convert_currency VARCHAR(3) CHECK (convert_currency IN ('PKR', 'USD')),
    reason TEXT NOT NULL,
    CONSTRAINT chk_convert_details CHECK (
        kind = 'Receive'
        OR (convert_date IS NOT NULL AND convert_rate IS NOT NULL AND convert_currency IS NOT NULL)
    )
);

CREATE INDEX idx_conversion_history_date ON conversion_history(date);

CREATE TABLE extra_expenditures (
    id UUID PRIMARY KEY,
    reason TEXT NOT NULL,
    amount NUMERIC NOT NULL CHECK (amount > 0),
    created_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX idx_extra_expenditures_created ON extra_expenditures(created_at DESC);

CREATE TABLE donors (
    id UUID PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    country VARCHAR(128) NOT NULL,
    city VARCHAR(128) NOT NULL,
    contact_number VARCHAR(64) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX idx_donors_created ON donors(created_at DESC);

CREATE TABLE donor_contributions (
    seq BIGSERIAL PRIMARY KEY,
    donor_id UUID NOT NULL REFERENCES donors(id) ON DELETE CASCADE,
    date DATE NOT NULL,
    amount NUMERIC NOT NULL CHECK (amount >= 1),
    kind VARCHAR(16) NOT NULL CHECK (kind IN ('Zakat', 'Sadqah', 'Fitra', 'Kherat'))
);
";
