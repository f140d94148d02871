//! Beneficiaries migration.
//!
//! Creates beneficiaries with their terms, amount terms, payment history and
//! extra financial assistance.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(BENEFICIARIES_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS extra_financial_assistance CASCADE;
             DROP TABLE IF EXISTS payment_history CASCADE;
             DROP TABLE IF EXISTS amount_terms CASCADE;
             DROP TABLE IF EXISTS terms CASCADE;
             DROP TABLE IF EXISTS beneficiaries CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const BENEFICIARIES_SQL: &str = r"
CREATE TABLE beneficiaries (
    id UUID PRIMARY KEY,
    cnic VARCHAR(32) UNIQUE,
    name VARCHAR(255) NOT NULL,
    gender VARCHAR(16) NOT NULL,
    contact_number VARCHAR(64) NOT NULL DEFAULT '',
    city VARCHAR(128) NOT NULL,
    area VARCHAR(128) NOT NULL,
    profession VARCHAR(128) NOT NULL DEFAULT '',
    sons INTEGER NOT NULL DEFAULT 0 CHECK (sons >= 0),
    daughters INTEGER NOT NULL DEFAULT 0 CHECK (daughters >= 0),
    adopted INTEGER NOT NULL DEFAULT 0 CHECK (adopted >= 0),
    mode_of_payment VARCHAR(16) NOT NULL,
    bank VARCHAR(128) NOT NULL DEFAULT '',
    account_number VARCHAR(64) NOT NULL DEFAULT '',
    is_alive BOOLEAN NOT NULL DEFAULT TRUE,
    death_date DATE,
    current_term INTEGER NOT NULL DEFAULT 0 CHECK (current_term >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_beneficiaries_created ON beneficiaries(created_at);

-- Terms are numbered from 1 per beneficiary
CREATE TABLE terms (
    beneficiary_id UUID NOT NULL REFERENCES beneficiaries(id) ON DELETE CASCADE,
    term_number INTEGER NOT NULL CHECK (term_number >= 1),
    status VARCHAR(32) NOT NULL,
    term_type VARCHAR(16) NOT NULL CHECK (term_type IN ('Monthly', 'Yearly')),
    closure_reason TEXT NOT NULL DEFAULT '',
    start_date TIMESTAMPTZ NOT NULL,
    end_date TIMESTAMPTZ,
    is_closed BOOLEAN NOT NULL DEFAULT FALSE,
    PRIMARY KEY (beneficiary_id, term_number)
);

-- At most one open term per beneficiary
CREATE UNIQUE INDEX uq_terms_one_open ON terms(beneficiary_id) WHERE NOT is_closed;

CREATE TABLE amount_terms (
    seq BIGSERIAL PRIMARY KEY,
    beneficiary_id UUID NOT NULL,
    term_number INTEGER NOT NULL,
    reason VARCHAR(255) NOT NULL,
    amount_change NUMERIC NOT NULL CHECK (amount_change <> 0),
    date TIMESTAMPTZ NOT NULL,
    FOREIGN KEY (beneficiary_id, term_number)
        REFERENCES terms(beneficiary_id, term_number) ON DELETE CASCADE
);

CREATE INDEX idx_amount_terms_term ON amount_terms(beneficiary_id, term_number);

-- One payment per term and billing period ('2024-08' or '2024')
CREATE TABLE payment_history (
    seq BIGSERIAL PRIMARY KEY,
    beneficiary_id UUID NOT NULL,
    term_number INTEGER NOT NULL,
    period_key VARCHAR(7) NOT NULL,
    amount NUMERIC NOT NULL CHECK (amount > 0),
    date TIMESTAMPTZ NOT NULL,
    FOREIGN KEY (beneficiary_id, term_number)
        REFERENCES terms(beneficiary_id, term_number) ON DELETE CASCADE,
    CONSTRAINT uq_payment_history_period UNIQUE (beneficiary_id, term_number, period_key)
);

CREATE TABLE extra_financial_assistance (
    seq BIGSERIAL PRIMARY KEY,
    beneficiary_id UUID NOT NULL REFERENCES beneficiaries(id) ON DELETE CASCADE,
    reason VARCHAR(255) NOT NULL,
    amount NUMERIC NOT NULL CHECK (amount > 0),
    date TIMESTAMPTZ NOT NULL,
    proof JSONB NOT NULL DEFAULT '[]'::jsonb
);

CREATE INDEX idx_extra_fa_beneficiary ON extra_financial_assistance(beneficiary_id);
";
