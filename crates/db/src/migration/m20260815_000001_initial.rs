//! Initial database migration.
//!
//! Creates the enums, tables, indexes, and seed funds for the treasury
//! schema. Every amount column is NUMERIC; balances and journal lines
//! carry CHECK constraints so the database enforces the same invariants
//! the repositories do.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: REFERENCE TABLES
        // ============================================================
        db.execute_unprepared(CHURCHES_SQL).await?;
        db.execute_unprepared(FUNDS_SQL).await?;

        // ============================================================
        // PART 3: BALANCES & PERIODS
        // ============================================================
        db.execute_unprepared(FUND_BALANCES_SQL).await?;
        db.execute_unprepared(MONTHLY_LEDGERS_SQL).await?;

        // ============================================================
        // PART 4: JOURNAL & EXPENSES
        // ============================================================
        db.execute_unprepared(MONTHLY_REPORTS_SQL).await?;
        db.execute_unprepared(EXPENSE_RECORDS_SQL).await?;
        db.execute_unprepared(FUND_EVENTS_SQL).await?;
        db.execute_unprepared(FUND_EVENT_ITEMS_SQL).await?;
        db.execute_unprepared(ACCOUNTING_ENTRIES_SQL).await?;

        // ============================================================
        // PART 5: AUDIT
        // ============================================================
        db.execute_unprepared(AUDIT_LOG_SQL).await?;

        // ============================================================
        // PART 6: SEED DATA
        // ============================================================
        db.execute_unprepared(SEED_FUNDS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Monthly ledger lifecycle
CREATE TYPE ledger_status AS ENUM ('open', 'closed', 'reconciled');

-- Monthly report workflow
CREATE TYPE report_status AS ENUM ('draft', 'submitted', 'approved', 'rejected');

-- Fund event workflow
CREATE TYPE event_status AS ENUM ('draft', 'submitted', 'approved', 'rejected');

-- Event line item kind
CREATE TYPE event_item_kind AS ENUM ('budget', 'actual');
";

const CHURCHES_SQL: &str = r"
CREATE TABLE churches (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    city VARCHAR(255),
    pastor_name VARCHAR(255),
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_churches_name ON churches(name) WHERE active = true;
";

const FUNDS_SQL: &str = r"
CREATE TABLE funds (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    code VARCHAR(64) NOT NULL UNIQUE,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    is_national BOOLEAN NOT NULL DEFAULT false,
    active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const FUND_BALANCES_SQL: &str = r"
CREATE TABLE fund_balances (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    fund_id UUID NOT NULL REFERENCES funds(id),
    church_id UUID REFERENCES churches(id),
    balance NUMERIC(18, 2) NOT NULL DEFAULT 0,
    version BIGINT NOT NULL DEFAULT 1,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_fund_balances_non_negative CHECK (balance >= 0)
);

-- One balance row per (fund, church); NULL church means the shared
-- national balance, which the partial index keeps unique as well.
CREATE UNIQUE INDEX uq_fund_balances_fund_church
    ON fund_balances(fund_id, church_id) WHERE church_id IS NOT NULL;
CREATE UNIQUE INDEX uq_fund_balances_fund_national
    ON fund_balances(fund_id) WHERE church_id IS NULL;
";

const MONTHLY_LEDGERS_SQL: &str = r"
CREATE TABLE monthly_ledgers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    church_id UUID NOT NULL REFERENCES churches(id),
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    year INTEGER NOT NULL CHECK (year BETWEEN 2000 AND 2100),
    opening_balance NUMERIC(18, 2) NOT NULL DEFAULT 0,
    closing_balance NUMERIC(18, 2) NOT NULL DEFAULT 0,
    total_income NUMERIC(18, 2) NOT NULL DEFAULT 0,
    total_expenses NUMERIC(18, 2) NOT NULL DEFAULT 0,
    status ledger_status NOT NULL DEFAULT 'open',
    notes TEXT,
    closed_by UUID,
    closed_at TIMESTAMPTZ,
    reconciled_by UUID,
    reconciled_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_monthly_ledgers_period UNIQUE (church_id, year, month)
);
";

const MONTHLY_REPORTS_SQL: &str = r"
CREATE TABLE monthly_reports (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    church_id UUID NOT NULL REFERENCES churches(id),
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    year INTEGER NOT NULL CHECK (year BETWEEN 2000 AND 2100),
    tithes NUMERIC(18, 2) NOT NULL DEFAULT 0 CHECK (tithes >= 0),
    offerings NUMERIC(18, 2) NOT NULL DEFAULT 0 CHECK (offerings >= 0),
    other_income NUMERIC(18, 2) NOT NULL DEFAULT 0 CHECK (other_income >= 0),
    designated JSONB NOT NULL DEFAULT '[]',
    operating_expenses JSONB NOT NULL DEFAULT '[]',
    national_fund NUMERIC(18, 2) NOT NULL DEFAULT 0,
    designated_total NUMERIC(18, 2) NOT NULL DEFAULT 0,
    total_income NUMERIC(18, 2) NOT NULL DEFAULT 0,
    total_operating_expenses NUMERIC(18, 2) NOT NULL DEFAULT 0,
    pastoral_honorarium NUMERIC(18, 2) NOT NULL DEFAULT 0,
    deficit NUMERIC(18, 2) NOT NULL DEFAULT 0,
    allocation_version INTEGER NOT NULL DEFAULT 1,
    bank_receipt_number VARCHAR(128),
    bank_deposit_date DATE,
    status report_status NOT NULL DEFAULT 'draft',
    rejection_reason TEXT,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    submitted_by UUID,
    submitted_at TIMESTAMPTZ,
    approved_by UUID,
    approved_at TIMESTAMPTZ,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_monthly_reports_period UNIQUE (church_id, year, month)
);

CREATE INDEX idx_monthly_reports_status ON monthly_reports(status);
";

const EXPENSE_RECORDS_SQL: &str = r"
CREATE TABLE expense_records (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    church_id UUID NOT NULL REFERENCES churches(id),
    fund_id UUID NOT NULL REFERENCES funds(id),
    expense_date DATE NOT NULL,
    amount NUMERIC(18, 2) NOT NULL CHECK (amount > 0),
    category VARCHAR(128) NOT NULL,
    description TEXT NOT NULL,
    provider_name VARCHAR(255),
    invoice_number VARCHAR(128),
    receipt_number VARCHAR(128),
    is_honorarium BOOLEAN NOT NULL DEFAULT false,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_expense_records_church_date ON expense_records(church_id, expense_date);
";

const FUND_EVENTS_SQL: &str = r"
CREATE TABLE fund_events (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    fund_id UUID NOT NULL REFERENCES funds(id),
    church_id UUID REFERENCES churches(id),
    name VARCHAR(255) NOT NULL,
    event_date DATE NOT NULL,
    status event_status NOT NULL DEFAULT 'draft',
    rejection_reason TEXT,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    submitted_by UUID,
    submitted_at TIMESTAMPTZ,
    approved_by UUID,
    approved_at TIMESTAMPTZ,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_fund_events_fund ON fund_events(fund_id);
";

const FUND_EVENT_ITEMS_SQL: &str = r"
CREATE TABLE fund_event_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    event_id UUID NOT NULL REFERENCES fund_events(id) ON DELETE CASCADE,
    kind event_item_kind NOT NULL,
    description TEXT NOT NULL,
    category VARCHAR(128) NOT NULL,
    amount NUMERIC(18, 2) NOT NULL CHECK (amount >= 0),
    receipt_number VARCHAR(128),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_fund_event_items_event ON fund_event_items(event_id, kind);
";

const ACCOUNTING_ENTRIES_SQL: &str = r"
CREATE TABLE accounting_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    -- NULL for lines posted by church-less national fund events.
    church_id UUID REFERENCES churches(id),
    fund_id UUID NOT NULL REFERENCES funds(id),
    entry_date DATE NOT NULL,
    debit NUMERIC(18, 2) NOT NULL DEFAULT 0 CHECK (debit >= 0),
    credit NUMERIC(18, 2) NOT NULL DEFAULT 0 CHECK (credit >= 0),
    description TEXT NOT NULL,
    report_id UUID REFERENCES monthly_reports(id),
    expense_id UUID REFERENCES expense_records(id),
    event_id UUID REFERENCES fund_events(id),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    -- A line is a debit or a credit, never both.
    CONSTRAINT chk_accounting_entries_single_sided CHECK (debit = 0 OR credit = 0)
);

CREATE INDEX idx_accounting_entries_church_date ON accounting_entries(church_id, entry_date);
CREATE INDEX idx_accounting_entries_fund ON accounting_entries(fund_id);
";

const AUDIT_LOG_SQL: &str = r"
CREATE TABLE audit_log (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    actor_id UUID NOT NULL,
    action VARCHAR(64) NOT NULL,
    entity_kind VARCHAR(64) NOT NULL,
    entity_id UUID NOT NULL,
    details JSONB NOT NULL DEFAULT '{}',
    recorded_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_audit_log_entity ON audit_log(entity_kind, entity_id);
";

const SEED_FUNDS_SQL: &str = r"
INSERT INTO funds (code, name, description, is_national) VALUES
    ('general', 'Fondo general', 'Caja local de cada iglesia', false),
    ('nacional', 'Fondo nacional', 'Porcentaje de diezmos y ofrendas remitido a la tesorería nacional', true),
    ('misiones', 'Misiones', 'Ofrendas designadas para misiones', true),
    ('caballeros', 'Caballeros', 'Ofrendas designadas del ministerio de caballeros', true),
    ('damas', 'Damas', 'Ofrendas designadas del ministerio de damas', true),
    ('jovenes', 'Jóvenes', 'Ofrendas designadas del ministerio de jóvenes', true),
    ('ninos', 'Niños', 'Ofrendas designadas del ministerio de niños', true);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS audit_log CASCADE;
DROP TABLE IF EXISTS accounting_entries CASCADE;
DROP TABLE IF EXISTS fund_event_items CASCADE;
DROP TABLE IF EXISTS fund_events CASCADE;
DROP TABLE IF EXISTS expense_records CASCADE;
DROP TABLE IF EXISTS monthly_reports CASCADE;
DROP TABLE IF EXISTS monthly_ledgers CASCADE;
DROP TABLE IF EXISTS fund_balances CASCADE;
DROP TABLE IF EXISTS funds CASCADE;
DROP TABLE IF EXISTS churches CASCADE;

DROP TYPE IF EXISTS event_item_kind;
DROP TYPE IF EXISTS event_status;
DROP TYPE IF EXISTS report_status;
DROP TYPE IF EXISTS ledger_status;
";
