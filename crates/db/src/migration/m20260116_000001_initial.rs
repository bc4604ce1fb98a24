//! Initial database migration.
//!
//! Creates all enums, tables, and indexes.

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
        // PART 2: CLIENTS & PROJECTS
        // ============================================================
        db.execute_unprepared(CLIENTS_SQL).await?;
        db.execute_unprepared(PROJECTS_SQL).await?;
        db.execute_unprepared(PROJECT_TASKS_SQL).await?;

        // ============================================================
        // PART 3: CASH FLOW
        // ============================================================
        db.execute_unprepared(TRANSACTIONS_SQL).await?;
        db.execute_unprepared(RECURRENCE_EXCEPTIONS_SQL).await?;

        // ============================================================
        // PART 4: INVOICES & LOANS
        // ============================================================
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(LOANS_SQL).await?;

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
-- Transaction direction
CREATE TYPE transaction_kind AS ENUM ('income', 'expense');

-- Transaction settlement status (overdue is derived, never stored)
CREATE TYPE transaction_status AS ENUM ('paid', 'pending');

-- Recurrence cadence / loan cadence
CREATE TYPE frequency AS ENUM (
    'monthly',
    'bimonthly',
    'quarterly',
    'semiannual',
    'annual'
);

-- Project status
CREATE TYPE project_status AS ENUM ('active', 'paused', 'done');

-- Project board lane
CREATE TYPE task_stage AS ENUM ('todo', 'doing', 'done');

-- Invoice status
CREATE TYPE invoice_status AS ENUM ('draft', 'sent', 'paid', 'cancelled');
";

const CLIENTS_SQL: &str = r"
CREATE TABLE clients (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    company TEXT,
    email TEXT,
    phone TEXT,
    notes TEXT,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_clients_active ON clients (is_active);
";

const PROJECTS_SQL: &str = r"
CREATE TABLE projects (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    client_id UUID REFERENCES clients (id) ON DELETE SET NULL,
    status project_status NOT NULL DEFAULT 'active',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_projects_client ON projects (client_id);
";

const PROJECT_TASKS_SQL: &str = r"
CREATE TABLE project_tasks (
    id UUID PRIMARY KEY,
    project_id UUID NOT NULL REFERENCES projects (id) ON DELETE CASCADE,
    title TEXT NOT NULL,
    stage task_stage NOT NULL DEFAULT 'todo',
    position INTEGER NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_project_tasks_board ON project_tasks (project_id, stage, position);
";

const TRANSACTIONS_SQL: &str = r"
CREATE TABLE transactions (
    id UUID PRIMARY KEY,
    description TEXT NOT NULL,
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    kind transaction_kind NOT NULL,
    date DATE NOT NULL,
    status transaction_status NOT NULL DEFAULT 'pending',
    category TEXT NOT NULL DEFAULT '',
    project_id UUID REFERENCES projects (id) ON DELETE SET NULL,
    client_id UUID REFERENCES clients (id) ON DELETE SET NULL,
    -- Non-null frequency marks the row as a recurrence template
    frequency frequency,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX idx_transactions_date ON transactions (date);
CREATE INDEX idx_transactions_templates ON transactions (frequency) WHERE frequency IS NOT NULL;
";

const RECURRENCE_EXCEPTIONS_SQL: &str = r"
CREATE TABLE recurrence_exceptions (
    id UUID PRIMARY KEY,
    template_id UUID NOT NULL REFERENCES transactions (id) ON DELETE CASCADE,
    date DATE NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    -- One suppression per template occurrence
    CONSTRAINT uq_recurrence_exceptions_template_date UNIQUE (template_id, date)
);
";

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY,
    number TEXT NOT NULL UNIQUE,
    client_id UUID NOT NULL REFERENCES clients (id),
    amount NUMERIC(19, 4) NOT NULL CHECK (amount > 0),
    issue_date DATE NOT NULL,
    due_date DATE NOT NULL,
    status invoice_status NOT NULL DEFAULT 'draft',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    CONSTRAINT chk_invoices_due CHECK (due_date >= issue_date)
);

CREATE INDEX idx_invoices_client ON invoices (client_id);
CREATE INDEX idx_invoices_status ON invoices (status);
";

const LOANS_SQL: &str = r"
CREATE TABLE loans (
    id UUID PRIMARY KEY,
    description TEXT NOT NULL,
    principal NUMERIC(19, 4) NOT NULL CHECK (principal > 0),
    installment_amount NUMERIC(19, 4) NOT NULL CHECK (installment_amount > 0),
    installments INTEGER NOT NULL CHECK (installments >= 1),
    first_due DATE NOT NULL,
    frequency frequency NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS loans;
DROP TABLE IF EXISTS invoices;
DROP TABLE IF EXISTS recurrence_exceptions;
DROP TABLE IF EXISTS transactions;
DROP TABLE IF EXISTS project_tasks;
DROP TABLE IF EXISTS projects;
DROP TABLE IF EXISTS clients;

DROP TYPE IF EXISTS invoice_status;
DROP TYPE IF EXISTS task_stage;
DROP TYPE IF EXISTS project_status;
DROP TYPE IF EXISTS frequency;
DROP TYPE IF EXISTS transaction_status;
DROP TYPE IF EXISTS transaction_kind;
";
