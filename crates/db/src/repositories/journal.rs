//! Journal repository for balanced entry batches and expense records.
//!
//! Every write that touches a fund balance funnels through
//! [`apply_fund_deltas`], which pairs the core non-negative rule with an
//! optimistic version check on the balance row. Report approval and event
//! actuals reuse the same helpers so there is exactly one code path that
//! mutates balances.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use tesoreria_core::audit::{AuditAction, AuditEvent};
use tesoreria_core::auth::Actor;
use tesoreria_core::ledger::{
    apply_delta, resolve_deltas, validate_batch, validate_expense_entry, EntryInput,
    EntryReference, FundDelta, LedgerError,
};
use tesoreria_shared::error::AppError;
use tesoreria_shared::types::{ChurchId, ExpenseId, FundId, UserId};

use crate::entities::{accounting_entries, churches, expense_records, fund_balances, funds};

use super::insert_audit;

/// Error types for journal operations.
#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    /// Church not found.
    #[error("Church not found: {0}")]
    ChurchNotFound(Uuid),

    /// Fund not found.
    #[error("Fund not found: {0}")]
    FundNotFound(Uuid),

    /// A church-scoped fund was posted against without a church.
    #[error("Fund {0} is church-scoped and requires a church")]
    ChurchScopeRequired(Uuid),

    /// A journal invariant was violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Concurrent modification detected.
    #[error("Concurrent modification detected for fund {0}, please retry")]
    ConcurrentModification(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::ChurchNotFound(_) | JournalError::FundNotFound(_) => {
                Self::NotFound(err.to_string())
            }
            JournalError::ChurchScopeRequired(_) => Self::Validation(err.to_string()),
            JournalError::Ledger(e) => e.into(),
            JournalError::ConcurrentModification(_) => Self::Conflict(err.to_string()),
            JournalError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Input for recording an expense with its journal line.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// The fund the expense draws from.
    pub fund_id: FundId,
    /// Date of the expense.
    pub date: chrono::NaiveDate,
    /// Amount spent; must be positive.
    pub amount: Decimal,
    /// Expense category.
    pub category: String,
    /// What the money was spent on.
    pub description: String,
    /// Supplier or payee.
    pub provider_name: Option<String>,
    /// Supplier invoice number.
    pub invoice_number: Option<String>,
    /// Receipt reference.
    pub receipt_number: Option<String>,
    /// Marks the pastoral honorarium payment.
    pub is_honorarium: bool,
}

/// A recorded journal batch with its balance deltas.
#[derive(Debug, Clone)]
pub struct CreatedBatch {
    /// The inserted journal lines.
    pub entries: Vec<accounting_entries::Model>,
    /// Net balance change per fund.
    pub deltas: Vec<FundDelta>,
}

/// A recorded expense with its journal line.
#[derive(Debug, Clone)]
pub struct RecordedExpense {
    /// The expense record.
    pub expense: expense_records::Model,
    /// The single debit line it produced.
    pub entry: accounting_entries::Model,
}

/// Journal repository for append-only entry batches.
#[derive(Debug, Clone)]
pub struct JournalRepository {
    db: DatabaseConnection,
}

impl JournalRepository {
    /// Creates a new journal repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a balanced journal batch atomically.
    ///
    /// Validates the batch, inserts every line, applies the net deltas to
    /// the affected fund balances, and writes the audit row, all in one
    /// database transaction. `correction` permits negative resulting
    /// balances for explicit correction batches.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch violates a journal invariant, the
    /// church or a fund does not exist, a balance would go negative, or a
    /// concurrent writer touched a balance row first.
    pub async fn create_entries(
        &self,
        actor: &Actor,
        church_id: ChurchId,
        entries: Vec<EntryInput>,
        correction: bool,
    ) -> Result<CreatedBatch, JournalError> {
        validate_batch(&entries)?;
        let deltas = resolve_deltas(&entries);

        let txn = self.db.begin().await?;

        ensure_church(&txn, church_id).await?;
        apply_fund_deltas(&txn, Some(church_id), &deltas, correction).await?;
        let rows = insert_entries(&txn, Some(church_id), actor.user_id, &entries).await?;

        let audit = AuditEvent::new(
            actor.user_id,
            AuditAction::CreateEntries,
            "accounting_entry",
            rows.first().map_or_else(Uuid::nil, |r| r.id),
            serde_json::json!({
                "church_id": church_id,
                "lines": rows.len(),
                "correction": correction,
            }),
        );
        insert_audit(&txn, &audit).await?;

        txn.commit().await?;

        tracing::info!(
            church = %church_id,
            lines = rows.len(),
            correction,
            "journal batch recorded"
        );

        Ok(CreatedBatch {
            entries: rows,
            deltas,
        })
    }

    /// Records an expense and its debit-only journal line atomically.
    ///
    /// The generated line is exempt from the batch balance check but still
    /// flows through the balance choke point, so an expense exceeding the
    /// fund's balance is rejected and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive amount, a missing church or
    /// fund, or an overdraw of the fund balance.
    pub async fn create_expense(
        &self,
        actor: &Actor,
        church_id: ChurchId,
        input: CreateExpenseInput,
    ) -> Result<RecordedExpense, JournalError> {
        let expense_id = ExpenseId::new();
        let entry_input = EntryInput {
            fund_id: input.fund_id,
            date: input.date,
            debit: input.amount,
            credit: Decimal::ZERO,
            description: input.description.clone(),
            reference: Some(EntryReference::Expense(expense_id)),
        };
        validate_expense_entry(&entry_input)?;

        let txn = self.db.begin().await?;

        ensure_church(&txn, church_id).await?;
        let deltas = resolve_deltas(std::slice::from_ref(&entry_input));
        apply_fund_deltas(&txn, Some(church_id), &deltas, false).await?;

        let now = now_tz();
        let expense = expense_records::ActiveModel {
            id: Set(expense_id.into_inner()),
            church_id: Set(church_id.into_inner()),
            fund_id: Set(input.fund_id.into_inner()),
            expense_date: Set(input.date),
            amount: Set(input.amount),
            category: Set(input.category),
            description: Set(input.description),
            provider_name: Set(input.provider_name),
            invoice_number: Set(input.invoice_number),
            receipt_number: Set(input.receipt_number),
            is_honorarium: Set(input.is_honorarium),
            created_by: Set(actor.user_id.into_inner()),
            created_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let mut rows =
            insert_entries(&txn, Some(church_id), actor.user_id, &[entry_input]).await?;
        let entry = rows.remove(0);

        let audit = AuditEvent::new(
            actor.user_id,
            AuditAction::CreateExpense,
            "expense_record",
            expense.id,
            serde_json::json!({
                "church_id": church_id,
                "fund_id": expense.fund_id,
                "amount": expense.amount,
                "category": expense.category,
            }),
        );
        insert_audit(&txn, &audit).await?;

        txn.commit().await?;

        tracing::info!(
            church = %church_id,
            expense = %expense.id,
            amount = %expense.amount,
            "expense recorded"
        );

        Ok(RecordedExpense { expense, entry })
    }
}

/// Verifies the church exists inside the caller's transaction.
pub(crate) async fn ensure_church(
    txn: &DatabaseTransaction,
    church_id: ChurchId,
) -> Result<churches::Model, JournalError> {
    churches::Entity::find_by_id(church_id.into_inner())
        .one(txn)
        .await?
        .ok_or(JournalError::ChurchNotFound(church_id.into_inner()))
}

/// Applies per-fund balance deltas with optimistic locking.
///
/// National funds resolve to the shared balance row (NULL church); local
/// funds resolve to the (fund, church) row. A missing row is created on
/// first use. A version mismatch on update means another writer won the
/// race, and the whole enclosing transaction must be aborted.
pub(crate) async fn apply_fund_deltas(
    txn: &DatabaseTransaction,
    church_id: Option<ChurchId>,
    deltas: &[FundDelta],
    correction: bool,
) -> Result<(), JournalError> {
    for delta in deltas {
        let fund = funds::Entity::find_by_id(delta.fund_id.into_inner())
            .one(txn)
            .await?
            .ok_or(JournalError::FundNotFound(delta.fund_id.into_inner()))?;
        apply_one_delta(txn, &fund, church_id, delta.delta, correction).await?;
    }
    Ok(())
}

async fn apply_one_delta(
    txn: &DatabaseTransaction,
    fund: &funds::Model,
    church_id: Option<ChurchId>,
    delta: Decimal,
    correction: bool,
) -> Result<(), JournalError> {
    let scope = if fund.is_national {
        None
    } else {
        Some(
            church_id
                .ok_or(JournalError::ChurchScopeRequired(fund.id))?
                .into_inner(),
        )
    };

    let mut query =
        fund_balances::Entity::find().filter(fund_balances::Column::FundId.eq(fund.id));
    query = match scope {
        Some(church) => query.filter(fund_balances::Column::ChurchId.eq(church)),
        None => query.filter(fund_balances::Column::ChurchId.is_null()),
    };

    let now = now_tz();
    match query.one(txn).await? {
        Some(row) => {
            let next = apply_delta(row.balance, delta, correction)?;
            let updated = fund_balances::Entity::update_many()
                .col_expr(fund_balances::Column::Balance, Expr::value(next))
                .col_expr(fund_balances::Column::Version, Expr::value(row.version + 1))
                .col_expr(fund_balances::Column::UpdatedAt, Expr::value(now))
                .filter(fund_balances::Column::Id.eq(row.id))
                .filter(fund_balances::Column::Version.eq(row.version))
                .exec(txn)
                .await?;
            if updated.rows_affected == 0 {
                return Err(JournalError::ConcurrentModification(fund.id));
            }
        }
        None => {
            let balance = apply_delta(Decimal::ZERO, delta, correction)?;
            let row = fund_balances::ActiveModel {
                id: Set(Uuid::now_v7()),
                fund_id: Set(fund.id),
                church_id: Set(scope),
                balance: Set(balance),
                version: Set(1),
                created_at: Set(now),
                updated_at: Set(now),
            };
            row.insert(txn).await?;
        }
    }
    Ok(())
}

/// Inserts journal lines inside the caller's transaction.
pub(crate) async fn insert_entries(
    txn: &DatabaseTransaction,
    church_id: Option<ChurchId>,
    created_by: UserId,
    entries: &[EntryInput],
) -> Result<Vec<accounting_entries::Model>, DbErr> {
    let now = now_tz();
    let mut rows = Vec::with_capacity(entries.len());
    for input in entries {
        let (report_id, expense_id, event_id) = reference_columns(input.reference);
        let row = accounting_entries::ActiveModel {
            id: Set(Uuid::now_v7()),
            church_id: Set(church_id.map(ChurchId::into_inner)),
            fund_id: Set(input.fund_id.into_inner()),
            entry_date: Set(input.date),
            debit: Set(input.debit),
            credit: Set(input.credit),
            description: Set(input.description.clone()),
            report_id: Set(report_id),
            expense_id: Set(expense_id),
            event_id: Set(event_id),
            created_by: Set(created_by.into_inner()),
            created_at: Set(now),
        };
        rows.push(row.insert(txn).await?);
    }
    Ok(rows)
}

/// Splits an entry reference into the journal's three optional FK columns.
#[must_use]
pub(crate) fn reference_columns(
    reference: Option<EntryReference>,
) -> (Option<Uuid>, Option<Uuid>, Option<Uuid>) {
    match reference {
        Some(EntryReference::Report(id)) => (Some(id.into_inner()), None, None),
        Some(EntryReference::Expense(id)) => (None, Some(id.into_inner()), None),
        Some(EntryReference::Event(id)) => (None, None, Some(id.into_inner())),
        None => (None, None, None),
    }
}

fn now_tz() -> sea_orm::prelude::DateTimeWithTimeZone {
    Utc::now().into()
}
