//! Read-side queries over the journal and expense records.
//!
//! Listings and summaries never mutate; they aggregate what the posting
//! paths wrote.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use tesoreria_shared::error::AppError;
use tesoreria_shared::types::ChurchId;

use crate::entities::{accounting_entries, churches, expense_records, monthly_ledgers};

use super::month_bounds;

/// Error types for summary queries.
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    /// Church not found.
    #[error("Church not found: {0}")]
    ChurchNotFound(Uuid),

    /// Month out of the 1..=12 range.
    #[error("Invalid period: {month}/{year}")]
    InvalidPeriod {
        /// Requested month.
        month: u32,
        /// Requested year.
        year: i32,
    },

    /// A month filter is meaningless without a year.
    #[error("A month filter requires a year")]
    MonthRequiresYear(u32),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SummaryError> for AppError {
    fn from(err: SummaryError) -> Self {
        match err {
            SummaryError::ChurchNotFound(_) => Self::NotFound(err.to_string()),
            SummaryError::InvalidPeriod { .. } | SummaryError::MonthRequiresYear(_) => {
                Self::Validation(err.to_string())
            }
            SummaryError::Database(e) => Self::Database(e.to_string()),
        }
    }
}

/// Filters for the read-side queries. Every field is optional; an empty
/// filter spans all churches and all dates.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodFilter {
    /// Limit to one church.
    pub church_id: Option<ChurchId>,
    /// Limit to one calendar year.
    pub year: Option<i32>,
    /// Limit to one month (1-12). Requires `year`.
    pub month: Option<u32>,
}

/// Debit and credit totals over a set of journal entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialBalance {
    /// Sum of all debits.
    pub total_debits: Decimal,
    /// Sum of all credits.
    pub total_credits: Decimal,
}

impl TrialBalance {
    /// `total_credits - total_debits`.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.total_credits - self.total_debits
    }
}

/// Journal entries matching a filter, with their totals.
#[derive(Debug, Clone)]
pub struct EntryListing {
    /// Entries ordered by date, then insertion order.
    pub entries: Vec<accounting_entries::Model>,
    /// Totals over the listed entries.
    pub trial_balance: TrialBalance,
}

/// Total spend for one expense category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    /// The category.
    pub category: String,
    /// Sum of the category's expense amounts.
    pub total: Decimal,
}

/// Expense records matching a filter, grouped by category.
#[derive(Debug, Clone)]
pub struct ExpenseListing {
    /// Expenses ordered by date.
    pub expenses: Vec<expense_records::Model>,
    /// Per-category totals, ordered by category.
    pub category_totals: Vec<CategoryTotal>,
}

/// The accounting picture of a filtered window.
#[derive(Debug, Clone)]
pub struct AccountingSummary {
    /// The period's ledger, when one has been opened.
    pub ledger: Option<monthly_ledgers::Model>,
    /// Credit total over the period's entries.
    pub total_income: Decimal,
    /// Debit total over the period's entries.
    pub total_expenses: Decimal,
    /// Totals over the period's entries.
    pub trial_balance: TrialBalance,
}

/// Read-side repository over the journal.
#[derive(Debug, Clone)]
pub struct SummaryRepository {
    db: DatabaseConnection,
}

impl SummaryRepository {
    /// Creates a new summary repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists journal entries matching the filter, with their totals.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown church or an invalid period filter.
    pub async fn list_entries(&self, filter: PeriodFilter) -> Result<EntryListing, SummaryError> {
        if let Some(church_id) = filter.church_id {
            self.ensure_church(church_id).await?;
        }

        let mut query = accounting_entries::Entity::find();
        if let Some(church_id) = filter.church_id {
            query = query.filter(accounting_entries::Column::ChurchId.eq(church_id.into_inner()));
        }
        if let Some((start, end)) = period_bounds(filter.year, filter.month)? {
            query = query
                .filter(accounting_entries::Column::EntryDate.gte(start))
                .filter(accounting_entries::Column::EntryDate.lt(end));
        }

        let entries = query
            .order_by_asc(accounting_entries::Column::EntryDate)
            .order_by_asc(accounting_entries::Column::Id)
            .all(&self.db)
            .await?;

        let totals = trial_balance(&entries);
        Ok(EntryListing {
            entries,
            trial_balance: totals,
        })
    }

    /// Lists expense records matching the filter, with category totals.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown church or an invalid period filter.
    pub async fn list_expenses(
        &self,
        filter: PeriodFilter,
    ) -> Result<ExpenseListing, SummaryError> {
        if let Some(church_id) = filter.church_id {
            self.ensure_church(church_id).await?;
        }

        let mut query = expense_records::Entity::find();
        if let Some(church_id) = filter.church_id {
            query = query.filter(expense_records::Column::ChurchId.eq(church_id.into_inner()));
        }
        if let Some((start, end)) = period_bounds(filter.year, filter.month)? {
            query = query
                .filter(expense_records::Column::ExpenseDate.gte(start))
                .filter(expense_records::Column::ExpenseDate.lt(end));
        }

        let expenses = query
            .order_by_asc(expense_records::Column::ExpenseDate)
            .order_by_asc(expense_records::Column::Id)
            .all(&self.db)
            .await?;

        let category_totals = category_totals(&expenses);
        Ok(ExpenseListing {
            expenses,
            category_totals,
        })
    }

    /// Summarizes the filtered window: ledger state plus entry totals.
    ///
    /// The ledger row is attached only when the filter pins down exactly
    /// one (church, month, year) period; wider windows summarize entries
    /// without one.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown church or an invalid period filter.
    pub async fn get_accounting_summary(
        &self,
        filter: PeriodFilter,
    ) -> Result<AccountingSummary, SummaryError> {
        let listing = self.list_entries(filter).await?;

        let ledger = match (filter.church_id, filter.year, filter.month) {
            (Some(church_id), Some(year), Some(month)) => {
                monthly_ledgers::Entity::find()
                    .filter(monthly_ledgers::Column::ChurchId.eq(church_id.into_inner()))
                    .filter(monthly_ledgers::Column::Month.eq(super::month_column(month)))
                    .filter(monthly_ledgers::Column::Year.eq(year))
                    .one(&self.db)
                    .await?
            }
            _ => None,
        };

        Ok(AccountingSummary {
            ledger,
            total_income: listing.trial_balance.total_credits,
            total_expenses: listing.trial_balance.total_debits,
            trial_balance: listing.trial_balance,
        })
    }

    async fn ensure_church(&self, church_id: ChurchId) -> Result<(), SummaryError> {
        churches::Entity::find_by_id(church_id.into_inner())
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(SummaryError::ChurchNotFound(church_id.into_inner()))
    }
}

/// Half-open date window for an optional (year, month) filter.
///
/// A year alone spans the whole calendar year; a month narrows it to one
/// period. A month without a year is rejected, and no filter at all
/// yields `None`.
pub fn period_bounds(
    year: Option<i32>,
    month: Option<u32>,
) -> Result<Option<(NaiveDate, NaiveDate)>, SummaryError> {
    match (year, month) {
        (Some(year), Some(month)) => month_bounds(year, month)
            .map(Some)
            .ok_or(SummaryError::InvalidPeriod { month, year }),
        (Some(year), None) => {
            let bounds = NaiveDate::from_ymd_opt(year, 1, 1)
                .zip(NaiveDate::from_ymd_opt(year + 1, 1, 1))
                .ok_or(SummaryError::InvalidPeriod { month: 1, year })?;
            Ok(Some(bounds))
        }
        (None, Some(month)) => Err(SummaryError::MonthRequiresYear(month)),
        (None, None) => Ok(None),
    }
}

/// Sums debits and credits over a slice of journal entries.
#[must_use]
pub fn trial_balance(entries: &[accounting_entries::Model]) -> TrialBalance {
    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;
    for entry in entries {
        total_debits += entry.debit;
        total_credits += entry.credit;
    }
    TrialBalance {
        total_debits,
        total_credits,
    }
}

/// Groups expense amounts by category, ordered by category name.
#[must_use]
pub fn category_totals(expenses: &[expense_records::Model]) -> Vec<CategoryTotal> {
    let mut totals: std::collections::BTreeMap<&str, Decimal> = std::collections::BTreeMap::new();
    for expense in expenses {
        *totals
            .entry(expense.category.as_str())
            .or_insert(Decimal::ZERO) += expense.amount;
    }
    totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect()
}
