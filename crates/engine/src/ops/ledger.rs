use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{EngineError, EntryKind, LedgerEntry, ResultEngine, entries};

use super::{Engine, normalize_required_text, validate_positive_amount, with_tx};

/// Input for [`Engine::add_entry`]; `date` defaults to now.
#[derive(Clone, Debug)]
pub struct EntryNew {
    pub title: String,
    pub kind: EntryKind,
    pub amount_minor: i64,
    pub date: Option<DateTime<Utc>>,
}

/// Partial update for [`Engine::update_entry`].
#[derive(Clone, Debug, Default)]
pub struct EntryUpdate {
    pub title: Option<String>,
    pub kind: Option<EntryKind>,
    pub amount_minor: Option<i64>,
    pub date: Option<DateTime<Utc>>,
}

/// Filter for [`Engine::summarize`]. The date range is inclusive, with
/// the end bound extended to the end of that day.
#[derive(Clone, Copy, Debug, Default)]
pub struct LedgerFilter {
    pub kind: Option<EntryKind>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Balance report over a filtered entry set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerSummary {
    /// `total_income - total_expense` over the filtered entries.
    pub balance_minor: i64,
    pub total_income_minor: i64,
    pub total_expense_minor: i64,
    /// Filtered entries, date-descending.
    pub entries: Vec<LedgerEntry>,
}

/// Income/expense totals for one calendar year.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KindTotals {
    pub income_minor: i64,
    pub expense_minor: i64,
}

/// Year-over-year growth per kind, in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrowthRate {
    pub income: f64,
    pub expense: f64,
}

/// One month of activity in the dashboard graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonthlyPoint {
    /// Calendar month, 1-12.
    pub month: u32,
    pub income_minor: i64,
    pub expense_minor: i64,
}

/// Year-over-year dashboard rollup.
#[derive(Clone, Debug, PartialEq)]
pub struct Dashboard {
    pub year: i32,
    pub totals: KindTotals,
    pub prior_totals: KindTotals,
    pub growth_rate: GrowthRate,
    /// Month-ascending rows covering only months with recorded
    /// activity in `year`; months without entries are omitted.
    pub monthly_graph: Vec<MonthlyPoint>,
}

/// Growth of `current` over `prior` in percent.
///
/// A prior-year total of zero reports exactly 100% growth. This is a
/// fixed dashboard convention, not a division-by-zero escape; clients
/// depend on it.
fn growth_percent(current_minor: i64, prior_minor: i64) -> f64 {
    if prior_minor == 0 {
        return 100.0;
    }
    (current_minor - prior_minor) as f64 / prior_minor as f64 * 100.0
}

fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Exclusive upper bound covering the whole of `date`.
fn day_end_exclusive(date: NaiveDate) -> ResultEngine<DateTime<Utc>> {
    let next = date
        .checked_add_days(Days::new(1))
        .ok_or_else(|| EngineError::InvalidInput("date out of range".to_string()))?;
    Ok(day_start(next))
}

impl Engine {
    /// Records a new income or expense entry.
    pub async fn add_entry(&self, input: EntryNew) -> ResultEngine<LedgerEntry> {
        let title = normalize_required_text(&input.title, "title")?;
        validate_positive_amount(input.amount_minor, "amount")?;
        let date = input.date.unwrap_or_else(Utc::now);

        with_tx!(self, |db_tx| {
            let entry = LedgerEntry::new(title, input.kind, input.amount_minor, date);
            let model: entries::ActiveModel = (&entry).into();
            model.insert(&db_tx).await?;
            Ok(entry)
        })
    }

    /// Applies a partial update to an existing entry.
    pub async fn update_entry(
        &self,
        entry_id: Uuid,
        update: EntryUpdate,
    ) -> ResultEngine<LedgerEntry> {
        with_tx!(self, |db_tx| {
            let current = entries::Entity::find_by_id(entry_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("entry not exists".to_string()))?;

            let mut changed = false;
            let mut active = entries::ActiveModel {
                id: ActiveValue::Set(entry_id.to_string()),
                ..Default::default()
            };
            if let Some(title) = update.title {
                active.title = ActiveValue::Set(normalize_required_text(&title, "title")?);
                changed = true;
            }
            if let Some(kind) = update.kind {
                active.kind = ActiveValue::Set(kind.as_str().to_string());
                changed = true;
            }
            if let Some(amount_minor) = update.amount_minor {
                validate_positive_amount(amount_minor, "amount")?;
                active.amount = ActiveValue::Set(amount_minor);
                changed = true;
            }
            if let Some(date) = update.date {
                active.date = ActiveValue::Set(date);
                changed = true;
            }

            if !changed {
                return LedgerEntry::try_from(current);
            }

            let model = active.update(&db_tx).await?;
            LedgerEntry::try_from(model)
        })
    }

    /// Removes an entry.
    pub async fn delete_entry(&self, entry_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let deleted = entries::Entity::delete_by_id(entry_id.to_string())
                .exec(&db_tx)
                .await?;
            if deleted.rows_affected == 0 {
                return Err(EngineError::KeyNotFound("entry not exists".to_string()));
            }
            Ok(())
        })
    }

    /// Sums the filtered entries into a balance report.
    pub async fn summarize(&self, filter: LedgerFilter) -> ResultEngine<LedgerSummary> {
        let mut query = entries::Entity::find();
        if let Some(kind) = filter.kind {
            query = query.filter(entries::Column::Kind.eq(kind.as_str()));
        }
        if let Some(start) = filter.start {
            query = query.filter(entries::Column::Date.gte(day_start(start)));
        }
        if let Some(end) = filter.end {
            query = query.filter(entries::Column::Date.lt(day_end_exclusive(end)?));
        }

        let models = query
            .order_by_desc(entries::Column::Date)
            .all(&self.database)
            .await?;
        let entries = models
            .into_iter()
            .map(LedgerEntry::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let (total_income_minor, total_expense_minor) =
            entries.iter().fold((0i64, 0i64), |acc, entry| {
                match entry.kind {
                    EntryKind::Income => (acc.0 + entry.amount, acc.1),
                    EntryKind::Expense => (acc.0, acc.1 + entry.amount),
                }
            });

        Ok(LedgerSummary {
            balance_minor: total_income_minor - total_expense_minor,
            total_income_minor,
            total_expense_minor,
            entries,
        })
    }

    /// Builds the year-over-year dashboard for `year`.
    pub async fn dashboard(&self, year: i32) -> ResultEngine<Dashboard> {
        let invalid_year = || EngineError::InvalidInput(format!("invalid year: {year}"));
        let window_start = NaiveDate::from_ymd_opt(year - 1, 1, 1).ok_or_else(invalid_year)?;
        let window_end = NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or_else(invalid_year)?;

        let models = entries::Entity::find()
            .filter(entries::Column::Date.gte(day_start(window_start)))
            .filter(entries::Column::Date.lt(day_start(window_end)))
            .order_by_asc(entries::Column::Date)
            .all(&self.database)
            .await?;

        let mut totals = KindTotals::default();
        let mut prior_totals = KindTotals::default();
        let mut months: BTreeMap<u32, (i64, i64)> = BTreeMap::new();

        for model in models {
            let entry = LedgerEntry::try_from(model)?;
            let in_year = entry.date.year() == year;
            let bucket = if in_year {
                &mut totals
            } else {
                &mut prior_totals
            };
            match entry.kind {
                EntryKind::Income => bucket.income_minor += entry.amount,
                EntryKind::Expense => bucket.expense_minor += entry.amount,
            }

            if in_year {
                let month = months.entry(entry.date.month()).or_default();
                match entry.kind {
                    EntryKind::Income => month.0 += entry.amount,
                    EntryKind::Expense => month.1 += entry.amount,
                }
            }
        }

        let monthly_graph = months
            .into_iter()
            .map(|(month, (income_minor, expense_minor))| MonthlyPoint {
                month,
                income_minor,
                expense_minor,
            })
            .collect();

        Ok(Dashboard {
            year,
            growth_rate: GrowthRate {
                income: growth_percent(totals.income_minor, prior_totals.income_minor),
                expense: growth_percent(totals.expense_minor, prior_totals.expense_minor),
            },
            totals,
            prior_totals,
            monthly_graph,
        })
    }
}
