use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::Database;
use uuid::Uuid;

use engine::{Engine, EngineError, EntryKind, EntryNew, EntryUpdate, LedgerFilter};
use migration::MigratorTrait;

async fn engine_with_db() -> Engine {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    Engine::builder().database(db).build().await.unwrap()
}

async fn entry(
    engine: &Engine,
    title: &str,
    kind: EntryKind,
    amount_minor: i64,
    date: (i32, u32, u32, u32),
) -> engine::LedgerEntry {
    let (year, month, day, hour) = date;
    engine
        .add_entry(EntryNew {
            title: title.to_string(),
            kind,
            amount_minor,
            date: Some(Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()),
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn balance_is_income_minus_expense() {
    let engine = engine_with_db().await;

    entry(&engine, "Salary", EntryKind::Income, 5000_00, (2024, 1, 5, 9)).await;
    entry(&engine, "Food", EntryKind::Expense, 2000_00, (2024, 1, 8, 12)).await;
    entry(&engine, "Side gig", EntryKind::Income, 750_50, (2024, 2, 1, 18)).await;

    let summary = engine.summarize(LedgerFilter::default()).await.unwrap();
    assert_eq!(summary.total_income_minor, 5750_50);
    assert_eq!(summary.total_expense_minor, 2000_00);
    assert_eq!(
        summary.balance_minor,
        summary.total_income_minor - summary.total_expense_minor
    );
    assert_eq!(summary.entries.len(), 3);
}

#[tokio::test]
async fn summary_entries_are_date_descending() {
    let engine = engine_with_db().await;

    entry(&engine, "Old", EntryKind::Income, 1_00, (2024, 1, 1, 0)).await;
    entry(&engine, "New", EntryKind::Income, 2_00, (2024, 3, 1, 0)).await;
    entry(&engine, "Middle", EntryKind::Income, 3_00, (2024, 2, 1, 0)).await;

    let summary = engine.summarize(LedgerFilter::default()).await.unwrap();
    let titles: Vec<&str> = summary
        .entries
        .iter()
        .map(|entry| entry.title.as_str())
        .collect();
    assert_eq!(titles, ["New", "Middle", "Old"]);
}

#[tokio::test]
async fn summary_filters_by_kind() {
    let engine = engine_with_db().await;

    entry(&engine, "Salary", EntryKind::Income, 5000_00, (2024, 1, 5, 9)).await;
    entry(&engine, "Food", EntryKind::Expense, 2000_00, (2024, 1, 8, 12)).await;

    let incomes = engine
        .summarize(LedgerFilter {
            kind: Some(EntryKind::Income),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(incomes.entries.len(), 1);
    assert_eq!(incomes.total_expense_minor, 0);
    assert_eq!(incomes.balance_minor, 5000_00);
}

#[tokio::test]
async fn summary_date_range_is_end_of_day_inclusive() {
    let engine = engine_with_db().await;

    entry(&engine, "Before", EntryKind::Income, 1_00, (2024, 3, 9, 23)).await;
    entry(&engine, "On end day", EntryKind::Income, 2_00, (2024, 3, 15, 18)).await;
    entry(&engine, "After", EntryKind::Income, 4_00, (2024, 3, 16, 0)).await;

    let summary = engine
        .summarize(LedgerFilter {
            kind: None,
            start: Some(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()),
            end: Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()),
        })
        .await
        .unwrap();

    assert_eq!(summary.entries.len(), 1);
    assert_eq!(summary.entries[0].title, "On end day");
    assert_eq!(summary.total_income_minor, 2_00);
}

#[tokio::test]
async fn entry_update_and_delete() {
    let engine = engine_with_db().await;

    let created = entry(&engine, "Sale", EntryKind::Income, 100_00, (2024, 5, 1, 10)).await;

    let updated = engine
        .update_entry(
            created.id,
            EntryUpdate {
                title: Some("Big Sale".to_string()),
                amount_minor: Some(150_00),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Big Sale");
    assert_eq!(updated.amount, 150_00);
    assert_eq!(updated.kind, EntryKind::Income);

    let err = engine
        .update_entry(
            created.id,
            EntryUpdate {
                amount_minor: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    engine.delete_entry(created.id).await.unwrap();
    let err = engine.delete_entry(created.id).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let err = engine
        .update_entry(Uuid::new_v4(), EntryUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn entry_rejects_bad_input() {
    let engine = engine_with_db().await;

    let err = engine
        .add_entry(EntryNew {
            title: "  ".to_string(),
            kind: EntryKind::Income,
            amount_minor: 10_00,
            date: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));

    let err = engine
        .add_entry(EntryNew {
            title: "Sale".to_string(),
            kind: EntryKind::Income,
            amount_minor: -1,
            date: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn dashboard_growth_is_100_percent_without_prior_year() {
    let engine = engine_with_db().await;

    entry(&engine, "Salary", EntryKind::Income, 5000_00, (2024, 1, 5, 9)).await;
    entry(&engine, "Food", EntryKind::Expense, 2000_00, (2024, 1, 8, 12)).await;

    let dashboard = engine.dashboard(2024).await.unwrap();
    assert_eq!(dashboard.year, 2024);
    assert_eq!(dashboard.totals.income_minor, 5000_00);
    assert_eq!(dashboard.totals.expense_minor, 2000_00);
    assert_eq!(dashboard.growth_rate.income, 100.0);
    assert_eq!(dashboard.growth_rate.expense, 100.0);
}

#[tokio::test]
async fn dashboard_growth_relative_to_prior_year() {
    let engine = engine_with_db().await;

    entry(&engine, "Salary 2023", EntryKind::Income, 1000_00, (2023, 6, 1, 9)).await;
    entry(&engine, "Rent 2023", EntryKind::Expense, 400_00, (2023, 6, 2, 9)).await;
    entry(&engine, "Salary 2024", EntryKind::Income, 1500_00, (2024, 6, 1, 9)).await;
    entry(&engine, "Rent 2024", EntryKind::Expense, 200_00, (2024, 6, 2, 9)).await;

    let dashboard = engine.dashboard(2024).await.unwrap();
    assert_eq!(dashboard.prior_totals.income_minor, 1000_00);
    assert_eq!(dashboard.prior_totals.expense_minor, 400_00);
    assert_eq!(dashboard.growth_rate.income, 50.0);
    assert_eq!(dashboard.growth_rate.expense, -50.0);
}

#[tokio::test]
async fn dashboard_monthly_graph_is_month_ascending_and_sparse() {
    let engine = engine_with_db().await;

    entry(&engine, "Nov sale", EntryKind::Income, 30_00, (2024, 11, 3, 9)).await;
    entry(&engine, "Feb sale", EntryKind::Income, 10_00, (2024, 2, 3, 9)).await;
    entry(&engine, "Feb rent", EntryKind::Expense, 4_00, (2024, 2, 28, 9)).await;
    entry(&engine, "Last year", EntryKind::Income, 99_00, (2023, 7, 1, 9)).await;

    let dashboard = engine.dashboard(2024).await.unwrap();
    let months: Vec<u32> = dashboard
        .monthly_graph
        .iter()
        .map(|point| point.month)
        .collect();
    assert_eq!(months, [2, 11]);

    assert_eq!(dashboard.monthly_graph[0].income_minor, 10_00);
    assert_eq!(dashboard.monthly_graph[0].expense_minor, 4_00);
    assert_eq!(dashboard.monthly_graph[1].income_minor, 30_00);
    assert_eq!(dashboard.monthly_graph[1].expense_minor, 0);
}
