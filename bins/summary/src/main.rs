//! Pennywise summary printer
//!
//! Seeds an in-memory store with a sample monthly budget, opens its view and
//! prints the resulting summary and visible rows as JSON.
//!
//! Usage: pennywise-summary [YYYY-MM-DD]

use std::sync::Arc;

use anyhow::Context;
use chrono::{Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pennywise_core::calendar::{Calendar, DateRange, PeriodKind};
use pennywise_core::gateway::ChangeFeed;
use pennywise_core::records::{
    Budget, Card, CategoryAssignment, ExpenseCategory, Income, IncomeSource, PlannedExpense,
    UnplannedExpense,
};
use pennywise_core::view::{RefreshOutcome, ViewRegistry};
use pennywise_db::MemoryStore;
use pennywise_shared::AppConfig;
use pennywise_shared::types::{
    BudgetId, CardId, CategoryId, IncomeId, IncomeSourceId, PlannedExpenseId, UnplannedExpenseId,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let reference = match std::env::args().nth(1) {
        Some(arg) => NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
            .with_context(|| format!("invalid reference date: {arg}"))?,
        None => Local::now().date_naive(),
    };
    let period = Calendar::new(config.calendar.week_start)
        .period_containing(reference, PeriodKind::Monthly);

    let store = Arc::new(MemoryStore::new());
    let budget_id = seed(&store, period)?;
    info!(budget_id = %budget_id, period = %period.label(), "seeded sample budget");

    let registry = Arc::new(ViewRegistry::new(
        store.clone(),
        Arc::new(config.view.clone()),
    ));
    let _deletions = registry.watch_deletions(store.subscribe());

    let controller = registry.open(budget_id).await?;
    if controller.load().await != RefreshOutcome::Applied {
        let message = controller.snapshot().last_error.unwrap_or_default();
        anyhow::bail!("failed to load budget view: {message}");
    }

    let snapshot = controller.snapshot();
    let output = serde_json::json!({
        "phase": snapshot.phase,
        "segment": snapshot.segment,
        "sort": snapshot.sort,
        "summary": snapshot.summary.as_deref(),
        "rows": snapshot.rows.as_slice(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Noon on the `offset`-th day of `period`, clamped to its last day.
fn day(period: DateRange, offset: u64) -> NaiveDateTime {
    period
        .start
        .checked_add_days(Days::new(offset))
        .filter(|date| *date <= period.end)
        .unwrap_or(period.end)
        .and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN))
}

fn seed(store: &MemoryStore, period: DateRange) -> anyhow::Result<BudgetId> {
    let card = Card {
        id: CardId::new(),
        name: "Everyday Visa".to_string(),
    };
    let employer = IncomeSource {
        id: IncomeSourceId::new(),
        name: "Employer".to_string(),
    };
    store.upsert_card(card.clone())?;
    store.upsert_income_source(employer.clone())?;

    let category = |name: &str, color: &str| -> anyhow::Result<CategoryAssignment> {
        let category = ExpenseCategory {
            id: CategoryId::new(),
            name: name.to_string(),
            color: color.to_string(),
        };
        store.upsert_category(category.clone())?;
        Ok(CategoryAssignment::Categorized(category))
    };
    let rent = category("Rent", "#FF3B30")?;
    let groceries = category("Groceries", "#34C759")?;
    let transport = category("Transport", "#007AFF")?;

    let budget = Budget {
        id: BudgetId::new(),
        name: period.label(),
        start_date: period.start,
        end_date: period.end,
        card_ids: vec![card.id],
        income_source_ids: vec![employer.id],
    };
    store.insert_budget(budget.clone())?;

    for (description, category, planned, actual, offset) in [
        ("Rent", rent, 120_000, 120_000, 0),
        ("Weekly groceries", groceries, 40_000, 36_250, 4),
    ] {
        store.upsert_planned_expense(PlannedExpense {
            id: PlannedExpenseId::new(),
            budget_id: budget.id,
            description: description.to_string(),
            category,
            planned_amount: Decimal::new(planned, 2),
            actual_amount: Decimal::new(actual, 2),
            transaction_date: day(period, offset),
            is_global_preset: false,
        })?;
    }

    for (description, category, amount, offset) in [
        ("Coffee", CategoryAssignment::Uncategorized, 450, 2),
        ("Train pass", transport, 8_900, 6),
    ] {
        store.upsert_variable_expense(UnplannedExpense {
            id: UnplannedExpenseId::new(),
            card_id: card.id,
            description: description.to_string(),
            category,
            amount: Decimal::new(amount, 2),
            transaction_date: day(period, offset),
        })?;
    }

    store.upsert_income(Income {
        id: IncomeId::new(),
        source_id: employer.id,
        description: "Salary".to_string(),
        potential_amount: Decimal::new(320_000, 2),
        actual_amount: Decimal::new(310_000, 2),
        date: day(period, 14),
    })?;

    Ok(budget.id)
}
