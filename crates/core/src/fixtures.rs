//! Test fixtures shared by the engine's unit tests.

use chrono::{NaiveDate, NaiveDateTime};
use pennywise_shared::types::{
    BudgetId, CardId, CategoryId, IncomeId, IncomeSourceId, PlannedExpenseId, UnplannedExpenseId,
};
use rust_decimal::Decimal;

use crate::records::{
    Budget, CategoryAssignment, ExpenseCategory, Income, PlannedExpense, UnplannedExpense,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
}

pub fn category(name: &str) -> CategoryAssignment {
    CategoryAssignment::Categorized(ExpenseCategory {
        id: CategoryId::new(),
        name: name.to_string(),
        color: "#34C759".to_string(),
    })
}

/// January 2025 budget with one card and one income source.
pub fn january_budget() -> Budget {
    Budget {
        id: BudgetId::new(),
        name: "January".to_string(),
        start_date: date(2025, 1, 1),
        end_date: date(2025, 1, 31),
        card_ids: vec![CardId::new()],
        income_source_ids: vec![IncomeSourceId::new()],
    }
}

pub fn planned(
    budget: &Budget,
    description: &str,
    category: CategoryAssignment,
    planned_amount: Decimal,
    actual_amount: Decimal,
    transaction_date: NaiveDateTime,
) -> PlannedExpense {
    PlannedExpense {
        id: PlannedExpenseId::new(),
        budget_id: budget.id,
        description: description.to_string(),
        category,
        planned_amount,
        actual_amount,
        transaction_date,
        is_global_preset: false,
    }
}

pub fn variable(
    card_id: CardId,
    description: &str,
    category: CategoryAssignment,
    amount: Decimal,
    transaction_date: NaiveDateTime,
) -> UnplannedExpense {
    UnplannedExpense {
        id: UnplannedExpenseId::new(),
        card_id,
        description: description.to_string(),
        category,
        amount,
        transaction_date,
    }
}

pub fn income(
    source_id: IncomeSourceId,
    potential_amount: Decimal,
    actual_amount: Decimal,
    date: NaiveDateTime,
) -> Income {
    Income {
        id: IncomeId::new(),
        source_id,
        description: "Paycheck".to_string(),
        potential_amount,
        actual_amount,
        date,
    }
}
