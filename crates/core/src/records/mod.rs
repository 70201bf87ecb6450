//! Records the engine reads: budgets, cards, incomes and expenses.

pub mod types;

pub use types::{
    Budget, Card, CategoryAssignment, ExpenseCategory, ExpenseRow, Income, IncomeSource,
    PlannedExpense, UNCATEGORIZED_COLOR, UNCATEGORIZED_NAME, UnplannedExpense,
};
