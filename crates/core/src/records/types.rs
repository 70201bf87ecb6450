//! Budget, expense and income record types.

use chrono::{NaiveDate, NaiveDateTime};
use pennywise_shared::types::{
    BudgetId, CardId, CategoryId, IncomeId, IncomeSourceId, PlannedExpenseId, UnplannedExpenseId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::{DateRange, DateWindow};

/// Display name of the bucket for expenses without a category.
pub const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// Display color of the bucket for expenses without a category.
pub const UNCATEGORIZED_COLOR: &str = "#8E8E93";

/// A named, date-bounded financial planning container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Budget name.
    pub name: String,
    /// First day of the budget (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the budget (inclusive).
    pub end_date: NaiveDate,
    /// Cards whose variable expenses count toward this budget.
    pub card_ids: Vec<CardId>,
    /// Income sources whose incomes count toward this budget.
    pub income_source_ids: Vec<IncomeSourceId>,
}

impl Budget {
    /// The budget's own calendar range.
    #[must_use]
    pub fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// The budget's own whole-day window.
    #[must_use]
    pub fn window(&self) -> DateWindow {
        DateWindow::from_dates(self.start_date, self.end_date)
    }
}

/// A payment instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Card ID.
    pub id: CardId,
    /// Card name.
    pub name: String,
}

/// Where income comes from (employer, side job...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeSource {
    /// Source ID.
    pub id: IncomeSourceId,
    /// Source name.
    pub name: String,
}

/// An income record with expected and received amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Income {
    /// Income ID.
    pub id: IncomeId,
    /// Owning income source.
    pub source_id: IncomeSourceId,
    /// Optional description.
    pub description: String,
    /// Amount expected when the budget was designed.
    pub potential_amount: Decimal,
    /// Amount actually received.
    pub actual_amount: Decimal,
    /// When the income is (or was) received.
    pub date: NaiveDateTime,
}

/// An expense category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpenseCategory {
    /// Category ID.
    pub id: CategoryId,
    /// Category name.
    pub name: String,
    /// Display color (hex, e.g. "#34C759").
    pub color: String,
}

/// Category reference carried by an expense.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "category", rename_all = "snake_case")]
pub enum CategoryAssignment {
    /// Expense belongs to a category.
    Categorized(ExpenseCategory),
    /// Expense has no category.
    #[default]
    Uncategorized,
}

impl CategoryAssignment {
    /// The category ID, if any.
    #[must_use]
    pub fn id(&self) -> Option<CategoryId> {
        match self {
            Self::Categorized(category) => Some(category.id),
            Self::Uncategorized => None,
        }
    }

    /// Name shown for this assignment.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Categorized(category) => &category.name,
            Self::Uncategorized => UNCATEGORIZED_NAME,
        }
    }

    /// Color shown for this assignment.
    #[must_use]
    pub fn color(&self) -> &str {
        match self {
            Self::Categorized(category) => &category.color,
            Self::Uncategorized => UNCATEGORIZED_COLOR,
        }
    }
}

impl From<ExpenseCategory> for CategoryAssignment {
    fn from(category: ExpenseCategory) -> Self {
        Self::Categorized(category)
    }
}

impl From<Option<ExpenseCategory>> for CategoryAssignment {
    fn from(category: Option<ExpenseCategory>) -> Self {
        category.map_or(Self::Uncategorized, Self::Categorized)
    }
}

/// An expense tracked against a budget with planned and actual amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedExpense {
    /// Expense ID.
    pub id: PlannedExpenseId,
    /// Owning budget.
    pub budget_id: BudgetId,
    /// Description.
    pub description: String,
    /// Category.
    pub category: CategoryAssignment,
    /// Amount planned when the budget was designed.
    pub planned_amount: Decimal,
    /// Amount actually spent.
    pub actual_amount: Decimal,
    /// Transaction timestamp.
    pub transaction_date: NaiveDateTime,
    /// Whether this is a reusable template usable across budgets.
    pub is_global_preset: bool,
}

impl PlannedExpense {
    /// Copies this expense into another budget as a concrete, not-yet-spent entry.
    ///
    /// The copy gets a fresh ID, the given date and a zero actual amount; it is
    /// never itself a preset.
    #[must_use]
    pub fn instantiate_for(&self, budget_id: BudgetId, transaction_date: NaiveDateTime) -> Self {
        Self {
            id: PlannedExpenseId::new(),
            budget_id,
            description: self.description.clone(),
            category: self.category.clone(),
            planned_amount: self.planned_amount,
            actual_amount: Decimal::ZERO,
            transaction_date,
            is_global_preset: false,
        }
    }
}

/// An ad-hoc expense charged to a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnplannedExpense {
    /// Expense ID.
    pub id: UnplannedExpenseId,
    /// Card the expense was charged to.
    pub card_id: CardId,
    /// Description.
    pub description: String,
    /// Category.
    pub category: CategoryAssignment,
    /// Amount spent.
    pub amount: Decimal,
    /// Transaction timestamp.
    pub transaction_date: NaiveDateTime,
}

/// A visible row in the expense list, whichever segment it comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "segment", rename_all = "snake_case")]
pub enum ExpenseRow {
    /// Row from the planned segment.
    Planned(PlannedExpense),
    /// Row from the variable segment.
    Variable(UnplannedExpense),
}

impl ExpenseRow {
    /// Row description.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Planned(expense) => &expense.description,
            Self::Variable(expense) => &expense.description,
        }
    }

    /// Amount the row is sorted and shown by.
    ///
    /// Planned rows use their planned amount; variable rows their only amount.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        match self {
            Self::Planned(expense) => expense.planned_amount,
            Self::Variable(expense) => expense.amount,
        }
    }

    /// Transaction timestamp.
    #[must_use]
    pub fn transaction_date(&self) -> NaiveDateTime {
        match self {
            Self::Planned(expense) => expense.transaction_date,
            Self::Variable(expense) => expense.transaction_date,
        }
    }

    /// Category assignment.
    #[must_use]
    pub fn category(&self) -> &CategoryAssignment {
        match self {
            Self::Planned(expense) => &expense.category,
            Self::Variable(expense) => &expense.category,
        }
    }
}
