//! Summary data types.

use pennywise_shared::types::{BudgetId, CategoryId, Segment};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calendar::DateWindow;
use crate::records::{Budget, Income, PlannedExpense, UnplannedExpense};

/// Records fetched for one budget window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodRecords {
    /// Planned expenses owned by the budget.
    pub planned: Vec<PlannedExpense>,
    /// Variable expenses charged to the budget's cards.
    pub variable: Vec<UnplannedExpense>,
    /// Incomes from the budget's income sources.
    pub incomes: Vec<Income>,
}

impl PeriodRecords {
    /// Keeps the records owned by `budget` and dated inside `window`.
    ///
    /// Planned expenses must belong to the budget, variable expenses to one of
    /// its cards and incomes to one of its income sources.
    #[must_use]
    pub fn scoped_to(&self, budget: &Budget, window: DateWindow) -> Self {
        Self {
            planned: self
                .planned
                .iter()
                .filter(|e| e.budget_id == budget.id && window.contains(e.transaction_date))
                .cloned()
                .collect(),
            variable: self
                .variable
                .iter()
                .filter(|e| {
                    budget.card_ids.contains(&e.card_id) && window.contains(e.transaction_date)
                })
                .cloned()
                .collect(),
            incomes: self
                .incomes
                .iter()
                .filter(|i| {
                    budget.income_source_ids.contains(&i.source_id) && window.contains(i.date)
                })
                .cloned()
                .collect(),
        }
    }

    /// Number of records across all three lists.
    #[must_use]
    pub fn len(&self) -> usize {
        self.planned.len() + self.variable.len() + self.incomes.len()
    }

    /// Whether every list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Amount spent in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    /// Category ID, `None` for the uncategorized bucket.
    pub category_id: Option<CategoryId>,
    /// Category name.
    pub name: String,
    /// Display color.
    pub color: String,
    /// Total amount.
    pub amount: Decimal,
}

/// Derived financial figures for a budget window.
///
/// Recomputed from scratch on every refresh; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetSummary {
    /// Budget ID.
    pub budget_id: BudgetId,
    /// Budget name.
    pub budget_name: String,
    /// Active window label, e.g. "Jan 1, 2025 - Jan 31, 2025".
    pub period_label: String,
    /// Segment selected when the summary was computed.
    pub segment: Segment,
    /// Sum of expected income.
    pub potential_income: Decimal,
    /// Sum of received income.
    pub actual_income: Decimal,
    /// Sum of planned expenses' planned amounts.
    pub planned_expense_planned_total: Decimal,
    /// Sum of planned expenses' actual amounts.
    pub planned_expense_actual_total: Decimal,
    /// Sum of variable expenses.
    pub variable_expense_total: Decimal,
    /// Potential income minus planned amounts (variable expenses excluded).
    pub potential_savings: Decimal,
    /// Actual income minus all actual spending. May be negative.
    pub actual_savings: Decimal,
    /// Planned expense actual amounts per category, largest first.
    pub planned_breakdown: Vec<CategoryBreakdown>,
    /// Variable expense amounts per category, largest first.
    pub variable_breakdown: Vec<CategoryBreakdown>,
}

impl BudgetSummary {
    /// Breakdown for the selected segment.
    #[must_use]
    pub fn selected_breakdown(&self) -> &[CategoryBreakdown] {
        match self.segment {
            Segment::Planned => &self.planned_breakdown,
            Segment::Variable => &self.variable_breakdown,
        }
    }

    /// Spending total for the selected segment.
    #[must_use]
    pub fn selected_total(&self) -> Decimal {
        match self.segment {
            Segment::Planned => self.planned_expense_actual_total,
            Segment::Variable => self.variable_expense_total,
        }
    }
}
