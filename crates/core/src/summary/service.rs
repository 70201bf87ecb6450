//! Aggregation engine.

use std::collections::HashMap;

use pennywise_shared::types::{CategoryId, Segment};
use rust_decimal::Decimal;

use super::types::{BudgetSummary, CategoryBreakdown, PeriodRecords};
use crate::calendar::DateWindow;
use crate::records::{Budget, CategoryAssignment};

/// Stateless service computing budget summaries.
pub struct SummaryService;

impl SummaryService {
    /// Computes the summary of `records` for `budget` within `window`.
    ///
    /// Records outside the window, or not owned by the budget (planned) or its
    /// cards (variable) or its income sources (income), are excluded from every
    /// total. Empty inputs produce zero totals and empty breakdowns.
    #[must_use]
    pub fn summarize(
        budget: &Budget,
        window: DateWindow,
        records: &PeriodRecords,
        segment: Segment,
    ) -> BudgetSummary {
        let PeriodRecords {
            planned,
            variable,
            incomes,
        } = records.scoped_to(budget, window);

        let dropped = records.len() - planned.len() - variable.len() - incomes.len();
        if dropped > 0 {
            tracing::warn!(
                budget_id = %budget.id,
                dropped,
                "excluded records outside the budget window or ownership"
            );
        }

        let potential_income: Decimal = incomes.iter().map(|i| i.potential_amount).sum();
        let actual_income: Decimal = incomes.iter().map(|i| i.actual_amount).sum();
        let planned_expense_planned_total: Decimal =
            planned.iter().map(|e| e.planned_amount).sum();
        let planned_expense_actual_total: Decimal = planned.iter().map(|e| e.actual_amount).sum();
        let variable_expense_total: Decimal = variable.iter().map(|e| e.amount).sum();

        BudgetSummary {
            budget_id: budget.id,
            budget_name: budget.name.clone(),
            period_label: window.label(),
            segment,
            potential_income,
            actual_income,
            planned_expense_planned_total,
            planned_expense_actual_total,
            variable_expense_total,
            potential_savings: potential_income - planned_expense_planned_total,
            actual_savings: actual_income
                - (planned_expense_actual_total + variable_expense_total),
            planned_breakdown: Self::breakdown(
                planned.iter().map(|e| (&e.category, e.actual_amount)),
            ),
            variable_breakdown: Self::breakdown(variable.iter().map(|e| (&e.category, e.amount))),
        }
    }

    /// Groups amounts by category, largest total first.
    ///
    /// Ties are ordered by name and then by category ID so the output does not
    /// depend on input order.
    #[must_use]
    pub fn breakdown<'a, I>(entries: I) -> Vec<CategoryBreakdown>
    where
        I: IntoIterator<Item = (&'a CategoryAssignment, Decimal)>,
    {
        let mut groups: HashMap<Option<CategoryId>, CategoryBreakdown> = HashMap::new();

        for (category, amount) in entries {
            groups
                .entry(category.id())
                .or_insert_with(|| CategoryBreakdown {
                    category_id: category.id(),
                    name: category.name().to_string(),
                    color: category.color().to_string(),
                    amount: Decimal::ZERO,
                })
                .amount += amount;
        }

        let mut breakdown: Vec<_> = groups.into_values().collect();
        breakdown.sort_by(|a, b| {
            b.amount
                .cmp(&a.amount)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.category_id.cmp(&b.category_id))
        });
        breakdown
    }
}
