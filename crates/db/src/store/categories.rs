//! Expense categories.
//!
//! Expenses embed their category, so renaming or recoloring a category
//! rewrites every expense that carries it.

use pennywise_core::gateway::{ChangeAction, RecordChange};
use pennywise_core::records::{CategoryAssignment, ExpenseCategory};
use pennywise_shared::types::CategoryId;
use tracing::info;

use super::{MemoryStore, Tables};
use crate::error::StoreError;

/// Applies `f` to every expense assigned to `id`. Returns how many matched.
fn reassign(
    tables: &mut Tables,
    id: CategoryId,
    f: impl Fn(&mut CategoryAssignment),
) -> usize {
    let planned = tables.planned.values_mut().map(|e| &mut e.category);
    let variable = tables.variable.values_mut().map(|e| &mut e.category);
    let mut count = 0;
    for category in planned.chain(variable) {
        if category.id() == Some(id) {
            f(category);
            count += 1;
        }
    }
    count
}

impl MemoryStore {
    /// Stores or replaces a category, updating expenses that carry it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn upsert_category(&self, category: ExpenseCategory) -> Result<(), StoreError> {
        let id = category.id;
        let existed = {
            let mut tables = self.write()?;
            let existed = tables.categories.insert(id, category.clone()).is_some();
            if existed {
                reassign(&mut tables, id, |assigned| {
                    *assigned = CategoryAssignment::Categorized(category.clone());
                });
            }
            existed
        };
        self.publish([RecordChange::Category {
            id,
            action: if existed {
                ChangeAction::Updated
            } else {
                ChangeAction::Created
            },
        }]);
        Ok(())
    }

    /// All categories, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn categories(&self) -> Result<Vec<ExpenseCategory>, StoreError> {
        Ok(self.read()?.categories.values().cloned().collect())
    }

    /// Deletes a category. Expenses carrying it become uncategorized.
    ///
    /// Returns the number of expenses that lost their category.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category does not exist.
    pub fn delete_category(&self, id: CategoryId) -> Result<usize, StoreError> {
        let cleared = {
            let mut tables = self.write()?;
            if tables.categories.remove(&id).is_none() {
                return Err(StoreError::not_found("category", id));
            }
            reassign(&mut tables, id, |assigned| {
                *assigned = CategoryAssignment::Uncategorized;
            })
        };
        info!(category_id = %id, uncategorized = cleared, "deleted category");

        self.publish([RecordChange::Category {
            id,
            action: ChangeAction::Deleted,
        }]);
        Ok(cleared)
    }
}
