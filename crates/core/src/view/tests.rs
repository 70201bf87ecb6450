//! Tests for the view state machine, controller and registry.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pennywise_shared::config::ViewConfig;
use pennywise_shared::types::{BudgetId, CardId, Segment, SortMode};
use rust_decimal_macros::dec;
use tokio::sync::{Notify, broadcast, oneshot};
use tokio::time::timeout;

use super::controller::BudgetViewController;
use super::registry::ViewRegistry;
use super::state::{FetchedPeriod, RefreshOutcome, ViewIntent, ViewPhase, ViewState};
use crate::calendar::DateWindow;
use crate::fixtures::{at, category, date, income, january_budget, planned, variable};
use crate::gateway::{
    CardScope, ChangeAction, FetchError, MockRecordGateway, RecordChange, RecordGateway,
};
use crate::records::{Budget, Income, PlannedExpense, UnplannedExpense};
use crate::summary::PeriodRecords;

const WAIT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct StubData {
    budget: Option<Budget>,
    planned: Vec<PlannedExpense>,
    variable: Vec<UnplannedExpense>,
    incomes: Vec<Income>,
}

/// In-process gateway whose data tests can edit between fetches.
#[derive(Default)]
struct StubGateway {
    data: Mutex<StubData>,
    fail: AtomicBool,
    budget_reads: AtomicUsize,
    gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    entered: Notify,
}

impl StubGateway {
    fn with_budget(budget: &Budget) -> Arc<Self> {
        let stub = Self::default();
        stub.data.lock().unwrap().budget = Some(budget.clone());
        Arc::new(stub)
    }

    fn edit(&self, f: impl FnOnce(&mut StubData)) {
        f(&mut self.data.lock().unwrap());
    }

    /// Holds the next budget read until the returned sender fires.
    fn gate_next_read(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push_back(rx);
        tx
    }

    fn reads(&self) -> usize {
        self.budget_reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordGateway for StubGateway {
    async fn fetch_budget(&self, budget_id: BudgetId) -> Result<Budget, FetchError> {
        self.budget_reads.fetch_add(1, Ordering::SeqCst);
        let gate = self.gates.lock().unwrap().pop_front();
        if let Some(gate) = gate {
            self.entered.notify_one();
            let _ = gate.await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(FetchError::unavailable("store offline"));
        }
        self.data
            .lock()
            .unwrap()
            .budget
            .clone()
            .filter(|b| b.id == budget_id)
            .ok_or(FetchError::BudgetNotFound(budget_id))
    }

    async fn fetch_planned_expenses(
        &self,
        budget_id: BudgetId,
        window: DateWindow,
    ) -> Result<Vec<PlannedExpense>, FetchError> {
        let data = self.data.lock().unwrap();
        Ok(data
            .planned
            .iter()
            .filter(|e| e.budget_id == budget_id && window.contains(e.transaction_date))
            .cloned()
            .collect())
    }

    async fn fetch_variable_expenses(
        &self,
        cards: &CardScope,
        window: DateWindow,
    ) -> Result<Vec<UnplannedExpense>, FetchError> {
        let data = self.data.lock().unwrap();
        Ok(data
            .variable
            .iter()
            .filter(|e| cards.matches(e.card_id) && window.contains(e.transaction_date))
            .cloned()
            .collect())
    }

    async fn fetch_incomes(
        &self,
        _budget_id: BudgetId,
        window: DateWindow,
    ) -> Result<Vec<Income>, FetchError> {
        let data = self.data.lock().unwrap();
        let sources = data
            .budget
            .as_ref()
            .map(|b| b.income_source_ids.clone())
            .unwrap_or_default();
        Ok(data
            .incomes
            .iter()
            .filter(|i| sources.contains(&i.source_id) && window.contains(i.date))
            .cloned()
            .collect())
    }
}

fn controller(budget: &Budget, gateway: Arc<StubGateway>) -> Arc<BudgetViewController> {
    Arc::new(BudgetViewController::new(
        budget.clone(),
        gateway,
        &ViewConfig::default(),
    ))
}

/// January budget with rent and groceries planned.
fn seeded() -> (Budget, Arc<StubGateway>) {
    let budget = january_budget();
    let gateway = StubGateway::with_budget(&budget);
    gateway.edit(|data| {
        data.planned = vec![
            planned(&budget, "Rent", category("Rent"), dec!(1000), dec!(1000), at(2025, 1, 1, 9)),
            planned(
                &budget,
                "Groceries",
                category("Groceries"),
                dec!(200),
                dec!(180),
                at(2025, 1, 5, 12),
            ),
        ];
    });
    (budget, gateway)
}

#[test]
fn test_reduce_load_only_once() {
    let mut state = ViewState::new(january_budget(), Segment::Planned, SortMode::DateDescending);

    let ticket = state.reduce(ViewIntent::Load).expect("first load fetches");
    assert_eq!(ticket.generation, 1);
    assert!(state.reduce(ViewIntent::Load).is_none());
    assert_eq!(state.reduce(ViewIntent::Refresh).map(|t| t.generation), Some(2));
}

#[test]
fn test_reduce_ignores_window_equal_to_budget() {
    let budget = january_budget();
    let mut state = ViewState::new(budget.clone(), Segment::Planned, SortMode::DateDescending);

    let ticket = state.reduce(ViewIntent::SetDateWindow(budget.window())).unwrap();
    assert_eq!(ticket.window_override, None);

    let narrow = DateWindow::from_dates(date(2025, 1, 10), date(2025, 1, 20));
    let ticket = state.reduce(ViewIntent::SetDateWindow(narrow)).unwrap();
    assert_eq!(ticket.window_override, Some(narrow));
    assert_eq!(state.active_window(), narrow);
}

#[test]
fn test_apply_drops_stale_generation() {
    let budget = january_budget();
    let mut state = ViewState::new(budget, Segment::Planned, SortMode::DateDescending);
    let first = state.reduce(ViewIntent::Load).unwrap();
    let _second = state.reduce(ViewIntent::Refresh).unwrap();

    let outcome = state.apply(first.generation, Err(FetchError::unavailable("late")));
    assert_eq!(outcome, RefreshOutcome::Superseded);
    assert_eq!(state.snapshot().phase, ViewPhase::Loading);
}

#[test]
fn test_apply_shows_only_rows_counted_in_totals() {
    let budget = january_budget();
    let other = january_budget();
    let card = budget.card_ids[0];
    let mut state = ViewState::new(budget.clone(), Segment::Planned, SortMode::DateDescending);
    let ticket = state.reduce(ViewIntent::Load).unwrap();

    let records = PeriodRecords {
        planned: vec![
            planned(&budget, "Rent", category("Rent"), dec!(900), dec!(900), at(2025, 1, 1, 9)),
            planned(
                &budget,
                "February rent",
                category("Rent"),
                dec!(900),
                dec!(900),
                at(2025, 2, 1, 9),
            ),
            planned(&other, "Elsewhere", category("Rent"), dec!(50), dec!(50), at(2025, 1, 2, 9)),
        ],
        variable: vec![
            variable(card, "Coffee", category("Cafe"), dec!(4), at(2025, 1, 3, 8)),
            variable(CardId::new(), "Foreign card", category("Cafe"), dec!(7), at(2025, 1, 3, 8)),
        ],
        incomes: vec![],
    };
    let fetched = FetchedPeriod {
        window: budget.window(),
        budget,
        records,
    };
    assert_eq!(state.apply(ticket.generation, Ok(fetched)), RefreshOutcome::Applied);

    let snapshot = state.snapshot();
    let titles: Vec<_> = snapshot.rows.iter().map(|r| r.description()).collect();
    assert_eq!(titles, vec!["Rent"]);
    let summary = snapshot.summary.unwrap();
    assert_eq!(summary.planned_expense_actual_total, dec!(900));
    assert_eq!(summary.variable_expense_total, dec!(4));
}

#[tokio::test]
async fn test_load_publishes_summary_and_rows() {
    let (budget, gateway) = seeded();
    let controller = controller(&budget, Arc::clone(&gateway));

    assert_eq!(controller.snapshot().phase, ViewPhase::Uninitialized);
    assert_eq!(controller.load().await, RefreshOutcome::Applied);

    let snapshot = controller.snapshot();
    assert!(snapshot.is_ready());
    let summary = snapshot.summary.expect("summary after load");
    assert_eq!(summary.planned_expense_actual_total, dec!(1180));
    assert_eq!(summary.potential_savings, dec!(-1200));
    assert_eq!(summary.actual_savings, dec!(-1180));
    let rows: Vec<_> = snapshot.rows.iter().map(|r| r.description()).collect();
    assert_eq!(rows, vec!["Groceries", "Rent"]);

    assert_eq!(controller.load().await, RefreshOutcome::Skipped);
    assert_eq!(gateway.reads(), 1);
}

#[tokio::test]
async fn test_refresh_is_idempotent() {
    let (budget, gateway) = seeded();
    let controller = controller(&budget, gateway);
    controller.load().await;

    controller.refresh_rows().await;
    let first = controller.snapshot();
    controller.refresh_rows().await;
    let second = controller.snapshot();

    assert_eq!(first.summary, second.summary);
    assert_eq!(first.rows, second.rows);
    assert_eq!(second.generation, first.generation + 1);
}

#[tokio::test]
async fn test_refresh_sees_committed_writes() {
    let (budget, gateway) = seeded();
    let controller = controller(&budget, Arc::clone(&gateway));
    controller.load().await;

    let source = budget.income_source_ids[0];
    gateway.edit(|data| data.incomes.push(income(
        source,
        dec!(3000),
        dec!(2900),
        at(2025, 1, 15, 9),
    )));
    controller.refresh_rows().await;

    let summary = controller.snapshot().summary.unwrap();
    assert_eq!(summary.actual_income, dec!(2900));
    assert_eq!(summary.actual_savings, dec!(1720));
}

#[tokio::test]
async fn test_failure_keeps_last_good_state() {
    let (budget, gateway) = seeded();
    let controller = controller(&budget, Arc::clone(&gateway));
    controller.load().await;
    let good = controller.snapshot();

    gateway.fail.store(true, Ordering::SeqCst);
    assert_eq!(controller.refresh_rows().await, RefreshOutcome::Failed);

    let failed = controller.snapshot();
    assert!(matches!(failed.phase, ViewPhase::Error { .. }));
    assert!(failed.last_error.is_some());
    assert_eq!(failed.summary, good.summary);
    assert_eq!(failed.rows, good.rows);

    gateway.fail.store(false, Ordering::SeqCst);
    assert_eq!(controller.refresh_rows().await, RefreshOutcome::Applied);
    let recovered = controller.snapshot();
    assert!(recovered.is_ready());
    assert_eq!(recovered.last_error, None);
}

#[tokio::test]
async fn test_segment_sort_and_search() {
    let (budget, gateway) = seeded();
    let card = budget.card_ids[0];
    gateway.edit(|data| {
        data.variable = vec![
            variable(card, "Latte", category("Coffee"), dec!(5), at(2025, 1, 2, 8)),
            variable(card, "Bus", category("Transit"), dec!(3), at(2025, 1, 3, 8)),
        ];
    });
    let controller = controller(&budget, gateway);
    controller.load().await;

    controller.select_segment(Segment::Variable).await;
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.summary.as_ref().unwrap().selected_total(), dec!(8));
    assert_eq!(snapshot.rows.len(), 2);

    controller.set_sort(SortMode::Alphabetical).await;
    let rows: Vec<_> = controller
        .snapshot()
        .rows
        .iter()
        .map(|r| r.description().to_string())
        .collect();
    assert_eq!(rows, vec!["Bus", "Latte"]);

    controller.set_search("coffee").await;
    let snapshot = controller.snapshot();
    assert_eq!(snapshot.search.as_deref(), Some("coffee"));
    assert_eq!(snapshot.rows.len(), 1);
    // Search narrows rows, never totals.
    assert_eq!(snapshot.summary.unwrap().variable_expense_total, dec!(8));
}

#[tokio::test]
async fn test_date_window_override_and_reset() {
    let (budget, gateway) = seeded();
    let controller = controller(&budget, gateway);
    controller.load().await;

    // Bounds given in reverse are swapped.
    controller.set_date_window(at(2025, 1, 10, 0), at(2025, 1, 2, 15)).await;
    let snapshot = controller.snapshot();
    assert!(snapshot.window_overridden);
    assert_eq!(snapshot.window, DateWindow::from_dates(date(2025, 1, 2), date(2025, 1, 10)));
    let summary = snapshot.summary.unwrap();
    assert_eq!(summary.planned_expense_actual_total, dec!(180));
    assert_eq!(summary.period_label, "Jan 2, 2025 - Jan 10, 2025");

    controller.reset_date_window_to_budget().await;
    let snapshot = controller.snapshot();
    assert!(!snapshot.window_overridden);
    assert_eq!(snapshot.window, budget.window());
    assert_eq!(snapshot.summary.unwrap().planned_expense_actual_total, dec!(1180));
}

#[tokio::test]
async fn test_budget_dates_are_reread_on_refresh() {
    let (budget, gateway) = seeded();
    let controller = controller(&budget, Arc::clone(&gateway));
    controller.load().await;

    gateway.edit(|data| {
        if let Some(stored) = data.budget.as_mut() {
            stored.end_date = date(2025, 1, 3);
        }
    });
    controller.refresh_rows().await;

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.window, DateWindow::from_dates(date(2025, 1, 1), date(2025, 1, 3)));
    assert_eq!(snapshot.summary.unwrap().planned_expense_actual_total, dec!(1000));
}

#[tokio::test]
async fn test_stale_fetch_is_superseded() {
    let (budget, gateway) = seeded();
    let controller = controller(&budget, Arc::clone(&gateway));
    let release = gateway.gate_next_read();

    let slow = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.load().await }
    });
    gateway.entered.notified().await;

    assert_eq!(controller.set_sort(SortMode::Alphabetical).await, RefreshOutcome::Applied);
    release.send(()).unwrap();
    assert_eq!(slow.await.unwrap(), RefreshOutcome::Superseded);

    let snapshot = controller.snapshot();
    assert!(snapshot.is_ready());
    assert_eq!(snapshot.sort, SortMode::Alphabetical);
    assert_eq!(snapshot.generation, 2);
    let rows: Vec<_> = snapshot.rows.iter().map(|r| r.description()).collect();
    assert_eq!(rows, vec!["Groceries", "Rent"]);
}

#[tokio::test]
async fn test_missing_budget_surfaces_error() {
    let budget = january_budget();
    let mut gateway = MockRecordGateway::new();
    gateway
        .expect_fetch_budget()
        .times(1)
        .returning(|id| Err(FetchError::BudgetNotFound(id)));
    gateway.expect_fetch_planned_expenses().never();

    let controller = BudgetViewController::new(budget, Arc::new(gateway), &ViewConfig::default());

    assert_eq!(controller.load().await, RefreshOutcome::Failed);
    let snapshot = controller.snapshot();
    assert_eq!(
        snapshot.phase,
        ViewPhase::Error {
            message: "This budget no longer exists.".to_string()
        }
    );
    assert!(snapshot.summary.is_none());
}

#[tokio::test]
async fn test_budget_without_cards_queries_empty_scope() {
    let mut budget = january_budget();
    budget.card_ids.clear();
    let stored = budget.clone();

    let mut gateway = MockRecordGateway::new();
    gateway
        .expect_fetch_budget()
        .returning(move |_| Ok(stored.clone()));
    gateway
        .expect_fetch_planned_expenses()
        .returning(|_, _| Ok(Vec::new()));
    gateway
        .expect_fetch_variable_expenses()
        .withf(|cards, _| cards.is_empty())
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    gateway.expect_fetch_incomes().returning(|_, _| Ok(Vec::new()));

    let controller = BudgetViewController::new(
        budget,
        Arc::new(gateway),
        &ViewConfig {
            default_segment: Segment::Variable,
            default_sort: SortMode::Alphabetical,
        },
    );
    assert_eq!(controller.load().await, RefreshOutcome::Applied);

    let snapshot = controller.snapshot();
    assert_eq!(snapshot.segment, Segment::Variable);
    assert_eq!(snapshot.summary.unwrap().variable_expense_total, dec!(0));
    assert!(snapshot.rows.is_empty());
}

#[tokio::test]
async fn test_watch_changes_refreshes_after_load() {
    let (budget, gateway) = seeded();
    let controller = controller(&budget, Arc::clone(&gateway));
    let (tx, rx) = broadcast::channel(16);
    let watcher = controller.watch_changes(rx);

    // Changes before the first load are ignored.
    tx.send(RecordChange::PlannedExpense {
        budget_id: budget.id,
        action: ChangeAction::Created,
    })
    .unwrap();
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert_eq!(gateway.reads(), 0);

    controller.load().await;
    let mut updates = controller.subscribe();
    gateway.edit(|data| {
        data.planned.push(planned(
            &budget,
            "Gym",
            category("Health"),
            dec!(40),
            dec!(40),
            at(2025, 1, 8, 7),
        ));
    });
    tx.send(RecordChange::PlannedExpense {
        budget_id: budget.id,
        action: ChangeAction::Created,
    })
    .unwrap();

    let snapshot = timeout(
        WAIT,
        updates.wait_for(|s| {
            s.summary
                .as_ref()
                .is_some_and(|summary| summary.planned_expense_actual_total == dec!(1220))
        }),
    )
    .await
    .expect("refresh after change")
    .unwrap()
    .clone();
    assert!(snapshot.is_ready());

    // Unrelated changes do not trigger a fetch.
    let reads = gateway.reads();
    tx.send(RecordChange::PlannedExpense {
        budget_id: BudgetId::new(),
        action: ChangeAction::Updated,
    })
    .unwrap();
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
    assert_eq!(gateway.reads(), reads);

    tx.send(RecordChange::Budget {
        id: budget.id,
        action: ChangeAction::Deleted,
    })
    .unwrap();
    timeout(WAIT, watcher).await.expect("watch ends on deletion").unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_registry_hands_out_one_controller_per_budget() {
    let (budget, gateway) = seeded();
    let registry = Arc::new(ViewRegistry::new(gateway, Arc::new(ViewConfig::default())));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let budget = budget.clone();
            tokio::spawn(async move { registry.controller_for(&budget) })
        })
        .collect();

    let mut controllers = Vec::new();
    for handle in handles {
        controllers.push(handle.await.unwrap());
    }
    let opened = registry.open(budget.id).await.unwrap();

    for controller in &controllers {
        assert!(Arc::ptr_eq(controller, &opened));
    }
    assert!(registry.contains(budget.id));
}

#[tokio::test]
async fn test_registry_shares_state_between_views() {
    let (budget, gateway) = seeded();
    let registry = ViewRegistry::new(gateway, Arc::new(ViewConfig::default()));

    let first = registry.controller_for(&budget);
    first.load().await;
    first.select_segment(Segment::Variable).await;

    let second = registry.open(budget.id).await.unwrap();
    assert_eq!(second.snapshot().segment, Segment::Variable);
    assert_eq!(second.load().await, RefreshOutcome::Skipped);
}

#[tokio::test]
async fn test_registry_open_unknown_budget_fails() {
    let (_, gateway) = seeded();
    let registry = ViewRegistry::new(gateway, Arc::new(ViewConfig::default()));
    let missing = BudgetId::new();

    let err = registry.open(missing).await.unwrap_err();
    assert_eq!(err, FetchError::BudgetNotFound(missing));
    assert!(!registry.contains(missing));
}

#[tokio::test]
async fn test_registry_evicts_deleted_budgets() {
    let (budget, gateway) = seeded();
    let registry = Arc::new(ViewRegistry::new(gateway, Arc::new(ViewConfig::default())));
    let (tx, rx) = broadcast::channel(16);
    let watcher = registry.watch_deletions(rx);

    let _controller = registry.controller_for(&budget);
    tx.send(RecordChange::Budget {
        id: budget.id,
        action: ChangeAction::Updated,
    })
    .unwrap();
    tx.send(RecordChange::Budget {
        id: budget.id,
        action: ChangeAction::Deleted,
    })
    .unwrap();
    drop(tx);

    timeout(WAIT, watcher).await.expect("watch ends on close").unwrap();
    assert!(!registry.contains(budget.id));
    assert!(registry.get(budget.id).is_none());
}
