use crate::{
    calculator::EmissionEntry,
    change::plan_save,
    error::CarbonforgeError,
};
use carbonforge_schemas::{entry::EntryMeta, units::OutputUnit};
use std::{sync::Mutex, thread};
use tracing::{info, warn};

/// Rows read back from storage, with the output unit they were last saved under.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRows<E> {
    pub rows: Vec<E>,
    pub output_unit: Option<OutputUnit>,
}

/// Persistence port for one kind of entry row.
///
/// Failures are opaque `Storage` errors; callers do not classify or retry them.
pub trait EntryStore<E>: Sync {
    fn load(&self) -> Result<StoredRows<E>, CarbonforgeError>;

    /// Stores new rows and returns their assigned ids in input order.
    fn insert(&self, rows: &[E], output_unit: OutputUnit) -> Result<Vec<String>, CarbonforgeError>;

    fn update(&self, row: &E, output_unit: OutputUnit) -> Result<(), CarbonforgeError>;

    fn delete(&self, db_id: &str) -> Result<(), CarbonforgeError>;
}

#[derive(Debug)]
struct MemoryState<E> {
    rows: Vec<(String, E)>,
    output_unit: Option<OutputUnit>,
    next_id: u64,
}

/// In-process `EntryStore`.
#[derive(Debug)]
pub struct MemoryStore<E> {
    state: Mutex<MemoryState<E>>,
}

impl<E> Default for MemoryStore<E> {
    fn default() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                rows: Vec::new(),
                output_unit: None,
                next_id: 1,
            }),
        }
    }
}

impl<E> MemoryStore<E> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState<E>>, CarbonforgeError> {
        self.state
            .lock()
            .map_err(|_| CarbonforgeError::Storage("memory store lock poisoned".to_string()))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|state| state.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> EntryStore<E> for MemoryStore<E>
where
    E: EmissionEntry + Send,
{
    fn load(&self) -> Result<StoredRows<E>, CarbonforgeError> {
        let state = self.lock()?;
        let rows = state
            .rows
            .iter()
            .map(|(db_id, row)| {
                let mut row = row.clone();
                *row.meta_mut() = EntryMeta::persisted(db_id);
                row
            })
            .collect();
        Ok(StoredRows {
            rows,
            output_unit: state.output_unit,
        })
    }

    fn insert(&self, rows: &[E], output_unit: OutputUnit) -> Result<Vec<String>, CarbonforgeError> {
        let mut state = self.lock()?;
        let mut ids = Vec::with_capacity(rows.len());
        for row in rows {
            let db_id = format!("mem-{}", state.next_id);
            state.next_id += 1;
            state.rows.push((db_id.clone(), row.clone()));
            ids.push(db_id);
        }
        state.output_unit = Some(output_unit);
        Ok(ids)
    }

    fn update(&self, row: &E, output_unit: OutputUnit) -> Result<(), CarbonforgeError> {
        let db_id = row
            .meta()
            .db_id
            .as_deref()
            .ok_or_else(|| CarbonforgeError::NotPersisted(row.meta().id.clone()))?;
        let mut state = self.lock()?;
        let slot = state
            .rows
            .iter_mut()
            .find(|(id, _)| id == db_id)
            .ok_or_else(|| CarbonforgeError::Storage(format!("no stored row '{}'", db_id)))?;
        slot.1 = row.clone();
        state.output_unit = Some(output_unit);
        Ok(())
    }

    fn delete(&self, db_id: &str) -> Result<(), CarbonforgeError> {
        let mut state = self.lock()?;
        let before = state.rows.len();
        state.rows.retain(|(id, _)| id != db_id);
        if state.rows.len() == before {
            return Err(CarbonforgeError::Storage(format!("no stored row '{}'", db_id)));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveReport {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Saves changed rows: new complete rows are inserted as one batch, then
/// every changed saved row is updated concurrently.
///
/// The batch fails if any operation fails, reporting the first failure in
/// issue order. Operations that already succeeded are not rolled back, so the
/// caller should reload afterwards.
pub fn save_batch<E, S>(
    store: &S,
    rows: &[E],
    snapshot: &[E],
    output_unit: OutputUnit,
) -> Result<SaveReport, CarbonforgeError>
where
    E: EmissionEntry + Sync,
    S: EntryStore<E>,
{
    let plan = plan_save(rows, snapshot);
    let mut report = SaveReport {
        skipped: plan.skipped,
        ..Default::default()
    };
    if plan.is_empty() {
        info!(skipped = plan.skipped, "nothing to save");
        return Ok(report);
    }

    if !plan.inserts.is_empty() {
        report.inserted = store.insert(&plan.inserts, output_unit)?.len();
    }

    let results: Vec<Result<(), CarbonforgeError>> = thread::scope(|scope| {
        let handles: Vec<_> = plan
            .updates
            .iter()
            .map(|row| scope.spawn(move || store.update(row, output_unit)))
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle.join().unwrap_or_else(|_| {
                    Err(CarbonforgeError::Storage("update worker panicked".to_string()))
                })
            })
            .collect()
    });
    for result in results {
        if let Err(err) = result {
            warn!(error = %err, "save batch failed; reload persisted rows");
            return Err(err);
        }
        report.updated += 1;
    }

    info!(
        inserted = report.inserted,
        updated = report.updated,
        skipped = report.skipped,
        unit = %output_unit,
        "saved rows"
    );
    Ok(report)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// No row has that local id.
    Missing,
    /// The confirmation callback declined.
    Cancelled,
    /// The row was never saved and was only dropped from `rows`.
    RemovedLocal,
    Deleted,
}

/// Removes the row with local id `id`.
///
/// Saved rows are deleted from the store only when `confirm` returns `true`;
/// there is no undo. If the store fails the row stays in `rows`.
pub fn delete_row<E, S, F>(
    store: &S,
    rows: &mut Vec<E>,
    id: &str,
    confirm: F,
) -> Result<DeleteOutcome, CarbonforgeError>
where
    E: EmissionEntry,
    S: EntryStore<E>,
    F: FnOnce(&E) -> bool,
{
    let Some(index) = rows.iter().position(|row| row.meta().id == id) else {
        return Ok(DeleteOutcome::Missing);
    };

    let Some(db_id) = rows[index].meta().db_id.clone() else {
        rows.remove(index);
        return Ok(DeleteOutcome::RemovedLocal);
    };

    if !confirm(&rows[index]) {
        return Ok(DeleteOutcome::Cancelled);
    }

    store.delete(&db_id)?;
    rows.remove(index);
    info!(%db_id, "deleted row");
    Ok(DeleteOutcome::Deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbonforge_schemas::entry::RefrigerantRow;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn methane(quantity: f64) -> RefrigerantRow {
        RefrigerantRow {
            refrigerant_type: Some("Methane".to_string()),
            quantity: Some(quantity),
            factor: Some(28.0),
            emissions: Some(quantity * 28.0),
            ..Default::default()
        }
    }

    #[test]
    fn save_then_reload_then_update() {
        let store = MemoryStore::new();
        let rows = vec![methane(1.0), methane(2.0), RefrigerantRow::default()];

        let report = save_batch(&store, &rows, &[], OutputUnit::Tonnes).unwrap();
        assert_eq!(report, SaveReport { inserted: 2, updated: 0, skipped: 1 });

        let loaded = store.load().unwrap();
        assert_eq!(loaded.output_unit, Some(OutputUnit::Tonnes));
        assert!(loaded.rows.iter().all(|r| r.meta.is_existing && r.meta.db_id.is_some()));

        let snapshot = loaded.rows.clone();
        let mut rows = loaded.rows;
        rows[1].quantity = Some(4.0);
        rows[1].emissions = Some(112.0);

        let report = save_batch(&store, &rows, &snapshot, OutputUnit::Kg).unwrap();
        assert_eq!(report, SaveReport { inserted: 0, updated: 1, skipped: 1 });
        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.rows[1].emissions, Some(112.0));
        assert_eq!(reloaded.output_unit, Some(OutputUnit::Kg));
    }

    struct FlakyStore {
        calls: AtomicUsize,
    }

    impl EntryStore<RefrigerantRow> for FlakyStore {
        fn load(&self) -> Result<StoredRows<RefrigerantRow>, CarbonforgeError> {
            Ok(StoredRows { rows: Vec::new(), output_unit: None })
        }

        fn insert(&self, rows: &[RefrigerantRow], _: OutputUnit) -> Result<Vec<String>, CarbonforgeError> {
            Ok(rows.iter().map(|_| "x".to_string()).collect())
        }

        fn update(&self, row: &RefrigerantRow, _: OutputUnit) -> Result<(), CarbonforgeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match row.meta.db_id.as_deref() {
                Some("bad-1") | Some("bad-2") => Err(CarbonforgeError::Storage(
                    row.meta.db_id.clone().unwrap_or_default(),
                )),
                _ => Ok(()),
            }
        }

        fn delete(&self, _: &str) -> Result<(), CarbonforgeError> {
            Err(CarbonforgeError::Storage("offline".to_string()))
        }
    }

    #[test]
    fn first_failed_update_in_issue_order_is_reported() {
        let store = FlakyStore { calls: AtomicUsize::new(0) };
        let snapshot: Vec<RefrigerantRow> = ["ok", "bad-1", "bad-2"]
            .iter()
            .map(|id| RefrigerantRow {
                meta: EntryMeta::persisted(id),
                ..methane(1.0)
            })
            .collect();
        let rows: Vec<RefrigerantRow> = snapshot
            .iter()
            .map(|r| RefrigerantRow { quantity: Some(9.0), ..r.clone() })
            .collect();

        match save_batch(&store, &rows, &snapshot, OutputUnit::Kg).unwrap_err() {
            CarbonforgeError::Storage(message) => assert_eq!(message, "bad-1"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn delete_requires_confirmation_for_saved_rows() {
        let store = MemoryStore::new();
        save_batch(&store, &[methane(1.0)], &[], OutputUnit::Kg).unwrap();
        let mut rows = store.load().unwrap().rows;
        rows.push(methane(5.0));
        let saved_id = rows[0].meta.id.clone();
        let local_id = rows[1].meta.id.clone();

        assert_eq!(
            delete_row(&store, &mut rows, &local_id, |_| panic!("not asked")).unwrap(),
            DeleteOutcome::RemovedLocal
        );
        assert_eq!(
            delete_row(&store, &mut rows, &saved_id, |_| false).unwrap(),
            DeleteOutcome::Cancelled
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(
            delete_row(&store, &mut rows, &saved_id, |_| true).unwrap(),
            DeleteOutcome::Deleted
        );
        assert!(rows.is_empty());
        assert!(store.is_empty());
        assert_eq!(
            delete_row(&store, &mut rows, "gone", |_| true).unwrap(),
            DeleteOutcome::Missing
        );
    }

    #[test]
    fn failed_delete_keeps_the_row() {
        let store = FlakyStore { calls: AtomicUsize::new(0) };
        let mut rows = vec![RefrigerantRow {
            meta: EntryMeta::persisted("abc"),
            ..methane(1.0)
        }];
        let id = rows[0].meta.id.clone();
        assert!(delete_row(&store, &mut rows, &id, |_| true).is_err());
        assert_eq!(rows.len(), 1);
    }
}
