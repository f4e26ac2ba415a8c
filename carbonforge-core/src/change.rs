use crate::calculator::EmissionEntry;

/// Whether `row` differs from its entry in the `snapshot` taken at load time.
///
/// Rows are matched by local id. A row with no snapshot entry is new, not
/// changed.
pub fn has_changed<E: EmissionEntry>(row: &E, snapshot: &[E]) -> bool {
    let Some(previous) = snapshot.iter().find(|p| p.meta().id == row.meta().id) else {
        return false;
    };
    let mut current = row.clone();
    *current.meta_mut() = previous.meta().clone();
    current != *previous
}

/// Which rows a save writes.
#[derive(Debug, Clone, PartialEq)]
pub struct SavePlan<E> {
    /// Unsaved rows with computed emissions.
    pub inserts: Vec<E>,
    /// Saved rows that differ from the snapshot.
    pub updates: Vec<E>,
    pub skipped: usize,
}

impl<E> SavePlan<E> {
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty()
    }
}

pub fn plan_save<E: EmissionEntry>(rows: &[E], snapshot: &[E]) -> SavePlan<E> {
    let mut plan = SavePlan {
        inserts: Vec::new(),
        updates: Vec::new(),
        skipped: 0,
    };
    for row in rows {
        match &row.meta().db_id {
            None if row.emissions().is_some() => plan.inserts.push(row.clone()),
            Some(_) if has_changed(row, snapshot) => plan.updates.push(row.clone()),
            _ => plan.skipped += 1,
        }
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbonforge_schemas::entry::{EntryMeta, RefrigerantRow};

    fn saved(db_id: &str, quantity: f64) -> RefrigerantRow {
        RefrigerantRow {
            meta: EntryMeta::persisted(db_id),
            refrigerant_type: Some("Methane".to_string()),
            quantity: Some(quantity),
            factor: Some(28.0),
            emissions: Some(quantity * 28.0),
        }
    }

    #[test]
    fn unknown_id_is_not_changed() {
        let row = saved("a", 1.0);
        assert!(!has_changed(&row, &[]));
    }

    #[test]
    fn any_semantic_field_counts() {
        let row = saved("a", 1.0);
        let snapshot = vec![row.clone()];
        assert!(!has_changed(&row, &snapshot));

        let mut edited = row.clone();
        edited.quantity = Some(2.0);
        assert!(has_changed(&edited, &snapshot));

        let mut relabelled = row;
        relabelled.meta.is_existing = false;
        assert!(!has_changed(&relabelled, &snapshot));
    }

    #[test]
    fn plan_splits_inserts_updates_and_skips() {
        let unchanged = saved("a", 1.0);
        let mut changed = saved("b", 1.0);
        let snapshot = vec![unchanged.clone(), changed.clone()];
        changed.quantity = Some(5.0);

        let fresh = RefrigerantRow {
            refrigerant_type: Some("Methane".to_string()),
            quantity: Some(3.0),
            factor: Some(28.0),
            emissions: Some(84.0),
            ..Default::default()
        };
        let incomplete = RefrigerantRow::default();

        let plan = plan_save(&[unchanged, changed.clone(), fresh.clone(), incomplete], &snapshot);
        assert_eq!(plan.inserts, vec![fresh]);
        assert_eq!(plan.updates, vec![changed]);
        assert_eq!(plan.skipped, 2);
    }
}
