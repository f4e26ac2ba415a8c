use crate::{calculator::recompute, factors::HeatSteamTable};
use carbonforge_schemas::{
    entry::EntryMeta,
    heat_steam::{HeatSteamRow, HeatSteamSource},
    units::{Gas, QuantityUnit},
};

/// One row per activity and unit in the table, with the table's gas factors
/// copied onto the row. Gas choice and quantity are carried over from
/// `existing` rows with the same activity and unit.
pub fn rows_from_table(table: &HeatSteamTable, existing: &[HeatSteamRow]) -> Vec<HeatSteamRow> {
    let mut rows = Vec::new();
    for (activity, units) in table.iter() {
        for (unit, factors) in units.iter() {
            let previous = existing
                .iter()
                .find(|row| &row.entry_type == activity && &row.unit == unit);
            let row = HeatSteamRow {
                meta: previous.map(|row| row.meta.clone()).unwrap_or_default(),
                entry_type: activity.clone(),
                unit: unit.clone(),
                gas: previous.map(|row| row.gas).unwrap_or(Gas::Co2),
                quantity_unit: previous
                    .map(|row| row.quantity_unit)
                    .unwrap_or(QuantityUnit::Base),
                quantity: previous.and_then(|row| row.quantity),
                factors: factors.clone(),
                factor: None,
                emissions: None,
            };
            rows.push(recompute(row, table));
        }
    }
    rows
}

/// Stored entry type for a row's activity label.
pub fn source_of(row: &HeatSteamRow) -> HeatSteamSource {
    HeatSteamSource::from_label(&row.entry_type)
}

/// A blank row for a free-form activity not in the table.
pub fn blank_row(activity: &str, unit: &str) -> HeatSteamRow {
    HeatSteamRow {
        meta: EntryMeta::new(),
        entry_type: activity.to_string(),
        unit: unit.to_string(),
        gas: Gas::Co2,
        quantity_unit: QuantityUnit::Base,
        quantity: None,
        factors: Default::default(),
        factor: None,
        emissions: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::FactorLibrary;

    #[test]
    fn table_rows_keep_previous_inputs() {
        let table = &FactorLibrary::builtin().heat_steam;
        let mut previous = blank_row("District heat and steam", "mmBtu");
        previous.gas = Gas::N2o;
        previous.quantity = Some(10.0);

        let rows = rows_from_table(table, &[previous.clone()]);
        assert_eq!(rows.len(), 2);
        let district = rows
            .iter()
            .find(|r| r.entry_type == "District heat and steam")
            .unwrap();
        assert_eq!(district.meta.id, previous.meta.id);
        assert_eq!(district.factor, Some(0.125));
        assert_eq!(district.emissions, Some(0.00125));
        assert_eq!(source_of(district), HeatSteamSource::District);

        let onsite = rows.iter().find(|r| r.entry_type.starts_with("Onsite")).unwrap();
        assert_eq!(onsite.emissions, None);
        assert_eq!(source_of(onsite), HeatSteamSource::Onsite);
    }
}
