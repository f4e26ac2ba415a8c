use crate::{
    calculator::{recompute, EmissionEntry},
    factors::table::{FlatTable, ThreeLevelTable},
    units::round6,
};
use carbonforge_schemas::electricity::ElectricityRecord;
use serde::Serialize;
use tracing::debug;

/// Scope 2 electricity contributions in kg.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ElectricityBreakdown {
    pub grid: f64,
    /// Always zero.
    pub renewable: f64,
    pub other: f64,
    pub total: f64,
}

fn share(pct: Option<f64>, total_kwh: Option<f64>) -> Option<f64> {
    Some(pct? / 100.0 * total_kwh?)
}

/// Computes the electricity record's emissions.
///
/// The grid part uses the selected country's factor. The other part scales
/// the summed emissions of the recomputed other-source fuel rows by the other
/// share of consumption. Missing inputs contribute zero.
pub fn compute_electricity(
    record: &ElectricityRecord,
    grid: &FlatTable,
    fuels: &ThreeLevelTable,
) -> (ElectricityRecord, ElectricityBreakdown) {
    let mut record = record.clone();
    record.other_sources = record
        .other_sources
        .into_iter()
        .map(|row| recompute(row, fuels))
        .collect();

    let grid_factor = grid.resolve(record.grid_country.as_deref());
    let grid_part = match (share(record.grid_pct, record.total_kwh), grid_factor) {
        (Some(kwh), Some(factor)) => kwh * factor,
        _ => 0.0,
    };

    let other_rows: f64 = record
        .other_sources
        .iter()
        .filter_map(EmissionEntry::emissions)
        .sum();
    let other_part = share(record.other_pct, record.total_kwh)
        .map(|kwh| kwh * other_rows)
        .unwrap_or(0.0);

    let breakdown = ElectricityBreakdown {
        grid: round6(grid_part),
        renewable: 0.0,
        other: round6(other_part),
        total: round6(grid_part + other_part),
    };
    debug!(?breakdown, country = ?record.grid_country, "computed electricity");
    record.calculated_emissions = Some(breakdown.total);
    (record, breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::FactorLibrary;
    use carbonforge_schemas::entry::FuelRow;

    fn record() -> ElectricityRecord {
        ElectricityRecord {
            total_kwh: Some(1000.0),
            grid_pct: Some(50.0),
            renewable_pct: Some(50.0),
            other_pct: Some(0.0),
            grid_country: Some("UAE".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn half_grid_in_uae() {
        let lib = FactorLibrary::builtin();
        let (record, breakdown) = compute_electricity(&record(), &lib.grid, &lib.fuels);
        assert_eq!(breakdown.grid, 202.05);
        assert_eq!(breakdown.other, 0.0);
        assert_eq!(breakdown.total, 202.05);
        assert_eq!(record.calculated_emissions, Some(202.05));
    }

    #[test]
    fn unknown_country_contributes_nothing() {
        let lib = FactorLibrary::builtin();
        let mut input = record();
        input.grid_country = Some("Atlantis".to_string());
        let (_, breakdown) = compute_electricity(&input, &lib.grid, &lib.fuels);
        assert_eq!(breakdown.total, 0.0);
    }

    #[test]
    fn other_sources_are_recomputed_and_scaled() {
        let lib = FactorLibrary::builtin();
        let mut input = record();
        input.grid_pct = Some(0.0);
        input.other_pct = Some(10.0);
        input.other_sources = vec![FuelRow {
            fuel_type: Some("Gaseous fuels".to_string()),
            fuel: Some("Propane".to_string()),
            unit: Some("litres".to_string()),
            quantity: Some(1.0),
            ..Default::default()
        }];
        let (record, breakdown) = compute_electricity(&input, &lib.grid, &lib.fuels);
        assert_eq!(record.other_sources[0].emissions, Some(1.5414));
        assert_eq!(breakdown.other, round6(100.0 * 1.5414));
        assert_eq!(breakdown.total, breakdown.other);
    }
}
