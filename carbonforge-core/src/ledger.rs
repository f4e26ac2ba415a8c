use crate::{
    calculator::EmissionEntry, electricity::ElectricityBreakdown, error::CarbonforgeError,
    units::convert_from_kg,
};
use carbonforge_schemas::{
    electricity::ElectricityRecord,
    entry::{EntryKind, FuelRow, MobileFuelRow, RefrigerantRow, Scope3Row, VehicleRow},
    epa_vehicle::{NonRoadRow, OnRoadDieselRow, OnRoadGasolineRow},
    heat_steam::HeatSteamRow,
    units::OutputUnit,
};
use csv::Writer;
use serde::Serialize;
use std::{fs, path::Path};

#[derive(Debug, Serialize)]
struct LedgerEntry<'a> {
    kind: &'a str,
    row_id: &'a str,
    selectors: String,
    magnitude: Option<f64>,
    factor: Option<f64>,
    emissions_kg: Option<f64>,
    emissions: Option<f64>,
    output_unit: &'a str,
}

/// A row that can be written to the ledger.
pub trait LedgerRow: EmissionEntry {
    /// The selector chain, `/`-separated, blanks for unset selectors.
    fn selectors(&self) -> String;
}

fn chain(parts: &[&Option<String>]) -> String {
    parts
        .iter()
        .map(|part| part.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" / ")
}

impl LedgerRow for FuelRow {
    fn selectors(&self) -> String {
        chain(&[&self.fuel_type, &self.fuel, &self.unit])
    }
}

impl LedgerRow for RefrigerantRow {
    fn selectors(&self) -> String {
        chain(&[&self.refrigerant_type])
    }
}

impl LedgerRow for VehicleRow {
    fn selectors(&self) -> String {
        chain(&[&self.activity, &self.vehicle_type, &self.unit])
    }
}

impl LedgerRow for MobileFuelRow {
    fn selectors(&self) -> String {
        chain(&[&self.fuel_type, &self.unit])
    }
}

impl LedgerRow for OnRoadGasolineRow {
    fn selectors(&self) -> String {
        chain(&[&self.vehicle_type, &self.model_year])
    }
}

impl LedgerRow for OnRoadDieselRow {
    fn selectors(&self) -> String {
        chain(&[&self.vehicle_type, &self.fuel_type, &self.model_year])
    }
}

impl LedgerRow for NonRoadRow {
    fn selectors(&self) -> String {
        format!(
            "{} / {:?}",
            chain(&[&self.vehicle_type, &self.fuel_type]),
            self.gas
        )
    }
}

impl LedgerRow for Scope3Row {
    fn selectors(&self) -> String {
        chain(&[&self.category, &self.unit])
    }
}

impl LedgerRow for HeatSteamRow {
    fn selectors(&self) -> String {
        format!("{} / {} / {:?}", self.entry_type, self.unit, self.gas)
    }
}

/// CSV record of every computed row in a run.
pub struct EmissionsLedger {
    path: String,
    writer: Writer<fs::File>,
}

impl EmissionsLedger {
    pub fn new(path: &Path) -> Result<Self, CarbonforgeError> {
        let display = path.display().to_string();
        let writer =
            Writer::from_path(path).map_err(|e| CarbonforgeError::CsvError(display.clone(), e))?;
        Ok(Self {
            path: display,
            writer,
        })
    }

    /// Writes one line per row and flushes. Returns the number of lines written.
    pub fn record_rows<E: LedgerRow>(
        &mut self,
        kind: EntryKind,
        rows: &[E],
        unit: OutputUnit,
    ) -> Result<usize, CarbonforgeError> {
        for row in rows {
            let entry = LedgerEntry {
                kind: kind.as_str(),
                row_id: &row.meta().id,
                selectors: row.selectors(),
                magnitude: row.magnitude(),
                factor: row.factor(),
                emissions_kg: row.emissions(),
                emissions: row.emissions().map(|kg| convert_from_kg(kg, unit)),
                output_unit: unit.as_str(),
            };
            self.writer
                .serialize(entry)
                .map_err(|e| CarbonforgeError::CsvError(self.path.clone(), e))?;
        }
        self.flush()?;
        Ok(rows.len())
    }

    /// Writes a single computed total that has no row of its own, such as grid electricity.
    pub fn record_total(
        &mut self,
        kind: EntryKind,
        label: &str,
        kg: f64,
        unit: OutputUnit,
    ) -> Result<(), CarbonforgeError> {
        let entry = LedgerEntry {
            kind: kind.as_str(),
            row_id: "",
            selectors: label.to_string(),
            magnitude: None,
            factor: None,
            emissions_kg: Some(kg),
            emissions: Some(convert_from_kg(kg, unit)),
            output_unit: unit.as_str(),
        };
        self.writer
            .serialize(entry)
            .map_err(|e| CarbonforgeError::CsvError(self.path.clone(), e))?;
        self.flush()
    }

    /// Writes the grid and other-source contributions of a computed
    /// electricity record, so the lines sum to the record's total.
    pub fn record_electricity(
        &mut self,
        record: &ElectricityRecord,
        breakdown: &ElectricityBreakdown,
        unit: OutputUnit,
    ) -> Result<(), CarbonforgeError> {
        let country = record.grid_country.as_deref().unwrap_or("none");
        self.record_total(
            EntryKind::ElectricityOther,
            &format!("Grid ({})", country),
            breakdown.grid,
            unit,
        )?;
        let sources = record
            .other_sources
            .iter()
            .map(LedgerRow::selectors)
            .collect::<Vec<_>>()
            .join("; ");
        self.record_total(
            EntryKind::ElectricityOther,
            &format!("Other sources ({})", sources),
            breakdown.other,
            unit,
        )
    }

    fn flush(&mut self) -> Result<(), CarbonforgeError> {
        self.writer
            .flush()
            .map_err(|e| CarbonforgeError::FileIO(self.path.clone(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{calculator::recompute, factors::FactorLibrary};

    #[test]
    fn rows_are_written_with_converted_emissions() {
        let path = std::env::temp_dir().join(format!("carbonforge-ledger-{}.csv", std::process::id()));
        let library = FactorLibrary::builtin();
        let row = recompute(
            RefrigerantRow {
                refrigerant_type: Some("Methane".to_string()),
                quantity: Some(10.0),
                ..Default::default()
            },
            &library.refrigerants,
        );
        let incomplete = FuelRow::default();

        let mut ledger = EmissionsLedger::new(&path).unwrap();
        assert_eq!(ledger.record_rows(EntryKind::Refrigerant, &[row], OutputUnit::Tonnes).unwrap(), 1);
        ledger.record_rows(EntryKind::Fuel, &[incomplete], OutputUnit::Tonnes).unwrap();
        ledger.record_total(EntryKind::ElectricityOther, "Grid (UAE)", 202.05, OutputUnit::Kg).unwrap();
        drop(ledger);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        fs::remove_file(&path).ok();

        assert_eq!(records.len(), 3);
        assert_eq!(&records[0][0], "refrigerant");
        assert_eq!(&records[0][2], "Methane");
        assert_eq!(&records[0][5], "280.0");
        assert_eq!(&records[0][6], "0.28");
        assert_eq!(&records[1][2], " /  / ");
        assert_eq!(&records[1][5], "");
        assert_eq!(&records[2][6], "202.05");
    }

    #[test]
    fn electricity_lines_sum_to_the_scope2_total() {
        let path = std::env::temp_dir().join(format!("carbonforge-electricity-{}.csv", std::process::id()));
        let library = FactorLibrary::builtin();
        let record = ElectricityRecord {
            total_kwh: Some(1000.0),
            grid_pct: Some(60.0),
            other_pct: Some(40.0),
            grid_country: Some("UAE".to_string()),
            other_sources: vec![FuelRow {
                fuel_type: Some("Gaseous fuels".to_string()),
                fuel: Some("Propane".to_string()),
                unit: Some("litres".to_string()),
                quantity: Some(2.0),
                ..Default::default()
            }],
            ..Default::default()
        };
        let (computed, breakdown) =
            crate::electricity::compute_electricity(&record, &library.grid, &library.fuels);

        let mut ledger = EmissionsLedger::new(&path).unwrap();
        ledger.record_electricity(&computed, &breakdown, OutputUnit::Kg).unwrap();
        drop(ledger);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let records: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        fs::remove_file(&path).ok();

        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][2], "Grid (UAE)");
        assert_eq!(&records[1][2], "Other sources (Gaseous fuels / Propane / litres)");
        let sum: f64 = records.iter().map(|r| r[5].parse::<f64>().unwrap()).sum();
        assert!((sum - breakdown.total).abs() < 1e-6);
        // 400 kWh of other sources times the 3.0828 kg the rows emit.
        assert!((breakdown.other - 400.0 * 3.0828).abs() < 1e-6);
    }
}
