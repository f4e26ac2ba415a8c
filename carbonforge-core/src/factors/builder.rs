use super::{
    epa_vehicle::{DieselTable, GasolineTable, NonRoadTable},
    table::{is_valid_factor, FlatTable, ThreeLevelTable, TwoLevelTable},
    FactorLibrary, HeatSteamTable,
};
use crate::error::CarbonforgeError;
use carbonforge_schemas::{
    epa_vehicle::VehicleGasFactors,
    file_formats::{
        EpaVehicleFactorRecord, FuelFactorRecord, GridFactorRecord, HeatSteamFactorRecord,
        MobileCombustionRecord, RefrigerantFactorRecord, VehicleFactorRecord,
    },
    heat_steam::GasFactors,
};
use tracing::{debug, warn};

pub const UNIT_MMBTU: &str = "mmBtu";
pub const UNIT_SHORT_TON: &str = "short ton";
pub const UNIT_GALLON: &str = "gallon";
pub const UNIT_MMSCF: &str = "MMSCF";

const SCF_PER_MMSCF: f64 = 1_000_000.0;

/// A fluent builder for a `FactorLibrary`.
///
/// Starts from the built-in tables; each kind of record that is supplied
/// replaces the corresponding built-in table as a whole.
#[derive(Default)]
pub struct FactorLibraryBuilder {
    fuels: Vec<FuelFactorRecord>,
    refrigerants: Vec<RefrigerantFactorRecord>,
    vehicles: Vec<VehicleFactorRecord>,
    delivery_vehicles: Vec<VehicleFactorRecord>,
    grid: Vec<GridFactorRecord>,
    mobile: Vec<MobileCombustionRecord>,
    heat_steam: Vec<HeatSteamFactorRecord>,
    on_road_gasoline: Vec<EpaVehicleFactorRecord>,
    on_road_diesel: Vec<EpaVehicleFactorRecord>,
    non_road: Vec<EpaVehicleFactorRecord>,
}

impl FactorLibraryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fuels(mut self, records: Vec<FuelFactorRecord>) -> Self {
        self.fuels = records;
        self
    }

    pub fn with_refrigerants(mut self, records: Vec<RefrigerantFactorRecord>) -> Self {
        self.refrigerants = records;
        self
    }

    pub fn with_vehicles(mut self, records: Vec<VehicleFactorRecord>) -> Self {
        self.vehicles = records;
        self
    }

    pub fn with_delivery_vehicles(mut self, records: Vec<VehicleFactorRecord>) -> Self {
        self.delivery_vehicles = records;
        self
    }

    pub fn with_grid(mut self, records: Vec<GridFactorRecord>) -> Self {
        self.grid = records;
        self
    }

    pub fn with_mobile(mut self, records: Vec<MobileCombustionRecord>) -> Self {
        self.mobile = records;
        self
    }

    pub fn with_heat_steam(mut self, records: Vec<HeatSteamFactorRecord>) -> Self {
        self.heat_steam = records;
        self
    }

    pub fn with_on_road_gasoline(mut self, records: Vec<EpaVehicleFactorRecord>) -> Self {
        self.on_road_gasoline = records;
        self
    }

    pub fn with_on_road_diesel(mut self, records: Vec<EpaVehicleFactorRecord>) -> Self {
        self.on_road_diesel = records;
        self
    }

    pub fn with_non_road(mut self, records: Vec<EpaVehicleFactorRecord>) -> Self {
        self.non_road = records;
        self
    }

    /// Consumes the builder and returns the assembled library.
    ///
    /// # Errors
    ///
    /// Returns `MalformedFactorTable` if any supplied factor is negative or not finite.
    pub fn build(self) -> Result<FactorLibrary, CarbonforgeError> {
        let mut library = FactorLibrary::builtin().clone();

        if !self.fuels.is_empty() {
            library.fuels = build_fuel_table(&self.fuels)?;
        }
        if !self.refrigerants.is_empty() {
            library.refrigerants = build_flat_table(
                self.refrigerants.iter().map(|r| (r.refrigerant.as_str(), r.gwp)),
            )?;
        }
        if !self.vehicles.is_empty() {
            library.vehicles = build_vehicle_table(&self.vehicles)?;
        }
        if !self.delivery_vehicles.is_empty() {
            library.delivery_vehicles = build_vehicle_table(&self.delivery_vehicles)?;
        }
        if !self.grid.is_empty() {
            library.grid =
                build_flat_table(self.grid.iter().map(|r| (r.country.as_str(), r.factor)))?;
        }
        if !self.mobile.is_empty() {
            library.mobile = build_mobile_table(&self.mobile)?;
        }
        if !self.heat_steam.is_empty() {
            library.heat_steam = build_heat_steam_table(&self.heat_steam)?;
        }
        if !self.on_road_gasoline.is_empty() {
            library.on_road_gasoline = build_gasoline_table(&self.on_road_gasoline)?;
        }
        if !self.on_road_diesel.is_empty() {
            library.on_road_diesel = build_diesel_table(&self.on_road_diesel)?;
        }
        if !self.non_road.is_empty() {
            library.non_road = build_non_road_table(&self.non_road)?;
        }

        Ok(library)
    }
}

fn with_path(err: CarbonforgeError, prefix: &str) -> CarbonforgeError {
    match err {
        CarbonforgeError::MalformedFactorTable { path, reason } => {
            CarbonforgeError::MalformedFactorTable {
                path: format!("{}/{}", prefix, path),
                reason,
            }
        }
        other => other,
    }
}

/// Builds the fuel table from source records.
///
/// A record may carry several unit families. When two records describe the
/// same fuel, the first one seen keeps every unit it populated and later
/// records only fill units still missing. The `MMSCF` family is derived from
/// the per-mmBtu factor and the heat content in mmBtu per scf.
pub fn build_fuel_table(records: &[FuelFactorRecord]) -> Result<ThreeLevelTable, CarbonforgeError> {
    let mut table = ThreeLevelTable::new();

    for record in records {
        let prefix = format!("{}/{}", record.category, record.fuel);
        let units = table
            .entry_or_default(&record.category)
            .entry_or_default(&record.fuel);

        let mut families: Vec<(&str, f64)> = Vec::new();
        if let (Some(unit), Some(factor)) = (record.unit.as_deref(), record.factor) {
            families.push((unit, factor));
        }
        if let Some(factor) = record.kg_co2_per_mmbtu {
            families.push((UNIT_MMBTU, factor));
        }
        if let Some(factor) = record.kg_co2_per_short_ton {
            families.push((UNIT_SHORT_TON, factor));
        }
        if let Some(factor) = record.kg_co2_per_gallon {
            families.push((UNIT_GALLON, factor));
        }
        if let Some(factor) = derive_mmscf(record) {
            families.push((UNIT_MMSCF, factor));
        }

        for (unit, factor) in families {
            let added = units
                .insert_if_absent(unit, factor)
                .map_err(|e| with_path(e, &prefix))?;
            if !added {
                debug!(fuel = %record.fuel, unit, "unit already populated by an earlier record");
            }
        }
    }

    Ok(table)
}

fn derive_mmscf(record: &FuelFactorRecord) -> Option<f64> {
    let per_mmbtu = record.kg_co2_per_mmbtu?;
    let heat_content = record.heat_content.as_ref()?;
    let unit = heat_content.unit.to_lowercase().replace(' ', "");
    if unit != "mmbtu/scf" {
        warn!(
            fuel = %record.fuel,
            unit = %heat_content.unit,
            "heat content must be given in mmBtu/scf; skipping MMSCF factor"
        );
        return None;
    }
    Some(per_mmbtu * heat_content.value * SCF_PER_MMSCF)
}

fn build_flat_table<'a, I>(pairs: I) -> Result<FlatTable, CarbonforgeError>
where
    I: Iterator<Item = (&'a str, f64)>,
{
    let mut table = FlatTable::new();
    for (key, factor) in pairs {
        table.insert(key, factor)?;
    }
    Ok(table)
}

fn build_vehicle_table(records: &[VehicleFactorRecord]) -> Result<ThreeLevelTable, CarbonforgeError> {
    let mut table = ThreeLevelTable::new();
    for record in records {
        let prefix = format!("{}/{}", record.activity, record.vehicle_type);
        table
            .entry_or_default(&record.activity)
            .entry_or_default(&record.vehicle_type)
            .insert_if_absent(&record.unit, record.factor)
            .map_err(|e| with_path(e, &prefix))?;
    }
    Ok(table)
}

fn build_mobile_table(records: &[MobileCombustionRecord]) -> Result<TwoLevelTable, CarbonforgeError> {
    let mut table = TwoLevelTable::new();
    for record in records {
        table
            .entry_or_default(&record.fuel_type)
            .insert_if_absent(&record.unit, record.kg_co2_per_unit)
            .map_err(|e| with_path(e, &record.fuel_type))?;
    }
    Ok(table)
}

fn build_heat_steam_table(records: &[HeatSteamFactorRecord]) -> Result<HeatSteamTable, CarbonforgeError> {
    let mut table = HeatSteamTable::new();
    for record in records {
        check_gas_factors(&record.factors).map_err(|reason| {
            CarbonforgeError::MalformedFactorTable {
                path: format!("{}/{}", record.activity, record.unit),
                reason,
            }
        })?;
        table
            .entry_or_default(&record.activity)
            .put(&record.unit, record.factors.clone());
    }
    Ok(table)
}

fn check_gas_factors(factors: &GasFactors) -> Result<(), String> {
    for (gas, value) in [("co2", factors.co2), ("ch4", factors.ch4), ("n2o", factors.n2o)] {
        if let Some(v) = value {
            if !is_valid_factor(v) {
                return Err(format!("{} factor {} is not a non-negative finite number", gas, v));
            }
        }
    }
    Ok(())
}

/// Usable factors for an EPA vehicle record, `None` when it has none at all.
fn vehicle_factors(
    record: &EpaVehicleFactorRecord,
    path: &str,
) -> Result<Option<VehicleGasFactors>, CarbonforgeError> {
    if let Some((gas, value)) = record.factors.populated().find(|(_, v)| !is_valid_factor(*v)) {
        return Err(CarbonforgeError::MalformedFactorTable {
            path: path.to_string(),
            reason: format!("{} factor {} is not a non-negative finite number", gas, value),
        });
    }
    if record.factors.is_empty() {
        warn!(path, "EPA vehicle record has no factors; skipping");
        return Ok(None);
    }
    Ok(Some(record.factors.clone()))
}

/// On-road gasoline: records without a model year are skipped; the first
/// record for a vehicle and year wins.
pub fn build_gasoline_table(records: &[EpaVehicleFactorRecord]) -> Result<GasolineTable, CarbonforgeError> {
    let mut table = GasolineTable::new();
    for record in records {
        let Some(year) = record.model_year.as_deref() else {
            warn!(vehicle = %record.vehicle_type, "on-road gasoline record has no model year; skipping");
            continue;
        };
        let path = format!("{}/{}", record.vehicle_type, year);
        let Some(factors) = vehicle_factors(record, &path)? else {
            continue;
        };
        let years = table.entry_or_default(&record.vehicle_type);
        if !years.contains(year) {
            years.put(year, factors);
        }
    }
    Ok(table)
}

/// On-road diesel and alternative fuel: records without a fuel type are
/// skipped. Records with a model year populate the by-year list; the first
/// record without one becomes the pair's year-independent factors.
pub fn build_diesel_table(records: &[EpaVehicleFactorRecord]) -> Result<DieselTable, CarbonforgeError> {
    let mut table = DieselTable::new();
    for record in records {
        let Some(fuel) = record.fuel_type.as_deref() else {
            warn!(vehicle = %record.vehicle_type, "on-road diesel record has no fuel type; skipping");
            continue;
        };
        let path = format!(
            "{}/{}/{}",
            record.vehicle_type,
            fuel,
            record.model_year.as_deref().unwrap_or("")
        );
        let Some(factors) = vehicle_factors(record, &path)? else {
            continue;
        };
        let pair = table
            .entry_or_default(&record.vehicle_type)
            .entry_or_default(fuel);
        match record.model_year.as_deref() {
            Some(year) if !pair.by_year.contains(year) => pair.by_year.put(year, factors),
            Some(_) => debug!(path = %path, "model year already populated by an earlier record"),
            None if pair.any_year.is_none() => pair.any_year = Some(factors),
            None => debug!(path = %path, "pair already populated by an earlier record"),
        }
    }
    Ok(table)
}

/// Non-road: records without a fuel type are skipped; the first record for a
/// vehicle and fuel wins.
pub fn build_non_road_table(records: &[EpaVehicleFactorRecord]) -> Result<NonRoadTable, CarbonforgeError> {
    let mut table = NonRoadTable::new();
    for record in records {
        let Some(fuel) = record.fuel_type.as_deref() else {
            warn!(vehicle = %record.vehicle_type, "non-road record has no fuel type; skipping");
            continue;
        };
        let path = format!("{}/{}", record.vehicle_type, fuel);
        let Some(factors) = vehicle_factors(record, &path)? else {
            continue;
        };
        let fuels = table.entry_or_default(&record.vehicle_type);
        if !fuels.contains(fuel) {
            fuels.put(fuel, factors);
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbonforge_schemas::measurement::Measurement;

    fn record(fuel: &str) -> FuelFactorRecord {
        FuelFactorRecord {
            category: "Natural Gas".to_string(),
            fuel: fuel.to_string(),
            unit: None,
            factor: None,
            kg_co2_per_mmbtu: None,
            kg_co2_per_short_ton: None,
            kg_co2_per_gallon: None,
            heat_content: None,
        }
    }

    #[test]
    fn derives_mmscf_from_heat_content() {
        let mut natural_gas = record("Natural Gas");
        natural_gas.kg_co2_per_mmbtu = Some(53.06);
        natural_gas.heat_content = Some(Measurement::new(0.001026, "mmBtu/scf"));

        let table = build_fuel_table(&[natural_gas]).unwrap();
        let mmscf = table
            .resolve(Some("Natural Gas"), Some("Natural Gas"), Some(UNIT_MMSCF))
            .unwrap();
        assert!((mmscf - 53.06 * 0.001026 * 1_000_000.0).abs() < 1e-9);
        assert_eq!(
            table.resolve(Some("Natural Gas"), Some("Natural Gas"), Some(UNIT_MMBTU)),
            Some(53.06)
        );
    }

    #[test]
    fn first_record_wins_per_unit() {
        let mut first = record("Propane");
        first.kg_co2_per_mmbtu = Some(62.87);
        let mut second = record("Propane");
        second.kg_co2_per_mmbtu = Some(99.0);
        second.kg_co2_per_gallon = Some(5.72);

        let table = build_fuel_table(&[first, second]).unwrap();
        assert_eq!(
            table.resolve(Some("Natural Gas"), Some("Propane"), Some(UNIT_MMBTU)),
            Some(62.87)
        );
        assert_eq!(
            table.resolve(Some("Natural Gas"), Some("Propane"), Some(UNIT_GALLON)),
            Some(5.72)
        );
    }

    #[test]
    fn negative_factor_reports_its_path() {
        let mut bad = record("Ethane");
        bad.kg_co2_per_short_ton = Some(-1.0);
        match build_fuel_table(&[bad]).unwrap_err() {
            CarbonforgeError::MalformedFactorTable { path, .. } => {
                assert_eq!(path, "Natural Gas/Ethane/short ton")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn epa(vehicle: &str, fuel: Option<&str>, year: Option<&str>, ch4: f64) -> EpaVehicleFactorRecord {
        EpaVehicleFactorRecord {
            vehicle_type: vehicle.to_string(),
            fuel_type: fuel.map(str::to_string),
            model_year: year.map(str::to_string),
            factors: VehicleGasFactors {
                ch4: Some(ch4),
                ..Default::default()
            },
        }
    }

    #[test]
    fn diesel_records_split_by_model_year() {
        let records = vec![
            epa("Passenger Cars", Some("Diesel"), Some("2007-2018"), 0.03),
            epa("Passenger Cars", Some("Diesel"), Some("2007-2018"), 9.0),
            epa("Buses", Some("CNG"), None, 2.4),
            epa("Buses", None, None, 1.0),
        ];
        let table = build_diesel_table(&records).unwrap();
        let cars = table
            .resolve(Some("Passenger Cars"), Some("Diesel"), Some("2007-2018"))
            .unwrap();
        assert_eq!(cars.ch4, Some(0.03));
        assert!(!table.needs_model_year(Some("Buses"), Some("CNG")));
        assert_eq!(table.get("Buses").map(|fuels| fuels.len()), Some(1));
    }

    #[test]
    fn epa_records_without_factors_or_keys_are_skipped() {
        let mut empty = epa("Motorcycles", None, Some("2000"), 0.0);
        empty.factors = VehicleGasFactors::default();
        let records = vec![empty, epa("Motorcycles", None, None, 0.06)];
        assert!(build_gasoline_table(&records).unwrap().is_empty());

        let mut bad = epa("Locomotives", Some("Diesel"), None, 0.8);
        bad.factors.n2o = Some(-0.26);
        match build_non_road_table(&[bad]).unwrap_err() {
            CarbonforgeError::MalformedFactorTable { path, reason } => {
                assert_eq!(path, "Locomotives/Diesel");
                assert!(reason.starts_with("n2o"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn supplied_records_replace_only_their_table() {
        let library = FactorLibraryBuilder::new()
            .with_grid(vec![GridFactorRecord {
                country: "India".to_string(),
                factor: 0.708,
            }])
            .build()
            .unwrap();
        assert_eq!(library.grid.resolve(Some("India")), Some(0.708));
        assert_eq!(library.grid.resolve(Some("UAE")), None);
        assert_eq!(library.refrigerants, FactorLibrary::builtin().refrigerants);
    }
}
