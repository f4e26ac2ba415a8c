use crate::{
    factors::{
        epa_vehicle::{co2e_grams, gas_grams, DieselTable, GasolineTable, NonRoadTable},
        table::{FlatTable, ThreeLevelTable, TwoLevelTable},
        HeatSteamTable,
    },
    units::{
        basis_divisor, describe_unit, is_gallon_based, is_mmbtu_based, round6,
        LITRES_PER_GALLON, MMBTU_PER_MMSCF,
    },
};
use carbonforge_schemas::{
    entry::{EntryMeta, FuelRow, MobileFuelRow, RefrigerantRow, Scope3Row, VehicleRow},
    epa_vehicle::{NonRoadRow, OnRoadDieselRow, OnRoadGasolineRow},
    heat_steam::HeatSteamRow,
    units::{Gas, MassBasis, QuantityUnit, UnitDescriptor, VolumeUnit},
};
use tracing::{debug, warn};

/// Largest quantity or distance a row accepts.
pub const MAX_MAGNITUDE: f64 = 999_999_999_999.999_999;

/// Fallback heat and steam factor (kg CO2e per kWh) when a row has no gas factor.
pub const HEAT_DEFAULT_FACTOR: f64 = 0.17355;

/// A row whose `factor` and `emissions` are derived from its other fields.
pub trait EmissionEntry: Clone + PartialEq {
    type Table: ?Sized;

    fn meta(&self) -> &EntryMeta;
    fn meta_mut(&mut self) -> &mut EntryMeta;

    /// The factor for a complete selector chain, `None` otherwise.
    fn resolve_factor(&self, table: &Self::Table) -> Option<f64>;

    fn magnitude(&self) -> Option<f64>;

    /// Magnitude in the unit the factor is expressed per.
    fn effective_magnitude(&self) -> Option<f64> {
        self.magnitude()
    }

    fn unit_descriptor(&self) -> UnitDescriptor {
        UnitDescriptor::default()
    }

    fn factor(&self) -> Option<f64>;
    fn emissions(&self) -> Option<f64>;
    fn set_derived(&mut self, factor: Option<f64>, emissions: Option<f64>);
}

/// A row that accepts single-field edits.
pub trait Editable: EmissionEntry {
    type Edit;

    /// Applies the edit without recomputing derived fields.
    fn apply(&mut self, edit: Self::Edit, table: &Self::Table);
}

/// `round(quantity * factor / basis, 6)`.
pub fn emissions_for(magnitude: f64, factor: f64, descriptor: UnitDescriptor) -> f64 {
    round6(magnitude * factor / basis_divisor(descriptor))
}

/// Re-derives `factor` and `emissions` from the row's selectors and magnitude.
///
/// A magnitude outside `[0, MAX_MAGNITUDE]` is kept as entered but yields no
/// emissions, so rows read from files obey the same range as edited ones.
pub fn recompute<E: EmissionEntry>(mut row: E, table: &E::Table) -> E {
    let factor = row.resolve_factor(table);
    let magnitude = sanitize_magnitude(row.magnitude()).and(row.effective_magnitude());
    let emissions = match (magnitude, factor) {
        (Some(magnitude), Some(factor)) => {
            Some(emissions_for(magnitude, factor, row.unit_descriptor()))
        }
        _ => None,
    };
    debug!(row = %row.meta().id, ?factor, ?emissions, "recomputed row");
    row.set_derived(factor, emissions);
    row
}

/// Applies one edit and recomputes the row.
pub fn update<E: Editable>(mut row: E, edit: E::Edit, table: &E::Table) -> E {
    row.apply(edit, table);
    recompute(row, table)
}

/// Drops magnitudes that are negative, non-finite or above `MAX_MAGNITUDE`.
pub fn sanitize_magnitude(value: Option<f64>) -> Option<f64> {
    match value {
        Some(v) if v.is_finite() && (0.0..=MAX_MAGNITUDE).contains(&v) => Some(v),
        Some(v) => {
            warn!(value = v, "magnitude outside accepted range; leaving it unset");
            None
        }
        None => None,
    }
}

macro_rules! derived_fields {
    () => {
        fn meta(&self) -> &EntryMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut EntryMeta {
            &mut self.meta
        }

        fn factor(&self) -> Option<f64> {
            self.factor
        }

        fn emissions(&self) -> Option<f64> {
            self.emissions
        }

        fn set_derived(&mut self, factor: Option<f64>, emissions: Option<f64>) {
            self.factor = factor;
            self.emissions = emissions;
        }
    };
}

#[derive(Debug, Clone, PartialEq)]
pub enum FuelEdit {
    FuelType(Option<String>),
    Fuel(Option<String>),
    Unit(Option<String>),
    Quantity(Option<f64>),
}

impl EmissionEntry for FuelRow {
    type Table = ThreeLevelTable;

    derived_fields!();

    fn resolve_factor(&self, table: &ThreeLevelTable) -> Option<f64> {
        table.resolve(
            self.fuel_type.as_deref(),
            self.fuel.as_deref(),
            self.unit.as_deref(),
        )
    }

    fn magnitude(&self) -> Option<f64> {
        self.quantity
    }

    fn unit_descriptor(&self) -> UnitDescriptor {
        self.unit.as_deref().map(describe_unit).unwrap_or_default()
    }
}

impl Editable for FuelRow {
    type Edit = FuelEdit;

    fn apply(&mut self, edit: FuelEdit, _table: &ThreeLevelTable) {
        match edit {
            FuelEdit::FuelType(value) => {
                self.fuel_type = value;
                self.fuel = None;
                self.unit = None;
            }
            FuelEdit::Fuel(value) => {
                self.fuel = value;
                self.unit = None;
            }
            FuelEdit::Unit(value) => self.unit = value,
            FuelEdit::Quantity(value) => self.quantity = sanitize_magnitude(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefrigerantEdit {
    RefrigerantType(Option<String>),
    Quantity(Option<f64>),
}

impl EmissionEntry for RefrigerantRow {
    type Table = FlatTable;

    derived_fields!();

    fn resolve_factor(&self, table: &FlatTable) -> Option<f64> {
        table.resolve(self.refrigerant_type.as_deref())
    }

    fn magnitude(&self) -> Option<f64> {
        self.quantity
    }
}

impl Editable for RefrigerantRow {
    type Edit = RefrigerantEdit;

    fn apply(&mut self, edit: RefrigerantEdit, _table: &FlatTable) {
        match edit {
            RefrigerantEdit::RefrigerantType(value) => self.refrigerant_type = value,
            RefrigerantEdit::Quantity(value) => self.quantity = sanitize_magnitude(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VehicleEdit {
    Activity(Option<String>),
    VehicleType(Option<String>),
    Unit(Option<String>),
    Distance(Option<f64>),
}

impl EmissionEntry for VehicleRow {
    type Table = ThreeLevelTable;

    derived_fields!();

    fn resolve_factor(&self, table: &ThreeLevelTable) -> Option<f64> {
        table.resolve(
            self.activity.as_deref(),
            self.vehicle_type.as_deref(),
            self.unit.as_deref(),
        )
    }

    fn magnitude(&self) -> Option<f64> {
        self.distance
    }
}

impl Editable for VehicleRow {
    type Edit = VehicleEdit;

    fn apply(&mut self, edit: VehicleEdit, _table: &ThreeLevelTable) {
        match edit {
            VehicleEdit::Activity(value) => {
                self.activity = value;
                self.vehicle_type = None;
                self.unit = None;
            }
            VehicleEdit::VehicleType(value) => {
                self.vehicle_type = value;
                self.unit = None;
            }
            VehicleEdit::Unit(value) => self.unit = value,
            VehicleEdit::Distance(value) => self.distance = sanitize_magnitude(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MobileFuelEdit {
    /// Also fills the unit from the table.
    FuelType(Option<String>),
    InputUnit(Option<VolumeUnit>),
    Quantity(Option<f64>),
}

impl EmissionEntry for MobileFuelRow {
    type Table = TwoLevelTable;

    derived_fields!();

    fn resolve_factor(&self, table: &TwoLevelTable) -> Option<f64> {
        table.resolve(self.fuel_type.as_deref(), self.unit.as_deref())
    }

    fn magnitude(&self) -> Option<f64> {
        self.quantity
    }

    fn effective_magnitude(&self) -> Option<f64> {
        let quantity = self.quantity?;
        let gallon_base = self.unit.as_deref().is_some_and(is_gallon_based);
        if gallon_base && self.input_unit == Some(VolumeUnit::Liter) {
            Some(quantity / LITRES_PER_GALLON)
        } else {
            Some(quantity)
        }
    }

    fn unit_descriptor(&self) -> UnitDescriptor {
        self.unit.as_deref().map(describe_unit).unwrap_or_default()
    }
}

impl Editable for MobileFuelRow {
    type Edit = MobileFuelEdit;

    fn apply(&mut self, edit: MobileFuelEdit, table: &TwoLevelTable) {
        match edit {
            MobileFuelEdit::FuelType(value) => {
                self.unit = table
                    .children(value.as_deref())
                    .first()
                    .map(|unit| unit.to_string());
                self.input_unit = match self.unit.as_deref() {
                    Some(unit) if is_gallon_based(unit) => Some(VolumeUnit::Gallon),
                    _ => None,
                };
                self.fuel_type = value;
            }
            MobileFuelEdit::InputUnit(value) => self.input_unit = value,
            MobileFuelEdit::Quantity(value) => self.quantity = sanitize_magnitude(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scope3Edit {
    Category(Option<String>),
    /// Free-text description; does not affect the factor.
    Activity(Option<String>),
    Unit(Option<String>),
    Quantity(Option<f64>),
}

impl EmissionEntry for Scope3Row {
    type Table = TwoLevelTable;

    derived_fields!();

    fn resolve_factor(&self, table: &TwoLevelTable) -> Option<f64> {
        table.resolve(self.category.as_deref(), self.unit.as_deref())
    }

    fn magnitude(&self) -> Option<f64> {
        self.quantity
    }
}

impl Editable for Scope3Row {
    type Edit = Scope3Edit;

    fn apply(&mut self, edit: Scope3Edit, _table: &TwoLevelTable) {
        match edit {
            Scope3Edit::Category(value) => {
                self.category = value;
                self.unit = None;
            }
            Scope3Edit::Activity(value) => self.activity = value,
            Scope3Edit::Unit(value) => self.unit = value,
            Scope3Edit::Quantity(value) => self.quantity = sanitize_magnitude(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeatSteamEdit {
    Gas(Gas),
    QuantityUnit(QuantityUnit),
    Quantity(Option<f64>),
}

impl EmissionEntry for HeatSteamRow {
    type Table = HeatSteamTable;

    derived_fields!();

    /// Per-gas factor from the table entry for this activity and unit, then
    /// the row's own factors, then `HEAT_DEFAULT_FACTOR`.
    fn resolve_factor(&self, table: &HeatSteamTable) -> Option<f64> {
        let factors = table
            .get(&self.entry_type)
            .and_then(|units| units.get(&self.unit))
            .unwrap_or(&self.factors);
        let selected = match self.gas {
            Gas::Co2 => factors.co2,
            Gas::Ch4 => factors.ch4,
            Gas::N2o => factors.n2o,
        };
        Some(selected.unwrap_or(HEAT_DEFAULT_FACTOR))
    }

    fn magnitude(&self) -> Option<f64> {
        self.quantity
    }

    fn effective_magnitude(&self) -> Option<f64> {
        let quantity = self.quantity?;
        if self.quantity_unit == QuantityUnit::Mmscf && is_mmbtu_based(&self.unit) {
            Some(quantity * MMBTU_PER_MMSCF)
        } else {
            Some(quantity)
        }
    }

    /// CO2 factors are kg per unit, CH4 and N2O factors are grams per unit.
    fn unit_descriptor(&self) -> UnitDescriptor {
        let basis = match self.gas {
            Gas::Co2 => MassBasis::Kilograms,
            Gas::Ch4 | Gas::N2o => MassBasis::Grams,
        };
        UnitDescriptor {
            gas: self.gas,
            basis,
        }
    }
}

impl Editable for HeatSteamRow {
    type Edit = HeatSteamEdit;

    fn apply(&mut self, edit: HeatSteamEdit, _table: &HeatSteamTable) {
        match edit {
            HeatSteamEdit::Gas(gas) => self.gas = gas,
            HeatSteamEdit::QuantityUnit(unit) => self.quantity_unit = unit,
            HeatSteamEdit::Quantity(value) => self.quantity = sanitize_magnitude(value),
        }
    }
}

const GRAMS_CO2E: UnitDescriptor = UnitDescriptor {
    gas: Gas::Co2,
    basis: MassBasis::Grams,
};

#[derive(Debug, Clone, PartialEq)]
pub enum OnRoadGasolineEdit {
    VehicleType(Option<String>),
    ModelYear(Option<String>),
    Miles(Option<f64>),
}

impl EmissionEntry for OnRoadGasolineRow {
    type Table = GasolineTable;

    derived_fields!();

    /// Grams CO2e per mile.
    fn resolve_factor(&self, table: &GasolineTable) -> Option<f64> {
        table
            .get(self.vehicle_type.as_deref()?)?
            .get(self.model_year.as_deref()?)
            .map(co2e_grams)
    }

    fn magnitude(&self) -> Option<f64> {
        self.miles
    }

    fn unit_descriptor(&self) -> UnitDescriptor {
        GRAMS_CO2E
    }
}

impl Editable for OnRoadGasolineRow {
    type Edit = OnRoadGasolineEdit;

    fn apply(&mut self, edit: OnRoadGasolineEdit, _table: &GasolineTable) {
        match edit {
            OnRoadGasolineEdit::VehicleType(value) => {
                self.vehicle_type = value;
                self.model_year = None;
            }
            OnRoadGasolineEdit::ModelYear(value) => self.model_year = value,
            OnRoadGasolineEdit::Miles(value) => self.miles = sanitize_magnitude(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OnRoadDieselEdit {
    VehicleType(Option<String>),
    FuelType(Option<String>),
    ModelYear(Option<String>),
    Miles(Option<f64>),
}

impl EmissionEntry for OnRoadDieselRow {
    type Table = DieselTable;

    derived_fields!();

    /// Grams CO2e per mile. Pairs listed by year need a matching model year.
    fn resolve_factor(&self, table: &DieselTable) -> Option<f64> {
        table
            .resolve(
                self.vehicle_type.as_deref(),
                self.fuel_type.as_deref(),
                self.model_year.as_deref(),
            )
            .map(co2e_grams)
    }

    fn magnitude(&self) -> Option<f64> {
        self.miles
    }

    fn unit_descriptor(&self) -> UnitDescriptor {
        GRAMS_CO2E
    }
}

impl Editable for OnRoadDieselRow {
    type Edit = OnRoadDieselEdit;

    /// Any edit drops the model year when the selected pair has no year list.
    fn apply(&mut self, edit: OnRoadDieselEdit, table: &DieselTable) {
        match edit {
            OnRoadDieselEdit::VehicleType(value) => {
                self.vehicle_type = value;
                self.fuel_type = None;
                self.model_year = None;
            }
            OnRoadDieselEdit::FuelType(value) => {
                self.fuel_type = value;
                self.model_year = None;
            }
            OnRoadDieselEdit::ModelYear(value) => self.model_year = value,
            OnRoadDieselEdit::Miles(value) => self.miles = sanitize_magnitude(value),
        }
        if !table.needs_model_year(self.vehicle_type.as_deref(), self.fuel_type.as_deref()) {
            self.model_year = None;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NonRoadEdit {
    VehicleType(Option<String>),
    FuelType(Option<String>),
    InputUnit(VolumeUnit),
    Gas(Gas),
    Quantity(Option<f64>),
}

impl EmissionEntry for NonRoadRow {
    type Table = NonRoadTable;

    derived_fields!();

    /// Grams of the selected gas per gallon.
    fn resolve_factor(&self, table: &NonRoadTable) -> Option<f64> {
        table
            .get(self.vehicle_type.as_deref()?)?
            .get(self.fuel_type.as_deref()?)
            .map(|factors| gas_grams(factors, self.gas))
    }

    fn magnitude(&self) -> Option<f64> {
        self.quantity
    }

    fn effective_magnitude(&self) -> Option<f64> {
        let quantity = self.quantity?;
        match self.input_unit {
            VolumeUnit::Gallon => Some(quantity),
            VolumeUnit::Liter => Some(quantity / LITRES_PER_GALLON),
        }
    }

    fn unit_descriptor(&self) -> UnitDescriptor {
        UnitDescriptor {
            gas: self.gas,
            basis: MassBasis::Grams,
        }
    }
}

impl Editable for NonRoadRow {
    type Edit = NonRoadEdit;

    fn apply(&mut self, edit: NonRoadEdit, _table: &NonRoadTable) {
        match edit {
            NonRoadEdit::VehicleType(value) => {
                self.vehicle_type = value;
                self.fuel_type = None;
            }
            NonRoadEdit::FuelType(value) => self.fuel_type = value,
            NonRoadEdit::InputUnit(unit) => self.input_unit = unit,
            NonRoadEdit::Gas(gas) => self.gas = gas,
            NonRoadEdit::Quantity(value) => self.quantity = sanitize_magnitude(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::FactorLibrary;
    use carbonforge_schemas::heat_steam::GasFactors;

    fn lib() -> &'static FactorLibrary {
        FactorLibrary::builtin()
    }

    fn s(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn propane_in_litres() {
        let row = FuelRow {
            fuel_type: s("Gaseous fuels"),
            fuel: s("Propane"),
            unit: s("litres"),
            quantity: Some(100.0),
            ..Default::default()
        };
        let row = recompute(row, &lib().fuels);
        assert_eq!(row.factor, Some(1.5414));
        assert_eq!(row.emissions, Some(154.14));
    }

    #[test]
    fn methane_refrigerant_uses_gwp() {
        let row = RefrigerantRow {
            refrigerant_type: s("Methane"),
            quantity: Some(10.0),
            ..Default::default()
        };
        let row = recompute(row, &lib().refrigerants);
        assert_eq!(row.factor, Some(28.0));
        assert_eq!(row.emissions, Some(280.0));
    }

    #[test]
    fn mini_car_by_km() {
        let row = VehicleRow {
            activity: s("Cars (by market segment)"),
            vehicle_type: s("Mini"),
            unit: s("km"),
            distance: Some(50.0),
            ..Default::default()
        };
        let row = recompute(row, &lib().vehicles);
        assert_eq!(row.factor, Some(0.10828));
        assert_eq!(row.emissions, Some(5.414));
    }

    #[test]
    fn incomplete_row_has_no_factor() {
        let row = FuelRow {
            fuel_type: s("Gaseous fuels"),
            quantity: Some(100.0),
            factor: Some(1.0),
            emissions: Some(100.0),
            ..Default::default()
        };
        let row = recompute(row, &lib().fuels);
        assert_eq!(row.factor, None);
        assert_eq!(row.emissions, None);
    }

    #[test]
    fn upstream_edit_clears_downstream_selectors() {
        let table = &lib().fuels;
        let row = FuelRow::default();
        let row = update(row, FuelEdit::FuelType(s("Gaseous fuels")), table);
        let row = update(row, FuelEdit::Fuel(s("Propane")), table);
        let row = update(row, FuelEdit::Unit(s("litres")), table);
        let row = update(row, FuelEdit::Quantity(Some(10.0)), table);
        assert_eq!(row.emissions, Some(15.414));

        let row = update(row, FuelEdit::Fuel(s("Butane")), table);
        assert_eq!(row.unit, None);
        assert_eq!(row.factor, None);
        assert_eq!(row.emissions, None);
        assert_eq!(row.quantity, Some(10.0));
    }

    #[test]
    fn out_of_range_magnitudes_are_dropped() {
        let table = &lib().refrigerants;
        let row = RefrigerantRow {
            refrigerant_type: s("Methane"),
            ..Default::default()
        };
        for bad in [-1.0, f64::INFINITY, f64::NAN, 1e13] {
            let updated = update(row.clone(), RefrigerantEdit::Quantity(Some(bad)), table);
            assert_eq!(updated.quantity, None);
            assert_eq!(updated.emissions, None);
        }
        let updated = update(row, RefrigerantEdit::Quantity(Some(MAX_MAGNITUDE)), table);
        assert_eq!(updated.quantity, Some(MAX_MAGNITUDE));
    }

    #[test]
    fn mobile_fuel_fills_unit_and_converts_litres() {
        let table = &lib().mobile;
        let row = update(
            MobileFuelRow::default(),
            MobileFuelEdit::FuelType(s("Motor Gasoline")),
            table,
        );
        assert_eq!(row.unit.as_deref(), Some("gallon"));
        assert_eq!(row.input_unit, Some(VolumeUnit::Gallon));

        let row = update(row, MobileFuelEdit::Quantity(Some(378.541)), table);
        assert_eq!(row.emissions, Some(round6(378.541 * 8.78)));

        let row = update(row, MobileFuelEdit::InputUnit(Some(VolumeUnit::Liter)), table);
        assert_eq!(row.emissions, Some(round6(100.0 * 8.78)));
    }

    #[test]
    fn gram_based_units_divide_by_thousand() {
        let mut table = ThreeLevelTable::new();
        table
            .entry_or_default("Non-road")
            .entry_or_default("Diesel equipment")
            .insert("g CH4 / gallon", 0.57)
            .unwrap();
        let row = FuelRow {
            fuel_type: s("Non-road"),
            fuel: s("Diesel equipment"),
            unit: s("g CH4 / gallon"),
            quantity: Some(1000.0),
            ..Default::default()
        };
        let row = recompute(row, &table);
        assert_eq!(row.emissions, Some(0.57));
    }

    #[test]
    fn out_of_range_rows_from_files_have_no_emissions() {
        let rows: Vec<FuelRow> = serde_yaml::from_str(
            "- fuel_type: Gaseous fuels\n  fuel: Propane\n  unit: litres\n  quantity: -100\n\
             - fuel_type: Gaseous fuels\n  fuel: Propane\n  unit: litres\n  quantity: 1.0e15\n",
        )
        .unwrap();
        for row in rows {
            let row = recompute(row, &lib().fuels);
            assert_eq!(row.factor, Some(1.5414));
            assert_eq!(row.emissions, None);
        }
    }

    #[test]
    fn on_road_gasoline_folds_trace_gases_into_co2e() {
        let table = &lib().on_road_gasoline;
        let row = update(
            OnRoadGasolineRow::default(),
            OnRoadGasolineEdit::VehicleType(s("Passenger Cars")),
            table,
        );
        let row = update(row, OnRoadGasolineEdit::ModelYear(s("2015-2021")), table);
        let row = update(row, OnRoadGasolineEdit::Miles(Some(10_000.0)), table);

        let per_mile = 0.0070 * 28.0 + 0.0012 * 265.0;
        assert!((row.factor.unwrap() - per_mile).abs() < 1e-12);
        assert_eq!(row.emissions, Some(round6(10_000.0 * per_mile / 1000.0)));

        let row = update(row, OnRoadGasolineEdit::VehicleType(s("Motorcycles")), table);
        assert_eq!(row.model_year, None);
        assert_eq!(row.emissions, None);
        assert_eq!(row.miles, Some(10_000.0));
    }

    #[test]
    fn on_road_diesel_requires_a_year_only_when_listed() {
        let table = &lib().on_road_diesel;
        let row = update(
            OnRoadDieselRow::default(),
            OnRoadDieselEdit::VehicleType(s("Passenger Cars")),
            table,
        );
        let row = update(row, OnRoadDieselEdit::FuelType(s("Diesel")), table);
        let row = update(row, OnRoadDieselEdit::Miles(Some(500.0)), table);
        assert_eq!(row.factor, None);

        let row = update(row, OnRoadDieselEdit::ModelYear(s("2007-2021")), table);
        let per_mile = 0.0302 * 28.0 + 0.0192 * 265.0;
        assert_eq!(row.emissions, Some(round6(500.0 * per_mile / 1000.0)));

        let row = update(row, OnRoadDieselEdit::VehicleType(s("Buses")), table);
        let row = update(row, OnRoadDieselEdit::FuelType(s("CNG")), table);
        let row = update(row, OnRoadDieselEdit::ModelYear(s("2007-2021")), table);
        assert_eq!(row.model_year, None);
        let per_mile = 2.4280 * 28.0 + 0.0390 * 265.0;
        assert_eq!(row.emissions, Some(round6(500.0 * per_mile / 1000.0)));
    }

    #[test]
    fn non_road_reports_the_selected_gas() {
        let table = &lib().non_road;
        let row = NonRoadRow {
            vehicle_type: s("Construction/Mining Equipment"),
            fuel_type: s("Diesel"),
            quantity: Some(1000.0),
            ..Default::default()
        };
        let ch4 = recompute(row, table);
        assert_eq!(ch4.factor, Some(0.57));
        assert_eq!(ch4.emissions, Some(0.57));

        let n2o = update(ch4, NonRoadEdit::Gas(Gas::N2o), table);
        assert_eq!(n2o.emissions, Some(0.26));

        let litres = update(n2o, NonRoadEdit::InputUnit(VolumeUnit::Liter), table);
        assert_eq!(litres.emissions, Some(round6(1000.0 / LITRES_PER_GALLON * 0.26 / 1000.0)));

        let cleared = update(litres, NonRoadEdit::VehicleType(s("Locomotives")), table);
        assert_eq!(cleared.fuel_type, None);
        assert_eq!(cleared.emissions, None);

        // The table lists no CO2 for non-road equipment.
        let co2 = update(
            update(cleared, NonRoadEdit::FuelType(s("Diesel")), table),
            NonRoadEdit::Gas(Gas::Co2),
            table,
        );
        assert_eq!(co2.factor, Some(0.0));
        assert_eq!(co2.emissions, Some(0.0));
    }

    fn heat_row(gas: Gas, quantity_unit: QuantityUnit) -> HeatSteamRow {
        HeatSteamRow {
            meta: EntryMeta::new(),
            entry_type: "Onsite heat and steam".to_string(),
            unit: "mmBtu".to_string(),
            gas,
            quantity_unit,
            quantity: Some(2.0),
            factors: GasFactors::default(),
            factor: None,
            emissions: None,
        }
    }

    #[test]
    fn heat_and_steam_gases() {
        let table = &lib().heat_steam;
        let co2 = recompute(heat_row(Gas::Co2, QuantityUnit::Base), table);
        assert_eq!(co2.factor, Some(66.33));
        assert_eq!(co2.emissions, Some(132.66));

        let ch4 = recompute(heat_row(Gas::Ch4, QuantityUnit::Base), table);
        assert_eq!(ch4.emissions, Some(0.0025));

        let mmscf = recompute(heat_row(Gas::Co2, QuantityUnit::Mmscf), table);
        assert_eq!(mmscf.emissions, Some(round6(2.0 * 1037.0 * 66.33)));
    }

    #[test]
    fn heat_and_steam_falls_back_without_factors() {
        let mut row = heat_row(Gas::N2o, QuantityUnit::Mmscf);
        row.entry_type = "Purchased steam".to_string();
        row.unit = "kWh".to_string();
        let row = recompute(row, &HeatSteamTable::new());
        assert_eq!(row.factor, Some(HEAT_DEFAULT_FACTOR));
        // kWh rows take no MMSCF conversion.
        assert_eq!(row.emissions, Some(round6(2.0 * HEAT_DEFAULT_FACTOR / 1000.0)));
    }
}
