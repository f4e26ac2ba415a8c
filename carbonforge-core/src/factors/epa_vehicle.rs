use super::table::Level;
use crate::units::{GWP_CH4, GWP_N2O};
use carbonforge_schemas::{epa_vehicle::VehicleGasFactors, units::Gas};

/// `Vehicle type -> Model year -> factors` (on-road gasoline, g per mile).
pub type GasolineTable = Level<Level<VehicleGasFactors>>;

/// `Vehicle type -> Fuel type -> factors` (non-road, g per gallon).
pub type NonRoadTable = Level<Level<VehicleGasFactors>>;

/// `Vehicle type -> Fuel type -> model years` (on-road diesel and alternative fuel).
pub type DieselTable = Level<Level<YearFactors>>;

/// Factors for one vehicle and fuel pair.
///
/// When any year is listed, a model year must be chosen and matched exactly.
/// Otherwise the pair has a single year-independent factor set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct YearFactors {
    pub any_year: Option<VehicleGasFactors>,
    pub by_year: Level<VehicleGasFactors>,
}

impl YearFactors {
    pub fn needs_model_year(&self) -> bool {
        !self.by_year.is_empty()
    }

    pub fn resolve(&self, model_year: Option<&str>) -> Option<&VehicleGasFactors> {
        if self.needs_model_year() {
            self.by_year.get(model_year?)
        } else {
            self.any_year.as_ref()
        }
    }
}

impl DieselTable {
    fn pair(&self, vehicle: Option<&str>, fuel: Option<&str>) -> Option<&YearFactors> {
        self.get(vehicle?)?.get(fuel?)
    }

    /// Whether the selected pair is listed by model year. `false` until both are set.
    pub fn needs_model_year(&self, vehicle: Option<&str>, fuel: Option<&str>) -> bool {
        self.pair(vehicle, fuel)
            .is_some_and(YearFactors::needs_model_year)
    }

    /// Sorted model years for the selected pair.
    pub fn model_years(&self, vehicle: Option<&str>, fuel: Option<&str>) -> Vec<&str> {
        self.pair(vehicle, fuel)
            .map(|pair| pair.by_year.keys())
            .unwrap_or_default()
    }

    pub fn resolve(
        &self,
        vehicle: Option<&str>,
        fuel: Option<&str>,
        model_year: Option<&str>,
    ) -> Option<&VehicleGasFactors> {
        self.pair(vehicle, fuel)?.resolve(model_year)
    }
}

/// Grams CO2e per unit: the direct CO2e factor when present, otherwise
/// `CO2 + CH4 * 28 + N2O * 265` with missing gases counted as zero.
pub fn co2e_grams(factors: &VehicleGasFactors) -> f64 {
    factors.co2e.unwrap_or_else(|| {
        factors.co2.unwrap_or(0.0)
            + factors.ch4.unwrap_or(0.0) * GWP_CH4
            + factors.n2o.unwrap_or(0.0) * GWP_N2O
    })
}

/// Grams of a single gas per unit, zero when the table has no value for it.
pub fn gas_grams(factors: &VehicleGasFactors, gas: Gas) -> f64 {
    let value = match gas {
        Gas::Co2 => factors.co2,
        Gas::Ch4 => factors.ch4,
        Gas::N2o => factors.n2o,
    };
    value.unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors(co2e: Option<f64>, ch4: f64, n2o: f64) -> VehicleGasFactors {
        VehicleGasFactors {
            co2e,
            co2: None,
            ch4: Some(ch4),
            n2o: Some(n2o),
        }
    }

    #[test]
    fn co2e_prefers_the_direct_factor() {
        assert_eq!(co2e_grams(&factors(Some(350.0), 1.0, 1.0)), 350.0);
        let combined = co2e_grams(&factors(None, 0.01, 0.002));
        assert!((combined - (0.01 * 28.0 + 0.002 * 265.0)).abs() < 1e-12);
        assert_eq!(co2e_grams(&VehicleGasFactors::default()), 0.0);
    }

    #[test]
    fn year_listed_pairs_need_an_exact_year() {
        let mut table = DieselTable::new();
        let pair = table
            .entry_or_default("Passenger Cars")
            .entry_or_default("Diesel");
        pair.by_year.put("1983-2006", factors(None, 0.0005, 0.001));
        pair.by_year.put("2007-2018", factors(None, 0.0302, 0.0192));
        table
            .entry_or_default("Light-Duty Cars")
            .entry_or_default("CNG")
            .any_year = Some(factors(None, 0.085, 0.0032));

        let cars = (Some("Passenger Cars"), Some("Diesel"));
        assert!(table.needs_model_year(cars.0, cars.1));
        assert_eq!(table.model_years(cars.0, cars.1), vec!["1983-2006", "2007-2018"]);
        assert_eq!(table.resolve(cars.0, cars.1, None), None);
        assert_eq!(table.resolve(cars.0, cars.1, Some("2020")), None);
        assert!(table.resolve(cars.0, cars.1, Some("2007-2018")).is_some());

        assert!(!table.needs_model_year(Some("Light-Duty Cars"), Some("CNG")));
        assert!(table.resolve(Some("Light-Duty Cars"), Some("CNG"), Some("2007-2018")).is_some());
        assert!(!table.needs_model_year(Some("Light-Duty Cars"), None));
    }
}
