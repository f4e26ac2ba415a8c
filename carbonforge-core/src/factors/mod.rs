pub mod builder;
mod defaults;
pub mod epa_vehicle;
pub mod table;

use carbonforge_schemas::heat_steam::GasFactors;
use epa_vehicle::{DieselTable, GasolineTable, NonRoadTable};
use std::sync::OnceLock;
use table::{FlatTable, Level, ThreeLevelTable, TwoLevelTable};

/// `Activity -> Unit -> per-gas factors`.
pub type HeatSteamTable = Level<Level<GasFactors>>;

/// Every factor table the calculators read from. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorLibrary {
    pub fuels: ThreeLevelTable,
    pub refrigerants: FlatTable,
    pub vehicles: ThreeLevelTable,
    pub delivery_vehicles: ThreeLevelTable,
    pub grid: FlatTable,
    pub mobile: TwoLevelTable,
    pub on_road_gasoline: GasolineTable,
    pub on_road_diesel: DieselTable,
    pub non_road: NonRoadTable,
    pub heat_steam: HeatSteamTable,
    pub scope3: TwoLevelTable,
}

impl FactorLibrary {
    /// The built-in tables, constructed once per process.
    pub fn builtin() -> &'static FactorLibrary {
        static BUILTIN: OnceLock<FactorLibrary> = OnceLock::new();
        BUILTIN.get_or_init(defaults::library)
    }
}
