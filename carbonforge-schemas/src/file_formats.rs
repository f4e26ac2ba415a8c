use crate::{
    assessment::EsgAssessment,
    electricity::ElectricityRecord,
    entry::{FuelRow, MobileFuelRow, RefrigerantRow, Scope3Row, VehicleRow},
    epa_vehicle::{model_year, NonRoadRow, OnRoadDieselRow, OnRoadGasolineRow, VehicleGasFactors},
    esg::EsgScores,
    heat_steam::{GasFactors, HeatSteamRow},
    measurement::Measurement,
    units::OutputUnit,
};
use serde::Deserialize;

/// One source row of fuel combustion factors. A record may carry several unit
/// families at once; `unit`/`factor` is a single explicit pair.
#[derive(Debug, Clone, Deserialize)]
pub struct FuelFactorRecord {
    pub category: String,
    pub fuel: String,
    pub unit: Option<String>,
    pub factor: Option<f64>,
    pub kg_co2_per_mmbtu: Option<f64>,
    pub kg_co2_per_short_ton: Option<f64>,
    pub kg_co2_per_gallon: Option<f64>,
    pub heat_content: Option<Measurement<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct FuelFactorFile {
    pub schema_version: String,
    pub fuels: Vec<FuelFactorRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefrigerantFactorRecord {
    pub refrigerant: String,
    pub gwp: f64,
}

#[derive(Debug, Deserialize)]
pub struct RefrigerantFactorFile {
    pub schema_version: String,
    pub refrigerants: Vec<RefrigerantFactorRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VehicleFactorRecord {
    pub activity: String,
    pub vehicle_type: String,
    pub unit: String,
    pub factor: f64,
}

#[derive(Debug, Deserialize)]
pub struct VehicleFactorFile {
    pub schema_version: String,
    pub vehicles: Vec<VehicleFactorRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridFactorRecord {
    pub country: String,
    pub factor: f64,
}

#[derive(Debug, Deserialize)]
pub struct GridFactorFile {
    pub schema_version: String,
    pub countries: Vec<GridFactorRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MobileCombustionRecord {
    pub fuel_type: String,
    pub unit: String,
    pub kg_co2_per_unit: f64,
}

#[derive(Debug, Deserialize)]
pub struct MobileCombustionFile {
    pub schema_version: String,
    pub mobile_combustion: Vec<MobileCombustionRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeatSteamFactorRecord {
    pub activity: String,
    pub unit: String,
    #[serde(default)]
    pub factors: GasFactors,
}

#[derive(Debug, Deserialize)]
pub struct HeatSteamFactorFile {
    pub schema_version: String,
    pub heat_steam: Vec<HeatSteamFactorRecord>,
}

/// One EPA vehicle factor row. On-road gasoline records carry a model year
/// and no fuel type; diesel and alternative fuel records carry a fuel type and
/// sometimes a model year; non-road records carry a fuel type only.
#[derive(Debug, Clone, Deserialize)]
pub struct EpaVehicleFactorRecord {
    pub vehicle_type: String,
    pub fuel_type: Option<String>,
    #[serde(default, deserialize_with = "model_year")]
    pub model_year: Option<String>,
    #[serde(default)]
    pub factors: VehicleGasFactors,
}

#[derive(Debug, Deserialize)]
pub struct EpaVehicleFactorFile {
    pub schema_version: String,
    pub vehicles: Vec<EpaVehicleFactorRecord>,
}

/// Everything entered for one reporting period.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryFile {
    pub schema_version: String,
    pub reporting_period: Option<String>,
    #[serde(default)]
    pub output_unit: OutputUnit,
    #[serde(default)]
    pub fuel: Vec<FuelRow>,
    #[serde(default)]
    pub refrigerant: Vec<RefrigerantRow>,
    #[serde(default)]
    pub passenger_vehicle: Vec<VehicleRow>,
    #[serde(default)]
    pub delivery_vehicle: Vec<VehicleRow>,
    #[serde(default)]
    pub mobile_fuel: Vec<MobileFuelRow>,
    #[serde(default)]
    pub on_road_gasoline: Vec<OnRoadGasolineRow>,
    #[serde(default)]
    pub on_road_diesel: Vec<OnRoadDieselRow>,
    #[serde(default)]
    pub non_road: Vec<NonRoadRow>,
    pub electricity: Option<ElectricityRecord>,
    #[serde(default)]
    pub heat_steam: Vec<HeatSteamRow>,
    #[serde(default)]
    pub scope3: Vec<Scope3Row>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreFile {
    pub schema_version: String,
    pub assessment_id: String,
    pub scored_by: Option<String>,
    pub scores: EsgScores,
}

#[derive(Debug, Deserialize)]
pub struct AssessmentFile {
    pub schema_version: String,
    pub assessment_id: String,
    pub assessment: EsgAssessment,
}
