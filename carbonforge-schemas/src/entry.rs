use crate::units::VolumeUnit;
use serde::{Deserialize, Serialize};
use std::fmt;

fn new_local_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Identity shared by every entry row.
///
/// `id` is generated locally and never persisted; `db_id` is only present once the
/// row has been stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryMeta {
    #[serde(default = "new_local_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_id: Option<String>,
    #[serde(default)]
    pub is_existing: bool,
}

impl EntryMeta {
    pub fn new() -> Self {
        Self {
            id: new_local_id(),
            db_id: None,
            is_existing: false,
        }
    }

    /// Identity for a row loaded back from storage.
    pub fn persisted(db_id: &str) -> Self {
        Self {
            id: new_local_id(),
            db_id: Some(db_id.to_string()),
            is_existing: true,
        }
    }
}

impl Default for EntryMeta {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Fuel,
    Refrigerant,
    PassengerVehicle,
    DeliveryVehicle,
    MobileFuel,
    OnRoadGasoline,
    OnRoadDiesel,
    NonRoadVehicle,
    ElectricityOther,
    HeatSteam,
    Scope3,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Fuel => "fuel",
            EntryKind::Refrigerant => "refrigerant",
            EntryKind::PassengerVehicle => "passenger_vehicle",
            EntryKind::DeliveryVehicle => "delivery_vehicle",
            EntryKind::MobileFuel => "mobile_fuel",
            EntryKind::OnRoadGasoline => "on_road_gasoline",
            EntryKind::OnRoadDiesel => "on_road_diesel",
            EntryKind::NonRoadVehicle => "non_road_vehicle",
            EntryKind::ElectricityOther => "electricity_other",
            EntryKind::HeatSteam => "heat_steam",
            EntryKind::Scope3 => "scope3",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stationary fuel combustion: fuel type -> fuel -> unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FuelRow {
    #[serde(flatten)]
    pub meta: EntryMeta,
    pub fuel_type: Option<String>,
    pub fuel: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<f64>,
    pub factor: Option<f64>,
    pub emissions: Option<f64>,
}

/// Refrigerant leakage: refrigerant -> GWP.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RefrigerantRow {
    #[serde(flatten)]
    pub meta: EntryMeta,
    pub refrigerant_type: Option<String>,
    pub quantity: Option<f64>,
    pub factor: Option<f64>,
    pub emissions: Option<f64>,
}

/// Distance-based vehicle row, used for both passenger and delivery fleets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleRow {
    #[serde(flatten)]
    pub meta: EntryMeta,
    pub activity: Option<String>,
    pub vehicle_type: Option<String>,
    pub unit: Option<String>,
    pub distance: Option<f64>,
    pub factor: Option<f64>,
    pub emissions: Option<f64>,
}

/// EPA mobile combustion row. `unit` is filled from the factor table when the
/// fuel type is selected; `input_unit` records what the quantity was typed in.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MobileFuelRow {
    #[serde(flatten)]
    pub meta: EntryMeta,
    pub fuel_type: Option<String>,
    pub unit: Option<String>,
    pub input_unit: Option<VolumeUnit>,
    pub quantity: Option<f64>,
    pub factor: Option<f64>,
    pub emissions: Option<f64>,
}

/// Value-chain row: category -> unit. `activity` is a free-text description.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scope3Row {
    #[serde(flatten)]
    pub meta: EntryMeta,
    pub category: Option<String>,
    pub activity: Option<String>,
    pub unit: Option<String>,
    pub quantity: Option<f64>,
    pub factor: Option<f64>,
    pub emissions: Option<f64>,
}
