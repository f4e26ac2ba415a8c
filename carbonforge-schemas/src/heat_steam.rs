use crate::{
    entry::EntryMeta,
    units::{Gas, QuantityUnit},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatSteamSource {
    #[serde(rename = "Onsite heat and steam")]
    Onsite,
    #[serde(rename = "District heat and steam")]
    District,
}

impl HeatSteamSource {
    /// Maps a free-text activity label onto one of the two stored entry types.
    pub fn from_label(label: &str) -> Self {
        if label.to_lowercase().contains("district") {
            HeatSteamSource::District
        } else {
            HeatSteamSource::Onsite
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HeatSteamSource::Onsite => "Onsite heat and steam",
            HeatSteamSource::District => "District heat and steam",
        }
    }
}

/// Per-gas factors for one heat and steam activity.
/// CO2 is kg per unit; CH4 and N2O are grams per unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GasFactors {
    pub co2: Option<f64>,
    pub ch4: Option<f64>,
    pub n2o: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatSteamRow {
    #[serde(flatten)]
    pub meta: EntryMeta,
    pub entry_type: String,
    pub unit: String,
    #[serde(default)]
    pub gas: Gas,
    #[serde(default)]
    pub quantity_unit: QuantityUnit,
    pub quantity: Option<f64>,
    #[serde(default)]
    pub factors: GasFactors,
    pub factor: Option<f64>,
    pub emissions: Option<f64>,
}
