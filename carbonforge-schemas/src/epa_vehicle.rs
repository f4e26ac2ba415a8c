use crate::{
    entry::EntryMeta,
    units::{Gas, VolumeUnit},
};
use serde::{Deserialize, Deserializer, Serialize};

/// EPA per-vehicle factors, in grams of gas per mile (on-road) or per gallon
/// (non-road). `co2e` is a direct CO2-equivalent factor when the source has one.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleGasFactors {
    pub co2e: Option<f64>,
    pub co2: Option<f64>,
    pub ch4: Option<f64>,
    pub n2o: Option<f64>,
}

impl VehicleGasFactors {
    pub fn is_empty(&self) -> bool {
        self.co2e.is_none() && self.co2.is_none() && self.ch4.is_none() && self.n2o.is_none()
    }

    /// Every populated factor with its column name.
    pub fn populated(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("co2e", self.co2e),
            ("co2", self.co2),
            ("ch4", self.ch4),
            ("n2o", self.n2o),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawYear {
    Text(String),
    Number(i64),
}

/// Reads a model year written either as text (`"2015"`, `"1973-1974"`) or as a
/// bare YAML integer. Blank text is treated as no year.
pub fn model_year<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let year = match Option::<RawYear>::deserialize(deserializer)? {
        Some(RawYear::Text(text)) => Some(text.trim().to_string()),
        Some(RawYear::Number(number)) => Some(number.to_string()),
        None => None,
    };
    Ok(year.filter(|y| !y.is_empty()))
}

/// On-road gasoline vehicle: vehicle type -> model year, driven miles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OnRoadGasolineRow {
    #[serde(flatten)]
    pub meta: EntryMeta,
    pub vehicle_type: Option<String>,
    #[serde(default, deserialize_with = "model_year")]
    pub model_year: Option<String>,
    pub miles: Option<f64>,
    /// Grams CO2e per mile.
    pub factor: Option<f64>,
    pub emissions: Option<f64>,
}

/// On-road diesel and alternative fuel vehicle: vehicle type -> fuel type,
/// then a model year only when the table lists years for that pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OnRoadDieselRow {
    #[serde(flatten)]
    pub meta: EntryMeta,
    pub vehicle_type: Option<String>,
    pub fuel_type: Option<String>,
    #[serde(default, deserialize_with = "model_year")]
    pub model_year: Option<String>,
    pub miles: Option<f64>,
    /// Grams CO2e per mile.
    pub factor: Option<f64>,
    pub emissions: Option<f64>,
}

fn gallon() -> VolumeUnit {
    VolumeUnit::Gallon
}

fn methane() -> Gas {
    Gas::Ch4
}

/// Non-road vehicle or equipment: vehicle type -> fuel type, fuel consumed,
/// and the single gas the row reports. Emissions are kg of that gas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonRoadRow {
    #[serde(flatten)]
    pub meta: EntryMeta,
    pub vehicle_type: Option<String>,
    pub fuel_type: Option<String>,
    #[serde(default = "gallon")]
    pub input_unit: VolumeUnit,
    #[serde(default = "methane")]
    pub gas: Gas,
    pub quantity: Option<f64>,
    /// Grams of `gas` per gallon.
    pub factor: Option<f64>,
    pub emissions: Option<f64>,
}

impl Default for NonRoadRow {
    fn default() -> Self {
        Self {
            meta: EntryMeta::new(),
            vehicle_type: None,
            fuel_type: None,
            input_unit: gallon(),
            gas: methane(),
            quantity: None,
            factor: None,
            emissions: None,
        }
    }
}
