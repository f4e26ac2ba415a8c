use crate::entry::FuelRow;
use serde::{Deserialize, Serialize};

/// Purchased electricity for one reporting period.
///
/// Percentages split `total_kwh` across grid, renewable and other sources.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ElectricityRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_id: Option<String>,
    pub total_kwh: Option<f64>,
    pub grid_pct: Option<f64>,
    pub renewable_pct: Option<f64>,
    pub other_pct: Option<f64>,
    pub grid_country: Option<String>,
    #[serde(default)]
    pub other_sources: Vec<FuelRow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_emissions: Option<f64>,
}
