pub mod assessment;
pub mod electricity;
pub mod entry;
pub mod epa_vehicle;
pub mod esg;
pub mod file_formats;
pub mod heat_steam;
pub mod measurement;
pub mod units;
