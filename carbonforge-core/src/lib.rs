pub mod aggregate;
pub mod calculator;
pub mod change;
pub mod electricity;
pub mod error;
pub mod esg;
pub mod factors;
pub mod files;
pub mod heat_steam;
pub mod ledger;
pub mod store;
pub mod units;
