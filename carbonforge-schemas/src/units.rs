use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit a kilogram-basis total is reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputUnit {
    #[default]
    Kg,
    Tonnes,
    G,
    ShortTon,
}

impl OutputUnit {
    pub const ALL: [OutputUnit; 4] = [
        OutputUnit::Kg,
        OutputUnit::Tonnes,
        OutputUnit::G,
        OutputUnit::ShortTon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputUnit::Kg => "kg",
            OutputUnit::Tonnes => "tonnes",
            OutputUnit::G => "g",
            OutputUnit::ShortTon => "short_ton",
        }
    }

    /// Parses the persisted form (`kg`, `tonnes`, `g`, `short_ton`).
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.as_str() == value.trim())
    }
}

impl fmt::Display for OutputUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gas {
    #[default]
    Co2,
    Ch4,
    N2o,
}

/// Mass unit the factor numerator is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MassBasis {
    #[default]
    Kilograms,
    Grams,
}

/// What a factor's unit label means: which gas it measures and in which mass unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitDescriptor {
    pub gas: Gas,
    pub basis: MassBasis,
}

/// Volume unit the user typed a fuel quantity in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeUnit {
    Gallon,
    Liter,
}

/// Quantity unit for heat and steam rows: the table's base unit, or MMSCF of natural gas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityUnit {
    #[default]
    Base,
    Mmscf,
}
