use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement<T> {
    pub value: T,
    pub unit: String,
}

impl<T> Measurement<T> {
    pub fn new(value: T, unit: &str) -> Self {
        Self {
            value,
            unit: unit.to_string(),
        }
    }
}
