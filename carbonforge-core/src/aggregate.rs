use crate::{calculator::EmissionEntry, units::convert_from_kg};
use carbonforge_schemas::{entry::EntryKind, units::OutputUnit};
use serde::Serialize;

/// Sum of row emissions in kg, counting unset emissions as zero.
pub fn sum_emissions<E: EmissionEntry>(rows: &[E]) -> f64 {
    rows.iter().filter_map(EmissionEntry::emissions).sum()
}

/// Formats an emissions value with exactly 6 decimal places.
pub fn format_emissions(value: f64) -> String {
    format!("{:.6}", value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Scope {
    Scope1,
    Scope2,
    Scope3,
}

impl Scope {
    pub fn of(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Fuel
            | EntryKind::Refrigerant
            | EntryKind::PassengerVehicle
            | EntryKind::DeliveryVehicle
            | EntryKind::MobileFuel
            | EntryKind::OnRoadGasoline
            | EntryKind::OnRoadDiesel
            | EntryKind::NonRoadVehicle => Scope::Scope1,
            EntryKind::ElectricityOther | EntryKind::HeatSteam => Scope::Scope2,
            EntryKind::Scope3 => Scope::Scope3,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Scope::Scope1 => "Scope 1",
            Scope::Scope2 => "Scope 2",
            Scope::Scope3 => "Scope 3",
        }
    }
}

/// Per-category subtotal in kg.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub kind: EntryKind,
    pub label: String,
    pub kg: f64,
}

/// Category subtotals rolled up into scopes and a grand total, all in kg.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EmissionsSummary {
    pub categories: Vec<CategoryTotal>,
}

impl EmissionsSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, kind: EntryKind, label: &str, kg: f64) {
        self.categories.push(CategoryTotal {
            kind,
            label: label.to_string(),
            kg,
        });
    }

    pub fn add_rows<E: EmissionEntry>(&mut self, kind: EntryKind, label: &str, rows: &[E]) {
        self.add(kind, label, sum_emissions(rows));
    }

    pub fn scope_total(&self, scope: Scope) -> f64 {
        self.categories
            .iter()
            .filter(|c| Scope::of(c.kind) == scope)
            .map(|c| c.kg)
            .sum()
    }

    pub fn total(&self) -> f64 {
        self.categories.iter().map(|c| c.kg).sum()
    }

    /// Grand total expressed in `unit`, rounded to 6 decimals.
    pub fn total_in(&self, unit: OutputUnit) -> f64 {
        convert_from_kg(self.total(), unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carbonforge_schemas::entry::FuelRow;

    fn row(emissions: Option<f64>) -> FuelRow {
        FuelRow {
            emissions,
            ..Default::default()
        }
    }

    #[test]
    fn unset_emissions_count_as_zero() {
        let rows = vec![row(Some(1.5)), row(None), row(Some(2.25))];
        assert_eq!(sum_emissions(&rows), 3.75);
        assert_eq!(sum_emissions::<FuelRow>(&[]), 0.0);
    }

    #[test]
    fn scopes_roll_up_into_total() {
        let mut summary = EmissionsSummary::new();
        summary.add(EntryKind::Fuel, "Fuel", 100.0);
        summary.add(EntryKind::Refrigerant, "Refrigerants", 280.0);
        summary.add(EntryKind::ElectricityOther, "Electricity", 202.05);
        summary.add(EntryKind::Scope3, "Value chain", 20.0);

        assert_eq!(summary.scope_total(Scope::Scope1), 380.0);
        assert_eq!(summary.scope_total(Scope::Scope2), 202.05);
        assert!((summary.total() - 602.05).abs() < 1e-9);
        assert_eq!(summary.total_in(OutputUnit::Tonnes), 0.60205);
    }

    #[test]
    fn display_uses_six_decimals() {
        assert_eq!(format_emissions(280.0), "280.000000");
        assert_eq!(format_emissions(5.414), "5.414000");
    }
}
