use carbonforge_schemas::units::{Gas, MassBasis, OutputUnit, UnitDescriptor};

pub const LITRES_PER_GALLON: f64 = 3.78541;
pub const KG_PER_SHORT_TON: f64 = 907.18474;
pub const GRAMS_PER_KG: f64 = 1000.0;
pub const KG_PER_TONNE: f64 = 1000.0;
/// Natural gas: 1 MMSCF is about 1037 mmBtu.
pub const MMBTU_PER_MMSCF: f64 = 1037.0;
/// 100-year global warming potentials used to fold EPA vehicle CH4 and N2O into CO2e.
pub const GWP_CH4: f64 = 28.0;
pub const GWP_N2O: f64 = 265.0;

/// Rounds to 6 decimal places, the precision emissions are stored with.
pub fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Reads the gas and mass basis out of a factor unit label.
///
/// `"g CH4 / gallon"` describes grams of methane per gallon; labels without a
/// leading `g` mass token are kilograms, and labels naming no gas are CO2e.
pub fn describe_unit(label: &str) -> UnitDescriptor {
    let lower = label.to_lowercase();
    let numerator = lower.split('/').next().unwrap_or("").trim();

    let gas = if numerator.contains("ch4") {
        Gas::Ch4
    } else if numerator.contains("n2o") {
        Gas::N2o
    } else {
        Gas::Co2
    };
    let basis = match numerator.split_whitespace().next() {
        Some("g") => MassBasis::Grams,
        _ => MassBasis::Kilograms,
    };

    UnitDescriptor { gas, basis }
}

/// Factor divisor that brings `quantity * factor` to kilograms.
pub fn basis_divisor(descriptor: UnitDescriptor) -> f64 {
    match descriptor.basis {
        MassBasis::Kilograms => 1.0,
        MassBasis::Grams => GRAMS_PER_KG,
    }
}

pub fn is_gallon_based(unit: &str) -> bool {
    unit.to_lowercase().contains("gallon")
}

pub fn is_mmbtu_based(unit: &str) -> bool {
    unit.to_lowercase().contains("mmbtu")
}

/// Converts a kilogram total into `unit`, rounded to 6 decimals.
pub fn convert_from_kg(kg: f64, unit: OutputUnit) -> f64 {
    let converted = match unit {
        OutputUnit::Kg => kg,
        OutputUnit::Tonnes => kg / KG_PER_TONNE,
        OutputUnit::G => kg * GRAMS_PER_KG,
        OutputUnit::ShortTon => kg / KG_PER_SHORT_TON,
    };
    round6(converted)
}

/// Inverse of `convert_from_kg`, without rounding.
pub fn convert_to_kg(value: f64, unit: OutputUnit) -> f64 {
    match unit {
        OutputUnit::Kg => value,
        OutputUnit::Tonnes => value * KG_PER_TONNE,
        OutputUnit::G => value / GRAMS_PER_KG,
        OutputUnit::ShortTon => value * KG_PER_SHORT_TON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gram_labels_are_recognised() {
        assert_eq!(
            describe_unit("g CH4 / gallon"),
            UnitDescriptor { gas: Gas::Ch4, basis: MassBasis::Grams }
        );
        assert_eq!(
            describe_unit("g N2O/mile"),
            UnitDescriptor { gas: Gas::N2o, basis: MassBasis::Grams }
        );
        assert_eq!(describe_unit("litres"), UnitDescriptor::default());
        assert_eq!(describe_unit("kg CO2 / gallon").basis, MassBasis::Kilograms);
        assert_eq!(describe_unit("gallon").basis, MassBasis::Kilograms);
    }

    #[test]
    fn output_units_convert_from_kg() {
        assert_eq!(convert_from_kg(1500.0, OutputUnit::Tonnes), 1.5);
        assert_eq!(convert_from_kg(1.5, OutputUnit::G), 1500.0);
        assert_eq!(convert_from_kg(907.18474, OutputUnit::ShortTon), 1.0);
        assert_eq!(convert_from_kg(12.3456789, OutputUnit::Kg), 12.345679);
    }

    #[test]
    fn rounding_keeps_six_places() {
        assert_eq!(round6(154.14000000000001), 154.14);
        assert_eq!(round6(0.0000004), 0.0);
        assert_eq!(round2(66.666666), 66.67);
    }
}
