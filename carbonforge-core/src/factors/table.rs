use crate::error::CarbonforgeError;
use serde_json::Value;
use std::collections::{btree_map, BTreeMap};

/// One level of a nested factor table, keyed by category, subcategory or unit.
///
/// Keys iterate in sorted order, which is also the order option lists are
/// offered in.
#[derive(Debug, Clone, PartialEq)]
pub struct Level<T> {
    entries: BTreeMap<String, T>,
}

/// `Key -> factor` (refrigerant GWP, grid country).
pub type FlatTable = Level<f64>;
/// `Category -> Unit -> factor` (Scope 3, EPA mobile fuel).
pub type TwoLevelTable = Level<FlatTable>;
/// `Category -> Subcategory -> Unit -> factor` (fuels, vehicles).
pub type ThreeLevelTable = Level<TwoLevelTable>;

impl<T> Default for Level<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> Level<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Sorted keys of this level.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entry_or_default(&mut self, key: &str) -> &mut T
    where
        T: Default,
    {
        self.entries.entry(key.to_string()).or_default()
    }

    pub(crate) fn put(&mut self, key: &str, value: T) {
        self.entries.insert(key.to_string(), value);
    }
}

impl<T> FromIterator<(String, T)> for Level<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<U> Level<Level<U>> {
    /// Sorted keys one level below `key`; empty when `key` is unset or unknown.
    pub fn children(&self, key: Option<&str>) -> Vec<&str> {
        key.and_then(|k| self.get(k))
            .map(Level::keys)
            .unwrap_or_default()
    }
}

pub(crate) fn is_valid_factor(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

impl FlatTable {
    /// Adds or replaces a factor, rejecting negative or non-finite values.
    pub fn insert(&mut self, key: &str, factor: f64) -> Result<(), CarbonforgeError> {
        if !is_valid_factor(factor) {
            return Err(CarbonforgeError::MalformedFactorTable {
                path: key.to_string(),
                reason: format!("factor {} is not a non-negative finite number", factor),
            });
        }
        self.put(key, factor);
        Ok(())
    }

    /// Adds a factor only when `key` has no value yet. Returns whether it was added.
    pub fn insert_if_absent(&mut self, key: &str, factor: f64) -> Result<bool, CarbonforgeError> {
        if self.contains(key) {
            return Ok(false);
        }
        self.insert(key, factor)?;
        Ok(true)
    }

    pub fn resolve(&self, key: Option<&str>) -> Option<f64> {
        self.get(key?).copied()
    }
}

impl TwoLevelTable {
    pub fn resolve(&self, category: Option<&str>, unit: Option<&str>) -> Option<f64> {
        self.get(category?)?.resolve(unit)
    }
}

impl ThreeLevelTable {
    pub fn resolve(
        &self,
        category: Option<&str>,
        subcategory: Option<&str>,
        unit: Option<&str>,
    ) -> Option<f64> {
        self.get(category?)?.resolve(subcategory, unit)
    }

    /// Sorted units available for `category`/`subcategory`.
    pub fn units(&self, category: Option<&str>, subcategory: Option<&str>) -> Vec<&str> {
        category
            .and_then(|c| self.get(c))
            .map(|level| level.children(subcategory))
            .unwrap_or_default()
    }
}

/// Parsing of a dynamically shaped document into a table level.
pub trait TableNode: Sized {
    fn from_value(value: &Value, path: &str) -> Result<Self, CarbonforgeError>;
}

impl TableNode for f64 {
    fn from_value(value: &Value, path: &str) -> Result<Self, CarbonforgeError> {
        match value.as_f64() {
            Some(factor) if is_valid_factor(factor) => Ok(factor),
            _ => Err(CarbonforgeError::MalformedFactorTable {
                path: path.to_string(),
                reason: format!("expected a non-negative number, found {}", value),
            }),
        }
    }
}

impl<T: TableNode> TableNode for Level<T> {
    fn from_value(value: &Value, path: &str) -> Result<Self, CarbonforgeError> {
        let map = value
            .as_object()
            .ok_or_else(|| CarbonforgeError::MalformedFactorTable {
                path: path.to_string(),
                reason: format!("expected a mapping, found {}", value),
            })?;
        map.iter()
            .map(|(key, child)| {
                let child_path = format!("{}/{}", path, key);
                T::from_value(child, &child_path).map(|node| (key.clone(), node))
            })
            .collect()
    }
}

impl<T: TableNode> Level<T> {
    /// Builds a table from a JSON document whose nesting depth matches `T`.
    pub fn from_json(value: &Value) -> Result<Self, CarbonforgeError> {
        <Self as TableNode>::from_value(value, "$")
    }

    /// Parses JSON text, then builds the table as `from_json` does.
    pub fn from_json_str(text: &str) -> Result<Self, CarbonforgeError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fuels() -> ThreeLevelTable {
        ThreeLevelTable::from_json(&json!({
            "Gaseous fuels": {
                "Propane": { "litres": 1.5414, "tonnes": 2993.4 },
                "Butane": { "litres": 1.74296 }
            }
        }))
        .unwrap()
    }

    #[test]
    fn resolves_full_chain() {
        let table = fuels();
        assert_eq!(
            table.resolve(Some("Gaseous fuels"), Some("Propane"), Some("litres")),
            Some(1.5414)
        );
    }

    #[test]
    fn missing_or_unknown_keys_are_soft_misses() {
        let table = fuels();
        assert_eq!(table.resolve(Some("Gaseous fuels"), Some("Propane"), None), None);
        assert_eq!(table.resolve(None, Some("Propane"), Some("litres")), None);
        assert_eq!(table.resolve(Some("Liquid fuels"), Some("Propane"), Some("litres")), None);
        assert_eq!(table.resolve(Some("Gaseous fuels"), Some("Propane"), Some("gallons")), None);
    }

    #[test]
    fn option_lists_are_sorted() {
        let table = fuels();
        assert_eq!(table.keys(), vec!["Gaseous fuels"]);
        assert_eq!(table.children(Some("Gaseous fuels")), vec!["Butane", "Propane"]);
        assert_eq!(
            table.units(Some("Gaseous fuels"), Some("Propane")),
            vec!["litres", "tonnes"]
        );
        assert!(table.children(None).is_empty());
        assert!(table.units(Some("Gaseous fuels"), Some("Ethane")).is_empty());
    }

    #[test]
    fn rejects_leaf_where_mapping_expected() {
        let err = TwoLevelTable::from_json(&json!({ "Waste": 0.5 })).unwrap_err();
        match err {
            CarbonforgeError::MalformedFactorTable { path, .. } => assert_eq!(path, "$/Waste"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_and_textual_leaves() {
        assert!(FlatTable::from_json(&json!({ "Methane": -28.0 })).is_err());
        assert!(FlatTable::from_json(&json!({ "Methane": "28" })).is_err());
        assert!(FlatTable::from_json(&json!([1.0, 2.0])).is_err());
    }

    #[test]
    fn json_text_is_parsed_before_the_shape_check() {
        let table = TwoLevelTable::from_json_str(r#"{ "Waste": { "kg": 0.0005 } }"#).unwrap();
        assert_eq!(table.resolve(Some("Waste"), Some("kg")), Some(0.0005));

        match TwoLevelTable::from_json_str("{ \"Waste\": ").unwrap_err() {
            CarbonforgeError::JsonParsing(_) => {}
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(matches!(
            TwoLevelTable::from_json_str(r#"{ "Waste": [] }"#),
            Err(CarbonforgeError::MalformedFactorTable { .. })
        ));
    }

    #[test]
    fn insert_if_absent_keeps_first_value() {
        let mut table = FlatTable::new();
        assert!(table.insert_if_absent("gallon", 8.78).unwrap());
        assert!(!table.insert_if_absent("gallon", 9.99).unwrap());
        assert_eq!(table.resolve(Some("gallon")), Some(8.78));
        assert!(table.insert("gallon", f64::NAN).is_err());
    }
}
