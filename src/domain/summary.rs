// Summary domain model - Statistics derived from one dataset
use super::equipment::{EquipmentRecord, Parameter};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Mean value per parameter, iterated in `Parameter::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Averages([f64; 3]);

impl Averages {
    pub fn get(&self, parameter: Parameter) -> f64 {
        self.0[parameter.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Parameter, f64)> + '_ {
        Parameter::ALL.iter().map(move |p| (*p, self.get(*p)))
    }
}

impl Serialize for Averages {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Parameter::ALL.len()))?;
        for (parameter, value) in self.iter() {
            map.serialize_entry(parameter.name(), &value)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    pub label: String,
    pub count: usize,
}

/// Count per equipment type, iterated in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeDistribution {
    entries: Vec<TypeCount>,
}

impl TypeDistribution {
    pub fn iter(&self) -> impl Iterator<Item = &TypeCount> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.entries.iter().find(|e| e.label == label).map(|e| e.count)
    }
}

impl Serialize for TypeDistribution {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.label, &entry.count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Summary {
    pub total_count: usize,
    pub averages: Averages,
    pub type_distribution: TypeDistribution,
}

impl Summary {
    /// Reduce records to counts, per-parameter means and a type histogram in one pass.
    pub fn from_records(records: &[EquipmentRecord]) -> Self {
        let total_count = records.len();
        let mut sums = [0.0_f64; 3];
        // Pre-divided sums stay finite when the plain sum of large values overflows.
        let mut scaled = [0.0_f64; 3];
        let mut entries: Vec<TypeCount> = Vec::new();
        let mut positions: HashMap<&str, usize> = HashMap::new();

        for record in records {
            for parameter in Parameter::ALL {
                let value = record.value(parameter);
                sums[parameter.index()] += value;
                scaled[parameter.index()] += value / total_count as f64;
            }

            match positions.get(record.equipment_type.as_str()) {
                Some(&idx) => entries[idx].count += 1,
                None => {
                    positions.insert(record.equipment_type.as_str(), entries.len());
                    entries.push(TypeCount {
                        label: record.equipment_type.clone(),
                        count: 1,
                    });
                }
            }
        }

        let averages = if total_count == 0 {
            [0.0; 3]
        } else {
            std::array::from_fn(|i| {
                if sums[i].is_finite() {
                    sums[i] / total_count as f64
                } else {
                    scaled[i]
                }
            })
        };

        Self {
            total_count,
            averages: Averages(averages),
            type_distribution: TypeDistribution { entries },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, equipment_type: &str, f: f64, p: f64, t: f64) -> EquipmentRecord {
        EquipmentRecord::new(name.to_string(), equipment_type.to_string(), f, p, t)
    }

    #[test]
    fn test_two_record_scenario() {
        let records = vec![
            record("Pump A", "Pump", 10.0, 2.0, 30.0),
            record("Valve B", "Valve", 5.0, 1.0, 20.0),
        ];
        let summary = Summary::from_records(&records);

        assert_eq!(summary.total_count, 2);
        assert_eq!(summary.averages.get(Parameter::Flowrate), 7.5);
        assert_eq!(summary.averages.get(Parameter::Pressure), 1.5);
        assert_eq!(summary.averages.get(Parameter::Temperature), 25.0);
        assert_eq!(summary.type_distribution.get("Pump"), Some(1));
        assert_eq!(summary.type_distribution.get("Valve"), Some(1));
    }

    #[test]
    fn test_large_values_do_not_overflow_mean() {
        let records = vec![
            record("Big 1", "Pump", 1e308, 1.0, -1e308),
            record("Big 2", "Pump", 1e308, 3.0, -1e308),
        ];
        let summary = Summary::from_records(&records);

        assert_eq!(summary.averages.get(Parameter::Flowrate), 1e308);
        assert_eq!(summary.averages.get(Parameter::Pressure), 2.0);
        assert_eq!(summary.averages.get(Parameter::Temperature), -1e308);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["averages"]["flowrate"], 1e308);
    }

    #[test]
    fn test_empty_records_yield_zero_averages() {
        let summary = Summary::from_records(&[]);

        assert_eq!(summary.total_count, 0);
        for (_, value) in summary.averages.iter() {
            assert_eq!(value, 0.0);
        }
        assert!(summary.type_distribution.is_empty());
    }

    #[test]
    fn test_distribution_total_matches_count() {
        let records = vec![
            record("R1", "Reactor", 1.0, 1.0, 1.0),
            record("P1", "Pump", 1.0, 1.0, 1.0),
            record("R2", "Reactor", 1.0, 1.0, 1.0),
            record("H1", "Heat Exchanger", 1.0, 1.0, 1.0),
            record("P2", "Pump", 1.0, 1.0, 1.0),
        ];
        let summary = Summary::from_records(&records);

        assert_eq!(summary.type_distribution.total(), summary.total_count);
    }

    #[test]
    fn test_distribution_keeps_first_seen_order() {
        let records = vec![
            record("V1", "Valve", 1.0, 1.0, 1.0),
            record("P1", "Pump", 1.0, 1.0, 1.0),
            record("P2", "Pump", 1.0, 1.0, 1.0),
            record("C1", "Compressor", 1.0, 1.0, 1.0),
        ];
        let summary = Summary::from_records(&records);

        let labels: Vec<&str> = summary.type_distribution.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Valve", "Pump", "Compressor"]);
    }

    #[test]
    fn test_summary_json_preserves_key_order() {
        let records = vec![
            record("V1", "Valve", 4.0, 2.0, 1.0),
            record("A1", "Agitator", 2.0, 2.0, 3.0),
        ];
        let json = serde_json::to_string(&Summary::from_records(&records)).unwrap();

        assert_eq!(
            json,
            r#"{"total_count":2,"averages":{"flowrate":3.0,"pressure":2.0,"temperature":2.0},"type_distribution":{"Valve":1,"Agitator":1}}"#
        );
    }
}
