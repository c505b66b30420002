// Equipment domain models
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Numeric parameters measured for every piece of equipment, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Flowrate,
    Pressure,
    Temperature,
}

impl Parameter {
    pub const ALL: [Parameter; 3] = [Parameter::Flowrate, Parameter::Pressure, Parameter::Temperature];

    pub fn name(self) -> &'static str {
        match self {
            Parameter::Flowrate => "flowrate",
            Parameter::Pressure => "pressure",
            Parameter::Temperature => "temperature",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Parameter::Flowrate => 0,
            Parameter::Pressure => 1,
            Parameter::Temperature => 2,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub flowrate: f64,
    pub pressure: f64,
    pub temperature: f64,
}

impl EquipmentRecord {
    pub fn new(
        name: String,
        equipment_type: String,
        flowrate: f64,
        pressure: f64,
        temperature: f64,
    ) -> Self {
        Self {
            name,
            equipment_type,
            flowrate,
            pressure,
            temperature,
        }
    }

    pub fn value(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Flowrate => self.flowrate,
            Parameter::Pressure => self.pressure,
            Parameter::Temperature => self.temperature,
        }
    }
}

/// One uploaded batch of records plus where it came from.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    uploaded_at: DateTime<Utc>,
    raw_row_count: usize,
    records: Vec<EquipmentRecord>,
}

impl Dataset {
    /// `raw_row_count` counts every data row seen, rejected ones included.
    pub fn new(
        name: String,
        uploaded_at: DateTime<Utc>,
        raw_row_count: usize,
        records: Vec<EquipmentRecord>,
    ) -> Self {
        Self {
            name,
            uploaded_at,
            raw_row_count,
            records,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uploaded_at(&self) -> DateTime<Utc> {
        self.uploaded_at
    }

    pub fn raw_row_count(&self) -> usize {
        self.raw_row_count
    }

    pub fn records(&self) -> &[EquipmentRecord] {
        &self.records
    }
}
