// CSV parsing - Raw upload text to validated equipment records
use crate::domain::equipment::{EquipmentRecord, Parameter};
use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

/// Positional schema every upload must follow.
pub const EXPECTED_COLUMNS: [&str; 5] = ["name", "type", "flowrate", "pressure", "temperature"];

/// Failures that make the whole upload unusable.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    #[error("Upload contains no usable content")]
    EmptyInput,

    #[error("Header has {found} columns, expected at least {expected} (name, type, flowrate, pressure, temperature)")]
    InvalidHeader { found: usize, expected: usize },
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RowErrorKind {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("{column} value '{value}' is not a number")]
    InvalidNumber { column: Parameter, value: String },

    #[error("{column} value '{value}' is not finite")]
    NonFinite { column: Parameter, value: String },

    #[error("malformed row: {0}")]
    Malformed(String),
}

/// A single rejected row; parsing carries on past it.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("line {line}: {kind}")]
pub struct RowError {
    pub line: u64,
    pub kind: RowErrorKind,
}

#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub records: Vec<EquipmentRecord>,
    pub errors: Vec<RowError>,
    /// Data rows seen after the header, rejected ones included.
    pub raw_row_count: usize,
}

/// Parse delimited text into records, collecting per-row failures.
///
/// The first non-empty line is the header and fixes the field count for every
/// following row. Columns are read by position, not by header name. Line
/// numbers in the returned errors are 1-based and count blank lines.
pub fn parse_equipment_csv(raw: &str) -> Result<ParseOutcome, ParseError> {
    let mut expected_fields: Option<usize> = None;
    let mut outcome = ParseOutcome::default();

    for (idx, text) in raw.lines().enumerate() {
        if text.trim().is_empty() {
            continue;
        }
        let line = idx as u64 + 1;

        let Some(expected) = expected_fields else {
            let header = split_fields(text).map_err(|_| ParseError::InvalidHeader {
                found: 0,
                expected: EXPECTED_COLUMNS.len(),
            })?;
            if header.len() < EXPECTED_COLUMNS.len() {
                return Err(ParseError::InvalidHeader {
                    found: header.len(),
                    expected: EXPECTED_COLUMNS.len(),
                });
            }
            log_header_mismatch(&header);
            expected_fields = Some(header.len());
            continue;
        };

        outcome.raw_row_count += 1;
        let parsed = split_fields(text)
            .map_err(|e| RowErrorKind::Malformed(e.to_string()))
            .and_then(|record| parse_row(&record, expected));

        match parsed {
            Ok(record) => outcome.records.push(record),
            Err(kind) => {
                tracing::debug!("Rejected line {}: {}", line, kind);
                outcome.errors.push(RowError { line, kind });
            }
        }
    }

    if expected_fields.is_none() {
        return Err(ParseError::EmptyInput);
    }

    Ok(outcome)
}

/// Split one physical line into trimmed fields, honouring CSV quoting.
fn split_fields(line: &str) -> Result<StringRecord, csv::Error> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());

    let mut record = StringRecord::new();
    reader.read_record(&mut record)?;
    Ok(record)
}

fn parse_row(record: &StringRecord, expected: usize) -> Result<EquipmentRecord, RowErrorKind> {
    if record.len() != expected {
        return Err(RowErrorKind::FieldCount {
            expected,
            found: record.len(),
        });
    }

    let field = |idx: usize| record.get(idx).unwrap_or_default();

    Ok(EquipmentRecord::new(
        field(0).to_string(),
        field(1).to_string(),
        parse_number(field(2), Parameter::Flowrate)?,
        parse_number(field(3), Parameter::Pressure)?,
        parse_number(field(4), Parameter::Temperature)?,
    ))
}

fn parse_number(value: &str, column: Parameter) -> Result<f64, RowErrorKind> {
    let parsed = value.parse::<f64>().map_err(|_| RowErrorKind::InvalidNumber {
        column,
        value: value.to_string(),
    })?;

    if !parsed.is_finite() {
        return Err(RowErrorKind::NonFinite {
            column,
            value: value.to_string(),
        });
    }

    Ok(parsed)
}

fn log_header_mismatch(header: &StringRecord) {
    for (idx, expected) in EXPECTED_COLUMNS.iter().enumerate() {
        let found = header.get(idx).unwrap_or_default();
        if !found.eq_ignore_ascii_case(expected) {
            tracing::debug!(
                "Header column {} is '{}', reading it as '{}'",
                idx + 1,
                found,
                expected
            );
        }
    }
}
