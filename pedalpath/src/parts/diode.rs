//! Diode registry.

use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::{PartTable, RegistryError};
use crate::core::CodecError;

const EMBEDDED_DIODES: &str = include_str!("../../parts/diodes.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiodeType {
    Signal,
    Rectifier,
    Zener,
    Led,
}

impl fmt::Display for DiodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiodeType::Signal => "signal",
            DiodeType::Rectifier => "rectifier",
            DiodeType::Zener => "zener",
            DiodeType::Led => "LED",
        };
        f.write_str(name)
    }
}

/// How the cathode is marked on the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CathodeMarking {
    Band,
    FlatEdge,
}

fn default_cathode_marking() -> CathodeMarking {
    CathodeMarking::Band
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct DiodeRecord {
    part_numbers: Vec<String>,
    diode_type: DiodeType,
    #[serde(default)]
    voltage: Option<f64>,
    color: String,
    #[serde(default = "default_cathode_marking")]
    cathode_marking: CathodeMarking,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiodeSpec {
    pub part_number: String,
    pub diode_type: DiodeType,
    /// Zener voltage for zeners, maximum reverse voltage otherwise.
    pub voltage: Option<f64>,
    /// Body color used when drawing the part.
    pub color: String,
    pub cathode_marking: CathodeMarking,
    pub description: String,
}

impl DiodeSpec {
    fn from_record(record: &DiodeRecord) -> Self {
        Self {
            part_number: record.part_numbers.first().cloned().unwrap_or_default(),
            diode_type: record.diode_type,
            voltage: record.voltage,
            color: record.color.clone(),
            cathode_marking: record.cathode_marking,
            description: record.description.clone(),
        }
    }
}

static DIODES: OnceLock<PartTable<DiodeRecord>> = OnceLock::new();

fn parse_table(json_str: &str) -> Result<PartTable<DiodeRecord>, RegistryError> {
    let records: Vec<DiodeRecord> = serde_json::from_str(json_str)?;
    let mut table = PartTable::default();
    for record in records {
        let part_numbers = record.part_numbers.clone();
        table.insert(&part_numbers, record);
    }
    Ok(table)
}

fn diodes() -> &'static PartTable<DiodeRecord> {
    DIODES.get_or_init(|| match parse_table(EMBEDDED_DIODES) {
        Ok(table) => {
            tracing::info!("Loaded {} embedded diode definitions", table.len());
            table
        }
        Err(e) => {
            tracing::warn!("Failed to parse embedded diode table: {}", e);
            PartTable::default()
        }
    })
}

/// Look up a diode by part number. There is no safe generic diode, so
/// unknown parts are an error.
pub fn lookup_diode(part_number: &str) -> Result<DiodeSpec, CodecError> {
    diodes()
        .get(part_number)
        .map(DiodeSpec::from_record)
        .ok_or_else(|| CodecError::MarkingParse(format!("unknown diode {:?}", part_number.trim())))
}

/// Canonical part numbers of every known diode, sorted.
pub fn known_diodes() -> Vec<String> {
    let mut names: Vec<String> = diodes()
        .values()
        .filter_map(|r| r.part_numbers.first().cloned())
        .collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_diode() {
        let spec = lookup_diode("1N4148").unwrap();
        assert_eq!(spec.diode_type, DiodeType::Signal);
        assert_eq!(spec.cathode_marking, CathodeMarking::Band);
        assert_eq!(spec.voltage, Some(100.0));
    }

    #[test]
    fn test_zener_voltage() {
        let spec = lookup_diode("1n4742a").unwrap();
        assert_eq!(spec.diode_type, DiodeType::Zener);
        assert_eq!(spec.voltage, Some(12.0));
        assert_eq!(lookup_diode("1N4733").unwrap().part_number, "1N4733A");
    }

    #[test]
    fn test_rectifiers() {
        assert_eq!(lookup_diode("1N4001").unwrap().diode_type, DiodeType::Rectifier);
        assert_eq!(lookup_diode("1N5817").unwrap().voltage, Some(20.0));
        assert_eq!(lookup_diode("1N4007").unwrap().voltage, Some(1000.0));
    }

    #[test]
    fn test_unknown_diode_is_error() {
        assert!(matches!(lookup_diode("1N9999"), Err(CodecError::MarkingParse(_))));
        assert!(matches!(lookup_diode(""), Err(CodecError::MarkingParse(_))));
        // no prefix matching for diodes
        assert!(lookup_diode("1N41").is_err());
    }

    #[test]
    fn test_known_diodes() {
        let names = known_diodes();
        assert_eq!(names.len(), 17);
        assert!(names.contains(&"1N34A".to_string()));
    }

    #[test]
    fn test_parse_table_rejects_bad_json() {
        assert!(matches!(parse_table("{"), Err(RegistryError::Json(_))));
    }
}
