//! Tests for bill-of-materials decoding

use pedalpath::parts::LedSize;
use pedalpath::prelude::*;
use pedalpath::{decode_bom, decode_bom_entry, ComponentKind, HALF_400};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_bom(name: &str) -> Vec<BomEntry> {
    let content = std::fs::read_to_string(fixture_path(name)).expect("Should read fixture");
    serde_json::from_str(&content).expect("Should parse BOM")
}

fn load_options(name: &str) -> DecodeOptions {
    let content = std::fs::read_to_string(fixture_path(name)).expect("Should read fixture");
    serde_json::from_str(&content).expect("Should parse options")
}

fn component<'a>(report: &'a pedalpath::BomReport, reference: &str) -> &'a Component {
    report
        .lines
        .iter()
        .find(|line| line.reference == reference)
        .and_then(|line| line.component.as_ref())
        .unwrap_or_else(|| panic!("{} should decode", reference))
}

#[test]
fn test_fuzz_face_bom() {
    let entries = load_bom("fuzz_face_bom.json");
    let report = decode_bom(&entries, &DecodeOptions::default());

    assert_eq!(report.lines.len(), 13);
    assert_eq!(report.stats.decoded, 11);
    assert_eq!(report.stats.failed, 2);
    assert_eq!(report.stats.orientation_sensitive, 5);
    assert!(report.has_failures());

    let kinds: Vec<ComponentKind> = report.components().map(|c| c.kind()).collect();
    assert_eq!(kinds.iter().filter(|k| **k == ComponentKind::Resistor).count(), 5);
    assert_eq!(kinds.iter().filter(|k| **k == ComponentKind::Capacitor).count(), 3);
}

#[test]
fn test_failures_are_recorded_per_line() {
    let entries = load_bom("fuzz_face_bom.json");
    let report = decode_bom(&entries, &DecodeOptions::default());

    let failed: Vec<&str> = report
        .lines
        .iter()
        .filter(|line| line.error.is_some())
        .map(|line| line.reference.as_str())
        .collect();
    assert_eq!(failed, vec!["C4", "Q1"]);

    // lines keep their input and order
    assert_eq!(report.lines[12].input, "AC128");
    assert_eq!(report.lines[3].quantity, 2);
}

#[test]
fn test_resistor_values_and_bands() {
    let report = decode_bom(&load_bom("fuzz_face_bom.json"), &DecodeOptions::default());

    match component(&report, "R3") {
        Component::Resistor(spec) => {
            assert_eq!(spec.ohms, 8_200.0);
            assert_eq!(spec.tolerance_percent, 1.0);
        }
        other => panic!("R3 decoded as {:?}", other.kind()),
    }
    match component(&report, "R5") {
        Component::Resistor(spec) => assert_eq!(spec.ohms, 4_700.0),
        other => panic!("R5 decoded as {:?}", other.kind()),
    }
}

#[test]
fn test_capacitor_defaults_from_options() {
    let entries = load_bom("fuzz_face_bom.json");

    let report = decode_bom(&entries, &DecodeOptions::default());
    match component(&report, "C3") {
        Component::Capacitor(spec) => {
            assert_eq!(spec.cap_type, CapType::FilmBox);
            assert_eq!(spec.tolerance_letter, Some('K'));
            assert_eq!(spec.voltage_max, None);
        }
        other => panic!("C3 decoded as {:?}", other.kind()),
    }

    let options = load_options("decode_options.json");
    let report = decode_bom(&entries, &options);
    match component(&report, "C3") {
        Component::Capacitor(spec) => {
            assert_eq!(spec.tolerance_letter, Some('J'));
            assert_eq!(spec.tolerance_percent, Some(5.0));
            assert_eq!(spec.voltage_max, Some(50.0));
        }
        other => panic!("C3 decoded as {:?}", other.kind()),
    }
    // printed ratings win over defaults
    match component(&report, "C1") {
        Component::Capacitor(spec) => {
            assert_eq!(spec.voltage_max, Some(25.0));
            assert_eq!(spec.tolerance_percent, Some(20.0));
            assert!(spec.polarized);
        }
        other => panic!("C1 decoded as {:?}", other.kind()),
    }
}

#[test]
fn test_options_file() {
    let options = load_options("decode_options.json");
    assert_eq!(options.led_size, LedSize::ThreeMm);
    assert_eq!(options.resistor_tolerance, 1.0);
    assert_eq!(options.breadboard(), Ok(&HALF_400));
    assert_eq!(options.validate(), Ok(()));
}

#[test]
fn test_ic_and_led_entries() {
    let report = decode_bom(&load_bom("fuzz_face_bom.json"), &DecodeOptions::default());

    match component(&report, "U1") {
        Component::Ic(spec) => {
            assert_eq!(spec.part_number, "TL072");
            assert!(!spec.is_generic);
        }
        other => panic!("U1 decoded as {:?}", other.kind()),
    }
    match component(&report, "LED1") {
        Component::Led(spec) => assert_eq!(spec.size, LedSize::ThreeMm),
        other => panic!("LED1 decoded as {:?}", other.kind()),
    }
}

#[test]
fn test_single_entry_dispatch() {
    let options = DecodeOptions::default();

    let entry = BomEntry::new("IC3", "", "LM308N");
    let component = decode_bom_entry(&entry, &options).expect("Should decode");
    assert_eq!(component.kind(), ComponentKind::Ic);
    assert_eq!(component.summary(), "LM308 (8-pin DIP)");

    let entry = BomEntry::new("D2", "", "1N9999");
    assert!(matches!(
        decode_bom_entry(&entry, &options),
        Err(CodecError::MarkingParse(_))
    ));

    let entry = BomEntry::new("R9", "", "0");
    assert_eq!(
        decode_bom_entry(&entry, &options).unwrap_err(),
        CodecError::ZeroOrNegativeValue(0.0)
    );
}

#[test]
fn test_report_serializes() {
    let report = decode_bom(&load_bom("fuzz_face_bom.json"), &DecodeOptions::default());
    let json = serde_json::to_value(&report).expect("Should serialize");

    assert_eq!(json["stats"]["failed"], 2);
    assert_eq!(json["lines"][0]["component"]["kind"], "resistor");
    assert_eq!(json["lines"][0]["component"]["ohms"], 33_000.0);
    assert!(json["lines"][8].get("component").is_none());
    assert!(json["lines"][8]["error"].is_string());
}

fn line<'a>(report: &'a pedalpath::BomReport, reference: &str) -> &'a pedalpath::BomLine {
    report
        .lines
        .iter()
        .find(|line| line.reference == reference)
        .unwrap_or_else(|| panic!("{} should be in the report", reference))
}

#[test]
fn test_lines_carry_equivalent_markings() {
    let entries = load_bom("fuzz_face_bom.json");

    let report = decode_bom(&entries, &DecodeOptions::default());
    assert_eq!(line(&report, "C3").notes.markings, vec!["104", "104K", "0u1K"]);
    assert_eq!(
        line(&report, "R3").notes.markings,
        vec!["gray/red/black/brown/brown", "gray/red/red/brown"]
    );

    let report = decode_bom(&entries, &load_options("decode_options.json"));
    assert_eq!(
        line(&report, "C3").notes.markings,
        vec!["104", "104J50", "0u1J50", "1H104J"]
    );
}

#[test]
fn test_lines_carry_warnings_and_advice() {
    let report = decode_bom(&load_bom("fuzz_face_bom.json"), &DecodeOptions::default());

    let c1 = line(&report, "C1");
    assert!(c1.notes.warnings.iter().any(|w| w.starts_with("Polarized")));
    assert!(c1.notes.advice.is_some());

    assert!(line(&report, "R1").notes.warnings.is_empty());
    assert!(line(&report, "U1").notes.hints[0].contains("Pin 1"));

    // failed lines carry no notes
    let c4 = line(&report, "C4");
    assert!(c4.notes.markings.is_empty());
    assert!(c4.notes.advice.is_none());
}

#[test]
fn test_report_names_the_layout() {
    let entries = load_bom("fuzz_face_bom.json");
    assert_eq!(decode_bom(&entries, &DecodeOptions::default()).layout, Some("full-830"));

    let report = decode_bom(&entries, &load_options("decode_options.json"));
    assert_eq!(report.layout, Some("half-400"));

    let json = serde_json::to_value(&report).expect("Should serialize");
    assert_eq!(json["layout"], "half-400");
    assert_eq!(json["lines"][7]["markings"][1], "104J50");
    assert!(json["lines"][8].get("markings").is_none());
}

#[test]
fn test_invalid_options_are_rejected() {
    let options: DecodeOptions =
        serde_json::from_str(r#"{"capacitor_tolerance": 3.0}"#).expect("Should parse");
    assert_eq!(options.validate(), Err(CodecError::ToleranceOutOfRange(3.0)));

    let options: DecodeOptions =
        serde_json::from_str(r#"{"layout": "breadboard-9000"}"#).expect("Should parse");
    assert!(matches!(options.breadboard(), Err(CodecError::UnknownLayout(_))));
    assert_eq!(decode_bom(&[], &options).layout, None);
}
