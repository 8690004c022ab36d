//! Core types shared by every decoder: the error taxonomy, decode options,
//! the closed component sum type and bill-of-materials dispatch.
//! Pure computation; nothing here touches the filesystem.

use serde::{Deserialize, Serialize};

use crate::advice::{build_notes, BuildNotes};
use crate::breadboard::{BreadboardLayout, FULL_830};
use crate::capacitor::{self, CapType, CapacitorSpec};
use crate::parser::value::{encode_tolerance_letter, parse_resistance};
use crate::parts::diode::{self, DiodeSpec};
use crate::parts::ic::{self, IcSpec};
use crate::parts::led::{self, LedSize, LedSpec};
use crate::resistor::{self, BandColor, ResistorSpec, STANDARD_TOLERANCES};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CodecError {
    #[error("Expected 4 or 5 color bands, got {0}")]
    InvalidBandCount(usize),
    #[error("Invalid band color: {0}")]
    InvalidBandColor(String),
    #[error("Unrecognized marking: {0}")]
    MarkingParse(String),
    #[error("Tolerance {0}% is not a standard value")]
    ToleranceOutOfRange(f64),
    #[error("Value must be positive, got {0}")]
    ZeroOrNegativeValue(f64),
    #[error("Exactly one capacitance field must be given, got {0}")]
    MultipleValueSpecifiedForEncode(usize),
    #[error("Hole id out of range: {0}")]
    HoleIdOutOfRange(String),
    #[error("Cannot represent value: {0}")]
    Unrepresentable(String),
    #[error("Invalid LED size: {0}")]
    InvalidLedSize(String),
    #[error("Unknown breadboard layout: {0}")]
    UnknownLayout(String),
}

/// Defaults used when a BOM entry leaves something unspecified.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    pub resistor_tolerance: f64,
    pub capacitor_tolerance: f64,
    pub capacitor_voltage: Option<u32>,
    pub led_size: LedSize,
    pub layout: String,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            resistor_tolerance: 1.0,
            capacitor_tolerance: 10.0,
            capacitor_voltage: None,
            led_size: LedSize::FiveMm,
            layout: FULL_830.name.to_string(),
        }
    }
}

impl DecodeOptions {
    /// The configured breadboard.
    pub fn breadboard(&self) -> Result<&'static BreadboardLayout, CodecError> {
        BreadboardLayout::by_name(&self.layout)
            .ok_or_else(|| CodecError::UnknownLayout(self.layout.clone()))
    }

    /// Check every default can actually be applied; run after loading or
    /// overriding options.
    pub fn validate(&self) -> Result<(), CodecError> {
        if !STANDARD_TOLERANCES.contains(&self.resistor_tolerance) {
            return Err(CodecError::ToleranceOutOfRange(self.resistor_tolerance));
        }
        if encode_tolerance_letter(self.capacitor_tolerance).is_none() {
            return Err(CodecError::ToleranceOutOfRange(self.capacitor_tolerance));
        }
        if self.capacitor_voltage == Some(0) {
            return Err(CodecError::ZeroOrNegativeValue(0.0));
        }
        self.breadboard()?;
        Ok(())
    }
}

/// A decoded part. Closed over the kinds of component the build guide can draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Component {
    Resistor(ResistorSpec),
    Capacitor(CapacitorSpec),
    Ic(IcSpec),
    Diode(DiodeSpec),
    Led(LedSpec),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Resistor,
    Capacitor,
    Ic,
    Diode,
    Led,
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Resistor(_) => ComponentKind::Resistor,
            Component::Capacitor(_) => ComponentKind::Capacitor,
            Component::Ic(_) => ComponentKind::Ic,
            Component::Diode(_) => ComponentKind::Diode,
            Component::Led(_) => ComponentKind::Led,
        }
    }

    /// Whether the part can be inserted the wrong way round.
    pub fn is_orientation_sensitive(&self) -> bool {
        match self {
            Component::Resistor(_) => false,
            Component::Capacitor(spec) => spec.polarized,
            Component::Ic(_) | Component::Diode(_) | Component::Led(_) => true,
        }
    }

    /// One-line description for a parts list.
    pub fn summary(&self) -> String {
        match self {
            Component::Resistor(spec) => spec.to_string(),
            Component::Capacitor(spec) => spec.to_string(),
            Component::Ic(spec) => format!("{} ({}-pin DIP)", spec.part_number, spec.pin_count),
            Component::Diode(spec) => format!("{} {} diode", spec.part_number, spec.diode_type),
            Component::Led(spec) => format!("{} {} LED", spec.size, spec.led_color),
        }
    }
}

/// One line of a bill of materials as the extraction step produces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomEntry {
    pub reference: String,
    #[serde(default)]
    pub kind: String,
    pub value: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl BomEntry {
    pub fn new(reference: &str, kind: &str, value: &str) -> Self {
        Self {
            reference: reference.to_string(),
            kind: kind.to_string(),
            value: value.to_string(),
            description: String::new(),
            quantity: 1,
        }
    }

    /// Which decoder this entry belongs to: the kind text wins over the
    /// reference-designator prefix.
    pub fn component_kind(&self) -> Option<ComponentKind> {
        let kind = self.kind.to_lowercase().replace('-', " ");
        if kind.contains("resistor") {
            return Some(ComponentKind::Resistor);
        }
        if kind.contains("capacitor") {
            return Some(ComponentKind::Capacitor);
        }
        if kind.contains("led") {
            return Some(ComponentKind::Led);
        }
        if kind.contains("diode") {
            return Some(ComponentKind::Diode);
        }
        if kind == "ic" || kind.contains("op amp") || kind.contains("integrated") {
            return Some(ComponentKind::Ic);
        }

        let prefix: String = self
            .reference
            .trim()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_uppercase();
        match prefix.as_str() {
            "R" => Some(ComponentKind::Resistor),
            "C" => Some(ComponentKind::Capacitor),
            "U" | "IC" => Some(ComponentKind::Ic),
            "D" => Some(ComponentKind::Diode),
            "LED" => Some(ComponentKind::Led),
            _ => None,
        }
    }

    /// Physical capacitor type named in the kind or description, if any.
    fn capacitor_type_hint(&self) -> Option<CapType> {
        let text = format!("{} {}", self.kind, self.description).to_lowercase();
        if text.contains("tantalum") {
            Some(CapType::Tantalum)
        } else if text.contains("electrolytic") {
            Some(CapType::Electrolytic)
        } else if text.contains("ceramic") {
            Some(CapType::Ceramic)
        } else if text.contains("film") {
            Some(CapType::FilmBox)
        } else {
            None
        }
    }
}

/// Decode one BOM entry with the decoder its kind calls for.
pub fn decode_bom_entry(entry: &BomEntry, options: &DecodeOptions) -> Result<Component, CodecError> {
    let value = entry.value.trim();
    let kind = entry.component_kind().ok_or_else(|| {
        CodecError::MarkingParse(format!(
            "{}: no decoder for \"{}\"",
            entry.reference, entry.kind
        ))
    })?;

    match kind {
        ComponentKind::Resistor => {
            if let Some(bands) = split_color_bands(value) {
                return resistor::decode(&bands).map(Component::Resistor);
            }
            let ohms = parse_resistance(value)?;
            resistor::encode(ohms, options.resistor_tolerance).map(Component::Resistor)
        }
        ComponentKind::Capacitor => {
            let mut spec = match entry.capacitor_type_hint() {
                Some(forced) => capacitor::decode_with_type(value, forced)?,
                None => capacitor::decode(value)?,
            };
            if spec.tolerance_percent.is_none() {
                spec.tolerance_letter = encode_tolerance_letter(options.capacitor_tolerance);
                spec.tolerance_percent = spec.tolerance_letter.map(|_| options.capacitor_tolerance);
            }
            if spec.voltage_max.is_none() {
                spec.voltage_max = options.capacitor_voltage.map(f64::from);
            }
            Ok(Component::Capacitor(spec))
        }
        ComponentKind::Ic => Ok(Component::Ic(ic::lookup_ic(value))),
        ComponentKind::Diode => diode::lookup_diode(value).map(Component::Diode),
        ComponentKind::Led => led::lookup_led(value, options.led_size).map(Component::Led),
    }
}

/// "yellow violet black red brown" or "yellow/violet/..." as band tokens.
fn split_color_bands(value: &str) -> Option<Vec<&str>> {
    let tokens: Vec<&str> = value
        .split(|c: char| c.is_whitespace() || c == '/' || c == ',' || c == '-')
        .filter(|t| !t.is_empty())
        .collect();
    let all_colors = tokens.len() >= 3 && tokens.iter().all(|t| t.parse::<BandColor>().is_ok());
    all_colors.then_some(tokens)
}

/// Result of decoding a single BOM line.
#[derive(Debug, Clone, Serialize)]
pub struct BomLine {
    pub reference: String,
    pub quantity: u32,
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<Component>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub notes: BuildNotes,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BomStats {
    pub decoded: usize,
    pub failed: usize,
    pub orientation_sensitive: usize,
}

/// Decoded bill of materials with per-line outcomes.
#[derive(Debug, Clone, Serialize)]
pub struct BomReport {
    pub lines: Vec<BomLine>,
    pub stats: BomStats,
    /// Board the build guide is drawn on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<&'static str>,
}

impl BomReport {
    pub fn has_failures(&self) -> bool {
        self.stats.failed > 0
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.lines.iter().filter_map(|line| line.component.as_ref())
    }
}

/// Decode a whole bill of materials; failures are recorded per line and
/// never abort the remaining entries.
pub fn decode_bom(entries: &[BomEntry], options: &DecodeOptions) -> BomReport {
    if let Err(e) = options.validate() {
        tracing::warn!("Decoding BOM with invalid options: {}", e);
    }
    let mut stats = BomStats::default();
    let lines = entries
        .iter()
        .map(|entry| {
            let outcome = decode_bom_entry(entry, options);
            let (component, error, notes) = match outcome {
                Ok(component) => {
                    stats.decoded += 1;
                    if component.is_orientation_sensitive() {
                        stats.orientation_sensitive += 1;
                    }
                    let notes = build_notes(&component, &entry.description);
                    (Some(component), None, notes)
                }
                Err(e) => {
                    tracing::debug!("BOM line {} not decoded: {}", entry.reference, e);
                    stats.failed += 1;
                    (None, Some(e.to_string()), BuildNotes::default())
                }
            };
            BomLine {
                reference: entry.reference.clone(),
                quantity: entry.quantity,
                input: entry.value.clone(),
                component,
                error,
                notes,
            }
        })
        .collect();
    BomReport {
        lines,
        stats,
        layout: options.breadboard().ok().map(|layout| layout.name),
    }
}
