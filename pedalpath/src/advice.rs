//! Build advice for a decoded parts list.
//!
//! Turns a decoded component into what a builder needs at the bench: the
//! markings to look for on the part, how to recognize its body, and what
//! goes wrong when it is fitted badly.

use serde::Serialize;

use crate::capacitor::{self, CapType, CapacitorEncodeRequest, CapacitorSpec};
use crate::core::Component;
use crate::parts::{CathodeMarking, DiodeSpec, IcSpec, LedSpec};
use crate::resistor::{format_ohms, BandColor, ResistorSpec};

/// Resistor construction, as a BOM description names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResistorFamily {
    MetalFilm,
    CarbonFilm,
    CarbonComp,
}

impl ResistorFamily {
    /// Family named in `text`; metal film when none is.
    pub fn from_description(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("carbon comp") {
            ResistorFamily::CarbonComp
        } else if text.contains("carbon") {
            ResistorFamily::CarbonFilm
        } else {
            ResistorFamily::MetalFilm
        }
    }
}

/// Bench notes for one kind of part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartAdvice {
    pub use_for: &'static str,
    pub notes: &'static str,
    pub identification: &'static str,
    pub avoid: Option<&'static str>,
    pub polarized: bool,
    pub audio_path_safe: bool,
}

static METAL_FILM: PartAdvice = PartAdvice {
    use_for: "Everything; the default resistor for pedals",
    notes: "1% tolerance, low noise, stable. Standard for pedals.",
    identification: "Usually a blue or green body with 5 color bands.",
    avoid: None,
    polarized: false,
    audio_path_safe: true,
};

static CARBON_FILM: PartAdvice = PartAdvice {
    use_for: "Anywhere metal film is used",
    notes: "5% tolerance. Slightly noisier than metal film but fine for most pedal circuits.",
    identification: "Usually a beige or tan body with 4 color bands.",
    avoid: Some("High-impedance input stages of high-gain circuits, where noise matters."),
    polarized: false,
    audio_path_safe: true,
};

static CARBON_COMP: PartAdvice = PartAdvice {
    use_for: "Vintage-accurate builds only",
    notes: "Wider tolerance and drift over time; higher noise floor than film.",
    identification: "Larger body in earth tones, typically 4 color bands.",
    avoid: Some("Modern builds."),
    polarized: false,
    audio_path_safe: true,
};

static FILM_BOX: PartAdvice = PartAdvice {
    use_for: "Audio path coupling and tone shaping",
    notes: "Low distortion and stable. Polyester, polypropylene or box types.",
    identification: "Rectangular plastic body, usually yellow, blue or red, with a 3-digit EIA code.",
    avoid: None,
    polarized: false,
    audio_path_safe: true,
};

static CERAMIC: PartAdvice = PartAdvice {
    use_for: "Power filtering and high-frequency bypass",
    notes: "Small and cheap, but can add distortion in the audio path. Fine for small filter caps and supply decoupling.",
    identification: "Small disc, usually orange or brown, with a 3-digit code such as 104.",
    avoid: Some("Values above 10 nF in the audio path; ceramics can be microphonic."),
    polarized: false,
    audio_path_safe: false,
};

static ELECTROLYTIC: PartAdvice = PartAdvice {
    use_for: "Supply filtering and coupling above 1 µF",
    notes: "Polarized. The positive lead goes toward the higher DC voltage.",
    identification: "Cylinder with a stripe on the negative side; value and voltage printed directly.",
    avoid: Some("The audio path, unless more than 1 µF is needed and no film part fits."),
    polarized: true,
    audio_path_safe: false,
};

static TANTALUM: PartAdvice = PartAdvice {
    use_for: "Supply filtering where space is tight",
    notes: "Polarized. Fails short, sometimes violently, when reverse-biased.",
    identification: "Small teardrop with a stripe or dot on the positive lead.",
    avoid: Some("The audio path. Derate the voltage."),
    polarized: true,
    audio_path_safe: false,
};

pub fn resistor_advice(family: ResistorFamily) -> &'static PartAdvice {
    match family {
        ResistorFamily::MetalFilm => &METAL_FILM,
        ResistorFamily::CarbonFilm => &CARBON_FILM,
        ResistorFamily::CarbonComp => &CARBON_COMP,
    }
}

pub fn capacitor_advice(cap_type: CapType) -> &'static PartAdvice {
    match cap_type {
        CapType::FilmBox => &FILM_BOX,
        CapType::Ceramic => &CERAMIC,
        CapType::Electrolytic => &ELECTROLYTIC,
        CapType::Tantalum => &TANTALUM,
    }
}

/// Ceramics above this are flagged when they may sit in the audio path.
const CERAMIC_AUDIO_LIMIT_PF: f64 = 10_000.0;

/// What to look for on the part and what to watch when fitting it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildNotes {
    /// Equivalent markings, the BOM's own first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub markings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hints: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advice: Option<&'static str>,
}

impl BuildNotes {
    fn add_marking(&mut self, marking: &str) {
        if !self.markings.iter().any(|m| m == marking) {
            self.markings.push(marking.to_string());
        }
    }
}

/// Notes for a decoded part; `description` is the BOM line's free text.
pub fn build_notes(component: &Component, description: &str) -> BuildNotes {
    match component {
        Component::Resistor(spec) => {
            resistor_notes(spec, ResistorFamily::from_description(description))
        }
        Component::Capacitor(spec) => capacitor_notes(spec),
        Component::Ic(spec) => ic_notes(spec),
        Component::Diode(spec) => diode_notes(spec),
        Component::Led(spec) => led_notes(spec),
    }
}

fn band_list(bands: &[BandColor]) -> String {
    bands.iter().map(|b| b.name()).collect::<Vec<_>>().join("/")
}

fn resistor_notes(spec: &ResistorSpec, family: ResistorFamily) -> BuildNotes {
    let advice = resistor_advice(family);
    let five = band_list(&spec.bands5);
    let mut notes = BuildNotes {
        hints: vec![format!("Look for these color bands: {}", five)],
        advice: Some(advice.notes),
        ..BuildNotes::default()
    };
    notes.add_marking(&five);

    if let Some(bands4) = &spec.bands4 {
        let four = band_list(bands4);
        notes.hints.push(format!("4-band alternative: {}", four));
        notes.add_marking(&four);
    }
    notes.hints.push(advice.identification.to_string());

    if let Some(nearest) = spec.nearest_standard_value() {
        notes.warnings.push(format!(
            "{} is not a standard value; nearest is {}. Check the schematic.",
            format_ohms(spec.ohms),
            format_ohms(nearest)
        ));
    }
    notes
}

/// A rating the encoder can print as a voltage suffix.
fn printable_voltage(volts: Option<f64>) -> Option<u32> {
    volts
        .filter(|v| v.fract() == 0.0 && (10.0..=9999.0).contains(v))
        .map(|v| v as u32)
}

fn capacitor_notes(spec: &CapacitorSpec) -> BuildNotes {
    let advice = capacitor_advice(spec.cap_type);
    let mut notes = BuildNotes {
        advice: Some(advice.notes),
        ..BuildNotes::default()
    };
    notes.add_marking(&spec.source);

    // polarized parts carry their value in plain text
    if !spec.cap_type.is_polarized() {
        let request = CapacitorEncodeRequest {
            pf: Some(spec.capacitance.pf),
            tolerance_percent: spec.tolerance_percent,
            voltage: printable_voltage(spec.voltage_max),
            ..CapacitorEncodeRequest::default()
        };
        match capacitor::encode(&request) {
            Ok(encoded) => {
                notes.hints.push(format!("Look for EIA code: {}", encoded.full_film_code));
                notes.hints.push(format!("Or alphanumeric: {}", encoded.full_alpha_code));
                notes.add_marking(&encoded.full_film_code);
                notes.add_marking(&encoded.full_alpha_code);
                if let Some(iec) = &encoded.iec_film_code {
                    notes.add_marking(iec);
                }
            }
            Err(e) => tracing::debug!("No equivalent markings for {:?}: {}", spec.source, e),
        }
    }
    notes.hints.push(advice.identification.to_string());

    if spec.cap_type == CapType::Ceramic && spec.capacitance.pf > CERAMIC_AUDIO_LIMIT_PF {
        notes.warnings.push(
            "Large ceramic value; use a film capacitor if this sits in the audio path."
                .to_string(),
        );
    }
    if spec.polarized {
        notes.warnings.push(
            "Polarized: the positive lead goes toward the higher DC voltage. Reversed, it can fail."
                .to_string(),
        );
    }
    notes
}

fn ic_notes(spec: &IcSpec) -> BuildNotes {
    let mut notes = BuildNotes {
        hints: vec!["Pin 1 is next to the notch or dot on the package.".to_string()],
        warnings: vec!["Orientation matters: check pin 1 before powering up.".to_string()],
        ..BuildNotes::default()
    };
    notes.add_marking(&spec.part_number);
    if spec.is_generic {
        notes
            .warnings
            .push(format!("{} is not in the registry; confirm its pinout.", spec.part_number));
    }
    notes
}

fn cathode_hint(marking: CathodeMarking) -> &'static str {
    match marking {
        CathodeMarking::Band => "The cathode is the end with the band.",
        CathodeMarking::FlatEdge => "The cathode is the short leg, by the flat edge of the rim.",
    }
}

fn diode_notes(spec: &DiodeSpec) -> BuildNotes {
    let mut notes = BuildNotes {
        hints: vec![cathode_hint(spec.cathode_marking).to_string()],
        warnings: vec!["Polarized: match the cathode to the layout.".to_string()],
        ..BuildNotes::default()
    };
    notes.add_marking(&spec.part_number);
    notes
}

fn led_notes(spec: &LedSpec) -> BuildNotes {
    let mut notes = BuildNotes {
        hints: vec![
            cathode_hint(spec.cathode_marking).to_string(),
            format!("Drops about {} V when lit.", spec.forward_voltage),
        ],
        warnings: vec!["Polarized: a reversed LED stays dark.".to_string()],
        ..BuildNotes::default()
    };
    notes.add_marking(&spec.part_number);
    notes
}
