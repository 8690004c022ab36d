//! Capacitor marking decoder and encoder.
//!
//! Decoding runs the grammars of [`crate::parser::marking`] in priority
//! order and classifies the result; encoding produces the EIA and
//! alphanumeric forms a builder would find printed on a part.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::CodecError;
use crate::format::{relative_error, scale_by_decade, significant};
use crate::parser::marking::{recognize, MarkingGrammar, RawMarking};
use crate::parser::value::{code_for_voltage, encode_tolerance_letter};

/// Physical construction of a capacitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapType {
    Ceramic,
    FilmBox,
    Electrolytic,
    Tantalum,
}

impl CapType {
    pub fn is_polarized(self) -> bool {
        matches!(self, CapType::Electrolytic | CapType::Tantalum)
    }

    /// Best guess from value alone.
    pub fn classify(picofarads: f64) -> CapType {
        if picofarads < 1_000.0 {
            CapType::Ceramic
        } else if picofarads < 1_000_000.0 {
            CapType::FilmBox
        } else {
            CapType::Electrolytic
        }
    }
}

impl fmt::Display for CapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CapType::Ceramic => "ceramic",
            CapType::FilmBox => "film box",
            CapType::Electrolytic => "electrolytic",
            CapType::Tantalum => "tantalum",
        };
        f.write_str(name)
    }
}

/// One capacitance in picofarads, nanofarads and microfarads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapUnits {
    pub pf: f64,
    pub nf: f64,
    pub uf: f64,
}

pub fn pf_to_units(pf: f64) -> CapUnits {
    CapUnits {
        pf,
        nf: pf / 1e3,
        uf: pf / 1e6,
    }
}

pub fn nf_to_units(nf: f64) -> CapUnits {
    CapUnits {
        pf: nf * 1e3,
        nf,
        uf: nf / 1e3,
    }
}

pub fn uf_to_units(uf: f64) -> CapUnits {
    CapUnits {
        pf: uf * 1e6,
        nf: uf * 1e3,
        uf,
    }
}

impl CapUnits {
    /// "47000 pF / 47 nF / 0.047 µF"
    pub fn all_units(&self) -> String {
        format!(
            "{} pF / {} nF / {} µF",
            significant(self.pf, 4),
            significant(self.nf, 4),
            significant(self.uf, 4)
        )
    }
}

impl fmt::Display for CapUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.uf >= 1.0 {
            write!(f, "{} µF", significant(self.uf, 3))
        } else if self.nf >= 1.0 {
            write!(f, "{} nF", significant(self.nf, 3))
        } else {
            write!(f, "{} pF", significant(self.pf, 3))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacitorSpec {
    pub capacitance: CapUnits,
    pub cap_type: CapType,
    pub polarized: bool,
    pub tolerance_percent: Option<f64>,
    pub tolerance_letter: Option<char>,
    pub voltage_max: Option<f64>,
    pub grammar: MarkingGrammar,
    pub source: String,
}

impl CapacitorSpec {
    fn from_raw(raw: RawMarking, cap_type: CapType, source: &str) -> Self {
        let (tolerance_letter, tolerance_percent) = match (raw.grammar, raw.tolerance_letter) {
            // electrolytics are not letter-coded; assume the usual 20 %
            (MarkingGrammar::Electrolytic, None) => (Some('M'), Some(20.0)),
            _ => (raw.tolerance_letter, raw.tolerance_percent),
        };
        Self {
            capacitance: pf_to_units(raw.picofarads),
            cap_type,
            polarized: cap_type.is_polarized(),
            tolerance_percent,
            tolerance_letter,
            voltage_max: raw.voltage,
            grammar: raw.grammar,
            source: source.to_string(),
        }
    }
}

impl fmt::Display for CapacitorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.capacitance)?;
        if let Some(pct) = self.tolerance_percent {
            write!(f, " ±{}%", pct)?;
        }
        if let Some(volts) = self.voltage_max {
            write!(f, " {}V", volts)?;
        }
        write!(f, " {}", self.cap_type)
    }
}

fn recognize_marking(marking: &str) -> Result<(RawMarking, &str), CodecError> {
    let trimmed = marking.trim();
    if trimmed.is_empty() {
        return Err(CodecError::MarkingParse("empty capacitor marking".to_string()));
    }
    let raw = recognize(trimmed).ok_or_else(|| {
        CodecError::MarkingParse(format!("\"{}\" matches no capacitor marking", trimmed))
    })?;
    if !(raw.picofarads.is_finite() && raw.picofarads > 0.0) {
        return Err(CodecError::MarkingParse(format!(
            "\"{}\" decodes to zero capacitance",
            trimmed
        )));
    }
    Ok((raw, trimmed))
}

/// Decode a printed capacitor marking.
pub fn decode(marking: &str) -> Result<CapacitorSpec, CodecError> {
    let (raw, source) = recognize_marking(marking)?;
    let cap_type = match raw.grammar {
        MarkingGrammar::Electrolytic => CapType::Electrolytic,
        _ => CapType::classify(raw.picofarads),
    };
    Ok(CapacitorSpec::from_raw(raw, cap_type, source))
}

/// Decode a marking when the physical type is already known.
pub fn decode_with_type(marking: &str, forced: CapType) -> Result<CapacitorSpec, CodecError> {
    let (raw, source) = recognize_marking(marking)?;
    Ok(CapacitorSpec::from_raw(raw, forced, source))
}

/// Input to [`encode`]: exactly one of `pf`, `nf`, `uf`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacitorEncodeRequest {
    pub pf: Option<f64>,
    pub nf: Option<f64>,
    pub uf: Option<f64>,
    pub tolerance_percent: Option<f64>,
    pub voltage: Option<u32>,
}

impl CapacitorEncodeRequest {
    pub fn picofarads(pf: f64) -> Self {
        Self {
            pf: Some(pf),
            ..Self::default()
        }
    }

    pub fn nanofarads(nf: f64) -> Self {
        Self {
            nf: Some(nf),
            ..Self::default()
        }
    }

    pub fn microfarads(uf: f64) -> Self {
        Self {
            uf: Some(uf),
            ..Self::default()
        }
    }

    pub fn with_tolerance(mut self, percent: f64) -> Self {
        self.tolerance_percent = Some(percent);
        self
    }

    pub fn with_voltage(mut self, volts: u32) -> Self {
        self.voltage = Some(volts);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedCapacitor {
    pub capacitance: CapUnits,
    /// "473"
    pub eia_code: String,
    /// "47n"
    pub alpha_code: String,
    /// "473K100"
    pub full_film_code: String,
    /// "47nK100"
    pub full_alpha_code: String,
    /// "2A473K", when the voltage has an IEC code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iec_film_code: Option<String>,
    pub tolerance_letter: char,
    pub tolerance_percent: f64,
    pub voltage: Option<u32>,
}

/// Default tolerance when a request leaves it out.
pub const DEFAULT_TOLERANCE: f64 = 10.0;

/// Encode a capacitance into EIA and alphanumeric markings.
pub fn encode(request: &CapacitorEncodeRequest) -> Result<EncodedCapacitor, CodecError> {
    let conversions: [(Option<f64>, fn(f64) -> CapUnits); 3] = [
        (request.pf, pf_to_units),
        (request.nf, nf_to_units),
        (request.uf, uf_to_units),
    ];
    let given: Vec<(f64, fn(f64) -> CapUnits)> = conversions
        .into_iter()
        .filter_map(|(value, to_units)| value.map(|v| (v, to_units)))
        .collect();
    let (value, to_units) = match given.as_slice() {
        [single] => *single,
        _ => return Err(CodecError::MultipleValueSpecifiedForEncode(given.len())),
    };
    if value.is_nan() || value <= 0.0 {
        return Err(CodecError::ZeroOrNegativeValue(value));
    }
    let capacitance = to_units(value);

    let tolerance_percent = request.tolerance_percent.unwrap_or(DEFAULT_TOLERANCE);
    let tolerance_letter = encode_tolerance_letter(tolerance_percent)
        .ok_or(CodecError::ToleranceOutOfRange(tolerance_percent))?;

    let voltage_suffix = match request.voltage {
        None => String::new(),
        Some(0) => return Err(CodecError::ZeroOrNegativeValue(0.0)),
        Some(v) if (10..=9999).contains(&v) => v.to_string(),
        Some(v) => {
            return Err(CodecError::Unrepresentable(format!(
                "{} V does not fit a 2-4 digit voltage suffix",
                v
            )))
        }
    };

    let eia_code = encode_eia(capacitance.pf)?;
    let alpha_code = encode_alpha(capacitance.pf);
    // "47nF100" would read as 47 nF with no tolerance; spell the unit out
    let unit_marker = match alpha_code.chars().last() {
        Some(last) if tolerance_letter == 'F' && last.is_ascii_alphabetic() => "F",
        _ => "",
    };
    let iec_film_code = request
        .voltage
        .and_then(code_for_voltage)
        .map(|code| format!("{}{}{}", code, eia_code, tolerance_letter));
    Ok(EncodedCapacitor {
        capacitance,
        full_film_code: format!("{}{}{}", eia_code, tolerance_letter, voltage_suffix),
        full_alpha_code: format!(
            "{}{}{}{}",
            alpha_code, unit_marker, tolerance_letter, voltage_suffix
        ),
        iec_film_code,
        eia_code,
        alpha_code,
        tolerance_letter,
        tolerance_percent,
        voltage: request.voltage,
    })
}

/// Exponent digits in search order, with the power of ten each stands for.
/// A value that rounds off the grid at one exponent may still land exactly
/// on a finer one ("959" is 9.5 pF), so every exponent is tried.
const EIA_EXPONENTS: [(u32, i32); 10] = [
    (0, 0),
    (1, 1),
    (2, 2),
    (3, 3),
    (4, 4),
    (5, 5),
    (6, 6),
    (7, 7),
    (9, -1),
    (8, -2),
];

fn encode_eia(pf: f64) -> Result<String, CodecError> {
    for (digit, exponent) in EIA_EXPONENTS {
        let scaled = scale_by_decade(pf, -exponent);
        if (9.5..99.5).contains(&scaled) {
            let significand = scaled.round();
            if relative_error(scale_by_decade(significand, exponent), pf) < 1e-3 {
                return Ok(format!("{}{}", significand as u32, digit));
            }
        }
    }
    Err(CodecError::Unrepresentable(format!(
        "{} pF has no two-digit EIA code",
        significant(pf, 6)
    )))
}

/// R-decimal form in the most natural unit: "47n", "4n7", "0u22".
fn encode_alpha(pf: f64) -> String {
    let (value, unit) = if pf >= 1e5 {
        (pf / 1e6, 'u')
    } else if pf >= 100.0 {
        (pf / 1e3, 'n')
    } else {
        (pf, 'p')
    };
    let text = significant(value, 3);
    match text.split_once('.') {
        Some((whole, frac)) => format!("{}{}{}", whole, unit, frac),
        None => format!("{}{}", text, unit),
    }
}
