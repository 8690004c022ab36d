//! Small shared grammars: tolerance letters, IEC voltage codes and BOM
//! resistance strings.

use crate::core::CodecError;
use crate::parser::scanner::Scanner;

/// Capacitor tolerance letters and the percentage they stand for.
/// `Z` is the asymmetric +80/-20 % code; its upper bound is reported.
const TOLERANCE_LETTERS: [(char, f64); 9] = [
    ('B', 0.1),
    ('C', 0.25),
    ('D', 0.5),
    ('F', 1.0),
    ('G', 2.0),
    ('J', 5.0),
    ('K', 10.0),
    ('M', 20.0),
    ('Z', 80.0),
];

/// Letters an encoder is allowed to emit.
const ENCODABLE_LETTERS: [char; 5] = ['F', 'G', 'J', 'K', 'M'];

/// IEC 60062 voltage codes found on small film and ceramic parts.
const VOLTAGE_CODES: [(&str, u32); 25] = [
    ("0G", 4),
    ("0L", 5),
    ("0J", 6),
    ("1A", 10),
    ("1B", 12),
    ("1C", 16),
    ("1E", 25),
    ("1H", 50),
    ("1J", 63),
    ("1K", 80),
    ("2A", 100),
    ("2B", 125),
    ("2C", 160),
    ("2D", 200),
    ("2E", 250),
    ("2F", 315),
    ("2G", 400),
    ("2H", 500),
    ("2J", 630),
    ("2K", 800),
    ("3A", 1000),
    ("3B", 1250),
    ("3C", 1600),
    ("3D", 2000),
    ("3E", 2500),
];

/// Percentage for a tolerance letter (case-insensitive).
pub fn tolerance_for_letter(letter: char) -> Option<f64> {
    let upper = letter.to_ascii_uppercase();
    TOLERANCE_LETTERS
        .iter()
        .find(|(l, _)| *l == upper)
        .map(|(_, pct)| *pct)
}

/// Letter for a tolerance an encoder may emit (F, G, J, K, M).
pub fn encode_tolerance_letter(percent: f64) -> Option<char> {
    TOLERANCE_LETTERS
        .iter()
        .filter(|(l, _)| ENCODABLE_LETTERS.contains(l))
        .find(|(_, pct)| (pct - percent).abs() < 1e-9)
        .map(|(l, _)| *l)
}

/// Voltage for an IEC code such as "2A" (case-insensitive).
pub fn voltage_for_code(code: &str) -> Option<u32> {
    let upper = code.to_ascii_uppercase();
    VOLTAGE_CODES
        .iter()
        .find(|(c, _)| *c == upper)
        .map(|(_, v)| *v)
}

/// IEC code for a rated voltage, if one exists.
pub fn code_for_voltage(volts: u32) -> Option<&'static str> {
    VOLTAGE_CODES
        .iter()
        .find(|(_, v)| *v == volts)
        .map(|(c, _)| *c)
}

/// Parse a resistance as written in a bill of materials.
///
/// Accepts plain numbers ("470"), SI suffixes ("47k", "2.2M"), R-notation
/// where the suffix is the decimal point ("4k7", "4R7", "1M5") and trailing
/// ohm markers ("47kΩ", "560 ohms").
pub fn parse_resistance(text: &str) -> Result<f64, CodecError> {
    let fail = || CodecError::MarkingParse(format!("\"{}\" is not a resistance", text.trim()));

    let mut cleaned = text.trim().to_string();
    for marker in ["\u{2126}", "\u{3A9}", "ohms", "Ohms", "OHMS", "ohm", "Ohm", "OHM"] {
        if let Some(stripped) = cleaned.strip_suffix(marker) {
            cleaned = stripped.trim_end().to_string();
            break;
        }
    }

    let mut scanner = Scanner::new(&cleaned);
    let whole = scanner.decimal().ok_or_else(fail)?;
    scanner.skip_whitespace();

    let value = match scanner.bump() {
        None => whole,
        Some(suffix) => {
            let multiplier = match suffix {
                'R' | 'r' => 1.0,
                'K' | 'k' => 1e3,
                'M' | 'm' => 1e6,
                'G' | 'g' => 1e9,
                _ => return Err(fail()),
            };
            match scanner.digits() {
                // "4k7": the suffix replaced the decimal point
                Some(frac) if !cleaned.contains('.') => {
                    let joined: f64 = format!("{}.{}", whole, frac).parse().map_err(|_| fail())?;
                    joined * multiplier
                }
                Some(_) => return Err(fail()),
                None => whole * multiplier,
            }
        }
    };

    if !scanner.is_at_end() {
        return Err(fail());
    }
    if value <= 0.0 {
        return Err(CodecError::ZeroOrNegativeValue(value));
    }
    Ok(value)
}
