//! Resistor color-code decoder and encoder.
//!
//! Band meaning is positional: the last band is tolerance, the one before
//! it the multiplier, everything earlier a significant digit. Gold and
//! silver are therefore a multiplier (x0.1, x0.01) or a tolerance (5 %,
//! 10 %) depending only on where they appear, and illegal as digits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::CodecError;
use crate::format::{relative_error, scale_by_decade, significant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BandColor {
    Black,
    Brown,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Violet,
    Gray,
    White,
    Gold,
    Silver,
}

const DIGIT_COLORS: [BandColor; 10] = [
    BandColor::Black,
    BandColor::Brown,
    BandColor::Red,
    BandColor::Orange,
    BandColor::Yellow,
    BandColor::Green,
    BandColor::Blue,
    BandColor::Violet,
    BandColor::Gray,
    BandColor::White,
];

/// The eight standard tolerances, tightest first.
pub const STANDARD_TOLERANCES: [f64; 8] = [0.05, 0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0];

impl BandColor {
    pub fn name(self) -> &'static str {
        match self {
            BandColor::Black => "black",
            BandColor::Brown => "brown",
            BandColor::Red => "red",
            BandColor::Orange => "orange",
            BandColor::Yellow => "yellow",
            BandColor::Green => "green",
            BandColor::Blue => "blue",
            BandColor::Violet => "violet",
            BandColor::Gray => "gray",
            BandColor::White => "white",
            BandColor::Gold => "gold",
            BandColor::Silver => "silver",
        }
    }

    /// Value as a significant-digit band; gold and silver have none.
    pub fn digit(self) -> Option<u32> {
        DIGIT_COLORS
            .iter()
            .position(|c| *c == self)
            .map(|d| d as u32)
    }

    /// Power of ten as a multiplier band.
    pub fn multiplier_exponent(self) -> i32 {
        match self {
            BandColor::Gold => -1,
            BandColor::Silver => -2,
            other => other.digit().map(|d| d as i32).unwrap_or(0),
        }
    }

    /// Percentage as a tolerance band.
    pub fn tolerance(self) -> Option<f64> {
        match self {
            BandColor::Brown => Some(1.0),
            BandColor::Red => Some(2.0),
            BandColor::Green => Some(0.5),
            BandColor::Blue => Some(0.25),
            BandColor::Violet => Some(0.1),
            BandColor::Gray => Some(0.05),
            BandColor::Gold => Some(5.0),
            BandColor::Silver => Some(10.0),
            _ => None,
        }
    }

    fn from_digit(digit: u32) -> Option<BandColor> {
        DIGIT_COLORS.get(digit as usize).copied()
    }

    fn for_exponent(exponent: i32) -> Option<BandColor> {
        match exponent {
            -2 => Some(BandColor::Silver),
            -1 => Some(BandColor::Gold),
            0..=9 => BandColor::from_digit(exponent as u32),
            _ => None,
        }
    }

    fn for_tolerance(percent: f64) -> Option<BandColor> {
        [
            BandColor::Gray,
            BandColor::Violet,
            BandColor::Blue,
            BandColor::Green,
            BandColor::Brown,
            BandColor::Red,
            BandColor::Gold,
            BandColor::Silver,
        ]
        .into_iter()
        .find(|c| c.tolerance().map_or(false, |t| (t - percent).abs() < 1e-9))
    }
}

impl FromStr for BandColor {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "black" => Ok(BandColor::Black),
            "brown" => Ok(BandColor::Brown),
            "red" => Ok(BandColor::Red),
            "orange" => Ok(BandColor::Orange),
            "yellow" => Ok(BandColor::Yellow),
            "green" => Ok(BandColor::Green),
            "blue" => Ok(BandColor::Blue),
            "violet" | "purple" => Ok(BandColor::Violet),
            "gray" | "grey" => Ok(BandColor::Gray),
            "white" => Ok(BandColor::White),
            "gold" => Ok(BandColor::Gold),
            "silver" => Ok(BandColor::Silver),
            _ => Err(CodecError::InvalidBandColor(s.trim().to_string())),
        }
    }
}

impl AsRef<str> for BandColor {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl fmt::Display for BandColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ESeries {
    E12,
    E24,
    E48,
    E96,
}

impl fmt::Display for ESeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ESeries::E12 => "E12",
            ESeries::E24 => "E24",
            ESeries::E48 => "E48",
            ESeries::E96 => "E96",
        };
        f.write_str(name)
    }
}

// Mantissas in hundredths, IEC 60063.
const E12: [u16; 12] = [100, 120, 150, 180, 220, 270, 330, 390, 470, 560, 680, 820];

const E24: [u16; 24] = [
    100, 110, 120, 130, 150, 160, 180, 200, 220, 240, 270, 300, 330, 360, 390, 430, 470, 510,
    560, 620, 680, 750, 820, 910,
];

const E48: [u16; 48] = [
    100, 105, 110, 115, 121, 127, 133, 140, 147, 154, 162, 169, 178, 187, 196, 205, 215, 226,
    237, 249, 261, 274, 287, 301, 316, 332, 348, 365, 383, 402, 422, 442, 464, 487, 511, 536,
    562, 590, 619, 649, 681, 715, 750, 787, 825, 866, 909, 953,
];

const E96: [u16; 96] = [
    100, 102, 105, 107, 110, 113, 115, 118, 121, 124, 127, 130, 133, 137, 140, 143, 147, 150,
    154, 158, 162, 165, 169, 174, 178, 182, 187, 191, 196, 200, 205, 210, 215, 221, 226, 232,
    237, 243, 249, 255, 261, 267, 274, 280, 287, 294, 301, 309, 316, 324, 332, 340, 348, 357,
    365, 374, 383, 392, 402, 412, 422, 432, 442, 453, 464, 475, 487, 499, 511, 523, 536, 549,
    562, 576, 590, 604, 619, 634, 649, 665, 681, 698, 715, 732, 750, 768, 787, 806, 825, 845,
    866, 887, 909, 931, 953, 976,
];

impl ESeries {
    /// Coarsest first; the first series containing a value wins.
    pub const ALL: [ESeries; 4] = [ESeries::E12, ESeries::E24, ESeries::E48, ESeries::E96];

    fn mantissas(self) -> &'static [u16] {
        match self {
            ESeries::E12 => &E12,
            ESeries::E24 => &E24,
            ESeries::E48 => &E48,
            ESeries::E96 => &E96,
        }
    }

    /// Standard values of this series within one decade, e.g. 1000..10000.
    pub fn values_in_decade(self, exponent: i32) -> Vec<f64> {
        self.mantissas()
            .iter()
            .map(|m| scale_by_decade(f64::from(*m), exponent - 2))
            .collect()
    }
}

/// Either the series a value belongs to or the nearest standard value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ESeriesMatch {
    Exact(ESeries),
    Nearest(f64),
}

impl ESeriesMatch {
    pub fn series(&self) -> Option<ESeries> {
        match self {
            ESeriesMatch::Exact(series) => Some(*series),
            ESeriesMatch::Nearest(_) => None,
        }
    }

    pub fn nearest(&self) -> Option<f64> {
        match self {
            ESeriesMatch::Exact(_) => None,
            ESeriesMatch::Nearest(value) => Some(*value),
        }
    }
}

/// Check which E-series contains `ohms`, or find the closest standard value.
pub fn find_e_series(ohms: f64) -> Result<ESeriesMatch, CodecError> {
    if ohms.is_nan() || ohms <= 0.0 || ohms.is_infinite() {
        return Err(CodecError::ZeroOrNegativeValue(ohms));
    }

    let mut exponent = ohms.log10().floor() as i32;
    let mut mantissa = scale_by_decade(ohms, -exponent);
    if mantissa >= 10.0 {
        exponent += 1;
        mantissa = scale_by_decade(ohms, -exponent);
    } else if mantissa < 1.0 {
        exponent -= 1;
        mantissa = scale_by_decade(ohms, -exponent);
    }

    let mut cents = (mantissa * 100.0).round() as u16;
    if cents == 1000 {
        cents = 100;
    }
    if let Some(series) = ESeries::ALL
        .into_iter()
        .find(|s| s.mantissas().contains(&cents))
    {
        return Ok(ESeriesMatch::Exact(series));
    }

    let mut candidates: Vec<u16> = ESeries::ALL
        .iter()
        .flat_map(|s| s.mantissas().iter().copied())
        .collect();
    candidates.push(1000);

    let mut best = candidates[0];
    let mut best_diff = f64::INFINITY;
    for candidate in candidates {
        let diff = (f64::from(candidate) / 100.0 - mantissa).abs();
        if diff < best_diff {
            best = candidate;
            best_diff = diff;
        }
    }
    Ok(ESeriesMatch::Nearest(scale_by_decade(f64::from(best), exponent - 2)))
}

/// Format a resistance with an SI prefix: "47 kΩ", "4.7 Ω", "1 MΩ".
pub fn format_ohms(ohms: f64) -> String {
    if ohms.is_nan() || ohms <= 0.0 {
        return "0 Ω".to_string();
    }
    let units = [(1e9, "GΩ"), (1e6, "MΩ"), (1e3, "kΩ")];
    for (scale, unit) in units {
        if ohms >= scale {
            return format!("{} {}", significant(ohms / scale, 3), unit);
        }
    }
    format!("{} Ω", significant(ohms, 3))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResistorSpec {
    pub ohms: f64,
    pub tolerance_percent: f64,
    pub bands5: [BandColor; 5],
    pub bands4: Option<[BandColor; 4]>,
    pub e_series: ESeriesMatch,
}

impl ResistorSpec {
    pub fn e_series_match(&self) -> Option<ESeries> {
        self.e_series.series()
    }

    pub fn nearest_standard_value(&self) -> Option<f64> {
        self.e_series.nearest()
    }

    /// Build the canonical spec for `significand x 10^exponent` ohms.
    fn from_parts(significand: u32, exponent: i32, tolerance: BandColor) -> Result<Self, CodecError> {
        let tolerance_percent = tolerance
            .tolerance()
            .ok_or_else(|| CodecError::InvalidBandColor(tolerance.name().to_string()))?;

        let (mut sig, mut exp) = (significand, exponent);
        while sig < 100 && exp > -2 {
            sig *= 10;
            exp -= 1;
        }
        let unrepresentable = || {
            CodecError::Unrepresentable(format!("{}e{} ohms needs more than 3 digits", significand, exponent))
        };
        if sig >= 1000 {
            return Err(unrepresentable());
        }

        let multiplier = BandColor::for_exponent(exp).ok_or_else(unrepresentable)?;
        let digits = [sig / 100, (sig / 10) % 10, sig % 10];
        let band = |d: u32| BandColor::from_digit(d).ok_or_else(unrepresentable);
        let bands5 = [band(digits[0])?, band(digits[1])?, band(digits[2])?, multiplier, tolerance];

        let short = if sig >= 100 && sig % 10 == 0 {
            Some((sig / 10, exp + 1))
        } else if sig < 100 {
            Some((sig, exp))
        } else {
            None
        };
        let bands4 = match short {
            Some((two, e)) => match BandColor::for_exponent(e) {
                Some(m) => Some([band(two / 10)?, band(two % 10)?, m, tolerance]),
                None => None,
            },
            None => None,
        };

        let ohms = scale_by_decade(f64::from(sig), exp);
        Ok(Self {
            ohms,
            tolerance_percent,
            bands5,
            bands4,
            e_series: find_e_series(ohms)?,
        })
    }
}

impl fmt::Display for ResistorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ±{}%", format_ohms(self.ohms), self.tolerance_percent)
    }
}

/// Decode a 4- or 5-band color code.
pub fn decode<S: AsRef<str>>(bands: &[S]) -> Result<ResistorSpec, CodecError> {
    if bands.len() != 4 && bands.len() != 5 {
        return Err(CodecError::InvalidBandCount(bands.len()));
    }
    let colors = bands
        .iter()
        .map(|b| b.as_ref().parse::<BandColor>())
        .collect::<Result<Vec<_>, _>>()?;

    let (digit_bands, rest) = colors.split_at(colors.len() - 2);
    let mut significand = 0u32;
    for (position, color) in digit_bands.iter().enumerate() {
        let digit = color.digit().ok_or_else(|| {
            CodecError::InvalidBandColor(format!("{} cannot be digit band {}", color, position + 1))
        })?;
        significand = significand * 10 + digit;
    }
    let exponent = rest[0].multiplier_exponent();
    let tolerance = rest[1];
    if tolerance.tolerance().is_none() {
        return Err(CodecError::InvalidBandColor(format!(
            "{} is not a tolerance band",
            tolerance
        )));
    }
    if significand == 0 {
        return Err(CodecError::ZeroOrNegativeValue(0.0));
    }

    ResistorSpec::from_parts(significand, exponent, tolerance)
}

/// Encode a resistance and tolerance into color bands.
pub fn encode(ohms: f64, tolerance_percent: f64) -> Result<ResistorSpec, CodecError> {
    let tolerance = BandColor::for_tolerance(tolerance_percent)
        .ok_or(CodecError::ToleranceOutOfRange(tolerance_percent))?;
    if ohms.is_nan() || ohms <= 0.0 {
        return Err(CodecError::ZeroOrNegativeValue(ohms));
    }
    if ohms.is_infinite() {
        return Err(CodecError::Unrepresentable(format!("{} ohms", ohms)));
    }

    let (significand, exponent) = quantize(ohms)?;
    ResistorSpec::from_parts(significand, exponent, tolerance)
}

/// Three significant digits and a band exponent in -2..=9.
fn quantize(ohms: f64) -> Result<(u32, i32), CodecError> {
    let unrepresentable = || CodecError::Unrepresentable(format!("{} ohms", ohms));
    let accept = |sig: f64, exp: i32| {
        let sig = sig.round();
        if sig >= 1.0 && relative_error(scale_by_decade(sig, exp), ohms) < 1e-3 {
            Ok((sig as u32, exp))
        } else {
            Err(unrepresentable())
        }
    };

    for exponent in -2..=9 {
        let scaled = scale_by_decade(ohms, -exponent);
        if (99.5..999.5).contains(&scaled) {
            return accept(scaled, exponent);
        }
    }
    // below 0.995 ohm: silver multiplier with leading zero digits
    let scaled = scale_by_decade(ohms, 2);
    if scaled < 99.5 {
        return accept(scaled, -2);
    }
    Err(unrepresentable())
}

#[cfg(test)]
mod tests {
    use super::*;
    use BandColor::*;

    fn approx(a: f64, b: f64) -> bool {
        relative_error(a, b) < 1e-9
    }

    #[test]
    fn test_decode_five_band() {
        let spec = decode(&["yellow", "violet", "black", "red", "brown"]).unwrap();
        assert!(approx(spec.ohms, 47_000.0));
        assert_eq!(spec.tolerance_percent, 1.0);
        assert_eq!(spec.bands5, [Yellow, Violet, Black, Red, Brown]);
        assert_eq!(spec.bands4, Some([Yellow, Violet, Orange, Brown]));
        assert_eq!(spec.e_series_match(), Some(ESeries::E12));
        assert_eq!(spec.nearest_standard_value(), None);
    }

    #[test]
    fn test_decode_four_band() {
        let spec = decode(&["brown", "black", "orange", "gold"]).unwrap();
        assert!(approx(spec.ohms, 10_000.0));
        assert_eq!(spec.tolerance_percent, 5.0);
        assert_eq!(spec.bands5, [Brown, Black, Black, Red, Gold]);
    }

    #[test]
    fn test_decode_band_count() {
        assert_eq!(
            decode(&["red", "red", "red"]),
            Err(CodecError::InvalidBandCount(3))
        );
        assert_eq!(
            decode(&["red"; 6]),
            Err(CodecError::InvalidBandCount(6))
        );
        let empty: [&str; 0] = [];
        assert_eq!(decode(&empty), Err(CodecError::InvalidBandCount(0)));
    }

    #[test]
    fn test_decode_unknown_color() {
        assert!(matches!(
            decode(&["red", "red", "pink", "gold"]),
            Err(CodecError::InvalidBandColor(_))
        ));
    }

    #[test]
    fn test_aliases_decode_identically() {
        let a = decode(&["purple", "grey", "red", "gold"]).unwrap();
        let b = decode(&["violet", "gray", "red", "gold"]).unwrap();
        assert_eq!(a, b);
        let c = decode(&[" Violet ", "GRAY", "Red", "gold"]).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn test_gold_silver_as_multiplier() {
        let spec = decode(&["brown", "black", "gold", "gold"]).unwrap();
        assert!(approx(spec.ohms, 1.0));
        let spec = decode(&["yellow", "violet", "silver", "gold"]).unwrap();
        assert!(approx(spec.ohms, 0.47));
        assert_eq!(spec.bands5, [Black, Yellow, Violet, Silver, Gold]);
    }

    #[test]
    fn test_gold_silver_as_tolerance() {
        let spec = decode(&["red", "red", "red", "gold"]).unwrap();
        assert_eq!(spec.tolerance_percent, 5.0);
        let spec = decode(&["red", "red", "red", "silver"]).unwrap();
        assert_eq!(spec.tolerance_percent, 10.0);
    }

    #[test]
    fn test_gold_silver_as_digit_rejected() {
        assert!(matches!(
            decode(&["gold", "red", "red", "gold"]),
            Err(CodecError::InvalidBandColor(_))
        ));
        assert!(matches!(
            decode(&["red", "silver", "black", "red", "brown"]),
            Err(CodecError::InvalidBandColor(_))
        ));
    }

    #[test]
    fn test_non_tolerance_color_in_tolerance_position() {
        assert!(matches!(
            decode(&["red", "red", "red", "black"]),
            Err(CodecError::InvalidBandColor(_))
        ));
    }

    #[test]
    fn test_all_zero_digits() {
        assert_eq!(
            decode(&["black", "black", "red", "gold"]),
            Err(CodecError::ZeroOrNegativeValue(0.0))
        );
    }

    #[test]
    fn test_encode_standard_value() {
        let spec = encode(4_700.0, 5.0).unwrap();
        assert_eq!(spec.bands5, [Yellow, Violet, Black, Brown, Gold]);
        assert_eq!(spec.bands4, Some([Yellow, Violet, Red, Gold]));
    }

    #[test]
    fn test_encode_three_digit_value_has_no_four_band() {
        let spec = encode(4_750.0, 1.0).unwrap();
        assert_eq!(spec.bands5, [Yellow, Violet, Green, Brown, Brown]);
        assert_eq!(spec.bands4, None);
        assert_eq!(spec.e_series_match(), Some(ESeries::E96));
    }

    #[test]
    fn test_encode_sub_ohm() {
        let spec = encode(0.47, 5.0).unwrap();
        assert_eq!(spec.bands5, [Black, Yellow, Violet, Silver, Gold]);
        assert_eq!(spec.bands4, Some([Yellow, Violet, Silver, Gold]));
        let spec = encode(4.7, 1.0).unwrap();
        assert_eq!(spec.bands5, [Yellow, Violet, Black, Silver, Brown]);
    }

    #[test]
    fn test_encode_rejects_bad_input() {
        assert_eq!(encode(10_000.0, 3.0), Err(CodecError::ToleranceOutOfRange(3.0)));
        assert_eq!(encode(0.0, 1.0), Err(CodecError::ZeroOrNegativeValue(0.0)));
        assert_eq!(encode(-10.0, 1.0), Err(CodecError::ZeroOrNegativeValue(-10.0)));
        assert!(matches!(encode(1_004.0, 1.0), Err(CodecError::Unrepresentable(_))));
        assert!(matches!(encode(2e12, 1.0), Err(CodecError::Unrepresentable(_))));
        assert!(matches!(encode(0.001, 1.0), Err(CodecError::Unrepresentable(_))));
    }

    #[test]
    fn test_encode_quantizes_close_values() {
        let spec = encode(4_700.2, 1.0).unwrap();
        assert!(approx(spec.ohms, 4_700.0));
    }

    #[test]
    fn test_round_trip_all_tolerances() {
        for tol in STANDARD_TOLERANCES {
            for ohms in [1.0, 10.0, 220.0, 4_990.0, 68_000.0, 1_000_000.0] {
                let spec = encode(ohms, tol).unwrap();
                let back = decode(&spec.bands5).unwrap();
                assert!(relative_error(back.ohms, ohms) < 1e-3, "{} {}", ohms, tol);
                assert_eq!(back.tolerance_percent, tol);
            }
        }
    }

    #[test]
    fn test_e_series_exact() {
        for value in ESeries::E12.values_in_decade(3) {
            assert_eq!(find_e_series(value).unwrap(), ESeriesMatch::Exact(ESeries::E12));
        }
        assert_eq!(find_e_series(1_100.0).unwrap().series(), Some(ESeries::E24));
        assert_eq!(find_e_series(1_050.0).unwrap().series(), Some(ESeries::E48));
        assert_eq!(find_e_series(1_020.0).unwrap().series(), Some(ESeries::E96));
    }

    #[test]
    fn test_e_series_nearest() {
        let m = find_e_series(4_440.0).unwrap();
        assert_eq!(m.series(), None);
        assert!(approx(m.nearest().unwrap(), 4_420.0));

        // nearest may be the next decade's 1.0
        let m = find_e_series(9_900.0).unwrap();
        assert!(approx(m.nearest().unwrap(), 10_000.0));
    }

    #[test]
    fn test_e_series_rejects_non_positive() {
        assert!(find_e_series(0.0).is_err());
        assert!(find_e_series(-5.0).is_err());
    }

    #[test]
    fn test_format_ohms() {
        assert_eq!(format_ohms(47_000.0), "47 kΩ");
        assert_eq!(format_ohms(4.7), "4.7 Ω");
        assert_eq!(format_ohms(1_000_000.0), "1 MΩ");
        assert_eq!(format_ohms(2_200_000.0), "2.2 MΩ");
        assert_eq!(format_ohms(0.47), "0.47 Ω");
        assert_eq!(format_ohms(0.0), "0 Ω");
    }

    #[test]
    fn test_display() {
        let spec = encode(470.0, 5.0).unwrap();
        assert_eq!(spec.to_string(), "470 Ω ±5%");
    }
}
