//! Number formatting shared by the resistor and capacitor codecs.

/// Format `value` with at most `digits` significant digits, trimming
/// trailing zeros ("4.70" -> "4.7", "47.0" -> "47").
pub(crate) fn significant(value: f64, digits: i32) -> String {
    if value == 0.0 || !value.is_finite() {
        return "0".to_string();
    }
    let magnitude = value.abs().log10().floor() as i32;
    let decimals = (digits - 1 - magnitude).max(0) as usize;
    let text = format!("{:.*}", decimals, value);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

/// Relative difference between two magnitudes, safe for tiny denominators.
pub(crate) fn relative_error(actual: f64, expected: f64) -> f64 {
    (actual - expected).abs() / expected.abs().max(1e-12)
}

/// `significand * 10^exponent` computed without the rounding noise of
/// multiplying by an inexact negative power of ten.
pub(crate) fn scale_by_decade(significand: f64, exponent: i32) -> f64 {
    if exponent >= 0 {
        significand * 10f64.powi(exponent)
    } else {
        significand / 10f64.powi(-exponent)
    }
}
