//! Tests for the resistor color-code codec

use pedalpath::prelude::*;
use pedalpath::resistor::{self, BandColor::*, STANDARD_TOLERANCES};
use pedalpath::{find_e_series, format_ohms, ESeries, ESeriesMatch};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() <= b.abs() * 1e-9
}

#[test]
fn test_four_band_decode_gives_canonical_bands() {
    let spec = resistor::decode(&["brown", "black", "orange", "gold"]).expect("Should decode");

    assert!(approx(spec.ohms, 10_000.0));
    assert_eq!(spec.tolerance_percent, 5.0);
    assert_eq!(spec.bands5, [Brown, Black, Black, Red, Gold]);
    assert_eq!(spec.bands4, Some([Brown, Black, Orange, Gold]));
    assert_eq!(spec.e_series_match(), Some(ESeries::E12));
}

#[test]
fn test_decode_is_case_insensitive_and_accepts_aliases() {
    let spec = resistor::decode(&["Yellow", "PURPLE", "black", "brown", "brown"])
        .expect("Should decode");
    assert!(approx(spec.ohms, 4_700.0));

    let spec = resistor::decode(&["grey", "red", "brown", "gold"]).expect("Should decode");
    assert!(approx(spec.ohms, 820.0));
}

#[test]
fn test_band_count_checked_before_colors() {
    let err = resistor::decode(&["nope", "black", "red"]).unwrap_err();
    assert_eq!(err, CodecError::InvalidBandCount(3));

    let err = resistor::decode::<&str>(&[]).unwrap_err();
    assert_eq!(err, CodecError::InvalidBandCount(0));
}

#[test]
fn test_gold_in_digit_position_is_rejected() {
    let err = resistor::decode(&["gold", "black", "red", "gold"]).unwrap_err();
    assert!(matches!(err, CodecError::InvalidBandColor(_)));
}

#[test]
fn test_sub_ohm_values() {
    let spec = resistor::decode(&["black", "yellow", "violet", "silver", "brown"])
        .expect("Should decode");
    assert!(approx(spec.ohms, 0.47));

    let spec = resistor::encode(0.47, 1.0).expect("Should encode");
    assert_eq!(spec.bands5, [Black, Yellow, Violet, Silver, Brown]);
    assert_eq!(spec.bands4, Some([Yellow, Violet, Silver, Brown]));
}

#[test]
fn test_encode_then_decode_preserves_value() {
    for (ohms, tolerance) in [(47.0, 5.0), (2_200.0, 1.0), (100_000.0, 2.0), (1_000_000.0, 10.0)] {
        let encoded = resistor::encode(ohms, tolerance).expect("Should encode");
        let decoded = resistor::decode(&encoded.bands5).expect("Should decode");
        assert!(approx(decoded.ohms, ohms), "{} ohms", ohms);
        assert_eq!(decoded.tolerance_percent, tolerance);
        assert_eq!(decoded, encoded);
    }
}

#[test]
fn test_every_standard_value_and_tolerance_round_trips() {
    for series in ESeries::ALL {
        for decade in 0..=9 {
            for ohms in series.values_in_decade(decade) {
                for tolerance in STANDARD_TOLERANCES {
                    let encoded = resistor::encode(ohms, tolerance)
                        .unwrap_or_else(|e| panic!("{} {}%: {}", ohms, tolerance, e));
                    assert!(encoded.e_series_match().is_some(), "{} ohms", ohms);

                    let decoded = resistor::decode(&encoded.bands5).expect("Should decode");
                    assert!((decoded.ohms - ohms).abs() <= ohms * 1e-6, "{} ohms", ohms);
                    assert_eq!(decoded.tolerance_percent, tolerance);
                    assert_eq!(decoded.bands5, encoded.bands5);

                    if let Some(bands4) = encoded.bands4 {
                        let decoded = resistor::decode(&bands4).expect("Should decode");
                        assert!((decoded.ohms - ohms).abs() <= ohms * 1e-6, "{} ohms", ohms);
                        assert_eq!(decoded.tolerance_percent, tolerance);
                    }
                }
            }
        }
    }
}

#[test]
fn test_every_e12_value_is_exact_e12() {
    for decade in 0..=9 {
        for ohms in ESeries::E12.values_in_decade(decade) {
            assert_eq!(
                find_e_series(ohms).unwrap(),
                ESeriesMatch::Exact(ESeries::E12),
                "{} ohms",
                ohms
            );
        }
    }
}

#[test]
fn test_three_digit_values_have_no_four_band_form() {
    let spec = resistor::encode(4_990.0, 1.0).expect("Should encode");
    assert_eq!(spec.bands5, [Yellow, White, White, Brown, Brown]);
    assert_eq!(spec.bands4, None);
    assert_eq!(spec.e_series_match(), Some(ESeries::E96));
}

#[test]
fn test_encode_errors() {
    assert_eq!(
        resistor::encode(1_000.0, 3.0).unwrap_err(),
        CodecError::ToleranceOutOfRange(3.0)
    );
    // tolerance is checked first
    assert_eq!(
        resistor::encode(0.0, 3.0).unwrap_err(),
        CodecError::ToleranceOutOfRange(3.0)
    );
    assert_eq!(
        resistor::encode(-10.0, 5.0).unwrap_err(),
        CodecError::ZeroOrNegativeValue(-10.0)
    );
    assert!(matches!(
        resistor::encode(f64::INFINITY, 5.0),
        Err(CodecError::Unrepresentable(_))
    ));
}

#[test]
fn test_e_series_membership() {
    assert_eq!(find_e_series(10_000.0).unwrap(), ESeriesMatch::Exact(ESeries::E12));
    assert_eq!(find_e_series(5_100.0).unwrap(), ESeriesMatch::Exact(ESeries::E24));
    assert_eq!(find_e_series(1_050.0).unwrap(), ESeriesMatch::Exact(ESeries::E48));
    assert_eq!(find_e_series(1.02).unwrap(), ESeriesMatch::Exact(ESeries::E96));

    let nearest = find_e_series(4_800.0).unwrap().nearest().expect("Should be off-series");
    assert!(approx(nearest, 4_750.0));
}

#[test]
fn test_display() {
    let spec = resistor::encode(47_000.0, 1.0).expect("Should encode");
    assert_eq!(spec.to_string(), "47 kΩ ±1%");
    assert_eq!(format_ohms(1_000_000.0), "1 MΩ");
    assert_eq!(format_ohms(4.7), "4.7 Ω");
}

#[test]
fn test_spec_serializes_band_names() {
    let spec = resistor::encode(470.0, 5.0).expect("Should encode");
    let json = serde_json::to_value(&spec).expect("Should serialize");

    assert_eq!(json["bands4"][0], "yellow");
    assert_eq!(json["bands5"][3], "black");
    assert_eq!(json["e_series"]["exact"], "E12");
}
