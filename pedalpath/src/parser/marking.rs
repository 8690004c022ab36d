//! Capacitor marking grammars.
//!
//! The four notations printed on capacitors overlap ("100" is a valid
//! EIA code, "100u" a valid alphanumeric value, "100u 16V" an electrolytic
//! rating), so recognition is an ordered table of independent matchers.
//! The first grammar in [`MarkingGrammar::PRIORITY`] that accepts the whole
//! string wins.

use serde::Serialize;

use crate::parser::scanner::Scanner;
use crate::parser::value::{tolerance_for_letter, voltage_for_code};

/// One capacitor marking notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkingGrammar {
    /// Direct value plus rated voltage: "47uF 25V", "100uF/16V".
    Electrolytic,
    /// Unit letter as decimal point: "4n7", "2u2", "1n5K100".
    RDecimal,
    /// Value followed by a unit: "47n", "0.1uF", "10nJ63".
    AlphaSuffix,
    /// Three digits, two significant plus an exponent: "473", "2A104J".
    Eia,
}

/// Fields extracted by a grammar, before classification.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMarking {
    pub grammar: MarkingGrammar,
    pub picofarads: f64,
    pub tolerance_letter: Option<char>,
    pub tolerance_percent: Option<f64>,
    pub voltage: Option<f64>,
}

impl MarkingGrammar {
    /// Recognition order; most specific first.
    pub const PRIORITY: [MarkingGrammar; 4] = [
        MarkingGrammar::Electrolytic,
        MarkingGrammar::RDecimal,
        MarkingGrammar::AlphaSuffix,
        MarkingGrammar::Eia,
    ];

    /// Run this grammar alone against an already-trimmed marking.
    pub fn try_match(self, marking: &str) -> Option<RawMarking> {
        match self {
            MarkingGrammar::Electrolytic => match_electrolytic(marking),
            MarkingGrammar::RDecimal => match_r_decimal(marking),
            MarkingGrammar::AlphaSuffix => match_alpha_suffix(marking),
            MarkingGrammar::Eia => match_eia(marking),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            MarkingGrammar::Electrolytic => "electrolytic",
            MarkingGrammar::RDecimal => "r-decimal",
            MarkingGrammar::AlphaSuffix => "alphanumeric",
            MarkingGrammar::Eia => "eia",
        }
    }
}

/// Apply every grammar in priority order and return the first match.
pub fn recognize(marking: &str) -> Option<RawMarking> {
    MarkingGrammar::PRIORITY
        .iter()
        .find_map(|grammar| grammar.try_match(marking))
}

fn unit_scale(ch: char) -> Option<f64> {
    match ch {
        'p' | 'P' => Some(1.0),
        'n' | 'N' => Some(1e3),
        'u' | 'U' | 'µ' | 'μ' => Some(1e6),
        _ => None,
    }
}

/// Unit letter with an optional trailing "F".
fn unit(scanner: &mut Scanner) -> Option<f64> {
    let scale = unit_scale(scanner.peek()?)?;
    scanner.bump();
    scanner.eat_if(|c| c == 'f' || c == 'F');
    Some(scale)
}

/// Optional tolerance letter, optional 2-4 voltage digits, then end of input.
fn tolerance_and_voltage(scanner: &mut Scanner) -> Option<(Option<char>, Option<f64>)> {
    scanner.skip_whitespace();
    let letter = match scanner.peek() {
        Some(ch) if ch.is_ascii_alphabetic() => {
            tolerance_for_letter(ch)?;
            scanner.bump();
            Some(ch.to_ascii_uppercase())
        }
        _ => None,
    };
    scanner.skip_whitespace();
    let voltage = match scanner.digits() {
        Some(digits) if (2..=4).contains(&digits.len()) => Some(digits.parse::<f64>().ok()?),
        Some(_) => return None,
        None => None,
    };
    scanner.skip_whitespace();
    scanner.is_at_end().then_some((letter, voltage))
}

fn raw(
    grammar: MarkingGrammar,
    picofarads: f64,
    tolerance_letter: Option<char>,
    voltage: Option<f64>,
) -> RawMarking {
    RawMarking {
        grammar,
        picofarads,
        tolerance_letter,
        tolerance_percent: tolerance_letter.and_then(tolerance_for_letter),
        voltage,
    }
}

fn match_electrolytic(marking: &str) -> Option<RawMarking> {
    let mut scanner = Scanner::new(marking);
    let value = scanner.decimal()?;
    scanner.skip_whitespace();
    let scale = unit(&mut scanner)?;
    scanner.skip_whitespace();
    scanner.eat_if(|c| c == '/' || c == ',');
    scanner.skip_whitespace();
    let voltage = scanner.decimal()?;
    scanner.skip_whitespace();
    scanner.eat_if(|c| c == 'v' || c == 'V')?;
    scanner.skip_whitespace();
    if !scanner.is_at_end() {
        return None;
    }
    Some(raw(MarkingGrammar::Electrolytic, value * scale, None, Some(voltage)))
}

fn match_r_decimal(marking: &str) -> Option<RawMarking> {
    let mut scanner = Scanner::new(marking);
    let whole = scanner.digits()?;
    let scale = unit_scale(scanner.bump()?)?;
    let frac = scanner.digits()?;
    let value: f64 = format!("{}.{}", whole, frac).parse().ok()?;
    let (letter, voltage) = tolerance_and_voltage(&mut scanner)?;
    Some(raw(MarkingGrammar::RDecimal, value * scale, letter, voltage))
}

fn match_alpha_suffix(marking: &str) -> Option<RawMarking> {
    let mut scanner = Scanner::new(marking);
    let value = scanner.decimal()?;
    scanner.skip_whitespace();
    let scale = unit(&mut scanner)?;
    let (letter, voltage) = tolerance_and_voltage(&mut scanner)?;
    Some(raw(MarkingGrammar::AlphaSuffix, value * scale, letter, voltage))
}

fn match_eia(marking: &str) -> Option<RawMarking> {
    let mut scanner = Scanner::new(marking);

    // optional IEC voltage prefix, as in "2A104J"
    let mut prefix_voltage = None;
    if let (Some(d), Some(l)) = (scanner.peek(), scanner.peek_at(1)) {
        if d.is_ascii_digit() && l.is_ascii_alphabetic() {
            let code: String = [d, l].iter().collect();
            prefix_voltage = Some(f64::from(voltage_for_code(&code)?));
            scanner.bump();
            scanner.bump();
            scanner.skip_whitespace();
        }
    }

    let mut code = [0u32; 3];
    for slot in code.iter_mut() {
        *slot = scanner.eat_if(|c| c.is_ascii_digit())?.to_digit(10)?;
    }
    let significand = f64::from(code[0] * 10 + code[1]);
    let picofarads = match code[2] {
        8 => significand / 100.0,
        9 => significand / 10.0,
        exp => significand * 10f64.powi(exp as i32),
    };

    let (letter, suffix_voltage) = tolerance_and_voltage(&mut scanner)?;
    let voltage = match (prefix_voltage, suffix_voltage) {
        (Some(_), Some(_)) => return None,
        (prefix, suffix) => prefix.or(suffix),
    };
    Some(raw(MarkingGrammar::Eia, picofarads, letter, voltage))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() / b.abs().max(1e-12) < 1e-6
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            MarkingGrammar::PRIORITY,
            [
                MarkingGrammar::Electrolytic,
                MarkingGrammar::RDecimal,
                MarkingGrammar::AlphaSuffix,
                MarkingGrammar::Eia,
            ]
        );
    }

    #[test]
    fn test_electrolytic_grammar_alone() {
        let m = MarkingGrammar::Electrolytic.try_match("100uF/16V").unwrap();
        assert!(approx(m.picofarads, 100e6));
        assert_eq!(m.voltage, Some(16.0));

        let m = MarkingGrammar::Electrolytic.try_match("10µF 6.3V").unwrap();
        assert_eq!(m.voltage, Some(6.3));

        assert!(MarkingGrammar::Electrolytic.try_match("100uF").is_none());
        assert!(MarkingGrammar::Electrolytic.try_match("473").is_none());
    }

    #[test]
    fn test_r_decimal_grammar_alone() {
        let m = MarkingGrammar::RDecimal.try_match("1n5K100").unwrap();
        assert!(approx(m.picofarads, 1500.0));
        assert_eq!(m.tolerance_letter, Some('K'));
        assert_eq!(m.voltage, Some(100.0));

        assert!(MarkingGrammar::RDecimal.try_match("47n").is_none());
        assert!(MarkingGrammar::RDecimal.try_match("0.47n").is_none());
    }

    #[test]
    fn test_alpha_grammar_alone() {
        let m = MarkingGrammar::AlphaSuffix.try_match("10nJ63").unwrap();
        assert!(approx(m.picofarads, 10_000.0));
        assert_eq!(m.tolerance_percent, Some(5.0));
        assert_eq!(m.voltage, Some(63.0));

        let m = MarkingGrammar::AlphaSuffix.try_match("0.047uF K 100").unwrap();
        assert!(approx(m.picofarads, 47_000.0));
        assert_eq!(m.tolerance_letter, Some('K'));

        // the R-decimal form is also a valid alpha prefix, but not a full match
        assert!(MarkingGrammar::AlphaSuffix.try_match("4n7").is_none());
    }

    #[test]
    fn test_eia_grammar_alone() {
        let m = MarkingGrammar::Eia.try_match("473J250").unwrap();
        assert!(approx(m.picofarads, 47_000.0));
        assert_eq!(m.tolerance_percent, Some(5.0));
        assert_eq!(m.voltage, Some(250.0));

        let m = MarkingGrammar::Eia.try_match("479").unwrap();
        assert!(approx(m.picofarads, 4.7));
        let m = MarkingGrammar::Eia.try_match("478").unwrap();
        assert!(approx(m.picofarads, 0.47));

        assert!(MarkingGrammar::Eia.try_match("4700").is_none());
        assert!(MarkingGrammar::Eia.try_match("47").is_none());
    }

    #[test]
    fn test_eia_voltage_prefix() {
        let m = MarkingGrammar::Eia.try_match("2A104J").unwrap();
        assert!(approx(m.picofarads, 100_000.0));
        assert_eq!(m.voltage, Some(100.0));
        assert_eq!(m.tolerance_letter, Some('J'));

        assert!(MarkingGrammar::Eia.try_match("9Q104").is_none());
        assert!(MarkingGrammar::Eia.try_match("2A104J100").is_none());
    }

    #[test]
    fn test_unknown_tolerance_letter_rejected() {
        assert!(MarkingGrammar::Eia.try_match("473A").is_none());
        assert!(MarkingGrammar::AlphaSuffix.try_match("47nQ").is_none());
    }

    #[test]
    fn test_recognize_first_match_wins() {
        assert_eq!(recognize("100u 16V").unwrap().grammar, MarkingGrammar::Electrolytic);
        assert_eq!(recognize("100u").unwrap().grammar, MarkingGrammar::AlphaSuffix);
        assert_eq!(recognize("100").unwrap().grammar, MarkingGrammar::Eia);
        assert_eq!(recognize("4n7").unwrap().grammar, MarkingGrammar::RDecimal);
        assert!(recognize("XYZZY").is_none());
    }
}
