//! Value grammar parsers.
//!
//! Each grammar recognizes one family of printed notation and extracts raw
//! fields; the codecs turn those fields into structured specs.

pub mod marking;
pub mod scanner;
pub mod value;

pub use marking::{recognize, MarkingGrammar, RawMarking};
pub use value::{
    code_for_voltage, encode_tolerance_letter, parse_resistance, tolerance_for_letter,
    voltage_for_code,
};
