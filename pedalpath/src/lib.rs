//! PedalPath - component value codecs and breadboard geometry
//!
//! This library turns the values written in a guitar-pedal bill of
//! materials into structured component specs, and maps breadboard hole
//! addresses to physical positions for drawing a build guide.
//!
//! # Quick Start
//!
//! ```
//! use pedalpath::{capacitor, resistor, breadboard};
//!
//! let r = resistor::decode(&["yellow", "violet", "black", "red", "brown"]).unwrap();
//! assert_eq!(r.ohms, 47_000.0);
//!
//! let c = capacitor::decode("473").unwrap();
//! assert_eq!(c.cap_type, capacitor::CapType::FilmBox);
//!
//! let p = breadboard::locate("a1", &breadboard::FULL_830).unwrap();
//! assert_eq!((p.x, p.y), (7.62, 11.43));
//! ```
//!
//! # Features
//!
//! - **Resistors**: 4/5-band color codes both ways, E-series checks
//! - **Capacitors**: EIA, R-decimal, alphanumeric and electrolytic markings
//! - **Part registries**: IC pinouts, diodes and LEDs by part number
//! - **Breadboard**: hole addresses to millimetres on 830 and 400 point boards
//! - **BOM**: dispatch a bill-of-materials line to the right decoder
//! - **Build advice**: equivalent markings, identification hints and
//!   polarity warnings for each decoded line

pub mod advice;
pub mod breadboard;
pub mod capacitor;
pub mod core;
pub mod parser;
pub mod parts;
pub mod resistor;

mod format;

// Re-export main types
pub use advice::{build_notes, BuildNotes, PartAdvice, ResistorFamily};
pub use crate::core::{
    decode_bom, decode_bom_entry, BomEntry, BomLine, BomReport, BomStats, CodecError, Component,
    ComponentKind, DecodeOptions,
};
pub use breadboard::{
    coordinates_to_hole, dip_footprint, hole_to_coordinates, parse_hole_address, BreadboardLayout,
    HoleAddress, Point, Rail, FULL_830, HALF_400,
};
pub use capacitor::{CapType, CapUnits, CapacitorEncodeRequest, CapacitorSpec, EncodedCapacitor};
pub use parser::MarkingGrammar;
pub use parts::{
    decode_led, lookup_diode, lookup_ic, lookup_led, DiodeSpec, IcRegistry, IcSpec, LedSpec,
    RegistryError,
};
pub use resistor::{find_e_series, format_ohms, BandColor, ESeries, ESeriesMatch, ResistorSpec};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        BomEntry, BreadboardLayout, CapType, CodecError, Component, DecodeOptions, HoleAddress,
        Point, ResistorSpec,
    };
}
