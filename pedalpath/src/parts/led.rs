//! LED lookup by color and size.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::diode::{CathodeMarking, DiodeType};
use crate::core::CodecError;

/// Maximum reverse voltage assumed for an indicator LED.
const LED_REVERSE_VOLTAGE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedColor {
    Red,
    Green,
    Yellow,
    Orange,
    Blue,
    White,
    Amber,
    Uv,
}

/// Typical forward voltage and render color for each LED color.
const LED_TABLE: [(LedColor, &str, f64, &str); 8] = [
    (LedColor::Red, "red", 1.8, "#FF2A2A"),
    (LedColor::Green, "green", 2.1, "#2AD04A"),
    (LedColor::Yellow, "yellow", 2.0, "#FFD92A"),
    (LedColor::Orange, "orange", 2.0, "#FF8C1A"),
    (LedColor::Blue, "blue", 3.0, "#2A6BFF"),
    (LedColor::White, "white", 3.0, "#F4F4F0"),
    (LedColor::Amber, "amber", 2.0, "#FFB300"),
    (LedColor::Uv, "uv", 3.3, "#8A2BE2"),
];

impl LedColor {
    fn entry(self) -> (LedColor, &'static str, f64, &'static str) {
        LED_TABLE
            .iter()
            .copied()
            .find(|(color, ..)| *color == self)
            .unwrap_or(LED_TABLE[0])
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    pub fn forward_voltage(self) -> f64 {
        self.entry().2
    }

    pub fn render_color(self) -> &'static str {
        self.entry().3
    }
}

impl FromStr for LedColor {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        let lower = match lower.as_str() {
            "ultraviolet" => "uv",
            other => other,
        };
        LED_TABLE
            .iter()
            .find(|(_, name, ..)| *name == lower)
            .map(|(color, ..)| *color)
            .ok_or_else(|| CodecError::InvalidBandColor(format!("unknown LED color {:?}", s.trim())))
    }
}

impl fmt::Display for LedColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedSize {
    #[serde(rename = "3mm")]
    ThreeMm,
    #[serde(rename = "5mm")]
    FiveMm,
}

impl FromStr for LedSize {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        match compact.to_lowercase().as_str() {
            "3mm" | "3" => Ok(LedSize::ThreeMm),
            "5mm" | "5" => Ok(LedSize::FiveMm),
            _ => Err(CodecError::InvalidLedSize(s.trim().to_string())),
        }
    }
}

impl fmt::Display for LedSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedSize::ThreeMm => f.write_str("3mm"),
            LedSize::FiveMm => f.write_str("5mm"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedSpec {
    pub part_number: String,
    pub diode_type: DiodeType,
    /// Maximum reverse voltage.
    pub voltage: Option<f64>,
    /// Lens color used when drawing the part.
    pub color: String,
    pub cathode_marking: CathodeMarking,
    pub description: String,
    pub led_color: LedColor,
    pub size: LedSize,
    pub forward_voltage: f64,
}

impl LedSpec {
    pub fn new(led_color: LedColor, size: LedSize) -> Self {
        Self {
            part_number: format!("LED-{}-{}", led_color.name(), size).to_uppercase(),
            diode_type: DiodeType::Led,
            voltage: Some(LED_REVERSE_VOLTAGE),
            color: led_color.render_color().to_string(),
            cathode_marking: CathodeMarking::FlatEdge,
            description: format!("{} {} LED", size, led_color),
            led_color,
            size,
            forward_voltage: led_color.forward_voltage(),
        }
    }
}

/// Validate a color and size pair.
pub fn decode_led(color: &str, size: &str) -> Result<LedSpec, CodecError> {
    let led_color = color.parse::<LedColor>()?;
    let size = size.parse::<LedSize>()?;
    Ok(LedSpec::new(led_color, size))
}

/// Find an LED in free text such as "5mm red LED" or "LED_GREEN_3MM".
pub fn lookup_led(text: &str, default_size: LedSize) -> Result<LedSpec, CodecError> {
    let tokens: Vec<String> = text
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect();

    let led_color = tokens
        .iter()
        .find_map(|t| t.parse::<LedColor>().ok())
        .ok_or_else(|| CodecError::MarkingParse(format!("no LED color in {:?}", text.trim())))?;

    let size = match tokens.iter().find(|t| t.ends_with("mm")) {
        Some(token) => token.parse::<LedSize>()?,
        None => default_size,
    };
    Ok(LedSpec::new(led_color, size))
}
