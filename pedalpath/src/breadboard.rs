//! Breadboard coordinate system
//!
//! Maps hole addresses on a solderless breadboard to physical positions in
//! millimetres from the board's top-left corner. Geometry follows the common
//! MB-102 boards: 2.54 mm pitch, ten terminal rows split by a center
//! channel, and two power rails along each long edge.
//!
//! ```text
//!  W  - - - - -   - - - - -   ...      (outer rail, negative)
//!  X  + + + + +   + + + + +   ...      (inner rail, positive)
//!  a  . . . . . . . . . . . . ...
//!  ..
//!  e  . . . . . . . . . . . . ...
//!     ======== channel ========
//!  f  . . . . . . . . . . . . ...
//!  ..
//!  j  . . . . . . . . . . . . ...
//!  Y  + + + + +   + + + + +   ...      (inner rail, positive)
//!  Z  - - - - -   - - - - -   ...      (outer rail, negative)
//! ```

use std::fmt;

use serde::Serialize;

use crate::core::CodecError;

/// Maximum distance in millimetres for [`coordinates_to_hole`] to snap to a hole.
pub const SNAP_EPSILON_MM: f64 = 0.1;

const ROWS: [char; 10] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j'];

/// Geometry of one breadboard model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreadboardLayout {
    pub name: &'static str,
    /// Terminal columns per row.
    pub columns: u32,
    /// Holes per power rail.
    pub rail_holes: u32,
    pub pitch: f64,
    /// X of column 1.
    pub margin_left: f64,
    /// Y of row a.
    pub margin_top: f64,
    /// Added to rows f-j for the center channel.
    pub center_gap: f64,
    /// X of rail hole 1.
    pub rail_margin_left: f64,
    /// Rail holes per cluster; one pitch of gap separates clusters.
    pub rail_group: u32,
    /// Extra gap in the middle of each rail, from `rail_break_after` on.
    pub rail_center_break: f64,
    pub rail_break_after: Option<u32>,
    /// Y of rails W, X, Y, Z.
    pub rail_y: [f64; 4],
    pub height: f64,
}

pub const FULL_830: BreadboardLayout = BreadboardLayout {
    name: "full-830",
    columns: 63,
    rail_holes: 50,
    pitch: 2.54,
    margin_left: 7.62,
    margin_top: 11.43,
    center_gap: 5.08,
    rail_margin_left: 8.89,
    rail_group: 5,
    rail_center_break: 5.08,
    rail_break_after: Some(25),
    rail_y: [2.54, 5.08, 45.72, 48.26],
    height: 50.8,
};

pub const HALF_400: BreadboardLayout = BreadboardLayout {
    name: "half-400",
    columns: 30,
    rail_holes: 25,
    pitch: 2.54,
    margin_left: 7.62,
    margin_top: 11.43,
    center_gap: 5.08,
    rail_margin_left: 8.89,
    rail_group: 5,
    rail_center_break: 0.0,
    rail_break_after: None,
    rail_y: [2.54, 5.08, 45.72, 48.26],
    height: 50.8,
};

impl BreadboardLayout {
    /// Resolve a layout by name: "830", "full", "full-830", "400", "half", "half-400".
    pub fn by_name(name: &str) -> Option<&'static BreadboardLayout> {
        match name.trim().to_lowercase().as_str() {
            "830" | "full" | "full-830" | "mb-102" => Some(&FULL_830),
            "400" | "half" | "half-400" => Some(&HALF_400),
            _ => None,
        }
    }

    pub fn width(&self) -> f64 {
        2.0 * self.margin_left + f64::from(self.columns - 1) * self.pitch
    }

    /// Number of addressable holes, rails included.
    pub fn hole_count(&self) -> u32 {
        self.columns * ROWS.len() as u32 + self.rail_holes * 4
    }

    fn row_y(&self, row_index: usize) -> f64 {
        let gap = if row_index >= 5 { self.center_gap } else { 0.0 };
        self.margin_top + row_index as f64 * self.pitch + gap
    }

    fn column_x(&self, column: u32) -> f64 {
        self.margin_left + f64::from(column - 1) * self.pitch
    }

    fn rail_x(&self, index: u32) -> f64 {
        let i = index - 1;
        let clusters = f64::from(i / self.rail_group);
        let brk = match self.rail_break_after {
            Some(after) if i >= after => self.rail_center_break,
            _ => 0.0,
        };
        self.rail_margin_left + f64::from(i) * self.pitch + clusters * self.pitch + brk
    }
}

/// Power rail, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rail {
    W,
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RailPolarity {
    Positive,
    Negative,
}

impl Rail {
    pub const ALL: [Rail; 4] = [Rail::W, Rail::X, Rail::Y, Rail::Z];

    fn from_letter(letter: char) -> Option<Rail> {
        match letter.to_ascii_uppercase() {
            'W' => Some(Rail::W),
            'X' => Some(Rail::X),
            'Y' => Some(Rail::Y),
            'Z' => Some(Rail::Z),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Rail::W => 0,
            Rail::X => 1,
            Rail::Y => 2,
            Rail::Z => 3,
        }
    }

    /// Outer rails carry ground, inner rails the supply.
    pub fn polarity(self) -> RailPolarity {
        match self {
            Rail::W | Rail::Z => RailPolarity::Negative,
            Rail::X | Rail::Y => RailPolarity::Positive,
        }
    }
}

impl fmt::Display for Rail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Rail::W => "W",
            Rail::X => "X",
            Rail::Y => "Y",
            Rail::Z => "Z",
        };
        f.write_str(letter)
    }
}

/// A hole on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HoleAddress {
    Terminal { row: char, column: u32 },
    Rail { rail: Rail, index: u32 },
}

impl fmt::Display for HoleAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HoleAddress::Terminal { row, column } => write!(f, "{}{}", row, column),
            HoleAddress::Rail { rail, index } => write!(f, "{}{}", rail, index),
        }
    }
}

/// Position in millimetres from the board's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Convert to pixels for a drawing at `px_per_mm`.
    pub fn scaled(self, px_per_mm: f64) -> Point {
        Point {
            x: self.x * px_per_mm,
            y: self.y * px_per_mm,
        }
    }

    fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

fn out_of_range(what: impl fmt::Display, layout: &BreadboardLayout) -> CodecError {
    CodecError::HoleIdOutOfRange(format!("{} on {}", what, layout.name))
}

/// Parse "e12" (terminal) or "X7" (rail) against `layout`.
pub fn parse_hole_address(id: &str, layout: &BreadboardLayout) -> Result<HoleAddress, CodecError> {
    let trimmed = id.trim();
    let mut chars = trimmed.chars();
    let letter = chars
        .next()
        .ok_or_else(|| out_of_range("empty hole id", layout))?;
    let number = chars.as_str();
    if number.is_empty() || !number.chars().all(|c| c.is_ascii_digit()) {
        return Err(out_of_range(format!("{:?}", trimmed), layout));
    }
    let number: u32 = number
        .parse()
        .map_err(|_| out_of_range(format!("{:?}", trimmed), layout))?;

    let row = letter.to_ascii_lowercase();
    let address = if ROWS.contains(&row) {
        HoleAddress::Terminal { row, column: number }
    } else if let Some(rail) = Rail::from_letter(letter) {
        HoleAddress::Rail { rail, index: number }
    } else {
        return Err(out_of_range(format!("{:?}", trimmed), layout));
    };
    check_bounds(&address, layout)?;
    Ok(address)
}

fn check_bounds(address: &HoleAddress, layout: &BreadboardLayout) -> Result<usize, CodecError> {
    match *address {
        HoleAddress::Terminal { row, column } => {
            let row_index = ROWS
                .iter()
                .position(|r| *r == row)
                .ok_or_else(|| out_of_range(address, layout))?;
            if column == 0 || column > layout.columns {
                return Err(out_of_range(address, layout));
            }
            Ok(row_index)
        }
        HoleAddress::Rail { rail, index } => {
            if index == 0 || index > layout.rail_holes {
                return Err(out_of_range(address, layout));
            }
            Ok(rail.index())
        }
    }
}

/// Physical position of a hole. Never clamps: an address outside `layout`
/// is an error.
pub fn hole_to_coordinates(address: &HoleAddress, layout: &BreadboardLayout) -> Result<Point, CodecError> {
    let slot = check_bounds(address, layout)?;
    let point = match *address {
        HoleAddress::Terminal { column, .. } => Point {
            x: layout.column_x(column),
            y: layout.row_y(slot),
        },
        HoleAddress::Rail { index, .. } => Point {
            x: layout.rail_x(index),
            y: layout.rail_y[slot],
        },
    };
    Ok(point)
}

/// Parse and locate in one step.
pub fn locate(id: &str, layout: &BreadboardLayout) -> Result<Point, CodecError> {
    let address = parse_hole_address(id, layout)?;
    hole_to_coordinates(&address, layout)
}

/// The hole at `point`, if one lies within [`SNAP_EPSILON_MM`].
pub fn coordinates_to_hole(point: Point, layout: &BreadboardLayout) -> Option<HoleAddress> {
    let column = ((point.x - layout.margin_left) / layout.pitch).round() + 1.0;
    if column >= 1.0 && column <= f64::from(layout.columns) {
        let column = column as u32;
        for (row_index, row) in ROWS.iter().enumerate() {
            let hole = Point {
                x: layout.column_x(column),
                y: layout.row_y(row_index),
            };
            if hole.distance(point) <= SNAP_EPSILON_MM {
                return Some(HoleAddress::Terminal { row: *row, column });
            }
        }
    }

    for rail in Rail::ALL {
        let y = layout.rail_y[rail.index()];
        if (y - point.y).abs() > SNAP_EPSILON_MM {
            continue;
        }
        for index in 1..=layout.rail_holes {
            let hole = Point {
                x: layout.rail_x(index),
                y,
            };
            if hole.distance(point) <= SNAP_EPSILON_MM {
                return Some(HoleAddress::Rail { rail, index });
            }
        }
    }
    None
}

/// Where one DIP pin goes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PinPlacement {
    pub pin: u8,
    pub hole: HoleAddress,
}

/// Place a DIP package straddling the center channel with pin 1 at
/// `e{first_column}`: pins run left to right along row e, then right to
/// left along row f.
pub fn dip_footprint(
    layout: &BreadboardLayout,
    first_column: u32,
    pin_count: u8,
) -> Result<Vec<PinPlacement>, CodecError> {
    if pin_count == 0 || pin_count % 2 != 0 {
        return Err(out_of_range(format!("{}-pin DIP", pin_count), layout));
    }
    let half = u32::from(pin_count / 2);
    let last_column = first_column.saturating_add(half - 1);
    if first_column == 0 || last_column > layout.columns {
        return Err(out_of_range(
            format!("{}-pin DIP at column {}", pin_count, first_column),
            layout,
        ));
    }

    let placements = (1..=pin_count)
        .map(|pin| {
            let n = u32::from(pin);
            let hole = if n <= half {
                HoleAddress::Terminal {
                    row: 'e',
                    column: first_column + n - 1,
                }
            } else {
                HoleAddress::Terminal {
                    row: 'f',
                    column: last_column - (n - half - 1),
                }
            };
            PinPlacement { pin, hole }
        })
        .collect();
    Ok(placements)
}
