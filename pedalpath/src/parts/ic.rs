//! Integrated circuit registry.
//!
//! Built from JSON files embedded into the binary; users can add or
//! override parts by pointing [`IcRegistry::load_from_directory`] at a
//! directory of files in the same format.

use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::{PartTable, RegistryError};

const EMBEDDED_TL072: &str = include_str!("../../parts/ics/tl072.json");
const EMBEDDED_TL071: &str = include_str!("../../parts/ics/tl071.json");
const EMBEDDED_TL074: &str = include_str!("../../parts/ics/tl074.json");
const EMBEDDED_JRC4558: &str = include_str!("../../parts/ics/jrc4558.json");
const EMBEDDED_NE5532: &str = include_str!("../../parts/ics/ne5532.json");
const EMBEDDED_LM358: &str = include_str!("../../parts/ics/lm358.json");
const EMBEDDED_LM324: &str = include_str!("../../parts/ics/lm324.json");
const EMBEDDED_OPA2134: &str = include_str!("../../parts/ics/opa2134.json");
const EMBEDDED_LM741: &str = include_str!("../../parts/ics/lm741.json");
const EMBEDDED_LM308: &str = include_str!("../../parts/ics/lm308.json");
const EMBEDDED_LM386: &str = include_str!("../../parts/ics/lm386.json");
const EMBEDDED_NE555: &str = include_str!("../../parts/ics/ne555.json");
const EMBEDDED_CD4049UB: &str = include_str!("../../parts/ics/cd4049ub.json");
const EMBEDDED_CD4069UB: &str = include_str!("../../parts/ics/cd4069ub.json");
const EMBEDDED_LM13700: &str = include_str!("../../parts/ics/lm13700.json");

/// DIP packages the build guide can place.
pub const SUPPORTED_PIN_COUNTS: [u8; 3] = [8, 14, 16];

/// Shortest registry key a part number may be prefix-matched against.
const MIN_PREFIX_LEN: usize = 4;

/// Pin count used for parts the registry does not know.
pub const GENERIC_PIN_COUNT: u8 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pin {
    pub number: u8,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// One registry file: a part family sharing a pinout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IcRecord {
    pub part_numbers: Vec<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub description: String,
    pub pinout: Vec<Pin>,
}

impl IcRecord {
    fn validate(&self) -> Result<(), RegistryError> {
        let part = self
            .part_numbers
            .first()
            .cloned()
            .unwrap_or_else(|| "<unnamed>".to_string());
        let invalid = |reason: String| RegistryError::InvalidPinout {
            part: part.clone(),
            reason,
        };

        if self.part_numbers.is_empty() {
            return Err(invalid("no part numbers".to_string()));
        }
        let count = self.pinout.len();
        if !SUPPORTED_PIN_COUNTS.iter().any(|&n| usize::from(n) == count) {
            return Err(invalid(format!("{} pins is not an 8, 14 or 16 pin DIP", count)));
        }
        for (index, pin) in self.pinout.iter().enumerate() {
            if usize::from(pin.number) != index + 1 {
                return Err(invalid(format!(
                    "pin {} listed at position {}",
                    pin.number,
                    index + 1
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IcSpec {
    pub part_number: String,
    pub pin_count: u8,
    pub pinout: Vec<Pin>,
    pub manufacturer: Option<String>,
    pub description: String,
    /// Set on the fallback returned for unknown parts.
    pub is_generic: bool,
}

impl IcSpec {
    fn from_record(record: &IcRecord) -> Self {
        Self {
            part_number: record.part_numbers.first().cloned().unwrap_or_default(),
            pin_count: record.pinout.len() as u8,
            pinout: record.pinout.clone(),
            manufacturer: record.manufacturer.clone(),
            description: record.description.clone(),
            is_generic: false,
        }
    }

    /// Conservative stand-in for a part the registry does not know.
    pub fn generic(part_number: &str) -> Self {
        let trimmed = part_number.trim();
        let pinout = (1..=GENERIC_PIN_COUNT)
            .map(|n| Pin {
                number: n,
                name: format!("PIN {}", n),
                description: String::new(),
            })
            .collect();
        Self {
            part_number: if trimmed.is_empty() {
                "UNKNOWN".to_string()
            } else {
                trimmed.to_string()
            },
            pin_count: GENERIC_PIN_COUNT,
            pinout,
            manufacturer: None,
            description: "Unknown IC; check the pinout against its datasheet".to_string(),
            is_generic: true,
        }
    }

    pub fn pin(&self, number: u8) -> Option<&Pin> {
        self.pinout.iter().find(|p| p.number == number)
    }
}

/// Lookup table of known ICs.
#[derive(Debug, Clone, Default)]
pub struct IcRegistry {
    table: PartTable<IcRecord>,
}

static BUILTIN: OnceLock<IcRegistry> = OnceLock::new();

impl IcRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry of embedded parts.
    pub fn builtin() -> &'static IcRegistry {
        BUILTIN.get_or_init(|| {
            let embedded = [
                EMBEDDED_TL072,
                EMBEDDED_TL071,
                EMBEDDED_TL074,
                EMBEDDED_JRC4558,
                EMBEDDED_NE5532,
                EMBEDDED_LM358,
                EMBEDDED_LM324,
                EMBEDDED_OPA2134,
                EMBEDDED_LM741,
                EMBEDDED_LM308,
                EMBEDDED_LM386,
                EMBEDDED_NE555,
                EMBEDDED_CD4049UB,
                EMBEDDED_CD4069UB,
                EMBEDDED_LM13700,
            ];

            let mut registry = IcRegistry::new();
            for json_str in embedded {
                if let Err(e) = registry.add_json(json_str) {
                    tracing::warn!("Failed to parse embedded IC definition: {}", e);
                }
            }
            tracing::info!("Loaded {} embedded IC definitions", registry.len());
            registry
        })
    }

    /// Add a validated record, replacing any part with the same canonical number.
    pub fn add(&mut self, record: IcRecord) -> Result<(), RegistryError> {
        record.validate()?;
        let part_numbers = record.part_numbers.clone();
        self.table.insert(&part_numbers, record);
        Ok(())
    }

    fn add_json(&mut self, json_str: &str) -> Result<(), RegistryError> {
        let record: IcRecord = serde_json::from_str(json_str)?;
        self.add(record)
    }

    /// Load a single IC definition from a JSON file.
    pub fn load_from_file(&mut self, path: &Path) -> Result<(), RegistryError> {
        let content = std::fs::read_to_string(path)?;
        self.add_json(&content)
    }

    /// The builtin parts plus every valid `*.json` file in `dir`; files in
    /// `dir` override builtin entries with the same part number.
    pub fn load_from_directory(dir: &Path) -> Result<IcRegistry, RegistryError> {
        if !dir.is_dir() {
            return Err(RegistryError::InvalidDirectory(
                dir.to_string_lossy().to_string(),
            ));
        }

        let mut registry = IcRegistry::builtin().clone();
        let mut count = 0;
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match registry.load_from_file(&path) {
                    Ok(()) => count += 1,
                    Err(e) => {
                        tracing::warn!("Failed to load IC definition from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Loaded {} IC definitions from {:?}", count, dir);
        Ok(registry)
    }

    /// Exact, alias, then longest-prefix match ("TL072CP" finds TL072).
    pub fn get(&self, part_number: &str) -> Option<IcSpec> {
        self.table
            .get(part_number)
            .or_else(|| self.table.get_by_prefix(part_number, MIN_PREFIX_LEN))
            .map(IcSpec::from_record)
    }

    /// Like [`IcRegistry::get`], but unknown parts yield a generic 8-pin spec.
    pub fn lookup(&self, part_number: &str) -> IcSpec {
        self.get(part_number).unwrap_or_else(|| {
            tracing::debug!("Unknown IC {:?}, using generic 8-pin fallback", part_number);
            IcSpec::generic(part_number)
        })
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Canonical part numbers, sorted.
    pub fn part_numbers(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .table
            .values()
            .filter_map(|record| record.part_numbers.first().cloned())
            .collect();
        names.sort();
        names
    }
}

/// Look up an IC in the builtin registry, falling back to a generic spec.
pub fn lookup_ic(part_number: &str) -> IcSpec {
    IcRegistry::builtin().lookup(part_number)
}
