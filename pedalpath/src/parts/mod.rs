//! Fixed-part registries
//!
//! Read-only lookup tables for integrated circuits, diodes and LEDs. The IC
//! and diode tables ship as JSON embedded in the binary and are parsed once
//! per process; the LED table is small enough to live in code.
//!
//! Keys are normalized part numbers (uppercase, alphanumerics only), so
//! "tl072", "TL-072" and "TL072" all resolve to the same entry. Every part
//! number listed for an entry after the first is an alias of the first.

pub mod diode;
pub mod ic;
pub mod led;

use std::collections::HashMap;

use thiserror::Error;

pub use diode::{lookup_diode, CathodeMarking, DiodeSpec, DiodeType};
pub use ic::{lookup_ic, IcRegistry, IcSpec, Pin};
pub use led::{decode_led, lookup_led, LedColor, LedSize, LedSpec};

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read part file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse part JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid part directory: {0}")]
    InvalidDirectory(String),
    #[error("Invalid pinout for {part}: {reason}")]
    InvalidPinout { part: String, reason: String },
}

/// Normalize a part number for comparison.
pub fn normalize_part_number(pn: &str) -> String {
    pn.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Entries keyed by canonical part number, with an alias index.
#[derive(Debug, Clone)]
pub(crate) struct PartTable<T> {
    entries: HashMap<String, T>,
    aliases: HashMap<String, String>,
}

impl<T> Default for PartTable<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            aliases: HashMap::new(),
        }
    }
}

impl<T> PartTable<T> {
    /// Insert an entry under the first of `part_numbers`; later inserts of
    /// the same part replace earlier ones.
    pub(crate) fn insert(&mut self, part_numbers: &[String], entry: T) {
        let Some(canonical) = part_numbers.first() else {
            return;
        };
        let canonical = normalize_part_number(canonical);
        for pn in &part_numbers[1..] {
            let normalized = normalize_part_number(pn);
            if normalized != canonical {
                self.aliases.insert(normalized, canonical.clone());
            }
        }
        self.aliases.remove(&canonical);
        self.entries.insert(canonical, entry);
    }

    /// Exact or alias lookup.
    pub(crate) fn get(&self, part_number: &str) -> Option<&T> {
        let normalized = normalize_part_number(part_number);
        self.get_normalized(&normalized)
    }

    fn get_normalized(&self, normalized: &str) -> Option<&T> {
        if let Some(entry) = self.entries.get(normalized) {
            return Some(entry);
        }
        self.aliases
            .get(normalized)
            .and_then(|canonical| self.entries.get(canonical))
    }

    /// Longest known key that `part_number` starts with, so ordering
    /// suffixes ("TL072CP", "NE5532P") resolve to the base part.
    pub(crate) fn get_by_prefix(&self, part_number: &str, min_len: usize) -> Option<&T> {
        let normalized = normalize_part_number(part_number);
        self.entries
            .keys()
            .chain(self.aliases.keys())
            .filter(|key| key.len() >= min_len && normalized.starts_with(key.as_str()))
            .max_by_key(|key| key.len())
            .and_then(|key| self.get_normalized(key))
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }
}
