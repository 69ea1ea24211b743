//! Label colors and the label palette.
//!
//! A small set of well-known labels carry reserved colors. Labels outside the
//! table get a color drawn from the table's colors according to a
//! [`ColorPolicy`].

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::BboxError;

/// The label given to boxes that have none.
pub const DEFAULT_LABEL: &str = "unlabeled";

/// Built-in label table. Order matters: hashed lookups index into it.
const BUILTIN_LABELS: [(&str, Color); 4] = [
    ("road signs", Color::rgb(0x8B, 0x5C, 0xF6)),
    ("traffic signs", Color::rgb(0x0E, 0xA5, 0xE9)),
    ("driving signs", Color::rgb(0xF9, 0x73, 0x16)),
    (DEFAULT_LABEL, Color::rgb(0x8E, 0x91, 0x96)),
];

/// An sRGB display color, written as `#RRGGBB`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` (hex digits in either case).
    pub fn parse_hex(text: &str) -> Result<Self, BboxError> {
        let invalid = || BboxError::InvalidColor(text.to_string());

        let hex = text.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({})", self)
    }
}

impl FromStr for Color {
    type Err = BboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse_hex(s)
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Color::parse_hex(&text).map_err(serde::de::Error::custom)
    }
}

/// How colors are picked for labels that are not in the palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPolicy {
    /// Stable FNV-1a hash of the label text indexes the palette.
    #[default]
    Hashed,
    /// Uniform random palette member on every call.
    Random,
}

/// Ordered label → color table plus the policy for unknown labels.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelPalette {
    entries: Vec<(String, Color)>,
    policy: ColorPolicy,
}

impl Default for LabelPalette {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LabelPalette {
    /// The built-in table with the hashed policy.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_LABELS
                .iter()
                .map(|(name, color)| (name.to_string(), *color))
                .collect(),
            policy: ColorPolicy::Hashed,
        }
    }

    /// Sets the policy used for unknown labels.
    pub fn with_policy(mut self, policy: ColorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Adds a label, or overrides the color of an existing one.
    pub fn with_label(mut self, name: impl Into<String>, color: Color) -> Self {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = color,
            None => self.entries.push((name, color)),
        }
        self
    }

    pub fn policy(&self) -> ColorPolicy {
        self.policy
    }

    /// Returns the color reserved for `label`, if any.
    pub fn lookup(&self, label: &str) -> Option<Color> {
        self.entries
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, color)| *color)
    }

    /// Returns every color in the palette, in table order.
    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.entries.iter().map(|(_, color)| *color)
    }

    /// Returns the known label names, in table order.
    pub fn known_labels(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Resolves the display color for `label`.
    pub fn resolve(&self, label: &str) -> Color {
        self.resolve_with_rng(label, &mut rand::rng())
    }

    /// Like [`resolve`](Self::resolve), drawing from `rng` under the random policy.
    pub fn resolve_with_rng<R: Rng + ?Sized>(&self, label: &str, rng: &mut R) -> Color {
        if let Some(color) = self.lookup(label) {
            return color;
        }

        // Entries can be overridden but never removed, so the table is never empty.
        let n = self.entries.len();
        let idx = match self.policy {
            ColorPolicy::Hashed => (fnv1a(label.as_bytes()) % n as u64) as usize,
            ColorPolicy::Random => rng.random_range(0..n),
        };
        self.entries[idx].1
    }
}

/// Resolves a label against the built-in palette.
pub fn resolve_color(label: &str) -> Color {
    LabelPalette::builtin().resolve(label)
}

/// Returns the built-in known labels.
pub fn list_known_labels() -> Vec<String> {
    LabelPalette::builtin().known_labels()
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes
        .iter()
        .fold(OFFSET, |hash, b| (hash ^ u64::from(*b)).wrapping_mul(PRIME))
}
