//! Opaque bounding-box identifiers.
//!
//! Ids are strings on the wire so that datasets written by other tools
//! (e.g. `"box1"`) import unchanged. Freshly generated ids combine the
//! creation time, a process-wide sequence number and a random salt, joined
//! by `-`, so an id is never handed out twice within a run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// A unique identifier for a bounding box.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxId(String);

impl BoxId {
    /// Wraps an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let sequence = NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let salt: u32 = rand::rng().random();

        Self(format!(
            "{}-{}-{}",
            to_base36(millis),
            to_base36(sequence),
            to_base36(u64::from(salt))
        ))
    }

    /// Returns the identifier text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BoxId({})", self.0)
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BoxId {
    fn from(id: &str) -> Self {
        BoxId::new(id)
    }
}

impl From<String> for BoxId {
    fn from(id: String) -> Self {
        BoxId(id)
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    // Only ASCII digits were pushed.
    out.into_iter().map(char::from).collect()
}
