//! Domain identifier types
//!
//! Newtype wrappers for the numeric identifiers Tautulli hands out, so a
//! library section id can never be passed where an export id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Library section identifier
///
/// # Examples
///
/// ```
/// use tautulli_exporter::domain::ids::SectionId;
/// use std::str::FromStr;
///
/// let section = SectionId::from_str("5").unwrap();
/// assert_eq!(section.value(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(u32);

impl SectionId {
    /// Creates a new SectionId
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw numeric id
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SectionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|e| format!("Invalid section id '{s}': {e}"))
    }
}

/// Export job identifier assigned by Tautulli
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportId(u64);

impl ExportId {
    /// Creates a new ExportId
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric id
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ExportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
