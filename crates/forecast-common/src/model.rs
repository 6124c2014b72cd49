//! Forecast model identifiers.
//!
//! A model identifier is a base model name optionally followed by a
//! `:`-separated qualifier selecting a variant of that model:
//!
//! - `WeatherMesh` / `WeatherMesh:deterministic` - the deterministic run
//! - `WeatherMesh:ens:mean` - an ensemble member (here the ensemble mean)
//! - `WeatherMesh:intracycle` - the intracycle run
//!
//! Qualifiers we do not know about are kept as [`ModelVariant::Unrecognized`]
//! and request no variant-specific parameters from the provider.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{ForecastError, ForecastResult};

const SEPARATOR: char = ':';

/// Stands in for `SEPARATOR` in directory names.
const DIRECTORY_SEPARATOR: char = '_';

/// Variant of a base model selected by the identifier's qualifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ModelVariant {
    Deterministic,
    /// Ensemble member selector, e.g. `mean`.
    Ensemble(String),
    Intracycle,
    /// Qualifier text after the base name that matched no known variant.
    Unrecognized(String),
}

/// A parsed model identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId {
    raw: String,
    base: String,
    variant: ModelVariant,
}

impl ModelId {
    /// Parse a model identifier such as `WeatherMesh:ens:mean`.
    pub fn parse(s: &str) -> ForecastResult<Self> {
        if s.is_empty() {
            return Err(ForecastError::InvalidModel("identifier is empty".to_string()));
        }

        // The identifier becomes a directory name under the storage root.
        if s.contains('/') || s.contains('\\') || s.contains('\0') || s == "." || s == ".." {
            return Err(ForecastError::InvalidModel(format!(
                "'{}' is not usable as a directory name",
                s
            )));
        }

        // Reserved for folded qualifiers; `a_b` would share `a:b`'s directory.
        if s.contains(DIRECTORY_SEPARATOR) {
            return Err(ForecastError::InvalidModel(format!(
                "'{}' contains '{}', which is reserved in directory names",
                s, DIRECTORY_SEPARATOR
            )));
        }

        let mut parts = s.split(SEPARATOR);
        let base = parts.next().unwrap_or_default();
        if base.is_empty() {
            return Err(ForecastError::InvalidModel(format!(
                "'{}' has no base model name",
                s
            )));
        }

        let qualifiers: Vec<&str> = parts.collect();
        let variant = match qualifiers.as_slice() {
            [] | ["deterministic"] => ModelVariant::Deterministic,
            ["intracycle"] => ModelVariant::Intracycle,
            ["ens", member] if !member.is_empty() => ModelVariant::Ensemble(member.to_string()),
            other => ModelVariant::Unrecognized(other.join(":")),
        };

        Ok(Self {
            raw: s.to_string(),
            base: base.to_string(),
            variant,
        })
    }

    /// The identifier exactly as supplied.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn variant(&self) -> &ModelVariant {
        &self.variant
    }

    /// Directory segment for this model's files.
    ///
    /// Qualifiers are folded into the name, so every distinct identifier
    /// gets its own subtree: `WeatherMesh:ens:mean` -> `WeatherMesh_ens_mean`.
    pub fn directory_name(&self) -> String {
        self.raw.replace(SEPARATOR, &DIRECTORY_SEPARATOR.to_string())
    }
}

impl FromStr for ModelId {
    type Err = ForecastError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for ModelId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}
