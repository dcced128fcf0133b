use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Species the skin model was trained on. Class labels are prefixed with
/// the lowercase species name, e.g. `dog_ringworm`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid species. Must be \"dog\" or \"cat\"")]
pub struct SpeciesError(pub String);

impl Species {
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
        }
    }

    pub fn label_prefix(&self) -> String {
        format!("{}_", self.as_str())
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Species {
    type Err = SpeciesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dog" => Ok(Species::Dog),
            "cat" => Ok(Species::Cat),
            _ => Err(SpeciesError(s.to_string())),
        }
    }
}
