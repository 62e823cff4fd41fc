//! Per-tick state reported by the engine.
//!
//! The wire shape is the engine's JSON view:
//! `{tick, people: [{id, px, py, ds, mask}], households: [{bounds, supply_levels, dual_shopper}]}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, VizError};
use crate::core::types::{Bounds, PersonId, Tick};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum DiseaseStatus {
    Susceptible,
    Exposed,
    Infectious,
    Recovered,
}

impl DiseaseStatus {
    pub const ALL: [DiseaseStatus; 4] = [
        DiseaseStatus::Susceptible,
        DiseaseStatus::Exposed,
        DiseaseStatus::Infectious,
        DiseaseStatus::Recovered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiseaseStatus::Susceptible => "susceptible",
            DiseaseStatus::Exposed => "exposed",
            DiseaseStatus::Infectious => "infectious",
            DiseaseStatus::Recovered => "recovered",
        }
    }
}

impl fmt::Display for DiseaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiseaseStatus {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "susceptible" => Ok(DiseaseStatus::Susceptible),
            "exposed" => Ok(DiseaseStatus::Exposed),
            "infectious" => Ok(DiseaseStatus::Infectious),
            "recovered" => Ok(DiseaseStatus::Recovered),
            other => Err(VizError::UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for DiseaseStatus {
    type Error = VizError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mask {
    #[default]
    None,
    Regular,
    N95,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonState {
    pub id: PersonId,
    #[serde(rename = "px")]
    pub x: f32,
    #[serde(rename = "py")]
    pub y: f32,
    #[serde(rename = "ds")]
    pub status: DiseaseStatus,
    #[serde(default)]
    pub mask: Mask,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HouseholdState {
    pub bounds: Bounds,
    #[serde(rename = "supply_levels")]
    pub supply_level: f32,
    #[serde(default)]
    pub dual_shopper: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub tick: Tick,
    pub people: Vec<PersonState>,
    #[serde(default)]
    pub households: Vec<HouseholdState>,
}

impl SimulationState {
    /// Parse the engine's JSON view of one tick
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_engine_json() {
        let json = r#"{
            "tick": 12,
            "people": [
                {"id": 0, "px": 1.5, "py": 2.0, "ds": "susceptible", "mask": "none"},
                {"id": 1, "px": 3.0, "py": 4.0, "ds": "infectious", "mask": "n95"},
                {"id": 2, "px": 5.0, "py": 6.0, "ds": "exposed"}
            ],
            "households": [
                {"bounds": {"left": 0, "right": 10, "bottom": 0, "top": 10},
                 "supply_levels": 120.0, "dual_shopper": true}
            ]
        }"#;
        let state = SimulationState::from_json(json).unwrap();
        assert_eq!(state.tick, 12);
        assert_eq!(state.people[1].status, DiseaseStatus::Infectious);
        assert_eq!(state.people[1].mask, Mask::N95);
        assert_eq!(state.people[2].mask, Mask::None);
        assert!(state.households[0].dual_shopper);
    }

    #[test]
    fn test_unknown_status_is_hard_error() {
        let json = r#"{"tick": 0, "people": [{"id": 0, "px": 0, "py": 0, "ds": "zombie"}]}"#;
        let err = SimulationState::from_json(json).unwrap_err();
        assert!(err.to_string().contains("zombie"));
        assert!(matches!(
            "zombie".parse::<DiseaseStatus>(),
            Err(VizError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_status_roundtrips_through_str() {
        for status in DiseaseStatus::ALL {
            assert_eq!(status.as_str().parse::<DiseaseStatus>().unwrap(), status);
        }
    }
}
