//! Simulation configuration.
//!
//! One `SimulationConfig` describes one simulation instance: the engine
//! parameters handed to the external engine plus the front-end options
//! (chart cadence, household overlays, seed). Keys that are not recognized
//! are ignored so engine-only options pass through untouched.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, VizError};
use crate::core::types::Bounds;

/// Configuration for one simulation instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Instance name, used in logs and by hosts to find their widgets
    #[serde(default)]
    pub name: String,

    pub engine_config: EngineConfig,

    /// Map to load; falls back to `engine_config.map_params.name`
    #[serde(default)]
    pub map_name: Option<String>,

    /// Seed for the first engine world only. Resets are randomly seeded.
    #[serde(default)]
    pub initial_seed: Option<u64>,

    /// Ticks between two chart samples
    pub chart_update_period_ticks: u64,

    /// Draw a "1x"/"2x" label in every household
    #[serde(default)]
    pub show_dual_shopper: bool,

    /// Draw a supply-level meter in every household
    #[serde(default)]
    pub show_household_supplies: Option<SupplyMeterConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplyMeterConfig {
    /// Supply level that fills a meter completely
    pub max_supplies: f32,
}

/// Parameters handed through to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub disease_parameters: DiseaseParameters,

    #[serde(default)]
    pub behavior_parameters: BehaviorParameters,

    #[serde(default)]
    pub bounding_box: Option<Bounds>,

    /// Legacy `[width, height]` form of the bounding box
    #[serde(default)]
    pub size: Option<(u16, u16)>,

    pub num_people: usize,
    pub num_initially_infected: usize,

    #[serde(default)]
    pub map_params: Option<MapParams>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiseaseParameters {
    #[serde(default)]
    pub exposed_period_ticks: u64,
    pub infectious_period_ticks: u64,
    pub spread_parameters: SpreadParameters,
}

/// Mutually exclusive transmission mechanism
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpreadParameters {
    #[serde(rename = "infection_radius")]
    InfectionRadius(f32),

    #[serde(rename = "background_viral_particle")]
    BackgroundViralParticle(ParticleParams),
}

impl SpreadParameters {
    /// Whether the engine exposes a scalar contamination field
    pub fn uses_particle_field(&self) -> bool {
        matches!(self, Self::BackgroundViralParticle(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleParams {
    /// How far an infectious person spreads particles
    pub exhale_radius: f32,

    /// Particles emitted per cell per tick inside the exhale radius
    #[serde(default = "default_exhale_amount")]
    pub exhale_amount: f32,

    /// Fraction of particles deactivated each tick, in [0, 1]
    pub decay_rate: f32,

    /// Infection probability per inhaled particle per tick
    pub infection_risk_per_particle: f32,

    #[serde(default)]
    pub fraction_mask: f32,

    #[serde(default)]
    pub fraction_n95_mask: f32,
}

fn default_exhale_amount() -> f32 {
    1.0
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BehaviorParameters {
    #[default]
    #[serde(rename = "brownian_motion")]
    BrownianMotion,

    #[serde(rename = "shopper")]
    Shopper(ShopperParams),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShopperParams {
    pub shopping_period_ticks: u64,
    #[serde(default)]
    pub init_supply_low_range: f32,
    #[serde(default)]
    pub init_supply_high_range: f32,
    pub supplies_bought_per_trip: f32,
    #[serde(default)]
    pub fraction_dual_shopper_households: f32,
    #[serde(default)]
    pub fraction_bulk_shopper_households: f32,
    #[serde(default)]
    pub bulk_shopper_time_multiplier: f32,
    #[serde(default)]
    pub bulk_shopper_supplies_multiplier: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapParams {
    pub name: String,
    #[serde(default = "default_map_scale")]
    pub scale: u32,
    #[serde(default = "default_people_per_household")]
    pub num_people_per_household: usize,
}

fn default_map_scale() -> u32 {
    1
}

fn default_people_per_household() -> usize {
    1
}

fn check_fraction(field: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(VizError::invalid_config(
            field,
            format!("{} is not a fraction in [0, 1]", value),
        ))
    }
}

impl SimulationConfig {
    /// Parse and validate a JSON config
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a TOML config
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    pub fn map_name(&self) -> Option<&str> {
        self.map_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| {
                self.engine_config
                    .map_params
                    .as_ref()
                    .map(|m| m.name.as_str())
            })
    }

    pub fn spread_parameters(&self) -> &SpreadParameters {
        &self.engine_config.disease_parameters.spread_parameters
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.chart_update_period_ticks == 0 {
            return Err(VizError::invalid_config(
                "chart_update_period_ticks",
                "must be at least 1",
            ));
        }
        if let Some(meter) = &self.show_household_supplies {
            if !(meter.max_supplies > 0.0) {
                return Err(VizError::invalid_config(
                    "show_household_supplies.max_supplies",
                    "must be positive",
                ));
            }
        }
        self.engine_config.validate()
    }
}

impl EngineConfig {
    /// Spatial extent, from `bounding_box` or the legacy `size`
    pub fn extent(&self) -> Result<Bounds> {
        match (self.bounding_box, self.size) {
            (Some(bounds), _) => Ok(bounds),
            (None, Some((w, h))) => Ok(Bounds::from_size(w as f32, h as f32)),
            (None, None) => Err(VizError::invalid_config(
                "bounding_box",
                "either bounding_box or size is required",
            )),
        }
    }

    /// Scalar field grid dimensions: one cell per world unit of the extent
    pub fn field_dimensions(&self) -> Result<(usize, usize)> {
        let extent = self.extent()?;
        Ok((
            extent.width().round() as usize,
            extent.height().round() as usize,
        ))
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_people == 0 {
            return Err(VizError::invalid_config("num_people", "must be at least 1"));
        }
        if self.num_initially_infected > self.num_people {
            return Err(VizError::invalid_config(
                "num_initially_infected",
                format!(
                    "{} exceeds num_people ({})",
                    self.num_initially_infected, self.num_people
                ),
            ));
        }
        if self.extent()?.is_empty() {
            return Err(VizError::invalid_config(
                "bounding_box",
                "must have positive width and height",
            ));
        }

        let disease = &self.disease_parameters;
        if disease.infectious_period_ticks == 0 {
            return Err(VizError::invalid_config(
                "disease_parameters.infectious_period_ticks",
                "must be at least 1",
            ));
        }
        match disease.spread_parameters {
            SpreadParameters::InfectionRadius(radius) => {
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(VizError::invalid_config(
                        "spread_parameters.infection_radius",
                        format!("{} is not a positive radius", radius),
                    ));
                }
            }
            SpreadParameters::BackgroundViralParticle(p) => {
                if !(p.exhale_radius.is_finite() && p.exhale_radius > 0.0) {
                    return Err(VizError::invalid_config(
                        "background_viral_particle.exhale_radius",
                        "must be positive",
                    ));
                }
                let risk = p.infection_risk_per_particle;
                if !(risk.is_finite() && risk >= 0.0) {
                    return Err(VizError::invalid_config(
                        "background_viral_particle.infection_risk_per_particle",
                        format!("{} is not a finite non-negative risk", risk),
                    ));
                }
                if !(p.exhale_amount.is_finite() && p.exhale_amount >= 0.0) {
                    return Err(VizError::invalid_config(
                        "background_viral_particle.exhale_amount",
                        format!("{} is not a finite non-negative amount", p.exhale_amount),
                    ));
                }
                let (width, height) = self.field_dimensions()?;
                if width == 0 || height == 0 {
                    return Err(VizError::invalid_config(
                        "bounding_box",
                        format!("particle field would be {}x{} cells", width, height),
                    ));
                }
                check_fraction("background_viral_particle.decay_rate", p.decay_rate)?;
                check_fraction("background_viral_particle.fraction_mask", p.fraction_mask)?;
                check_fraction(
                    "background_viral_particle.fraction_n95_mask",
                    p.fraction_n95_mask,
                )?;
                if p.fraction_mask + p.fraction_n95_mask > 1.0 {
                    return Err(VizError::invalid_config(
                        "background_viral_particle.fraction_mask",
                        "mask fractions add up to more than 1",
                    ));
                }
            }
        }

        if let BehaviorParameters::Shopper(s) = &self.behavior_parameters {
            if s.shopping_period_ticks == 0 {
                return Err(VizError::invalid_config(
                    "shopper.shopping_period_ticks",
                    "must be at least 1",
                ));
            }
            check_fraction(
                "shopper.fraction_dual_shopper_households",
                s.fraction_dual_shopper_households,
            )?;
            check_fraction(
                "shopper.fraction_bulk_shopper_households",
                s.fraction_bulk_shopper_households,
            )?;
            if s.init_supply_low_range > s.init_supply_high_range {
                return Err(VizError::invalid_config(
                    "shopper.init_supply_low_range",
                    "exceeds init_supply_high_range",
                ));
            }
        }
        if let Some(map) = &self.map_params {
            if map.num_people_per_household == 0 {
                return Err(VizError::invalid_config(
                    "map_params.num_people_per_household",
                    "must be at least 1",
                ));
            }
        }

        Ok(())
    }

    /// Change the share of dual-shopper households (shopper behavior only)
    pub fn set_fraction_dual_shopper(&mut self, fraction: f32) -> Result<()> {
        check_fraction("shopper.fraction_dual_shopper_households", fraction)?;
        match &mut self.behavior_parameters {
            BehaviorParameters::Shopper(s) => {
                s.fraction_dual_shopper_households = fraction;
                Ok(())
            }
            BehaviorParameters::BrownianMotion => Err(VizError::invalid_config(
                "behavior_parameters",
                "dual-shopper fraction requires the shopper behavior",
            )),
        }
    }

    /// Change the share of people wearing a regular mask (particle spread only)
    pub fn set_fraction_mask(&mut self, fraction: f32) -> Result<()> {
        check_fraction("background_viral_particle.fraction_mask", fraction)?;
        self.particle_params_mut()?.fraction_mask = fraction;
        Ok(())
    }

    /// Change the share of people wearing an N95 mask (particle spread only)
    pub fn set_fraction_n95_mask(&mut self, fraction: f32) -> Result<()> {
        check_fraction("background_viral_particle.fraction_n95_mask", fraction)?;
        self.particle_params_mut()?.fraction_n95_mask = fraction;
        Ok(())
    }

    fn particle_params_mut(&mut self) -> Result<&mut ParticleParams> {
        match &mut self.disease_parameters.spread_parameters {
            SpreadParameters::BackgroundViralParticle(p) => Ok(p),
            SpreadParameters::InfectionRadius(_) => Err(VizError::invalid_config(
                "spread_parameters",
                "mask fractions require background_viral_particle spread",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RADIUS_JSON: &str = r#"{
        "name": "radius",
        "engine_config": {
            "disease_parameters": {
                "exposed_period_ticks": 10,
                "infectious_period_ticks": 600,
                "spread_parameters": { "infection_radius": 18 }
            },
            "behavior_parameters": "brownian_motion",
            "size": [600, 400],
            "num_people": 200,
            "num_initially_infected": 1,
            "some_engine_only_knob": true
        },
        "chart_update_period_ticks": 30,
        "initial_seed": 42,
        "unrelated_page_option": "ignored"
    }"#;

    #[test]
    fn test_parse_radius_config_ignores_unknown_keys() {
        let config = SimulationConfig::from_json_str(RADIUS_JSON).unwrap();
        assert_eq!(config.engine_config.num_people, 200);
        assert_eq!(config.initial_seed, Some(42));
        assert_eq!(
            config.engine_config.extent().unwrap(),
            Bounds::from_size(600.0, 400.0)
        );
        assert!(!config.spread_parameters().uses_particle_field());
        assert_eq!(
            config.engine_config.behavior_parameters,
            BehaviorParameters::BrownianMotion
        );
    }

    #[test]
    fn test_parse_particle_shopper_config() {
        let json = r#"{
            "engine_config": {
                "disease_parameters": {
                    "exposed_period_ticks": 900,
                    "infectious_period_ticks": 2700,
                    "spread_parameters": {
                        "background_viral_particle": {
                            "exhale_radius": 9,
                            "decay_rate": 0.055,
                            "infection_risk_per_particle": 0.0004,
                            "fraction_mask": 0.5
                        }
                    }
                },
                "behavior_parameters": {
                    "shopper": {
                        "shopping_period_ticks": 600,
                        "supplies_bought_per_trip": 1800,
                        "fraction_dual_shopper_households": 0.5
                    }
                },
                "bounding_box": { "left": 0, "right": 600, "bottom": 0, "top": 400 },
                "num_people": 54,
                "num_initially_infected": 2,
                "map_params": { "name": "simple_groceries", "scale": 10, "num_people_per_household": 1 }
            },
            "show_household_supplies": { "max_supplies": 900 },
            "chart_update_period_ticks": 30
        }"#;
        let config = SimulationConfig::from_json_str(json).unwrap();
        assert!(config.spread_parameters().uses_particle_field());
        assert_eq!(config.map_name(), Some("simple_groceries"));
        assert_eq!(config.engine_config.field_dimensions().unwrap(), (600, 400));
        match config.spread_parameters() {
            SpreadParameters::BackgroundViralParticle(p) => {
                assert_eq!(p.exhale_amount, 1.0);
                assert_eq!(p.fraction_n95_mask, 0.0);
            }
            other => panic!("unexpected spread parameters {:?}", other),
        }
    }

    #[test]
    fn test_parse_toml_config() {
        let toml = r#"
            chart_update_period_ticks = 2

            [engine_config]
            size = [100, 100]
            num_people = 3
            num_initially_infected = 1
            behavior_parameters = "brownian_motion"

            [engine_config.disease_parameters]
            infectious_period_ticks = 20
            spread_parameters = { infection_radius = 5.0 }
        "#;
        let config = SimulationConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.chart_update_period_ticks, 2);
        assert_eq!(config.engine_config.num_people, 3);
    }

    #[test]
    fn test_missing_required_field_is_error() {
        let json = r#"{ "engine_config": { "num_people": 3 }, "chart_update_period_ticks": 2 }"#;
        assert!(matches!(
            SimulationConfig::from_json_str(json),
            Err(VizError::SerdeError(_))
        ));
    }

    #[test]
    fn test_validation_rejects_too_many_infected() {
        let mut config = SimulationConfig::from_json_str(RADIUS_JSON).unwrap();
        config.engine_config.num_initially_infected = 201;
        match config.validate() {
            Err(VizError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "num_initially_infected")
            }
            other => panic!("expected config error, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_rejects_zero_chart_period() {
        let mut config = SimulationConfig::from_json_str(RADIUS_JSON).unwrap();
        config.chart_update_period_ticks = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_extent_is_error() {
        let mut config = SimulationConfig::from_json_str(RADIUS_JSON).unwrap();
        config.engine_config.size = None;
        assert!(config.engine_config.extent().is_err());
    }

    #[test]
    fn test_variant_setters_require_matching_model() {
        let mut config = SimulationConfig::from_json_str(RADIUS_JSON).unwrap();
        assert!(config.engine_config.set_fraction_dual_shopper(0.3).is_err());
        assert!(config.engine_config.set_fraction_mask(0.3).is_err());
        assert!(config.engine_config.set_fraction_dual_shopper(1.5).is_err());
    }

    fn particle_risk_mut(config: &mut SimulationConfig) -> &mut ParticleParams {
        match &mut config.engine_config.disease_parameters.spread_parameters {
            SpreadParameters::BackgroundViralParticle(p) => p,
            other => panic!("expected particle spread, got {:?}", other),
        }
    }

    #[test]
    fn test_particle_field_must_have_cells() {
        let mut config = crate::core::presets::particle_shopper();
        config.engine_config.bounding_box = Some(Bounds::new(0.0, 0.4, 0.0, 0.4));
        match config.validate() {
            Err(VizError::InvalidConfig { field, .. }) => assert_eq!(field, "bounding_box"),
            other => panic!("expected config error, got {:?}", other),
        }

        // Radius spread has no field, so a tiny extent is fine
        let mut radius = crate::core::presets::radius_brownian();
        radius.engine_config.bounding_box = Some(Bounds::new(0.0, 0.4, 0.0, 0.4));
        assert!(radius.validate().is_ok());
    }

    #[test]
    fn test_non_finite_particle_params_rejected() {
        let mut config = crate::core::presets::particle_shopper();
        particle_risk_mut(&mut config).infection_risk_per_particle = f32::NAN;
        match config.validate() {
            Err(VizError::InvalidConfig { field, .. }) => {
                assert_eq!(field, "background_viral_particle.infection_risk_per_particle")
            }
            other => panic!("expected config error, got {:?}", other),
        }

        let mut config = crate::core::presets::particle_shopper();
        particle_risk_mut(&mut config).exhale_amount = f32::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_nan_risk_rejected() {
        let shipped = include_str!("../../configs/grocery_masks.toml");
        assert!(SimulationConfig::from_toml_str(shipped).is_ok());

        let text = shipped.replace(
            "infection_risk_per_particle = 0.00013",
            "infection_risk_per_particle = nan",
        );
        assert_ne!(text, shipped);
        assert!(SimulationConfig::from_toml_str(&text).is_err());
    }
}
