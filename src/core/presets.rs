//! Built-in simulation setups for the demo pages.

use crate::core::config::{
    BehaviorParameters, DiseaseParameters, EngineConfig, MapParams, ParticleParams,
    ShopperParams, SimulationConfig, SpreadParameters, SupplyMeterConfig,
};
use crate::core::constants::{CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_CHART_PERIOD_TICKS};
use crate::core::types::Bounds;

/// Names accepted by [`by_name`]
pub const PRESET_NAMES: [&str; 4] = [
    "radius_brownian",
    "particle_shopper",
    "bulk_shopper",
    "masked_shopper",
];

const TICKS_PER_MINUTE: u64 = 60;
const INITIAL_SEED: u64 = 10914;

pub fn by_name(name: &str) -> Option<SimulationConfig> {
    match name {
        "radius_brownian" => Some(radius_brownian()),
        "particle_shopper" => Some(particle_shopper()),
        "bulk_shopper" => Some(bulk_shopper()),
        "masked_shopper" => Some(masked_shopper()),
        _ => None,
    }
}

fn canvas() -> Bounds {
    Bounds::from_size(CANVAS_WIDTH as f32, CANVAS_HEIGHT as f32)
}

fn grocery_map(num_people_per_household: usize) -> MapParams {
    MapParams {
        name: "simple_groceries".into(),
        scale: 10,
        num_people_per_household,
    }
}

fn particle_spread(infection_risk_per_particle: f32) -> SpreadParameters {
    SpreadParameters::BackgroundViralParticle(ParticleParams {
        exhale_radius: 9.0,
        exhale_amount: 1.0,
        decay_rate: 0.055,
        infection_risk_per_particle,
        fraction_mask: 0.0,
        fraction_n95_mask: 0.0,
    })
}

/// Free-roaming population with contact-radius transmission
pub fn radius_brownian() -> SimulationConfig {
    SimulationConfig {
        name: "radius_brownian".into(),
        engine_config: EngineConfig {
            disease_parameters: DiseaseParameters {
                exposed_period_ticks: 5 * TICKS_PER_MINUTE,
                infectious_period_ticks: 10 * TICKS_PER_MINUTE,
                spread_parameters: SpreadParameters::InfectionRadius(18.0),
            },
            behavior_parameters: BehaviorParameters::BrownianMotion,
            bounding_box: Some(canvas()),
            size: None,
            num_people: 200,
            num_initially_infected: 1,
            map_params: None,
        },
        map_name: None,
        initial_seed: Some(INITIAL_SEED),
        chart_update_period_ticks: DEFAULT_CHART_PERIOD_TICKS,
        show_dual_shopper: false,
        show_household_supplies: None,
    }
}

/// Two-person households where half the households send both members shopping
pub fn particle_shopper() -> SimulationConfig {
    SimulationConfig {
        name: "particle_shopper".into(),
        engine_config: EngineConfig {
            disease_parameters: DiseaseParameters {
                exposed_period_ticks: 15 * TICKS_PER_MINUTE,
                infectious_period_ticks: 45 * TICKS_PER_MINUTE,
                spread_parameters: particle_spread(0.00013),
            },
            behavior_parameters: BehaviorParameters::Shopper(ShopperParams {
                shopping_period_ticks: 10 * TICKS_PER_MINUTE,
                init_supply_low_range: 150.0,
                init_supply_high_range: 450.0,
                supplies_bought_per_trip: (30 * TICKS_PER_MINUTE) as f32,
                fraction_dual_shopper_households: 0.5,
                fraction_bulk_shopper_households: 0.0,
                bulk_shopper_time_multiplier: 0.0,
                bulk_shopper_supplies_multiplier: 0.0,
            }),
            bounding_box: Some(canvas()),
            size: None,
            num_people: 108,
            num_initially_infected: 2,
            map_params: Some(grocery_map(2)),
        },
        map_name: None,
        initial_seed: Some(INITIAL_SEED),
        chart_update_period_ticks: DEFAULT_CHART_PERIOD_TICKS,
        show_dual_shopper: false,
        show_household_supplies: Some(SupplyMeterConfig { max_supplies: 900.0 }),
    }
}

/// Single-person households, half of which shop half as often for twice as much
pub fn bulk_shopper() -> SimulationConfig {
    let mut config = particle_shopper();
    config.name = "bulk_shopper".into();
    config.engine_config.disease_parameters.spread_parameters = particle_spread(0.0003);
    config.engine_config.behavior_parameters = BehaviorParameters::Shopper(ShopperParams {
        shopping_period_ticks: 5 * TICKS_PER_MINUTE,
        init_supply_low_range: 0.0,
        init_supply_high_range: (2 * 15 * TICKS_PER_MINUTE) as f32,
        supplies_bought_per_trip: (15 * TICKS_PER_MINUTE) as f32,
        fraction_dual_shopper_households: 0.0,
        fraction_bulk_shopper_households: 0.5,
        bulk_shopper_time_multiplier: 2.0,
        bulk_shopper_supplies_multiplier: 2.0,
    });
    config.engine_config.num_people = 54;
    config.engine_config.map_params = Some(grocery_map(1));
    config.show_household_supplies = Some(SupplyMeterConfig {
        max_supplies: 2300.0,
    });
    config
}

/// Single-person households where half the population wears a mask
pub fn masked_shopper() -> SimulationConfig {
    let mut config = particle_shopper();
    config.name = "masked_shopper".into();
    if let SpreadParameters::BackgroundViralParticle(mut p) = particle_spread(0.0004) {
        p.fraction_mask = 0.5;
        config.engine_config.disease_parameters.spread_parameters =
            SpreadParameters::BackgroundViralParticle(p);
    }
    config.engine_config.num_people = 54;
    config.engine_config.map_params = Some(grocery_map(1));
    config
}
