//! Shipped config files load and run.

use std::path::PathBuf;

use outbreak_viz::chart::TextChart;
use outbreak_viz::core::config::{BehaviorParameters, SpreadParameters};
use outbreak_viz::engine::ReferenceEngine;
use outbreak_viz::render::NullScene;
use outbreak_viz::{SimulationConfig, Stage};

fn config_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("configs").join(name)
}

#[test]
fn test_toml_config_loads() {
    let config = SimulationConfig::load(&config_path("grocery_masks.toml")).unwrap();
    assert_eq!(config.name, "grocery_masks");
    assert_eq!(config.map_name(), Some("simple_groceries"));
    assert!(config.show_dual_shopper);
    match config.spread_parameters() {
        SpreadParameters::BackgroundViralParticle(p) => {
            assert_eq!(p.fraction_mask, 0.25);
            assert_eq!(p.fraction_n95_mask, 0.1);
        }
        other => panic!("unexpected spread {:?}", other),
    }
    assert!(matches!(
        config.engine_config.behavior_parameters,
        BehaviorParameters::Shopper(_)
    ));
}

#[test]
fn test_json_config_loads_with_unknown_keys() {
    let config = SimulationConfig::load(&config_path("open_field.json")).unwrap();
    assert_eq!(config.engine_config.num_people, 200);
    assert_eq!(config.engine_config.extent().unwrap().width(), 600.0);
}

#[test]
fn test_shipped_configs_play() {
    for file in ["grocery_masks.toml", "open_field.json"] {
        let config = SimulationConfig::load(&config_path(file)).unwrap();
        let people = config.engine_config.num_people;
        let mut stage = Stage::new();
        let id = stage
            .spawn(
                ReferenceEngine,
                config,
                Box::new(NullScene),
                Box::new(TextChart::new(10, 2)),
            )
            .unwrap();
        stage.play(id).unwrap();
        for _ in 0..3 {
            assert!(stage.run_frame().failed.is_empty());
        }
        assert_eq!(stage.get(id).unwrap().registry().len(), people);
    }
}

#[test]
fn test_missing_file_is_io_error() {
    let err = SimulationConfig::load(&config_path("nope.json")).unwrap_err();
    assert!(matches!(err, outbreak_viz::VizError::IoError(_)));
}
