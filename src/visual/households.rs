//! Household overlays: outline, supply-level meter and dual-shopper label.

use glam::Vec2;

use crate::core::config::SupplyMeterConfig;
use crate::core::constants::{HOUSEHOLD_LABEL_OFFSET, SUPPLY_METER_INSET, SUPPLY_METER_WIDTH};
use crate::core::error::{Result, VizError};
use crate::core::types::Bounds;
use crate::engine::state::HouseholdState;

/// Vertical bar along the left wall of a household, scaled by supply level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupplyMeter {
    /// Center of the bar
    pub position: Vec2,
    pub width: f32,
    /// Height of a full bar
    pub full_height: f32,
    /// Fill fraction in [0, 1]
    pub fill: f32,
}

impl SupplyMeter {
    fn new(bounds: &Bounds) -> Self {
        Self {
            position: Vec2::new(bounds.left + SUPPLY_METER_INSET, bounds.bottom),
            width: SUPPLY_METER_WIDTH,
            full_height: bounds.height(),
            fill: 0.0,
        }
    }

    /// Bar height as currently drawn
    pub fn height(&self) -> f32 {
        self.full_height * self.fill
    }

    fn update(&mut self, bounds: &Bounds, supply_level: f32, max_supplies: f32) {
        let fill = supply_level / max_supplies;
        self.fill = if fill.is_nan() { 0.0 } else { fill.clamp(0.0, 1.0) };
        self.position.y = bounds.bottom + self.height() / 2.0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HouseholdLabel {
    SingleShopper,
    DualShopper,
}

impl HouseholdLabel {
    pub fn text(&self) -> &'static str {
        match self {
            HouseholdLabel::SingleShopper => "1x",
            HouseholdLabel::DualShopper => "2x",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HouseholdVisual {
    pub bounds: Bounds,
    pub meter: Option<SupplyMeter>,
    pub label: Option<(HouseholdLabel, Vec2)>,
}

/// Household visuals, index-aligned with the engine's household list
#[derive(Debug, Default)]
pub struct HouseholdMeters {
    households: Vec<HouseholdVisual>,
    meter_config: Option<SupplyMeterConfig>,
}

impl HouseholdMeters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(
        &mut self,
        households: &[HouseholdState],
        meter_config: Option<SupplyMeterConfig>,
        show_dual_shopper: bool,
    ) {
        self.households.clear();
        self.meter_config = meter_config;

        for household in households {
            let bounds = household.bounds;
            let meter = meter_config.map(|cfg| {
                let mut meter = SupplyMeter::new(&bounds);
                meter.update(&bounds, household.supply_level, cfg.max_supplies);
                meter
            });
            let label = show_dual_shopper.then(|| {
                let kind = if household.dual_shopper {
                    HouseholdLabel::DualShopper
                } else {
                    HouseholdLabel::SingleShopper
                };
                let anchor = Vec2::new(
                    bounds.left + HOUSEHOLD_LABEL_OFFSET.0,
                    bounds.bottom + HOUSEHOLD_LABEL_OFFSET.1,
                );
                (kind, anchor)
            });
            self.households.push(HouseholdVisual {
                bounds,
                meter,
                label,
            });
        }
    }

    /// Refresh supply meters from the current state
    pub fn sync(&mut self, households: &[HouseholdState]) -> Result<()> {
        if households.len() != self.households.len() {
            return Err(VizError::HouseholdCountMismatch {
                expected: self.households.len(),
                got: households.len(),
            });
        }
        let Some(cfg) = self.meter_config else {
            return Ok(());
        };
        for (visual, state) in self.households.iter_mut().zip(households) {
            if let Some(meter) = visual.meter.as_mut() {
                meter.update(&visual.bounds, state.supply_level, cfg.max_supplies);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.households.len()
    }

    pub fn is_empty(&self) -> bool {
        self.households.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HouseholdVisual> {
        self.households.iter()
    }
}
