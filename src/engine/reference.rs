//! Deterministic stand-in engine.
//!
//! Good enough to drive the controller headless and in tests: people wander
//! with brownian motion (inside their household when the shopper behavior
//! lays out households), infection spreads by contact radius or through a
//! decaying particle field, and disease states advance on fixed periods.
//! It makes no attempt at epidemiological fidelity.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::config::{BehaviorParameters, EngineConfig, ShopperParams, SpreadParameters};
use crate::core::error::Result;
use crate::core::types::{Bounds, PersonId, Tick};
use crate::engine::state::{DiseaseStatus, HouseholdState, Mask, PersonState, SimulationState};
use crate::engine::{EngineFactory, EngineWorld, FieldView};

/// Maximum distance a person moves per tick
const STEP_LENGTH: f32 = 1.0;

/// Per-tick chance that one infectious contact inside the radius exposes a susceptible
const CONTACT_TRANSMISSION_CHANCE: f64 = 0.05;

/// Share of the extent's height used by the household grid
const HOUSEHOLD_AREA_FRACTION: f32 = 0.6;

/// Fraction of particles that pass a mask, emitted or inhaled
fn mask_pass_through(mask: Mask) -> f32 {
    match mask {
        Mask::None => 1.0,
        Mask::Regular => 0.5,
        Mask::N95 => 0.05,
    }
}

/// Factory for [`ReferenceWorld`]s
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceEngine;

impl EngineFactory for ReferenceEngine {
    type World = ReferenceWorld;

    fn create(
        &mut self,
        config: &EngineConfig,
        map_name: Option<&str>,
        seed: Option<u64>,
    ) -> Result<ReferenceWorld> {
        config.validate()?;
        let rng = match seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        if let Some(name) = map_name {
            tracing::debug!(map = name, "Reference engine lays out households procedurally");
        }
        ReferenceWorld::new(config.clone(), rng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Infection {
    Susceptible,
    Exposed(Tick),
    Infectious(Tick),
    Recovered,
}

impl Infection {
    fn status(&self) -> DiseaseStatus {
        match self {
            Infection::Susceptible => DiseaseStatus::Susceptible,
            Infection::Exposed(_) => DiseaseStatus::Exposed,
            Infection::Infectious(_) => DiseaseStatus::Infectious,
            Infection::Recovered => DiseaseStatus::Recovered,
        }
    }
}

#[derive(Debug, Clone)]
struct Person {
    id: PersonId,
    x: f32,
    y: f32,
    infection: Infection,
    mask: Mask,
    /// Area the person wanders in
    area: Bounds,
}

#[derive(Debug, Clone)]
struct Household {
    bounds: Bounds,
    supply_level: f32,
    dual_shopper: bool,
    /// Supplies added when the household restocks
    restock: f32,
}

#[derive(Debug, Clone)]
struct ParticleField {
    /// World position of cell (0, 0)
    origin: (f32, f32),
    width: usize,
    height: usize,
    cells: Vec<f32>,
}

impl ParticleField {
    /// Cell coordinates of a world position, unclamped
    fn cell(&self, x: f32, y: f32) -> (i64, i64) {
        ((x - self.origin.0) as i64, (y - self.origin.1) as i64)
    }

    /// Index of the cell under a world position, clamped to the grid
    fn index(&self, x: f32, y: f32) -> Option<usize> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        let (cx, cy) = self.cell(x, y);
        let cx = cx.clamp(0, self.width as i64 - 1) as usize;
        let cy = cy.clamp(0, self.height as i64 - 1) as usize;
        Some(cy * self.width + cx)
    }
}

/// One reference engine world
pub struct ReferenceWorld {
    config: EngineConfig,
    rng: ChaCha8Rng,
    tick: Tick,
    extent: Bounds,
    people: Vec<Person>,
    households: Vec<Household>,
    field: Option<ParticleField>,
}

impl ReferenceWorld {
    fn new(config: EngineConfig, mut rng: ChaCha8Rng) -> Result<Self> {
        let extent = config.extent()?;
        let n = config.num_people;

        let households = match &config.behavior_parameters {
            BehaviorParameters::Shopper(params) => {
                let per_household = config
                    .map_params
                    .as_ref()
                    .map(|m| m.num_people_per_household)
                    .unwrap_or(1);
                layout_households(extent, n.div_ceil(per_household), params, &mut rng)
            }
            BehaviorParameters::BrownianMotion => Vec::new(),
        };
        let per_household = if households.is_empty() {
            0
        } else {
            n.div_ceil(households.len())
        };

        let mut infected = vec![false; n];
        infected[..config.num_initially_infected].fill(true);
        infected.shuffle(&mut rng);

        let masks = match config.disease_parameters.spread_parameters {
            SpreadParameters::BackgroundViralParticle(p) => {
                let regular = ((n as f32 * p.fraction_mask).round() as usize).min(n);
                let n95 = ((n as f32 * p.fraction_n95_mask).round() as usize).min(n - regular);
                let mut masks = vec![Mask::None; n];
                masks[..regular].fill(Mask::Regular);
                masks[regular..regular + n95].fill(Mask::N95);
                masks.shuffle(&mut rng);
                masks
            }
            SpreadParameters::InfectionRadius(_) => vec![Mask::None; n],
        };

        let people = (0..n)
            .map(|i| {
                let area = if per_household > 0 {
                    households[i / per_household].bounds
                } else {
                    extent
                };
                Person {
                    id: PersonId(i as u32),
                    x: rng.gen_range(area.left..=area.right),
                    y: rng.gen_range(area.bottom..=area.top),
                    infection: if infected[i] {
                        Infection::Infectious(0)
                    } else {
                        Infection::Susceptible
                    },
                    mask: masks[i],
                    area,
                }
            })
            .collect();

        let field = if config.disease_parameters.spread_parameters.uses_particle_field() {
            let (width, height) = config.field_dimensions()?;
            Some(ParticleField {
                origin: (extent.left, extent.bottom),
                width,
                height,
                cells: vec![0.0; width * height],
            })
        } else {
            None
        };

        Ok(Self {
            config,
            rng,
            tick: 0,
            extent,
            people,
            households,
            field,
        })
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn extent(&self) -> Bounds {
        self.extent
    }

    fn move_people(&mut self) {
        for person in &mut self.people {
            let dx = self.rng.gen_range(-STEP_LENGTH..=STEP_LENGTH);
            let dy = self.rng.gen_range(-STEP_LENGTH..=STEP_LENGTH);
            person.x = (person.x + dx).clamp(person.area.left, person.area.right);
            person.y = (person.y + dy).clamp(person.area.bottom, person.area.top);
        }
    }

    fn spread(&mut self) {
        let tick = self.tick;
        match self.config.disease_parameters.spread_parameters {
            SpreadParameters::InfectionRadius(radius) => {
                let sources: Vec<(f32, f32)> = self
                    .people
                    .iter()
                    .filter(|p| matches!(p.infection, Infection::Infectious(_)))
                    .map(|p| (p.x, p.y))
                    .collect();
                let r2 = radius * radius;
                for person in &mut self.people {
                    if person.infection != Infection::Susceptible {
                        continue;
                    }
                    let contacts = sources
                        .iter()
                        .filter(|(sx, sy)| {
                            let (dx, dy) = (person.x - sx, person.y - sy);
                            dx * dx + dy * dy <= r2
                        })
                        .count();
                    for _ in 0..contacts {
                        if self.rng.gen_bool(CONTACT_TRANSMISSION_CHANCE) {
                            person.infection = Infection::Exposed(tick);
                            break;
                        }
                    }
                }
            }
            SpreadParameters::BackgroundViralParticle(params) => {
                let Some(field) = self.field.as_mut() else {
                    return;
                };
                let keep = 1.0 - params.decay_rate;
                field.cells.iter_mut().for_each(|v| *v *= keep);

                let radius = params.exhale_radius;
                let reach = radius.ceil() as i64;
                for person in self.people.iter() {
                    if !matches!(person.infection, Infection::Infectious(_)) {
                        continue;
                    }
                    let amount = params.exhale_amount * mask_pass_through(person.mask);
                    let (cx, cy) = field.cell(person.x, person.y);
                    for y in (cy - reach).max(0)..=(cy + reach).min(field.height as i64 - 1) {
                        for x in (cx - reach).max(0)..=(cx + reach).min(field.width as i64 - 1) {
                            let (dx, dy) = ((x - cx) as f32, (y - cy) as f32);
                            if dx * dx + dy * dy <= radius * radius {
                                field.cells[y as usize * field.width + x as usize] += amount;
                            }
                        }
                    }
                }

                for person in &mut self.people {
                    if person.infection != Infection::Susceptible {
                        continue;
                    }
                    let Some(index) = field.index(person.x, person.y) else {
                        continue;
                    };
                    let inhaled = field.cells[index] * mask_pass_through(person.mask);
                    let risk = (params.infection_risk_per_particle * inhaled).clamp(0.0, 1.0);
                    if risk > 0.0 && self.rng.gen_bool(risk as f64) {
                        person.infection = Infection::Exposed(tick);
                    }
                }
            }
        }
    }

    fn progress_disease(&mut self) {
        let tick = self.tick;
        let disease = &self.config.disease_parameters;
        for person in &mut self.people {
            match person.infection {
                Infection::Exposed(start) if tick - start >= disease.exposed_period_ticks => {
                    person.infection = Infection::Infectious(tick);
                }
                Infection::Infectious(start) if tick - start >= disease.infectious_period_ticks => {
                    person.infection = Infection::Recovered;
                }
                _ => {}
            }
        }
    }

    fn consume_supplies(&mut self) {
        for household in &mut self.households {
            household.supply_level -= 1.0;
            if household.supply_level <= 0.0 {
                household.supply_level += household.restock;
            }
        }
    }
}

impl EngineWorld for ReferenceWorld {
    fn step(&mut self) -> Tick {
        self.tick += 1;
        self.move_people();
        self.spread();
        self.progress_disease();
        self.consume_supplies();
        self.tick
    }

    fn state(&self) -> SimulationState {
        let mut state = SimulationState::default();
        self.fill_state(&mut state);
        state
    }

    fn fill_state(&self, out: &mut SimulationState) {
        out.tick = self.tick;
        out.people.clear();
        out.people.extend(self.people.iter().map(|p| PersonState {
            id: p.id,
            x: p.x,
            y: p.y,
            status: p.infection.status(),
            mask: p.mask,
        }));
        out.households.clear();
        out.households
            .extend(self.households.iter().map(|h| HouseholdState {
                bounds: h.bounds,
                supply_level: h.supply_level,
                dual_shopper: h.dual_shopper,
            }));
    }

    fn scalar_field(&self) -> Option<FieldView<'_>> {
        self.field
            .as_ref()
            .map(|f| FieldView::new(f.width, f.height, &f.cells))
    }
}

/// Grid of equally sized households across the lower part of the extent
fn layout_households(
    extent: Bounds,
    count: usize,
    params: &ShopperParams,
    rng: &mut ChaCha8Rng,
) -> Vec<Household> {
    if count == 0 {
        return Vec::new();
    }
    let area_height = extent.height() * HOUSEHOLD_AREA_FRACTION;
    let aspect = extent.width() / area_height;
    let cols = ((count as f32 * aspect).sqrt().ceil() as usize).max(1);
    let rows = count.div_ceil(cols);
    let cell_w = extent.width() / cols as f32;
    let cell_h = area_height / rows as f32;

    let dual_count = (count as f32 * params.fraction_dual_shopper_households).round() as usize;
    let bulk_count = (count as f32 * params.fraction_bulk_shopper_households).round() as usize;
    let mut dual = vec![false; count];
    dual[..dual_count.min(count)].fill(true);
    dual.shuffle(rng);
    let mut bulk = vec![false; count];
    bulk[..bulk_count.min(count)].fill(true);
    bulk.shuffle(rng);

    (0..count)
        .map(|i| {
            let (col, row) = (i % cols, i / cols);
            let left = extent.left + col as f32 * cell_w;
            let bottom = extent.bottom + row as f32 * cell_h;
            let restock = if bulk[i] {
                params.supplies_bought_per_trip * params.bulk_shopper_supplies_multiplier
            } else {
                params.supplies_bought_per_trip
            };
            let supply_level = if params.init_supply_high_range > params.init_supply_low_range {
                rng.gen_range(params.init_supply_low_range..params.init_supply_high_range)
            } else {
                params.init_supply_low_range
            };
            Household {
                bounds: Bounds::new(left, left + cell_w, bottom, bottom + cell_h),
                supply_level,
                dual_shopper: dual[i],
                restock: restock.max(1.0),
            }
        })
        .collect()
}
