//! One simulation instance: engine handle, visuals, chart and play state.

use serde::{Deserialize, Serialize};

use crate::chart::{ChartAggregator, ChartSink};
use crate::core::config::SimulationConfig;
use crate::core::constants::CLEAR_COLOR;
use crate::core::error::{PresentationError, Result, VizError};
use crate::core::types::Tick;
use crate::engine::{EngineFactory, EngineHandle, SimulationState};
use crate::render::{CameraState, Color, FrameMetrics, SceneFrame, SceneSink};
use crate::visual::{EntityRegistry, HouseholdMeters, ScalarFieldProjector, PARTICLE_RAMP};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

/// What one frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub tick: Tick,
    pub ticks_stepped: u32,
    pub sampled: bool,
}

/// A playable simulation instance.
///
/// Owns its engine handle exclusively. Playing another instance is the
/// coordinator's business, see [`crate::playback::Stage`].
pub struct Simulation<F: EngineFactory> {
    config: SimulationConfig,
    factory: F,
    /// `None` only after a failed re-creation
    handle: Option<EngineHandle<F::World>>,
    state: SimulationState,
    registry: EntityRegistry,
    households: HouseholdMeters,
    projector: Option<ScalarFieldProjector>,
    chart: ChartAggregator,
    playback: PlaybackState,
    speed: u32,
    next_chart_sample_tick: Tick,
    camera: CameraState,
    scene_sink: Box<dyn SceneSink>,
    chart_sink: Box<dyn ChartSink>,
    metrics: FrameMetrics,
}

impl<F: EngineFactory> Simulation<F> {
    /// Build a paused instance from a validated config.
    /// The first engine world uses `initial_seed`.
    pub fn new(
        mut factory: F,
        config: SimulationConfig,
        scene_sink: Box<dyn SceneSink>,
        chart_sink: Box<dyn ChartSink>,
    ) -> Result<Self> {
        config.validate()?;
        let extent = config.engine_config.extent()?;
        let projector = if config.spread_parameters().uses_particle_field() {
            let (width, height) = config.engine_config.field_dimensions()?;
            Some(ScalarFieldProjector::new(width, height, PARTICLE_RAMP))
        } else {
            None
        };

        let handle = EngineHandle::acquire(
            &mut factory,
            &config.engine_config,
            config.map_name(),
            config.initial_seed,
        )?;

        let chart = ChartAggregator::new(
            chart_sink.display_width(),
            config.engine_config.num_people as u32,
        );

        let mut simulation = Self {
            next_chart_sample_tick: config.chart_update_period_ticks,
            config,
            factory,
            handle: Some(handle),
            state: SimulationState::default(),
            registry: EntityRegistry::new(),
            households: HouseholdMeters::new(),
            projector,
            chart,
            playback: PlaybackState::Paused,
            speed: 1,
            camera: CameraState::fit(&extent),
            scene_sink,
            chart_sink,
            metrics: FrameMetrics::new(),
        };
        simulation.initialize_scene()?;

        tracing::info!(
            name = %simulation.config.name,
            people = simulation.registry.len(),
            households = simulation.households.len(),
            seed = ?simulation.config.initial_seed,
            "Created simulation"
        );
        Ok(simulation)
    }

    /// Rebuild every per-run structure from the current engine world
    fn initialize_scene(&mut self) -> Result<()> {
        let handle = self.handle.as_ref().ok_or(VizError::EngineDetached)?;
        handle.fill_state(&mut self.state);

        self.registry.initialize(&self.state)?;
        self.households.initialize(
            &self.state.households,
            self.config.show_household_supplies,
            self.config.show_dual_shopper,
        );
        if let Some(projector) = self.projector.as_mut() {
            projector.reset();
            if let Some(field) = handle.scalar_field() {
                projector.project(field)?;
            }
        }
        self.chart.reset(self.config.engine_config.num_people as u32);
        self.next_chart_sample_tick = self.config.chart_update_period_ticks;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    pub fn is_playing(&self) -> bool {
        self.playback == PlaybackState::Playing
    }

    /// Mark as playing. Returns false if it already was.
    pub(crate) fn start(&mut self) -> bool {
        if self.is_playing() {
            return false;
        }
        self.playback = PlaybackState::Playing;
        tracing::info!(name = %self.config.name, "Playing");
        true
    }

    /// Stop stepping. Idempotent.
    pub fn pause(&mut self) {
        if self.is_playing() {
            tracing::info!(name = %self.config.name, tick = self.state.tick, "Paused");
        }
        self.playback = PlaybackState::Paused;
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    /// Ticks stepped per frame
    pub fn set_speed(&mut self, speed: u32) -> Result<()> {
        if speed == 0 {
            return Err(VizError::InvalidSpeed(speed));
        }
        tracing::debug!(name = %self.config.name, speed, "Speed changed");
        self.speed = speed;
        Ok(())
    }

    pub fn next_chart_sample_tick(&self) -> Tick {
        self.next_chart_sample_tick
    }

    pub fn tick(&self) -> Tick {
        self.state.tick
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn households(&self) -> &HouseholdMeters {
        &self.households
    }

    pub fn projector(&self) -> Option<&ScalarFieldProjector> {
        self.projector.as_ref()
    }

    pub fn chart(&self) -> &ChartAggregator {
        &self.chart
    }

    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn is_detached(&self) -> bool {
        self.handle.is_none()
    }

    /// Release the engine world and start over with an unseeded one.
    /// Play state is kept.
    pub fn reset(&mut self) -> Result<()> {
        if let Some(handle) = self.handle.take() {
            handle.release();
        }

        let handle = EngineHandle::acquire(
            &mut self.factory,
            &self.config.engine_config,
            self.config.map_name(),
            None,
        )
        .map_err(|e| {
            tracing::error!(name = %self.config.name, error = %e, "Engine re-creation failed");
            e
        })?;
        self.handle = Some(handle);
        self.initialize_scene()?;

        // Push the cleared run to both sinks
        if let Err(e) = self.chart.publish(self.chart_sink.as_mut()) {
            self.presentation_failed(e);
        }
        if let Err(e) = self.draw() {
            self.presentation_failed(e);
        }

        tracing::info!(name = %self.config.name, playback = ?self.playback, "Reset");
        Ok(())
    }

    /// Run one display frame. Paused instances do nothing and return `None`.
    pub fn frame(&mut self) -> Result<Option<FrameReport>> {
        if !self.is_playing() {
            return Ok(None);
        }
        self.metrics.begin_frame();

        let handle = self.handle.as_mut().ok_or(VizError::EngineDetached)?;
        let period = self.config.chart_update_period_ticks;
        let mut sample_due = false;
        let mut tick = self.state.tick;
        for _ in 0..self.speed {
            tick = handle.step()?;
            if tick >= self.next_chart_sample_tick {
                self.next_chart_sample_tick += period;
                sample_due = true;
            }
        }

        handle.fill_state(&mut self.state);
        self.registry.sync(&self.state)?;
        self.households.sync(&self.state.households)?;
        if let (Some(projector), Some(field)) = (self.projector.as_mut(), handle.scalar_field()) {
            projector.project(field)?;
        }

        if sample_due {
            self.chart.sample(&self.state.people);
            self.metrics.record_chart_sample();
            if let Err(e) = self.chart.publish(self.chart_sink.as_mut()) {
                self.presentation_failed(e);
            }
        }

        if let Err(e) = self.draw() {
            self.presentation_failed(e);
        }

        self.metrics.end_frame(self.speed);
        Ok(Some(FrameReport {
            tick,
            ticks_stepped: self.speed,
            sampled: sample_due,
        }))
    }

    fn draw(&mut self) -> std::result::Result<(), PresentationError> {
        let background_dirty = self
            .projector
            .as_mut()
            .map(|p| p.take_dirty())
            .unwrap_or(false);
        let frame = SceneFrame {
            tick: self.state.tick,
            people: &self.registry,
            households: &self.households,
            background: self.projector.as_ref().map(|p| p.raster()),
            background_dirty,
            clear_color: Color::from_hex(CLEAR_COLOR),
        };
        self.scene_sink.draw(&frame, &self.camera)
    }

    fn presentation_failed(&mut self, error: PresentationError) {
        self.metrics.record_presentation_failure();
        tracing::warn!(name = %self.config.name, error = %error, "Presentation failed, continuing");
    }

    /// Apply a config change, then reset. The config is untouched on error.
    fn apply_variant(&mut self, change: impl FnOnce(&mut SimulationConfig) -> Result<()>) -> Result<()> {
        let mut config = self.config.clone();
        change(&mut config)?;
        config.validate()?;
        self.config = config;
        self.reset()
    }

    /// Share of dual-shopper households (shopper behavior only)
    pub fn set_fraction_dual_shopper(&mut self, fraction: f32) -> Result<()> {
        self.apply_variant(|c| c.engine_config.set_fraction_dual_shopper(fraction))
    }

    /// Share of people in regular masks (particle spread only)
    pub fn set_fraction_mask(&mut self, fraction: f32) -> Result<()> {
        self.apply_variant(|c| c.engine_config.set_fraction_mask(fraction))
    }

    /// Share of people in N95 masks (particle spread only)
    pub fn set_fraction_n95_mask(&mut self, fraction: f32) -> Result<()> {
        self.apply_variant(|c| c.engine_config.set_fraction_n95_mask(fraction))
    }

    /// Tear down, releasing the engine world.
    pub fn release(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.release();
        }
        tracing::info!(name = %self.config.name, "Released simulation");
    }
}
