//! Coordinator for every simulation instance on one page.
//!
//! At most one instance plays at a time. Frames are queued cooperatively:
//! a playing instance re-arms itself each time it runs, and `pause()` is
//! observed at the next frame entry.

use std::collections::VecDeque;

use ahash::{AHashMap, AHashSet};

use crate::chart::ChartSink;
use crate::core::config::SimulationConfig;
use crate::core::error::{Result, VizError};
use crate::core::types::SimulationId;
use crate::engine::EngineFactory;
use crate::playback::simulation::{FrameReport, Simulation};
use crate::render::SceneSink;

/// Outcome of one [`Stage::run_frame`] call
#[derive(Debug, Default)]
pub struct FrameSummary {
    pub ran: Vec<(SimulationId, FrameReport)>,
    /// Frames that found their instance paused or removed
    pub skipped: usize,
    /// Instances paused because their frame failed
    pub failed: Vec<(SimulationId, VizError)>,
}

pub struct Stage<F: EngineFactory> {
    simulations: AHashMap<SimulationId, Simulation<F>>,
    order: Vec<SimulationId>,
    next_id: u32,
    frame_queue: VecDeque<SimulationId>,
    queued: AHashSet<SimulationId>,
}

impl<F: EngineFactory> Default for Stage<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: EngineFactory> Stage<F> {
    pub fn new() -> Self {
        Self {
            simulations: AHashMap::new(),
            order: Vec::new(),
            next_id: 0,
            frame_queue: VecDeque::new(),
            queued: AHashSet::new(),
        }
    }

    /// Create a paused instance and register it
    pub fn spawn(
        &mut self,
        factory: F,
        config: SimulationConfig,
        scene_sink: Box<dyn SceneSink>,
        chart_sink: Box<dyn ChartSink>,
    ) -> Result<SimulationId> {
        let simulation = Simulation::new(factory, config, scene_sink, chart_sink)?;
        let id = SimulationId(self.next_id);
        self.next_id += 1;
        self.simulations.insert(id, simulation);
        self.order.push(id);
        tracing::debug!(?id, live = self.simulations.len(), "Registered simulation");
        Ok(id)
    }

    /// Deregister an instance and release its engine world
    pub fn remove(&mut self, id: SimulationId) -> Result<()> {
        let simulation = self
            .simulations
            .remove(&id)
            .ok_or(VizError::SimulationNotFound(id))?;
        self.order.retain(|&other| other != id);
        simulation.release();
        Ok(())
    }

    pub fn get(&self, id: SimulationId) -> Option<&Simulation<F>> {
        self.simulations.get(&id)
    }

    pub fn get_mut(&mut self, id: SimulationId) -> Option<&mut Simulation<F>> {
        self.simulations.get_mut(&id)
    }

    fn simulation_mut(&mut self, id: SimulationId) -> Result<&mut Simulation<F>> {
        self.simulations
            .get_mut(&id)
            .ok_or(VizError::SimulationNotFound(id))
    }

    /// Instance ids in creation order
    pub fn ids(&self) -> &[SimulationId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.simulations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.simulations.is_empty()
    }

    pub fn playing_count(&self) -> usize {
        self.simulations.values().filter(|s| s.is_playing()).count()
    }

    pub fn playing(&self) -> Option<SimulationId> {
        self.order
            .iter()
            .copied()
            .find(|id| self.simulations.get(id).is_some_and(|s| s.is_playing()))
    }

    /// Play `id`, pausing every other instance first.
    /// Playing an instance that already plays changes nothing.
    pub fn play(&mut self, id: SimulationId) -> Result<()> {
        if self.simulation_mut(id)?.is_playing() {
            return Ok(());
        }
        for (&other, simulation) in self.simulations.iter_mut() {
            if other != id {
                simulation.pause();
            }
        }
        self.simulation_mut(id)?.start();
        self.request_frame(id);
        Ok(())
    }

    pub fn pause(&mut self, id: SimulationId) -> Result<()> {
        self.simulation_mut(id)?.pause();
        Ok(())
    }

    /// Start/pause button
    pub fn toggle(&mut self, id: SimulationId) -> Result<()> {
        if self.simulation_mut(id)?.is_playing() {
            self.pause(id)
        } else {
            self.play(id)
        }
    }

    pub fn reset(&mut self, id: SimulationId) -> Result<()> {
        self.simulation_mut(id)?.reset()
    }

    pub fn set_speed(&mut self, id: SimulationId, speed: u32) -> Result<()> {
        self.simulation_mut(id)?.set_speed(speed)
    }

    /// Queue one frame for `id`. A frame already queued is not duplicated.
    pub fn request_frame(&mut self, id: SimulationId) {
        if self.queued.insert(id) {
            self.frame_queue.push_back(id);
        }
    }

    pub fn pending_frames(&self) -> usize {
        self.frame_queue.len()
    }

    /// Run every frame queued before this call.
    ///
    /// Each still-playing instance re-arms before it runs. A failing
    /// instance is paused, so its re-armed frame becomes a no-op.
    pub fn run_frame(&mut self) -> FrameSummary {
        let mut summary = FrameSummary::default();

        for _ in 0..self.frame_queue.len() {
            let Some(id) = self.frame_queue.pop_front() else {
                break;
            };
            self.queued.remove(&id);

            let playing = self.simulations.get(&id).is_some_and(|s| s.is_playing());
            if !playing {
                summary.skipped += 1;
                continue;
            }
            self.request_frame(id);

            let Some(simulation) = self.simulations.get_mut(&id) else {
                continue;
            };
            match simulation.frame() {
                Ok(Some(report)) => summary.ran.push((id, report)),
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    tracing::error!(?id, error = %e, "Frame failed, pausing simulation");
                    simulation.pause();
                    summary.failed.push((id, e));
                }
            }
        }

        summary
    }
}
