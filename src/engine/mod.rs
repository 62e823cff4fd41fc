//! Boundary to the external simulation engine.
//!
//! The controller only ever talks to an engine through [`EngineHandle`],
//! which owns exactly one engine world, checks the tick sequence and is
//! consumed on release so a released world can never be stepped again.

pub mod reference;
pub mod state;

use crate::core::config::EngineConfig;
use crate::core::error::{Result, VizError};
use crate::core::types::Tick;

pub use reference::{ReferenceEngine, ReferenceWorld};
pub use state::{DiseaseStatus, HouseholdState, Mask, PersonState, SimulationState};

/// Read-only view over the engine's scalar field, row-major.
/// Borrowed from the world, so it cannot outlive the next `step()`.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    pub width: usize,
    pub height: usize,
    pub values: &'a [f32],
}

impl<'a> FieldView<'a> {
    pub fn new(width: usize, height: usize, values: &'a [f32]) -> Self {
        Self {
            width,
            height,
            values,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }
}

/// One live engine world.
pub trait EngineWorld {
    /// Advance exactly one tick and return the new tick number
    fn step(&mut self) -> Tick;

    /// Snapshot of the current tick
    fn state(&self) -> SimulationState;

    /// Write the current tick into an existing buffer.
    /// Engines that can reuse the buffer's allocations should override this.
    fn fill_state(&self, out: &mut SimulationState) {
        *out = self.state();
    }

    /// Ambient contamination field; `None` for radius-based spread
    fn scalar_field(&self) -> Option<FieldView<'_>>;

    /// Free engine resources. Consumes the world.
    fn release(self)
    where
        Self: Sized,
    {
    }
}

/// Creates engine worlds from configuration.
pub trait EngineFactory {
    type World: EngineWorld;

    fn create(
        &mut self,
        config: &EngineConfig,
        map_name: Option<&str>,
        seed: Option<u64>,
    ) -> Result<Self::World>;
}

/// Exclusive owner of one engine world.
pub struct EngineHandle<W: EngineWorld> {
    world: W,
    last_tick: Option<Tick>,
}

impl<W: EngineWorld> EngineHandle<W> {
    /// Create a world through the factory
    pub fn acquire<F>(
        factory: &mut F,
        config: &EngineConfig,
        map_name: Option<&str>,
        seed: Option<u64>,
    ) -> Result<Self>
    where
        F: EngineFactory<World = W>,
    {
        let world = factory.create(config, map_name, seed)?;
        tracing::debug!(?seed, map = ?map_name, "Acquired engine world");
        Ok(Self::new(world))
    }

    pub fn new(world: W) -> Self {
        Self {
            world,
            last_tick: None,
        }
    }

    /// Advance one tick, rejecting any tick that is not the previous plus one
    pub fn step(&mut self) -> Result<Tick> {
        let tick = self.world.step();
        if let Some(previous) = self.last_tick {
            if tick != previous + 1 {
                return Err(VizError::TickOutOfOrder {
                    previous,
                    got: tick,
                });
            }
        }
        self.last_tick = Some(tick);
        Ok(tick)
    }

    /// Last tick returned by `step`, if any
    pub fn last_tick(&self) -> Option<Tick> {
        self.last_tick
    }

    pub fn state(&self) -> SimulationState {
        self.world.state()
    }

    pub fn fill_state(&self, out: &mut SimulationState) {
        self.world.fill_state(out);
    }

    pub fn scalar_field(&self) -> Option<FieldView<'_>> {
        self.world.scalar_field()
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    /// Release the world. The handle is gone afterwards.
    pub fn release(self) {
        tracing::debug!(last_tick = ?self.last_tick, "Releasing engine world");
        self.world.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// World whose tick sequence is scripted
    struct ScriptedWorld {
        ticks: Vec<Tick>,
        next: usize,
    }

    impl EngineWorld for ScriptedWorld {
        fn step(&mut self) -> Tick {
            let tick = self.ticks[self.next];
            self.next += 1;
            tick
        }

        fn state(&self) -> SimulationState {
            SimulationState::default()
        }

        fn scalar_field(&self) -> Option<FieldView<'_>> {
            None
        }
    }

    #[test]
    fn test_handle_accepts_consecutive_ticks() {
        let mut handle = EngineHandle::new(ScriptedWorld {
            ticks: vec![1, 2, 3],
            next: 0,
        });
        assert_eq!(handle.step().unwrap(), 1);
        assert_eq!(handle.step().unwrap(), 2);
        assert_eq!(handle.step().unwrap(), 3);
        assert_eq!(handle.last_tick(), Some(3));
    }

    #[test]
    fn test_handle_accepts_zero_based_engines() {
        let mut handle = EngineHandle::new(ScriptedWorld {
            ticks: vec![0, 1],
            next: 0,
        });
        assert_eq!(handle.step().unwrap(), 0);
        assert_eq!(handle.step().unwrap(), 1);
    }

    #[test]
    fn test_handle_rejects_skipped_tick() {
        let mut handle = EngineHandle::new(ScriptedWorld {
            ticks: vec![1, 3],
            next: 0,
        });
        handle.step().unwrap();
        match handle.step() {
            Err(VizError::TickOutOfOrder { previous, got }) => {
                assert_eq!(previous, 1);
                assert_eq!(got, 3);
            }
            other => panic!("expected tick error, got {:?}", other),
        }
    }

    #[test]
    fn test_handle_rejects_repeated_tick() {
        let mut handle = EngineHandle::new(ScriptedWorld {
            ticks: vec![4, 4],
            next: 0,
        });
        handle.step().unwrap();
        assert!(handle.step().unwrap_err().is_consistency());
    }

    #[test]
    fn test_field_view_cell_count() {
        let values = [0.0f32; 6];
        let view = FieldView::new(3, 2, &values);
        assert_eq!(view.cell_count(), 6);
    }
}
