//! Visual entity registry: one persistent visual per person id.

use ahash::AHashMap;
use glam::Vec2;

use crate::core::constants::{N95_MASK_RING, PERSON_RADIUS, REGULAR_MASK_RING};
use crate::core::error::{Result, VizError};
use crate::core::types::PersonId;
use crate::engine::state::{DiseaseStatus, Mask, PersonState, SimulationState};
use crate::render::colors::{status_color, Color};

/// Ring drawn around a masked person
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskRing {
    pub kind: Mask,
    pub position: Vec2,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub line_width: f32,
}

impl MaskRing {
    fn for_mask(kind: Mask, position: Vec2) -> Option<Self> {
        let (inner_radius, outer_radius, line_width) = match kind {
            Mask::None => return None,
            Mask::Regular => REGULAR_MASK_RING,
            Mask::N95 => N95_MASK_RING,
        };
        Some(Self {
            kind,
            position,
            inner_radius,
            outer_radius,
            line_width,
        })
    }
}

/// Persistent visual for one person
#[derive(Debug, Clone, PartialEq)]
pub struct VisualEntity {
    pub position: Vec2,
    pub radius: f32,
    pub status: DiseaseStatus,
    pub color: Color,
    pub mask: Option<MaskRing>,
    /// Sync pass that last touched this entry
    synced_at: u64,
}

impl VisualEntity {
    fn from_state(person: &PersonState) -> Self {
        let position = Vec2::new(person.x, person.y);
        Self {
            position,
            radius: PERSON_RADIUS,
            status: person.status,
            color: status_color(person.status),
            mask: MaskRing::for_mask(person.mask, position),
            synced_at: 0,
        }
    }
}

/// Maps engine person ids to persistent visuals.
///
/// The population is fixed for the lifetime of one initialization, so any
/// id that appears, repeats or disappears afterwards is reported as an error
/// instead of being skipped.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    index: AHashMap<PersonId, usize>,
    ids: Vec<PersonId>,
    visuals: Vec<VisualEntity>,
    sync_pass: u64,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build one visual per person in the initial state, dropping any
    /// previous scene.
    pub fn initialize(&mut self, state: &SimulationState) -> Result<()> {
        self.clear();
        self.index.reserve(state.people.len());
        self.ids.reserve(state.people.len());
        self.visuals.reserve(state.people.len());

        for person in &state.people {
            if self.index.insert(person.id, self.visuals.len()).is_some() {
                self.clear();
                return Err(VizError::DuplicateEntity(person.id));
            }
            self.ids.push(person.id);
            self.visuals.push(VisualEntity::from_state(person));
        }

        tracing::debug!(entities = self.visuals.len(), "Initialized visual registry");
        Ok(())
    }

    /// Mutate every visual in place from the current state
    pub fn sync(&mut self, state: &SimulationState) -> Result<()> {
        self.sync_pass += 1;
        let pass = self.sync_pass;
        let mut touched = 0;

        for person in &state.people {
            let slot = *self
                .index
                .get(&person.id)
                .ok_or(VizError::UnknownEntity(person.id))?;
            let visual = &mut self.visuals[slot];
            if visual.synced_at == pass {
                return Err(VizError::DuplicateEntity(person.id));
            }
            visual.synced_at = pass;
            touched += 1;

            visual.position.x = person.x;
            visual.position.y = person.y;
            if visual.status != person.status {
                visual.status = person.status;
                visual.color = status_color(person.status);
            }
            if let Some(ring) = visual.mask.as_mut() {
                ring.position = visual.position;
            }
        }

        if touched != self.visuals.len() {
            if let Some(slot) = self.visuals.iter().position(|v| v.synced_at != pass) {
                return Err(VizError::MissingEntity(self.ids[slot]));
            }
        }
        Ok(())
    }

    /// Tear the scene down
    pub fn clear(&mut self) {
        self.index.clear();
        self.ids.clear();
        self.visuals.clear();
    }

    pub fn len(&self) -> usize {
        self.visuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visuals.is_empty()
    }

    pub fn get(&self, id: PersonId) -> Option<&VisualEntity> {
        self.index.get(&id).map(|&slot| &self.visuals[slot])
    }

    pub fn contains(&self, id: PersonId) -> bool {
        self.index.contains_key(&id)
    }

    /// Visuals in initialization order
    pub fn iter(&self) -> impl Iterator<Item = (PersonId, &VisualEntity)> {
        self.ids.iter().copied().zip(self.visuals.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: u32, x: f32, status: DiseaseStatus, mask: Mask) -> PersonState {
        PersonState {
            id: PersonId(id),
            x,
            y: x * 2.0,
            status,
            mask,
        }
    }

    fn state(people: Vec<PersonState>) -> SimulationState {
        SimulationState {
            tick: 0,
            people,
            households: Vec::new(),
        }
    }

    fn three_people() -> SimulationState {
        state(vec![
            person(10, 1.0, DiseaseStatus::Susceptible, Mask::None),
            person(11, 2.0, DiseaseStatus::Infectious, Mask::Regular),
            person(12, 3.0, DiseaseStatus::Recovered, Mask::N95),
        ])
    }

    #[test]
    fn test_initialize_creates_one_visual_per_id() {
        let mut registry = EntityRegistry::new();
        registry.initialize(&three_people()).unwrap();
        assert_eq!(registry.len(), 3);
        let infectious = registry.get(PersonId(11)).unwrap();
        assert_eq!(infectious.color, status_color(DiseaseStatus::Infectious));
        assert_eq!(infectious.mask.unwrap().kind, Mask::Regular);
        assert!(registry.get(PersonId(10)).unwrap().mask.is_none());
        assert_eq!(registry.get(PersonId(12)).unwrap().mask.unwrap().outer_radius, 6.0);
    }

    #[test]
    fn test_initialize_rejects_duplicate_ids() {
        let mut registry = EntityRegistry::new();
        let dup = state(vec![
            person(1, 1.0, DiseaseStatus::Susceptible, Mask::None),
            person(1, 2.0, DiseaseStatus::Susceptible, Mask::None),
        ]);
        assert!(matches!(
            registry.initialize(&dup),
            Err(VizError::DuplicateEntity(PersonId(1)))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_sync_mutates_in_place() {
        let mut registry = EntityRegistry::new();
        registry.initialize(&three_people()).unwrap();
        let before = registry.get(PersonId(11)).unwrap() as *const VisualEntity;

        let moved = state(vec![
            person(12, 30.0, DiseaseStatus::Recovered, Mask::N95),
            person(10, 10.0, DiseaseStatus::Exposed, Mask::None),
            person(11, 20.0, DiseaseStatus::Recovered, Mask::Regular),
        ]);
        registry.sync(&moved).unwrap();

        let after = registry.get(PersonId(11)).unwrap();
        assert_eq!(before, after as *const VisualEntity);
        assert_eq!(after.position, Vec2::new(20.0, 40.0));
        assert_eq!(after.status, DiseaseStatus::Recovered);
        assert_eq!(after.mask.unwrap().position, Vec2::new(20.0, 40.0));
        assert_eq!(
            registry.get(PersonId(10)).unwrap().color,
            status_color(DiseaseStatus::Exposed)
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_sync_rejects_unknown_id() {
        let mut registry = EntityRegistry::new();
        registry.initialize(&three_people()).unwrap();
        let mut next = three_people();
        next.people[0].id = PersonId(99);
        assert!(matches!(
            registry.sync(&next),
            Err(VizError::UnknownEntity(PersonId(99)))
        ));
    }

    #[test]
    fn test_sync_rejects_repeated_id() {
        let mut registry = EntityRegistry::new();
        registry.initialize(&three_people()).unwrap();
        let mut next = three_people();
        next.people[2].id = PersonId(10);
        assert!(matches!(
            registry.sync(&next),
            Err(VizError::DuplicateEntity(PersonId(10)))
        ));
    }

    #[test]
    fn test_sync_rejects_missing_id() {
        let mut registry = EntityRegistry::new();
        registry.initialize(&three_people()).unwrap();
        let mut next = three_people();
        next.people.remove(1);
        assert!(matches!(
            registry.sync(&next),
            Err(VizError::MissingEntity(PersonId(11)))
        ));
    }

    #[test]
    fn test_iter_keeps_initialization_order() {
        let mut registry = EntityRegistry::new();
        registry.initialize(&three_people()).unwrap();
        let ids: Vec<u32> = registry.iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }
}
