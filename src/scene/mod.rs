//! Scene-graph sink
//!
//! The trackers never touch a renderer directly. Poses are written through
//! [`SceneSink`], which a host implements over its own scene graph.

use nalgebra::Vector3;
use std::collections::HashMap;

/// Opaque handle to a scene entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

/// Position (meters) and Euler rotation (radians) of an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityTransform {
    pub position: Vector3<f64>,
    pub rotation: Vector3<f64>,
}

impl Default for EntityTransform {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            rotation: Vector3::zeros(),
        }
    }
}

/// Read/write access to entity transforms
pub trait SceneSink {
    /// Current transform, `None` for an unknown entity
    fn transform(&self, entity: EntityId) -> Option<EntityTransform>;

    fn set_transform(&mut self, entity: EntityId, transform: EntityTransform);
}

/// Scene held in a map, for tests and headless runs
#[derive(Debug, Default, Clone)]
pub struct InMemoryScene {
    entities: HashMap<EntityId, EntityTransform>,
    writes: u64,
}

impl InMemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, entity: EntityId) {
        self.entities.entry(entity).or_default();
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Number of transform writes received
    pub fn writes(&self) -> u64 {
        self.writes
    }
}

impl SceneSink for InMemoryScene {
    fn transform(&self, entity: EntityId) -> Option<EntityTransform> {
        self.entities.get(&entity).copied()
    }

    fn set_transform(&mut self, entity: EntityId, transform: EntityTransform) {
        self.writes += 1;
        self.entities.insert(entity, transform);
    }
}
