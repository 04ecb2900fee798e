//! Entity container and the authoritative selection value.

use geometry::Entity;

/// The current selection: optionally an entity, and within it optionally a
/// branch of the generated structure.
///
/// A branch selection is only meaningful while an entity selection exists;
/// clearing the entity clears the branch with it. The setters below are the
/// only way to mutate the value, so the invariant cannot be broken from
/// outside.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    entity: Option<usize>,
    branch: Option<usize>,
}

impl Selection {
    pub fn entity(&self) -> Option<usize> {
        self.entity
    }

    pub fn branch(&self) -> Option<usize> {
        self.branch
    }

    pub fn clear(&mut self) {
        self.entity = None;
        self.branch = None;
    }

    /// Replace the entity selection. Changing or clearing the entity drops
    /// any branch selection.
    pub fn set_entity(&mut self, entity: Option<usize>) {
        if self.entity != entity {
            self.branch = None;
        }
        self.entity = entity;
        if self.entity.is_none() {
            self.branch = None;
        }
    }

    /// Replace the branch selection. Ignored unless an entity is selected.
    pub fn set_branch(&mut self, branch: Option<usize>) {
        if self.entity.is_some() {
            self.branch = branch;
        }
    }
}

/// Flat list of scene entities plus the selection.
///
/// Entities are created at setup and never destroyed during an edit
/// session, so plain indices are stable identifiers.
#[derive(Debug, Default)]
pub struct Scene {
    entities: Vec<Entity>,
    selection: Selection,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entity, returning its stable index.
    pub fn add(&mut self, entity: Entity) -> usize {
        self.entities.push(entity);
        self.entities.len() - 1
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, index: usize) -> &Entity {
        &self.entities[index]
    }

    pub fn entity_mut(&mut self, index: usize) -> &mut Entity {
        &mut self.entities[index]
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }
}
