//! Tree builder turning the nested `meta.json` rooms into a `Structure`.

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::{Structure, StructureResult};
use crate::domain::entities::RoomSpec;
use crate::domain::error::DomainError;

/// Constructs a room `Structure` from its nested description.
#[derive(Debug, Clone)]
pub struct StructureBuilder {
    require_contiguous_ids: bool,
}

impl Default for StructureBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureBuilder {
    pub fn new() -> Self {
        Self {
            require_contiguous_ids: true,
        }
    }

    /// Whether ids must be exactly `1..=N`. When off, dimensions are later
    /// emitted for whatever ids exist, in ascending order.
    pub fn require_contiguous_ids(mut self, required: bool) -> Self {
        self.require_contiguous_ids = required;
        self
    }

    /// Build the structure rooted at `spec`.
    ///
    /// Connected rooms are attached in list order: the first becomes the left
    /// child, the second the right child, a third is an error. Ids are checked
    /// for uniqueness after a room's connections have been built.
    #[instrument(level = "debug", skip(self, spec), fields(root = spec.id))]
    pub fn build(&self, spec: &RoomSpec) -> StructureResult<Structure> {
        let mut structure = Structure::new();
        let root = structure.insert_room(spec.id, spec.dimensions());
        structure.set_root(root);

        // Post-order walk with an explicit stack: (room, its arena slot, next connection)
        let mut open: Vec<(&RoomSpec, Index, usize)> = vec![(spec, root, 0)];
        while let Some(frame) = open.last_mut() {
            let (room, idx, next) = *frame;
            if let Some(connected) = room.connected.get(next) {
                frame.2 += 1;
                let child = structure.insert_room(connected.id, connected.dimensions());
                open.push((connected, child, 0));
                continue;
            }
            open.pop();
            structure.register(idx)?;
            if let Some(&(_, parent, _)) = open.last() {
                structure.attach_child(parent, idx)?;
            }
        }

        if self.require_contiguous_ids {
            let missing = structure.missing_ids();
            if !missing.is_empty() {
                return Err(DomainError::NonContiguousIds {
                    count: structure.len(),
                    missing,
                });
            }
        }

        debug!(
            "built structure: rooms={}, depth={}",
            structure.len(),
            structure.depth()
        );
        Ok(structure)
    }
}
