use std::collections::BTreeMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::DomainError;

/// Room identifier. `0` is reserved as the "no room" sentinel in preorder output.
pub type RoomId = u32;

/// Sentinel emitted in place of an absent connection.
pub const NO_ROOM: RoomId = 0;

/// Result type for structure operations.
pub type StructureResult<T> = Result<T, DomainError>;

/// Size of a room as rows x columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub rows: u32,
    pub cols: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.rows, self.cols)
    }
}

/// Node of the binary room structure.
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub dimensions: Dimensions,
    /// First connected room
    pub left: Option<Index>,
    /// Second connected room
    pub right: Option<Index>,
}

impl Room {
    pub fn new(id: RoomId, dimensions: Dimensions) -> Self {
        Self {
            id,
            dimensions,
            left: None,
            right: None,
        }
    }

    pub fn is_full(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{})", self.id, self.dimensions.rows, self.dimensions.cols)
    }
}

/// Arena-backed binary tree of rooms plus the id lookup built alongside it.
///
/// Rooms reference each other by arena index, so the tree and the id map can
/// both point at the same node without shared ownership. The id map is a
/// `BTreeMap` because every consumer wants rooms in ascending id order.
#[derive(Debug, Default)]
pub struct Structure {
    arena: Arena<Room>,
    root: Option<Index>,
    ids: BTreeMap<RoomId, Index>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unconnected, unregistered room to the arena.
    #[instrument(level = "trace", skip(self))]
    pub fn insert_room(&mut self, id: RoomId, dimensions: Dimensions) -> Index {
        self.arena.insert(Room::new(id, dimensions))
    }

    /// Records the room's id in the lookup, rejecting ids already present.
    #[instrument(level = "trace", skip(self))]
    pub fn register(&mut self, idx: Index) -> StructureResult<()> {
        let id = self
            .arena
            .get(idx)
            .map(|room| room.id)
            .ok_or_else(|| DomainError::Internal("register called with a stale index".to_string()))?;
        if id == NO_ROOM {
            return Err(DomainError::InvalidId);
        }
        if self.ids.contains_key(&id) {
            return Err(DomainError::DuplicateId(id));
        }
        self.ids.insert(id, idx);
        Ok(())
    }

    /// Connects `child` to the first free slot of `parent` (left, then right).
    #[instrument(level = "trace", skip(self))]
    pub fn attach_child(&mut self, parent: Index, child: Index) -> StructureResult<()> {
        let Some(room) = self.arena.get_mut(parent) else {
            return Err(DomainError::Internal(
                "attach_child called with a stale index".to_string(),
            ));
        };
        if room.is_full() {
            return Err(DomainError::TooManyChildren { parent: room.id });
        }
        if room.left.is_none() {
            room.left = Some(child);
        } else {
            room.right = Some(child);
        }
        Ok(())
    }

    pub fn set_root(&mut self, idx: Index) {
        self.root = Some(idx);
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn get_room(&self, idx: Index) -> Option<&Room> {
        self.arena.get(idx)
    }

    /// Looks up a registered room by id.
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.ids.get(&id).and_then(|&idx| self.arena.get(idx))
    }

    /// Number of registered rooms.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Registered rooms in ascending id order.
    pub fn rooms_by_id(&self) -> impl Iterator<Item = &Room> + '_ {
        self.ids.values().filter_map(|&idx| self.arena.get(idx))
    }

    /// Ids in `1..=len` that no registered room uses.
    pub fn missing_ids(&self) -> Vec<RoomId> {
        if self.is_empty() {
            return Vec::new();
        }
        let count = RoomId::try_from(self.len()).unwrap_or(RoomId::MAX);
        (1..=count).filter(|id| !self.ids.contains_key(id)).collect()
    }

    /// Flattens the tree as (self, left, right) with `0` for absent connections.
    ///
    /// Uses an explicit stack so very deep chains do not exhaust the call stack.
    #[instrument(level = "debug", skip(self))]
    pub fn preorder(&self) -> Vec<RoomId> {
        let mut tokens = Vec::with_capacity(2 * self.arena.len() + 1);
        let mut stack = vec![self.root];
        while let Some(slot) = stack.pop() {
            match slot.and_then(|idx| self.arena.get(idx)) {
                Some(room) => {
                    tokens.push(room.id);
                    // right pushed first so left is visited first
                    stack.push(room.right);
                    stack.push(room.left);
                }
                None => tokens.push(NO_ROOM),
            }
        }
        tokens
    }

    /// Number of rooms on the longest root-to-leaf path.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack: Vec<(Index, usize)> = self.root.map(|r| (r, 1)).into_iter().collect();
        while let Some((idx, level)) = stack.pop() {
            if let Some(room) = self.arena.get(idx) {
                deepest = deepest.max(level);
                for child in [room.left, room.right].into_iter().flatten() {
                    stack.push((child, level + 1));
                }
            }
        }
        deepest
    }
}
