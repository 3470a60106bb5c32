//! Flat on-disk encoding of the room structure.
//!
//! Layout of the header written ahead of the tests:
//!
//! ```text
//! <room count>
//! <preorder ids, 0 for an absent connection>
//! <rows> <cols>        one line per room, ascending id
//! <blank line>
//! ```

use std::collections::BTreeMap;
use std::io::{self, Write};

use itertools::Itertools;
use tracing::instrument;

use crate::domain::arena::{RoomId, Structure, StructureResult, NO_ROOM};
use crate::domain::error::DomainError;

/// Write the structure header to `out`.
#[instrument(level = "debug", skip_all, fields(rooms = structure.len()))]
pub fn write_structure<W: Write + ?Sized>(out: &mut W, structure: &Structure) -> io::Result<()> {
    writeln!(out, "{}", structure.len())?;
    writeln!(out, "{}", structure.preorder().iter().join(" "))?;
    for room in structure.rooms_by_id() {
        writeln!(out, "{}", room.dimensions)?;
    }
    writeln!(out)
}

/// Tree shape recovered from (or described by) a preorder sequence:
/// for every id, its left and right connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreorderShape {
    pub root: Option<RoomId>,
    pub links: BTreeMap<RoomId, [Option<RoomId>; 2]>,
}

impl PreorderShape {
    /// Shape of an already built structure.
    pub fn of(structure: &Structure) -> Self {
        let id_of = |slot: Option<generational_arena::Index>| {
            slot.and_then(|idx| structure.get_room(idx)).map(|room| room.id)
        };
        let links = structure
            .rooms_by_id()
            .map(|room| (room.id, [id_of(room.left), id_of(room.right)]))
            .collect();
        Self {
            root: id_of(structure.root()),
            links,
        }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

fn malformed(reason: impl Into<String>) -> DomainError {
    DomainError::MalformedPreorder {
        reason: reason.into(),
    }
}

/// Rebuild the tree shape from a preorder sequence with `0` sentinels.
///
/// Every id opens a frame with two slots to fill; each following token fills
/// the next free slot of the innermost open frame.
pub fn decode_preorder(tokens: &[RoomId]) -> StructureResult<PreorderShape> {
    let Some((&first, rest)) = tokens.split_first() else {
        return Err(malformed("empty sequence"));
    };
    let mut shape = PreorderShape::default();
    if first == NO_ROOM {
        if !rest.is_empty() {
            return Err(malformed("tokens after an empty root"));
        }
        return Ok(shape);
    }

    shape.root = Some(first);
    shape.links.insert(first, [None, None]);
    // (room, next slot to fill)
    let mut open: Vec<(RoomId, usize)> = vec![(first, 0)];

    for (pos, &token) in rest.iter().enumerate() {
        let Some(&(parent, slot)) = open.last() else {
            return Err(malformed(format!("trailing tokens from position {}", pos + 1)));
        };
        let child = (token != NO_ROOM).then_some(token);
        if let Some(links) = shape.links.get_mut(&parent) {
            links[slot] = child;
        }
        if slot == 1 {
            open.pop();
        } else if let Some(frame) = open.last_mut() {
            frame.1 = 1;
        }

        if let Some(id) = child {
            if shape.links.insert(id, [None, None]).is_some() {
                return Err(DomainError::DuplicateId(id));
            }
            open.push((id, 0));
        }
    }

    if !open.is_empty() {
        return Err(malformed(format!(
            "sequence ended with {} unfinished rooms",
            open.len()
        )));
    }
    Ok(shape)
}
