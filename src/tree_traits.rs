//! Terminal rendering of the room structure.

use generational_arena::Index;
use termtree::Tree;
use tracing::instrument;

use crate::domain::{Structure, NO_ROOM};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for Structure {
    /// Rooms labelled `id (rows x cols)`, left connection above right.
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        fn build(structure: &Structure, idx: Index) -> Tree<String> {
            let Some(room) = structure.get_room(idx) else {
                return Tree::new(NO_ROOM.to_string());
            };
            let mut tree = Tree::new(room.to_string());
            for child in [room.left, room.right].into_iter().flatten() {
                tree.push(build(structure, child));
            }
            tree
        }

        match self.root() {
            Some(root) => build(self, root),
            None => Tree::new("Empty structure".to_string()),
        }
    }
}
