/*
Indented rendering of assembled forests.
Selected nodes carry a trailing `*`.
 */
use std::fmt::Display;

use termtree::Tree;
use tracing::instrument;

use crate::domain::{Record, TreeNode};

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl<R: Record> TreeNodeConvert for TreeNode<'_, R>
where
    R::Id: Display,
{
    #[instrument(level = "trace", skip(self))]
    fn to_tree_string(&self) -> Tree<String> {
        let marker = if self.selected { " *" } else { "" };
        let label = format!("{} ({}){}", self.title, self.id, marker);

        // Recursively construct the children
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();

        Tree::new(label).with_leaves(leaves)
    }
}
