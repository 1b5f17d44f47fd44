//! Generic tree node produced by the assembler.

use std::fmt;

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::domain::record::Record;

/// A node wrapping exactly one record.
///
/// Children are owned exclusively by their parent and kept in discovery
/// order. There are no back-references; walk from the roots downwards.
pub struct TreeNode<'a, R: Record> {
    pub title: String,
    pub id: R::Id,
    pub parent_id: R::Id,
    pub selected: bool,
    pub payload: &'a R::Payload,
    pub children: Vec<TreeNode<'a, R>>,
}

impl<'a, R: Record> TreeNode<'a, R> {
    pub fn new(record: &'a R) -> Self {
        Self {
            title: record.title(),
            id: record.id(),
            parent_id: record.parent_id(),
            selected: false,
            payload: record.payload(),
            children: Vec::new(),
        }
    }

    /// Appends `child` as the last child.
    pub fn add_child(&mut self, child: TreeNode<'a, R>) {
        self.children.push(child);
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(TreeNode::depth)
            .max()
            .unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Collects all leaf nodes, left to right.
    pub fn leaf_nodes(&self) -> Vec<&TreeNode<'a, R>> {
        self.iter().filter(|node| node.is_leaf()).collect()
    }

    pub fn selected_nodes(&self) -> Vec<&TreeNode<'a, R>> {
        self.iter().filter(|node| node.selected).collect()
    }

    /// First node in pre-order whose id equals `id`.
    pub fn find(&self, id: &R::Id) -> Option<&TreeNode<'a, R>> {
        self.iter().find(|node| &node.id == id)
    }

    /// Pre-order, left-to-right traversal starting at this node.
    pub fn iter(&self) -> TreeIterator<'_, 'a, R> {
        TreeIterator { stack: vec![self] }
    }
}

pub struct TreeIterator<'n, 'a, R: Record> {
    stack: Vec<&'n TreeNode<'a, R>>,
}

impl<'n, 'a, R: Record> Iterator for TreeIterator<'n, 'a, R> {
    type Item = &'n TreeNode<'a, R>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(current.children.iter().rev());
        Some(current)
    }
}

impl<R: Record> Clone for TreeNode<'_, R> {
    fn clone(&self) -> Self {
        Self {
            title: self.title.clone(),
            id: self.id.clone(),
            parent_id: self.parent_id.clone(),
            selected: self.selected,
            payload: self.payload,
            children: self.children.clone(),
        }
    }
}

impl<R: Record> fmt::Debug for TreeNode<'_, R>
where
    R::Payload: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("title", &self.title)
            .field("id", &self.id)
            .field("parent_id", &self.parent_id)
            .field("selected", &self.selected)
            .field("payload", &self.payload)
            .field("children", &self.children)
            .finish()
    }
}

impl<R: Record> PartialEq for TreeNode<'_, R>
where
    R::Payload: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.id == other.id
            && self.parent_id == other.parent_id
            && self.selected == other.selected
            && self.payload == other.payload
            && self.children == other.children
    }
}

impl<R: Record> Serialize for TreeNode<'_, R>
where
    R::Id: Serialize,
    R::Payload: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TreeNode", 6)?;
        state.serialize_field("title", &self.title)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("parentId", &self.parent_id)?;
        state.serialize_field("selected", &self.selected)?;
        state.serialize_field("payload", self.payload)?;
        state.serialize_field("children", &self.children)?;
        state.end()
    }
}
