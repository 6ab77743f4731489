//! Scene graph traversal.
//!
//! glTF does not forbid a node from appearing twice in the graph or from
//! being its own ancestor. Traversal keeps a visited set so every node is
//! yielded at most once and cyclic graphs terminate.

use std::collections::HashSet;

use glam::Mat4;

use crate::error::IndexError;
use crate::index::Index;
use crate::schema::{Document, Node, Scene};

/// A node reached during traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitedNode<'a> {
    pub index: Index<Node>,
    pub node: &'a Node,
    /// The node it was reached from, `None` for roots.
    pub parent: Option<Index<Node>>,
    /// Distance from the root, roots are at depth 0.
    pub depth: usize,
    /// Accumulated transform from the root down to this node.
    pub world: Mat4,
}

impl Document {
    /// The default scene, or the first scene when none is named.
    pub fn default_scene(&self) -> Result<Option<&Scene>, IndexError> {
        match self.scene {
            Some(index) => index.resolve(self).map(Some),
            None => Ok(self.scenes.first()),
        }
    }

    /// Nodes that are nobody's child.
    ///
    /// Used as roots when a document carries nodes but no scene. Child
    /// references past the end of `nodes` are ignored here.
    pub fn root_nodes(&self) -> Vec<Index<Node>> {
        let mut has_parent = vec![false; self.nodes.len()];
        for node in &self.nodes {
            for child in &node.children {
                if let Some(flag) = has_parent.get_mut(child.value()) {
                    *flag = true;
                }
            }
        }
        has_parent
            .iter()
            .enumerate()
            .filter(|(_, is_child)| !**is_child)
            .map(|(i, _)| Index::new(i))
            .collect()
    }

    /// Walk a scene's node graph depth-first.
    pub fn walk_scene(&self, scene: &Scene) -> Result<Vec<VisitedNode<'_>>, IndexError> {
        self.walk(&scene.nodes)
    }

    /// Walk the graph below `roots` depth-first, in pre-order.
    ///
    /// Every reference met is resolved, so a dangling child fails the whole
    /// walk with [`IndexError`]. A node already visited is skipped along with
    /// its subtree.
    pub fn walk(&self, roots: &[Index<Node>]) -> Result<Vec<VisitedNode<'_>>, IndexError> {
        let mut visited = HashSet::new();
        let mut out = Vec::new();
        let mut stack: Vec<(Index<Node>, Option<Index<Node>>, usize, Mat4)> = roots
            .iter()
            .rev()
            .map(|&root| (root, None, 0, Mat4::IDENTITY))
            .collect();

        while let Some((index, parent, depth, parent_world)) = stack.pop() {
            let node = index.resolve(self)?;
            if !visited.insert(index) {
                tracing::debug!(node = %index, "node reached twice, skipping");
                continue;
            }

            let world = parent_world * node.transform();
            for &child in node.children.iter().rev() {
                stack.push((child, Some(index), depth + 1, world));
            }
            out.push(VisitedNode { index, node, parent, depth, world });
        }

        Ok(out)
    }
}
