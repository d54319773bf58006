//! Scene graph for UI nodes
//!
//! A slot-map arena of transform nodes with ordered children. The batcher
//! consumes exactly three things from here: world matrices, child order,
//! and hierarchical enabled state. Sibling order is draw order; there is
//! no depth sorting downstream, so it is semantically significant.

use crate::foundation::collections::{new_key_type, HandleMap};
use crate::foundation::math::{Mat4, Transform, Vec3};
use crate::ui::sprite::SpriteRenderer;

new_key_type! {
    /// Handle to a node in the scene graph
    pub struct NodeKey;
}

/// A transform node in the UI tree
#[derive(Default)]
pub struct Node {
    /// Local transform relative to the parent
    pub transform: Transform,

    /// Whether this node (and thus its subtree) participates in rendering
    pub enabled: bool,

    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
    sprite: Option<SpriteRenderer>,
}

/// Arena of UI nodes
///
/// Nodes are addressed by generational keys; a removed node's key resolves
/// to `None` rather than aliasing a recycled slot.
#[derive(Default)]
pub struct SceneGraph {
    nodes: HandleMap<NodeKey, Node>,
}

impl SceneGraph {
    /// Create an empty scene graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a node, appended to `parent`'s children (or as a root)
    pub fn create_node(&mut self, parent: Option<NodeKey>) -> NodeKey {
        let key = self.nodes.insert(Node {
            enabled: true,
            parent,
            ..Default::default()
        });

        if let Some(parent_key) = parent {
            if let Some(parent_node) = self.nodes.get_mut(parent_key) {
                parent_node.children.push(key);
            }
        }

        key
    }

    /// Remove a node and its entire subtree
    ///
    /// Sprites in the subtree are dropped with their nodes; callers that
    /// pooled render data for them should release it first (see
    /// `UiSystem::release_sprite`).
    pub fn remove_node(&mut self, key: NodeKey) {
        if let Some(node) = self.nodes.remove(key) {
            if let Some(parent_key) = node.parent {
                if let Some(parent_node) = self.nodes.get_mut(parent_key) {
                    parent_node.children.retain(|child| *child != key);
                }
            }
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }

    fn remove_subtree(&mut self, key: NodeKey) {
        if let Some(node) = self.nodes.remove(key) {
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }

    /// Access a node
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Access a node mutably
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    /// Ordered children of a node
    pub fn children(&self, key: NodeKey) -> &[NodeKey] {
        self.nodes.get(key).map_or(&[], |node| node.children.as_slice())
    }

    /// Set a node's local position
    pub fn set_position(&mut self, key: NodeKey, position: Vec3) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.transform.position = position;
        }
    }

    /// Attach a renderable sprite to a node, replacing any existing one
    pub fn set_sprite(&mut self, key: NodeKey, sprite: SpriteRenderer) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.sprite = Some(sprite);
        }
    }

    /// The sprite attached to a node, if any
    pub fn sprite(&self, key: NodeKey) -> Option<&SpriteRenderer> {
        self.nodes.get(key).and_then(|node| node.sprite.as_ref())
    }

    /// The sprite attached to a node, mutably
    pub fn sprite_mut(&mut self, key: NodeKey) -> Option<&mut SpriteRenderer> {
        self.nodes.get_mut(key).and_then(|node| node.sprite.as_mut())
    }

    /// Detach and return a node's sprite
    pub fn take_sprite(&mut self, key: NodeKey) -> Option<SpriteRenderer> {
        self.nodes.get_mut(key).and_then(|node| node.sprite.take())
    }

    /// World transform of a node, composed root-down
    pub fn world_matrix(&self, key: NodeKey) -> Mat4 {
        self.compose(key, Transform::to_matrix)
    }

    /// World rotation-translation of a node, ignoring scale at every level
    pub fn world_rt(&self, key: NodeKey) -> Mat4 {
        self.compose(key, Transform::to_rt_matrix)
    }

    fn compose(&self, key: NodeKey, local: impl Fn(&Transform) -> Mat4) -> Mat4 {
        let mut matrix = Mat4::identity();
        let mut current = Some(key);

        while let Some(node_key) = current {
            let Some(node) = self.nodes.get(node_key) else {
                break;
            };
            matrix = local(&node.transform) * matrix;
            current = node.parent;
        }

        matrix
    }

    /// Whether a node and all of its ancestors are enabled
    pub fn enabled_in_hierarchy(&self, key: NodeKey) -> bool {
        let mut current = Some(key);

        while let Some(node_key) = current {
            let Some(node) = self.nodes.get(node_key) else {
                return false;
            };
            if !node.enabled {
                return false;
            }
            current = node.parent;
        }

        true
    }
}
