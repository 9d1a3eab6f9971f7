//! Flat scene registry
//!
//! The simulation owns a flat list of renderable nodes; entities hold
//! `NodeId` handles into it. No hierarchy, no cross-entity ownership.
//! The renderer walks the list each frame and looks the named model up
//! in the [`crate::assets::ModelStore`].

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Handle to a node in the scene registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// A renderable node: a model name plus a transform
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Key into the model store
    pub model: String,
    pub position: Vec3,
    /// Euler rotation (XYZ order, radians)
    pub rotation: Vec3,
    pub scale: Vec3,
    pub color: [f32; 4],
    pub visible: bool,
}

impl Node {
    /// Local-to-world transform
    pub fn matrix(&self) -> Mat4 {
        let rot = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rot, self.position)
    }
}

/// Flat registry of scene nodes (sorted by id for deterministic iteration)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    nodes: Vec<Node>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node with the given model and color, returning its handle
    pub fn add(&mut self, model: &str, color: [f32; 4]) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.push(Node {
            id,
            model: model.to_string(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            color,
            visible: true,
        });
        id
    }

    /// Remove a node; returns true if it existed
    pub fn remove(&mut self, id: NodeId) -> bool {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != id);
        self.nodes.len() != before
    }

    /// Remove every node
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove() {
        let mut scene = Scene::new();
        let a = scene.add("airplane", [1.0; 4]);
        let b = scene.add("enemy", [0.5; 4]);
        assert_ne!(a, b);
        assert_eq!(scene.len(), 2);

        assert!(scene.remove(a));
        assert!(!scene.remove(a));
        assert_eq!(scene.len(), 1);
        assert!(scene.get(b).is_some());
    }

    #[test]
    fn test_ids_not_reused_after_clear() {
        let mut scene = Scene::new();
        let a = scene.add("enemy", [1.0; 4]);
        scene.clear();
        let b = scene.add("enemy", [1.0; 4]);
        assert_ne!(a, b);
        assert!(scene.get(a).is_none());
    }

    #[test]
    fn test_transform_matrix() {
        let mut scene = Scene::new();
        let id = scene.add("airplane", [1.0; 4]);
        let node = scene.get_mut(id).unwrap();
        node.position = Vec3::new(0.0, 100.0, 0.0);
        node.scale = Vec3::splat(0.25);

        let m = scene.get(id).unwrap().matrix();
        let p = m.transform_point3(Vec3::new(4.0, 0.0, 0.0));
        assert!((p - Vec3::new(1.0, 100.0, 0.0)).length() < 0.001);
    }
}
