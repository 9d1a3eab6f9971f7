//! Frame geometry assembly.
//!
//! The whole frame is rebuilt on the CPU each render: every visible scene
//! node's model is transformed by its world matrix, and the sea grid is
//! triangulated from its displaced vertex positions.

use glam::{Mat4, Vec3};

use crate::assets::{AssetError, ModelStore};
use crate::scene::Scene;
use crate::sim::Sea;

use super::vertex::{Vertex, colors};

/// Flatten all visible scene nodes into a triangle list.
pub fn scene_vertices(scene: &Scene, models: &ModelStore) -> Result<Vec<Vertex>, AssetError> {
    let mut out = Vec::new();
    for node in scene.iter() {
        if !node.visible {
            continue;
        }
        let model = models.get(&node.model)?;
        let matrix = node.matrix();
        for v in &model.vertices {
            let p = matrix.transform_point3(Vec3::from_array(*v));
            out.push(Vertex::new(p.to_array(), node.color));
        }
    }
    Ok(out)
}

/// Triangulate the sea cylinder from its live (wave-displaced) grid.
pub fn sea_vertices(sea: &Sea, sea_radius: f32) -> Vec<Vertex> {
    let transform =
        Mat4::from_translation(Vec3::new(0.0, -sea_radius, 0.0)) * Mat4::from_rotation_z(sea.rotation);

    let radial = sea.radial_segments as usize;
    let length = sea.length_segments as usize;
    let idx = |j: usize, i: usize| j * (radial + 1) + i;

    let mut out = Vec::with_capacity(radial * length * 6);
    for j in 0..length {
        for i in 0..radial {
            let quad = [
                sea.positions[idx(j, i)],
                sea.positions[idx(j, i + 1)],
                sea.positions[idx(j + 1, i + 1)],
                sea.positions[idx(j, i)],
                sea.positions[idx(j + 1, i + 1)],
                sea.positions[idx(j + 1, i)],
            ];
            for p in quad {
                let world = transform.transform_point3(p);
                out.push(Vertex::new(world.to_array(), colors::SEA));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::World;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn sea_triangulation_covers_every_quad() {
        let world = World::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let sea = Sea::new(&world, &mut rng);
        let verts = sea_vertices(&sea, world.sea_radius);
        let quads = world.sea_radial_segments as usize * world.sea_length_segments as usize;
        assert_eq!(verts.len(), quads * 6);
    }

    #[test]
    fn missing_model_propagates() {
        let models = ModelStore::builtin();
        let mut scene = Scene::new();
        scene.add("submarine", [1.0, 0.0, 0.0, 1.0]);
        assert!(scene_vertices(&scene, &models).is_err());
    }

    #[test]
    fn invisible_nodes_are_skipped() {
        let models = ModelStore::builtin();
        let mut scene = Scene::new();
        let id = scene.add("enemy", [1.0, 0.0, 0.0, 1.0]);
        let with_node = scene_vertices(&scene, &models).unwrap().len();
        assert!(with_node > 0);
        if let Some(node) = scene.get_mut(id) {
            node.visible = false;
        }
        assert!(scene_vertices(&scene, &models).unwrap().is_empty());
    }
}
