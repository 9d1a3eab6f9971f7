//! In-memory model store
//!
//! The game only uses a handful of built-in low-poly meshes; there is no
//! asset file loading. Models are flat triangle lists in local space,
//! instanced by scene nodes and transformed by the renderer.

use std::collections::HashMap;

use thiserror::Error;

/// Model lookup failure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("can't find model {0:?}")]
    ModelNotFound(String),
}

/// A triangle-list mesh in local space
#[derive(Debug, Clone)]
pub struct Model {
    pub vertices: Vec<[f32; 3]>,
}

impl Model {
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

/// Registry of named models
#[derive(Debug, Default)]
pub struct ModelStore {
    models: HashMap<String, Model>,
}

impl ModelStore {
    /// Store populated with the built-in game meshes
    pub fn builtin() -> Self {
        let mut store = Self::default();
        store.insert("airplane", airplane_model());
        store.insert("propeller", propeller_model());
        store.insert("enemy", enemy_model());
        log::info!("Model store initialized with {} models", store.models.len());
        store
    }

    pub fn insert(&mut self, name: &str, model: Model) {
        self.models.insert(name.to_string(), model);
    }

    pub fn get(&self, name: &str) -> Result<&Model, AssetError> {
        self.models
            .get(name)
            .ok_or_else(|| AssetError::ModelNotFound(name.to_string()))
    }
}

/// Append the 12 triangles of an axis-aligned box centered at `center`
fn push_box(out: &mut Vec<[f32; 3]>, center: [f32; 3], size: [f32; 3]) {
    let [cx, cy, cz] = center;
    let [hx, hy, hz] = [size[0] / 2.0, size[1] / 2.0, size[2] / 2.0];

    // 8 corners
    let c = |sx: f32, sy: f32, sz: f32| [cx + sx * hx, cy + sy * hy, cz + sz * hz];
    let corners = [
        c(-1.0, -1.0, -1.0),
        c(1.0, -1.0, -1.0),
        c(1.0, 1.0, -1.0),
        c(-1.0, 1.0, -1.0),
        c(-1.0, -1.0, 1.0),
        c(1.0, -1.0, 1.0),
        c(1.0, 1.0, 1.0),
        c(-1.0, 1.0, 1.0),
    ];

    // Two triangles per face
    const FACES: [[usize; 4]; 6] = [
        [0, 1, 2, 3], // back
        [5, 4, 7, 6], // front
        [4, 0, 3, 7], // left
        [1, 5, 6, 2], // right
        [3, 2, 6, 7], // top
        [4, 5, 1, 0], // bottom
    ];
    for face in FACES {
        out.push(corners[face[0]]);
        out.push(corners[face[1]]);
        out.push(corners[face[2]]);
        out.push(corners[face[0]]);
        out.push(corners[face[2]]);
        out.push(corners[face[3]]);
    }
}

/// Fuselage, engine, tail and wing as stacked boxes
fn airplane_model() -> Model {
    let mut v = Vec::new();
    push_box(&mut v, [0.0, 0.0, 0.0], [80.0, 50.0, 50.0]); // cabin
    push_box(&mut v, [50.0, 0.0, 0.0], [20.0, 20.0, 20.0]); // engine
    push_box(&mut v, [-40.0, 20.0, 0.0], [15.0, 20.0, 5.0]); // tail plane
    push_box(&mut v, [0.0, 15.0, 0.0], [30.0, 5.0, 120.0]); // wings
    Model { vertices: v }
}

/// Two crossed blades around the hub
fn propeller_model() -> Model {
    let mut v = Vec::new();
    push_box(&mut v, [0.0, 0.0, 0.0], [20.0, 10.0, 10.0]); // hub
    push_box(&mut v, [8.0, 0.0, 0.0], [1.0, 80.0, 10.0]); // vertical blade
    push_box(&mut v, [8.0, 0.0, 0.0], [1.0, 10.0, 80.0]); // horizontal blade
    Model { vertices: v }
}

/// Regular tetrahedron, radius 8 (enemies are scaled up by their node)
fn enemy_model() -> Model {
    let r = 8.0_f32;
    let a = [r, r, r];
    let b = [r, -r, -r];
    let c = [-r, r, -r];
    let d = [-r, -r, r];
    Model {
        vertices: vec![a, b, c, a, c, d, a, d, b, b, d, c],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_models_present() {
        let store = ModelStore::builtin();
        for name in ["airplane", "propeller", "enemy"] {
            let model = store.get(name).unwrap();
            assert!(model.triangle_count() > 0);
            assert_eq!(model.vertices.len() % 3, 0);
        }
    }

    #[test]
    fn test_missing_model_is_an_error() {
        let store = ModelStore::builtin();
        let err = store.get("zeppelin").unwrap_err();
        assert_eq!(err, AssetError::ModelNotFound("zeppelin".to_string()));
    }
}
