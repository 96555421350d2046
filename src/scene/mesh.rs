use std::ops::Range;

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use crate::geometry::{Triangle, WorldPoint, WorldTransform};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("Index count {0} is not a multiple of three")]
    IndexCountNotMultipleOfThree(usize),

    #[error("Vertex index {index} out of range, mesh has {vertex_count} vertices")]
    VertexIndexOutOfRange { index: u32, vertex_count: usize },

    #[error("Vertex {index} has a non-finite coordinate")]
    NonFiniteVertex { index: usize },
}

/// Checks that the indices form whole triangles over existing, finite vertices.
pub fn validate_triangles(vertices: &[WorldPoint], indices: &[u32]) -> Result<(), MeshError> {
    if indices.len() % 3 != 0 {
        return Err(MeshError::IndexCountNotMultipleOfThree(indices.len()));
    }

    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices.len()) {
        return Err(MeshError::VertexIndexOutOfRange {
            index,
            vertex_count: vertices.len(),
        });
    }

    if let Some(index) = vertices
        .iter()
        .position(|v| !v.iter().all(|x| x.is_finite()))
    {
        return Err(MeshError::NonFiniteVertex { index });
    }

    Ok(())
}

/// Groups a flat index list into triangles.
/// Indices must have been validated.
pub(crate) fn index_triangles(indices: &[u32]) -> impl Iterator<Item = Triangle<usize>> + '_ {
    indices
        .chunks_exact(3)
        .map(|c| Triangle::new(c[0] as usize, c[1] as usize, c[2] as usize))
}

/// Indexed triangle mesh in its local space, with a placement in the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    vertices: Vec<WorldPoint>,
    indices: Vec<u32>,
    local_to_world: WorldTransform,
}

impl Mesh {
    pub fn new(vertices: Vec<WorldPoint>, indices: Vec<u32>) -> Result<Mesh, MeshError> {
        validate_triangles(&vertices, &indices)?;
        Ok(Mesh {
            vertices,
            indices,
            local_to_world: WorldTransform::identity(),
        })
    }

    pub fn with_transform(self, local_to_world: WorldTransform) -> Mesh {
        Mesh {
            local_to_world,
            ..self
        }
    }

    pub fn vertices(&self) -> &[WorldPoint] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn local_to_world(&self) -> &WorldTransform {
        &self.local_to_world
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(u64);

/// Set of meshes that the BVH is built over.
/// Every change marks the set as needing a rebuild, the flag is consumed by
/// [`MeshRegistry::take_rebuild`].
#[derive(Clone, Debug, Default)]
pub struct MeshRegistry {
    meshes: IndexMap<MeshId, Mesh>,
    next_id: u64,
    needs_rebuild: bool,
}

impl MeshRegistry {
    pub fn new() -> MeshRegistry {
        Default::default()
    }

    pub fn register(&mut self, mesh: Mesh) -> MeshId {
        let id = MeshId(self.next_id);
        self.next_id += 1;
        self.meshes.insert(id, mesh);
        self.needs_rebuild = true;
        id
    }

    /// Removes the mesh, keeping registration order of the remaining ones.
    pub fn unregister(&mut self, id: MeshId) -> Option<Mesh> {
        let removed = self.meshes.shift_remove(&id);
        if removed.is_some() {
            self.needs_rebuild = true;
        }
        removed
    }

    /// Moves a registered mesh. Returns false if the id is unknown.
    pub fn set_transform(&mut self, id: MeshId, local_to_world: WorldTransform) -> bool {
        let Some(mesh) = self.meshes.get_mut(&id) else {
            return false;
        };
        mesh.local_to_world = local_to_world;
        self.needs_rebuild = true;
        true
    }

    pub fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn needs_rebuild(&self) -> bool {
        self.needs_rebuild
    }

    /// Returns the current batch if anything changed since the last call.
    pub fn take_rebuild(&mut self) -> Option<MeshBatch> {
        if !std::mem::take(&mut self.needs_rebuild) {
            return None;
        }
        Some(self.batch())
    }

    /// Concatenates all meshes in registration order.
    pub fn batch(&self) -> MeshBatch {
        let mut batch = MeshBatch::default();

        for mesh in self.meshes.values() {
            let first_vertex = batch.vertices.len();
            let first_index = batch.indices.len();

            batch.vertices.extend_from_slice(&mesh.vertices);
            batch
                .indices
                .extend(mesh.indices.iter().map(|i| i + first_vertex as u32));
            batch.instances.push(MeshInstance {
                local_to_world: mesh.local_to_world,
                indices: first_index..batch.indices.len(),
                vertices: first_vertex..batch.vertices.len(),
            });
        }

        debug!(
            "Batched {} meshes: {} vertices, {} triangles",
            batch.instances.len(),
            batch.vertices.len(),
            batch.triangle_count()
        );

        batch
    }
}

/// Placement of one mesh inside a [`MeshBatch`].
#[derive(Clone, Debug, PartialEq)]
pub struct MeshInstance {
    pub local_to_world: WorldTransform,
    /// Range in the batch index array
    pub indices: Range<usize>,
    /// Range in the batch vertex array
    pub vertices: Range<usize>,
}

/// All registered meshes concatenated into shared vertex and index arrays.
/// Indices are already offset to point into the shared vertex array.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBatch {
    vertices: Vec<WorldPoint>,
    indices: Vec<u32>,
    instances: Vec<MeshInstance>,
}

impl MeshBatch {
    /// Vertices in mesh local space.
    pub fn vertices(&self) -> &[WorldPoint] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn instances(&self) -> &[MeshInstance] {
        &self.instances
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Vertices with their mesh transform applied, same order as [`MeshBatch::vertices`].
    pub fn world_vertices(&self) -> Vec<WorldPoint> {
        let mut world = Vec::with_capacity(self.vertices.len());
        for instance in &self.instances {
            world.extend(
                self.vertices[instance.vertices.clone()]
                    .iter()
                    .map(|v| instance.local_to_world.transform_point(v)),
            );
        }
        world
    }
}
