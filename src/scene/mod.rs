pub mod gpu;
pub mod mesh;
pub mod placement;
pub mod primitives;
pub mod triangle_bvh;

use itertools::Itertools as _;

use crate::geometry::{WorldBox, WorldPoint};

pub use gpu::{GpuBvhNode, GpuCube, GpuMeshObject, GpuSceneData, GpuSphere};
pub use mesh::{Mesh, MeshBatch, MeshError, MeshId, MeshInstance, MeshRegistry};
pub use placement::{MaterialSettings, PlacementError, PlacementSettings, Primitives, place_primitives};
pub use primitives::{Cube, Material, Sphere, hsv_to_rgb};
pub use triangle_bvh::{AxisWindowMerge, ExhaustiveMerge, MergeStrategy, TriangleBvh};

/// Everything the renderer needs for one frame: primitives, meshes and the BVH over the meshes.
///
/// A scene is never modified in place, resets and mesh changes produce a new scene.
#[derive(Clone, Debug)]
pub struct Scene {
    primitives: Primitives,
    meshes: MeshBatch,
    /// World space mesh vertices the BVH was built over
    world_vertices: Vec<WorldPoint>,
    bvh: Option<TriangleBvh>,
}

impl Scene {
    pub fn new(primitives: Primitives, meshes: MeshBatch) -> Result<Scene, MeshError> {
        Self::with_strategy(primitives, meshes, &mut ExhaustiveMerge)
    }

    pub fn with_strategy(
        primitives: Primitives,
        meshes: MeshBatch,
        strategy: &mut impl MergeStrategy,
    ) -> Result<Scene, MeshError> {
        let world_vertices = meshes.world_vertices();
        let bvh = TriangleBvh::build_with(&world_vertices, meshes.indices(), strategy)?;
        Ok(Scene {
            primitives,
            meshes,
            world_vertices,
            bvh,
        })
    }

    /// Scene reset: swaps in new primitives, keeps the meshes and their BVH.
    pub fn replace_primitives(self, primitives: Primitives) -> Scene {
        Scene { primitives, ..self }
    }

    /// Mesh set change: the BVH is rebuilt, primitives are kept.
    pub fn replace_meshes(
        self,
        meshes: MeshBatch,
        strategy: &mut impl MergeStrategy,
    ) -> Result<Scene, MeshError> {
        Self::with_strategy(self.primitives, meshes, strategy)
    }

    pub fn primitives(&self) -> &Primitives {
        &self.primitives
    }

    pub fn meshes(&self) -> &MeshBatch {
        &self.meshes
    }

    /// None if there are no mesh triangles.
    pub fn bvh(&self) -> Option<&TriangleBvh> {
        self.bvh.as_ref()
    }

    /// Box around all primitives and mesh triangles.
    pub fn bounding_box(&self) -> Option<WorldBox> {
        let meshes = self.bvh.as_ref().map(|bvh| *bvh.bounding_box());
        [self.primitives.bounding_box(), meshes]
            .into_iter()
            .flatten()
            .reduce(|a, b| a.union(&b))
    }

    pub fn gpu_data(&self) -> GpuSceneData {
        GpuSceneData {
            spheres: self.primitives.spheres().iter().map_into().collect(),
            cubes: self.primitives.cubes().iter().map_into().collect(),
            mesh_objects: self.meshes.instances().iter().map_into().collect(),
            vertices: self.world_vertices.iter().map(|&v| v.into()).collect(),
            indices: self.meshes.indices().to_vec(),
            bvh_nodes: self
                .bvh
                .as_ref()
                .map(TriangleBvh::to_gpu_nodes)
                .unwrap_or_default(),
        }
    }
}
