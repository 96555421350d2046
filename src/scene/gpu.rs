//! Flat records laid out for direct upload into GPU buffers.
//!
//! All fields are 4 bytes wide, so the structs have no padding and the
//! byte size of each record matches the stride the ray tracing kernel expects.

use bytemuck::{Pod, Zeroable};

use crate::geometry::{Color, WorldBox};

use super::{Cube, MeshInstance, Sphere};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuSphere {
    pub position: [f32; 3],
    pub radius: f32,
    pub albedo: [f32; 3],
    pub specular: [f32; 3],
    pub smoothness: f32,
    pub emission: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuCube {
    pub min: [f32; 3],
    pub max: [f32; 3],
    pub albedo: [f32; 3],
    pub specular: [f32; 3],
    pub smoothness: f32,
    pub emission: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuMeshObject {
    /// Column major
    pub local_to_world: [[f32; 4]; 4],
    pub indices_offset: u32,
    pub indices_count: u32,
}

/// One node of the flattened hierarchy.
///
/// Nodes are stored in pre-order: the left child of an inner node is the record
/// right after it and `child_or_triangle_index` points at the right child.
/// For leaves it is the triangle index, the triangle's vertex indices are at
/// `3 * index .. 3 * index + 3` in the index buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuBvhNode {
    pub min: [f32; 3],
    pub max: [f32; 3],
    pub child_or_triangle_index: u32,
    /// 1 for leaves, 0 for inner nodes
    pub is_leaf: u32,
}

impl GpuBvhNode {
    pub fn bounds(&self) -> WorldBox {
        WorldBox::new(self.min.into(), self.max.into())
    }

    pub fn is_leaf(&self) -> bool {
        self.is_leaf != 0
    }
}

fn color(c: &Color) -> [f32; 3] {
    (*c).into()
}

impl From<&Sphere> for GpuSphere {
    fn from(sphere: &Sphere) -> Self {
        let material = &sphere.material;
        GpuSphere {
            position: sphere.center().into(),
            radius: sphere.radius(),
            albedo: color(&material.albedo),
            specular: color(&material.specular),
            smoothness: material.smoothness,
            emission: color(&material.emission),
        }
    }
}

impl From<&Cube> for GpuCube {
    fn from(cube: &Cube) -> Self {
        let material = &cube.material;
        GpuCube {
            min: cube.bounds.min.into(),
            max: cube.bounds.max.into(),
            albedo: color(&material.albedo),
            specular: color(&material.specular),
            smoothness: material.smoothness,
            emission: color(&material.emission),
        }
    }
}

impl From<&MeshInstance> for GpuMeshObject {
    fn from(instance: &MeshInstance) -> Self {
        GpuMeshObject {
            local_to_world: instance.local_to_world.into(),
            indices_offset: instance.indices.start as u32,
            indices_count: instance.indices.len() as u32,
        }
    }
}

/// Everything the ray tracing kernel reads, as contiguous arrays.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GpuSceneData {
    pub spheres: Vec<GpuSphere>,
    pub cubes: Vec<GpuCube>,
    pub mesh_objects: Vec<GpuMeshObject>,
    /// World space positions
    pub vertices: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub bvh_nodes: Vec<GpuBvhNode>,
}

impl GpuSceneData {
    pub fn spheres_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.spheres)
    }

    pub fn cubes_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cubes)
    }

    pub fn mesh_objects_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.mesh_objects)
    }

    pub fn vertices_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn indices_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn bvh_nodes_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.bvh_nodes)
    }

    pub fn total_bytes(&self) -> usize {
        self.spheres_bytes().len()
            + self.cubes_bytes().len()
            + self.mesh_objects_bytes().len()
            + self.vertices_bytes().len()
            + self.indices_bytes().len()
            + self.bvh_nodes_bytes().len()
    }
}
