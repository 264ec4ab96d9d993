use glam::Vec3;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::math::Aabb;

static NEXT_MESH_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a mesh's vertex data, used by backends to cache GPU buffers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MeshId(u64);

/// CPU-side triangle mesh
#[derive(Clone, Debug)]
pub struct MeshData {
    id: MeshId,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub color: [f32; 3],
}

impl MeshData {
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, indices: Vec<u32>, color: [f32; 3]) -> Self {
        Self {
            id: MeshId(NEXT_MESH_ID.fetch_add(1, Ordering::Relaxed)),
            positions,
            normals,
            indices,
            color,
        }
    }

    pub fn id(&self) -> MeshId {
        self.id
    }

    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }

    /// Axis-aligned cube centered on the origin with the given edge length.
    /// 24 vertices so each face gets a flat normal.
    pub fn cube(edge: f32, color: [f32; 3]) -> Self {
        let h = edge * 0.5;

        let faces: [(Vec3, [Vec3; 4]); 6] = [
            // +X
            (
                Vec3::X,
                [
                    Vec3::new(h, -h, -h),
                    Vec3::new(h, h, -h),
                    Vec3::new(h, h, h),
                    Vec3::new(h, -h, h),
                ],
            ),
            // -X
            (
                Vec3::NEG_X,
                [
                    Vec3::new(-h, -h, h),
                    Vec3::new(-h, h, h),
                    Vec3::new(-h, h, -h),
                    Vec3::new(-h, -h, -h),
                ],
            ),
            // +Y
            (
                Vec3::Y,
                [
                    Vec3::new(-h, h, -h),
                    Vec3::new(-h, h, h),
                    Vec3::new(h, h, h),
                    Vec3::new(h, h, -h),
                ],
            ),
            // -Y
            (
                Vec3::NEG_Y,
                [
                    Vec3::new(-h, -h, h),
                    Vec3::new(-h, -h, -h),
                    Vec3::new(h, -h, -h),
                    Vec3::new(h, -h, h),
                ],
            ),
            // +Z
            (
                Vec3::Z,
                [
                    Vec3::new(-h, -h, h),
                    Vec3::new(h, -h, h),
                    Vec3::new(h, h, h),
                    Vec3::new(-h, h, h),
                ],
            ),
            // -Z
            (
                Vec3::NEG_Z,
                [
                    Vec3::new(h, -h, -h),
                    Vec3::new(-h, -h, -h),
                    Vec3::new(-h, h, -h),
                    Vec3::new(h, h, -h),
                ],
            ),
        ];

        let mut positions = Vec::with_capacity(24);
        let mut normals = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, corners) in faces {
            let base = positions.len() as u32;
            positions.extend_from_slice(&corners);
            normals.extend(std::iter::repeat(normal).take(4));
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self::new(positions, normals, indices, color)
    }
}
