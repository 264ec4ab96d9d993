use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::math::Aabb;
use crate::mesh::MeshData;

/// Local transform: translation, XYZ Euler rotation (radians), scale.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Scene-graph node: a transform, optional mesh, and children.
#[derive(Clone, Debug, Default)]
pub struct Node {
    pub transform: Transform,
    pub mesh: Option<MeshData>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_mesh(mesh: MeshData) -> Self {
        Self {
            transform: Transform::IDENTITY,
            mesh: Some(mesh),
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Visit every mesh in the subtree with its accumulated world matrix.
    pub fn visit_meshes<F: FnMut(&MeshData, Mat4)>(&self, f: &mut F) {
        self.visit_inner(Mat4::IDENTITY, f);
    }

    fn visit_inner<F: FnMut(&MeshData, Mat4)>(&self, parent: Mat4, f: &mut F) {
        let world = parent * self.transform.matrix();
        if let Some(mesh) = &self.mesh {
            f(mesh, world);
        }
        for child in &self.children {
            child.visit_inner(world, f);
        }
    }

    /// Bounding box of the subtree, including this node's own transform.
    /// None when the subtree carries no geometry.
    pub fn bounds(&self) -> Option<Aabb> {
        self.bounds_inner(Mat4::IDENTITY)
    }

    fn bounds_inner(&self, parent: Mat4) -> Option<Aabb> {
        let world = parent * self.transform.matrix();
        let mut result: Option<Aabb> = None;

        if let Some(mesh) = &self.mesh {
            let transformed: Vec<Vec3> = mesh
                .positions
                .iter()
                .map(|&p| world.transform_point3(p))
                .collect();
            result = Aabb::from_points(&transformed);
        }

        for child in &self.children {
            if let Some(child_bounds) = child.bounds_inner(world) {
                result = Some(match result {
                    Some(b) => b.union(&child_bounds),
                    None => child_bounds,
                });
            }
        }

        result
    }
}

/// Wrap `content` in a pivot node that re-centers it on its bounding-box
/// centroid and uniformly scales it so the largest extent maps to
/// `reference_size` world units. Content without geometry is returned
/// unchanged.
pub fn normalized(content: Node, reference_size: f32) -> Node {
    let Some(bounds) = content.bounds() else {
        return content;
    };

    let max_extent = bounds.max_extent();
    if max_extent <= f32::EPSILON {
        return content;
    }

    let scale = reference_size / max_extent;
    let pivot_transform = Transform {
        translation: -bounds.center() * scale,
        rotation: Vec3::ZERO,
        scale: Vec3::splat(scale),
    };

    Node {
        transform: pivot_transform,
        mesh: None,
        children: vec![content],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::MeshData;

    fn box_mesh(min: Vec3, max: Vec3) -> MeshData {
        // Bounds only depend on the corner positions
        let positions = vec![min, max, Vec3::new(min.x, max.y, min.z)];
        MeshData::new(positions, vec![Vec3::Y; 3], vec![0, 1, 2], [0.5, 0.5, 0.5])
    }

    #[test]
    fn test_subtree_bounds_include_child_transforms() {
        let mut root = Node::empty();
        let mut child = Node::with_mesh(box_mesh(Vec3::splat(-1.0), Vec3::splat(1.0)));
        child.transform.translation = Vec3::new(10.0, 0.0, 0.0);
        root.add_child(child);

        let bounds = root.bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(9.0, -1.0, -1.0));
        assert_eq!(bounds.max, Vec3::new(11.0, 1.0, 1.0));
    }

    #[test]
    fn test_bounds_none_without_geometry() {
        let mut root = Node::empty();
        root.add_child(Node::empty());
        assert!(root.bounds().is_none());
    }

    #[test]
    fn test_normalized_centers_and_scales() {
        // Bounding box [-1,4] x [0,10] x [-2,2]: centroid (1.5, 5, 0), max extent 10
        let content = Node::with_mesh(box_mesh(
            Vec3::new(-1.0, 0.0, -2.0),
            Vec3::new(4.0, 10.0, 2.0),
        ));
        let wrapped = normalized(content, 5.0);

        assert_eq!(wrapped.transform.scale, Vec3::splat(0.5));
        assert_eq!(wrapped.transform.translation, Vec3::new(-0.75, -2.5, 0.0));

        let bounds = wrapped.bounds().unwrap();
        assert!(bounds.center().length() < 1e-5, "centroid should sit at origin");
        assert!((bounds.max_extent() - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_normalized_leaves_empty_content_alone() {
        let content = Node::empty();
        let wrapped = normalized(content, 5.0);
        assert_eq!(wrapped.transform, Transform::IDENTITY);
        assert!(wrapped.children.is_empty());
    }

    #[test]
    fn test_visit_meshes_accumulates_matrices() {
        let mut root = Node::empty();
        root.transform.translation = Vec3::new(0.0, 2.0, 0.0);
        let mut child = Node::with_mesh(MeshData::cube(1.0, [1.0, 0.0, 0.0]));
        child.transform.translation = Vec3::new(3.0, 0.0, 0.0);
        root.add_child(child);

        let mut visited = Vec::new();
        root.visit_meshes(&mut |_, world| visited.push(world));

        assert_eq!(visited.len(), 1);
        let origin = visited[0].transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(3.0, 2.0, 0.0)).length() < 1e-6);
    }
}
