use anyhow::{Context, Result};
use glam::{EulerRot, Quat, Vec3};
use std::path::Path;

use crate::mesh::MeshData;
use crate::node::{Node, Transform};

/// Loads a glTF file into a scene-graph node tree.
///
/// Fails when the file cannot be read or contains no geometry; the caller
/// is expected to fall back to placeholder content rather than propagate.
pub fn load_node(path: impl AsRef<Path>) -> Result<Node> {
    let path = path.as_ref();
    log::info!("loading glTF model {:?}", path);

    let (document, buffers, _images) =
        gltf::import(path).with_context(|| format!("failed to load glTF file {:?}", path))?;

    let mut root = Node::empty();
    for scene in document.scenes() {
        for node in scene.nodes() {
            root.add_child(convert_node(&node, &buffers));
        }
    }

    if root.bounds().is_none() {
        anyhow::bail!("no geometry found in {:?}", path);
    }

    Ok(root)
}

/// Recursively converts a glTF node, keeping the local transform hierarchy.
fn convert_node(node: &gltf::Node, buffers: &[gltf::buffer::Data]) -> Node {
    let (translation, rotation, scale) = node.transform().decomposed();
    let (rx, ry, rz) = Quat::from_array(rotation).to_euler(EulerRot::XYZ);

    let mut out = Node::empty();
    out.transform = Transform {
        translation: Vec3::from_array(translation),
        rotation: Vec3::new(rx, ry, rz),
        scale: Vec3::from_array(scale),
    };

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if let Some(data) = convert_primitive(&primitive, buffers) {
                out.add_child(Node::with_mesh(data));
            }
        }
    }

    for child in node.children() {
        out.add_child(convert_node(&child, buffers));
    }

    out
}

fn convert_primitive(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
) -> Option<MeshData> {
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions: Vec<Vec3> = reader.read_positions()?.map(Vec3::from_array).collect();
    if positions.is_empty() {
        return None;
    }

    let normals: Vec<Vec3> = match reader.read_normals() {
        Some(iter) => iter.map(Vec3::from_array).collect(),
        None => vec![Vec3::Y; positions.len()],
    };

    let indices: Vec<u32> = match reader.read_indices() {
        Some(indices) => indices.into_u32().collect(),
        None => (0..positions.len() as u32).collect(),
    };

    let base = primitive
        .material()
        .pbr_metallic_roughness()
        .base_color_factor();

    Some(MeshData::new(
        positions,
        normals,
        indices,
        [base[0], base[1], base[2]],
    ))
}
