use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};

/// Unit tetrahedron corners, scaled by the particle size.
const CORNERS: [Vec3; 4] = [
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
];

const FACES: [[usize; 3]; 4] = [[0, 1, 2], [0, 3, 1], [0, 2, 3], [1, 3, 2]];

/// Append one flat-shaded tetrahedron per centre, all in one mesh so a
/// whole cloud is a single draw.
pub fn tetrahedron_cloud_mesh(centres: &[Vec3], colours: &[[f32; 4]], size: f32) -> Mesh {
    let vertex_count = centres.len() * FACES.len() * 3;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut vertex_colours = Vec::with_capacity(vertex_count);

    for (i, centre) in centres.iter().enumerate() {
        let colour = colours.get(i).copied().unwrap_or([1.0; 4]);
        for face in FACES {
            let [a, b, c] = face.map(|corner| *centre + CORNERS[corner] * size);
            let normal = (b - a).cross(c - a).normalize_or_zero();
            for vertex in [a, b, c] {
                positions.push(vertex.to_array());
                normals.push(normal.to_array());
                vertex_colours.push(colour);
            }
        }
    }

    let indices = (0..positions.len() as u32).collect::<Vec<_>>();

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, vertex_colours);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Positions only, for moving an existing cloud in place.
pub fn tetrahedron_cloud_positions(centres: &[Vec3], size: f32) -> Vec<[f32; 3]> {
    centres
        .iter()
        .flat_map(|centre| {
            FACES.into_iter().flat_map(move |face| {
                face.map(|corner| (*centre + CORNERS[corner] * size).to_array())
            })
        })
        .collect()
}
