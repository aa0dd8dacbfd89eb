use std::collections::HashMap;

use bevy::prelude::*;

use scoreboard_constants::category::{
    CATEGORY_MAP, DEFAULT_CATEGORY_COLOUR, SOLVE_GLOW_COLOUR, ShapeKind, category_colour,
    category_shape,
};
use scoreboard_constants::layout::MAX_TEAM_NODES;

use super::layout::team_hue;
use crate::constants::render_settings::*;

/// Mesh for a category shape, all roughly three units across.
pub fn shape_mesh(kind: ShapeKind) -> Mesh {
    match kind {
        ShapeKind::Box => Cuboid::new(2.0, 2.0, 2.0).into(),
        ShapeKind::Cone => Cone {
            radius: 1.5,
            height: 3.0,
        }
        .into(),
        ShapeKind::Sphere => Sphere::new(1.5).mesh().uv(16, 16),
        ShapeKind::Cylinder => Cylinder::new(1.0, 3.0).mesh().resolution(8).build(),
        // Four sectors and two stacks make an octahedron.
        ShapeKind::Octahedron => Sphere::new(1.5).mesh().uv(4, 2),
        ShapeKind::Torus => Torus::new(0.6, 1.5).into(),
        ShapeKind::Tetrahedron => Mesh::from(Tetrahedron::default()).scaled_by(Vec3::splat(1.7)),
    }
}

/// Half extents of the pick box for a shape.
pub fn shape_extent(kind: ShapeKind) -> Vec3 {
    match kind {
        ShapeKind::Box => Vec3::splat(1.0),
        ShapeKind::Cone | ShapeKind::Cylinder => Vec3::new(1.5, 1.5, 1.5),
        ShapeKind::Torus => Vec3::new(1.5, 0.5, 1.5),
        ShapeKind::Sphere | ShapeKind::Octahedron | ShapeKind::Tetrahedron => Vec3::splat(1.5),
    }
}

pub fn node_material(colour: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: colour.with_alpha(NODE_OPACITY),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 0.3,
        reflectance: 0.6,
        ..default()
    }
}

pub fn glow_material(colour: Color) -> StandardMaterial {
    StandardMaterial {
        base_color: colour.with_alpha(GLOW_OPACITY),
        alpha_mode: AlphaMode::Blend,
        unlit: true,
        ..default()
    }
}

#[derive(Clone)]
pub struct CategoryStyle {
    pub shape: ShapeKind,
    pub mesh: Handle<Mesh>,
    pub body: Handle<StandardMaterial>,
    pub glow: Handle<StandardMaterial>,
}

/// Shared meshes and materials, created once and reused by every node.
#[derive(Resource)]
pub struct NodeAssets {
    meshes: HashMap<ShapeKind, Handle<Mesh>>,
    materials: HashMap<u32, (Handle<StandardMaterial>, Handle<StandardMaterial>)>,
    team_mesh: Handle<Mesh>,
    team_materials: Vec<Handle<StandardMaterial>>,
    solve_glow_mesh: Handle<Mesh>,
    solve_glow_material: Handle<StandardMaterial>,
}

impl NodeAssets {
    pub fn create(
        meshes: &mut Assets<Mesh>,
        materials: &mut Assets<StandardMaterial>,
    ) -> Self {
        let shape_handles = [
            ShapeKind::Box,
            ShapeKind::Cone,
            ShapeKind::Sphere,
            ShapeKind::Cylinder,
            ShapeKind::Octahedron,
            ShapeKind::Torus,
            ShapeKind::Tetrahedron,
        ]
        .into_iter()
        .map(|kind| (kind, meshes.add(shape_mesh(kind))))
        .collect();

        let colour_handles = CATEGORY_MAP
            .iter()
            .map(|style| style.colour)
            .chain([DEFAULT_CATEGORY_COLOUR])
            .map(|colour| {
                let body = materials.add(node_material(hex_colour(colour)));
                let glow = materials.add(glow_material(hex_colour(colour)));
                (colour, (body, glow))
            })
            .collect();

        let team_materials = (0..MAX_TEAM_NODES)
            .map(|index| materials.add(node_material(Color::hsl(team_hue(index), 0.7, 0.6))))
            .collect();

        Self {
            meshes: shape_handles,
            materials: colour_handles,
            team_mesh: meshes.add(Sphere::new(TEAM_NODE_RADIUS).mesh().uv(16, 16)),
            team_materials,
            solve_glow_mesh: meshes.add(Sphere::new(SOLVE_GLOW_RADIUS).mesh().uv(24, 16)),
            solve_glow_material: materials.add(StandardMaterial {
                base_color: hex_colour(SOLVE_GLOW_COLOUR).with_alpha(SOLVE_GLOW_OPACITY),
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                ..default()
            }),
        }
    }

    pub fn category(&self, category: &str) -> CategoryStyle {
        let shape = category_shape(category);
        let colour = category_colour(category);
        let (body, glow) = self
            .materials
            .get(&colour)
            .or_else(|| self.materials.get(&DEFAULT_CATEGORY_COLOUR))
            .cloned()
            .unwrap_or_default();
        CategoryStyle {
            shape,
            mesh: self.meshes.get(&shape).cloned().unwrap_or_default(),
            body,
            glow,
        }
    }

    pub fn team(&self, index: usize) -> (Handle<Mesh>, Handle<StandardMaterial>) {
        let material = self
            .team_materials
            .get(index % self.team_materials.len().max(1))
            .cloned()
            .unwrap_or_default();
        (self.team_mesh.clone(), material)
    }

    pub fn solve_glow(&self) -> (Handle<Mesh>, Handle<StandardMaterial>) {
        (self.solve_glow_mesh.clone(), self.solve_glow_material.clone())
    }
}

pub fn setup_node_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(NodeAssets::create(&mut meshes, &mut materials));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_share_cached_handles() {
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<StandardMaterial>::default();
        let assets = NodeAssets::create(&mut meshes, &mut materials);

        let web = assets.category("web");
        let web_upper = assets.category("WEB");
        let crypto = assets.category("crypto");
        assert_eq!(web.shape, ShapeKind::Box);
        assert_eq!(crypto.shape, ShapeKind::Cone);
        assert_eq!(web.body, web_upper.body);
        assert_ne!(web.body, crypto.body);
        assert_ne!(web.mesh, crypto.mesh);
    }

    #[test]
    fn category_materials_use_the_palette() {
        let mut meshes = Assets::<Mesh>::default();
        let mut materials = Assets::<StandardMaterial>::default();
        let assets = NodeAssets::create(&mut meshes, &mut materials);

        let crypto = materials.get(&assets.category("crypto").body).unwrap();
        assert_eq!(crypto.base_color, Color::srgb_u8(0x58, 0x56, 0xD6).with_alpha(NODE_OPACITY));

        let unknown = assets.category("osint");
        assert_eq!(unknown.shape, ShapeKind::Tetrahedron);
        assert_eq!(unknown.body, assets.category("web").body);
    }
}
