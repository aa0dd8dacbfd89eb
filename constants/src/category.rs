/// Primitive used for a challenge node, picked by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Box,
    Cone,
    Sphere,
    Cylinder,
    Octahedron,
    Torus,
    Tetrahedron,
}

pub struct CategoryStyle {
    pub name: &'static str,
    /// 0xRRGGBB
    pub colour: u32,
    pub shape: ShapeKind,
}

pub const CATEGORY_MAP: &[CategoryStyle] = &[
    CategoryStyle {
        name: "web",
        colour: 0x007AFF,
        shape: ShapeKind::Box,
    },
    CategoryStyle {
        name: "crypto",
        colour: 0x5856D6,
        shape: ShapeKind::Cone,
    },
    CategoryStyle {
        name: "pwn",
        colour: 0xFF3B30,
        shape: ShapeKind::Sphere,
    },
    CategoryStyle {
        name: "reverse",
        colour: 0x34C759,
        shape: ShapeKind::Cylinder,
    },
    CategoryStyle {
        name: "forensics",
        colour: 0xFF9500,
        shape: ShapeKind::Octahedron,
    },
    CategoryStyle {
        name: "misc",
        colour: 0x8E8E93,
        shape: ShapeKind::Torus,
    },
];

pub const DEFAULT_CATEGORY_COLOUR: u32 = 0x007AFF;
pub const DEFAULT_CATEGORY_SHAPE: ShapeKind = ShapeKind::Tetrahedron;

/// Group name for challenges that arrive without a category.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Colour of the transient glow sphere added on a solve.
pub const SOLVE_GLOW_COLOUR: u32 = 0xFFD700;

fn find_style(category: &str) -> Option<&'static CategoryStyle> {
    CATEGORY_MAP
        .iter()
        .find(|style| style.name.eq_ignore_ascii_case(category.trim()))
}

pub fn category_colour(category: &str) -> u32 {
    find_style(category).map_or(DEFAULT_CATEGORY_COLOUR, |s| s.colour)
}

pub fn category_shape(category: &str) -> ShapeKind {
    find_style(category).map_or(DEFAULT_CATEGORY_SHAPE, |s| s.shape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_categories_have_distinct_shapes() {
        let mut shapes: Vec<ShapeKind> = CATEGORY_MAP.iter().map(|s| s.shape).collect();
        shapes.push(DEFAULT_CATEGORY_SHAPE);
        let count = shapes.len();
        shapes.sort_by_key(|s| *s as u8);
        shapes.dedup();
        assert_eq!(shapes.len(), count);
    }

    #[test]
    fn lookup_ignores_case_and_falls_back() {
        assert_eq!(category_shape("WEB"), ShapeKind::Box);
        assert_eq!(category_shape("Crypto"), ShapeKind::Cone);
        assert_eq!(category_colour("crypto"), 0x5856D6);
        assert_eq!(category_shape("osint"), DEFAULT_CATEGORY_SHAPE);
        assert_eq!(category_colour("osint"), DEFAULT_CATEGORY_COLOUR);
    }
}
