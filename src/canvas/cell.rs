//! Cell and material types - the atomic simulation unit

use serde::{Deserialize, Serialize};

/// Default canvas width in grid cells
pub const GRID_WIDTH: u32 = 100;

/// Default canvas height in grid cells
pub const GRID_HEIGHT: u32 = 62;

/// Default on-screen cell edge length in pixels
pub const DEFAULT_CELL_SIZE: u8 = 10;

/// RGBA color, 8 bits per channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// Material type - governs the per-tick movement and reaction rule
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Water,
    Sand,
    Fire,
}

impl Material {
    /// All materials, in wire-tag order
    pub const ALL: [Material; 3] = [Material::Water, Material::Sand, Material::Fire];

    /// Stable tag used by the `.psb` wire format
    pub const fn tag(self) -> u32 {
        match self {
            Material::Water => 0,
            Material::Sand => 1,
            Material::Fire => 2,
        }
    }

    /// Inverse of [`Material::tag`]; `None` for unknown tags
    pub const fn from_tag(tag: u32) -> Option<Material> {
        match tag {
            0 => Some(Material::Water),
            1 => Some(Material::Sand),
            2 => Some(Material::Fire),
            _ => None,
        }
    }

    /// Palette color used when no explicit color is selected
    pub const fn default_color(self) -> Rgba {
        match self {
            Material::Water => Rgba::new(0, 0, 170, 255),
            Material::Sand => Rgba::new(238, 238, 119, 255),
            Material::Fire => Rgba::new(136, 0, 0, 255),
        }
    }
}

/// One simulated particle: grid position, material, color, render size.
///
/// Color is fixed at creation from the active palette selection and stays
/// independent of material afterwards - painting fire-typed cells in
/// arbitrary colors is a feature, not a bug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub col: u32,
    pub row: u32,
    pub material: Material,
    pub color: Rgba,
    pub size: u8,
}

impl Cell {
    /// Create a cell with the material's default palette color
    pub fn new(col: u32, row: u32, material: Material) -> Self {
        Self {
            col,
            row,
            material,
            color: material.default_color(),
            size: DEFAULT_CELL_SIZE,
        }
    }

    /// Create a cell with an explicit color
    pub fn with_color(col: u32, row: u32, material: Material, color: Rgba) -> Self {
        Self {
            col,
            row,
            material,
            color,
            size: DEFAULT_CELL_SIZE,
        }
    }
}
