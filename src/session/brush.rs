//! Brush state and shaped painting

use serde::{Deserialize, Serialize};

use crate::canvas::{Cell, LineDirection, Material, PixelBuffer, Rgba};

/// Smallest and largest brush sizes (mouse-wheel limits)
pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 100;

/// Brush stamp shape
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrushShape {
    /// Single cell
    Pencil,
    /// Filled disk approximation
    Circle,
    /// Filled square
    Rect,
    /// Square perimeter only
    RectOutline,
    /// Four rays from the origin, one per direction
    Cross,
}

/// Active painting parameters: shape, size, material, and color
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Brush {
    pub shape: BrushShape,
    pub size: u32,
    pub material: Material,
    pub color: Rgba,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            shape: BrushShape::Circle,
            size: 2,
            material: Material::Water,
            color: Material::Water.default_color(),
        }
    }
}

impl Brush {
    /// Select a material and take over its palette color
    pub fn select_material(&mut self, material: Material) {
        self.material = material;
        self.color = material.default_color();
    }

    pub fn grow(&mut self) {
        if self.size < MAX_BRUSH_SIZE {
            self.size += 1;
        }
    }

    pub fn shrink(&mut self) {
        if self.size > MIN_BRUSH_SIZE {
            self.size -= 1;
        }
    }

    /// Stamp the brush onto the buffer at a grid coordinate. With `erase`
    /// set, the same shape removes instead of painting.
    pub fn apply(&self, buffer: &mut PixelBuffer, col: u32, row: u32, zoom: u8, erase: bool) {
        let origin = Cell {
            col,
            row,
            material: self.material,
            color: self.color,
            size: zoom,
        };
        match self.shape {
            BrushShape::Pencil => {
                if erase {
                    buffer.remove_at(col, row);
                } else {
                    buffer.add(origin);
                }
            }
            BrushShape::Circle => buffer.add_circle(origin, self.size, erase),
            BrushShape::Rect => buffer.add_rect(origin, self.size, self.size, erase),
            BrushShape::RectOutline => {
                buffer.add_rect_outline(origin, self.size, self.size, erase)
            }
            BrushShape::Cross => {
                for direction in LineDirection::ALL {
                    buffer.add_line(origin, self.size, direction, erase);
                }
            }
        }
    }
}
