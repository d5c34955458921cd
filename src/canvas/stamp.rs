//! Brush stamp shapes - batch add/remove relative to an origin cell
//!
//! Every stamp enumerates a deterministic set of signed offsets around the
//! origin and either paints (`add`) or erases (`remove_at`) each one.
//! Offsets that land outside the grid are silently dropped - brushes
//! routinely hang over the canvas edge.

use glam::IVec2;

use super::buffer::PixelBuffer;
use super::cell::Cell;

/// Direction for line stamps
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineDirection {
    Right,
    Down,
    Left,
    Up,
}

impl LineDirection {
    /// All four ray directions, for cross-shaped brushes
    pub const ALL: [LineDirection; 4] = [
        LineDirection::Right,
        LineDirection::Down,
        LineDirection::Left,
        LineDirection::Up,
    ];

    fn delta(self) -> IVec2 {
        match self {
            LineDirection::Right => IVec2::new(1, 0),
            LineDirection::Down => IVec2::new(0, 1),
            LineDirection::Left => IVec2::new(-1, 0),
            LineDirection::Up => IVec2::new(0, -1),
        }
    }
}

impl PixelBuffer {
    /// Paint or erase one offset relative to the origin cell
    fn stamp_at(&mut self, origin: Cell, offset: IVec2, erase: bool) {
        let pos = IVec2::new(origin.col as i32, origin.row as i32) + offset;
        if pos.x < 0 || pos.y < 0 {
            return;
        }
        let (col, row) = (pos.x as u32, pos.y as u32);
        if erase {
            self.remove_at(col, row);
        } else {
            self.add(Cell { col, row, ..origin });
        }
    }

    /// Stamp a ray of `length` cells from the origin
    pub fn add_line(&mut self, origin: Cell, length: u32, direction: LineDirection, erase: bool) {
        let delta = direction.delta();
        for i in 0..length as i32 {
            self.stamp_at(origin, delta * i, erase);
        }
    }

    /// Stamp a filled `width x height` rectangle centered on the origin
    /// (integer-division center, matching the classic brush feel)
    pub fn add_rect(&mut self, origin: Cell, width: u32, height: u32, erase: bool) {
        let half = IVec2::new((width / 2) as i32, (height / 2) as i32);
        for i in 0..width as i32 {
            for j in 0..height as i32 {
                self.stamp_at(origin, IVec2::new(i, j) - half, erase);
            }
        }
    }

    /// Stamp only the perimeter of a `width x height` rectangle centered on
    /// the origin
    pub fn add_rect_outline(&mut self, origin: Cell, width: u32, height: u32, erase: bool) {
        let half = IVec2::new((width / 2) as i32, (height / 2) as i32);
        // Top and bottom rows
        for i in 0..=width as i32 {
            self.stamp_at(origin, IVec2::new(i - half.x, -half.y), erase);
            self.stamp_at(origin, IVec2::new(i - half.x, half.y), erase);
        }
        // Left and right columns
        for j in 0..height as i32 {
            self.stamp_at(origin, IVec2::new(-half.x, j - half.y), erase);
            self.stamp_at(origin, IVec2::new(half.x, j - half.y), erase);
        }
    }

    /// Stamp a filled disk approximation: the first-quadrant rule
    /// `i*i + j*j <= r*r` over `0..radius`, mirrored into all four
    /// quadrants. The radius is exclusive - this reproduces the classic
    /// brush shape exactly, chunky edges and all.
    pub fn add_circle(&mut self, origin: Cell, radius: u32, erase: bool) {
        let r = radius as i32;
        for i in 0..r {
            for j in 0..r {
                if i * i + j * j <= r * r {
                    self.stamp_at(origin, IVec2::new(i, j), erase);
                    self.stamp_at(origin, IVec2::new(-i, j), erase);
                    self.stamp_at(origin, IVec2::new(i, -j), erase);
                    self.stamp_at(origin, IVec2::new(-i, -j), erase);
                }
            }
        }
    }
}
