//! Canvas session - frames, clipboard, brush, zoom, and the tick driver
//!
//! One owned `Session` value holds what the classic pixel tools keep in
//! process-wide globals: the animation frame slots, the clipboard buffer,
//! the active brush, the zoom level, and the simulation-running flag. The
//! GUI layer translates input into calls on this struct and invokes
//! [`Session::tick`] once per frame.

mod brush;
pub mod project;

pub use brush::{Brush, BrushShape, MAX_BRUSH_SIZE, MIN_BRUSH_SIZE};

use crate::canvas::{PixelBuffer, DEFAULT_CELL_SIZE};
use crate::simulation;

/// Number of animation frame slots
pub const FRAME_COUNT: usize = 9;

/// Zoom limits: on-screen cell edge length in pixels
pub const MIN_ZOOM: u8 = 1;
pub const MAX_ZOOM: u8 = 100;

/// One editing session over a stack of animation frames
pub struct Session {
    frames: Vec<PixelBuffer>,
    active: usize,
    clipboard: PixelBuffer,
    pub brush: Brush,
    zoom: u8,
    running: bool,
}

impl Session {
    /// Fresh session: nine empty frames, frame 0 active, simulation paused
    pub fn new() -> Self {
        Self {
            frames: (0..FRAME_COUNT).map(|_| PixelBuffer::new()).collect(),
            active: 0,
            clipboard: PixelBuffer::new(),
            brush: Brush::default(),
            zoom: DEFAULT_CELL_SIZE,
            running: false,
        }
    }

    pub fn frames(&self) -> &[PixelBuffer] {
        &self.frames
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_frame(&self) -> &PixelBuffer {
        &self.frames[self.active]
    }

    pub fn active_frame_mut(&mut self) -> &mut PixelBuffer {
        &mut self.frames[self.active]
    }

    /// Switch the active frame slot; out-of-range indices are ignored.
    /// The session zoom is re-applied to the newly active frame.
    pub fn select_frame(&mut self, index: usize) {
        if index < self.frames.len() {
            self.active = index;
            let zoom = self.zoom;
            self.frames[index].resize_all(zoom);
        }
    }

    pub fn clipboard(&self) -> &PixelBuffer {
        &self.clipboard
    }

    /// Clipboard becomes a copy of the active frame
    pub fn copy_to_clipboard(&mut self) {
        self.clipboard = self.frames[self.active].clone();
    }

    /// Merge the clipboard into the active frame; clipboard cells win
    /// coordinate collisions
    pub fn paste_clipboard(&mut self) {
        let clipboard = self.clipboard.clone();
        self.frames[self.active].merge(&clipboard);
    }

    /// Stamp the current brush onto the active frame
    pub fn paint(&mut self, col: u32, row: u32) {
        let zoom = self.zoom;
        self.brush.apply(&mut self.frames[self.active], col, row, zoom, false);
    }

    /// Erase with the current brush shape
    pub fn erase(&mut self, col: u32, row: u32) {
        let zoom = self.zoom;
        self.brush.apply(&mut self.frames[self.active], col, row, zoom, true);
    }

    /// Erase a single coordinate regardless of brush shape
    pub fn erase_at(&mut self, col: u32, row: u32) {
        self.frames[self.active].remove_at(col, row);
    }

    /// Drop every cell of the active frame
    pub fn clear_active(&mut self) {
        self.frames[self.active].clear();
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Change the zoom level (clamped) and resize the active frame's cells
    pub fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        let zoom = self.zoom;
        self.frames[self.active].resize_all(zoom);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom.saturating_add(1));
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom.saturating_sub(1));
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn toggle_running(&mut self) {
        self.running = !self.running;
    }

    /// Advance the active frame by one tick when the simulation is running.
    /// Returns whether a tick happened.
    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }
        simulation::step(&mut self.frames[self.active]);
        true
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
