//! Canvas data model - cells, the sparse pixel buffer, stamps, persistence

mod buffer;
mod cell;
pub mod persistence;
pub mod stamp;

pub use buffer::PixelBuffer;
pub use cell::{Cell, Material, Rgba, DEFAULT_CELL_SIZE, GRID_HEIGHT, GRID_WIDTH};
pub use persistence::PersistenceError;
pub use stamp::LineDirection;
