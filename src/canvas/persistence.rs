//! Save/load for canvas buffers - raw `.psb` binary and PNG import/export
//!
//! The `.psb` format is a `u32` little-endian cell count followed by one
//! fixed 17-byte record per cell. No magic, no version tag, no checksum -
//! a known limitation kept for compatibility with existing files.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use thiserror::Error;

use super::buffer::PixelBuffer;
use super::cell::{Cell, Material, Rgba};

/// Bytes per `.psb` cell record: col u32, row u32, size u8, material u32,
/// color r/g/b/a
const RECORD_SIZE: usize = 17;

/// Errors surfaced by buffer persistence. A failed load never touches the
/// destination buffer - decoding happens into a fresh one.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o failure: {0}")]
    Io(#[from] io::Error),

    #[error("file ends early: expected {expected} cells, decoded {actual}")]
    Truncated { expected: u32, actual: u32 },

    #[error("unknown material tag {0}")]
    BadMaterialTag(u32),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

fn encode_cell(cell: &Cell) -> [u8; RECORD_SIZE] {
    let mut record = [0u8; RECORD_SIZE];
    record[0..4].copy_from_slice(&cell.col.to_le_bytes());
    record[4..8].copy_from_slice(&cell.row.to_le_bytes());
    record[8] = cell.size;
    record[9..13].copy_from_slice(&cell.material.tag().to_le_bytes());
    record[13] = cell.color.r;
    record[14] = cell.color.g;
    record[15] = cell.color.b;
    record[16] = cell.color.a;
    record
}

fn decode_cell(record: &[u8; RECORD_SIZE]) -> Result<Cell, PersistenceError> {
    let col = u32::from_le_bytes(record[0..4].try_into().unwrap());
    let row = u32::from_le_bytes(record[4..8].try_into().unwrap());
    let size = record[8];
    let tag = u32::from_le_bytes(record[9..13].try_into().unwrap());
    let material = Material::from_tag(tag).ok_or(PersistenceError::BadMaterialTag(tag))?;
    Ok(Cell {
        col,
        row,
        material,
        color: Rgba::new(record[13], record[14], record[15], record[16]),
        size,
    })
}

impl PixelBuffer {
    /// Write the buffer to a `.psb` file, preserving insertion order
    pub fn save_psb(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);

        writer.write_all(&(self.len() as u32).to_le_bytes())?;
        for cell in self.iter() {
            writer.write_all(&encode_cell(cell))?;
        }
        writer.flush()?;

        log::info!("saved {} cells to {:?}", self.len(), path);
        Ok(())
    }

    /// Read a `.psb` file into a fresh buffer with the default grid
    /// dimensions. Records outside the grid are dropped like any other
    /// out-of-bounds insert.
    pub fn load_psb(path: impl AsRef<Path>) -> Result<PixelBuffer, PersistenceError> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);

        let mut count_bytes = [0u8; 4];
        reader.read_exact(&mut count_bytes)?;
        let count = u32::from_le_bytes(count_bytes);

        let mut buffer = PixelBuffer::new();
        let mut dropped = 0u32;
        let mut record = [0u8; RECORD_SIZE];
        for decoded in 0..count {
            reader.read_exact(&mut record).map_err(|e| {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    PersistenceError::Truncated {
                        expected: count,
                        actual: decoded,
                    }
                } else {
                    PersistenceError::Io(e)
                }
            })?;
            let cell = decode_cell(&record)?;
            if cell.col >= buffer.width() || cell.row >= buffer.height() {
                dropped += 1;
            }
            buffer.add(cell);
        }

        if dropped > 0 {
            log::warn!("dropped {} out-of-grid cells while loading {:?}", dropped, path);
        }
        log::info!("loaded {} cells from {:?}", buffer.len(), path);
        Ok(buffer)
    }

    /// Rasterize the buffer to a PNG: each live cell becomes a
    /// `scale x scale` block on a solid white canvas
    pub fn save_png(&self, path: impl AsRef<Path>, scale: u32) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        let scale = scale.max(1);
        let mut img = image::RgbaImage::from_pixel(
            self.width() * scale,
            self.height() * scale,
            image::Rgba([255, 255, 255, 255]),
        );

        for cell in self.iter() {
            let pixel = image::Rgba([cell.color.r, cell.color.g, cell.color.b, cell.color.a]);
            for dy in 0..scale {
                for dx in 0..scale {
                    img.put_pixel(cell.col * scale + dx, cell.row * scale + dy, pixel);
                }
            }
        }

        img.save(path)?;
        log::info!("exported {} cells to {:?} at scale {}", self.len(), path, scale);
        Ok(())
    }

    /// Downsample an arbitrary image into a fresh buffer: one water-typed
    /// cell per sampled pixel, sampling one pixel every `scale` pixels.
    /// Samples landing outside the grid are dropped.
    pub fn load_png(path: impl AsRef<Path>, scale: u32) -> Result<PixelBuffer, PersistenceError> {
        let path = path.as_ref();
        let scale = scale.max(1);
        let img = image::open(path)?.to_rgba8();

        let mut buffer = PixelBuffer::new();
        for y in (0..img.height()).step_by(scale as usize) {
            for x in (0..img.width()).step_by(scale as usize) {
                let pixel = img.get_pixel(x, y);
                buffer.add(Cell::with_color(
                    x / scale,
                    y / scale,
                    Material::Water,
                    Rgba::new(pixel[0], pixel[1], pixel[2], pixel[3]),
                ));
            }
        }

        log::info!("imported {} cells from {:?} at scale {}", buffer.len(), path, scale);
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("sabbia-persistence-{}", name))
    }

    fn cell_map(buffer: &PixelBuffer) -> HashMap<(u32, u32), (Material, Rgba, u8)> {
        buffer
            .iter()
            .map(|c| ((c.col, c.row), (c.material, c.color, c.size)))
            .collect()
    }

    #[test]
    fn test_psb_roundtrip() -> Result<(), PersistenceError> {
        let path = temp_path("roundtrip.psb");

        let mut buffer = PixelBuffer::new();
        buffer.add(Cell::new(0, 0, Material::Water));
        buffer.add(Cell::with_color(5, 7, Material::Fire, Rgba::new(1, 2, 3, 4)));
        let mut big = Cell::new(99, 61, Material::Sand);
        big.size = 42;
        buffer.add(big);

        buffer.save_psb(&path)?;
        let restored = PixelBuffer::load_psb(&path)?;
        std::fs::remove_file(&path).ok();

        assert_eq!(cell_map(&buffer), cell_map(&restored));
        // Straight array serialization also preserves order
        assert_eq!(buffer.cells(), restored.cells());
        Ok(())
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let result = PixelBuffer::load_psb(temp_path("does-not-exist.psb"));
        assert!(matches!(result, Err(PersistenceError::Io(_))));
    }

    #[test]
    fn test_load_truncated_file_is_an_error() -> Result<(), PersistenceError> {
        let path = temp_path("truncated.psb");

        let mut buffer = PixelBuffer::new();
        buffer.add(Cell::new(1, 1, Material::Sand));
        buffer.add(Cell::new(2, 2, Material::Sand));
        buffer.save_psb(&path)?;

        // Chop off the final record
        let bytes = std::fs::read(&path)?;
        std::fs::write(&path, &bytes[..bytes.len() - RECORD_SIZE])?;

        let result = PixelBuffer::load_psb(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(
            result,
            Err(PersistenceError::Truncated { expected: 2, actual: 1 })
        ));
        Ok(())
    }

    #[test]
    fn test_load_bad_material_tag_is_an_error() -> Result<(), PersistenceError> {
        let path = temp_path("bad-tag.psb");

        let mut buffer = PixelBuffer::new();
        buffer.add(Cell::new(1, 1, Material::Fire));
        buffer.save_psb(&path)?;

        // Material tag lives at bytes 9..13 of the first record
        let mut bytes = std::fs::read(&path)?;
        bytes[4 + 9..4 + 13].copy_from_slice(&99u32.to_le_bytes());
        std::fs::write(&path, &bytes)?;

        let result = PixelBuffer::load_psb(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(PersistenceError::BadMaterialTag(99))));
        Ok(())
    }

    #[test]
    fn test_png_export_import_roundtrip() -> Result<(), PersistenceError> {
        let path = temp_path("roundtrip.png");

        let mut buffer = PixelBuffer::new();
        buffer.add(Cell::with_color(3, 4, Material::Sand, Rgba::new(10, 20, 30, 255)));
        buffer.save_png(&path, 4)?;

        let restored = PixelBuffer::load_png(&path, 4)?;
        std::fs::remove_file(&path).ok();

        // Import samples every grid coordinate, background included
        assert_eq!(restored.len() as u32, buffer.width() * buffer.height());
        let cell = restored.get(3, 4).unwrap();
        assert_eq!(cell.color, Rgba::new(10, 20, 30, 255));
        assert_eq!(cell.material, Material::Water);
        assert_eq!(restored.get(0, 0).unwrap().color, Rgba::WHITE);
        Ok(())
    }
}
