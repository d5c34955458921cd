//! Project save/load - a whole session persisted to a directory
//!
//! Layout: `project.meta` (RON) next to `frames/frame_N.bin`, one per frame
//! slot, each bincode-encoded and lz4-compressed. Frame files are written
//! atomically (temp file, then rename).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::{Session, FRAME_COUNT, MAX_ZOOM, MIN_ZOOM};
use crate::canvas::PixelBuffer;

/// Bump when the on-disk project layout changes
pub const PROJECT_FORMAT_VERSION: u32 = 1;

/// Project metadata stored in `project.meta` (RON format)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub version: u32,
    pub grid_width: u32,
    pub grid_height: u32,
    pub zoom: u8,
    pub active_frame: usize,
}

/// Save every frame and the session metadata into `dir`
pub fn save_project(session: &Session, dir: impl AsRef<Path>) -> Result<()> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir.join("frames"))
        .context("Failed to create project directories")?;

    let meta = ProjectMetadata {
        version: PROJECT_FORMAT_VERSION,
        grid_width: session.active_frame().width(),
        grid_height: session.active_frame().height(),
        zoom: session.zoom(),
        active_frame: session.active_index(),
    };
    let serialized = ron::ser::to_string_pretty(&meta, Default::default())
        .context("Failed to serialize project metadata")?;
    std::fs::write(dir.join("project.meta"), serialized)
        .context("Failed to write project metadata")?;

    for (index, frame) in session.frames().iter().enumerate() {
        let path = frame_path(dir, index);
        let serialized =
            bincode_next::serde::encode_to_vec(frame, bincode_next::config::standard())
                .context("Failed to serialize frame")?;
        let compressed = lz4_flex::compress_prepend_size(&serialized);

        // Atomic write: write to temp file, then rename
        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, compressed).context("Failed to write frame temp file")?;
        std::fs::rename(temp_path, &path).context("Failed to rename frame file")?;
    }

    log::info!(
        "saved project ({} frames, {} cells active) to {:?}",
        session.frames().len(),
        session.active_frame().len(),
        dir
    );
    Ok(())
}

/// Load a session from a project directory. Missing frame files come back
/// as empty frames; a missing or unreadable `project.meta` is an error.
pub fn load_project(dir: impl AsRef<Path>) -> Result<Session> {
    let dir = dir.as_ref();

    let contents = std::fs::read_to_string(dir.join("project.meta"))
        .context("Failed to read project metadata")?;
    let meta: ProjectMetadata =
        ron::from_str(&contents).context("Failed to parse project metadata")?;
    if meta.version != PROJECT_FORMAT_VERSION {
        anyhow::bail!(
            "unsupported project format version {} (expected {})",
            meta.version,
            PROJECT_FORMAT_VERSION
        );
    }

    let mut session = Session::new();
    session.zoom = meta.zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    session.active = meta.active_frame.min(FRAME_COUNT - 1);

    for index in 0..FRAME_COUNT {
        let path = frame_path(dir, index);
        if !path.exists() {
            log::debug!("frame {} missing from {:?}, leaving empty", index, dir);
            continue;
        }
        session.frames[index] = load_frame(&path)
            .with_context(|| format!("Failed to load frame {}", index))?;
    }

    log::info!("loaded project from {:?}", dir);
    Ok(session)
}

fn load_frame(path: &Path) -> Result<PixelBuffer> {
    let compressed = std::fs::read(path).context("Failed to read frame file")?;
    let serialized = lz4_flex::decompress_size_prepended(&compressed)
        .context("Failed to decompress frame")?;
    let (mut frame, _): (PixelBuffer, usize) =
        bincode_next::serde::decode_from_slice(&serialized, bincode_next::config::standard())
            .map_err(|e| anyhow::anyhow!("Failed to deserialize frame: {:?}", e))?;
    frame.rebuild_index();
    Ok(frame)
}

fn frame_path(dir: &Path, index: usize) -> PathBuf {
    dir.join("frames").join(format!("frame_{}.bin", index))
}
