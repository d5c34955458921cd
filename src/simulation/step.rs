//! Cellular automaton tick - gravity, lateral flow, and reactions
//!
//! One call to [`step`] advances a buffer by a single discrete tick. All
//! occupancy and material decisions read a pre-tick snapshot of the buffer;
//! mutations land on the live buffer. Cells are visited in insertion order,
//! so a tick is fully deterministic: no randomized tie-breaking, no
//! dependence on storage layout beyond the insertion sequence itself.

use crate::canvas::{Material, PixelBuffer};

/// Counters for one tick, reported at debug level
#[derive(Debug, Default)]
struct TickStats {
    moved: u32,
    converted: u32,
    decayed: u32,
}

/// Advance the buffer by one discrete tick.
///
/// Per cell: the bottom row is immobile; anything with a free cell below
/// falls; otherwise reactions with the below neighbor fire first and the
/// cell follows its (possibly just-changed) material's lateral rule. A move
/// whose live destination filled up earlier in the same tick is skipped -
/// the cell stays put for this tick.
pub fn step(buffer: &mut PixelBuffer) {
    if buffer.is_empty() {
        return;
    }

    let snapshot = buffer.clone();
    let width = snapshot.width();
    let height = snapshot.height();
    let mut stats = TickStats::default();

    for cell in snapshot.cells() {
        let (col, row) = (cell.col, cell.row);

        // Bottom row is immobile for this tick
        if row + 1 >= height {
            continue;
        }

        // Free fall when nothing blocks below, any material
        if !snapshot.is_occupied(col, row + 1) {
            if buffer.move_cell(col, row, col, row + 1) {
                stats.moved += 1;
            }
            continue;
        }

        let Some(below) = snapshot.get(col, row + 1).map(|c| c.material) else {
            continue;
        };
        let Some(current) = buffer.get(col, row).map(|c| c.material) else {
            continue;
        };

        apply_reactions(buffer, col, row, current, below, &mut stats);

        // A converted cell follows its new material's rule in the same visit
        let Some(current) = buffer.get(col, row).map(|c| c.material) else {
            continue;
        };
        match current {
            Material::Sand => update_sand(buffer, &snapshot, col, row, width, &mut stats),
            Material::Water => update_water(buffer, &snapshot, col, row, width, &mut stats),
            Material::Fire => update_fire(buffer, &snapshot, col, row, width, &mut stats),
        }
    }

    log::debug!(
        "tick: {} moved, {} converted, {} decayed, {} cells live",
        stats.moved,
        stats.converted,
        stats.decayed,
        buffer.len()
    );
}

/// Inter-material reactions between a blocked cell and its below neighbor.
/// The neighbor's material is the pre-tick one; the mutation targets
/// whatever currently occupies the coordinate (a no-op if it moved away).
fn apply_reactions(
    buffer: &mut PixelBuffer,
    col: u32,
    row: u32,
    current: Material,
    below: Material,
    stats: &mut TickStats,
) {
    match (current, below) {
        // Sand sinks through water
        (Material::Sand, Material::Water) => {
            if let Some(neighbor) = buffer.get_mut(col, row + 1) {
                neighbor.material = Material::Sand;
                stats.converted += 1;
            }
        }
        // Fire spreads into burnable neighbors
        (Material::Fire, Material::Sand) => {
            if let Some(neighbor) = buffer.get_mut(col, row + 1) {
                neighbor.material = Material::Fire;
                stats.converted += 1;
            }
        }
        // Fire resting on water is quenched to ash
        (Material::Fire, Material::Water) => {
            if let Some(this) = buffer.get_mut(col, row) {
                this.material = Material::Sand;
                stats.converted += 1;
            }
        }
        // Water resting on fire boils away to ash
        (Material::Water, Material::Fire) => {
            if let Some(this) = buffer.get_mut(col, row) {
                this.material = Material::Sand;
                stats.converted += 1;
            }
        }
        _ => {}
    }
}

/// Blocked sand slides toward a free diagonal, left first
fn update_sand(
    buffer: &mut PixelBuffer,
    snapshot: &PixelBuffer,
    col: u32,
    row: u32,
    width: u32,
    stats: &mut TickStats,
) {
    if col > 0 && !snapshot.is_occupied(col - 1, row + 1) {
        if buffer.move_cell(col, row, col - 1, row) {
            stats.moved += 1;
        }
    } else if col + 1 < width && !snapshot.is_occupied(col + 1, row + 1) {
        if buffer.move_cell(col, row, col + 1, row) {
            stats.moved += 1;
        }
    }
}

/// Blocked water spreads horizontally, left first
fn update_water(
    buffer: &mut PixelBuffer,
    snapshot: &PixelBuffer,
    col: u32,
    row: u32,
    width: u32,
    stats: &mut TickStats,
) {
    if col > 0 && !snapshot.is_occupied(col - 1, row) {
        if buffer.move_cell(col, row, col - 1, row) {
            stats.moved += 1;
        }
    } else if col + 1 < width && !snapshot.is_occupied(col + 1, row) {
        if buffer.move_cell(col, row, col + 1, row) {
            stats.moved += 1;
        }
    }
}

/// Blocked fire climbs the escape ladder: free left diagonal, free right
/// diagonal, straight up, then either horizontal side. Fire with no escape
/// route burns out and is removed - finite fuel keeps fire transient.
fn update_fire(
    buffer: &mut PixelBuffer,
    snapshot: &PixelBuffer,
    col: u32,
    row: u32,
    width: u32,
    stats: &mut TickStats,
) {
    let escape = if col > 0 && !snapshot.is_occupied(col - 1, row + 1) {
        Some((col - 1, row))
    } else if col + 1 < width && !snapshot.is_occupied(col + 1, row + 1) {
        Some((col + 1, row))
    } else if row > 0 && !snapshot.is_occupied(col, row - 1) {
        Some((col, row - 1))
    } else if col > 0 && !snapshot.is_occupied(col - 1, row) {
        Some((col - 1, row))
    } else if col + 1 < width && !snapshot.is_occupied(col + 1, row) {
        Some((col + 1, row))
    } else {
        None
    };

    match escape {
        Some((new_col, new_row)) => {
            if buffer.move_cell(col, row, new_col, new_row) {
                stats.moved += 1;
            }
        }
        None => {
            buffer.remove_at(col, row);
            stats.decayed += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Cell;

    fn cell(col: u32, row: u32, material: Material) -> Cell {
        Cell::new(col, row, material)
    }

    #[test]
    fn test_lone_cell_falls_to_the_bottom() {
        let mut buffer = PixelBuffer::new();
        buffer.add(cell(5, 0, Material::Water));
        let bottom = buffer.height() - 1;

        for _ in 0..bottom {
            step(&mut buffer);
        }

        assert_eq!(buffer.len(), 1);
        assert!(buffer.is_occupied(5, bottom));
    }

    #[test]
    fn test_bottom_row_is_immobile() {
        let mut buffer = PixelBuffer::new();
        let bottom = buffer.height() - 1;
        buffer.add(cell(5, bottom, Material::Sand));

        step(&mut buffer);

        assert!(buffer.is_occupied(5, bottom));
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_sand_sinks_through_water() {
        let mut buffer = PixelBuffer::new();
        buffer.add(cell(5, 0, Material::Sand));
        buffer.add(cell(5, 1, Material::Water));

        step(&mut buffer);

        // The water was converted in place, then fell as sand
        assert_eq!(buffer.len(), 2);
        assert!(buffer.iter().all(|c| c.material == Material::Sand));
        // The original sand slid toward the free left diagonal
        assert!(buffer.is_occupied(4, 0));
        assert!(buffer.is_occupied(5, 2));
    }

    #[test]
    fn test_sand_slides_left_before_right() {
        let mut buffer = PixelBuffer::new();
        let bottom = buffer.height() - 1;
        buffer.add(cell(5, bottom, Material::Sand));
        buffer.add(cell(5, bottom - 1, Material::Sand));

        step(&mut buffer);

        assert!(buffer.is_occupied(4, bottom - 1));
        assert!(buffer.is_occupied(5, bottom));
    }

    #[test]
    fn test_sand_slides_right_when_left_diagonal_is_taken() {
        let mut buffer = PixelBuffer::new();
        let bottom = buffer.height() - 1;
        buffer.add(cell(4, bottom, Material::Sand));
        buffer.add(cell(5, bottom, Material::Sand));
        buffer.add(cell(5, bottom - 1, Material::Sand));

        step(&mut buffer);

        assert!(buffer.is_occupied(6, bottom - 1));
    }

    #[test]
    fn test_water_spreads_without_wrapping_at_the_left_edge() {
        let mut buffer = PixelBuffer::new();
        let bottom = buffer.height() - 1;
        buffer.add(cell(0, bottom, Material::Water));
        buffer.add(cell(0, bottom - 1, Material::Water));

        step(&mut buffer);

        // No left neighbor exists at col 0; the only legal spread is right
        assert!(buffer.is_occupied(1, bottom - 1));
        for c in buffer.iter() {
            assert!(c.col < buffer.width());
        }
    }

    #[test]
    fn test_blocked_water_stays_put() {
        let mut buffer = PixelBuffer::new();
        let bottom = buffer.height() - 1;
        buffer.add(cell(5, bottom - 1, Material::Water));
        buffer.add(cell(5, bottom, Material::Water));
        buffer.add(cell(4, bottom - 1, Material::Water));
        buffer.add(cell(6, bottom - 1, Material::Water));
        buffer.add(cell(4, bottom, Material::Water));
        buffer.add(cell(6, bottom, Material::Water));

        step(&mut buffer);

        assert!(buffer.is_occupied(5, bottom - 1));
    }

    #[test]
    fn test_live_collision_resolves_first_come() {
        let mut buffer = PixelBuffer::new();
        let bottom = buffer.height() - 1;
        // Wall at (3, b-1) forces the first spreader right; both spreaders
        // then want (5, b-1)
        buffer.add(cell(3, bottom - 1, Material::Water));
        buffer.add(cell(4, bottom, Material::Water));
        buffer.add(cell(6, bottom, Material::Water));
        buffer.add(cell(4, bottom - 1, Material::Water));
        buffer.add(cell(6, bottom - 1, Material::Water));

        step(&mut buffer);

        // First spreader won the hole; the second stayed put
        assert!(buffer.is_occupied(5, bottom - 1));
        assert!(buffer.is_occupied(6, bottom - 1));
    }

    #[test]
    fn test_fire_decays_when_fully_enclosed() {
        let mut buffer = PixelBuffer::new();
        // The trapped fire goes in first so it is visited first
        buffer.add(cell(5, 5, Material::Fire));
        for (col, row) in [(5, 6), (4, 6), (6, 6), (5, 4), (4, 5), (6, 5)] {
            buffer.add(cell(col, row, Material::Fire));
        }
        let before = buffer.len();

        step(&mut buffer);

        assert!(!buffer.is_occupied(5, 5));
        assert_eq!(buffer.len(), before - 1);
    }

    #[test]
    fn test_blocked_fire_escapes_upward() {
        let mut buffer = PixelBuffer::new();
        let bottom = buffer.height() - 1;
        buffer.add(cell(5, bottom - 1, Material::Fire));
        for (col, row) in [(5, bottom), (4, bottom), (6, bottom)] {
            buffer.add(cell(col, row, Material::Fire));
        }

        step(&mut buffer);

        // Diagonals blocked, above free: the fire moved up instead of dying
        assert!(buffer.is_occupied(5, bottom - 2));
        assert_eq!(buffer.get(5, bottom - 2).unwrap().material, Material::Fire);
    }

    #[test]
    fn test_fire_is_quenched_by_water_below() {
        let mut buffer = PixelBuffer::new();
        buffer.add(cell(5, 5, Material::Fire));
        buffer.add(cell(5, 6, Material::Water));

        step(&mut buffer);

        assert_eq!(buffer.len(), 2);
        assert!(buffer.iter().all(|c| c.material != Material::Fire));
        assert_eq!(buffer.iter().filter(|c| c.material == Material::Sand).count(), 1);
    }

    #[test]
    fn test_water_over_fire_turns_to_ash() {
        let mut buffer = PixelBuffer::new();
        buffer.add(cell(5, 5, Material::Water));
        buffer.add(cell(5, 6, Material::Fire));

        step(&mut buffer);

        assert!(buffer.iter().any(|c| c.material == Material::Sand));
        assert!(buffer.iter().all(|c| c.material != Material::Water));
    }

    #[test]
    fn test_fire_ignites_sand_below() {
        let mut buffer = PixelBuffer::new();
        buffer.add(cell(5, 5, Material::Fire));
        buffer.add(cell(5, 6, Material::Sand));

        step(&mut buffer);

        assert_eq!(buffer.len(), 2);
        assert!(buffer.iter().all(|c| c.material == Material::Fire));
    }

    #[test]
    fn test_tick_is_deterministic() {
        let build = || {
            let mut buffer = PixelBuffer::new();
            for i in 0..30 {
                buffer.add(cell(i % 10 + 20, i % 7, Material::ALL[(i % 3) as usize]));
            }
            buffer
        };

        let mut a = build();
        let mut b = build();
        for _ in 0..50 {
            step(&mut a);
            step(&mut b);
        }

        assert_eq!(a.cells(), b.cells());
    }
}
