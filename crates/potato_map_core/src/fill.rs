//! Region fill over a single layer
//!
//! The entry point is [`flood_fill`]. It walks 4-connected neighbours with an
//! explicit work-list and a visited mask sized to the grid, so it never
//! recurses and never revisits a cell, whatever the replacement value is.

use crate::{Cell, Layer, LevelData};

/// A single cell rewrite, recorded so callers can undo it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellChange {
    pub x: u32,
    pub y: u32,
    pub before: Cell,
    pub after: Cell,
}

/// Replace the region around `(start_x, start_y)` on `layer` with `replacement`.
///
/// The region is every cell 4-connected to the start through cells with the
/// same fill identity as the start cell (see [`Cell::fill_matches`]). Matched
/// doors are overwritten like any other cell.
///
/// Returns the applied changes in visit order. The result is empty when the
/// start is out of range or already has the replacement's identity.
pub fn flood_fill(
    level: &mut LevelData,
    start_x: i32,
    start_y: i32,
    layer: Layer,
    replacement: Cell,
) -> Vec<CellChange> {
    let grid = level.layer_mut(layer);
    if !grid.in_bounds(start_x, start_y) {
        return Vec::new();
    }

    let target = grid.get(start_x, start_y);
    if target.fill_matches(&replacement) {
        return Vec::new();
    }

    let mut visited = vec![false; (grid.width() * grid.height()) as usize];
    let mut frontier = vec![(start_x, start_y)];
    let mut changes = Vec::new();

    while let Some((x, y)) = frontier.pop() {
        let Some(idx) = grid.index(x, y) else {
            continue;
        };
        if visited[idx] {
            continue;
        }
        visited[idx] = true;

        let current = grid.get(x, y);
        if !current.fill_matches(&target) {
            continue;
        }

        grid.set(x, y, replacement);
        changes.push(CellChange {
            x: x as u32,
            y: y as u32,
            before: current,
            after: replacement,
        });

        frontier.extend([(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)]);
    }

    changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyType;
    use proptest::prelude::*;
    use std::collections::{HashSet, VecDeque};

    #[test]
    fn test_fill_single_isolated_wall() {
        let mut level = LevelData::new();
        level.set_cell(5, 5, Cell::wall(3), Layer::Wall);

        let changes = flood_fill(&mut level, 5, 5, Layer::Wall, Cell::wall(7));

        assert_eq!(changes.len(), 1);
        assert_eq!(level.get_cell(5, 5, Layer::Wall), Cell::wall(7));
        for (x, y) in [(4, 5), (6, 5), (5, 4), (5, 6)] {
            assert_eq!(level.get_cell(x, y, Layer::Wall), Cell::Empty);
        }
    }

    #[test]
    fn test_fill_empty_grid_covers_everything() {
        let mut level = LevelData::new();

        let changes = flood_fill(&mut level, 0, 0, Layer::Floor, Cell::wall(2));

        assert_eq!(changes.len(), 32 * 32);
        assert_eq!(level.wall_count(Layer::Floor), 32 * 32);
        assert_eq!(level.wall_count(Layer::Wall), 0);
    }

    #[test]
    fn test_fill_stops_at_different_texture() {
        let mut level = LevelData::new();
        // Vertical barrier at x = 3
        for y in 0..32 {
            level.set_cell(3, y, Cell::wall(9), Layer::Wall);
        }

        flood_fill(&mut level, 0, 0, Layer::Wall, Cell::wall(1));

        assert_eq!(level.get_cell(2, 31, Layer::Wall), Cell::wall(1));
        assert_eq!(level.get_cell(3, 10, Layer::Wall), Cell::wall(9));
        assert_eq!(level.get_cell(4, 0, Layer::Wall), Cell::Empty);
    }

    #[test]
    fn test_fill_matches_doors_by_texture() {
        let mut level = LevelData::new();
        level.set_cell(0, 0, Cell::wall(4), Layer::Wall);
        level.set_cell(1, 0, Cell::door(4, KeyType::Red), Layer::Wall);
        level.set_cell(2, 0, Cell::wall(4), Layer::Wall);

        let changes = flood_fill(&mut level, 0, 0, Layer::Wall, Cell::wall(6));

        assert_eq!(changes.len(), 3);
        assert_eq!(level.get_cell(1, 0, Layer::Wall), Cell::wall(6));
        assert!(changes
            .iter()
            .any(|c| c.before == Cell::door(4, KeyType::Red) && (c.x, c.y) == (1, 0)));
    }

    #[test]
    fn test_fill_same_identity_is_noop() {
        let mut level = LevelData::new();
        level.set_cell(5, 5, Cell::door(3, KeyType::Blue), Layer::Wall);
        let before = level.clone();

        assert!(flood_fill(&mut level, 5, 5, Layer::Wall, Cell::wall(3)).is_empty());
        assert!(flood_fill(&mut level, 0, 0, Layer::Wall, Cell::Empty).is_empty());
        assert_eq!(level, before);
    }

    #[test]
    fn test_fill_out_of_range_start() {
        let mut level = LevelData::new();
        assert!(flood_fill(&mut level, -1, 0, Layer::Wall, Cell::wall(1)).is_empty());
        assert!(flood_fill(&mut level, 0, 32, Layer::Wall, Cell::wall(1)).is_empty());
        assert_eq!(level, LevelData::new());
    }

    #[test]
    fn test_fill_with_empty_erases_region() {
        let mut level = LevelData::new();
        for x in 0..4 {
            level.set_cell(x, 0, Cell::wall(2), Layer::Floor);
        }
        level.set_cell(4, 0, Cell::wall(3), Layer::Floor);

        let changes = flood_fill(&mut level, 1, 0, Layer::Floor, Cell::Empty);

        assert_eq!(changes.len(), 4);
        assert_eq!(level.wall_count(Layer::Floor), 1);
    }

    /// Cells reachable from `start` through matching cells, computed independently
    fn reachable(level: &LevelData, layer: Layer, start: (i32, i32)) -> HashSet<(i32, i32)> {
        let target = level.get_cell(start.0, start.1, layer);
        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some((x, y)) = queue.pop_front() {
            for n in [(x + 1, y), (x - 1, y), (x, y + 1), (x, y - 1)] {
                if level.in_bounds(n.0, n.1)
                    && level.get_cell(n.0, n.1, layer).fill_matches(&target)
                    && seen.insert(n)
                {
                    queue.push_back(n);
                }
            }
        }
        seen
    }

    fn level_from_codes(codes: &[u8]) -> LevelData {
        let mut level = LevelData::new();
        for (idx, code) in codes.iter().enumerate() {
            let (x, y) = ((idx % 32) as i32, (idx / 32) as i32);
            let cell = match code {
                0 => Cell::Empty,
                1 => Cell::wall(1),
                2 => Cell::door(1, KeyType::Green),
                _ => Cell::wall(2),
            };
            level.set_cell(x, y, cell, Layer::Wall);
        }
        level
    }

    proptest! {
        #[test]
        fn prop_fill_is_contained(
            codes in proptest::collection::vec(0u8..4, 32 * 32),
            start in (0i32..32, 0i32..32),
            texture in 1u32..4,
        ) {
            let mut level = level_from_codes(&codes);
            let before = level.clone();
            let region = reachable(&before, Layer::Wall, start);
            let replacement = Cell::wall(texture);
            let noop = before.get_cell(start.0, start.1, Layer::Wall).fill_matches(&replacement);

            let changes = flood_fill(&mut level, start.0, start.1, Layer::Wall, replacement);

            for y in 0..32 {
                for x in 0..32 {
                    let cell = level.get_cell(x, y, Layer::Wall);
                    if !noop && region.contains(&(x, y)) {
                        prop_assert_eq!(cell, replacement);
                    } else {
                        prop_assert_eq!(cell, before.get_cell(x, y, Layer::Wall));
                    }
                }
            }
            prop_assert_eq!(changes.len(), if noop { 0 } else { region.len() });
        }

        #[test]
        fn prop_refill_is_noop(
            codes in proptest::collection::vec(0u8..4, 32 * 32),
            start in (0i32..32, 0i32..32),
            texture in 1u32..4,
        ) {
            let mut level = level_from_codes(&codes);
            flood_fill(&mut level, start.0, start.1, Layer::Wall, Cell::wall(texture));
            let filled = level.clone();

            let changes = flood_fill(&mut level, start.0, start.1, Layer::Wall, Cell::wall(texture));

            prop_assert!(changes.is_empty());
            prop_assert_eq!(level, filled);
        }
    }
}
