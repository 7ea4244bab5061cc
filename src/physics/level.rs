//! Tile-Grid Level Builder
//!
//! Builds a [`CollisionWorld`] from ASCII rows, top row first:
//!
//! ```text
//! #   solid block        ?   item block (one item)
//! /   slope rising right \   slope rising left
//! P   spawn marker       . or space: empty
//! ```
//!
//! The bottom row sits at y = 0. Horizontal runs of `#` are merged into a
//! single collider.

use glam::Vec2;

use crate::config::ConfigError;
use crate::core::shape::Aabb;
use crate::physics::collider::{ColliderId, ItemBlock, SlopeSurface};
use crate::physics::layers::Layers;
use crate::physics::world::{ColliderDesc, CollisionWorld};

/// Level parsing errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LevelError {
    /// No rows, or only empty rows.
    #[error("level has no rows")]
    Empty,

    /// Tile size is not positive and finite.
    #[error("tile size must be positive and finite, got {0}")]
    InvalidTileSize(f32),

    /// A row's length differs from the first row.
    #[error("row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Row index from the top
        row: usize,
        /// Columns in the first row
        expected: usize,
        /// Columns in this row
        found: usize,
    },

    /// Glyph outside the tile alphabet.
    #[error("unknown tile {glyph:?} at row {row}, column {column}")]
    UnknownTile {
        /// Offending character
        glyph: char,
        /// Row index from the top
        row: usize,
        /// Column index
        column: usize,
    },

    /// Geometry was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// One tile of the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tile {
    Empty,
    Solid,
    SlopeRight,
    SlopeLeft,
    ItemBlock,
    Spawn,
}

impl Tile {
    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '.' | ' ' => Some(Self::Empty),
            '#' => Some(Self::Solid),
            '/' => Some(Self::SlopeRight),
            '\\' => Some(Self::SlopeLeft),
            '?' => Some(Self::ItemBlock),
            'P' => Some(Self::Spawn),
            _ => None,
        }
    }
}

/// A parsed level: its collision world and spawn points.
#[derive(Debug)]
pub struct Level {
    world: CollisionWorld,
    spawns: Vec<Vec2>,
    item_blocks: Vec<ColliderId>,
    tile_size: f32,
    columns: usize,
    rows: usize,
}

impl Level {
    /// Parse `rows` (top first) with square tiles of `tile_size`.
    pub fn parse<S: AsRef<str>>(rows: &[S], tile_size: f32) -> Result<Self, LevelError> {
        if !(tile_size > 0.0 && tile_size.is_finite()) {
            return Err(LevelError::InvalidTileSize(tile_size));
        }
        let grid = read_grid(rows)?;
        let height = grid.len();
        let columns = grid.first().map_or(0, Vec::len);

        let mut level = Level {
            world: CollisionWorld::new(),
            spawns: Vec::new(),
            item_blocks: Vec::new(),
            tile_size,
            columns,
            rows: height,
        };

        for (row_index, row) in grid.iter().enumerate() {
            let y = (height - 1 - row_index) as f32 * tile_size;
            let mut run_start: Option<usize> = None;

            for (column, tile) in row.iter().enumerate() {
                if *tile == Tile::Solid {
                    run_start.get_or_insert(column);
                    continue;
                }
                if let Some(start) = run_start.take() {
                    level.add_run(start, column, y);
                }
                level.add_tile(*tile, column, y)?;
            }
            if let Some(start) = run_start {
                level.add_run(start, row.len(), y);
            }
        }

        Ok(level)
    }

    fn add_run(&mut self, start: usize, end: usize, y: f32) {
        let ts = self.tile_size;
        let min = Vec2::new(start as f32 * ts, y);
        let max = Vec2::new(end as f32 * ts, y + ts);
        self.world.add_block(Aabb::new(min, max));
    }

    fn add_tile(&mut self, tile: Tile, column: usize, y: f32) -> Result<(), LevelError> {
        let ts = self.tile_size;
        let min = Vec2::new(column as f32 * ts, y);
        match tile {
            Tile::Empty | Tile::Solid => {}
            Tile::SlopeRight => {
                self.world.add_slope(min, ts, SlopeSurface::new(1, 1.0)?)?;
            }
            Tile::SlopeLeft => {
                self.world.add_slope(min, ts, SlopeSurface::new(-1, 1.0)?)?;
            }
            Tile::ItemBlock => {
                let desc = ColliderDesc::block(Aabb::new(min, min + Vec2::splat(ts)))
                    .with_layers(Layers::PROPS)
                    .with_hittable(ItemBlock::new(1));
                let id = self.world.insert(desc);
                self.item_blocks.push(id);
            }
            Tile::Spawn => {
                self.spawns.push(min + Vec2::splat(ts * 0.5));
            }
        }
        Ok(())
    }

    /// Collision world built from the grid.
    pub fn world(&self) -> &CollisionWorld {
        &self.world
    }

    /// Give up the collision world, keeping spawn data.
    pub fn into_parts(self) -> (CollisionWorld, Vec<Vec2>) {
        (self.world, self.spawns)
    }

    /// Spawn marker centers, top row first.
    pub fn spawns(&self) -> &[Vec2] {
        &self.spawns
    }

    /// Item block colliders in reading order.
    pub fn item_blocks(&self) -> &[ColliderId] {
        &self.item_blocks
    }

    /// Tile edge length.
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Grid size in tiles `(columns, rows)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.columns, self.rows)
    }
}

fn read_grid<S: AsRef<str>>(rows: &[S]) -> Result<Vec<Vec<Tile>>, LevelError> {
    let mut grid = Vec::with_capacity(rows.len());
    let mut expected = None;

    for (row_index, row) in rows.iter().enumerate() {
        let glyphs: Vec<char> = row.as_ref().chars().collect();
        let expected = *expected.get_or_insert(glyphs.len());
        if glyphs.len() != expected {
            return Err(LevelError::RaggedRow {
                row: row_index,
                expected,
                found: glyphs.len(),
            });
        }

        let tiles = glyphs
            .iter()
            .enumerate()
            .map(|(column, &glyph)| {
                Tile::from_glyph(glyph).ok_or(LevelError::UnknownTile {
                    glyph,
                    row: row_index,
                    column,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        grid.push(tiles);
    }

    if grid.first().map_or(true, Vec::is_empty) {
        return Err(LevelError::Empty);
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::layers::QueryFilter;
    use crate::physics::query::HitBuffer;

    #[test]
    fn test_parse_blocks_and_spawn() {
        let level = Level::parse(&["P...", "##.#"], 1.0).unwrap();
        assert_eq!(level.dimensions(), (4, 2));
        assert_eq!(level.spawns(), &[Vec2::new(0.5, 1.5)]);
        // "##" merges into one collider, "#" is another
        assert_eq!(level.world().len(), 2);

        let bounds: Vec<Aabb> = level.world().iter().map(|c| c.shape().bounds()).collect();
        assert_eq!(bounds[0], Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 1.0)));
        assert_eq!(bounds[1], Aabb::new(Vec2::new(3.0, 0.0), Vec2::new(4.0, 1.0)));
    }

    #[test]
    fn test_parse_slopes_and_items() {
        let level = Level::parse(&["..?.", "./\\.", "####"], 0.5).unwrap();
        assert_eq!(level.item_blocks().len(), 1);

        let slopes: Vec<i32> = level
            .world()
            .iter()
            .filter_map(|c| c.slope().map(|s| s.direction()))
            .collect();
        assert_eq!(slopes, vec![1, -1]);

        let item = level.world().collider(level.item_blocks()[0]).unwrap();
        assert!(item.is_hittable());
        assert_eq!(item.layers(), Layers::PROPS);
        assert_eq!(item.shape().bounds().min, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn test_floor_blocks_fall() {
        let level = Level::parse(&["P", "#"], 2.0).unwrap();
        let actor = Aabb::from_center(level.spawns()[0], Vec2::splat(0.5));
        let mut buf = HitBuffer::new();
        let hits = level
            .world()
            .cast(&actor, Vec2::NEG_Y, 10.0, &QueryFilter::ALL, &mut buf);
        assert_eq!(hits, 1);
        assert_eq!(buf.nearest().map(|h| h.distance), Some(0.5));
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(Level::parse::<&str>(&[], 1.0).unwrap_err(), LevelError::Empty);
        assert_eq!(Level::parse(&["##"], 0.0).unwrap_err(), LevelError::InvalidTileSize(0.0));
        assert_eq!(
            Level::parse(&["##", "#"], 1.0).unwrap_err(),
            LevelError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
        assert_eq!(
            Level::parse(&["#x"], 1.0).unwrap_err(),
            LevelError::UnknownTile {
                glyph: 'x',
                row: 0,
                column: 1
            }
        );
    }
}
