//! Cellular asteroid shape
//!
//! A `rows × cols` grid of cells. Cell (row, col) sits at
//! `((col - (cols-1)/2) * w, (row - (rows-1)/2) * h)` in the shape's local frame,
//! so the grid is always centered on its own middle. Reads outside the grid
//! return `CellKind::Empty`; writes outside the grid are a programming error.
//!
//! Shapes are only mutated while being generated or split. Anything that
//! shrinks the grid reports the offset of the new center so callers can keep
//! the rock in place in world space.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::SHAPE_FONT_SIZE;
use crate::math::{Rect, Transform2D, Vec2Ext, lerp, segment_circle_intersection};

/// Width and height of one cell (one monospace glyph)
pub const CELL_SIZE: Vec2 = Vec2::new(SHAPE_FONT_SIZE * 0.6, SHAPE_FONT_SIZE);

/// Fragments thinner than this in either dimension shatter
pub const MIN_FRAGMENT_CELLS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CellKind {
    #[default]
    Empty,
    Rock,
    Resource,
}

impl CellKind {
    pub fn glyph(self) -> char {
        match self {
            CellKind::Empty => ' ',
            CellKind::Rock => '#',
            CellKind::Resource => 'o',
        }
    }

    pub fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            ' ' | '.' => Some(CellKind::Empty),
            '#' => Some(CellKind::Rock),
            'o' => Some(CellKind::Resource),
            _ => None,
        }
    }
}

/// A cell removed from a shape, with its position in that shape's local frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetachedCell {
    pub kind: CellKind,
    pub offset: Vec2,
}

/// World-space contact between a circle and a shape cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeContact {
    /// Point on the cell circle closest to the query circle
    pub position: Vec2,
    /// Unit normal from the cell toward the query circle (zero if concentric)
    pub normal: Vec2,
}

/// One half of a split after cleanup
///
/// All offsets are in the parent shape's local frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Surviving rock, or `None` if the half shattered
    pub shape: Option<AsteroidShape>,
    /// Center of `shape` relative to the parent's center
    pub offset: Vec2,
    /// Every resource cell that broke free, relative to the parent's center
    pub resource_offsets: Vec<Vec2>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsteroidShape {
    rows: usize,
    cols: usize,
    cells: Vec<CellKind>,
}

impl AsteroidShape {
    /// An all-empty grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![CellKind::Empty; rows * cols],
        }
    }

    /// A 1×1 shape holding a single cell
    pub fn single(kind: CellKind) -> Self {
        let mut shape = Self::new(1, 1);
        shape.set_cell(0, 0, kind);
        shape
    }

    /// Parse a glyph picture (`#` rock, `o` resource, space or `.` empty)
    ///
    /// Short lines are padded with empty cells. Unknown glyphs yield `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let lines: Vec<&str> = text.lines().collect();
        let rows = lines.len();
        let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let mut shape = Self::new(rows, cols);
        for (row, line) in lines.iter().enumerate() {
            for (col, glyph) in line.chars().enumerate() {
                shape.set_cell(row, col, CellKind::from_glyph(glyph)?);
            }
        }
        Some(shape)
    }

    /// Glyph picture of the grid, one line per row
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.rows * (self.cols + 1));
        for row in 0..self.rows {
            if row > 0 {
                text.push('\n');
            }
            for col in 0..self.cols {
                text.push(self.cells[self.index(row, col)].glyph());
            }
        }
        text
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn cell_size(&self) -> Vec2 {
        CELL_SIZE
    }

    /// Local-space bounding box of the whole grid
    pub fn bounds(&self) -> Rect {
        Rect::from_center_size(
            Vec2::ZERO,
            Vec2::new(self.cols as f32 * CELL_SIZE.x, self.rows as f32 * CELL_SIZE.y),
        )
    }

    /// Half the bounding box diagonal
    pub fn containing_radius(&self) -> f32 {
        self.bounds().size().length() * 0.5
    }

    /// Local-space center of a cell
    #[inline]
    pub fn cell_offset(&self, row: usize, col: usize) -> Vec2 {
        self.grid_position(row as f32, col as f32)
    }

    fn grid_position(&self, row: f32, col: f32) -> Vec2 {
        Vec2::new(
            (col - (self.cols as f32 - 1.0) * 0.5) * CELL_SIZE.x,
            (row - (self.rows as f32 - 1.0) * 0.5) * CELL_SIZE.y,
        )
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    #[inline]
    pub fn contains(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.rows && (col as usize) < self.cols
    }

    /// Cell at a possibly out-of-range coordinate (outside reads as empty)
    pub fn cell(&self, row: isize, col: isize) -> CellKind {
        if !self.contains(row, col) {
            return CellKind::Empty;
        }
        self.cells[self.index(row as usize, col as usize)]
    }

    /// Overwrite a cell; panics outside the grid
    pub fn set_cell(&mut self, row: usize, col: usize, kind: CellKind) {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) outside {}x{} shape",
            self.rows,
            self.cols
        );
        let index = self.index(row, col);
        self.cells[index] = kind;
    }

    pub fn count(&self, kind: CellKind) -> usize {
        self.cells.iter().filter(|&&c| c == kind).count()
    }

    pub fn filled_count(&self) -> usize {
        self.cells.len() - self.count(CellKind::Empty)
    }

    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }

    /// Row-major iterator over filled cells as (row, col, kind)
    pub fn filled_cells(&self) -> impl Iterator<Item = (usize, usize, CellKind)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, &kind)| {
            (kind != CellKind::Empty).then_some((i / self.cols, i % self.cols, kind))
        })
    }

    /// Procedurally generate a rock
    ///
    /// Cells near the center are almost always filled and the rim tapers off
    /// cubically. Resources cluster toward the center. The result is a single
    /// connected body with no loose resources, compacted to its content.
    pub fn random(rows: usize, cols: usize, resource_chance: f32, rng: &mut impl Rng) -> Self {
        let mut shape = Self::new(rows, cols);
        let size = shape.bounds().size();
        let shape_radius = lerp(size.x, size.y, 0.5) * 0.5;

        for row in 0..rows {
            for col in 0..cols {
                let distance = if shape_radius > 0.0 {
                    shape.cell_offset(row, col).length() / shape_radius
                } else {
                    0.0
                };
                let filled_chance = 1.0 - lerp(0.0, 1.0, distance).powi(3);
                if rng.random::<f32>() < filled_chance {
                    let chance = lerp(1.0, 0.0, distance).powi(3) * resource_chance;
                    let kind = if rng.random::<f32>() < chance {
                        CellKind::Resource
                    } else {
                        CellKind::Rock
                    };
                    shape.set_cell(row, col, kind);
                }
            }
        }

        shape.purge_detached_cells();

        for row in 0..rows {
            for col in 0..cols {
                if shape.is_loose_resource(row as isize, col as isize) {
                    shape.set_cell(row, col, CellKind::Rock);
                }
            }
        }

        shape.compacted().0
    }

    /// Label every 4-connected component; returns per-cell labels and per-label sizes
    fn label_components(&self) -> (Vec<Option<usize>>, Vec<usize>) {
        let mut labels: Vec<Option<usize>> = vec![None; self.cells.len()];
        let mut sizes = Vec::new();
        let mut stack = Vec::new();

        for start in 0..self.cells.len() {
            if self.cells[start] == CellKind::Empty || labels[start].is_some() {
                continue;
            }
            let label = sizes.len();
            let mut size = 0;
            labels[start] = Some(label);
            stack.push(start);

            while let Some(i) = stack.pop() {
                size += 1;
                let (row, col) = ((i / self.cols) as isize, (i % self.cols) as isize);
                for (dr, dc) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                    let (r, c) = (row + dr, col + dc);
                    if self.cell(r, c) == CellKind::Empty {
                        continue;
                    }
                    let j = self.index(r as usize, c as usize);
                    if labels[j].is_none() {
                        labels[j] = Some(label);
                        stack.push(j);
                    }
                }
            }
            sizes.push(size);
        }
        (labels, sizes)
    }

    /// Number of 4-connected groups of filled cells
    pub fn component_count(&self) -> usize {
        self.label_components().1.len()
    }

    /// Keep only the largest 4-connected component
    ///
    /// Components of equal size resolve to the one whose first cell comes
    /// first in row-major order. Returns every cleared filled cell.
    pub fn purge_detached_cells(&mut self) -> Vec<DetachedCell> {
        let (labels, sizes) = self.label_components();
        let mut largest = None;
        let mut largest_size = 0;
        for (label, &size) in sizes.iter().enumerate() {
            if size > largest_size {
                largest_size = size;
                largest = Some(label);
            }
        }

        let mut detached = Vec::new();
        for i in 0..self.cells.len() {
            if self.cells[i] != CellKind::Empty && labels[i] != largest {
                let (row, col) = (i / self.cols, i % self.cols);
                detached.push(DetachedCell {
                    kind: self.cells[i],
                    offset: self.cell_offset(row, col),
                });
                self.cells[i] = CellKind::Empty;
            }
        }
        detached
    }

    fn row_is_empty(&self, row: usize) -> bool {
        (0..self.cols).all(|col| self.cells[self.index(row, col)] == CellKind::Empty)
    }

    fn col_is_empty(&self, col: usize) -> bool {
        (0..self.rows).all(|row| self.cells[self.index(row, col)] == CellKind::Empty)
    }

    /// Trim empty border rows and columns
    ///
    /// Returns the minimal grid and the local position of its center in this
    /// shape's frame. An all-empty shape compacts to 0×0 at the origin.
    pub fn compacted(&self) -> (AsteroidShape, Vec2) {
        let first_row = (0..self.rows).find(|&r| !self.row_is_empty(r));
        let last_row = (0..self.rows).rev().find(|&r| !self.row_is_empty(r));
        let first_col = (0..self.cols).find(|&c| !self.col_is_empty(c));
        let last_col = (0..self.cols).rev().find(|&c| !self.col_is_empty(c));

        let (Some(r0), Some(r1), Some(c0), Some(c1)) = (first_row, last_row, first_col, last_col) else {
            return (AsteroidShape::new(0, 0), Vec2::ZERO);
        };

        let mut shape = AsteroidShape::new(r1 - r0 + 1, c1 - c0 + 1);
        for row in 0..shape.rows {
            for col in 0..shape.cols {
                let kind = self.cells[self.index(r0 + row, c0 + col)];
                shape.set_cell(row, col, kind);
            }
        }
        let center = self.grid_position(
            r0 as f32 + (shape.rows as f32 - 1.0) * 0.5,
            c0 as f32 + (shape.cols as f32 - 1.0) * 0.5,
        );
        (shape, center)
    }

    /// Partition cells by which side of a local-space line they fall on
    ///
    /// Cells with `cross(cell - origin, direction) >= 0` go to the first half.
    /// Each half is compacted; offsets are relative to this shape's center.
    pub fn split_along(&self, origin: Vec2, direction: Vec2) -> [(AsteroidShape, Vec2); 2] {
        let mut halves = [
            AsteroidShape::new(self.rows, self.cols),
            AsteroidShape::new(self.rows, self.cols),
        ];
        for (row, col, kind) in self.filled_cells() {
            let side = if (self.cell_offset(row, col) - origin).cross(direction) >= 0.0 {
                0
            } else {
                1
            };
            halves[side].set_cell(row, col, kind);
        }
        let [a, b] = halves;
        [a.compacted(), b.compacted()]
    }

    /// A resource cell with two adjacent empty neighbors at a right angle
    pub fn is_loose_resource(&self, row: isize, col: isize) -> bool {
        if self.cell(row, col) != CellKind::Resource {
            return false;
        }
        let right = self.cell(row, col + 1) == CellKind::Empty;
        let down = self.cell(row + 1, col) == CellKind::Empty;
        let left = self.cell(row, col - 1) == CellKind::Empty;
        let up = self.cell(row - 1, col) == CellKind::Empty;
        (right && down) || (down && left) || (left && up) || (up && right)
    }

    /// Remove loose resource cells, following chains that loosen as cells are taken
    ///
    /// Returns local offsets of every removed cell.
    pub fn take_loose_resources(&mut self) -> Vec<Vec2> {
        let mut taken = Vec::new();
        let mut stack = Vec::new();
        for row in 0..self.rows as isize {
            for col in 0..self.cols as isize {
                if !self.is_loose_resource(row, col) {
                    continue;
                }
                stack.push((row, col));
                while let Some((r, c)) = stack.pop() {
                    if !self.is_loose_resource(r, c) {
                        continue;
                    }
                    taken.push(self.cell_offset(r as usize, c as usize));
                    self.set_cell(r as usize, c as usize, CellKind::Empty);
                    stack.extend([(r, c - 1), (r, c + 1), (r - 1, c), (r + 1, c)]);
                }
            }
        }
        taken
    }

    /// Clear every cell of `kind`, returning their local offsets
    pub fn take_cells_of_kind(&mut self, kind: CellKind) -> Vec<Vec2> {
        let mut taken = Vec::new();
        for row in 0..self.rows {
            for col in 0..self.cols {
                let index = self.index(row, col);
                if self.cells[index] == kind {
                    taken.push(self.cell_offset(row, col));
                    self.cells[index] = CellKind::Empty;
                }
            }
        }
        taken
    }

    /// Clean up one half of a split
    ///
    /// Detached pieces are purged (resources among them break free, rock is
    /// lost) and loose resources are extracted, repeating until neither finds
    /// anything, since pulling a loose resource can cut the body in two. The
    /// half then shatters if it is thinner than three cells. `offset` is the
    /// half's center in the parent frame as returned by `split_along`.
    pub fn settle_fragment(mut self, mut offset: Vec2) -> Fragment {
        let mut resource_offsets = Vec::new();

        loop {
            let detached = self.purge_detached_cells();
            resource_offsets.extend(
                detached
                    .iter()
                    .filter(|cell| cell.kind == CellKind::Resource)
                    .map(|cell| offset + cell.offset),
            );
            let loose = self.take_loose_resources();
            resource_offsets.extend(loose.iter().map(|&local| offset + local));

            if detached.is_empty() && loose.is_empty() {
                break;
            }
            let (compacted, center) = self.compacted();
            self = compacted;
            offset += center;
        }

        if self.rows < MIN_FRAGMENT_CELLS || self.cols < MIN_FRAGMENT_CELLS {
            let remaining = self.take_cells_of_kind(CellKind::Resource);
            resource_offsets.extend(remaining.iter().map(|&local| offset + local));
            return Fragment {
                shape: None,
                offset,
                resource_offsets,
            };
        }

        Fragment {
            shape: Some(self),
            offset,
            resource_offsets,
        }
    }

    /// Closest entry of a world-space segment into any filled cell
    ///
    /// Each cell is approximated by a circle of half the cell width. Returns
    /// the entry parameter along the segment.
    pub fn segment_intersection(&self, start: Vec2, end: Vec2, transform: &Transform2D) -> Option<f32> {
        let scale = transform.uniform_scale();
        let center = transform.transform_position(self.bounds().center());
        segment_circle_intersection(start, end, center, self.containing_radius() * scale)?;

        let cell_radius = CELL_SIZE.x * scale * 0.5;
        self.filled_cells()
            .filter_map(|(row, col, _)| {
                let cell_center = transform.transform_position(self.cell_offset(row, col));
                segment_circle_intersection(start, end, cell_center, cell_radius)
            })
            .map(|hit| hit.enter)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// First filled cell (row-major) overlapping a world-space circle
    pub fn circle_intersection(&self, center: Vec2, radius: f32, transform: &Transform2D) -> Option<ShapeContact> {
        let scale = transform.uniform_scale();
        let shape_center = transform.transform_position(self.bounds().center());
        if (center - shape_center).length() > radius + self.containing_radius() * scale {
            return None;
        }

        let cell_radius = CELL_SIZE.max_element() * scale * 0.5;
        self.filled_cells().find_map(|(row, col, _)| {
            let cell_center = transform.transform_position(self.cell_offset(row, col));
            let delta = center - cell_center;
            if delta.length() >= radius + cell_radius {
                return None;
            }
            let normal = delta.direction().unwrap_or(Vec2::ZERO);
            Some(ShapeContact {
                position: cell_center + normal * cell_radius,
                normal,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Angle;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn shape(text: &str) -> AsteroidShape {
        AsteroidShape::parse(text).unwrap()
    }

    #[test]
    fn test_parse_and_text() {
        let s = shape("#o#\n# #");
        assert_eq!(s.rows(), 2);
        assert_eq!(s.cols(), 3);
        assert_eq!(s.cell(0, 1), CellKind::Resource);
        assert_eq!(s.cell(1, 1), CellKind::Empty);
        assert_eq!(s.to_text(), "#o#\n# #");
        assert!(AsteroidShape::parse("#x#").is_none());
    }

    #[test]
    fn test_out_of_bounds_reads_empty() {
        let s = shape("##\n##");
        assert_eq!(s.cell(-1, 0), CellKind::Empty);
        assert_eq!(s.cell(0, 2), CellKind::Empty);
        assert_eq!(s.cell(2, 2), CellKind::Empty);
    }

    #[test]
    #[should_panic]
    fn test_out_of_bounds_write_panics() {
        let mut s = AsteroidShape::new(2, 2);
        s.set_cell(2, 0, CellKind::Rock);
    }

    #[test]
    fn test_geometry() {
        let s = AsteroidShape::new(3, 5);
        assert_eq!(s.cell_offset(1, 2), Vec2::ZERO);
        assert_eq!(s.cell_offset(0, 0), Vec2::new(-2.0 * CELL_SIZE.x, -CELL_SIZE.y));
        let size = Vec2::new(5.0 * CELL_SIZE.x, 3.0 * CELL_SIZE.y);
        assert!((s.containing_radius() - size.length() * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_random_without_resources() {
        let mut rng = Pcg32::seed_from_u64(7);
        let s = AsteroidShape::random(10, 10, 0.0, &mut rng);
        assert_eq!(s.count(CellKind::Resource), 0);
        assert!(s.count(CellKind::Rock) >= 1);
        assert_eq!(s.component_count(), 1);
    }

    #[test]
    fn test_random_is_connected_compact_and_has_no_loose_resources() {
        let mut rng = Pcg32::seed_from_u64(42);
        for rows in 3..=12 {
            let s = AsteroidShape::random(rows * 3 / 2, rows, 0.8, &mut rng);
            assert_eq!(s.component_count(), 1);
            assert_eq!(s.compacted().1, Vec2::ZERO);
            for (row, col, _) in s.filled_cells() {
                assert!(!s.is_loose_resource(row as isize, col as isize));
            }
        }
    }

    #[test]
    fn test_random_is_deterministic_per_seed() {
        let a = AsteroidShape::random(9, 6, 0.4, &mut Pcg32::seed_from_u64(3));
        let b = AsteroidShape::random(9, 6, 0.4, &mut Pcg32::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_purge_keeps_largest() {
        let mut s = shape("## #\n## o\n    \n   #");
        let detached = s.purge_detached_cells();
        assert_eq!(s.to_text(), "##  \n##  \n    \n    ");
        assert_eq!(detached.len(), 3);
        assert_eq!(detached.iter().filter(|c| c.kind == CellKind::Resource).count(), 1);
        assert_eq!(detached[0].offset, s.cell_offset(0, 3));
    }

    #[test]
    fn test_purge_tie_goes_to_first_found() {
        let mut s = shape("## ##");
        s.purge_detached_cells();
        assert_eq!(s.to_text(), "##   ");
    }

    #[test]
    fn test_compaction_offset() {
        let s = shape("    \n ## \n ## \n    ");
        let (c, offset) = s.compacted();
        assert_eq!(c.to_text(), "##\n##");
        assert_eq!(offset, Vec2::ZERO);

        let s = shape("##  \n##  ");
        let (c, offset) = s.compacted();
        assert_eq!((c.rows(), c.cols()), (2, 2));
        assert_eq!(offset, Vec2::new(-CELL_SIZE.x, 0.0));
        // Same local position before and after
        assert!((offset + c.cell_offset(0, 0) - s.cell_offset(0, 0)).length() < 1e-4);
    }

    #[test]
    fn test_compacting_empty_shape() {
        let (c, offset) = AsteroidShape::new(4, 4).compacted();
        assert_eq!((c.rows(), c.cols()), (0, 0));
        assert_eq!(offset, Vec2::ZERO);
        assert_eq!(c.containing_radius(), 0.0);
    }

    #[test]
    fn test_split_vertical_axis() {
        let s = shape("###\n###\n###");
        let [(a, a_off), (b, b_off)] = s.split_along(Vec2::ZERO, Vec2::Y);
        assert_eq!((a.rows(), a.cols()), (3, 2));
        assert_eq!((b.rows(), b.cols()), (3, 1));
        assert_eq!(a_off, Vec2::new(CELL_SIZE.x * 0.5, 0.0));
        assert_eq!(b_off, Vec2::new(-CELL_SIZE.x, 0.0));
    }

    #[test]
    fn test_split_then_shatter() {
        let s = shape("#o#\n###\n#o#");
        let halves = s.split_along(Vec2::ZERO, Vec2::Y);
        let mut pickups = 0;
        for (half, offset) in halves {
            let fragment = half.settle_fragment(offset);
            assert!(fragment.shape.is_none());
            pickups += fragment.resource_offsets.len();
        }
        assert_eq!(pickups, 2);
    }

    #[test]
    fn test_loose_resource_rule() {
        let s = shape("###\n#o#\n###");
        assert!(!s.is_loose_resource(1, 1));
        let s = shape("#  \n#o \n###");
        assert!(s.is_loose_resource(1, 1));
        // Opposite empty neighbors do not make a corner gap
        let s = shape("###\n o \n###");
        assert!(!s.is_loose_resource(1, 1));
        assert!(!s.is_loose_resource(0, 0));
    }

    #[test]
    fn test_take_loose_resources_follows_chains() {
        let mut s = shape("###  \n#ooo \n###  ");
        let taken = s.take_loose_resources();
        // Only the tip is loose; rock above and below holds the rest
        assert_eq!(taken.len(), 1);
        assert_eq!(s.cell(1, 3), CellKind::Empty);

        let mut s = shape("#   \n#ooo\n#   ");
        let taken = s.take_loose_resources();
        assert_eq!(taken.len(), 3);
        assert_eq!(s.count(CellKind::Resource), 0);
    }

    #[test]
    fn test_settle_fragment_reports_parent_frame_offsets() {
        // Right column gets detached, then the 3x3 body remains
        let parent = shape("### o\n###  \n###  ");
        let fragment = parent.clone().settle_fragment(Vec2::new(10.0, 0.0));
        let body = fragment.shape.unwrap();
        assert_eq!(body.to_text(), "###\n###\n###");
        assert_eq!(fragment.resource_offsets, vec![Vec2::new(10.0, 0.0) + parent.cell_offset(0, 4)]);
        assert_eq!(fragment.offset, Vec2::new(10.0, 0.0) + parent.cell_offset(1, 1));
    }

    #[test]
    fn test_settle_fragment_purges_rock_cut_off_by_loose_resource() {
        let half = shape("###  \n###  \n###o \n   ##\n   ##");
        let fragment = half.settle_fragment(Vec2::ZERO);
        assert_eq!(fragment.shape.unwrap().to_text(), "###\n###\n###");
        assert_eq!(fragment.resource_offsets.len(), 1);
    }

    #[test]
    fn test_segment_through_empty_cells_misses() {
        let s = shape("# #\n# #\n# #");
        let t = Transform2D::IDENTITY;
        let hit = s.segment_intersection(Vec2::new(0.0, -100.0), Vec2::new(0.0, 100.0), &t);
        assert!(hit.is_none());
        // Passing within the containing circle isn't enough either
        assert!(s.containing_radius() > 0.0);
    }

    #[test]
    fn test_segment_returns_closest_entry() {
        let s = shape("###");
        let t = Transform2D::from_translation(Vec2::new(100.0, 0.0));
        let start = Vec2::new(0.0, 0.0);
        let end = Vec2::new(200.0, 0.0);
        let enter = s.segment_intersection(start, end, &t).unwrap();
        let first_cell = 100.0 - CELL_SIZE.x;
        let expected = (first_cell - CELL_SIZE.x * 0.5) / 200.0;
        assert!((enter - expected).abs() < 1e-4);
    }

    #[test]
    fn test_segment_respects_rotation_and_scale() {
        let s = shape("###");
        let t = Transform2D::new(Vec2::ZERO, Angle::from_degrees(90.0), Vec2::splat(2.0));
        // Rotated 90 degrees the row stands vertically
        let hit = s.segment_intersection(Vec2::new(-50.0, 2.0 * CELL_SIZE.x), Vec2::new(50.0, 2.0 * CELL_SIZE.x), &t);
        assert!(hit.is_some());
        let miss = s.segment_intersection(Vec2::new(-50.0, 0.0), Vec2::new(-40.0, 0.0), &t);
        assert!(miss.is_none());
    }

    #[test]
    fn test_circle_contact_normal_points_to_circle() {
        let s = shape("#");
        let t = Transform2D::from_translation(Vec2::new(50.0, 50.0));
        let contact = s.circle_intersection(Vec2::new(70.0, 50.0), 18.0, &t).unwrap();
        assert!((contact.normal - Vec2::X).length() < 1e-5);
        assert!((contact.position - Vec2::new(50.0 + CELL_SIZE.y * 0.5, 50.0)).length() < 1e-4);
        assert!(s.circle_intersection(Vec2::new(200.0, 50.0), 18.0, &t).is_none());
    }

    fn arb_shape() -> impl Strategy<Value = AsteroidShape> {
        (1usize..8, 1usize..8).prop_flat_map(|(rows, cols)| {
            prop::collection::vec(
                prop_oneof![Just(CellKind::Empty), Just(CellKind::Rock), Just(CellKind::Resource)],
                rows * cols,
            )
            .prop_map(move |cells| AsteroidShape { rows, cols, cells })
        })
    }

    proptest! {
        #[test]
        fn prop_compaction_is_idempotent(s in arb_shape()) {
            let (once, _) = s.compacted();
            let (twice, offset) = once.compacted();
            prop_assert_eq!(&twice, &once);
            prop_assert_eq!(offset, Vec2::ZERO);
        }

        #[test]
        fn prop_compaction_never_grows_radius(s in arb_shape()) {
            let (c, _) = s.compacted();
            prop_assert!(c.containing_radius() <= s.containing_radius() + 1e-4);
        }

        #[test]
        fn prop_purge_leaves_one_component(mut s in arb_shape()) {
            let before = s.filled_count();
            let detached = s.purge_detached_cells();
            prop_assert!(s.component_count() <= 1);
            prop_assert_eq!(s.filled_count() + detached.len(), before);
        }

        #[test]
        fn prop_split_conserves_cells(s in arb_shape(), degrees in 0.0f32..360.0) {
            let direction = Angle::from_degrees(degrees).direction();
            let halves = s.split_along(Vec2::ZERO, direction);

            let mut placed = Vec::new();
            for (side, (half, offset)) in halves.iter().enumerate() {
                for (row, col, kind) in half.filled_cells() {
                    placed.push((side, *offset + half.cell_offset(row, col), kind));
                }
            }
            prop_assert_eq!(placed.len(), s.filled_count());

            for (row, col, kind) in s.filled_cells() {
                let position = s.cell_offset(row, col);
                let side = if position.cross(direction) >= 0.0 { 0 } else { 1 };
                let matches = placed
                    .iter()
                    .filter(|(p_side, p_pos, p_kind)| {
                        *p_side == side && *p_kind == kind && (*p_pos - position).length() < 1e-3
                    })
                    .count();
                prop_assert_eq!(matches, 1);
            }
        }

        #[test]
        fn prop_settled_fragments_are_connected_and_thick(s in arb_shape(), degrees in 0.0f32..360.0) {
            let direction = Angle::from_degrees(degrees).direction();
            for (half, offset) in s.split_along(Vec2::ZERO, direction) {
                let resources = half.count(CellKind::Resource);
                let fragment = half.settle_fragment(offset);
                if let Some(body) = &fragment.shape {
                    prop_assert_eq!(body.component_count(), 1);
                    prop_assert!(body.rows() >= MIN_FRAGMENT_CELLS && body.cols() >= MIN_FRAGMENT_CELLS);
                    prop_assert_eq!(body.count(CellKind::Resource) + fragment.resource_offsets.len(), resources);
                } else {
                    prop_assert_eq!(fragment.resource_offsets.len(), resources);
                }
            }
        }
    }
}
