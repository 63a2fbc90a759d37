// Grid geometry for the dashboard.
//
// A fixed-column, row-based grid measured in integer cells. Everything in here
// is pure: the constants live in GridConfig and the conversions only read them.
//
// Submodules:
// - collision: pairwise overlap and "collides with any" queries
// - placement: ring search for the nearest free cell
// - repair: bounds / minimum-area correction

use serde::{Deserialize, Serialize};

pub mod collision;
pub mod placement;
pub mod repair;

/// Top-left corner of a widget, in grid cells.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeI {
    pub w: i32,
    pub h: i32,
}

impl SizeI {
    pub fn area(&self) -> i32 {
        self.w * self.h
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RectI {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl RectI {
    pub fn new(origin: Cell, size: SizeI) -> Self {
        Self { x: origin.x, y: origin.y, w: size.w, h: size.h }
    }

    pub fn right(&self) -> i32 { self.x + self.w }
    pub fn bottom(&self) -> i32 { self.y + self.h }
    pub fn area(&self) -> i32 { self.w * self.h }

    pub fn origin(&self) -> Cell {
        Cell { x: self.x, y: self.y }
    }

    pub fn size(&self) -> SizeI {
        SizeI { w: self.w, h: self.h }
    }

    pub fn at(&self, origin: Cell) -> RectI {
        RectI { x: origin.x, y: origin.y, ..*self }
    }

    /// Open-rectangle intersection: touching edges do not overlap.
    pub fn overlaps(&self, other: &RectI) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Deepest row the engine will address. Keeps row arithmetic far from `i32` overflow.
pub const MAX_ROW: i32 = 1_000_000;

/// Pixel bounding box of the grid container, as reported by the host UI.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridConfig {
    /// Number of columns. The dashboard always uses 12.
    pub columns: i32,
    /// Pixel height of one row.
    pub cell_height: f64,
    /// Pixel spacing between adjacent cells, both directions.
    pub gap: f64,
    /// Minimum `w * h` of any widget.
    pub min_cells: i32,
    /// Soft row ceiling; only bounds the position search.
    pub max_rows: i32,
    /// Smallest width or height a widget may have.
    pub min_span: i32,
    /// Largest height a widget may grow to.
    pub max_height: i32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            columns: 12,
            cell_height: 80.0,
            gap: 20.0,
            min_cells: 4,
            max_rows: 50,
            min_span: 2,
            max_height: 20,
        }
    }
}

impl GridConfig {
    /// Pixel width of a single column for the given container.
    pub fn column_width(&self, container: &ContainerRect) -> f64 {
        let total_gap = self.gap * (self.columns - 1) as f64;
        ((container.width - total_gap) / self.columns as f64).max(1.0)
    }

    /// Cell pitch (cell size + gap) along each axis, in pixels.
    pub fn pitch(&self, container: &ContainerRect) -> (f64, f64) {
        (
            self.column_width(container) + self.gap,
            (self.cell_height + self.gap).max(1.0),
        )
    }

    /// Map a pointer position to the grid cell under it.
    /// Columns clamp to `[0, columns)`, rows to `[0, MAX_ROW]`.
    pub fn cell_origin(&self, pointer_x: f64, pointer_y: f64, container: &ContainerRect) -> Cell {
        let (pitch_x, pitch_y) = self.pitch(container);
        let col = ((pointer_x - container.left) / pitch_x).floor();
        let row = ((pointer_y - container.top) / pitch_y).floor();
        Cell {
            x: (col as i32).clamp(0, self.columns - 1),
            y: (row as i32).clamp(0, MAX_ROW),
        }
    }

    /// Convert a pointer displacement in pixels into whole cells,
    /// rounding each axis to the nearest cell. Deltas larger than any widget
    /// could use are clamped.
    pub fn cell_delta(&self, dx: f64, dy: f64, container: &ContainerRect) -> (i32, i32) {
        let (pitch_x, pitch_y) = self.pitch(container);
        let limit = self.max_cell_delta();
        (
            ((dx / pitch_x).round() as i32).clamp(-limit, limit),
            ((dy / pitch_y).round() as i32).clamp(-limit, limit),
        )
    }

    fn max_cell_delta(&self) -> i32 {
        self.columns.max(self.max_height) + self.search_radius()
    }

    /// Horizontal and vertical bounds only; says nothing about collisions.
    pub fn in_bounds(&self, rect: &RectI) -> bool {
        rect.x >= 0 && rect.y >= 0 && rect.w >= 1 && rect.h >= 1 && rect.right() <= self.columns
    }

    /// Whether a size satisfies the span limits and the minimum area rule.
    pub fn size_allowed(&self, size: SizeI) -> bool {
        size.w >= self.min_span
            && size.w <= self.columns
            && size.h >= self.min_span
            && size.h <= self.max_height
            && size.area() >= self.min_cells
    }

    /// How far the ring search goes before giving up.
    pub fn search_radius(&self) -> i32 {
        self.max_rows.max(self.columns)
    }

    /// Smallest widget size for a new widget: `min_span` square, grown to meet `min_cells`.
    pub fn default_widget_size(&self) -> SizeI {
        repair::grow_to_min_area(SizeI { w: self.min_span, h: self.min_span }, self)
    }
}
