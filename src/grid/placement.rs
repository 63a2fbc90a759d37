// Position search on the grid.
//
// Finds the nearest free top-left cell for a widget of a given size by
// scanning square rings (Chebyshev distance) around a desired cell. Only the
// perimeter of each ring is tested, row-major within the ring, so the result
// is fully determined by the layout and the inputs.

use log::debug;

use super::collision::{has_collision, has_collision_excluding};
use super::{Cell, GridConfig, RectI, SizeI};
use crate::widget::{Layout, Widget, WidgetId};

/// Whether `rect` is inside the grid and clear of every widget except `exclude`.
fn is_free(rect: &RectI, layout: &Layout, cfg: &GridConfig, exclude: &WidgetId) -> bool {
    rect.x >= 0 && rect.y >= 0 && rect.right() <= cfg.columns && !has_collision(rect, layout, exclude)
}

/// Search outward from `desired` for a free position of `size`.
/// Returns `None` when the search radius is exhausted.
pub fn search_free_position(
    layout: &Layout,
    cfg: &GridConfig,
    size: SizeI,
    desired: Cell,
    exclude: &WidgetId,
) -> Option<Cell> {
    let rect = RectI::new(desired, size);
    if is_free(&rect, layout, cfg, exclude) {
        return Some(desired);
    }

    for radius in 1..cfg.search_radius() {
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx.abs() != radius && dy.abs() != radius {
                    continue;
                }
                let cell = Cell { x: desired.x + dx, y: desired.y + dy };
                if is_free(&rect.at(cell), layout, cfg, exclude) {
                    return Some(cell);
                }
            }
        }
    }
    None
}

/// Nearest free position for `widget` around `desired`; falls back to the
/// widget's current position when nothing is found.
pub fn find_nearest_position(layout: &Layout, cfg: &GridConfig, widget: &Widget, desired: Cell) -> Cell {
    match search_free_position(layout, cfg, widget.size(), desired, &widget.id) {
        Some(cell) => cell,
        None => {
            debug!(
                "no free cell for {} near ({}, {}); keeping ({}, {})",
                widget.id, desired.x, desired.y, widget.x, widget.y
            );
            widget.origin()
        }
    }
}

/// Left edge of the first row below every other widget. Always free.
pub fn stack_below(layout: &Layout, exclude: &WidgetId) -> Cell {
    let y = layout
        .iter()
        .filter(|w| &w.id != exclude)
        .map(|w| w.y + w.h)
        .max()
        .unwrap_or(0);
    Cell { x: 0, y }
}

/// Relocate widgets that overlap an earlier widget in layout order.
/// Earlier widgets keep their place; later ones move to the nearest free cell.
/// Returns the ids that moved.
pub fn resolve_overlaps(layout: &mut Layout, cfg: &GridConfig) -> Vec<WidgetId> {
    let mut moved = Vec::new();
    let mut settled = Layout::new();

    for widget in layout.widgets().to_vec() {
        let rect = widget.rect();
        if has_collision_excluding(&rect, &settled, &[]) {
            let cell = search_free_position(&settled, cfg, widget.size(), widget.origin(), &widget.id)
                .unwrap_or_else(|| stack_below(&settled, &widget.id));
            debug!(
                "{} overlapped on load; moved ({}, {}) -> ({}, {})",
                widget.id, widget.x, widget.y, cell.x, cell.y
            );
            if let Some(w) = layout.get_mut(&widget.id) {
                w.move_to(cell);
            }
            moved.push(widget.id.clone());
        }
        if let Some(w) = layout.get(&widget.id) {
            settled.push(w.clone());
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(id: &str, x: i32, y: i32, w: i32, h: i32) -> Widget {
        Widget::new(WidgetId::new(id), "pie", RectI { x, y, w, h })
    }

    #[test]
    fn test_desired_position_accepted_when_free() {
        let cfg = GridConfig::default();
        let layout = Layout::new();
        let found = search_free_position(&layout, &cfg, SizeI { w: 4, h: 2 }, Cell { x: 0, y: 0 }, &WidgetId::new("new"));
        assert_eq!(found, Some(Cell { x: 0, y: 0 }));
    }

    #[test]
    fn test_ring_scan_order() {
        // A at (0,0,2,2) wants (1,0), B sits at (1,0,2,2).
        // Ring 1 is fully blocked or out of bounds; ring 2 first hits (3,0).
        let cfg = GridConfig::default();
        let layout = Layout::from_widgets(vec![widget("a", 0, 0, 2, 2), widget("b", 1, 0, 2, 2)]);
        let a = layout.get(&WidgetId::new("a")).cloned().unwrap();
        assert_eq!(find_nearest_position(&layout, &cfg, &a, Cell { x: 1, y: 0 }), Cell { x: 3, y: 0 });
    }

    #[test]
    fn test_ring_prefers_upper_rows_first() {
        // Every ring-1 cell around (4,4) still overlaps the blocker.
        // Ring 2 starts at its top row, so (2,2) wins over (6,4) or (4,6).
        let cfg = GridConfig::default();
        let layout = Layout::from_widgets(vec![widget("blocker", 4, 4, 2, 2)]);
        let found = search_free_position(&layout, &cfg, SizeI { w: 2, h: 2 }, Cell { x: 4, y: 4 }, &WidgetId::new("probe"));
        assert_eq!(found, Some(Cell { x: 2, y: 2 }));
    }

    #[test]
    fn test_search_respects_right_edge() {
        let cfg = GridConfig::default();
        let layout = Layout::new();
        let found = search_free_position(&layout, &cfg, SizeI { w: 4, h: 2 }, Cell { x: 10, y: 0 }, &WidgetId::new("new"));
        // Ring 1 row dy=-1 is out of bounds, dy=0 gives (9,0) and (11,0): both too wide.
        // Ring 1 dy=1: (9,1),(10,1),(11,1) too wide. Ring 2 dy=0 gives (8,0).
        assert_eq!(found, Some(Cell { x: 8, y: 0 }));
    }

    #[test]
    fn test_exhausted_search_keeps_original_position() {
        let cfg = GridConfig { max_rows: 2, columns: 2, min_span: 1, min_cells: 1, ..GridConfig::default() };
        let layout = Layout::from_widgets(vec![
            widget("wall", 0, 0, 2, 3),
            widget("a", 0, 5, 2, 1),
        ]);
        let a = layout.get(&WidgetId::new("a")).cloned().unwrap();
        // Radius 1 only: every ring cell is occupied, negative, or too wide.
        assert_eq!(search_free_position(&layout, &cfg, a.size(), Cell { x: 0, y: 1 }, &a.id), None);
        assert_eq!(find_nearest_position(&layout, &cfg, &a, Cell { x: 0, y: 1 }), Cell { x: 0, y: 5 });
    }

    #[test]
    fn test_search_is_deterministic() {
        let cfg = GridConfig::default();
        let layout = Layout::from_widgets(vec![
            widget("a", 0, 0, 6, 3),
            widget("b", 6, 0, 6, 3),
            widget("c", 2, 3, 4, 2),
        ]);
        let size = SizeI { w: 4, h: 2 };
        let first = search_free_position(&layout, &cfg, size, Cell { x: 2, y: 1 }, &WidgetId::new("x"));
        for _ in 0..5 {
            assert_eq!(search_free_position(&layout, &cfg, size, Cell { x: 2, y: 1 }, &WidgetId::new("x")), first);
        }
    }

    #[test]
    fn test_stack_below() {
        let layout = Layout::from_widgets(vec![widget("a", 0, 0, 4, 3), widget("b", 4, 1, 2, 4)]);
        assert_eq!(stack_below(&layout, &WidgetId::new("none")), Cell { x: 0, y: 5 });
        assert_eq!(stack_below(&layout, &WidgetId::new("b")), Cell { x: 0, y: 3 });
    }

    #[test]
    fn test_resolve_overlaps_moves_later_widgets() {
        let cfg = GridConfig::default();
        let mut layout = Layout::from_widgets(vec![
            widget("a", 0, 0, 4, 2),
            widget("b", 2, 0, 4, 2),
            widget("c", 8, 0, 4, 2),
        ]);
        let moved = resolve_overlaps(&mut layout, &cfg);
        assert_eq!(moved, vec![WidgetId::new("b")]);
        assert_eq!(layout.get(&WidgetId::new("a")).unwrap().origin(), Cell { x: 0, y: 0 });
        assert_eq!(layout.get(&WidgetId::new("c")).unwrap().origin(), Cell { x: 8, y: 0 });
        assert!(layout.is_valid(&cfg));
    }
}
