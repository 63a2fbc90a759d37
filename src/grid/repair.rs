// Bounds and minimum-area repair.
//
// `repair_rect` maps any geometry to the nearest one satisfying the grid's
// bounds, span limits and minimum area, or gives up. Its output is a fixed
// point: repairing a repaired rect changes nothing.

use super::{GridConfig, RectI, SizeI};

fn div_ceil(a: i32, b: i32) -> i32 {
    (a + b - 1) / b
}

/// Grow the smaller dimension (height on ties) until `w * h >= min_cells`.
pub fn grow_to_min_area(size: SizeI, cfg: &GridConfig) -> SizeI {
    if size.area() >= cfg.min_cells {
        return size;
    }
    let w = size.w.max(1);
    let h = size.h.max(1);
    if w < h {
        SizeI { w: div_ceil(cfg.min_cells, h), h }
    } else {
        SizeI { w, h: div_ceil(cfg.min_cells, w) }
    }
}

/// Repair a widget geometry. Returns `None` when no geometry within the span
/// limits can meet the minimum area.
pub fn repair_rect(rect: RectI, cfg: &GridConfig) -> Option<RectI> {
    let SizeI { mut w, mut h } = grow_to_min_area(rect.size(), cfg);
    let mut x = rect.x;

    // Shift left before shrinking.
    if x + w > cfg.columns {
        x = (cfg.columns - w).max(0);
        if x + w > cfg.columns {
            w = cfg.columns - x;
        }
    }

    w = w.clamp(cfg.min_span, cfg.columns);
    h = h.clamp(cfg.min_span, cfg.max_height);

    if w * h < cfg.min_cells {
        let grown = grow_to_min_area(SizeI { w, h }, cfg);
        w = grown.w.min(cfg.columns);
        h = grown.h.min(cfg.max_height);
    }

    let x = x.clamp(0, cfg.columns - w);
    let y = rect.y.max(0);
    let repaired = RectI { x, y, w, h };

    if cfg.in_bounds(&repaired) && cfg.size_allowed(repaired.size()) {
        Some(repaired)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grow_smaller_dimension() {
        let cfg = GridConfig::default();
        assert_eq!(grow_to_min_area(SizeI { w: 1, h: 2 }, &cfg), SizeI { w: 2, h: 2 });
        assert_eq!(grow_to_min_area(SizeI { w: 3, h: 1 }, &cfg), SizeI { w: 3, h: 2 });
        assert_eq!(grow_to_min_area(SizeI { w: 1, h: 1 }, &cfg), SizeI { w: 1, h: 4 });
        assert_eq!(grow_to_min_area(SizeI { w: 4, h: 2 }, &cfg), SizeI { w: 4, h: 2 });
    }

    #[test]
    fn test_repair_shifts_left_to_fit() {
        let cfg = GridConfig::default();
        let repaired = repair_rect(RectI { x: 10, y: 0, w: 4, h: 1 }, &cfg);
        assert_eq!(repaired, Some(RectI { x: 8, y: 0, w: 4, h: 2 }));
    }

    #[test]
    fn test_repair_shrinks_too_wide() {
        let cfg = GridConfig::default();
        let repaired = repair_rect(RectI { x: 3, y: 2, w: 15, h: 3 }, &cfg);
        assert_eq!(repaired, Some(RectI { x: 0, y: 2, w: 12, h: 3 }));
    }

    #[test]
    fn test_repair_clamps_height_and_negatives() {
        let cfg = GridConfig::default();
        let repaired = repair_rect(RectI { x: -3, y: -2, w: 2, h: 40 }, &cfg);
        assert_eq!(repaired, Some(RectI { x: 0, y: 0, w: 2, h: 20 }));
    }

    #[test]
    fn test_repair_leaves_valid_rect_alone() {
        let cfg = GridConfig::default();
        let rect = RectI { x: 4, y: 7, w: 5, h: 3 };
        assert_eq!(repair_rect(rect, &cfg), Some(rect));
    }

    #[test]
    fn test_repair_gives_up_when_area_unreachable() {
        // Two columns and two rows at most cannot reach nine cells.
        let cfg = GridConfig { columns: 2, max_height: 2, min_cells: 9, ..GridConfig::default() };
        assert_eq!(repair_rect(RectI { x: 0, y: 0, w: 2, h: 2 }, &cfg), None);
    }

    #[test]
    fn test_repair_is_idempotent() {
        let cfg = GridConfig::default();
        let samples = [
            RectI { x: 10, y: 0, w: 4, h: 1 },
            RectI { x: -1, y: 3, w: 1, h: 1 },
            RectI { x: 11, y: 9, w: 30, h: 0 },
            RectI { x: 5, y: 5, w: 1, h: 25 },
        ];
        for rect in samples {
            let once = repair_rect(rect, &cfg);
            assert_eq!(once.and_then(|r| repair_rect(r, &cfg)), once);
        }
    }
}
