// Drag and drop of whole widgets.
//
// The layout is not touched while the pointer moves; everything happens on
// drop. Dropping onto another widget swaps the two when both fit, otherwise
// each goes to the nearest free cell around the other's old spot. Dropping
// onto empty grid moves the widget there, or as close as the grid allows.

use log::debug;

use super::Outcome;
use crate::grid::collision::has_collision_excluding;
use crate::grid::placement::find_nearest_position;
use crate::grid::{Cell, GridConfig};
use crate::widget::{Layout, WidgetId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub widget: WidgetId,
    /// Where the widget was when the drag began.
    pub origin: Cell,
    /// Widget currently under the pointer, if any.
    pub hover: Option<WidgetId>,
}

pub fn start_drag(layout: &Layout, id: &WidgetId) -> Option<DragSession> {
    let widget = layout.get(id)?;
    Some(DragSession { widget: id.clone(), origin: widget.origin(), hover: None })
}

pub fn drag_over(session: &mut DragSession, target: Option<&WidgetId>) -> Outcome {
    let target = target.filter(|t| **t != session.widget).cloned();
    session.hover = target.clone();
    Outcome::Hovering { widget: session.widget.clone(), target }
}

/// Drop the dragged widget onto `target`.
pub fn drop_on_widget(layout: &mut Layout, cfg: &GridConfig, session: &DragSession, target: &WidgetId) -> Outcome {
    let (Some(dragged), Some(other)) = (layout.get(&session.widget).cloned(), layout.get(target).cloned()) else {
        return Outcome::Unchanged;
    };
    if dragged.id == other.id {
        return Outcome::Unchanged;
    }

    let dragged_rect = dragged.rect().at(other.origin());
    let other_rect = other.rect().at(dragged.origin());
    let pair = [&dragged.id, &other.id];
    let swap_fits = cfg.in_bounds(&dragged_rect)
        && cfg.in_bounds(&other_rect)
        && !dragged_rect.overlaps(&other_rect)
        && !has_collision_excluding(&dragged_rect, layout, &pair)
        && !has_collision_excluding(&other_rect, layout, &pair);

    if swap_fits {
        if let Some(w) = layout.get_mut(&dragged.id) {
            w.move_to(other.origin());
        }
        if let Some(w) = layout.get_mut(&other.id) {
            w.move_to(dragged.origin());
        }
        debug!("swapped {} and {}", dragged.id, other.id);
        return Outcome::Swapped { dragged: dragged.id, target: other.id };
    }

    // One after the other, so the second search sees where the first landed.
    let dragged_to = find_nearest_position(layout, cfg, &dragged, other.origin());
    if let Some(w) = layout.get_mut(&dragged.id) {
        w.move_to(dragged_to);
    }
    let target_to = find_nearest_position(layout, cfg, &other, dragged.origin());
    if let Some(w) = layout.get_mut(&other.id) {
        w.move_to(target_to);
    }

    if dragged_to == dragged.origin() && target_to == other.origin() {
        return Outcome::Unchanged;
    }
    debug!(
        "swap of {} and {} blocked; relocated to ({}, {}) and ({}, {})",
        dragged.id, other.id, dragged_to.x, dragged_to.y, target_to.x, target_to.y
    );
    Outcome::Relocated { dragged: dragged.id, dragged_to, target: other.id, target_to }
}

/// Drop the dragged widget with its top-left corner on `cell`.
pub fn drop_on_cell(layout: &mut Layout, cfg: &GridConfig, session: &DragSession, cell: Cell) -> Outcome {
    let Some(widget) = layout.get(&session.widget).cloned() else {
        return Outcome::Unchanged;
    };

    let mut desired = cell;
    if desired.x + widget.w > cfg.columns {
        desired.x = (cfg.columns - widget.w).max(0);
    }

    let from = widget.origin();
    let to = find_nearest_position(layout, cfg, &widget, desired);
    if to == from {
        return Outcome::Unchanged;
    }
    if let Some(w) = layout.get_mut(&widget.id) {
        w.move_to(to);
    }
    debug!("moved {} to ({}, {})", widget.id, to.x, to.y);
    Outcome::Moved { widget: widget.id, from, to }
}

/// Abort the drag, putting the widget back where it started.
pub fn cancel_drag(layout: &mut Layout, session: &DragSession) -> Outcome {
    if let Some(w) = layout.get_mut(&session.widget) {
        w.move_to(session.origin);
    }
    Outcome::DragCancelled { widget: session.widget.clone() }
}
