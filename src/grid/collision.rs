// Collision detection between widgets.
//
// Dashboards hold a few dozen widgets at most, so a linear scan per query is
// enough; there is no spatial index.

use super::RectI;
use crate::widget::{Layout, Widget, WidgetId};

/// Whether two distinct widgets overlap. A widget never overlaps itself.
pub fn overlaps(a: &Widget, b: &Widget) -> bool {
    a.id != b.id && a.rect().overlaps(&b.rect())
}

/// Whether `candidate` overlaps any widget in `layout` other than `exclude`.
pub fn has_collision(candidate: &RectI, layout: &Layout, exclude: &WidgetId) -> bool {
    first_collision(candidate, layout, &[exclude]).is_some()
}

/// Like [`has_collision`], skipping every id in `exclude`.
pub fn has_collision_excluding(candidate: &RectI, layout: &Layout, exclude: &[&WidgetId]) -> bool {
    first_collision(candidate, layout, exclude).is_some()
}

/// The first widget (in layout order) that `candidate` overlaps.
pub fn first_collision<'a>(
    candidate: &RectI,
    layout: &'a Layout,
    exclude: &[&WidgetId],
) -> Option<&'a Widget> {
    layout
        .iter()
        .filter(|w| !exclude.contains(&&w.id))
        .find(|w| candidate.overlaps(&w.rect()))
}
