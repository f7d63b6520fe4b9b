#![forbid(unsafe_code)]

//! Projection of a [`Layout`] through the current view into screen space.
//!
//! World coordinates are centred on the viewport: the world origin maps to the
//! viewport centre plus the pan offset. A placement `p` lands at
//! `center + p * zoom + pan`; its item rectangle is centred on that point with
//! side `item_size * zoom`.
//!
//! The frame also describes the equivalent container transform
//! (`translate(pan) scale(zoom)`) for hosts that let the compositor move the
//! whole plane instead of positioning each item.

use orbit_layout::{Layout, Member, MemberId, Point};
use serde::{Deserialize, Serialize};

use crate::config::ViewportConfig;
use crate::input::{ScreenPoint, Surface};
use crate::reducer::ViewState;

/// Visible area in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn center(self) -> ScreenPoint {
        ScreenPoint::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    #[default]
    EaseOut,
}

impl Easing {
    #[must_use]
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::EaseOut => "ease-out",
        }
    }
}

/// Easing applied to discrete transform changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub duration_ms: u32,
    pub easing: Easing,
}

/// Transform applied to the whole plane container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    /// `None` while dragging: the plane must track the pointer without lag.
    pub transition: Option<Transition>,
}

impl PlaneTransform {
    /// CSS `transform` value.
    #[must_use]
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.translate_x, self.translate_y, self.scale
        )
    }

    /// CSS `transition` value.
    #[must_use]
    pub fn css_transition(&self) -> String {
        match self.transition {
            Some(t) if t.duration_ms > 0 => format!(
                "transform {}s {}",
                f64::from(t.duration_ms) / 1000.0,
                t.easing.as_css()
            ),
            _ => "none".to_owned(),
        }
    }
}

/// One member as it appears on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderItem {
    pub id: MemberId,
    /// Index in the member list; drives the enter animation stagger.
    pub index: usize,
    pub screen_center: ScreenPoint,
    pub left: f64,
    pub top: f64,
    /// Rendered side length (`item_size * zoom`).
    pub size: f64,
    pub enter_delay_ms: u64,
}

impl RenderItem {
    /// Whether `point` falls inside the item's circle.
    #[must_use]
    pub fn contains(&self, point: ScreenPoint) -> bool {
        self.screen_center.distance(point) <= self.size / 2.0
    }
}

/// Everything a host needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: ViewportSize,
    pub transform: PlaneTransform,
    pub items: Vec<RenderItem>,
    /// Size of the member list, placed or not.
    pub member_count: usize,
}

impl RenderFrame {
    /// Surface under a screen point.
    ///
    /// Later items draw on top of earlier ones, so the search runs backwards.
    #[must_use]
    pub fn hit_test(&self, x: f64, y: f64) -> Surface {
        let point = ScreenPoint::new(x, y);
        self.items
            .iter()
            .rev()
            .find(|item| item.contains(point))
            .map_or(Surface::Background, |item| Surface::Item(item.id.clone()))
    }

    #[must_use]
    pub fn item(&self, id: &str) -> Option<&RenderItem> {
        self.items.iter().find(|item| item.id.as_str() == id)
    }
}

/// World position to screen position.
#[must_use]
pub fn world_to_screen(world: Point, view: &ViewState, size: ViewportSize) -> ScreenPoint {
    let center = size.center();
    ScreenPoint::new(
        center.x + world.x * view.zoom + view.pan_x,
        center.y + world.y * view.zoom + view.pan_y,
    )
}

/// Inverse of [`world_to_screen`]. Zoom is never zero once clamped.
#[must_use]
pub fn screen_to_world(screen: ScreenPoint, view: &ViewState, size: ViewportSize) -> Point {
    let center = size.center();
    Point::new(
        (screen.x - center.x - view.pan_x) / view.zoom,
        (screen.y - center.y - view.pan_y) / view.zoom,
    )
}

/// Build the render frame for `members` as placed by `layout`.
///
/// Members without a placement are skipped; a repeated id is drawn once, at
/// its first position in the list.
#[must_use]
pub fn project<M: Member>(
    members: &[M],
    layout: &Layout,
    view: ViewState,
    size: ViewportSize,
    config: &ViewportConfig,
    dragging: bool,
) -> RenderFrame {
    let side = config.item_size * view.zoom;
    let mut drawn = vec![false; layout.len()];
    let mut items = Vec::with_capacity(layout.len());

    for (index, member) in members.iter().enumerate() {
        let id = member.member_id();
        let Some(slot) = layout.index_of(id) else {
            continue;
        };
        if std::mem::replace(&mut drawn[slot], true) {
            continue;
        }
        let placement = &layout.placements()[slot];
        let screen_center = world_to_screen(placement.position, &view, size);
        items.push(RenderItem {
            id: id.clone(),
            index,
            screen_center,
            left: screen_center.x - side / 2.0,
            top: screen_center.y - side / 2.0,
            size: side,
            enter_delay_ms: index as u64 * u64::from(config.enter_stagger_ms),
        });
    }

    let transition = (!dragging).then_some(Transition {
        duration_ms: config.transition_ms,
        easing: Easing::EaseOut,
    });

    RenderFrame {
        viewport: size,
        transform: PlaneTransform {
            translate_x: view.pan_x,
            translate_y: view.pan_y,
            scale: view.zoom,
            transition,
        },
        items,
        member_count: members.len(),
    }
}
