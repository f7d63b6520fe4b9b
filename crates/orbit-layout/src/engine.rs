#![forbid(unsafe_code)]

//! Ring-search layout engine.
//!
//! # Algorithm
//!
//! Members are placed in input order. The first member sits at the origin.
//! Every later member walks the candidate slots of [`RingSlots`] and takes the
//! first one that keeps [`LayoutConfig::min_separation`] from every member
//! placed before it.
//!
//! # Invariants
//!
//! 1. Same ordered input and config ⇒ identical [`Layout`].
//! 2. A member placed on a ring is at least `min_separation` away from every
//!    member placed before it (and, by induction, from every ring-placed
//!    member after it).
//! 3. The search for one member probes at most `max_ring_probe_attempts`
//!    slots, summed over all rings it visits.
//!
//! # Failure Modes
//!
//! - Probe budget exhausted: the member goes to [`fallback_position`], which
//!   does **not** check separation. Each occurrence is logged and listed in
//!   [`LayoutReport::fallback`]; [`LayoutReport::is_strict`] is false as soon as
//!   one member took that path.
//! - Duplicate identifier: the first occurrence keeps its placement, later
//!   ones are skipped and listed in [`LayoutReport::duplicates`].

use std::borrow::Borrow;
use std::hash::Hash;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug_span, field, warn};

use crate::config::LayoutConfig;
use crate::geometry::Point;
use crate::member::{Member, MemberId};
use crate::ring::{RingSlot, RingSlots, is_free};

/// How a member ended up at its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementOrigin {
    /// First member, pinned to the origin.
    Anchor,
    /// Free slot found by the ring search.
    Ring { ring: u32, slot: u32 },
    /// Probe budget exhausted; separation not guaranteed.
    Fallback,
}

/// World-space centre assigned to one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub id: MemberId,
    pub position: Point,
    pub origin: PlacementOrigin,
}

impl Placement {
    #[inline]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.position.y
    }
}

/// Bookkeeping for one layout pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutReport {
    /// Input length, duplicates included.
    pub members: usize,
    /// Members placed by the ring search (anchor excluded).
    pub placed_on_rings: usize,
    /// Members placed at the fallback position, in input order.
    pub fallback: Vec<MemberId>,
    /// Identifiers that appeared more than once; only the first was placed.
    pub duplicates: Vec<MemberId>,
    /// Slots probed over the whole pass.
    pub total_probes: u64,
    /// Largest ring index any member landed on (0 when none did).
    pub outermost_ring: u32,
}

impl LayoutReport {
    #[must_use]
    pub fn fallback_count(&self) -> usize {
        self.fallback.len()
    }

    /// True when no member used the fallback, i.e. the separation invariant
    /// holds for the whole layout.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.fallback.is_empty()
    }
}

/// Placements for an ordered member list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    placements: Vec<Placement>,
    index: FxHashMap<MemberId, usize>,
    report: LayoutReport,
}

impl Layout {
    /// Placement for `id`, if that member was laid out.
    pub fn get<Q>(&self, id: &Q) -> Option<&Placement>
    where
        MemberId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(id).map(|&idx| &self.placements[idx])
    }

    /// Position of `id` within [`placements`](Self::placements).
    pub fn index_of<Q>(&self, id: &Q) -> Option<usize>
    where
        MemberId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(id).copied()
    }

    /// Placements in input order (duplicates removed).
    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter()
    }

    #[must_use]
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    #[must_use]
    pub fn report(&self) -> &LayoutReport {
        &self.report
    }

    /// Smallest centre-to-centre distance over all pairs, `None` below two
    /// placements.
    #[must_use]
    pub fn min_pairwise_distance(&self) -> Option<f64> {
        let mut best: Option<f64> = None;
        for (i, a) in self.placements.iter().enumerate() {
            for b in &self.placements[i + 1..] {
                let d = a.position.distance(b.position);
                best = Some(best.map_or(d, |cur| cur.min(d)));
            }
        }
        best
    }
}

/// Deterministic fallback position for the member at `index` of `total`.
///
/// Spreads members over `fallback_ring_count` circles starting at
/// `fallback_base_radius`, at angle `index * 360 / total` degrees.
#[must_use]
pub fn fallback_position(index: usize, total: usize, config: &LayoutConfig) -> Point {
    let total = total.max(1) as f64;
    let angle = index as f64 * 360.0 / total;
    let circle = (index % config.fallback_ring_count.max(1) as usize) as f64;
    let radius = config.fallback_base_radius + circle * config.fallback_ring_step;
    Point::from_polar_degrees(radius, angle)
}

fn search_slot(placed: &[Point], config: &LayoutConfig, probes: &mut u64) -> Option<RingSlot> {
    let min_separation = config.min_separation();
    RingSlots::new(config)
        .take(config.max_ring_probe_attempts as usize)
        .find(|slot| {
            *probes += 1;
            is_free(slot.position, placed, min_separation)
        })
}

/// Lay out `members` in order.
///
/// Never fails: an exhausted probe budget degrades to the fallback position
/// and is recorded in the [`LayoutReport`]. The config is expected to have
/// passed [`LayoutConfig::validate`].
pub fn layout<M: Member>(members: &[M], config: &LayoutConfig) -> Layout {
    let span = debug_span!(
        "layout.compute",
        members = members.len(),
        fallback = field::Empty,
        total_probes = field::Empty
    );
    let _guard = span.enter();

    let total = members.len();
    let mut placements: Vec<Placement> = Vec::with_capacity(total);
    let mut points: Vec<Point> = Vec::with_capacity(total);
    let mut index: FxHashMap<MemberId, usize> = FxHashMap::default();
    index.reserve(total);
    let mut report = LayoutReport {
        members: total,
        ..LayoutReport::default()
    };

    for (member_index, member) in members.iter().enumerate() {
        let id = member.member_id();
        if index.contains_key(id) {
            warn!(member = %id, index = member_index, "duplicate member id skipped");
            report.duplicates.push(id.clone());
            continue;
        }

        let (position, origin) = if points.is_empty() {
            (Point::ORIGIN, PlacementOrigin::Anchor)
        } else {
            match search_slot(&points, config, &mut report.total_probes) {
                Some(slot) => {
                    report.placed_on_rings += 1;
                    report.outermost_ring = report.outermost_ring.max(slot.ring);
                    (
                        slot.position,
                        PlacementOrigin::Ring {
                            ring: slot.ring,
                            slot: slot.slot,
                        },
                    )
                }
                None => {
                    warn!(
                        member = %id,
                        index = member_index,
                        budget = config.max_ring_probe_attempts,
                        "ring search exhausted; using fallback placement"
                    );
                    report.fallback.push(id.clone());
                    (
                        fallback_position(member_index, total, config),
                        PlacementOrigin::Fallback,
                    )
                }
            }
        };

        index.insert(id.clone(), placements.len());
        points.push(position);
        placements.push(Placement {
            id: id.clone(),
            position,
            origin,
        });
    }

    span.record("fallback", report.fallback.len());
    span.record("total_probes", report.total_probes);

    Layout {
        placements,
        index,
        report,
    }
}
