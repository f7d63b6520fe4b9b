#![forbid(unsafe_code)]

//! Caller-side memoization of [`layout`].
//!
//! The engine itself is stateless. Hosts that receive a fresh member list on
//! every upstream refresh wrap it in a [`LayoutMemo`], which recomputes only
//! when the ordered identifier sequence or the config actually changed.

use tracing::trace;

use crate::config::LayoutConfig;
use crate::engine::{Layout, layout};
use crate::member::{Member, MemberId};

/// Hit/miss counters for a [`LayoutMemo`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoized layout keyed on the ordered id sequence and config.
#[derive(Debug, Clone)]
pub struct LayoutMemo {
    config: LayoutConfig,
    key: Option<Vec<MemberId>>,
    layout: Layout,
    stats: MemoStats,
}

impl LayoutMemo {
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self {
            config,
            key: None,
            layout: Layout::default(),
            stats: MemoStats::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Replace the config; the next [`LayoutMemo::layout`] call recomputes.
    pub fn set_config(&mut self, config: LayoutConfig) {
        if config != self.config {
            self.config = config;
            self.key = None;
        }
    }

    #[must_use]
    pub const fn stats(&self) -> MemoStats {
        self.stats
    }

    /// Last computed layout (empty before the first call).
    #[must_use]
    pub const fn current(&self) -> &Layout {
        &self.layout
    }

    /// Layout for `members`, recomputed only when their ids changed.
    pub fn layout<M: Member>(&mut self, members: &[M]) -> &Layout {
        let unchanged = self.key.as_ref().is_some_and(|key| {
            key.len() == members.len()
                && key
                    .iter()
                    .zip(members)
                    .all(|(cached, member)| cached == member.member_id())
        });

        if unchanged {
            self.stats.hits += 1;
            trace!(members = members.len(), "layout memo hit");
        } else {
            self.stats.misses += 1;
            trace!(members = members.len(), "layout memo miss");
            self.layout = layout(members, &self.config);
            self.key = Some(members.iter().map(|m| m.member_id().clone()).collect());
        }
        &self.layout
    }
}

#[cfg(test)]
mod tests {
    use super::{LayoutMemo, MemoStats};
    use crate::config::LayoutConfig;
    use crate::member::MemberId;

    fn ids(names: &[&str]) -> Vec<MemberId> {
        names.iter().map(|n| MemberId::new(n)).collect()
    }

    #[test]
    fn same_sequence_is_a_hit() {
        let mut memo = LayoutMemo::new(LayoutConfig::default());
        memo.layout(&ids(&["a", "b"]));
        memo.layout(&ids(&["a", "b"]));
        assert_eq!(memo.stats(), MemoStats { hits: 1, misses: 1 });
        assert_eq!(memo.current().len(), 2);
    }

    #[test]
    fn reorder_or_growth_recomputes() {
        let mut memo = LayoutMemo::new(LayoutConfig::default());
        memo.layout(&ids(&["a", "b"]));
        memo.layout(&ids(&["b", "a"]));
        memo.layout(&ids(&["b", "a", "c"]));
        assert_eq!(memo.stats().misses, 3);
        assert_eq!(memo.current().len(), 3);
    }

    #[test]
    fn config_change_invalidates() {
        let mut memo = LayoutMemo::new(LayoutConfig::default());
        memo.layout(&ids(&["a", "b"]));
        memo.set_config(LayoutConfig {
            padding: 30.0,
            ..LayoutConfig::default()
        });
        let out = memo.layout(&ids(&["a", "b"]));
        let b = out.get("b").expect("b placed");
        assert!((b.position.magnitude() - 190.0).abs() < 1e-9);
        assert_eq!(memo.stats().misses, 2);
    }

    #[test]
    fn empty_first_call_is_a_miss() {
        let mut memo = LayoutMemo::new(LayoutConfig::default());
        assert!(memo.layout::<MemberId>(&[]).is_empty());
        assert!(memo.layout::<MemberId>(&[]).is_empty());
        assert_eq!(memo.stats(), MemoStats { hits: 1, misses: 1 });
    }
}
