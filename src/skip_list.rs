//! Rank-ordered skip list.
//!
//! An arena-backed skip list that keeps every [`Entry`] in rank order
//! (score descending, user ascending) alongside a hash index from user to
//! node. It is single-owner: mutation takes `&mut self` and there is no
//! internal locking. [`crate::Leaderboard`] wraps it in a lock for shared use.
//!
//! # Operations
//!
//! - `update(user, score)`: O(log n) expected - insert or relocate a user
//! - `remove(user)`: O(log n) expected
//! - `get(user)`: O(1) average - hash index lookup
//! - `rank(user)`: O(log n) expected - 1-based position via link spans
//! - `top_n(n)`: O(n) - level 0 walk from the head
//! - `page(offset, limit)`: O(log n + limit)
//!
//! # Structure
//!
//! Nodes live in a `Vec` and link to each other by index, with `NULL` as the
//! end marker. Slot 0 is the head sentinel, which carries a link at every
//! level up to the ceiling. Each link also stores its span: how many level 0
//! steps it jumps. A link to `NULL` spans to one past the last entry.
//!
//! ```text
//! Level 2: HEAD ----------------(3)---------------> C:15 --(1)------------> NULL
//! Level 1: HEAD --(1)--> A:20 ---------(2)--------> C:15 --(1)------------> NULL
//! Level 0: HEAD --(1)--> A:20 --(1)--> B:20 --(1)--> C:15 --(1)--> D:3 --(0)--> NULL
//! ```
//!
//! A score change never edits a node in place. The old node is unlinked and a
//! fresh one, with a freshly drawn height, is linked at the new position.

use std::fmt;
use std::mem;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use smallvec::smallvec;

use crate::entry::Entry;
use crate::entry::UserId;
use crate::level::LevelGenerator;
use crate::level::MAX_LEVEL_CEILING;

/// Node index type. u32 saves space vs usize on 64-bit.
type Idx = u32;

/// Null index marker.
const NULL: Idx = Idx::MAX;

/// The head sentinel always lives in slot 0.
const HEAD: Idx = 0;

/// A forward link at one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Link {
    next: Idx,
    /// Number of level 0 steps from this node to `next`.
    span: usize,
}

impl Link {
    const END: Link = Link {
        next: NULL,
        span: 0,
    };
}

struct Node {
    entry: Entry,
    /// One link per level this node participates in.
    links: SmallVec<[Link; 4]>,
}

impl Node {
    fn new(entry: Entry, level: usize) -> Node {
        return Node {
            entry,
            links: smallvec![Link::END; level],
        };
    }

    fn level(&self) -> usize {
        return self.links.len();
    }
}

/// Predecessors of a search target at each level, plus the rank of each
/// predecessor. Slots at or above the board's current level hold the head.
struct Path {
    preds: [Idx; MAX_LEVEL_CEILING],
    ranks: [usize; MAX_LEVEL_CEILING],
}

/// Single-owner ranking index.
pub struct RankIndex {
    /// Arena of nodes. Slot 0 is the head.
    nodes: Vec<Node>,
    /// Slots released by removals, reused before growing the arena.
    free_list: Vec<Idx>,
    /// Each ranked user's node.
    by_user: FxHashMap<UserId, Idx>,
    /// Highest level currently in use, at least 1.
    level: usize,
    /// Number of ranked users.
    len: usize,
    levels: LevelGenerator,
}

impl RankIndex {
    /// Empty index with the default ceiling and probability, seeded from the
    /// OS entropy source.
    pub fn new() -> RankIndex {
        return RankIndex::with_levels(LevelGenerator::from_entropy(
            crate::level::DEFAULT_MAX_LEVEL,
            crate::level::DEFAULT_P_FACTOR,
        ));
    }

    pub fn with_levels(levels: LevelGenerator) -> RankIndex {
        let head = Node::new(Entry::default(), levels.max_level());
        return RankIndex {
            nodes: vec![head],
            free_list: Vec::new(),
            by_user: FxHashMap::default(),
            level: 1,
            len: 0,
            levels,
        };
    }

    pub fn len(&self) -> usize {
        return self.len;
    }

    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    /// Highest level currently in use.
    pub fn level(&self) -> usize {
        return self.level;
    }

    /// Configured tower height ceiling.
    pub fn max_level(&self) -> usize {
        return self.levels.max_level();
    }

    // --- Node access helpers ---

    fn node(&self, idx: Idx) -> &Node {
        return &self.nodes[idx as usize];
    }

    fn node_mut(&mut self, idx: Idx) -> &mut Node {
        return &mut self.nodes[idx as usize];
    }

    fn alloc_node(&mut self, entry: Entry, level: usize) -> Idx {
        if let Some(idx) = self.free_list.pop() {
            let node = self.node_mut(idx);
            node.entry = entry;
            node.links.clear();
            node.links.resize(level, Link::END);
            return idx;
        }
        let idx = self.nodes.len() as Idx;
        self.nodes.push(Node::new(entry, level));
        return idx;
    }

    /// Free a slot, handing back the entry it held.
    fn release_node(&mut self, idx: Idx) -> Entry {
        self.free_list.push(idx);
        let node = self.node_mut(idx);
        node.links.clear();
        return mem::take(&mut node.entry);
    }

    // --- Invariant checking ---

    #[cfg(debug_assertions)]
    fn check_invariants(&self) {
        let ceiling = self.max_level();
        assert!(
            (1..=ceiling).contains(&self.level),
            "INVARIANT VIOLATED: level={} outside 1..={}",
            self.level,
            ceiling
        );

        // Level 0: strict rank order, index agreement, length.
        let mut rank_of = FxHashMap::default();
        rank_of.insert(HEAD, 0usize);
        let mut prev: Option<&Entry> = None;
        let mut idx = self.node(HEAD).links[0].next;
        let mut count = 0usize;
        while idx != NULL {
            let node = self.node(idx);
            count += 1;
            if let Some(prev) = prev {
                assert!(
                    prev.ranks_before(&node.entry),
                    "INVARIANT VIOLATED: {:?} listed before {:?}",
                    prev,
                    node.entry
                );
            }
            assert_eq!(
                self.by_user.get(node.entry.user.as_str()),
                Some(&idx),
                "INVARIANT VIOLATED: index disagrees for {:?}",
                node.entry
            );
            assert!(
                (1..=ceiling).contains(&node.level()),
                "INVARIANT VIOLATED: node level {} outside 1..={}",
                node.level(),
                ceiling
            );
            rank_of.insert(idx, count);
            prev = Some(&node.entry);
            idx = node.links[0].next;
        }
        assert_eq!(count, self.len, "INVARIANT VIOLATED: chain={} != len={}", count, self.len);
        assert_eq!(
            self.by_user.len(),
            self.len,
            "INVARIANT VIOLATED: index={} != len={}",
            self.by_user.len(),
            self.len
        );

        // Every level: towers are contiguous and spans match level 0 distances.
        for level in 0..self.level {
            let expected = rank_of
                .keys()
                .filter(|&&idx| idx != HEAD && self.node(idx).level() > level)
                .count();
            let mut seen = 0usize;
            let mut idx = HEAD;
            loop {
                let link = self.node(idx).links[level];
                let from = rank_of[&idx];
                let to = if link.next == NULL { self.len } else { rank_of[&link.next] };
                assert_eq!(
                    link.span,
                    to - from,
                    "INVARIANT VIOLATED: span at level {} from rank {}",
                    level,
                    from
                );
                if link.next == NULL {
                    break;
                }
                assert!(
                    self.node(link.next).level() > level,
                    "INVARIANT VIOLATED: node linked above its height at level {}",
                    level
                );
                seen += 1;
                idx = link.next;
            }
            assert_eq!(
                seen, expected,
                "INVARIANT VIOLATED: level {} links {} of {} towers",
                level, seen, expected
            );
        }

        if self.level > 1 {
            assert_ne!(
                self.node(HEAD).links[self.level - 1].next,
                NULL,
                "INVARIANT VIOLATED: empty top level {}",
                self.level
            );
        }
        for level in self.level..ceiling {
            assert_eq!(
                self.node(HEAD).links[level].next,
                NULL,
                "INVARIANT VIOLATED: head linked above level {}",
                self.level
            );
        }
    }

    #[cfg(not(debug_assertions))]
    #[inline(always)]
    fn check_invariants(&self) {}

    // --- Core operations ---

    /// Walk down from the top level, stopping at each level on the last node
    /// that ranks before `target`.
    fn search(&self, target: &Entry) -> Path {
        let mut path = Path {
            preds: [HEAD; MAX_LEVEL_CEILING],
            ranks: [0; MAX_LEVEL_CEILING],
        };
        let mut idx = HEAD;
        let mut rank = 0usize;
        for level in (0..self.level).rev() {
            loop {
                let link = self.node(idx).links[level];
                if link.next == NULL || !self.node(link.next).entry.ranks_before(target) {
                    break;
                }
                rank += link.span;
                idx = link.next;
            }
            path.preds[level] = idx;
            path.ranks[level] = rank;
        }
        return path;
    }

    /// Link a new node for `entry`. The user must not already be present.
    fn link(&mut self, entry: Entry) {
        let mut path = self.search(&entry);
        let height = self.levels.next_level();

        if height > self.level {
            let len = self.len;
            for level in self.level..height {
                path.preds[level] = HEAD;
                path.ranks[level] = 0;
                self.node_mut(HEAD).links[level] = Link {
                    next: NULL,
                    span: len,
                };
            }
            tracing::trace!(from = self.level, to = height, "raising skip list level");
            self.level = height;
        }

        let user = entry.user.clone();
        let new_idx = self.alloc_node(entry, height);
        let rank = path.ranks[0];

        for level in 0..height {
            let pred = path.preds[level];
            let old = self.node(pred).links[level];
            // Steps from pred to the insertion point.
            let before = rank - path.ranks[level];
            self.node_mut(new_idx).links[level] = Link {
                next: old.next,
                span: old.span - before,
            };
            self.node_mut(pred).links[level] = Link {
                next: new_idx,
                span: before + 1,
            };
        }

        // Links that now jump over the new node.
        for level in height..self.level {
            let pred = path.preds[level];
            self.node_mut(pred).links[level].span += 1;
        }

        self.by_user.insert(user, new_idx);
        self.len += 1;
    }

    /// Unlink a user's node, returning its entry.
    fn unlink(&mut self, user: &str) -> Option<Entry> {
        let target = *self.by_user.get(user)?;
        let path = self.search(&self.node(target).entry);
        debug_assert_eq!(self.node(path.preds[0]).links[0].next, target);

        for level in 0..self.level {
            let pred = path.preds[level];
            let old = self.node(pred).links[level];
            if old.next == target {
                let skip = self.node(target).links[level];
                self.node_mut(pred).links[level] = Link {
                    next: skip.next,
                    span: old.span + skip.span - 1,
                };
            } else {
                self.node_mut(pred).links[level].span -= 1;
            }
        }

        let before = self.level;
        while self.level > 1 && self.node(HEAD).links[self.level - 1].next == NULL {
            self.level -= 1;
        }
        if self.level != before {
            tracing::trace!(from = before, to = self.level, "shrinking skip list level");
        }

        self.by_user.remove(user);
        self.len -= 1;
        return Some(self.release_node(target));
    }

    /// Insert `user` at `score`, or move them there if already ranked.
    /// Returns the entry that was replaced, if any.
    pub fn update(&mut self, user: &str, score: i64) -> Option<Entry> {
        self.check_invariants();
        let previous = self.unlink(user);
        let user = match &previous {
            Some(old) => old.user.clone(),
            None => UserId::new(user),
        };
        self.link(Entry { user, score });
        self.check_invariants();
        return previous;
    }

    /// Like [`RankIndex::update`], taking ownership of a prepared entry.
    pub fn put(&mut self, entry: Entry) -> Option<Entry> {
        self.check_invariants();
        let previous = self.unlink(entry.user.as_str());
        self.link(entry);
        self.check_invariants();
        return previous;
    }

    /// Remove a user. Absent users are ignored.
    pub fn remove(&mut self, user: &str) -> Option<Entry> {
        self.check_invariants();
        let removed = self.unlink(user);
        self.check_invariants();
        return removed;
    }

    /// Drop every entry, keeping the arena's capacity.
    pub fn clear(&mut self) {
        let ceiling = self.max_level();
        self.nodes.truncate(1);
        self.node_mut(HEAD).links = smallvec![Link::END; ceiling];
        self.free_list.clear();
        self.by_user.clear();
        self.level = 1;
        self.len = 0;
        self.check_invariants();
    }

    pub fn get(&self, user: &str) -> Option<&Entry> {
        let idx = *self.by_user.get(user)?;
        return Some(&self.node(idx).entry);
    }

    pub fn contains(&self, user: &str) -> bool {
        return self.by_user.contains_key(user);
    }

    /// 1-based position of `user`, summing link spans on the way down.
    pub fn rank(&self, user: &str) -> Option<usize> {
        let target_idx = *self.by_user.get(user)?;
        let target = &self.node(target_idx).entry;

        let mut idx = HEAD;
        let mut rank = 0usize;
        for level in (0..self.level).rev() {
            loop {
                let link = self.node(idx).links[level];
                if link.next == NULL || target.ranks_before(&self.node(link.next).entry) {
                    break;
                }
                rank += link.span;
                idx = link.next;
            }
            if idx == target_idx {
                return Some(rank);
            }
        }

        // Unreachable while the index and chain agree.
        return None;
    }

    /// The node sitting at 1-based `rank`, or the head for rank 0.
    fn node_at_rank(&self, rank: usize) -> Idx {
        let mut idx = HEAD;
        let mut traversed = 0usize;
        for level in (0..self.level).rev() {
            loop {
                let link = self.node(idx).links[level];
                if link.next == NULL || traversed + link.span > rank {
                    break;
                }
                traversed += link.span;
                idx = link.next;
            }
            if traversed == rank {
                return idx;
            }
        }
        return NULL;
    }

    /// The first `n` entries in rank order.
    pub fn top_n(&self, n: usize) -> Vec<Entry> {
        let mut out = Vec::with_capacity(n.min(self.len));
        out.extend(self.iter().take(n).cloned());
        return out;
    }

    /// Up to `limit` entries starting after the first `offset`.
    pub fn page(&self, offset: usize, limit: usize) -> Vec<Entry> {
        if limit == 0 || offset >= self.len {
            return Vec::new();
        }
        let before = self.node_at_rank(offset);
        if before == NULL {
            return Vec::new();
        }
        let iter = RankIter {
            index: self,
            current: self.node(before).links[0].next,
        };
        let mut out = Vec::with_capacity(limit.min(self.len - offset));
        out.extend(iter.take(limit).cloned());
        return out;
    }

    /// Iterate over all entries in rank order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        return RankIter {
            index: self,
            current: self.node(HEAD).links[0].next,
        };
    }
}

impl Default for RankIndex {
    fn default() -> Self {
        return Self::new();
    }
}

impl Extend<Entry> for RankIndex {
    fn extend<I: IntoIterator<Item = Entry>>(&mut self, entries: I) {
        for entry in entries {
            self.put(entry);
        }
    }
}

impl fmt::Debug for RankIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_list().entries(self.iter()).finish();
    }
}

struct RankIter<'a> {
    index: &'a RankIndex,
    current: Idx,
}

impl<'a> Iterator for RankIter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NULL {
            return None;
        }
        let node = self.index.node(self.current);
        self.current = node.links[0].next;
        return Some(&node.entry);
    }
}
