//! Thread-safe leaderboard.
//!
//! The whole [`RankIndex`] sits behind one reader/writer lock. Writers hold
//! it exclusively for a full search-and-splice, so readers only ever observe
//! a board between complete mutations. Readers share it freely.

use parking_lot::RwLock;
use tracing::debug;
use tracing::trace;

use crate::board::Board;
use crate::config::BoardConfig;
use crate::config::ConfigError;
use crate::entry::Entry;
use crate::skip_list::RankIndex;

/// A named, concurrently accessible ranked board.
pub struct Leaderboard {
    name: String,
    index: RwLock<RankIndex>,
}

impl Leaderboard {
    /// Board with default settings and an entropy-seeded level generator.
    pub fn new() -> Leaderboard {
        return Leaderboard::build(BoardConfig::default());
    }

    /// Board tuned by `config`, which is validated first.
    pub fn with_config(config: BoardConfig) -> Result<Leaderboard, ConfigError> {
        config.validate()?;
        return Ok(Leaderboard::build(config));
    }

    fn build(config: BoardConfig) -> Leaderboard {
        debug!(
            board = %config.name,
            max_level = config.max_level,
            p_factor = config.p_factor,
            seeded = config.seed.is_some(),
            "creating leaderboard"
        );
        let index = RankIndex::with_levels(config.level_generator());
        return Leaderboard {
            name: config.name,
            index: RwLock::new(index),
        };
    }

    pub fn name(&self) -> &str {
        return &self.name;
    }

    /// Up to `limit` entries after skipping the top `offset`.
    pub fn page(&self, offset: usize, limit: usize) -> Vec<Entry> {
        return self.index.read().page(offset, limit);
    }

    /// Replay many updates under a single write lock, e.g. when rebuilding
    /// from the authoritative score store.
    pub fn extend<I: IntoIterator<Item = Entry>>(&self, entries: I) {
        let mut index = self.index.write();
        let before = index.len();
        index.extend(entries);
        debug!(board = %self.name, before, after = index.len(), "replayed entries");
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.index.write().clear();
        debug!(board = %self.name, "cleared");
    }

    /// Every entry in rank order.
    pub fn snapshot(&self) -> Vec<Entry> {
        let index = self.index.read();
        return index.top_n(index.len());
    }
}

impl Default for Leaderboard {
    fn default() -> Self {
        return Self::new();
    }
}

impl Board for Leaderboard {
    fn update(&self, user: &str, score: i64) {
        let previous = self.index.write().update(user, score);
        trace!(
            board = %self.name,
            user,
            score,
            previous = previous.map(|e| e.score),
            "update"
        );
    }

    fn remove(&self, user: &str) {
        let removed = self.index.write().remove(user);
        trace!(board = %self.name, user, found = removed.is_some(), "remove");
    }

    fn top_n(&self, n: usize) -> Vec<Entry> {
        return self.index.read().top_n(n);
    }

    fn get(&self, user: &str) -> Option<Entry> {
        return self.index.read().get(user).cloned();
    }

    fn rank(&self, user: &str) -> Option<usize> {
        return self.index.read().rank(user);
    }

    fn len(&self) -> usize {
        return self.index.read().len();
    }
}

impl std::fmt::Debug for Leaderboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return f
            .debug_struct("Leaderboard")
            .field("name", &self.name)
            .field("len", &self.index.read().len())
            .finish();
    }
}
