//! The leaderboard contract callers program against.

use crate::entry::Entry;

/// A ranked board of users.
///
/// Every operation is total. Absence is reported through `None` or an empty
/// result, never an error. Implementations must be usable from many threads
/// at once, so all methods take `&self`.
pub trait Board: Send + Sync {
    /// Insert `user` at `score`, or move them there if already ranked.
    ///
    /// `score` is the user's absolute total, not a delta.
    fn update(&self, user: &str, score: i64);

    /// Remove `user`. Does nothing if they are not ranked.
    fn remove(&self, user: &str);

    /// Snapshot of the first `n` entries in rank order.
    ///
    /// Returns fewer than `n` entries when the board is smaller, and nothing
    /// when `n == 0`.
    fn top_n(&self, n: usize) -> Vec<Entry>;

    /// The user's current entry, or `None` if not ranked.
    fn get(&self, user: &str) -> Option<Entry>;

    /// The user's 1-based rank, or `None` if not ranked.
    fn rank(&self, user: &str) -> Option<usize>;

    /// Number of ranked users.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        return self.len() == 0;
    }
}
