//! Ranked entries and the ordering they are kept in.
//!
//! Entries rank by score descending. Equal scores fall back to the user id,
//! ascending, so two different users never compare equal and the board is a
//! strict total order.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

/// An opaque user identifier.
///
/// Backed by a shared `str` so copying an id out of the board is a refcount
/// bump rather than an allocation. Compares byte-wise, like `str`.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Arc<str>);

impl UserId {
    pub fn new(id: &str) -> UserId {
        return UserId(Arc::from(id));
    }

    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

impl Borrow<str> for UserId {
    fn borrow(&self) -> &str {
        return &self.0;
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> UserId {
        return UserId::new(id);
    }
}

impl From<String> for UserId {
    fn from(id: String) -> UserId {
        return UserId(Arc::from(id));
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return fmt::Debug::fmt(&*self.0, f);
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.pad(&self.0);
    }
}

/// A single ranked participant.
///
/// `Entry::default()` is the zero-valued entry: empty user, score 0.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub user: UserId,
    pub score: i64,
}

impl Entry {
    pub fn new(user: impl Into<UserId>, score: i64) -> Entry {
        return Entry {
            user: user.into(),
            score,
        };
    }

    /// True if `self` sits strictly above `other` on the board.
    #[inline]
    pub fn ranks_before(&self, other: &Entry) -> bool {
        return self < other;
    }
}

/// Rank order: `Less` means "ranks higher".
impl Ord for Entry {
    fn cmp(&self, other: &Entry) -> Ordering {
        return other
            .score
            .cmp(&self.score)
            .then_with(|| self.user.cmp(&other.user));
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Entry) -> Option<Ordering> {
        return Some(self.cmp(other));
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return write!(f, "{}:{}", self.user, self.score);
    }
}
