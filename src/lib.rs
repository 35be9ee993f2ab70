//! Ranked Board - a concurrent in-memory leaderboard.
//!
//! Users are ranked by score, highest first, with ties broken by user id
//! ascending. Updates, removals and rank lookups run in expected O(log n)
//! on a skip list; reads share a lock, writes take it exclusively.
//!
//! # Quick Start
//!
//! ```
//! use ranked_board::{Board, Entry, Leaderboard};
//!
//! let board = Leaderboard::new();
//! board.update("a", 10);
//! board.update("b", 20);
//! board.update("c", 15);
//!
//! assert_eq!(
//!     board.top_n(3),
//!     vec![Entry::new("b", 20), Entry::new("c", 15), Entry::new("a", 10)]
//! );
//! assert_eq!(board.rank("c"), Some(2));
//! ```
//!
//! The board holds absolute totals. Whoever owns the scores computes the new
//! total and calls `update`; nothing here is persisted, so after a restart
//! the board is rebuilt by replaying totals through [`Leaderboard::extend`].

pub mod board;
pub mod config;
pub mod entry;
pub mod leaderboard;
pub mod level;
pub mod skip_list;

pub use board::Board;
pub use config::{BoardConfig, ConfigError};
pub use entry::{Entry, UserId};
pub use leaderboard::Leaderboard;
pub use level::LevelGenerator;
pub use skip_list::RankIndex;
