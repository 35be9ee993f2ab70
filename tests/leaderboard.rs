//! Scenario and concurrency tests for the public board API.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::Barrier;
use std::thread;

use ranked_board::Board;
use ranked_board::BoardConfig;
use ranked_board::Entry;
use ranked_board::Leaderboard;

fn board() -> Leaderboard {
    return Leaderboard::with_config(BoardConfig::new().with_name("scenario").with_seed(99)).unwrap();
}

fn entries(pairs: &[(&str, i64)]) -> Vec<Entry> {
    return pairs.iter().map(|&(user, score)| Entry::new(user, score)).collect();
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn update_relocate_remove() {
    let board = board();
    board.update("a", 10);
    board.update("b", 20);
    board.update("c", 15);
    assert_eq!(board.top_n(3), entries(&[("b", 20), ("c", 15), ("a", 10)]));

    board.update("a", 25);
    assert_eq!(board.top_n(1), entries(&[("a", 25)]));

    board.remove("b");
    assert_eq!(board.top_n(2), entries(&[("a", 25), ("c", 15)]));
    assert_eq!(board.get("b"), None);
}

#[test]
fn equal_scores_order_by_user() {
    let board = board();
    board.update("b", 10);
    board.update("a", 10);
    assert_eq!(board.top_n(2), entries(&[("a", 10), ("b", 10)]));
}

#[test]
fn get_round_trips() {
    let board = board();
    board.update("u", -42);
    assert_eq!(board.get("u"), Some(Entry::new("u", -42)));
    assert_eq!(board.get("missing"), None);
}

#[test]
fn update_twice_matches_update_once() {
    let once = board();
    let twice = board();
    for board in [&once, &twice] {
        board.update("x", 3);
        board.update("y", 8);
    }
    twice.update("x", 3);
    assert_eq!(once.get("x"), twice.get("x"));
    assert_eq!(once.top_n(10), twice.top_n(10));
}

#[test]
fn removed_users_vanish_everywhere() {
    let board = board();
    for i in 0..20 {
        board.update(&format!("u{}", i), i);
    }
    board.remove("u7");
    board.remove("u7");
    board.remove("never-there");
    assert_eq!(board.len(), 19);
    assert_eq!(board.get("u7"), None);
    assert_eq!(board.rank("u7"), None);
    for n in 0..=board.len() {
        assert!(board.top_n(n).iter().all(|e| e.user.as_str() != "u7"));
    }
}

#[test]
fn distinct_updates_conserve_size() {
    let board = board();
    let n = 300;
    for i in 0..n {
        board.update(&format!("user-{}", i), (i as i64 * 31) % 17);
    }
    let top = board.top_n(n);
    assert_eq!(top.len(), n);
    let unique: HashSet<_> = top.iter().map(|e| e.user.clone()).collect();
    assert_eq!(unique.len(), n);
}

#[test]
fn top_n_edges() {
    let board = board();
    assert!(board.top_n(5).is_empty());
    board.update("a", 1);
    assert!(board.top_n(0).is_empty());
    assert_eq!(board.top_n(usize::MAX), entries(&[("a", 1)]));
}

#[test]
fn ranks_follow_standings() {
    let board = board();
    board.update("a", 10);
    board.update("b", 20);
    board.update("c", 15);
    assert_eq!(board.rank("b"), Some(1));
    assert_eq!(board.rank("c"), Some(2));
    assert_eq!(board.rank("a"), Some(3));
    board.update("a", 100);
    assert_eq!(board.rank("a"), Some(1));
    assert_eq!(board.rank("c"), Some(3));
}

#[test]
fn pages_walk_the_standings() {
    let board = board();
    board.extend((0..25).map(|i| Entry::new(format!("p{:02}", i), 100 - i)));
    let all = board.snapshot();
    let mut paged = Vec::new();
    let mut offset = 0;
    loop {
        let page = board.page(offset, 10);
        if page.is_empty() {
            break;
        }
        offset += page.len();
        paged.extend(page);
    }
    assert_eq!(paged, all);
}

#[test]
fn snapshots_do_not_alias_the_board() {
    let board = board();
    board.update("a", 1);
    let before = board.top_n(1);
    board.update("a", 2);
    assert_eq!(before, entries(&[("a", 1)]));
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn concurrent_writers_on_disjoint_users() {
    let board = Arc::new(Leaderboard::new());
    let writers = 64;
    let barrier = Arc::new(Barrier::new(writers));

    let handles: Vec<_> = (0..writers)
        .map(|i| {
            let board = Arc::clone(&board);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                board.update(&format!("w{}", i), (i % 5) as i64);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let top = board.top_n(writers);
    assert_eq!(top.len(), writers);
    let unique: HashSet<_> = top.iter().map(|e| e.user.clone()).collect();
    assert_eq!(unique.len(), writers);
    assert!(top.windows(2).all(|w| w[0].ranks_before(&w[1])));
}

#[test]
fn readers_see_consistent_boards_during_writes() {
    let board = board();
    let users = 50;
    for i in 0..users {
        board.update(&format!("r{}", i), 0);
    }

    thread::scope(|scope| {
        for t in 0..4 {
            let board = &board;
            scope.spawn(move || {
                for round in 0..200i64 {
                    let user = format!("r{}", (round as usize * 7 + t) % users);
                    board.update(&user, round * (t as i64 + 1));
                }
            });
        }
        for _ in 0..4 {
            let board = &board;
            scope.spawn(move || {
                for _ in 0..200 {
                    let top = board.top_n(users);
                    assert_eq!(top.len(), users);
                    assert!(top.windows(2).all(|w| w[0].ranks_before(&w[1])));
                    if let Some(first) = top.first() {
                        assert!(board.get(first.user.as_str()).is_some());
                    }
                }
            });
        }
    });

    assert_eq!(board.len(), users);
}

#[test]
fn mixed_writers_and_removers() {
    let board = Arc::new(board());
    thread::scope(|scope| {
        for t in 0..8 {
            let board = Arc::clone(&board);
            scope.spawn(move || {
                for i in 0..100 {
                    let user = format!("t{}-{}", t, i);
                    board.update(&user, i);
                    if i % 2 == 0 {
                        board.remove(&user);
                    }
                }
            });
        }
    });
    assert_eq!(board.len(), 8 * 50);
    let all = board.snapshot();
    assert!(all.iter().all(|e| e.score % 2 == 1));
    assert!(all.windows(2).all(|w| w[0].ranks_before(&w[1])));
}
