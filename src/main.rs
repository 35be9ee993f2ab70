use ranked_board::Board;
use ranked_board::BoardConfig;
use ranked_board::ConfigError;
use ranked_board::Leaderboard;

fn main() -> Result<(), ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => BoardConfig::load(path)?,
        None => BoardConfig::default(),
    };
    let board = Leaderboard::with_config(config)?;

    board.update("alice", 10);
    board.update("bob", 20);
    board.update("carol", 15);
    board.update("dave", 15);
    board.update("alice", 25);
    board.remove("bob");

    println!("{}:", board.name());
    for entry in board.top_n(10) {
        let rank = board.rank(entry.user.as_str()).unwrap_or(0);
        println!("  {:>2}. {:<8} {}", rank, entry.user, entry.score);
    }

    return Ok(());
}
