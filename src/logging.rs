// Logger setup for the binary. Logs go to stderr so stdout carries only
// album listings and ids.

use std::io::Write;

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Level for a given number of `-v` flags.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Initialize `env_logger`. `RUST_LOG`, when set, wins over `-v`.
pub fn init(verbosity: u8) {
    let mut builder = Builder::new();
    builder
        .filter_level(level_for(verbosity))
        .parse_env(Env::default())
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();
}
