mod commands;

pub use commands::{run_index, Cli};
