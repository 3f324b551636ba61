/// command-line report of rates at a given state
pub mod cli_main;
