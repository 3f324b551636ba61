use HyperKin::cli::cli_main::run;
use log::error;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

pub fn main() {
    let _ = TermLogger::init(
        LevelFilter::Info,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    );
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("\x1b[31m{}\x1b[0m", e);
        std::process::exit(1);
    }
}
