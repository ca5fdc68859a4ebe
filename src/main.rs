use clap::Parser;
use download_cleaner::cli::{CleanArgs, run};
use download_cleaner::output::OutputFormatter;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = CleanArgs::parse();
    init_logging(args.verbose);

    let stdin = std::io::stdin();
    match run(&args, &mut stdin.lock()) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            OutputFormatter::error(&format!("Error: {}", e));
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` wins over `-v` when set.
fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}
