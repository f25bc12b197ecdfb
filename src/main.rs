//! Codequal CLI entry point.

use clap::Parser;
use codequal::cli::{self, Cli, Commands, EXIT_ERROR};

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Analyze(args) => match cli::run_analyze(&args) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("Error: {}", e);
                EXIT_ERROR
            }
        },
        Commands::Rules => cli::run_rules(),
    };

    std::process::exit(exit_code);
}
