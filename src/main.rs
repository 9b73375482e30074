use clap::Parser;
use rotator::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
