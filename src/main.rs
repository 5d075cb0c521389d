use clap::Parser;
use netrank::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
