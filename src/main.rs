use clap::Parser;
use stockscope::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
