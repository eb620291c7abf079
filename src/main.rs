// mcuxeq - Microcontroller Command/Response Utility
use clap::Parser;
use mcuxeq::cli::{execute_command, write_error, Args};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    match execute_command(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            write_error(&e);
            ExitCode::FAILURE
        }
    }
}
