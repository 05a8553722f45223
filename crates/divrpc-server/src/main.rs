use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;

use divrpc_config::ServerConfig;

fn main() -> ExitCode {
    let config = ServerConfig::parse();
    match divrpc_server::run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let _ = writeln!(io::stderr().lock(), "divrpc-server: {error}");
            ExitCode::FAILURE
        }
    }
}
