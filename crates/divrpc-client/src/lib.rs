//! Client for the divrpc division service.
//!
//! [`RpcClient`] connects to a server over TCP and issues calls one at a time.
//! [`run`] implements the `divrpc-client` binary: it parses
//! [`divrpc_config::ClientConfig`], makes a single `Service.Division` call
//! and prints the quotient.
//!
//! Exit status follows the call outcome. A quotient or an error reported by
//! the server exits successfully; the latter is written to stderr. Failing to
//! connect, send, or read a reply exits with failure.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use tracing::{info, warn};

use divrpc_config::{ClientConfig, telemetry};

mod client;
mod errors;
mod transport;

pub use client::RpcClient;
pub use errors::ClientError;

const RUN_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::run");

/// Runs the client using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let config = match ClientConfig::try_parse_from(args) {
        Ok(config) => config,
        Err(error) => return report_usage(&error, stdout, stderr),
    };
    if let Err(error) = telemetry::initialise(&config.logging) {
        let _ = writeln!(stderr, "{error}");
        return ExitCode::FAILURE;
    }
    run_with_config(&config, stdout, stderr)
}

/// Makes the configured call and reports its outcome.
#[must_use]
pub fn run_with_config<W, E>(config: &ClientConfig, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    W: Write,
    E: Write,
{
    let outcome =
        RpcClient::connect(&config.server).and_then(|mut client| {
            client.divide(config.dividend, config.divisor)
        });
    match outcome {
        Ok(quotient) => {
            info!(
                target: RUN_TARGET,
                dividend = config.dividend,
                divisor = config.divisor,
                quotient,
                "call succeeded"
            );
            match writeln!(stdout, "call result: {quotient:.6}") {
                Ok(()) => ExitCode::SUCCESS,
                Err(error) => {
                    let _ = writeln!(stderr, "failed to write call result: {error}");
                    ExitCode::FAILURE
                }
            }
        }
        Err(error) if error.is_remote() => {
            warn!(target: RUN_TARGET, %error, "server reported an error");
            let _ = writeln!(stderr, "call error: {error}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

fn report_usage<W, E>(error: &clap::Error, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    W: Write,
    E: Write,
{
    let rendered = error.render();
    let _ = if error.use_stderr() {
        write!(stderr, "{rendered}")
    } else {
        write!(stdout, "{rendered}")
    };
    u8::try_from(error.exit_code()).map_or(ExitCode::FAILURE, ExitCode::from)
}

#[cfg(test)]
mod tests;
