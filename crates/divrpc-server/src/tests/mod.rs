//! Test suites for the RPC server.

mod lib_api;
mod support;
