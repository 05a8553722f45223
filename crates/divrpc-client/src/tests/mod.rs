//! Test suites for the divrpc client.

mod support;
