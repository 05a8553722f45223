//! JSON-lines RPC server exposing `Service.Division`.
//!
//! The server binds a TCP endpoint configured through [`divrpc_config`],
//! accepts connections on a background thread and serves each connection on
//! a thread of its own. Requests are resolved through an immutable
//! [`Registry`] shared by every connection, so a failure on one connection
//! never affects another.
//!
//! Bootstrap reports its progress through a [`HealthReporter`]; the binary
//! uses [`StructuredHealthReporter`], which emits `tracing` events.

mod bootstrap;
mod dispatch;
mod health;
mod registry;
mod service;
mod transport;

pub use bootstrap::{BootstrapError, Server, ServerHandle, bootstrap_with, run};
pub use dispatch::{DispatchError, RpcConnectionHandler};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use registry::{CallError, RegistrationError, Registry, RegistryBuilder};
pub use service::{Service, ServiceError, default_registry};
pub use transport::ListenerError;

#[cfg(test)]
mod tests;
