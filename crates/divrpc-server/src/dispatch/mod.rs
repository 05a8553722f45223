//! JSON-lines request dispatch.
//!
//! Each connection carries a sequence of request lines. The dispatcher
//! decodes every line into a [`divrpc_protocol::Request`], invokes the named
//! operation through the [`crate::registry::Registry`], and writes one reply
//! line per request in arrival order:
//!
//! ```json
//! {"method":"Service.Division","params":[{"A":88,"B":6}],"id":0}
//! {"id":0,"result":14.666666666666666,"error":null}
//! ```
//!
//! Call-level failures (unknown method, bad params, operation errors) travel
//! back in the reply's `error` field and leave the connection open. A line
//! that is not a request at all ends the connection without a reply.

mod errors;
mod handler;
mod request;

pub use self::errors::DispatchError;
pub use self::handler::RpcConnectionHandler;

pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");
