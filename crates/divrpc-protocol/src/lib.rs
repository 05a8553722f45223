//! Wire types shared by the divrpc server and client.
//!
//! The protocol is line-delimited JSON. A client writes one [`Request`] per
//! line:
//!
//! ```json
//! {"method":"Service.Division","params":[{"A":88,"B":6}],"id":0}
//! ```
//!
//! and the server answers each with one [`Reply`] line carrying the same
//! `id` and exactly one of `result` or `error`:
//!
//! ```json
//! {"id":0,"result":14.666666666666666,"error":null}
//! {"id":1,"result":null,"error":"division by zero"}
//! ```

mod args;
mod framing;
mod message;

pub use args::{DIVISION_METHOD, DivisionArgs};
pub use framing::{FrameError, LineReader, MAX_LINE_BYTES, write_line};
pub use message::{Reply, Request};
