//! Test helpers for the transport module.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::{Duration, Instant};

use super::{Acceptor, ConnectionHandler};

pub(crate) struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    pub(crate) fn new() -> (Arc<AtomicUsize>, Arc<Self>) {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(Self {
            count: Arc::clone(&count),
        });
        (count, handler)
    }
}

impl ConnectionHandler for CountingHandler {
    fn handle(&self, _stream: TcpStream) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Acceptor that fails a fixed number of times before delegating to a real
/// listener.
pub(crate) struct FlakyAcceptor {
    inner: TcpListener,
    failures: AtomicUsize,
    kind: io::ErrorKind,
}

impl FlakyAcceptor {
    pub(crate) fn new(inner: TcpListener, failures: usize, kind: io::ErrorKind) -> Self {
        Self {
            inner,
            failures: AtomicUsize::new(failures),
            kind,
        }
    }
}

impl Acceptor for FlakyAcceptor {
    fn accept_stream(&self) -> io::Result<Option<(TcpStream, SocketAddr)>> {
        let remaining = self.failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures.store(remaining - 1, Ordering::SeqCst);
            return Err(io::Error::new(self.kind, "injected accept failure"));
        }
        self.inner.accept_stream()
    }
}

pub(crate) fn wait_for_count(count: &AtomicUsize, expected: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if count.load(Ordering::SeqCst) >= expected {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    false
}
