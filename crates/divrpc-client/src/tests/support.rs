//! Test support for client behavioural coverage.
//!
//! Supplies a fake server that answers requests with canned reply lines and
//! a world type that runs the client against it while capturing output.

use std::ffi::OsString;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::thread;

use anyhow::{Context, Result, anyhow};
use rstest::fixture;

use crate::run;

/// A fake server that accepts one connection and answers each request with
/// the next canned line.
///
/// Once the canned lines run out the server closes the connection after
/// reading the following request.
pub(super) struct FakeServer {
    port: u16,
    requests: Arc<Mutex<Vec<String>>>,
    handle: Option<thread::JoinHandle<Result<()>>>,
}

impl FakeServer {
    pub fn spawn(replies: Vec<String>) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind fake server")?;
        let port = listener.local_addr().context("local addr")?.port();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&requests);
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().context("accept connection")?;
            Self::serve(stream, &replies, &recorded)
        });
        Ok(Self {
            port,
            requests,
            handle: Some(handle),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Waits for the server thread and returns the recorded request lines.
    pub fn take_requests(&mut self) -> Result<Vec<String>> {
        if let Some(handle) = self.handle.take() {
            handle
                .join()
                .map_err(|_| anyhow!("fake server thread panicked"))?
                .context("fake server failed")?;
        }
        let requests = self
            .requests
            .lock()
            .map_err(|error| anyhow!("lock requests: {error}"))?;
        Ok(requests.clone())
    }

    fn serve(stream: TcpStream, replies: &[String], requests: &Mutex<Vec<String>>) -> Result<()> {
        let mut reader = BufReader::new(stream.try_clone().context("clone stream")?);
        let mut writer = stream;
        let mut replies = replies.iter();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).context("read request")? == 0 {
                return Ok(());
            }
            requests
                .lock()
                .map_err(|error| anyhow!("lock requests: {error}"))?
                .push(line.trim_end().to_owned());
            let Some(reply) = replies.next() else {
                return Ok(());
            };
            writer
                .write_all(format!("{reply}\n").as_bytes())
                .context("write reply")?;
        }
    }
}

/// Returns a port with nothing listening on it.
pub(super) fn closed_port() -> Result<u16> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind probe listener")?;
    Ok(listener.local_addr().context("probe addr")?.port())
}

/// Test world holding the fake server and captured client output.
#[derive(Default)]
pub(super) struct TestWorld {
    pub server: Option<FakeServer>,
    pub port: Option<u16>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<ExitCode>,
}

impl TestWorld {
    pub fn start_server(&mut self, replies: Vec<String>) -> Result<()> {
        let server = FakeServer::spawn(replies)?;
        self.port = Some(server.port());
        self.server = Some(server);
        Ok(())
    }

    pub fn run_client(&mut self, operands: &[&str]) -> Result<()> {
        let port = self.port.context("no server port configured")?;
        let mut args: Vec<OsString> = vec![
            OsString::from("divrpc-client"),
            OsString::from("--server"),
            OsString::from(format!("tcp://127.0.0.1:{port}")),
        ];
        args.extend(operands.iter().map(OsString::from));
        self.stdout.clear();
        self.stderr.clear();
        self.exit_code = Some(run(args, &mut self.stdout, &mut self.stderr));
        Ok(())
    }

    pub fn stdout_text(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_text(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    pub fn requests(&mut self) -> Result<Vec<String>> {
        self.server
            .as_mut()
            .context("no fake server running")?
            .take_requests()
    }
}

#[fixture]
pub(super) fn world() -> std::cell::RefCell<TestWorld> {
    std::cell::RefCell::new(TestWorld::default())
}
