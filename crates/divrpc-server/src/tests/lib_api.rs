//! Tests that exercise the crate's public re-exports.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;

use rstest::{fixture, rstest};
use serde_json::{Value, json};

use divrpc_config::{Endpoint, ServerConfig};

use crate::{BootstrapError, ListenerError, Server, bootstrap_with, default_registry};

use super::support::{HealthEvent, RecordingHealthReporter};

#[fixture]
fn loopback_config() -> ServerConfig {
    ServerConfig {
        listen: Endpoint::tcp("127.0.0.1", 0),
        ..ServerConfig::default()
    }
}

fn divide_over(stream: &mut TcpStream, a: i64, b: i64) -> Value {
    let request = format!(
        "{{\"method\":\"Service.Division\",\"params\":[{{\"A\":{a},\"B\":{b}}}],\"id\":0}}\n"
    );
    stream.write_all(request.as_bytes()).expect("write request");
    let mut line = String::new();
    BufReader::new(stream.try_clone().expect("clone stream"))
        .read_line(&mut line)
        .expect("read reply");
    serde_json::from_str(&line).expect("reply is JSON")
}

#[rstest]
fn bootstrap_with_reports_success(loopback_config: ServerConfig) {
    let reporter = Arc::new(RecordingHealthReporter::default());
    let handle = bootstrap_with(&loopback_config, reporter.clone()).expect("bootstrap");
    let addr = handle.local_addr();

    assert_eq!(
        reporter.events(),
        vec![
            HealthEvent::BootstrapStarting,
            HealthEvent::BootstrapSucceeded(addr)
        ]
    );

    let mut stream = TcpStream::connect(addr).expect("connect");
    let reply = divide_over(&mut stream, 88, 6);
    assert_eq!(reply["result"].as_f64(), Some(88.0 / 6.0));

    handle.shutdown();
    handle.join().expect("join listener");
}

#[rstest]
fn bootstrap_with_reports_bind_failure(loopback_config: ServerConfig) {
    let reserved = TcpListener::bind(("127.0.0.1", 0)).expect("reserve port");
    let port = reserved.local_addr().expect("reserved address").port();
    let config = ServerConfig {
        listen: Endpoint::tcp("127.0.0.1", port),
        ..loopback_config
    };
    let reporter = Arc::new(RecordingHealthReporter::default());

    let error = match bootstrap_with(&config, reporter.clone()) {
        Ok(_) => panic!("bootstrap should fail on an occupied port"),
        Err(error) => error,
    };

    assert!(matches!(
        error,
        BootstrapError::Listener {
            source: ListenerError::BindTcp { .. }
        }
    ));
    let events = reporter.events();
    assert_eq!(events.first(), Some(&HealthEvent::BootstrapStarting));
    assert!(matches!(events.last(), Some(HealthEvent::BootstrapFailed(_))));
}

#[rstest]
fn server_serves_independent_connections() {
    let registry = Arc::new(default_registry().expect("registry"));
    let server = Server::bind(&Endpoint::tcp("127.0.0.1", 0), registry).expect("bind");
    let addr = server.local_addr();
    let handle = server.start().expect("start");

    let mut first = TcpStream::connect(addr).expect("connect first");
    let mut second = TcpStream::connect(addr).expect("connect second");
    assert_eq!(divide_over(&mut first, 1, 0)["error"], json!("division by zero"));
    assert_eq!(divide_over(&mut second, 9, 3)["result"], json!(3.0));
    assert_eq!(divide_over(&mut first, 5, 2)["result"], json!(2.5));

    handle.shutdown();
    handle.join().expect("join listener");
}
