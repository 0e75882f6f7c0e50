//! End-to-end tests over real TCP sockets

use hello_responder::config::ServerSettings;
use hello_responder::http::response::{Response, SUCCESS_PAGE};
use hello_responder::server::{ServeStats, Server, ServerError, Shutdown, ShutdownTrigger};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};

fn start() -> (SocketAddr, ShutdownTrigger, JoinHandle<ServeStats>) {
    let settings = ServerSettings::new("127.0.0.1:0".parse().unwrap());
    let server = Server::bind(&settings).unwrap();
    let addr = server.local_addr().unwrap();

    let (trigger, shutdown) = Shutdown::new();
    let handle = tokio::spawn(server.run(shutdown));

    (addr, trigger, handle)
}

async fn send(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    out
}

#[tokio::test]
async fn test_get_root_over_tcp() {
    let (addr, trigger, handle) = start();

    let out = send(addr, b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;

    assert!(out.starts_with(b"HTTP/1.1 200 OK\r\n"));
    assert!(out.ends_with(SUCCESS_PAGE));

    trigger.trigger();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_each_rejection_over_tcp() {
    let (addr, trigger, handle) = start();

    let cases: [(&[u8], Response); 4] = [
        (b"POST / HTTP/1.1\r\n\r\n", Response::method_not_allowed()),
        (b"GET /foo HTTP/1.1\r\n\r\n", Response::not_found()),
        (b"\r\n", Response::bad_request()),
        (b"GET\r\n", Response::bad_request()),
    ];

    for (request, expected) in cases {
        assert_eq!(send(addr, request).await, expected.to_bytes());
    }

    trigger.trigger();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_repeated_requests_get_identical_bytes() {
    let (addr, trigger, handle) = start();

    let first = send(addr, b"GET / HTTP/1.1\r\n\r\n").await;
    for _ in 0..5 {
        assert_eq!(send(addr, b"GET / HTTP/1.1\r\n\r\n").await, first);
    }

    trigger.trigger();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_connection_is_closed_after_response() {
    let (addr, trigger, handle) = start();

    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream
        .write_all(b"GET / HTTP/1.1\r\nConnection: keep-alive\r\n\r\n")
        .await
        .unwrap();

    let mut out = Vec::new();
    stream.read_to_end(&mut out).await.unwrap();
    assert!(!out.is_empty());

    // a second request on the same connection gets nothing back
    let _ = stream.write_all(b"GET / HTTP/1.1\r\n\r\n").await;
    let mut buf = [0u8; 64];
    let n = stream.read(&mut buf).await.unwrap_or(0);
    assert_eq!(n, 0);

    trigger.trigger();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_second_bind_to_same_port_fails() {
    let (addr, trigger, handle) = start();

    assert!(std::net::TcpListener::bind(addr).is_err());

    let err = Server::bind(&ServerSettings::new(addr)).err().unwrap();
    assert!(matches!(err, ServerError::Bind { .. }));

    trigger.trigger();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_bind_to_foreign_address_fails() {
    let settings = ServerSettings::new("192.0.2.1:0".parse().unwrap());

    let err = Server::bind(&settings).err().unwrap();

    assert!(matches!(err, ServerError::Bind { .. }));
}

#[tokio::test]
async fn test_connections_are_served_one_at_a_time() {
    let (addr, trigger, handle) = start();

    // first client connects but stays silent, holding the server
    let mut slow = TcpStream::connect(addr).await.unwrap();
    sleep(Duration::from_millis(50)).await;

    let mut fast = TcpStream::connect(addr).await.unwrap();
    fast.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();

    let mut buf = [0u8; 16];
    let waited = timeout(Duration::from_millis(200), fast.read(&mut buf)).await;
    assert!(waited.is_err(), "second client was served before the first");

    slow.write_all(b"GET /slow HTTP/1.1\r\n\r\n").await.unwrap();
    let mut slow_out = Vec::new();
    slow.read_to_end(&mut slow_out).await.unwrap();
    assert_eq!(slow_out, Response::not_found().to_bytes());

    let mut fast_out = Vec::new();
    fast.read_to_end(&mut fast_out).await.unwrap();
    assert_eq!(fast_out, Response::ok().to_bytes());

    trigger.trigger();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_shutdown_reports_stats() {
    let (addr, trigger, handle) = start();

    send(addr, b"GET / HTTP/1.1\r\n\r\n").await;
    send(addr, b"DELETE / HTTP/1.1\r\n\r\n").await;

    // connect and hang up without sending anything
    let silent = TcpStream::connect(addr).await.unwrap();
    drop(silent);
    sleep(Duration::from_millis(50)).await;

    trigger.trigger();
    let stats = handle.await.unwrap();

    assert_eq!(stats.accepted, 3);
    assert_eq!(stats.responded, 2);
    assert_eq!(stats.failed, 0);
}

#[tokio::test]
async fn test_shutdown_before_run_serves_nothing() {
    let settings = ServerSettings::new("127.0.0.1:0".parse().unwrap());
    let server = Server::bind(&settings).unwrap();
    let (trigger, shutdown) = Shutdown::new();

    trigger.trigger();
    let stats = server.run(shutdown).await;

    assert_eq!(stats, ServeStats::default());
}

#[tokio::test]
async fn test_shutdown_does_not_interrupt_connection_in_progress() {
    let (addr, trigger, handle) = start();

    let mut client = TcpStream::connect(addr).await.unwrap();
    sleep(Duration::from_millis(100)).await;

    trigger.trigger();
    sleep(Duration::from_millis(50)).await;

    client.write_all(b"GET / HTTP/1.1\r\n\r\n").await.unwrap();
    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    assert_eq!(out, Response::ok().to_bytes());

    let stats = handle.await.unwrap();
    assert_eq!(stats.responded, 1);
}

#[tokio::test]
async fn test_listener_closes_after_shutdown() {
    let (addr, trigger, handle) = start();

    trigger.trigger();
    handle.await.unwrap();

    assert!(TcpStream::connect(addr).await.is_err());
}
