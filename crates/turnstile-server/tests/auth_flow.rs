//! End-to-end authentication flow tests.
//!
//! Each test stands up a real server on an ephemeral port with a freshly
//! generated chain and drives it over actual TCP connections. The
//! concurrency tests exercise the one property the mutex exists for: a
//! single expectation can be spent at most once, no matter how many
//! connections race for it.

#![allow(clippy::unwrap_used, clippy::panic)]

use std::path::Path;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use turnstile_core::store::{ExpectationStore, FileExpectationStore};
use turnstile_core::wire::{FAILURE_LINE, SUCCESS_LINE};
use turnstile_core::{Chain, generate_from_seed};
use turnstile_server::{Server, ServerConfig};

/// Start a server over a chain seeded into a temp store. The store file is
/// `server_password.txt` under `dir` for post-hoc assertions.
async fn start_server(dir: &Path, count: usize, seed: u32) -> (std::net::SocketAddr, Chain) {
    let chain = generate_from_seed(count, seed).unwrap();
    let store_path = dir.join("server_password.txt");
    FileExpectationStore::new(&store_path).save(chain.anchor()).unwrap();

    let config = ServerConfig {
        bind_address: "127.0.0.1:0".to_owned(),
        store_path,
        read_timeout: Duration::from_secs(5),
    };
    let server = Server::bind(config).await.unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());

    (addr, chain)
}

/// One full exchange: connect, submit, read the verdict line.
async fn submit(addr: std::net::SocketAddr, token: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(token.as_bytes()).await.unwrap();
    stream.write_all(b"\n").await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response.trim_end().to_owned()
}

#[tokio::test]
async fn accepts_the_chain_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, chain) = start_server(dir.path(), 3, 42).await;

    for otp in chain.passwords() {
        assert_eq!(submit(addr, otp.as_str()).await, SUCCESS_LINE);
    }
}

#[tokio::test]
async fn rejects_replay_and_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, chain) = start_server(dir.path(), 2, 7).await;

    let first = chain.passwords()[0].as_str();
    assert_eq!(submit(addr, first).await, SUCCESS_LINE);

    // Replay of the spent token: the chain has moved on.
    assert_eq!(submit(addr, first).await, FAILURE_LINE);

    // Garbage and the empty string go through the same hash-and-compare path.
    assert_eq!(submit(addr, "deadbeef").await, FAILURE_LINE);
    assert_eq!(submit(addr, "").await, FAILURE_LINE);

    // The next real token is unaffected by the noise.
    assert_eq!(submit(addr, chain.passwords()[1].as_str()).await, SUCCESS_LINE);
}

#[tokio::test]
async fn rejection_does_not_touch_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, chain) = start_server(dir.path(), 1, 99).await;

    let store = FileExpectationStore::new(dir.path().join("server_password.txt"));
    let before = store.load().unwrap();

    assert_eq!(submit(addr, "not-a-token").await, FAILURE_LINE);

    assert_eq!(store.load().unwrap(), before);
    assert_eq!(&before, chain.anchor());
}

#[tokio::test]
async fn accept_rewrites_the_store_with_the_pre_image() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, chain) = start_server(dir.path(), 2, 311).await;

    let first = chain.passwords()[0].clone();
    assert_eq!(submit(addr, first.as_str()).await, SUCCESS_LINE);

    let store = FileExpectationStore::new(dir.path().join("server_password.txt"));
    assert_eq!(store.load().unwrap(), first);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_spend_a_token_at_most_once() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, chain) = start_server(dir.path(), 1, 1000).await;

    let token = chain.passwords()[0].as_str().to_owned();
    let attempts = 8;

    let mut handles = Vec::with_capacity(attempts);
    for _ in 0..attempts {
        let token = token.clone();
        handles.push(tokio::spawn(async move { submit(addr, &token).await }));
    }

    let mut accepted = 0;
    let mut rejected = 0;
    for handle in handles {
        let line = handle.await.unwrap();
        if line == SUCCESS_LINE {
            accepted += 1;
        } else if line == FAILURE_LINE {
            rejected += 1;
        } else {
            panic!("unexpected response: {line:?}");
        }
    }

    assert_eq!(accepted, 1, "exactly one of the racing submissions may win");
    assert_eq!(rejected, attempts - 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn a_stuck_connection_does_not_block_others() {
    let dir = tempfile::tempdir().unwrap();
    let (addr, chain) = start_server(dir.path(), 1, 512).await;

    // Open a connection and send nothing; it will sit in its own task until
    // the read timeout fires.
    let stuck = TcpStream::connect(addr).await.unwrap();

    // A well-behaved client on a second connection is unaffected.
    assert_eq!(submit(addr, chain.passwords()[0].as_str()).await, SUCCESS_LINE);

    drop(stuck);
}
