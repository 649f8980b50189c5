//! Throwaway local HTTP servers for probe and poll loop tests.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

#[derive(Debug, Clone, Copy)]
pub enum Fixture {
    /// Answer every request with this status and an empty body.
    Status(u16),
    /// Read the request and never answer.
    Hang,
    /// Read the request, then close the socket.
    CloseAfterRequest,
    /// Answer with bytes that are not HTTP.
    Garbage,
}

/// Serve `fixture` on an ephemeral port until the test ends. Returns the URL.
pub async fn spawn_fixture(fixture: Fixture) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(handle(stream, fixture));
        }
    });
    format!("http://{addr}/")
}

/// A URL on a port nothing listens on.
pub async fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/")
}

async fn handle(mut stream: TcpStream, fixture: Fixture) {
    read_request(&mut stream).await;
    match fixture {
        Fixture::Status(code) => {
            let response = format!(
                "HTTP/1.1 {code} Fixture\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
        Fixture::Hang => {
            tokio::time::sleep(Duration::from_secs(30)).await;
        }
        Fixture::CloseAfterRequest => {
            drop(stream);
        }
        Fixture::Garbage => {
            let _ = stream.write_all(b"this is not http\r\n\r\n").await;
            let _ = stream.shutdown().await;
        }
    }
}

async fn read_request(stream: &mut TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => {
                buf.extend_from_slice(&chunk[..n]);
                if buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    return;
                }
            }
        }
    }
}
