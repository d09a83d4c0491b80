//! A canned HTTP responder shared by the integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpListener;

pub type Routes = Arc<HashMap<&'static str, String>>;

pub fn routes(pairs: &[(&'static str, String)]) -> Routes {
    Arc::new(pairs.iter().cloned().collect())
}

/// Reads one request head and returns its path.
pub async fn read_request_path<S: AsyncRead + Unpin>(stream: &mut S) -> String {
    let mut head = Vec::new();
    let mut buf = [0u8; 512];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }
    String::from_utf8_lossy(&head)
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
        .to_string()
}

/// Answers one request on `stream` from `routes`, then closes it.
pub async fn answer<S: AsyncRead + AsyncWrite + Unpin>(mut stream: S, routes: &Routes) {
    let path = read_request_path(&mut stream).await;
    let response = match routes.get(path.as_str()) {
        Some(body) => format!(
            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ),
        None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n".to_string(),
    };
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// Serves `routes` on a loopback port for the rest of the test.
pub async fn serve(routes: Routes) -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            let routes = Arc::clone(&routes);
            tokio::spawn(async move { answer(socket, &routes).await });
        }
    });
    port
}

pub fn record(id: &str, name: &str, segment: &str, public_ip: Option<&str>) -> String {
    let public_ip = public_ip
        .map(|ip| format!(r#""public_ip": "{ip}","#))
        .unwrap_or_default();
    format!(
        r#"{{"id": "{id}", "private_ip": "127.0.0.1", {public_ip} "segment": "{segment}",
            "state": "running", "launch_time": "2024-01-01T00:00:00Z",
            "tags": [{{"key": "Name", "value": "{name}"}}]}}"#
    )
}

pub fn document(records: &[String]) -> String {
    format!("[{}]", records.join(","))
}
