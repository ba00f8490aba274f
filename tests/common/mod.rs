//! Shared test utilities: a minimal canned-response HTTP server.
//!
//! Answers each connection with the first route whose needle appears in the
//! request line, so tests can pin behavior per page or per order id without
//! pulling in a mock-server dependency.

use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A canned response, matched by request-line substring.
#[derive(Clone)]
pub struct Route {
    pub needle: String,
    pub status: u16,
    pub body: String,
}

pub fn route(needle: &str, status: u16, body: &str) -> Route {
    Route {
        needle: needle.to_string(),
        status,
        body: body.to_string(),
    }
}

/// Binds a listener on an ephemeral local port and serves the routes until
/// the test process exits. Returns the server's base URL.
///
/// Unmatched requests receive 404 with an empty body.
pub async fn spawn_mock_oms(routes: Vec<Route>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock server");
    let addr = listener.local_addr().expect("Failed to read mock server addr");
    let routes = Arc::new(routes);

    tokio::spawn(async move {
        loop {
            let Ok((socket, _)) = listener.accept().await else {
                break;
            };
            let routes = Arc::clone(&routes);
            tokio::spawn(handle_connection(socket, routes));
        }
    });

    format!("http://{addr}")
}

async fn handle_connection(mut socket: tokio::net::TcpStream, routes: Arc<Vec<Route>>) {
    // Read until the end of the request headers; GET requests have no body.
    let mut buf = vec![0u8; 16 * 1024];
    let mut filled = 0;
    loop {
        match socket.read(&mut buf[filled..]).await {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                filled += n;
                if buf[..filled].windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
                if filled == buf.len() {
                    break;
                }
            }
        }
    }

    let request = String::from_utf8_lossy(&buf[..filled]);
    let request_line = request.lines().next().unwrap_or_default();
    let (status, body) = routes
        .iter()
        .find(|route| request_line.contains(route.needle.as_str()))
        .map(|route| (route.status, route.body.clone()))
        .unwrap_or((404, String::new()));

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        body.len(),
        body
    );
    let _ = socket.write_all(response.as_bytes()).await;
    let _ = socket.shutdown().await;
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Response",
    }
}
