//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a single static body to every GET or POST, with an optional
//! `Content-Disposition` header and a configurable status. Request heads are
//! recorded so tests can assert on the headers a plan produced.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

#[derive(Debug, Clone, Default)]
pub struct StaticServerOptions {
    /// Status line after `HTTP/1.1 `; defaults to `200 OK`.
    pub status: Option<&'static str>,
    pub content_disposition: Option<String>,
    pub content_type: Option<&'static str>,
}

/// Running server: base URL plus the request heads it has seen.
pub struct StaticServer {
    pub url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StaticServer {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Starts a server in a background thread serving `body` with status 200.
pub fn start(body: Vec<u8>) -> StaticServer {
    start_with_options(body, StaticServerOptions::default())
}

pub fn start_with_options(body: Vec<u8>, opts: StaticServerOptions) -> StaticServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let opts = opts.clone();
            let seen = Arc::clone(&seen);
            thread::spawn(move || handle(stream, &body, &opts, &seen));
        }
    });
    StaticServer {
        url: format!("http://127.0.0.1:{}/", port),
        requests,
    }
}

fn handle(
    mut stream: std::net::TcpStream,
    body: &[u8],
    opts: &StaticServerOptions,
    seen: &Mutex<Vec<String>>,
) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = String::from_utf8_lossy(&buf[..n]).into_owned();
    let method = request.split_whitespace().next().unwrap_or("").to_string();
    seen.lock().unwrap().push(request);

    if !method.eq_ignore_ascii_case("GET") && !method.eq_ignore_ascii_case("POST") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }

    let mut head = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        opts.status.unwrap_or("200 OK"),
        body.len()
    );
    if let Some(cd) = &opts.content_disposition {
        head.push_str(&format!("Content-Disposition: {}\r\n", cd));
    }
    if let Some(ct) = opts.content_type {
        head.push_str(&format!("Content-Type: {}\r\n", ct));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(body);
}
