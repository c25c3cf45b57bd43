//! Minimal local HTTP responder so network paths are testable offline.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

/// Serves exactly one canned HTTP response on an ephemeral localhost port
/// and returns the base URL (`http://127.0.0.1:<port>`).
pub fn serve_once(status_line: &'static str, body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test listener");
    let addr = listener.local_addr().expect("listener addr");

    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            // Drain the request before answering; clients may error on an
            // early response otherwise.
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf);
            let header = format!(
                "{}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                status_line,
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(body);
        }
    });

    format!("http://{}", addr)
}
