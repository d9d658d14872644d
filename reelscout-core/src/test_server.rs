//! Canned HTTP responses served over a local socket.
//!
//! Lets HTTP clients be tested against real status lines and bodies without
//! reaching the network. Each server answers exactly one request.

use std::net::SocketAddr;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// One-shot HTTP server bound to an ephemeral localhost port.
pub struct CannedServer {
    /// Address the server listens on
    pub address: SocketAddr,
    request: JoinHandle<std::io::Result<String>>,
}

impl CannedServer {
    /// Starts a server answering the next request with `status` and a JSON `body`.
    ///
    /// # Errors
    ///
    /// - `std::io::Error` - Could not bind the local socket
    pub async fn start(status: u16, body: impl Into<String>) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;
        let body = body.into();

        let request = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await?;

            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            while !is_complete(&request) {
                let read = stream.read(&mut chunk).await?;
                if read == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..read]);
            }

            let response = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await?;
            stream.shutdown().await?;

            Ok(String::from_utf8_lossy(&request).into_owned())
        });

        Ok(Self { address, request })
    }

    /// Base URL of the server with `path` appended, e.g. `/v1`.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.address)
    }

    /// Raw text of the request that was answered.
    ///
    /// # Errors
    ///
    /// - `std::io::Error` - The connection failed or the server task died
    pub async fn request(self) -> std::io::Result<String> {
        self.request.await.map_err(std::io::Error::other)?
    }
}

/// Whether the buffer holds full headers plus the declared body length.
fn is_complete(request: &[u8]) -> bool {
    let Some(header_end) = request.windows(4).position(|window| window == b"\r\n\r\n") else {
        return false;
    };

    let headers = String::from_utf8_lossy(&request[..header_end]);
    let content_length = headers
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);

    request.len() >= header_end + 4 + content_length
}
