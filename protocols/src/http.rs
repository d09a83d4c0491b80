//! One HTTP/1.1 GET over whatever stream a dialer hands out.
//!
//! The exchange is driven by hyper's connection-level client, so the same
//! request can travel over a TCP socket or an ssh channel. Every request
//! carries `Connection: close` and a stream serves exactly one request.

use std::fmt;

use http::header::{CONNECTION, HOST};
use http::{Request, StatusCode, Uri};
use http_body_util::{BodyExt, Empty};
use hyper::body::Bytes;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

const DEFAULT_PORT: u16 = 80;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported scheme {0:?}, only http:// can be sent over a dialed stream")]
    UnsupportedScheme(String),

    #[error("could not build request: {0}")]
    Request(#[from] http::Error),

    #[error("HTTP exchange failed: {0}")]
    Exchange(#[from] hyper::Error),
}

/// An `http://` URL together with the address a dialer has to reach.
#[derive(Debug, Clone)]
pub struct Endpoint {
    uri: Uri,
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn parse(url: &str) -> Result<Self, HttpError> {
        let invalid = |reason: String| HttpError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        let uri: Uri = url.parse().map_err(|e: http::uri::InvalidUri| invalid(e.to_string()))?;
        match uri.scheme_str() {
            Some("http") => {}
            Some(other) => return Err(HttpError::UnsupportedScheme(other.to_string())),
            None => return Err(invalid("missing scheme".into())),
        }

        let host = uri
            .host()
            .map(|host| host.trim_start_matches('[').trim_end_matches(']'))
            .filter(|host| !host.is_empty())
            .ok_or_else(|| invalid("missing host".into()))?
            .to_string();
        let port = uri.port_u16().unwrap_or(DEFAULT_PORT);

        Ok(Self { uri, host, port })
    }

    /// Host to dial, without IPv6 brackets.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Path and query, `/` when the URL has neither.
    pub fn path(&self) -> &str {
        self.uri.path_and_query().map_or("/", |pq| pq.as_str())
    }

    fn authority(&self) -> &str {
        self.uri.authority().map_or(&self.host, |authority| authority.as_str())
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.uri)
    }
}

#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub body: Bytes,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Sends `GET endpoint` over `stream` and reads the whole response.
pub async fn get<S>(stream: S, endpoint: &Endpoint) -> Result<Response, HttpError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut sender, connection) = http1::handshake(TokioIo::new(stream)).await?;

    let request = Request::get(endpoint.path())
        .header(HOST, endpoint.authority())
        .header(CONNECTION, "close")
        .body(Empty::<Bytes>::new())?;

    let exchange = async move {
        let response = sender.send_request(request).await?;
        let status = response.status();
        let body = response.into_body().collect().await?.to_bytes();
        Ok::<_, HttpError>(Response { status, body })
    };
    let mut exchange = std::pin::pin!(exchange);
    let mut connection = std::pin::pin!(connection);

    // The connection only makes progress while polled, and winds down by
    // itself once the response is read.
    tokio::select! {
        response = &mut exchange => response,
        closed = &mut connection => {
            closed?;
            debug!(endpoint = %endpoint, "connection closed before the exchange finished");
            exchange.await
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
