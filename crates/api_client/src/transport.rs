//! HTTP transport seam used by [`crate::RequestClient`].

use std::{cell::RefCell, collections::VecDeque, fmt, future::Future, pin::Pin, rc::Rc};

use serde::Serialize;

/// Object-safe boxed future used by [`HttpTransport`].
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Request methods the client issues.
pub enum HttpMethod {
    #[default]
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Returns the wire token for the method.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Fully resolved request handed to a transport.
pub struct HttpRequest {
    /// Request method.
    pub method: HttpMethod,
    /// Absolute or base-relative URL.
    pub url: String,
    /// Header name/value pairs in send order.
    pub headers: Vec<(String, String)>,
    /// Serialized body, if any.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Returns the first header value matching `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Status and body text returned by a transport.
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Creates a response from a status and raw body.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues HTTP requests. Timeouts and cancellation belong to the implementation.
pub trait HttpTransport {
    /// Sends `request` and resolves with the received status and body.
    fn send<'a>(&'a self, request: HttpRequest)
        -> TransportFuture<'a, Result<HttpResponse, String>>;
}

#[derive(Debug, Clone, Default)]
/// [`reqwest`]-backed transport (native and `wasm32` fetch).
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wraps a preconfigured reqwest client (timeouts, proxies, TLS).
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl HttpTransport for ReqwestTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> TransportFuture<'a, Result<HttpResponse, String>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(request.method.to_reqwest(), request.url.as_str());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|e| e.to_string())?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| e.to_string())?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, Clone, Default)]
/// Scripted in-memory transport: replays queued responses and records every request.
pub struct MemoryTransport {
    responses: Rc<RefCell<VecDeque<Result<HttpResponse, String>>>>,
    requests: Rc<RefCell<Vec<HttpRequest>>>,
}

impl MemoryTransport {
    /// Queues a raw response.
    pub fn push_response(&self, status: u16, body: impl Into<String>) {
        self.responses
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    /// Queues a response whose body is `body` serialized as JSON.
    ///
    /// # Panics
    ///
    /// Panics if `body` cannot be serialized.
    pub fn push_json<T: Serialize + ?Sized>(&self, status: u16, body: &T) {
        let raw = serde_json::to_string(body).expect("scripted response body must serialize");
        self.push_response(status, raw);
    }

    /// Queues a transport-level error.
    pub fn push_error(&self, message: impl Into<String>) {
        self.responses.borrow_mut().push_back(Err(message.into()));
    }

    /// Returns the requests sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

impl HttpTransport for MemoryTransport {
    fn send<'a>(
        &'a self,
        request: HttpRequest,
    ) -> TransportFuture<'a, Result<HttpResponse, String>> {
        Box::pin(async move {
            let label = format!("{} {}", request.method, request.url);
            self.requests.borrow_mut().push(request);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(format!("no scripted response for {label}")))
        })
    }
}
