//! Envelope-validating request client.

use std::rc::Rc;

use leptos::logging;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    config::ClientConfig,
    envelope::ApiEnvelope,
    error::RequestFailure,
    transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport},
};

/// Content type sent with every request.
pub const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_HEADER: &str = "Content-Type";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Per-request options for [`RequestClient::request`].
pub struct RequestOptions {
    /// Request method; defaults to `GET`.
    pub method: HttpMethod,
    /// Pre-serialized JSON body.
    pub body: Option<String>,
    /// Extra headers. A `Content-Type` entry here is ignored.
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    /// Options for `method` with no body.
    pub fn method(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Options for `method` with `body` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestFailure`] when `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(method: HttpMethod, body: &B) -> Result<Self, RequestFailure> {
        let body = serde_json::to_string(body)
            .map_err(|err| RequestFailure::new(format!("invalid request body: {err}")))?;
        Ok(Self {
            method,
            body: Some(body),
            headers: Vec::new(),
        })
    }

    /// Adds an extra header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[derive(Clone)]
/// Stateless client that issues requests against a base URL and unwraps [`ApiEnvelope`]s.
///
/// No retries are performed. Dropping a returned future cancels the transport call and nothing
/// is unwrapped.
pub struct RequestClient {
    config: ClientConfig,
    transport: Rc<dyn HttpTransport>,
}

impl std::fmt::Debug for RequestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RequestClient {
    /// Creates a client over a shared transport.
    pub fn new(config: ClientConfig, transport: Rc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }

    /// Creates a client that owns `transport`.
    pub fn with_transport(config: ClientConfig, transport: impl HttpTransport + 'static) -> Self {
        Self::new(config, Rc::new(transport))
    }

    /// Creates a reqwest-backed client configured from the environment.
    pub fn from_env() -> Self {
        Self::with_transport(ClientConfig::from_env(), ReqwestTransport::default())
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issues a request and returns the unwrapped envelope payload.
    ///
    /// # Errors
    ///
    /// Fails when the transport errors, the status is not 2xx, the body is not an envelope,
    /// `success` is `false`, `data` is absent, or `data` does not decode into `T`.
    pub async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<T, RequestFailure> {
        let request = self.build_request(path, options);
        let method = request.method;
        let response = self
            .transport
            .send(request)
            .await
            .map_err(RequestFailure::transport)?;
        decode_response(&response).map_err(|failure| {
            logging::debug_warn!("{method} {path} failed: {failure}");
            failure
        })
    }

    /// Issues a `GET`.
    ///
    /// # Errors
    ///
    /// See [`RequestClient::request`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestFailure> {
        self.request(path, RequestOptions::method(HttpMethod::Get))
            .await
    }

    /// Issues a `POST` with `body` serialized as JSON.
    ///
    /// # Errors
    ///
    /// See [`RequestClient::request`]; also fails before sending when `body` cannot be serialized.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RequestFailure> {
        self.request(path, RequestOptions::json(HttpMethod::Post, body)?)
            .await
    }

    /// Issues a `PUT` with `body` serialized as JSON.
    ///
    /// # Errors
    ///
    /// See [`RequestClient::post`].
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RequestFailure> {
        self.request(path, RequestOptions::json(HttpMethod::Put, body)?)
            .await
    }

    /// Issues a `PATCH` with `body` serialized as JSON.
    ///
    /// # Errors
    ///
    /// See [`RequestClient::post`].
    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RequestFailure> {
        self.request(path, RequestOptions::json(HttpMethod::Patch, body)?)
            .await
    }

    /// Issues a `DELETE`.
    ///
    /// # Errors
    ///
    /// See [`RequestClient::request`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestFailure> {
        self.request(path, RequestOptions::method(HttpMethod::Delete))
            .await
    }

    fn build_request(&self, path: &str, options: RequestOptions) -> HttpRequest {
        let mut headers = vec![(
            CONTENT_TYPE_HEADER.to_string(),
            CONTENT_TYPE_JSON.to_string(),
        )];
        headers.extend(
            options
                .headers
                .into_iter()
                .filter(|(name, _)| !name.eq_ignore_ascii_case(CONTENT_TYPE_HEADER)),
        );
        HttpRequest {
            method: options.method,
            url: self.config.url_for(path),
            headers,
            body: options.body,
        }
    }
}

/// Validates a raw response against the envelope contract and decodes the payload.
///
/// # Errors
///
/// See [`RequestClient::request`].
pub fn decode_response<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, RequestFailure> {
    let envelope: ApiEnvelope<Value> = serde_json::from_str(&response.body).map_err(|err| {
        logging::debug_warn!("response body is not an api envelope: {err}");
        RequestFailure::from_envelope_error(loose_error_text(&response.body))
            .with_status(response.status)
    })?;

    if !response.is_success() {
        return Err(RequestFailure::from_envelope_error(envelope.error).with_status(response.status));
    }

    let payload = envelope.into_payload()?;
    serde_json::from_value(payload)
        .map_err(|err| RequestFailure::new(format!("invalid response payload: {err}")))
}

/// Pulls a string `error` field out of a JSON object body that is not a full envelope.
fn loose_error_text(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body).ok()? {
        Value::Object(mut fields) => match fields.remove("error")? {
            Value::String(text) => Some(text),
            _ => None,
        },
        _ => None,
    }
}
