//! Request and response types exchanged between generator, workers and collector

use crate::errors::HttpError;
use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use std::fmt;
use url::Url;

/// Header carrying the simulated caller's identity
pub const X_USER_ID: HeaderName = HeaderName::from_static("x-user-id");

/// Content type sent with every generated request
pub const APPLICATION_JSON: &str = "application/json";

/// A fully-built GET request, ready for a worker to execute
#[derive(Debug, Clone)]
pub struct GeneratedRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
}

impl GeneratedRequest {
    /// Create a GET request carrying `Content-Type: application/json`
    pub fn get(url: Url) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));

        Self {
            method: Method::GET,
            url,
            headers,
        }
    }

    /// Attach the identity header
    pub fn with_identity(mut self, identity: impl fmt::Display) -> Result<Self, HttpError> {
        let value = identity.to_string();
        let header_value =
            HeaderValue::from_str(&value).map_err(|_| HttpError::InvalidHeaderValue {
                name: X_USER_ID.to_string(),
                value,
            })?;

        self.headers.insert(X_USER_ID, header_value);
        Ok(self)
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Value of the identity header, if set
    pub fn identity(&self) -> Option<&str> {
        self.headers.get(X_USER_ID).and_then(|v| v.to_str().ok())
    }

    /// First value of a query parameter
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn into_parts(self) -> (Method, Url, HeaderMap) {
        (self.method, self.url, self.headers)
    }
}

/// A response whose body has not been read yet
///
/// Whoever holds a `RawResponse` owns the body; dropping it unread releases
/// the underlying connection without draining it.
pub struct RawResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: BoxStream<'static, Result<Bytes, HttpError>>,
}

impl RawResponse {
    pub fn new<S>(status: StatusCode, headers: HeaderMap, body: S) -> Self
    where
        S: futures::Stream<Item = Result<Bytes, HttpError>> + Send + 'static,
    {
        Self {
            status,
            headers,
            body: body.boxed(),
        }
    }

    /// Response with an in-memory body
    pub fn from_bytes(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self::new(status, HeaderMap::new(), stream::once(async move { Ok(body) }))
    }

    pub fn from_reqwest(response: reqwest::Response) -> Self {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes_stream().map_err(HttpError::from);
        Self::new(status, headers, body)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Read the whole body
    pub async fn read_all(mut self) -> Result<Bytes, HttpError> {
        let mut buffer = BytesMut::new();
        while let Some(chunk) = self.body.next().await {
            buffer.extend_from_slice(&chunk?);
        }
        Ok(buffer.freeze())
    }
}

impl fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_request_headers() {
        let url = Url::parse("http://localhost:3001/api/v1/items?limit=10&offset=20").unwrap();
        let request = GeneratedRequest::get(url).with_identity(42).unwrap();

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(request.identity(), Some("42"));
        assert_eq!(
            request.headers().get(CONTENT_TYPE).unwrap(),
            APPLICATION_JSON
        );
        assert_eq!(request.query_param("offset").as_deref(), Some("20"));
        assert_eq!(request.query_param("page"), None);
    }

    #[test]
    fn test_invalid_identity_header() {
        let url = Url::parse("http://localhost:3001/").unwrap();
        let err = GeneratedRequest::get(url).with_identity("bad\nvalue").unwrap_err();
        assert!(matches!(err, HttpError::InvalidHeaderValue { .. }));
    }

    #[tokio::test]
    async fn test_read_all_concatenates_chunks() {
        let chunks: Vec<Result<Bytes, HttpError>> = vec![
            Ok(Bytes::from_static(b"[{\"id\"")),
            Ok(Bytes::from_static(b":1}]")),
        ];
        let response = RawResponse::new(StatusCode::OK, HeaderMap::new(), stream::iter(chunks));

        let body = response.read_all().await.unwrap();
        assert_eq!(&body[..], b"[{\"id\":1}]");
    }

    #[tokio::test]
    async fn test_read_all_surfaces_stream_error() {
        let chunks = vec![
            Ok(Bytes::from_static(b"[")),
            Err(HttpError::BodyError("connection reset".to_string())),
        ];
        let response = RawResponse::new(StatusCode::OK, HeaderMap::new(), stream::iter(chunks));

        assert!(response.read_all().await.is_err());
    }
}
