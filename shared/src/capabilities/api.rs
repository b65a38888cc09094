//! REST calls executed by the shell.
//!
//! The core describes a call as an [`ApiRequest`], the shell performs it and
//! answers with an [`ApiOutput`]. Every response that arrives comes back as
//! `Ok`, whatever its status, headers included. `Err` means no response.

use std::fmt;

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Failure to describe a request. Nothing was sent.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },

    #[error("could not encode request body: {0}")]
    Body(String),
}

/// The shell could not get a response at all.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[error("no response: {reason}")]
pub struct TransportError {
    pub reason: String,
}

impl TransportError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Absolute http(s) URL without embedded credentials.
///
/// Deserializing goes through the same check as [`ApiUrl::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Url", into = "Url")]
pub struct ApiUrl(Url);

impl ApiUrl {
    pub fn parse(raw: &str) -> Result<Self, RequestError> {
        let url = Url::parse(raw).map_err(|e| RequestError::InvalidUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        Self::try_from(url)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn path(&self) -> &str {
        self.0.path()
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.0
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect()
    }
}

impl TryFrom<Url> for ApiUrl {
    type Error = RequestError;

    fn try_from(url: Url) -> Result<Self, Self::Error> {
        let reject = |reason: &str| RequestError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        if !matches!(url.scheme(), "http" | "https") {
            return Err(reject("only http and https are supported"));
        }
        if url.host_str().is_none() {
            return Err(reject("missing host"));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(reject("credentials are not allowed in the URL"));
        }
        Ok(Self(url))
    }
}

impl From<ApiUrl> for Url {
    fn from(url: ApiUrl) -> Self {
        url.0
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Header list in arrival order. Lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Replaces any header of the same name.
    fn set(&mut self, name: &str, value: String) -> Result<(), RequestError> {
        let valid_name = !name.is_empty()
            && name
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid_name || value.bytes().any(|b| matches!(b, b'\r' | b'\n' | 0)) {
            return Err(RequestError::InvalidHeader {
                name: name.to_string(),
            });
        }

        self.0.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.0.push((name.to_string(), value));
        Ok(())
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, v)| (n.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiRequest {
    method: Method,
    url: ApiUrl,
    headers: Headers,
    body: Option<Vec<u8>>,
}

impl ApiRequest {
    pub fn new(method: Method, url: ApiUrl) -> Self {
        Self {
            method,
            url,
            headers: Headers::default(),
            body: None,
        }
    }

    pub fn header(mut self, name: &str, value: impl Into<String>) -> Result<Self, RequestError> {
        self.headers.set(name, value.into())?;
        Ok(self)
    }

    /// Appends `pairs` to the query string in the given order.
    pub fn query<'a>(mut self, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut pairs = pairs.into_iter().peekable();
        if pairs.peek().is_some() {
            let mut url = Url::from(self.url);
            url.query_pairs_mut().extend_pairs(pairs);
            self.url = ApiUrl(url);
        }
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, RequestError> {
        let bytes = serde_json::to_vec(body).map_err(|e| RequestError::Body(e.to_string()))?;
        self.headers
            .set("Content-Type", "application/json".to_string())?;
        self.body = Some(bytes);
        Ok(self)
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &ApiUrl {
        &self.url
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn body_json(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    status: u16,
    headers: Headers,
    body: Vec<u8>,
}

impl ApiResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Headers::default(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.0.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

pub type ApiOutput = Result<ApiResponse, TransportError>;

impl Operation for ApiRequest {
    type Output = ApiOutput;
}

pub struct Api<Ev> {
    context: CapabilityContext<ApiRequest, Ev>,
}

impl<Ev> Capability<Ev> for Api<Ev> {
    type Operation = ApiRequest;
    type MappedSelf<MappedEv> = Api<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static + Send,
    {
        Api::new(self.context.map_event(f))
    }
}

impl<Ev> Api<Ev>
where
    Ev: Send + 'static,
{
    pub fn new(context: CapabilityContext<ApiRequest, Ev>) -> Self {
        Self { context }
    }

    /// Hands `request` to the shell and feeds its answer back through `callback`.
    pub fn execute<F>(&self, request: ApiRequest, callback: F)
    where
        F: FnOnce(ApiOutput) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        self.context.spawn(async move {
            let output = ctx.request_from_shell(request).await;
            ctx.update_app(callback(output));
        });
    }
}
