//! Replayable request descriptors.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use url::Url;

use holyclub_core::error::InvalidInputError;
use holyclub_core::journal::ImagePart;
use holyclub_core::{Credential, Result};

use crate::client::map_reqwest;

/// An outgoing request that can be sent more than once.
///
/// The body is kept as bytes so a retried attempt is a structural copy of the
/// original: same method, URL, headers, and body. Only `Authorization` is
/// supplied per attempt.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Create a request for an absolute URL.
    pub fn new(method: Method, url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(|e| InvalidInputError::Other {
            message: format!("invalid request URL '{}': {}", url, e),
        })?;
        Ok(Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        })
    }

    pub fn get(url: &str) -> Result<Self> {
        Self::new(Method::GET, url)
    }

    pub fn post(url: &str) -> Result<Self> {
        Self::new(Method::POST, url)
    }

    pub fn patch(url: &str) -> Result<Self> {
        Self::new(Method::PATCH, url)
    }

    pub fn delete(url: &str) -> Result<Self> {
        Self::new(Method::DELETE, url)
    }

    /// Add a header. Repeated names accumulate.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Append query-string pairs to the URL.
    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut pairs = pairs.into_iter().peekable();
        if pairs.peek().is_some() {
            self.url.query_pairs_mut().extend_pairs(pairs);
        }
        self
    }

    /// Set a JSON body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let bytes = serde_json::to_vec(body).map_err(|e| InvalidInputError::Other {
            message: e.to_string(),
        })?;
        self.headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        self.body = Some(bytes);
        Ok(self)
    }

    /// Set a `application/x-www-form-urlencoded` body.
    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        self.body = Some(encoded.into_bytes());
        self
    }

    /// Set a `multipart/form-data` body of text fields followed by files.
    ///
    /// The body is encoded once with a boundary chosen here, so every attempt
    /// sends the same bytes.
    pub fn multipart<'a, K, V>(
        mut self,
        fields: impl IntoIterator<Item = (K, V)>,
        files: impl IntoIterator<Item = (&'a str, &'a ImagePart)>,
    ) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let fields: Vec<(K, V)> = fields.into_iter().collect();
        let files: Vec<(&str, &ImagePart)> = files.into_iter().collect();

        let mut boundary = next_boundary();
        while boundary_collides(&boundary, &fields, &files) {
            boundary = next_boundary();
        }

        let mut body = Vec::new();
        for (name, value) in &fields {
            part_header(&mut body, &boundary, name.as_ref(), None);
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(value.as_ref().as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        for (name, image) in &files {
            part_header(&mut body, &boundary, name, Some(image.file_name()));
            body.extend_from_slice(
                format!("Content-Type: {}\r\n\r\n", image.content_type()).as_bytes(),
            );
            body.extend_from_slice(image.bytes());
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());

        let content_type = HeaderValue::from_str(&format!(
            "multipart/form-data; boundary={boundary}"
        ))
        .map_err(|_| InvalidInputError::Other {
            message: "multipart boundary is not a valid header value".to_string(),
        })?;
        self.headers.insert(CONTENT_TYPE, content_type);
        self.body = Some(body);
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

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Build one attempt of this request.
    ///
    /// With a credential, `Authorization` is set to its bearer value and
    /// replaces any caller-supplied one; every other header is kept.
    pub(crate) fn build(
        &self,
        client: &reqwest::Client,
        credential: Option<&Credential>,
    ) -> Result<reqwest::Request> {
        let mut builder = client
            .request(self.method.clone(), self.url.clone())
            .headers(self.headers.clone());
        if let Some(body) = &self.body {
            builder = builder.body(body.clone());
        }
        let mut request = builder.build().map_err(map_reqwest)?;

        if let Some(credential) = credential {
            let mut value =
                HeaderValue::from_str(&credential.bearer()).map_err(|_| InvalidInputError::Other {
                    message: "credential is not a valid header value".to_string(),
                })?;
            value.set_sensitive(true);
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        Ok(request)
    }
}

fn next_boundary() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("holyclub-{nanos:x}-{seq:x}")
}

fn boundary_collides<K, V>(boundary: &str, fields: &[(K, V)], files: &[(&str, &ImagePart)]) -> bool
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let needle = boundary.as_bytes();
    let contains = |haystack: &[u8]| haystack.windows(needle.len()).any(|w| w == needle);
    fields.iter().any(|(_, value)| contains(value.as_ref().as_bytes()))
        || files.iter().any(|(_, image)| contains(image.bytes()))
}

fn part_header(body: &mut Vec<u8>, boundary: &str, name: &str, file_name: Option<&str>) {
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    let mut disposition = format!(
        "Content-Disposition: form-data; name=\"{}\"",
        quote_param(name)
    );
    if let Some(file_name) = file_name {
        disposition.push_str(&format!("; filename=\"{}\"", quote_param(file_name)));
    }
    disposition.push_str("\r\n");
    body.extend_from_slice(disposition.as_bytes());
}

/// Percent-escape the characters that would end a quoted header parameter.
fn quote_param(value: &str) -> String {
    value
        .replace('"', "%22")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
