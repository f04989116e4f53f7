//! HTTP utilities for Confluent Cloud REST API calls

use super::auth::Credentials;
use super::error::{ClientError, Result};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::time::Duration;
use url::Url;

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.chars().count() > MAX_LOG_BODY_LENGTH {
        let head: String = body.chars().take(MAX_LOG_BODY_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, body.len())
    } else {
        body.to_string()
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// Status codes an operation documents as success
///
/// Each operation names its own set. Anything outside it, including other
/// 2xx codes, is reported as [`ClientError::UnexpectedStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expected(&'static [StatusCode]);

impl Expected {
    pub const OK: Expected = Expected(&[StatusCode::OK]);
    pub const CREATED: Expected = Expected(&[StatusCode::CREATED]);
    pub const ACCEPTED: Expected = Expected(&[StatusCode::ACCEPTED]);
    pub const NO_CONTENT: Expected = Expected(&[StatusCode::NO_CONTENT]);
    pub const OK_OR_NO_CONTENT: Expected = Expected(&[StatusCode::OK, StatusCode::NO_CONTENT]);

    pub fn matches(self, status: StatusCode) -> bool {
        self.0.contains(&status)
    }

    pub fn codes(self) -> &'static [StatusCode] {
        self.0
    }
}

/// A fully-read HTTP response
///
/// The body is drained before this value exists, so the underlying connection
/// is back in the pool whatever the caller does with it.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RawResponse {
    /// Check the status against the operation's success set
    pub fn expect(self, expected: Expected, action: &'static str) -> Result<Self> {
        if expected.matches(self.status) {
            return Ok(self);
        }

        // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
        tracing::error!(
            "API error: {} (expected {:?}) - {}",
            self.status,
            expected.codes(),
            sanitize_for_log(&self.body)
        );
        Err(ClientError::UnexpectedStatus {
            action,
            status: self.status,
            body: self.body,
        })
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Percent-encode a caller-supplied value for use as one path segment
pub fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// Flatten a query options value into `(name, value)` pairs
///
/// Fields serializing to `null` or to an empty string are omitted.
pub fn query_pairs<Q: Serialize + ?Sized>(query: &Q) -> Result<Vec<(String, String)>> {
    let Value::Object(map) = serde_json::to_value(query)? else {
        return Ok(Vec::new());
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (name, value) in map {
        let value = match value {
            Value::Null => continue,
            Value::String(s) if s.is_empty() => continue,
            Value::String(s) => s,
            other => other.to_string(),
        };
        pairs.push((name, value));
    }
    Ok(pairs)
}

/// Build a request URL from a host, an API route and optional query options
pub fn build_url<Q: Serialize + ?Sized>(host: &str, path: &str, query: Option<&Q>) -> Result<Url> {
    let mut url = Url::parse(&format!("{}{}", host.trim_end_matches('/'), path))?;

    if let Some(query) = query {
        let pairs = query_pairs(query)?;
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
    }

    Ok(url)
}

/// HTTP client wrapper for Confluent Cloud API calls
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a new HTTP client
    ///
    /// No timeout is applied unless the caller asks for one.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an already configured reqwest client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Send one request and read the whole response
    pub async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        credentials: &Credentials,
        body: Option<&B>,
    ) -> Result<RawResponse> {
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .basic_auth(credentials.api_key(), Some(credentials.api_secret()));

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!("-> {} ({} bytes)", status, body.len());
        Ok(RawResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize, Default)]
    struct Opts {
        #[serde(skip_serializing_if = "Option::is_none")]
        page_size: Option<u32>,
        environment: Option<String>,
        label: String,
    }

    #[test]
    fn test_build_url_without_query() {
        let url = build_url::<Opts>("https://api.confluent.cloud", "/cmk/v2/clusters", None).unwrap();
        assert_eq!(url.as_str(), "https://api.confluent.cloud/cmk/v2/clusters");
        assert!(url.query().is_none());
    }

    #[test]
    fn test_empty_options_produce_no_query_string() {
        let url = build_url(
            "https://api.confluent.cloud/",
            "/cmk/v2/clusters",
            Some(&Opts::default()),
        )
        .unwrap();
        assert_eq!(url.as_str(), "https://api.confluent.cloud/cmk/v2/clusters");
    }

    #[test]
    fn test_single_option_produces_single_parameter() {
        let opts = Opts {
            environment: Some("env-123".to_string()),
            ..Default::default()
        };
        let url = build_url("https://api.confluent.cloud", "/cmk/v2/clusters", Some(&opts)).unwrap();
        assert_eq!(url.query(), Some("environment=env-123"));
    }

    #[test]
    fn test_numbers_are_rendered_without_quotes() {
        let opts = Opts {
            page_size: Some(25),
            ..Default::default()
        };
        let pairs = query_pairs(&opts).unwrap();
        assert_eq!(pairs, vec![("page_size".to_string(), "25".to_string())]);
    }

    #[test]
    fn test_host_path_prefix_is_kept() {
        let url = build_url::<()>("http://localhost:8080/proxy/", "/iam/v2/api-keys", None).unwrap();
        assert_eq!(url.path(), "/proxy/iam/v2/api-keys");
    }

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("retention.ms"), "retention.ms");
        assert_eq!(segment("lkc-abc/../x"), "lkc-abc%2F..%2Fx");
    }

    #[test]
    fn test_expected_rejects_undocumented_success_codes() {
        assert!(Expected::ACCEPTED.matches(StatusCode::ACCEPTED));
        assert!(!Expected::ACCEPTED.matches(StatusCode::OK));
        assert!(!Expected::ACCEPTED.matches(StatusCode::CREATED));
        assert!(Expected::OK_OR_NO_CONTENT.matches(StatusCode::NO_CONTENT));
        assert!(!Expected::NO_CONTENT.matches(StatusCode::OK));
        assert_eq!(
            Expected::OK_OR_NO_CONTENT.codes(),
            &[StatusCode::OK, StatusCode::NO_CONTENT]
        );
    }

    #[test]
    fn test_raw_response_expect_keeps_body_on_failure() {
        let raw = RawResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };
        match raw.expect(Expected::OK, "get kafka cluster") {
            Err(ClientError::UnexpectedStatus { status, body, .. }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_sanitize_for_log_truncates() {
        let long = "é".repeat(500);
        let sanitized = sanitize_for_log(&long);
        assert!(sanitized.contains("[truncated, 1000 bytes total]"));
        assert_eq!(sanitize_for_log("a\nb"), "ab");
    }

    #[test]
    fn test_unreachable_host_is_a_transport_error() {
        let http = HttpClient::new("ccloud-test", Some(Duration::from_secs(5))).unwrap();
        let url = Url::parse("http://127.0.0.1:1/cmk/v2/clusters").unwrap();
        let credentials = Credentials::new("key", "secret");

        let result = tokio_test::block_on(http.send::<()>(Method::GET, url, &credentials, None));
        assert!(matches!(result, Err(ClientError::Transport(_))));
    }
}
