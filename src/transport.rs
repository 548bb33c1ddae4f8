//! HTTP transport seam used by the recipe client.
//!
//! [`HttpTransport`] talks to the network through `reqwest`. Unit tests swap in
//! `mock::MockTransport`, which answers from canned responses.

use futures_util::future::{BoxFuture, FutureExt};
use reqwest::Client;
use tracing::debug;
use url::Url;

use crate::controls::ClientControls;

/// Boxed error type surfaced by transports.
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Status code and body of a completed GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One asynchronous GET. Futures are `'static` so callers can spawn them.
pub trait Transport: Send + Sync + 'static {
    /// Issues a GET request for `url`.
    fn get(&self, url: Url) -> BoxFuture<'static, Result<RawResponse, DynError>>;
}

/// Network transport backed by a shared `reqwest::Client`.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds the HTTP client from the configured controls.
    pub fn new(controls: &ClientControls) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(controls.user_agent())
            .redirect(reqwest::redirect::Policy::limited(5))
            .timeout(controls.timeout())
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: Url) -> BoxFuture<'static, Result<RawResponse, DynError>> {
        let client = self.client.clone();
        async move {
            debug!(%url, "GET");
            let response = client.get(url).send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?.to_vec();
            Ok(RawResponse { status, body })
        }
        .boxed()
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::{DynError, RawResponse, Transport};
    use futures_util::future::{BoxFuture, FutureExt};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use url::Url;

    /// Canned reply served by [`MockTransport`].
    #[derive(Debug, Clone)]
    pub(crate) enum MockResponse {
        /// Reply with a status and body.
        Reply(RawResponse),
        /// Fail as if the connection broke.
        Fail(String),
        /// Panic inside the request future.
        Panic,
    }

    impl MockResponse {
        /// `200 OK` with the given JSON text.
        pub fn json(body: impl Into<String>) -> Self {
            Self::status(200, body)
        }

        /// Arbitrary status with the given body text.
        pub fn status(status: u16, body: impl Into<String>) -> Self {
            Self::Reply(RawResponse {
                status,
                body: body.into().into_bytes(),
            })
        }

        /// Network-level failure.
        pub fn fail(message: impl Into<String>) -> Self {
            Self::Fail(message.into())
        }
    }

    #[derive(Default)]
    struct MockState {
        routes: HashMap<String, MockResponse>,
        requests: Vec<Url>,
    }

    /// In-memory transport keyed by the request's query string (`f=a`, `s=chicken`).
    ///
    /// Unrouted queries answer `{"meals":null}`.
    #[derive(Clone, Default)]
    pub(crate) struct MockTransport {
        state: Arc<Mutex<MockState>>,
    }

    impl MockTransport {
        /// Creates an empty mock.
        pub fn new() -> Self {
            Self::default()
        }

        /// Routes the exact query string `query` to `response`.
        pub fn on_query(&self, query: &str, response: MockResponse) -> &Self {
            self.lock().routes.insert(query.to_string(), response);
            self
        }

        /// Every URL requested so far, in request order.
        pub fn requests(&self) -> Vec<Url> {
            self.lock().requests.clone()
        }

        /// Number of requests issued so far.
        pub fn request_count(&self) -> usize {
            self.lock().requests.len()
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
            self.state
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    impl Transport for MockTransport {
        fn get(&self, url: Url) -> BoxFuture<'static, Result<RawResponse, DynError>> {
            let response = {
                let mut state = self.lock();
                state.requests.push(url.clone());
                state.routes.get(url.query().unwrap_or_default()).cloned()
            };
            async move {
                match response {
                    Some(MockResponse::Reply(raw)) => Ok(raw),
                    Some(MockResponse::Fail(message)) => Err(message.into()),
                    Some(MockResponse::Panic) => panic!("mock transport panic for {url}"),
                    None => Ok(RawResponse {
                        status: 200,
                        body: br#"{"meals":null}"#.to_vec(),
                    }),
                }
            }
            .boxed()
        }
    }
}
