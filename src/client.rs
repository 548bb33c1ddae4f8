//! Recipe data client for TheMealDB `search.php` endpoint.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::recipe::{MealsEnvelope, Recipe};
use crate::transport::{DynError, Transport};

const SEARCH_ENDPOINT: &str = "search.php";

/// What to ask the search endpoint for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeQuery {
    /// Free-text name search (`s=`).
    Name(String),
    /// All meals whose name starts with the letter (`f=`).
    FirstLetter(char),
}

impl RecipeQuery {
    fn param(&self) -> (&'static str, String) {
        match self {
            Self::Name(term) => ("s", term.clone()),
            Self::FirstLetter(letter) => ("f", letter.to_string()),
        }
    }
}

impl fmt::Display for RecipeQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(term) => write!(f, "name \"{term}\""),
            Self::FirstLetter(letter) => write!(f, "letter '{letter}'"),
        }
    }
}

/// Failures while fetching or decoding a search response.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The API answered with a non-2xx status.
    #[error("request to {url} failed with status {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },
    /// The request never produced a response.
    #[error("request to {url} failed: {source}")]
    Network {
        /// Requested URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: DynError,
    },
    /// The body was not a valid meals envelope.
    #[error("malformed response from {url}: {source}")]
    Parse {
        /// Requested URL.
        url: String,
        /// JSON decoding error.
        #[source]
        source: serde_json::Error,
    },
}

/// Cheaply cloneable handle over a shared transport.
#[derive(Clone)]
pub struct RecipeClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
}

impl RecipeClient {
    /// Creates a client rooted at `base_url` (expected to end in `/`).
    pub fn new(transport: Arc<dyn Transport>, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    /// API root.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the request URL for `query`.
    pub fn query_url(&self, query: &RecipeQuery) -> Result<Url, url::ParseError> {
        let mut url = self.base_url.join(SEARCH_ENDPOINT)?;
        let (key, value) = query.param();
        url.query_pairs_mut().clear().append_pair(key, &value);
        Ok(url)
    }

    /// Runs one search and returns the meals in API order (`null` meals → empty).
    pub async fn search(&self, query: &RecipeQuery) -> Result<Vec<Recipe>, FetchError> {
        let url = self
            .query_url(query)
            .map_err(|err| FetchError::Network {
                url: self.base_url.to_string(),
                source: Box::new(err),
            })?;
        let label = url.to_string();

        let response = self
            .transport
            .get(url)
            .await
            .map_err(|source| FetchError::Network {
                url: label.clone(),
                source,
            })?;

        if !response.is_success() {
            return Err(FetchError::Status {
                url: label,
                status: response.status,
            });
        }

        let envelope: MealsEnvelope =
            serde_json::from_slice(&response.body).map_err(|source| FetchError::Parse {
                url: label.clone(),
                source,
            })?;
        let meals = envelope.into_recipes();
        debug!(%query, count = meals.len(), "search complete");
        Ok(meals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::{MockResponse, MockTransport};

    fn client(mock: &MockTransport) -> RecipeClient {
        RecipeClient::new(
            Arc::new(mock.clone()),
            Url::parse("https://api.test/api/json/v1/1/").unwrap(),
        )
    }

    #[test]
    fn query_urls_encode_terms() {
        let client = client(&MockTransport::new());
        let url = client
            .query_url(&RecipeQuery::Name("mac & cheese".into()))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.test/api/json/v1/1/search.php?s=mac+%26+cheese"
        );
        let url = client.query_url(&RecipeQuery::FirstLetter('q')).unwrap();
        assert_eq!(url.query(), Some("f=q"));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn null_meals_yield_empty_list() {
        let mock = MockTransport::new();
        mock.on_query("s=zzz", MockResponse::json(r#"{"meals":null}"#));
        let meals = client(&mock)
            .search(&RecipeQuery::Name("zzz".into()))
            .await
            .expect("empty search");
        assert!(meals.is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn parses_meals_in_api_order() {
        let mock = MockTransport::new();
        mock.on_query(
            "s=pie",
            MockResponse::json(
                r#"{"meals":[{"idMeal":"2","strMeal":"Apple Pie"},{"idMeal":"1","strMeal":"Fish Pie"}]}"#,
            ),
        );
        let meals = client(&mock)
            .search(&RecipeQuery::Name("pie".into()))
            .await
            .expect("search");
        let ids: Vec<_> = meals.iter().map(|meal| meal.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn malformed_meal_does_not_sink_the_search() {
        let mock = MockTransport::new();
        mock.on_query(
            "f=a",
            MockResponse::json(r#"{"meals":[{"idMeal":"1"},{"idMeal":2}]}"#),
        );
        let meals = client(&mock)
            .search(&RecipeQuery::FirstLetter('a'))
            .await
            .expect("lenient decode");
        assert_eq!(meals.len(), 1);
        assert_eq!(meals[0].id, "1");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn non_success_status_is_reported() {
        let mock = MockTransport::new();
        mock.on_query("f=x", MockResponse::status(500, "oops"));
        match client(&mock)
            .search(&RecipeQuery::FirstLetter('x'))
            .await
            .expect_err("status error")
        {
            FetchError::Status { status, .. } => assert_eq!(status, 500),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn malformed_body_is_a_parse_error() {
        let mock = MockTransport::new();
        mock.on_query("s=bad", MockResponse::json("<html>"));
        let err = client(&mock)
            .search(&RecipeQuery::Name("bad".into()))
            .await
            .expect_err("parse error");
        assert!(matches!(err, FetchError::Parse { .. }));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn transport_failure_is_a_network_error() {
        let mock = MockTransport::new();
        mock.on_query("s=down", MockResponse::fail("dns lookup failed"));
        let err = client(&mock)
            .search(&RecipeQuery::Name("down".into()))
            .await
            .expect_err("network error");
        assert!(matches!(err, FetchError::Network { .. }));
        assert!(err.to_string().contains("dns lookup failed"));
    }
}
