//! Client configuration and the command-line surface shared by the binary.

use clap::{Parser, Subcommand};
use std::time::Duration;
use url::Url;

/// Default TheMealDB v1 endpoint (public test key).
pub const DEFAULT_BASE_URL: &str = "https://www.themealdb.com/api/json/v1/1/";
/// User agent sent with every API request.
pub const DEFAULT_USER_AGENT: &str = concat!("mealscout/", env!("CARGO_PKG_VERSION"));

/// Tunable knobs for the recipe API client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientControls {
    base_url: Url,
    timeout: Duration,
    user_agent: String,
}

impl ClientControls {
    /// Constructs a new set of client controls, normalizing the base URL to end in `/`.
    pub fn new(base_url: Url, timeout: Duration, user_agent: String) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            timeout,
            user_agent,
        }
    }

    /// API root that endpoint paths are joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// User agent header value.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl Default for ClientControls {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Command-line interface for the `mealscout` binary.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "mealscout",
    version,
    about = "Browse, search, and paginate TheMealDB recipes"
)]
pub struct Cli {
    /// Recipe API root
    #[arg(long, env = "MEALSCOUT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Seconds before an API request times out
    #[arg(long, env = "MEALSCOUT_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// User agent sent to the API
    #[arg(long, env = "MEALSCOUT_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Render views as JSON instead of text
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level actions.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Render the recipe listing for a location
    Menu {
        /// Listing location, e.g. `/menu?s=chicken&page=2`
        #[arg(long, default_value = "/menu")]
        location: String,
    },
    /// Render a single recipe by name
    Recipe {
        /// Recipe display name
        #[arg(long)]
        name: String,
    },
    /// Print the location a listing action commits to, without fetching
    Navigate {
        /// Location the action starts from
        #[arg(long, default_value = "/menu")]
        from: String,

        #[command(subcommand)]
        action: NavigateAction,
    },
    /// Interactive session with back/forward history
    Shell {
        /// Starting location
        #[arg(long, default_value = "/menu")]
        location: String,
    },
}

/// Offline listing actions accepted by `navigate`.
#[derive(Subcommand, Debug, Clone)]
pub enum NavigateAction {
    /// Submit a search term (empty clears the filter)
    Search {
        /// Search term
        #[arg(default_value = "")]
        term: String,
    },
    /// Jump to a page number
    Page {
        /// 1-based page number
        #[arg(value_parser = page_number)]
        number: usize,
    },
}

fn page_number(raw: &str) -> Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("pages start at 1".to_string()),
        Ok(page) => Ok(page),
        Err(err) => Err(err.to_string()),
    }
}

impl Cli {
    /// Converts the parsed CLI into validated `ClientControls`.
    pub fn build_controls(&self) -> Result<ClientControls, url::ParseError> {
        let base_url = Url::parse(self.base_url.trim())?;
        Ok(ClientControls::new(
            base_url,
            Duration::from_secs(self.timeout_secs),
            self.user_agent.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gains_trailing_slash() {
        let cli = Cli::parse_from([
            "mealscout",
            "--base-url",
            "http://localhost:9000/api/json/v1/1",
            "menu",
        ]);
        let controls = cli.build_controls().expect("valid base url");
        assert_eq!(
            controls.base_url().as_str(),
            "http://localhost:9000/api/json/v1/1/"
        );
        assert_eq!(controls.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn rejects_unparseable_base_url() {
        let cli = Cli::parse_from(["mealscout", "--base-url", "not a url", "menu"]);
        assert!(cli.build_controls().is_err());
    }

    #[test]
    fn navigate_search_defaults_to_empty_term() {
        let cli = Cli::parse_from(["mealscout", "navigate", "search"]);
        match cli.command {
            Command::Navigate {
                from,
                action: NavigateAction::Search { term },
            } => {
                assert_eq!(from, "/menu");
                assert!(term.is_empty());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn navigate_page_rejects_zero() {
        let err = Cli::try_parse_from(["mealscout", "navigate", "page", "0"])
            .expect_err("page zero is invalid");
        assert!(err.to_string().contains("pages start at 1"));

        let cli = Cli::parse_from(["mealscout", "navigate", "page", "4"]);
        assert!(matches!(
            cli.command,
            Command::Navigate {
                action: NavigateAction::Page { number: 4 },
                ..
            }
        ));
    }
}
